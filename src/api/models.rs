use serde::Deserialize;

use crate::models::ScrapedRecord;

/// Body of `POST /api/export`: the session's record list, sent back by the
/// presentation layer for spreadsheet generation.
#[derive(Deserialize)]
pub struct ExportRequest {
    pub records: Vec<ScrapedRecord>,
}
