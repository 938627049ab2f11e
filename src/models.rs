use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
}

/// Price as the remote endpoint returns it: free text ("R$ 19,90") or a
/// bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Text(String),
    Number(f64),
}

impl Price {
    pub fn display(&self) -> String {
        match self {
            Price::Text(text) => text.clone(),
            Price::Number(number) => number.to_string(),
        }
    }
}

/// A normalized record, held in memory for the session and replaced on the
/// next request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedRecord {
    pub id: String,
    pub title: String,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Raw item exactly as received. Every field is optional; the normalizer
/// decides what is usable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    pub id: Option<serde_json::Value>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub category: Option<String>,
    pub timestamp: Option<String>,
}

/// The two body shapes the endpoint has produced over time: the current
/// envelope and the legacy bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RemoteBody {
    Envelope {
        #[serde(default)]
        results: Vec<RawRecord>,
        #[serde(rename = "fileBase64")]
        file_base64: Option<String>,
    },
    Bare(Vec<RawRecord>),
}

impl RemoteBody {
    pub fn into_parts(self) -> (Vec<RawRecord>, Option<String>) {
        match self {
            RemoteBody::Envelope { results, file_base64 } => (results, file_base64),
            RemoteBody::Bare(results) => (results, None),
        }
    }
}

/// Terminal result of one scrape invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ScrapeOutcome {
    Success {
        results: Vec<ScrapedRecord>,
        #[serde(rename = "fileBase64", skip_serializing_if = "Option::is_none")]
        file_base64: Option<String>,
    },
    Failure {
        error: String,
    },
}

impl ScrapeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ScrapeOutcome::Success { .. })
    }

    pub fn records(&self) -> &[ScrapedRecord] {
        match self {
            ScrapeOutcome::Success { results, .. } => results,
            ScrapeOutcome::Failure { .. } => &[],
        }
    }
}
