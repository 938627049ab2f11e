use chrono::Utc;
use log::warn;
use serde_json::Value;

use crate::models::{RawRecord, ScrapedRecord};

/// Reshapes raw remote items into the canonical record list. Order is
/// preserved; provided fields pass through untouched; a missing or falsy id
/// is replaced with one synthesized from the batch position and the clock,
/// so ids stay unique within a batch even when the endpoint repeats them.
pub fn normalize(raw: Vec<RawRecord>) -> Vec<ScrapedRecord> {
    let batch_stamp = Utc::now().timestamp_millis();
    let mut records = Vec::with_capacity(raw.len());

    for (index, item) in raw.into_iter().enumerate() {
        let title = item.title.filter(|t| !t.is_empty());
        let link = item.link.filter(|l| !l.is_empty());
        let (Some(title), Some(link)) = (title, link) else {
            warn!("Rejecting item at position {}: no title/link", index);
            continue;
        };

        let id = provided_id(&item.id)
            .unwrap_or_else(|| format!("item-{}-{}", index, batch_stamp));

        records.push(ScrapedRecord {
            id,
            title,
            link,
            description: item.description,
            price: item.price,
            category: item.category,
            timestamp: item.timestamp,
        });
    }

    records
}

/// The endpoint has been seen sending string, numeric, null and absent ids.
/// Falsy shapes (null, "", 0) carry no identity and trigger synthesis.
fn provided_id(id: &Option<Value>) -> Option<String> {
    match id {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(title: &str, link: &str) -> RawRecord {
        RawRecord {
            title: Some(title.to_string()),
            link: Some(link.to_string()),
            ..RawRecord::default()
        }
    }

    #[test]
    fn synthesized_ids_are_distinct_within_a_batch() {
        let records = normalize(vec![raw("A", "http://a"), raw("B", "http://b"), raw("C", "http://c")]);
        assert_eq!(records.len(), 3);
        for record in &records {
            assert!(!record.id.is_empty());
        }
        assert_ne!(records[0].id, records[1].id);
        assert_ne!(records[1].id, records[2].id);
        assert_ne!(records[0].id, records[2].id);
    }

    #[test]
    fn provided_ids_are_kept() {
        let mut item = raw("A", "http://a");
        item.id = Some(json!("remote-7"));
        let records = normalize(vec![item]);
        assert_eq!(records[0].id, "remote-7");
    }

    #[test]
    fn numeric_ids_are_stringified() {
        let mut item = raw("A", "http://a");
        item.id = Some(json!(42));
        let records = normalize(vec![item]);
        assert_eq!(records[0].id, "42");
    }

    #[test]
    fn falsy_ids_trigger_synthesis() {
        let mut empty = raw("A", "http://a");
        empty.id = Some(json!(""));
        let mut zero = raw("B", "http://b");
        zero.id = Some(json!(0));
        let mut null = raw("C", "http://c");
        null.id = Some(Value::Null);

        let records = normalize(vec![empty, zero, null]);
        assert_eq!(records.len(), 3);
        for record in &records {
            assert!(record.id.starts_with("item-"), "id was {}", record.id);
        }
    }

    #[test]
    fn order_is_preserved() {
        let records = normalize(vec![raw("first", "http://1"), raw("second", "http://2")]);
        assert_eq!(records[0].title, "first");
        assert_eq!(records[1].title, "second");
    }

    #[test]
    fn optional_fields_pass_through_without_defaults() {
        let mut item = raw("A", "http://a");
        item.category = Some("books".to_string());
        let records = normalize(vec![item, raw("B", "http://b")]);
        assert_eq!(records[0].category.as_deref(), Some("books"));
        assert!(records[1].category.is_none());
        assert!(records[1].price.is_none());
        assert!(records[1].description.is_none());
        assert!(records[1].timestamp.is_none());
    }

    #[test]
    fn items_without_title_or_link_are_rejected() {
        let no_link = RawRecord {
            title: Some("orphan".to_string()),
            ..RawRecord::default()
        };
        let empty_title = RawRecord {
            title: Some(String::new()),
            link: Some("http://x".to_string()),
            ..RawRecord::default()
        };
        let records = normalize(vec![no_link, empty_title, raw("kept", "http://kept")]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "kept");
    }
}
