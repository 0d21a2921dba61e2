// Capped, newest-first log of simulation events shown next to the scene.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use std::collections::VecDeque;

pub const FEED_CAPACITY: usize = 50;

/// One simulation event as received on the channel.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub time: Option<DateTime<FixedOffset>>,
    pub source: String,
    pub kind: String,
    // Full event body for the detail view.
    pub payload: Value,
}

impl EventRecord {
    /// Builds a record from a raw event object, reading `time`, `source` and `type`.
    pub fn from_payload(payload: Value) -> Self {
        let text = |key: &str| {
            payload
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let time = payload
            .get("time")
            .and_then(Value::as_str)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok());
        Self {
            time,
            source: text("source"),
            kind: text("type"),
            payload,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedRow {
    pub time_label: String,
    pub source_label: String,
    pub type_label: String,
    pub payload: Value,
}

impl FeedRow {
    fn from_record(record: EventRecord) -> Self {
        Self {
            time_label: record
                .time
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_else(|| "--:--".to_string()),
            source_label: leading_segment(&record.source).to_string(),
            type_label: leading_segment(&record.kind).to_string(),
            payload: record.payload,
        }
    }

    /// Pretty-printed payload with 4-space indentation.
    pub fn detail(&self) -> String {
        let mut out = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        if self.payload.serialize(&mut ser).is_err() {
            return self.payload.to_string();
        }
        String::from_utf8(out).unwrap_or_else(|_| self.payload.to_string())
    }
}

// "Retailer.abc" -> "Retailer"
fn leading_segment(value: &str) -> &str {
    value.split('.').next().unwrap_or(value)
}

#[derive(Debug, Clone)]
pub struct EventFeed {
    rows: VecDeque<FeedRow>,
    capacity: usize,
    expanded: Option<usize>,
}

impl EventFeed {
    pub fn new(capacity: usize) -> Self {
        Self {
            rows: VecDeque::with_capacity(capacity),
            capacity,
            expanded: None,
        }
    }

    pub fn push(&mut self, record: EventRecord) {
        self.rows.push_front(FeedRow::from_record(record));
        self.rows.truncate(self.capacity);
        // Rows shift down by one; keep the detail view on the same row.
        self.expanded = self
            .expanded
            .map(|i| i + 1)
            .filter(|i| *i < self.rows.len());
    }

    pub fn rows(&self) -> impl Iterator<Item = &FeedRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Opens the detail view for row `index` (0 = newest).
    pub fn expand(&mut self, index: usize) -> Option<String> {
        let detail = self.rows.get(index)?.detail();
        self.expanded = Some(index);
        Some(detail)
    }

    pub fn collapse(&mut self) {
        self.expanded = None;
    }

    pub fn expanded(&self) -> Option<&FeedRow> {
        self.expanded.and_then(|i| self.rows.get(i))
    }
}

impl Default for EventFeed {
    fn default() -> Self {
        Self::new(FEED_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(n: usize) -> EventRecord {
        EventRecord::from_payload(json!({
            "time": "2019-05-02T09:05:33.123+01:00",
            "source": format!("Retailer.shop-{n}"),
            "type": "Order.OrderStatus.OrderReleased",
            "id": n,
        }))
    }

    #[test]
    fn rows_carry_truncated_labels_and_event_local_time() {
        let mut feed = EventFeed::default();
        feed.push(record(1));
        let row = feed.rows().next().expect("row");
        assert_eq!(row.time_label, "09:05");
        assert_eq!(row.source_label, "Retailer");
        assert_eq!(row.type_label, "Order");
    }

    #[test]
    fn missing_time_renders_placeholder() {
        let mut feed = EventFeed::default();
        feed.push(EventRecord::from_payload(json!({"source": "Carrier"})));
        let row = feed.rows().next().expect("row");
        assert_eq!(row.time_label, "--:--");
        assert_eq!(row.source_label, "Carrier");
        assert_eq!(row.type_label, "");
    }

    #[test]
    fn feed_keeps_only_the_newest_fifty_rows() {
        let mut feed = EventFeed::default();
        for n in 0..60 {
            feed.push(record(n));
        }
        assert_eq!(feed.len(), FEED_CAPACITY);
        let newest = feed.rows().next().expect("row");
        assert_eq!(newest.payload["id"], 59);
        let oldest = feed.rows().last().expect("row");
        assert_eq!(oldest.payload["id"], 10);
    }

    #[test]
    fn expanded_row_follows_new_arrivals() {
        let mut feed = EventFeed::default();
        feed.push(record(1));
        let detail = feed.expand(0).expect("detail");
        assert!(detail.contains("\n    \"id\": 1"));

        feed.push(record(2));
        assert_eq!(feed.expanded().expect("expanded").payload["id"], 1);

        feed.collapse();
        assert!(feed.expanded().is_none());
        assert!(feed.expand(5).is_none());
    }
}
