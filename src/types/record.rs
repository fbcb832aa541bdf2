//! Deck records
//!
//! A record is opaque to the engine apart from its id and image count; the
//! rest is display payload carried through to the host.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stable identity of a record within a session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One listing in the deck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub address: String,
    /// Monthly price in whole currency units
    #[serde(default)]
    pub price: u32,
    #[serde(default)]
    pub bedrooms: u8,
    #[serde(default)]
    pub bathrooms: u8,
    #[serde(default)]
    pub sqft: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_from: Option<NaiveDate>,
}

impl Record {
    /// Minimal record with only an id and title
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(id),
            title: title.into(),
            address: String::new(),
            price: 0,
            bedrooms: 0,
            bathrooms: 0,
            sqft: 0,
            description: String::new(),
            amenities: Vec::new(),
            images: Vec::new(),
            available_from: None,
        }
    }

    pub fn with_price(mut self, price: u32) -> Self {
        self.price = price;
        self
    }

    pub fn with_images<I, S>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.images = images.into_iter().map(Into::into).collect();
        self
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// One-line summary: "Title - $2,400/mo - 2 beds"
    pub fn summary(&self) -> String {
        let mut line = format!("{} - ${}/mo", self.title, group_thousands(self.price));
        if self.bedrooms > 0 {
            line.push_str(&format!(
                " - {} bed{}",
                self.bedrooms,
                if self.bedrooms == 1 { "" } else { "s" }
            ));
        }
        line
    }
}

fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_groups_price() {
        let mut record = Record::new("a", "Loft").with_price(12400);
        record.bedrooms = 2;
        assert_eq!(record.summary(), "Loft - $12,400/mo - 2 beds");
    }

    #[test]
    fn test_summary_single_bed() {
        let mut record = Record::new("a", "Studio").with_price(950);
        record.bedrooms = 1;
        assert_eq!(record.summary(), "Studio - $950/mo - 1 bed");
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let record: Record =
            serde_json::from_str(r#"{"id": "x1", "title": "Flat", "available_from": "2025-09-01"}"#)
                .unwrap();
        assert_eq!(record.id, RecordId::new("x1"));
        assert_eq!(record.image_count(), 0);
        assert_eq!(
            record.available_from,
            NaiveDate::from_ymd_opt(2025, 9, 1)
        );
    }
}
