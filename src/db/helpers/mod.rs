use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::models::Sections;

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn sections_to_json(sections: &Sections) -> Result<String> {
    serde_json::to_string(sections).context("failed to serialize sections")
}

pub fn sections_from_json(value: &str) -> Result<Sections> {
    serde_json::from_str(value).context("failed to parse sections_json")
}
