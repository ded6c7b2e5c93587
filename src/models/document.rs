//! Document model: the full resume text plus its named sections.
//!
//! Section keys are lowercased on every read and write. Iteration and
//! serialization follow the canonical resume order, with unrecognised keys
//! after it in the order they were first written.

use std::fmt;

use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};
use uuid::Uuid;

/// Canonical display and serialization order for resume sections.
pub const SECTION_ORDER: [&str; 7] = [
    "contact",
    "summary",
    "experience",
    "education",
    "skills",
    "projects",
    "certifications",
];

pub fn normalize_section_key(key: &str) -> String {
    key.to_lowercase()
}

/// Human-readable heading for a section key.
pub fn section_title(key: &str) -> String {
    let title = match normalize_section_key(key).as_str() {
        "contact" => "Contact Information",
        "summary" => "Professional Summary",
        "experience" => "Work Experience",
        "education" => "Education",
        "skills" => "Skills",
        "projects" => "Projects",
        "certifications" => "Certifications",
        _ => return key.to_string(),
    };
    title.to_string()
}

fn canonical_rank(key: &str) -> Option<usize> {
    SECTION_ORDER.iter().position(|candidate| *candidate == key)
}

/// Generate a fresh document id for documents that arrive without one.
pub fn new_document_id() -> String {
    Uuid::new_v4().to_string()
}

/// Ordered mapping of normalized section key to section text.
#[derive(Debug, Clone, Default)]
pub struct Sections {
    entries: Vec<(String, String)>,
}

impl Sections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let key = normalize_section_key(key);
        self.entries
            .iter()
            .find(|(existing, _)| *existing == key)
            .map(|(_, text)| text.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Write a section, creating it if it does not exist yet.
    pub fn set(&mut self, key: &str, text: impl Into<String>) {
        let key = normalize_section_key(key);
        let text = text.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = text,
            None => self.entries.push((key, text)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in canonical order, unrecognised keys last in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        let canonical = SECTION_ORDER
            .iter()
            .filter_map(move |key| self.get(key).map(|text| (*key, text)));
        let extra = self
            .entries
            .iter()
            .filter(|(key, _)| canonical_rank(key).is_none())
            .map(|(key, text)| (key.as_str(), text.as_str()));
        canonical.chain(extra)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(key, _)| key)
    }
}

impl PartialEq for Sections {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(key, text)| other.get(key) == Some(text.as_str()))
    }
}

impl Eq for Sections {}

impl<K, V> FromIterator<(K, V)> for Sections
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut sections = Sections::new();
        for (key, text) in iter {
            sections.set(key.as_ref(), text);
        }
        sections
    }
}

impl Serialize for Sections {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, text) in self.iter() {
            map.serialize_entry(key, text)?;
        }
        map.end()
    }
}

struct SectionsVisitor;

impl<'de> Visitor<'de> for SectionsVisitor {
    type Value = Sections;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of section name to section text")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut sections = Sections::new();
        while let Some((key, text)) = access.next_entry::<String, String>()? {
            sections.set(&key, text);
        }
        Ok(sections)
    }
}

impl<'de> Deserialize<'de> for Sections {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SectionsVisitor)
    }
}

/// A section prepared for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionView {
    pub key: String,
    pub title: String,
    pub content: String,
}

/// Canonical document state: free text plus named sections.
///
/// The two halves are kept in sync on a best-effort basis only. Manual edits
/// to one side are not mirrored into the other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, alias = "full_text")]
    full_text: String,
    #[serde(default)]
    sections: Sections,
}

impl Document {
    pub fn new(full_text: impl Into<String>, sections: Sections) -> Self {
        Self {
            full_text: full_text.into(),
            sections,
        }
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    pub fn set_full_text(&mut self, text: impl Into<String>) {
        self.full_text = text.into();
    }

    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    pub fn section(&self, key: &str) -> Option<&str> {
        self.sections.get(key)
    }

    pub fn set_section(&mut self, key: &str, text: impl Into<String>) {
        self.sections.set(key, text);
    }

    pub fn replace_sections(&mut self, sections: Sections) {
        self.sections = sections;
    }

    /// Join every non-empty section in canonical order with a blank line.
    pub fn rebuild_full_text(&self) -> String {
        self.sections
            .iter()
            .filter(|(_, text)| !text.is_empty())
            .map(|(_, text)| text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Non-blank sections in canonical order, each with its display title.
    pub fn display_sections(&self) -> Vec<SectionView> {
        self.sections
            .iter()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(key, text)| SectionView {
                key: key.to_string(),
                title: section_title(key),
                content: text.to_string(),
            })
            .collect()
    }
}
