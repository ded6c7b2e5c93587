use crate::models::{normalize_section_key, Document, Suggestion};

/// What a single application actually touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchReport {
    /// `original` was found in the full text and replaced.
    pub full_text_replaced: bool,
    /// `original` was found in the target section and replaced.
    pub section_replaced: bool,
    /// The suggestion was an addition and the section did not exist yet.
    pub section_created: bool,
    /// The suggestion was an addition.
    pub appended: bool,
}

impl PatchReport {
    /// A replacement that found `original` in neither the full text nor the section.
    pub fn missed(&self) -> bool {
        !self.appended && !self.full_text_replaced && !self.section_replaced
    }
}

/// Replace the first literal occurrence of `needle`. `None` when absent.
///
/// `needle` is never interpreted as a pattern.
pub fn replace_first(haystack: &str, needle: &str, replacement: &str) -> Option<String> {
    if needle.is_empty() {
        return None;
    }
    let start = haystack.find(needle)?;
    let mut patched =
        String::with_capacity(haystack.len() - needle.len() + replacement.len());
    patched.push_str(&haystack[..start]);
    patched.push_str(replacement);
    patched.push_str(&haystack[start + needle.len()..]);
    Some(patched)
}

/// Apply one suggestion to a document.
///
/// A suggestion without `suggested` text returns the document unchanged;
/// callers check [`Suggestion::is_actionable`] to report it as skipped.
pub fn apply_suggestion(document: &Document, suggestion: &Suggestion) -> Document {
    apply_suggestion_with_report(document, suggestion).0
}

pub fn apply_suggestion_with_report(
    document: &Document,
    suggestion: &Suggestion,
) -> (Document, PatchReport) {
    let mut patched = document.clone();
    let mut report = PatchReport::default();

    if !suggestion.is_actionable() {
        return (patched, report);
    }

    let key = normalize_section_key(&suggestion.section);
    let original = suggestion
        .original
        .as_deref()
        .filter(|text| !text.trim().is_empty());

    match original {
        Some(original) => {
            // Full text and section are patched independently; they may have drifted apart.
            if let Some(text) = replace_first(patched.full_text(), original, &suggestion.suggested) {
                patched.set_full_text(text);
                report.full_text_replaced = true;
            }

            if !key.is_empty() {
                let section_text = patched
                    .section(&key)
                    .and_then(|section| replace_first(section, original, &suggestion.suggested));
                if let Some(text) = section_text {
                    patched.set_section(&key, text);
                    report.section_replaced = true;
                }
            }
        }
        None => {
            report.appended = true;

            if !key.is_empty() {
                let section_text = match patched.section(&key) {
                    Some(existing) if !existing.is_empty() => {
                        format!("{}\n{}", existing, suggestion.suggested)
                    }
                    _ => {
                        report.section_created = true;
                        suggestion.suggested.clone()
                    }
                };
                patched.set_section(&key, section_text);
            }

            let full_text = format!("{}\n\n{}", patched.full_text(), suggestion.suggested);
            patched.set_full_text(full_text);
        }
    }

    (patched, report)
}

/// Fold [`apply_suggestion`] over `suggestions` in order.
pub fn apply_all<'a, I>(document: &Document, suggestions: I) -> Document
where
    I: IntoIterator<Item = &'a Suggestion>,
{
    suggestions
        .into_iter()
        .fold(document.clone(), |current, suggestion| {
            apply_suggestion(&current, suggestion)
        })
}
