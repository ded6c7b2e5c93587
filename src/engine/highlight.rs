//! Keyword highlighting for presentation.
//!
//! Keywords are marked one after another, each against the text left
//! unmarked by the keywords before it. A keyword that only occurs inside an
//! already-marked region is therefore never marked on its own, and a longer
//! keyword processed after a shorter one it contains may miss its match. Both
//! are known limitations of sequential marking.

use regex::Regex;
use serde::Serialize;

/// A run of text and whether it reads as one of the keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightSegment {
    pub text: String,
    pub is_keyword: bool,
}

struct Piece {
    text: String,
    marked: bool,
}

fn whole_word_matcher(keyword: &str) -> Option<Regex> {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(keyword))).ok()
}

fn mark_keyword(pieces: Vec<Piece>, matcher: &Regex) -> Vec<Piece> {
    let mut marked = Vec::with_capacity(pieces.len());
    for piece in pieces {
        if piece.marked {
            marked.push(piece);
            continue;
        }

        let mut cursor = 0;
        for found in matcher.find_iter(&piece.text) {
            if found.start() > cursor {
                marked.push(Piece {
                    text: piece.text[cursor..found.start()].to_string(),
                    marked: false,
                });
            }
            marked.push(Piece {
                text: found.as_str().to_string(),
                marked: true,
            });
            cursor = found.end();
        }
        if cursor < piece.text.len() {
            marked.push(Piece {
                text: piece.text[cursor..].to_string(),
                marked: false,
            });
        }
    }
    marked
}

/// Split `text` into keyword and non-keyword segments.
///
/// Matching is case-insensitive and whole-word. Keywords are matched
/// literally. A segment is flagged when its lowercase form equals a keyword's
/// lowercase form. Empty segments are dropped.
pub fn highlight<S: AsRef<str>>(text: &str, keywords: &[S]) -> Vec<HighlightSegment> {
    let mut pieces = vec![Piece {
        text: text.to_string(),
        marked: false,
    }];

    for keyword in keywords {
        let keyword = keyword.as_ref();
        if keyword.is_empty() {
            continue;
        }
        if let Some(matcher) = whole_word_matcher(keyword) {
            pieces = mark_keyword(pieces, &matcher);
        }
    }

    let lowered: Vec<String> = keywords
        .iter()
        .map(|keyword| keyword.as_ref().to_lowercase())
        .collect();

    pieces
        .into_iter()
        .filter(|piece| !piece.text.is_empty())
        .map(|piece| {
            let lower = piece.text.to_lowercase();
            HighlightSegment {
                is_keyword: lowered.iter().any(|keyword| *keyword == lower),
                text: piece.text,
            }
        })
        .collect()
}

/// Highlight each non-blank line of a section separately.
pub fn highlight_lines<S: AsRef<str>>(text: &str, keywords: &[S]) -> Vec<Vec<HighlightSegment>> {
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| highlight(line, keywords))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flagged(segments: &[HighlightSegment]) -> Vec<&str> {
        segments
            .iter()
            .filter(|segment| segment.is_keyword)
            .map(|segment| segment.text.as_str())
            .collect()
    }

    #[test]
    fn whole_word_case_insensitive() {
        let segments = highlight("Led team of 5 engineers", &["team", "lead"]);

        assert_eq!(flagged(&segments), vec!["team"]);
        assert_eq!(
            segments,
            vec![
                HighlightSegment { text: "Led ".into(), is_keyword: false },
                HighlightSegment { text: "team".into(), is_keyword: true },
                HighlightSegment { text: " of 5 engineers".into(), is_keyword: false },
            ]
        );
    }

    #[test]
    fn substrings_are_not_marked() {
        let segments = highlight("Teamwork and teams", &["team"]);
        assert!(flagged(&segments).is_empty());
    }

    #[test]
    fn every_occurrence_is_marked_and_original_case_kept() {
        let segments = highlight("Python scripts; PYTHON services", &["python"]);
        assert_eq!(flagged(&segments), vec!["Python", "PYTHON"]);
    }

    #[test]
    fn keywords_are_literal() {
        let segments = highlight("Worked with Node.js and Nodexjs", &["Node.js"]);
        assert_eq!(flagged(&segments), vec!["Node.js"]);
    }

    #[test]
    fn earlier_marks_shadow_later_keywords() {
        let segments = highlight("machine learning pipelines", &["machine learning", "learning"]);
        assert_eq!(flagged(&segments), vec!["machine learning"]);

        let reversed = highlight("machine learning pipelines", &["learning", "machine learning"]);
        assert_eq!(flagged(&reversed), vec!["learning"]);
    }

    #[test]
    fn no_keywords_yields_single_plain_segment() {
        let none: [&str; 0] = [];
        let segments = highlight("Built apps.", &none);
        assert_eq!(
            segments,
            vec![HighlightSegment { text: "Built apps.".into(), is_keyword: false }]
        );
    }

    #[test]
    fn lines_skip_blank_entries() {
        let lines = highlight_lines("Rust\n\n  \nSQL and Rust", &["Rust"]);
        assert_eq!(lines.len(), 2);
        assert_eq!(flagged(&lines[1]), vec!["Rust"]);
    }
}
