//! Section headings: "A) Multiple Choice Questions", "B) True or False", ...

use serde::{Deserialize, Serialize};

use crate::models::question::QuestionKind;

/// Heading rendered immediately before the first question of a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionHeading {
    /// "A", "B", ..., "Z", "AA", "AB", ...
    pub letter: String,
    pub kind: QuestionKind,
    pub title: String,
    /// Rendered form, e.g. "A) Multiple Choice Questions".
    pub label: String,
}

impl SectionHeading {
    /// Heading for the section at 0-based `index` in document order.
    pub fn new(index: usize, kind: &QuestionKind) -> Self {
        let letter = section_letter(index);
        let title = kind.section_title();
        SectionHeading {
            label: format!("{letter}) {title}"),
            letter,
            kind: kind.clone(),
            title,
        }
    }
}

/// Spreadsheet-style lettering of a 0-based section index.
pub fn section_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}
