//! Paginator — greedy forward-only packing of questions onto A4 pages.
//!
//! # Rules
//! - Questions are never reordered, dropped, or duplicated.
//! - A section starts whenever the question kind differs from the previous
//!   question in document order, across page boundaries.
//! - A section heading is charged to the page that renders it and always sits
//!   on the same page as the question that introduced it.
//! - A question too tall for an empty page is placed alone and overflows.

use serde::{Deserialize, Serialize};

use crate::layout::constants::LayoutConstants;
use crate::layout::estimator::estimate_question_height;
use crate::layout::sections::SectionHeading;
use crate::models::question::{QuestionKind, QuestionRecord};

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// A question as positioned on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedQuestion {
    pub question: QuestionRecord,
    /// True exactly when `section_heading` is present.
    pub starts_section: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_heading: Option<SectionHeading>,
    /// Height charged to the page for the question itself, excluding the heading.
    pub estimated_height: f32,
}

/// One A4 page of the preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based.
    pub page_number: usize,
    pub is_first_page: bool,
    /// Height available for questions and headings on this page.
    pub budget: f32,
    /// Height charged so far, headings included. Exceeds `budget` only for a
    /// lone oversized question.
    pub used_height: f32,
    pub questions: Vec<PlacedQuestion>,
}

impl Page {
    fn open(page_number: usize, constants: &LayoutConstants) -> Self {
        let is_first_page = page_number == 1;
        let budget = if is_first_page {
            constants.first_page_budget()
        } else {
            constants.continuation_page_budget()
        };
        Page {
            page_number,
            is_first_page,
            budget,
            used_height: 0.0,
            questions: Vec::new(),
        }
    }

    pub fn remaining_height(&self) -> f32 {
        self.budget - self.used_height
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn section_headings(&self) -> impl Iterator<Item = &SectionHeading> {
        self.questions.iter().filter_map(|q| q.section_heading.as_ref())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pagination
// ────────────────────────────────────────────────────────────────────────────

/// Running state threaded through the single forward pass.
struct PackState<'a> {
    pages: Vec<Page>,
    current: Page,
    previous_kind: Option<&'a QuestionKind>,
    sections_opened: usize,
}

/// Splits `questions` into pages. Total over well-formed input; empty input
/// yields no pages.
pub fn paginate(questions: &[QuestionRecord], constants: &LayoutConstants) -> Vec<Page> {
    let initial = PackState {
        pages: Vec::new(),
        current: Page::open(1, constants),
        previous_kind: None,
        sections_opened: 0,
    };

    let mut state = questions
        .iter()
        .fold(initial, |state, question| place(state, question, constants));

    if !state.current.is_empty() {
        state.pages.push(state.current);
    }
    state.pages
}

fn place<'a>(
    mut state: PackState<'a>,
    question: &'a QuestionRecord,
    constants: &LayoutConstants,
) -> PackState<'a> {
    let starts_section = state.previous_kind != Some(&question.kind);
    let heading_height = if starts_section {
        constants.section_title_height
    } else {
        0.0
    };

    let mut height =
        estimate_question_height(question, constants, state.current.is_empty());

    if height + heading_height > state.current.remaining_height() && !state.current.is_empty() {
        let next = Page::open(state.current.page_number + 1, constants);
        let full = std::mem::replace(&mut state.current, next);
        state.pages.push(full);
        // First on the fresh page, so no spacing above it.
        height = estimate_question_height(question, constants, true);
    }

    let section_heading = if starts_section {
        let heading = SectionHeading::new(state.sections_opened, &question.kind);
        state.sections_opened += 1;
        Some(heading)
    } else {
        None
    };

    state.current.used_height += height + heading_height;
    state.current.questions.push(PlacedQuestion {
        question: question.clone(),
        starts_section,
        section_heading,
        estimated_height: height,
    });
    state.previous_kind = Some(&question.kind);
    state
}

/// Flattens pages back into document order.
pub fn flatten(pages: &[Page]) -> Vec<&QuestionRecord> {
    pages
        .iter()
        .flat_map(|p| p.questions.iter().map(|q| &q.question))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
