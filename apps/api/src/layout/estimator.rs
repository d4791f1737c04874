//! Height estimation for a single question.
//!
//! Passage and match questions are charged the base height only, regardless of
//! how many sub-questions or match rows they carry. This undercounts long
//! passages; the paginator tolerates the resulting overflow.

use crate::layout::constants::LayoutConstants;
use crate::models::question::{QuestionKind, QuestionRecord};

/// Estimated vertical extent of `question`, excluding any section heading.
///
/// `is_first_on_page` suppresses the inter-question spacing.
pub fn estimate_question_height(
    question: &QuestionRecord,
    constants: &LayoutConstants,
    is_first_on_page: bool,
) -> f32 {
    let mut height = constants.question_base_height;

    if !is_first_on_page {
        height += constants.question_spacing;
    }

    if question.kind == QuestionKind::Mcq {
        let rows = option_rows(question.options.choice_count(), constants.options_per_row);
        height += rows as f32 * constants.option_row_height;
    }

    // Counted once even when the renderer shows the image in several spots.
    if question.has_image() {
        height += constants.image_height;
    }

    height
}

/// Number of rows `count` options wrap into at `per_row` columns.
pub fn option_rows(count: usize, per_row: u32) -> usize {
    let per_row = per_row.max(1) as usize;
    count.div_ceil(per_row)
}
