//! Layout constants — the fixed height budget table behind every page estimate.
//!
//! All lengths are CSS pixels at 96 dpi, so an A4 sheet is 794 × 1123. The
//! numbers are heuristics tuned against the browser preview, not measured glyph
//! metrics: pagination is approximate by nature.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A4 portrait at 96 dpi.
pub const A4_HEIGHT_PX: f32 = 1123.0;
pub const A4_WIDTH_PX: f32 = 794.0;

/// Height budget table for one paper layout.
///
/// `page_margin` is the total vertical margin subtracted once per page.
/// `header_height` is reserved on the first page only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConstants {
    pub page_height: f32,
    pub page_width: f32,
    pub page_margin: f32,
    /// School / exam title block at the top of page 1.
    pub header_height: f32,
    /// Section heading such as "A) Multiple Choice Questions".
    pub section_title_height: f32,
    /// One line of question text.
    pub question_base_height: f32,
    pub option_row_height: f32,
    /// MCQ options wrap into rows of this many columns.
    pub options_per_row: u32,
    /// Fixed image block, independent of the real image dimensions.
    pub image_height: f32,
    /// Gap between consecutive questions on the same page.
    pub question_spacing: f32,
}

impl Default for LayoutConstants {
    fn default() -> Self {
        default_layout_constants()
    }
}

/// Returns the default A4 preview constants.
pub fn default_layout_constants() -> LayoutConstants {
    LayoutConstants {
        page_height: A4_HEIGHT_PX,
        page_width: A4_WIDTH_PX,
        page_margin: 76.0,
        header_height: 180.0,
        section_title_height: 40.0,
        question_base_height: 40.0,
        option_row_height: 28.0,
        options_per_row: 2,
        image_height: 200.0,
        question_spacing: 16.0,
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("{field} must be a finite, non-negative number (got {value})")]
    InvalidLength { field: &'static str, value: f32 },

    #[error("options_per_row must be at least 1")]
    ZeroOptionColumns,
}

impl LayoutConstants {
    /// Height available on the first page, after the header and margin.
    ///
    /// May be zero or negative for degenerate tables; the paginator then puts
    /// every question on its own page.
    pub fn first_page_budget(&self) -> f32 {
        self.page_height - self.header_height - self.page_margin
    }

    /// Height available on every continuation page.
    pub fn continuation_page_budget(&self) -> f32 {
        self.page_height - self.page_margin
    }

    /// Rejects tables the estimator cannot work with. Degenerate but
    /// well-formed tables (e.g. header taller than the page) pass.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let lengths = [
            ("page_height", self.page_height),
            ("page_width", self.page_width),
            ("page_margin", self.page_margin),
            ("header_height", self.header_height),
            ("section_title_height", self.section_title_height),
            ("question_base_height", self.question_base_height),
            ("option_row_height", self.option_row_height),
            ("image_height", self.image_height),
            ("question_spacing", self.question_spacing),
        ];
        for (field, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvalidLength { field, value });
            }
        }
        if self.options_per_row == 0 {
            return Err(LayoutError::ZeroOptionColumns);
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants_are_valid() {
        let constants = default_layout_constants();
        assert!(constants.validate().is_ok());
        assert_eq!(constants.page_height, A4_HEIGHT_PX);
        assert_eq!(constants.options_per_row, 2);
    }

    #[test]
    fn test_budgets_reserve_header_on_first_page_only() {
        let constants = default_layout_constants();
        let first = constants.first_page_budget();
        let next = constants.continuation_page_budget();
        assert!((next - first - constants.header_height).abs() < 1e-3);
        assert!((next - (1123.0 - 76.0)).abs() < 1e-3);
    }

    #[test]
    fn test_negative_length_rejected() {
        let constants = LayoutConstants {
            image_height: -1.0,
            ..default_layout_constants()
        };
        assert_eq!(
            constants.validate(),
            Err(LayoutError::InvalidLength {
                field: "image_height",
                value: -1.0
            })
        );
    }

    #[test]
    fn test_nan_length_rejected() {
        let constants = LayoutConstants {
            page_height: f32::NAN,
            ..default_layout_constants()
        };
        assert!(matches!(
            constants.validate(),
            Err(LayoutError::InvalidLength { field: "page_height", .. })
        ));
    }

    #[test]
    fn test_zero_option_columns_rejected() {
        let constants = LayoutConstants {
            options_per_row: 0,
            ..default_layout_constants()
        };
        assert_eq!(constants.validate(), Err(LayoutError::ZeroOptionColumns));
    }

    #[test]
    fn test_degenerate_header_still_valid() {
        let constants = LayoutConstants {
            page_height: 100.0,
            header_height: 300.0,
            ..default_layout_constants()
        };
        assert!(constants.validate().is_ok());
        assert!(constants.first_page_budget() < 0.0);
    }
}
