//! Page Fill Analysis — how full each preview page is, and which pages overflow.
//!
//! Overflow only happens when a single question is taller than an empty page;
//! the paginator places it anyway rather than drop content. The preview UI uses
//! these verdicts to warn that the printed paper will spill.

use serde::{Deserialize, Serialize};

use crate::layout::paginator::Page;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PageFillVerdict {
    /// Content fits inside the page budget.
    Fits,
    /// Content is taller than the page budget.
    Overflow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageFillAnalysis {
    pub page_number: usize,
    pub used_height: f32,
    pub available_height: f32,
    /// `used / available`. `None` when content sits on a page with no usable
    /// height, where the ratio is unbounded.
    pub fill_ratio: Option<f32>,
    pub verdict: PageFillVerdict,
}

/// Whole-paper totals shown above the preview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperSummary {
    pub page_count: usize,
    pub question_count: usize,
    pub section_count: usize,
    pub total_marks: f64,
    pub overflowing_pages: Vec<usize>,
}

// ────────────────────────────────────────────────────────────────────────────
// Core functions
// ────────────────────────────────────────────────────────────────────────────

pub fn analyze_page_fill(page: &Page) -> PageFillAnalysis {
    let available = page.budget.max(0.0);
    let used = page.used_height;

    let fill_ratio = if available > 0.0 {
        Some(used / available)
    } else if used > 0.0 {
        None
    } else {
        Some(1.0)
    };

    let verdict = if used > available {
        PageFillVerdict::Overflow
    } else {
        PageFillVerdict::Fits
    };

    PageFillAnalysis {
        page_number: page.page_number,
        used_height: used,
        available_height: available,
        fill_ratio,
        verdict,
    }
}

pub fn summarize_paper(pages: &[Page]) -> PaperSummary {
    let question_count: usize = pages.iter().map(|p| p.questions.len()).sum();
    let section_count: usize = pages.iter().map(|p| p.section_headings().count()).sum();
    let total_marks: f64 = pages
        .iter()
        .flat_map(|p| p.questions.iter())
        .map(|q| q.question.marks)
        .sum();

    let overflowing_pages = pages
        .iter()
        .map(analyze_page_fill)
        .filter(|a| a.verdict == PageFillVerdict::Overflow)
        .map(|a| a.page_number)
        .collect();

    PaperSummary {
        page_count: pages.len(),
        question_count,
        section_count,
        total_marks,
        overflowing_pages,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
