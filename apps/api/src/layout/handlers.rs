//! Axum route handlers for the paper preview API.
//!
//! Pagination itself is synchronous; the preview handler runs it inside
//! `tokio::task::spawn_blocking` so a large paper never stalls other requests.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::layout::ingest::{sanitize_questions, RawQuestion};
use crate::layout::page_fill::{analyze_page_fill, summarize_paper, PageFillAnalysis, PaperSummary};
use crate::layout::paginator::flatten;
use crate::layout::{paginate, LayoutConstants, Page};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub questions: Vec<RawQuestion>,
    /// Replaces the server's default table for this request only.
    #[serde(default)]
    pub layout: Option<LayoutConstants>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub preview_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub layout: LayoutConstants,
    pub pages: Vec<Page>,
    pub page_fill: Vec<PageFillAnalysis>,
    pub summary: PaperSummary,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/papers/preview
///
/// Sanitizes the raw question list and lays it out onto A4 pages.
pub async fn handle_preview(
    State(state): State<AppState>,
    payload: Result<Json<PreviewRequest>, JsonRejection>,
) -> Result<Json<PreviewResponse>, AppError> {
    let Json(request) = payload?;
    let limit = state.config.max_questions_per_paper;
    if request.questions.len() > limit {
        return Err(AppError::Validation(format!(
            "a paper may contain at most {limit} questions (got {})",
            request.questions.len()
        )));
    }

    let layout = match request.layout {
        Some(custom) => {
            custom.validate()?;
            custom
        }
        None => state.default_layout().clone(),
    };

    // Ingestion and packing are CPU-bound; keep them off the async executor.
    let raw = request.questions;
    let table = layout.clone();
    let pages: Vec<Page> = tokio::task::spawn_blocking(move || {
        let questions = sanitize_questions(raw);
        let pages = paginate(&questions, &table);
        debug_assert_eq!(flatten(&pages).len(), questions.len());
        pages
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in pagination: {e}")))?;

    let page_fill: Vec<PageFillAnalysis> = pages.iter().map(analyze_page_fill).collect();
    let summary = summarize_paper(&pages);

    let preview_id = Uuid::new_v4();
    info!(
        %preview_id,
        questions = summary.question_count,
        pages = summary.page_count,
        sections = summary.section_count,
        "Paper preview laid out"
    );
    if !summary.overflowing_pages.is_empty() {
        warn!(
            %preview_id,
            pages = ?summary.overflowing_pages,
            "Paper preview has questions taller than a page"
        );
    }

    Ok(Json(PreviewResponse {
        preview_id,
        generated_at: Utc::now(),
        layout,
        pages,
        page_fill,
        summary,
    }))
}

/// GET /api/v1/layout/constants
pub async fn handle_layout_constants(State(state): State<AppState>) -> Json<LayoutConstants> {
    Json(state.default_layout().clone())
}
