use std::str::FromStr;

use anyhow::{Context, Result};

use crate::layout::constants::{default_layout_constants, LayoutConstants};

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on questions accepted by a single preview request.
    pub max_questions_per_paper: usize,
    /// Default layout table, A4 unless overridden through `LAYOUT_*`.
    pub layout: LayoutConstants,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let layout = layout_from_env()?;
        layout
            .validate()
            .context("LAYOUT_* environment variables describe an invalid layout")?;

        Ok(Config {
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_questions_per_paper: env_or("MAX_QUESTIONS_PER_PAPER", 500)?,
            layout,
        })
    }
}

fn layout_from_env() -> Result<LayoutConstants> {
    let d = default_layout_constants();
    Ok(LayoutConstants {
        page_height: env_or("LAYOUT_PAGE_HEIGHT", d.page_height)?,
        page_width: env_or("LAYOUT_PAGE_WIDTH", d.page_width)?,
        page_margin: env_or("LAYOUT_PAGE_MARGIN", d.page_margin)?,
        header_height: env_or("LAYOUT_HEADER_HEIGHT", d.header_height)?,
        section_title_height: env_or("LAYOUT_SECTION_TITLE_HEIGHT", d.section_title_height)?,
        question_base_height: env_or("LAYOUT_QUESTION_BASE_HEIGHT", d.question_base_height)?,
        option_row_height: env_or("LAYOUT_OPTION_ROW_HEIGHT", d.option_row_height)?,
        options_per_row: env_or("LAYOUT_OPTIONS_PER_ROW", d.options_per_row)?,
        image_height: env_or("LAYOUT_IMAGE_HEIGHT", d.image_height)?,
        question_spacing: env_or("LAYOUT_QUESTION_SPACING", d.question_spacing)?,
    })
}

/// Reads and parses `key`, falling back to `default` when unset.
fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
