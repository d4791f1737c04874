// Paper layout: turns a flat question list into paginated A4 preview pages.
// Everything except `handlers` is pure and synchronous.

pub mod constants;
pub mod estimator;
pub mod handlers;
pub mod ingest;
pub mod page_fill;
pub mod paginator;
pub mod sections;

// Re-export the public API consumed by other modules (routes, state).
pub use constants::LayoutConstants;
pub use paginator::{paginate, Page};
