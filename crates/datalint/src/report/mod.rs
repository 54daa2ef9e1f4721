//! Read-only renderings of a validation log.

mod markdown;

pub use markdown::{render_detailed_markdown, render_summary_markdown};
