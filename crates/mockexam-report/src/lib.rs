//! mockexam-report: Text and HTML renderings of finished sessions.

pub mod html;
pub mod text;
pub mod writer;

#[cfg(test)]
mod fixtures;

pub use html::{generate_html, write_html_report};
pub use text::{format_clock, format_elapsed, option_label, render_palette, render_text};
pub use writer::{ReportFormat, ReportWriter};
