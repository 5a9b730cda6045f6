//! Ariadne-based rendering of parse diagnostics.
//!
//! Presentation only: the sanitized `message` string is the contract, and
//! this module dresses it up with a labeled source snippet for CLI and
//! test output. Output is colorless so it stays deterministic.

use std::ops::Range;

use ariadne::{Config, Label, Report, ReportKind, Source};

use cal_common::LineIndex;

use crate::error::ParseError;

/// Render one parse error against its source into a formatted string.
pub fn render_diagnostic(error: &ParseError, source: &str) -> String {
    let config = Config::default().with_color(false);
    let index = LineIndex::new(source);

    let start = index.offset(error.token.line, error.token.column) as usize;
    let span = non_empty_span(start, source.len());

    let mut builder = Report::build(ReportKind::Error, span.clone())
        .with_message(&error.message)
        .with_config(config);
    if let Some(code) = error.code {
        builder = builder.with_code(code);
    }
    builder.add_label(Label::new(span).with_message(&error.message));
    let report = builder.finish();

    let mut buf = Vec::new();
    report
        .write(Source::from(source), &mut buf)
        .expect("failed to write diagnostic");
    String::from_utf8(buf).expect("diagnostic output should be valid UTF-8")
}

/// Render every error in source order, separated by blank lines.
pub fn render_all(errors: &[ParseError], source: &str) -> String {
    errors
        .iter()
        .map(|e| render_diagnostic(e, source))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Ariadne needs at least a one-character span; clamp to source bounds.
fn non_empty_span(start: usize, len: usize) -> Range<usize> {
    let start = start.min(len);
    let end = start.saturating_add(1).min(len).max(start);
    start..end
}
