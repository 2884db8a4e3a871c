//! Presentation adapters.
//!
//! The session only ever talks to a `Presenter`; what "rendering" means is up
//! to the implementation. `TextPresenter` prints aligned text tables,
//! `RecordingPresenter` keeps everything it was asked to show.

use std::io::Write;
use std::sync::{Arc, Mutex};

use posreports_reports::format::local_date;
use posreports_reports::{ReportContent, ReportResult};

/// Sink for rendered reports.
pub trait Presenter: Send + Sync {
    /// Show `result`, replacing whatever was shown before.
    fn render_report(&self, result: &ReportResult);

    /// Remove the current report from view.
    fn clear(&self);
}

impl<P> Presenter for Arc<P>
where
    P: Presenter + ?Sized,
{
    fn render_report(&self, result: &ReportResult) {
        (**self).render_report(result)
    }

    fn clear(&self) {
        (**self).clear()
    }
}

/// Writes reports as plain text to any `io::Write`.
#[derive(Debug)]
pub struct TextPresenter<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> TextPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl TextPresenter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> Presenter for TextPresenter<W> {
    fn render_report(&self, result: &ReportResult) {
        let text = render_text(result);
        let Ok(mut out) = self.out.lock() else {
            tracing::warn!("presenter output lock poisoned; report dropped");
            return;
        };
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            tracing::warn!(error = %e, "failed to write report");
        }
    }

    // Written output cannot be taken back.
    fn clear(&self) {}
}

/// Plain-text rendering of a report: title, optional content block, table.
pub fn render_text(result: &ReportResult) -> String {
    let mut out = String::new();
    out.push_str(&result.title);
    out.push('\n');
    out.push_str(&"=".repeat(result.title.chars().count()));
    out.push('\n');

    match &result.content {
        Some(ReportContent::Message { text }) => {
            out.push_str(text);
            out.push('\n');
        }
        Some(ReportContent::DaySummary(summary)) => {
            out.push_str(&format!("Date: {}\n", local_date(summary.date)));
            let width = summary
                .metrics
                .iter()
                .map(|m| m.label.chars().count())
                .max()
                .unwrap_or(0);
            for metric in &summary.metrics {
                out.push_str(&format!("{}: {}\n", pad(&metric.label, width), metric.value));
            }
        }
        None => {}
    }

    if !result.headers.is_empty() {
        out.push_str(&render_table(&result.headers, &result.rows));
    }
    out
}

fn pad(cell: &str, width: usize) -> String {
    let len = cell.chars().count();
    format!("{cell}{}", " ".repeat(width.saturating_sub(len)))
}

fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let columns = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(columns) {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| -> String {
        let padded: Vec<String> = (0..columns)
            .map(|idx| pad(cells.get(idx).map(String::as_str).unwrap_or(""), widths[idx]))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = line(headers);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("{}\n", rule.join("  ")));
    for row in rows {
        out.push_str(&line(row));
    }
    out
}

/// One call made on a [`RecordingPresenter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterEvent {
    Rendered(ReportResult),
    Cleared,
}

/// Presenter that records every call, for embedding and tests.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    events: Mutex<Vec<PresenterEvent>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PresenterEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Every rendered report, oldest first.
    pub fn rendered(&self) -> Vec<ReportResult> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                PresenterEvent::Rendered(result) => Some(result),
                PresenterEvent::Cleared => None,
            })
            .collect()
    }

    pub fn last_rendered(&self) -> Option<ReportResult> {
        self.rendered().pop()
    }

    fn push(&self, event: PresenterEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Presenter for RecordingPresenter {
    fn render_report(&self, result: &ReportResult) {
        self.push(PresenterEvent::Rendered(result.clone()));
    }

    fn clear(&self) {
        self.push(PresenterEvent::Cleared);
    }
}
