use chrono::NaiveDate;
use serde::Serialize;

/// Message shown when a report slot has no generator yet.
pub const COMING_SOON: &str = "The content of this report will be added soon.";

/// Message shown for report identifiers with no registered report.
pub const NOT_CONFIGURED: &str = "This report has not been configured yet.";

/// One labelled figure of a summary report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryMetric {
    pub label: String,
    pub value: String,
}

impl SummaryMetric {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// End-of-day figures for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub metrics: Vec<SummaryMetric>,
}

/// Non-tabular content rendered alongside (or instead of) the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportContent {
    /// Empty-state or placeholder text.
    Message { text: String },
    DaySummary(DaySummary),
}

/// A rendered report view. Recomputed on every invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportResult {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub content: Option<ReportContent>,
}

impl ReportResult {
    pub fn table(title: impl Into<String>, headers: &[&str], rows: Vec<Vec<String>>) -> Self {
        Self {
            title: title.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
            content: None,
        }
    }

    /// A result carrying only a message (empty state, placeholder).
    pub fn message(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            headers: Vec::new(),
            rows: Vec::new(),
            content: Some(ReportContent::Message { text: text.into() }),
        }
    }

    pub fn day_summary(title: impl Into<String>, summary: DaySummary) -> Self {
        Self {
            title: title.into(),
            headers: Vec::new(),
            rows: Vec::new(),
            content: Some(ReportContent::DaySummary(summary)),
        }
    }

    /// Message text, if this result is a message.
    pub fn message_text(&self) -> Option<&str> {
        match &self.content {
            Some(ReportContent::Message { text }) => Some(text),
            _ => None,
        }
    }

    pub fn is_message(&self) -> bool {
        self.message_text().is_some()
    }
}
