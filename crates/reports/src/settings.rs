use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};

/// Default reporting offset: shops operate on UTC+03:00.
pub const DEFAULT_UTC_OFFSET_SECS: i32 = 3 * 3600;

/// Rows shown by ranking reports.
pub const DEFAULT_RANKING_LIMIT: usize = 20;

/// Days covered by the revenue & profit by day report.
pub const DEFAULT_PERIOD_DAYS: u32 = 30;

/// Longest period configuration accepts: ten years and change.
pub const MAX_PERIOD_DAYS: u32 = 3660;

pub const DEFAULT_CURRENCY: &str = "TL";

/// Presentation and calendar settings shared by all reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSettings {
    /// Label appended to currency amounts.
    pub currency: String,
    /// Offset used to decide which calendar day a timestamp belongs to.
    pub utc_offset: FixedOffset,
    pub ranking_limit: usize,
    pub period_days: u32,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            utc_offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix()),
            ranking_limit: DEFAULT_RANKING_LIMIT,
            period_days: DEFAULT_PERIOD_DAYS,
        }
    }
}

impl ReportSettings {
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    pub fn with_ranking_limit(mut self, limit: usize) -> Self {
        self.ranking_limit = limit;
        self
    }

    pub fn with_period_days(mut self, days: u32) -> Self {
        self.period_days = days.max(1);
        self
    }

    /// Calendar date of `instant` in the reporting offset.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.utc_offset).date_naive()
    }

    /// Inclusive UTC bounds of `date` in the reporting offset:
    /// local 00:00:00.000 through local 23:59:59.999.
    pub fn day_window(&self, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let local_midnight = date.and_time(NaiveTime::MIN);
        let offset = Duration::seconds(i64::from(self.utc_offset.local_minus_utc()));
        let start = (local_midnight - offset).and_utc();
        let end = start + Duration::days(1) - Duration::milliseconds(1);
        (start, end)
    }
}
