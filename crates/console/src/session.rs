//! Report session: hub/display navigation, the active report and the shop
//! filter it reads under.
//!
//! Every generation cycle takes a ticket from the session's generation
//! counter before fetching. When the fetch completes the result is painted
//! only if that ticket is still the latest; anything else (a newer cycle, or
//! `back()`) makes it stale and it is dropped.
//!
//! Rows fetched by the last painted cycle are kept while the filter stays the
//! same, so a date change re-aggregates them without another round trip.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use thiserror::Error;

use posreports_auth::RoleProvider;
use posreports_infra::{ReportSource, fetch_report_data, fetch_shops};
use posreports_products::Shop;
use posreports_reports::{
    ReportData, ReportKind, ReportRequest, ReportResult, ReportSelection, ReportSettings, ShopFilter,
    ShopOption,
};

use crate::context::ShopContext;
use crate::presenter::Presenter;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("role '{0}' cannot change the shop filter")]
    FilterLocked(String),
}

/// Which screen the session is on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum View {
    /// Report cards; nothing is generated here.
    Hub,
    /// One report, re-generated on filter or date change.
    Display,
}

#[derive(Debug)]
struct SessionState {
    view: View,
    active: Option<ReportSelection>,
    filter: ShopFilter,
    date: NaiveDate,
    options: Vec<ShopOption>,
    generation: u64,
    fetched: Option<FetchedRows>,
}

/// Rows behind the last painted cycle and the filter they were read under.
#[derive(Debug)]
struct FetchedRows {
    filter: ShopFilter,
    data: Arc<ReportData>,
}

/// Data a generation cycle needs, captured under the lock.
struct Cycle {
    selection: ReportSelection,
    filter: ShopFilter,
    request: ReportRequest,
    ticket: u64,
}

pub struct ReportSession<S, P, R> {
    source: S,
    presenter: P,
    roles: R,
    current_shop: Option<Shop>,
    settings: ReportSettings,
    state: Mutex<SessionState>,
}

impl<S, P, R> ReportSession<S, P, R>
where
    S: ReportSource,
    P: Presenter,
    R: RoleProvider,
{
    /// New session on the hub, filtered to the operator's shop (or the
    /// overview when none is known), reporting on `date`.
    pub fn new(
        source: S,
        presenter: P,
        roles: R,
        current_shop: Option<Shop>,
        settings: ReportSettings,
        date: NaiveDate,
    ) -> Self {
        let filter = ShopContext::new(roles.current_role(), current_shop.clone()).default_filter();
        Self {
            source,
            presenter,
            roles,
            current_shop,
            settings,
            state: Mutex::new(SessionState {
                view: View::Hub,
                active: None,
                filter,
                date,
                options: Vec::new(),
                generation: 0,
                fetched: None,
            }),
        }
    }

    // A presenter that panicked mid-paint left the state consistent: the
    // ticket check had already passed and nothing is written after painting.
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("session state lock poisoned; recovering");
            self.state.clear_poison();
            poisoned.into_inner()
        })
    }

    /// Role and shop as of now. The role is looked up on every call.
    pub fn context(&self) -> ShopContext {
        ShopContext::new(self.roles.current_role(), self.current_shop.clone())
    }

    /// Reports offered on the hub.
    pub fn hub(&self) -> &'static [ReportKind] {
        &ReportKind::ALL
    }

    pub fn view(&self) -> View {
        self.lock().view
    }

    pub fn active(&self) -> Option<ReportSelection> {
        self.lock().active.clone()
    }

    pub fn filter(&self) -> ShopFilter {
        self.lock().filter
    }

    pub fn date(&self) -> NaiveDate {
        self.lock().date
    }

    /// Options last loaded by [`Self::load_shop_options`].
    pub fn shop_options(&self) -> Vec<ShopOption> {
        self.lock().options.clone()
    }

    /// Populate the shop control. Roles that cannot choose a shop get no
    /// options and no shop query is made.
    pub async fn load_shop_options(&self) -> Result<Vec<ShopOption>, SessionError> {
        let context = self.context();
        let options = if context.can_choose_shop() {
            context.options(&fetch_shops(&self.source).await)
        } else {
            Vec::new()
        };
        self.lock().options = options.clone();
        Ok(options)
    }

    /// Hub → Display: make `report_id` the active report and generate it.
    ///
    /// Unknown identifiers become an active placeholder rather than an error.
    /// Returns the painted result, or `None` if a newer cycle superseded it.
    pub async fn open(&self, report_id: &str) -> Result<Option<ReportResult>, SessionError> {
        let selection = ReportSelection::resolve(report_id);
        if selection.kind().is_none() {
            tracing::warn!(report = report_id, "unknown report identifier");
        }
        {
            let mut state = self.lock();
            state.view = View::Display;
            state.active = Some(selection);
        }
        self.run_active().await
    }

    /// Switch the shop filter and re-run the active report, if any.
    pub async fn change_shop(&self, filter: ShopFilter) -> Result<Option<ReportResult>, SessionError> {
        let role = self.roles.current_role();
        if !role.can_choose_shop() {
            return Err(SessionError::FilterLocked(role.to_string()));
        }
        self.lock().filter = filter;
        tracing::debug!(%filter, "shop filter changed");
        self.run_active().await
    }

    /// Switch the report date.
    ///
    /// A report that reads the date is regenerated from the rows already
    /// fetched under the current filter; it only goes back to the backend
    /// when there are none. Reports that ignore the date are left as painted.
    pub async fn change_date(&self, date: NaiveDate) -> Result<Option<ReportResult>, SessionError> {
        let fetched = {
            let mut state = self.lock();
            state.date = date;
            let dated = state
                .active
                .as_ref()
                .and_then(ReportSelection::kind)
                .is_some_and(|kind| kind.uses_date());
            if !dated {
                return Ok(None);
            }
            let filter = state.filter;
            state
                .fetched
                .as_ref()
                .filter(|rows| rows.filter == filter)
                .map(|rows| Arc::clone(&rows.data))
        };

        match fetched {
            Some(data) => Ok(self.begin_cycle().and_then(|cycle| self.paint(cycle, data))),
            None => self.run_active().await,
        }
    }

    /// Generate the active report again from freshly fetched rows.
    pub async fn refresh(&self) -> Result<Option<ReportResult>, SessionError> {
        self.run_active().await
    }

    /// Display → Hub. Clears the presenter, forgets the active report and
    /// invalidates any cycle still in flight.
    pub fn back(&self) {
        let mut state = self.lock();
        state.view = View::Hub;
        state.active = None;
        state.fetched = None;
        state.generation += 1;
        self.presenter.clear();
    }

    fn begin_cycle(&self) -> Option<Cycle> {
        let mut state = self.lock();
        if state.view != View::Display {
            return None;
        }
        let selection = state.active.clone()?;
        state.generation += 1;
        Some(Cycle {
            selection,
            filter: state.filter,
            request: ReportRequest { date: state.date },
            ticket: state.generation,
        })
    }

    async fn run_active(&self) -> Result<Option<ReportResult>, SessionError> {
        let Some(cycle) = self.begin_cycle() else {
            return Ok(None);
        };

        let data = if cycle.selection.needs_data() {
            fetch_report_data(&self.source, cycle.filter).await
        } else {
            ReportData::new()
        };
        Ok(self.paint(cycle, Arc::new(data)))
    }

    /// Generate `cycle` over `data` and paint it unless a newer cycle has
    /// started since.
    fn paint(&self, cycle: Cycle, data: Arc<ReportData>) -> Option<ReportResult> {
        let result = cycle.selection.generate(&data, &cycle.request, &self.settings);

        // Check and paint under one lock so `back()` cannot slip in between.
        let mut state = self.lock();
        if state.generation != cycle.ticket {
            tracing::debug!(
                report = cycle.selection.id(),
                ticket = cycle.ticket,
                latest = state.generation,
                "dropping stale report result"
            );
            return None;
        }
        if cycle.selection.needs_data() {
            state.fetched = Some(FetchedRows {
                filter: cycle.filter,
                data,
            });
        }
        self.presenter.render_report(&result);
        drop(state);

        tracing::info!(
            report = cycle.selection.id(),
            filter = %cycle.filter,
            date = %cycle.request.date,
            rows = result.rows.len(),
            "report generated"
        );
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use chrono::{TimeZone, Utc};
    use posreports_auth::{Role, StaticRoleProvider};
    use posreports_core::{ProductId, SaleId, ShopId};
    use posreports_infra::InMemoryReportSource;
    use posreports_inventory::WastageRecord;
    use posreports_products::Product;
    use posreports_reports::result::{COMING_SOON, NOT_CONFIGURED};
    use posreports_reports::{Collection, ReportContent};
    use posreports_sales::Sale;

    use crate::presenter::{PresenterEvent, RecordingPresenter};

    type TestSession = ReportSession<Arc<InMemoryReportSource>, Arc<RecordingPresenter>, Arc<StaticRoleProvider>>;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn merkez() -> Shop {
        Shop::new(ShopId::new(1), "Merkez")
    }

    fn sale(id: i64, shop: i64, revenue: f64) -> Sale {
        Sale::new(SaleId::new(id), ProductId::new(1), 1.0, revenue)
            .with_purchase_price(1.0)
            .in_shop(ShopId::new(shop))
            .at(Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap())
    }

    fn source() -> Arc<InMemoryReportSource> {
        Arc::new(
            InMemoryReportSource::new()
                .with_records(Collection::Sales, &[sale(1, 1, 100.0), sale(2, 2, 40.0)])
                .with_records(
                    Collection::Products,
                    &[Product::new(ProductId::new(1), "Sucuk").in_shop(ShopId::new(1))],
                )
                .with_shops(vec![merkez(), Shop::new(ShopId::new(2), "Kadıköy")]),
        )
    }

    struct Harness {
        session: TestSession,
        source: Arc<InMemoryReportSource>,
        presenter: Arc<RecordingPresenter>,
        roles: Arc<StaticRoleProvider>,
    }

    fn harness_with(source: Arc<InMemoryReportSource>, role: Role) -> Harness {
        let presenter = Arc::new(RecordingPresenter::new());
        let roles = Arc::new(StaticRoleProvider::new(role));
        let session = ReportSession::new(
            source.clone(),
            presenter.clone(),
            roles.clone(),
            Some(merkez()),
            ReportSettings::default(),
            day(),
        );
        Harness {
            session,
            source,
            presenter,
            roles,
        }
    }

    fn harness(role: Role) -> Harness {
        harness_with(source(), role)
    }

    fn revenue(result: &ReportResult) -> String {
        match &result.content {
            Some(ReportContent::DaySummary(summary)) => summary.metrics[0].value.clone(),
            other => panic!("Expected day summary, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn session_starts_on_hub_filtered_to_own_shop() {
        let h = harness(Role::MANAGER);
        assert_eq!(h.session.view(), View::Hub);
        assert_eq!(h.session.active(), None);
        assert_eq!(h.session.filter(), ShopFilter::Shop(ShopId::new(1)));
        assert_eq!(h.session.hub().len(), 9);
    }

    #[tokio::test]
    async fn open_switches_to_display_and_renders() {
        let h = harness(Role::MANAGER);
        let result = h.session.open("end-of-day").await.unwrap().unwrap();

        assert_eq!(h.session.view(), View::Display);
        assert_eq!(
            h.session.active(),
            Some(ReportSelection::Report(ReportKind::EndOfDay))
        );
        assert_eq!(revenue(&result), "100.00 TL");
        assert_eq!(h.presenter.last_rendered(), Some(result));
    }

    #[tokio::test]
    async fn legacy_identifier_opens_the_same_report() {
        let h = harness(Role::MANAGER);
        h.session.open("gunSonu").await.unwrap();
        assert_eq!(
            h.session.active(),
            Some(ReportSelection::Report(ReportKind::EndOfDay))
        );
    }

    #[tokio::test]
    async fn shop_change_reruns_active_report_with_fresh_data() {
        let h = harness(Role::MANAGER);
        h.session.open("end-of-day").await.unwrap();

        let all = h.session.change_shop(ShopFilter::All).await.unwrap().unwrap();
        assert_eq!(revenue(&all), "140.00 TL");

        h.source.insert_rows(Collection::Sales, Vec::new());
        let empty = h.session.refresh().await.unwrap().unwrap();
        assert!(empty.is_message());
        assert_eq!(h.presenter.rendered().len(), 3);
    }

    #[tokio::test]
    async fn date_change_reaggregates_fetched_rows() {
        let h = harness(Role::MANAGER);
        h.session.open("end-of-day").await.unwrap();
        assert_eq!(h.source.fetch_count(), 7);

        // Rows written after the fetch are not seen until the next fetch.
        h.source.insert_rows(Collection::Sales, Vec::new());

        let next = h.session.change_date(day().succ_opt().unwrap()).await.unwrap().unwrap();
        assert_eq!(revenue(&next), "0.00 TL");
        assert_eq!(h.session.date(), day().succ_opt().unwrap());

        let back = h.session.change_date(day()).await.unwrap().unwrap();
        assert_eq!(revenue(&back), "100.00 TL");
        assert_eq!(h.source.fetch_count(), 7);
        assert_eq!(h.presenter.rendered().len(), 3);
    }

    #[tokio::test]
    async fn date_change_leaves_undated_reports_alone() {
        let h = harness(Role::MANAGER);
        h.session.open("wastage").await.unwrap();
        let fetches = h.source.fetch_count();

        assert_eq!(h.session.change_date(day().succ_opt().unwrap()).await.unwrap(), None);
        assert_eq!(h.source.fetch_count(), fetches);
        assert_eq!(h.presenter.rendered().len(), 1);
        assert_eq!(h.session.date(), day().succ_opt().unwrap());

        // The new date applies once a dated report is opened.
        let eod = h.session.open("end-of-day").await.unwrap().unwrap();
        assert_eq!(revenue(&eod), "0.00 TL");
    }

    #[tokio::test]
    async fn date_change_after_back_fetches_again() {
        let h = harness(Role::MANAGER);
        h.session.open("revenue-profit").await.unwrap();
        h.session.back();
        assert_eq!(h.session.change_date(day().succ_opt().unwrap()).await.unwrap(), None);

        h.session.open("end-of-day").await.unwrap();
        assert_eq!(h.source.fetch_count(), 14);
        h.session.change_date(day()).await.unwrap();
        assert_eq!(h.source.fetch_count(), 14);
    }

    #[tokio::test]
    async fn filter_change_on_hub_only_records_the_filter() {
        let h = harness(Role::MANAGER);
        assert_eq!(h.session.change_shop(ShopFilter::All).await.unwrap(), None);
        assert_eq!(h.session.filter(), ShopFilter::All);
        assert_eq!(h.source.fetch_count(), 0);
        assert!(h.presenter.events().is_empty());
    }

    #[tokio::test]
    async fn back_clears_and_forgets_active_report() {
        let h = harness(Role::MANAGER);
        h.session.open("wastage").await.unwrap();
        h.session.back();

        assert_eq!(h.session.view(), View::Hub);
        assert_eq!(h.session.active(), None);
        assert_eq!(h.presenter.events().last(), Some(&PresenterEvent::Cleared));

        // Nothing active: a filter change renders nothing.
        let before = h.presenter.events().len();
        assert_eq!(h.session.change_shop(ShopFilter::All).await.unwrap(), None);
        assert_eq!(h.presenter.events().len(), before);
    }

    #[tokio::test]
    async fn unknown_report_becomes_active_placeholder() {
        let h = harness(Role::MANAGER);
        let result = h.session.open("stokDevir").await.unwrap().unwrap();
        assert_eq!(result.title, "Report: stokDevir");
        assert_eq!(result.message_text(), Some(NOT_CONFIGURED));
        assert_eq!(h.source.fetch_count(), 0);

        // Still active: a filter change renders the placeholder again.
        let again = h.session.change_shop(ShopFilter::All).await.unwrap().unwrap();
        assert_eq!(again, result);
    }

    #[tokio::test]
    async fn placeholder_report_skips_fetching() {
        let h = harness(Role::MANAGER);
        let result = h.session.open("channel-sales").await.unwrap().unwrap();
        assert_eq!(result.message_text(), Some(COMING_SOON));
        assert_eq!(h.source.fetch_count(), 0);
    }

    #[tokio::test]
    async fn failed_collection_still_renders() {
        let source = Arc::new(
            InMemoryReportSource::new()
                .with_records(
                    Collection::Wastage,
                    &[WastageRecord::new("Kıyma", 1.0, "expired").with_cost(5.0)],
                )
                .failing(Collection::Sales),
        );
        let h = harness_with(source, Role::MANAGER);
        h.session.change_shop(ShopFilter::All).await.unwrap();

        let eod = h.session.open("end-of-day").await.unwrap().unwrap();
        assert!(eod.is_message());

        let wastage = h.session.open("wastage").await.unwrap().unwrap();
        assert_eq!(wastage.rows.len(), 1);
    }

    #[tokio::test]
    async fn manager_gets_shop_options() {
        let h = harness(Role::new("yönetici"));
        let options = h.session.load_shop_options().await.unwrap();
        let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["Only this shop (Merkez)", "All shops (overview)", "Kadıköy"]);
        assert_eq!(h.session.shop_options(), options);
    }

    #[tokio::test]
    async fn cashier_is_pinned_to_own_shop() {
        let h = harness(Role::CASHIER);
        assert!(h.session.load_shop_options().await.unwrap().is_empty());
        assert_eq!(
            h.session.change_shop(ShopFilter::All).await,
            Err(SessionError::FilterLocked("cashier".to_string()))
        );
        assert_eq!(h.session.filter(), ShopFilter::Shop(ShopId::new(1)));

        // Promotion takes effect without rebuilding the session.
        h.roles.set_role(Role::MANAGER);
        assert_eq!(h.session.load_shop_options().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn stale_result_is_dropped_when_a_newer_cycle_wins() {
        let source = Arc::new(
            InMemoryReportSource::new()
                .with_records(Collection::Sales, &[sale(1, 1, 100.0), sale(2, 2, 40.0)])
                .with_delay(ShopFilter::Shop(ShopId::new(1)), Duration::from_millis(300)),
        );
        let h = Arc::new(harness_with(source, Role::MANAGER));

        // Slow cycle under shop 1.
        let slow = {
            let h = h.clone();
            tokio::spawn(async move { h.session.open("end-of-day").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        // Fast cycle under shop 2 starts later and finishes first.
        let fast = h
            .session
            .change_shop(ShopFilter::Shop(ShopId::new(2)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(revenue(&fast), "40.00 TL");

        assert_eq!(slow.await.unwrap().unwrap(), None);
        let rendered = h.presenter.rendered();
        assert_eq!(rendered.len(), 1);
        assert_eq!(revenue(&rendered[0]), "40.00 TL");
    }

    /// Panics on its first paint, then behaves.
    struct FlakyPresenter {
        armed: AtomicBool,
        inner: RecordingPresenter,
    }

    impl Presenter for FlakyPresenter {
        fn render_report(&self, result: &ReportResult) {
            if self.armed.swap(false, Ordering::SeqCst) {
                panic!("display detached");
            }
            self.inner.render_report(result);
        }

        fn clear(&self) {
            self.inner.clear();
        }
    }

    #[tokio::test]
    async fn session_survives_a_panicking_presenter() {
        let presenter = Arc::new(FlakyPresenter {
            armed: AtomicBool::new(true),
            inner: RecordingPresenter::new(),
        });
        let session = Arc::new(ReportSession::new(
            source(),
            presenter.clone(),
            StaticRoleProvider::new(Role::MANAGER),
            Some(merkez()),
            ReportSettings::default(),
            day(),
        ));

        let first = {
            let session = session.clone();
            tokio::spawn(async move { session.open("end-of-day").await })
        };
        assert!(first.await.unwrap_err().is_panic());

        assert_eq!(session.view(), View::Display);
        let result = session.refresh().await.unwrap().unwrap();
        assert_eq!(revenue(&result), "100.00 TL");
        assert_eq!(presenter.inner.last_rendered(), Some(result));

        session.back();
        assert_eq!(session.view(), View::Hub);
    }

    #[tokio::test]
    async fn back_during_fetch_prevents_repaint() {
        let source = Arc::new(
            InMemoryReportSource::new()
                .with_records(Collection::Sales, &[sale(1, 1, 100.0)])
                .with_delay(ShopFilter::Shop(ShopId::new(1)), Duration::from_millis(200)),
        );
        let h = Arc::new(harness_with(source, Role::MANAGER));

        let pending = {
            let h = h.clone();
            tokio::spawn(async move { h.session.open("top-sellers").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        h.session.back();

        assert_eq!(pending.await.unwrap().unwrap(), None);
        assert_eq!(h.presenter.events(), vec![PresenterEvent::Cleared]);
        assert_eq!(h.session.view(), View::Hub);
    }
}
