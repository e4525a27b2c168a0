//! Live dashboard driven by store change notifications.

use std::sync::{Arc, Mutex};

use gasto_domain::Expense;
use tracing::debug;

use crate::{
    session::Session,
    storage::{ExpenseStore, Subscription},
    summary_service::{DashboardReport, SummaryService},
    time::Clock,
    CoreError,
};

/// Recomputes the dashboard from scratch every time the user's expenses
/// change and hands the result to a listener.
///
/// The feed owns a single store subscription; dropping the feed (or calling
/// [`ReportFeed::stop`]) ends it.
pub struct ReportFeed {
    latest: Arc<Mutex<Option<DashboardReport>>>,
    subscription: Subscription,
}

impl ReportFeed {
    pub fn start<F>(
        store: &dyn ExpenseStore,
        session: &Session,
        clock: Arc<dyn Clock>,
        top_n: usize,
        listener: F,
    ) -> Result<Self, CoreError>
    where
        F: Fn(&DashboardReport) + Send + Sync + 'static,
    {
        let latest = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&latest);
        let subscription = store.subscribe_expenses(
            session.owner(),
            Box::new(move |expenses: &[Expense]| {
                let report = SummaryService::dashboard(expenses, clock.today(), top_n);
                debug!(count = expenses.len(), "dashboard recomputed");
                listener(&report);
                if let Ok(mut slot) = slot.lock() {
                    *slot = Some(report);
                }
            }),
        )?;
        Ok(Self {
            latest,
            subscription,
        })
    }

    /// Most recent report, if a notification has arrived.
    pub fn latest(&self) -> Option<DashboardReport> {
        self.latest.lock().ok().and_then(|report| report.clone())
    }

    pub fn stop(self) {
        self.subscription.unsubscribe();
    }
}
