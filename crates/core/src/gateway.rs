//! Persistence gateway contract between the widget grid and durable storage.
//!
//! The grid never talks to a database directly; it goes through a
//! [`LayoutGateway`], keyed by profile. `biogrid-db` provides the PostgreSQL
//! implementation, and [`InMemoryGateway`] backs tests and local previews.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;

use crate::types::{ProfileId, WidgetId};
use crate::widget::WidgetRecord;

/// Errors surfaced by a gateway implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// Store unreachable or the query failed.
    #[error("Layout store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the write (constraint violation and the like).
    #[error("Layout store rejected the write: {0}")]
    Rejected(String),

    /// Stored data could not be turned into widget records.
    #[error("Stored layout is corrupt: {0}")]
    Corrupt(String),
}

/// Result of loading a profile's layout.
///
/// `Empty` is a confirmed absence of rows, distinct from a failed load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Empty,
    Loaded(Vec<WidgetRecord>),
}

impl LoadOutcome {
    pub fn from_records(records: Vec<WidgetRecord>) -> Self {
        if records.is_empty() {
            Self::Empty
        } else {
            Self::Loaded(records)
        }
    }

    pub fn into_records(self) -> Vec<WidgetRecord> {
        match self {
            Self::Empty => Vec::new(),
            Self::Loaded(records) => records,
        }
    }
}

/// Durable storage for widget records, one row per widget per profile.
pub trait LayoutGateway: Send + Sync {
    /// All records for `profile_id` in load order.
    fn load_layout(
        &self,
        profile_id: &ProfileId,
    ) -> impl Future<Output = Result<LoadOutcome, GatewayError>> + Send;

    /// Upsert the full record, keyed by its id within the profile.
    fn save_widget(
        &self,
        record: &WidgetRecord,
        profile_id: &ProfileId,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Hard-delete a row. Returns `true` if a row was removed.
    fn delete_widget(
        &self,
        profile_id: &ProfileId,
        widget_id: &WidgetId,
    ) -> impl Future<Output = Result<bool, GatewayError>> + Send;
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

/// Gateway backed by a map, recording every save for inspection.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    rows: Mutex<HashMap<ProfileId, Vec<WidgetRecord>>>,
    saves: Mutex<Vec<(ProfileId, WidgetRecord)>>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a profile's rows.
    pub fn with_records(profile_id: ProfileId, records: Vec<WidgetRecord>) -> Self {
        let mut rows = HashMap::new();
        rows.insert(profile_id, records);
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    /// Make subsequent loads fail with [`GatewayError::Unavailable`].
    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent saves fail with [`GatewayError::Unavailable`].
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Every attempted save, in call order (failed ones included).
    pub async fn saves(&self) -> Vec<(ProfileId, WidgetRecord)> {
        self.saves.lock().await.clone()
    }

    pub async fn save_count(&self) -> usize {
        self.saves.lock().await.len()
    }

    /// Rows currently stored for a profile.
    pub async fn stored(&self, profile_id: &ProfileId) -> Vec<WidgetRecord> {
        self.rows
            .lock()
            .await
            .get(profile_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl LayoutGateway for InMemoryGateway {
    async fn load_layout(&self, profile_id: &ProfileId) -> Result<LoadOutcome, GatewayError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("load failure injected".into()));
        }
        Ok(LoadOutcome::from_records(self.stored(profile_id).await))
    }

    async fn save_widget(
        &self,
        record: &WidgetRecord,
        profile_id: &ProfileId,
    ) -> Result<(), GatewayError> {
        self.saves
            .lock()
            .await
            .push((profile_id.clone(), record.clone()));
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("save failure injected".into()));
        }

        let mut rows = self.rows.lock().await;
        let profile_rows = rows.entry(profile_id.clone()).or_default();
        match profile_rows.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => profile_rows.push(record.clone()),
        }
        Ok(())
    }

    async fn delete_widget(
        &self,
        profile_id: &ProfileId,
        widget_id: &WidgetId,
    ) -> Result<bool, GatewayError> {
        let mut rows = self.rows.lock().await;
        let Some(profile_rows) = rows.get_mut(profile_id) else {
            return Ok(false);
        };
        let before = profile_rows.len();
        profile_rows.retain(|r| &r.id != widget_id);
        Ok(profile_rows.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::grid::GridPosition;
    use crate::platform::Platform;

    #[tokio::test]
    async fn empty_profile_loads_as_empty() {
        let gateway = InMemoryGateway::new();
        let outcome = gateway.load_layout(&ProfileId::new("p1")).await.unwrap();
        assert_eq!(outcome, LoadOutcome::Empty);
    }

    #[tokio::test]
    async fn save_is_an_upsert_by_id() {
        let gateway = InMemoryGateway::new();
        let profile = ProfileId::new("p1");
        let record = WidgetRecord::new(Platform::Github);

        gateway.save_widget(&record, &profile).await.unwrap();
        let moved = record.with_position(GridPosition::new(3, 0));
        gateway.save_widget(&moved, &profile).await.unwrap();

        let stored = gateway.stored(&profile).await;
        assert_eq!(stored, vec![moved]);
        assert_eq!(gateway.save_count().await, 2);
    }

    #[tokio::test]
    async fn profiles_are_isolated() {
        let gateway = InMemoryGateway::new();
        gateway
            .save_widget(&WidgetRecord::new(Platform::Github), &ProfileId::new("a"))
            .await
            .unwrap();
        let other = gateway.load_layout(&ProfileId::new("b")).await.unwrap();
        assert_eq!(other, LoadOutcome::Empty);
    }

    #[tokio::test]
    async fn injected_failures() {
        let gateway = InMemoryGateway::new();
        gateway.set_fail_loads(true);
        gateway.set_fail_saves(true);
        let profile = ProfileId::new("p1");

        assert_matches!(
            gateway.load_layout(&profile).await,
            Err(GatewayError::Unavailable(_))
        );
        assert!(gateway
            .save_widget(&WidgetRecord::new(Platform::Medium), &profile)
            .await
            .is_err());
        assert!(gateway.stored(&profile).await.is_empty());
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_went_away() {
        let profile = ProfileId::new("p1");
        let record = WidgetRecord::new(Platform::Substack);
        let gateway = InMemoryGateway::with_records(profile.clone(), vec![record.clone()]);

        assert!(gateway.delete_widget(&profile, &record.id).await.unwrap());
        assert!(!gateway.delete_widget(&profile, &record.id).await.unwrap());
    }
}
