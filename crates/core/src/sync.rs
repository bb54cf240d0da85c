//! Load-or-seed and commit orchestration between a [`WidgetLayout`] and a
//! [`LayoutGateway`].
//!
//! Failure policy:
//! - A failed load leaves the layout empty and [`LoadState::Unconfirmed`];
//!   defaults are only seeded after a confirmed empty load.
//! - A failed save is logged and reported as [`SaveOutcome::Failed`]. The
//!   in-memory snapshot is kept and nothing is retried.
//!
//! Saves are not ordered against each other. When several commits for the
//! same widget overlap, whichever write reaches the store last wins.

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::error::CoreError;
use crate::gateway::{GatewayError, LayoutGateway, LoadOutcome};
use crate::layout::WidgetLayout;
use crate::platform::Platform;
use crate::types::ProfileId;
use crate::widget::{WidgetMutation, WidgetRecord};

/// How the current layout came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    /// Records were loaded from storage.
    Loaded,
    /// Storage confirmed no records; platform defaults were created.
    Seeded,
    /// The load failed; the layout is empty and nothing was seeded.
    Unconfirmed,
}

/// Result of pushing one record snapshot to the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(WidgetRecord),
    Failed {
        record: WidgetRecord,
        error: GatewayError,
    },
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }

    pub fn record(&self) -> &WidgetRecord {
        match self {
            Self::Saved(record) | Self::Failed { record, .. } => record,
        }
    }

    pub fn error(&self) -> Option<&GatewayError> {
        match self {
            Self::Saved(_) => None,
            Self::Failed { error, .. } => Some(error),
        }
    }
}

/// Resolve platform keys, logging and dropping unknown ones.
pub fn resolve_platforms<S: AsRef<str>>(keys: &[S]) -> Vec<Platform> {
    keys.iter()
        .filter_map(|key| match Platform::from_key(key.as_ref()) {
            Ok(platform) => Some(platform),
            Err(err) => {
                tracing::warn!(platform = key.as_ref(), error = %err, "Skipping unknown platform");
                None
            }
        })
        .collect()
}

/// A profile's layout bound to its persistence gateway.
pub struct LayoutSync<G> {
    gateway: Arc<G>,
    profile_id: ProfileId,
    layout: WidgetLayout,
    state: LoadState,
}

impl<G: LayoutGateway + 'static> LayoutSync<G> {
    /// Load the profile's layout, seeding one default widget per connected
    /// platform when storage confirms the profile has none.
    pub async fn open(gateway: Arc<G>, profile_id: ProfileId, connected: &[Platform]) -> Self {
        let mut sync = Self {
            gateway,
            profile_id,
            layout: WidgetLayout::new(),
            state: LoadState::Unconfirmed,
        };

        match sync.gateway.load_layout(&sync.profile_id).await {
            Ok(LoadOutcome::Loaded(records)) => {
                tracing::info!(
                    profile_id = %sync.profile_id,
                    count = records.len(),
                    "Widget layout loaded",
                );
                sync.layout = WidgetLayout::from_records(records);
                sync.state = LoadState::Loaded;
            }
            Ok(LoadOutcome::Empty) => {
                let seeded = WidgetLayout::seed(connected);
                tracing::info!(
                    profile_id = %sync.profile_id,
                    count = seeded.len(),
                    "Seeding default widget layout",
                );
                for record in seeded {
                    if let Err(err) = sync.layout.insert(record.clone()) {
                        tracing::warn!(error = %err, "Skipping seeded widget");
                        continue;
                    }
                    sync.save(record).await;
                }
                sync.state = LoadState::Seeded;
            }
            Err(err) => {
                tracing::warn!(
                    profile_id = %sync.profile_id,
                    error = %err,
                    "Widget layout load failed, continuing with an empty layout",
                );
            }
        }

        sync
    }

    pub fn profile_id(&self) -> &ProfileId {
        &self.profile_id
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn layout(&self) -> &WidgetLayout {
        &self.layout
    }

    /// Mutable access for preview-time stacking changes. Record changes must
    /// go through [`commit`](Self::commit) to be persisted.
    pub fn layout_mut(&mut self) -> &mut WidgetLayout {
        &mut self.layout
    }

    /// Apply a mutation and upsert the resulting snapshot.
    ///
    /// Errors only for unknown widgets or invalid edits; storage failures are
    /// reported through [`SaveOutcome::Failed`].
    pub async fn commit(&mut self, mutation: &WidgetMutation) -> Result<SaveOutcome, CoreError> {
        let record = self.layout.apply(mutation)?;
        Ok(self.save(record).await)
    }

    /// Like [`commit`](Self::commit) but does not wait for the save. The
    /// returned handle resolves once the gateway answers.
    pub fn commit_detached(
        &mut self,
        mutation: &WidgetMutation,
    ) -> Result<JoinHandle<SaveOutcome>, CoreError> {
        let record = self.layout.apply(mutation)?;
        let gateway = Arc::clone(&self.gateway);
        let profile_id = self.profile_id.clone();
        Ok(tokio::spawn(async move {
            save_with(gateway.as_ref(), &profile_id, record).await
        }))
    }

    /// Add a widget for `platform` at the origin with its default size.
    ///
    /// Returns `None` without touching storage when the profile already has
    /// a widget for that platform.
    pub async fn add_widget(&mut self, platform: Platform) -> Option<SaveOutcome> {
        if self.layout.contains_platform(platform) {
            tracing::debug!(
                profile_id = %self.profile_id,
                platform = platform.key(),
                "Widget already present, ignoring add",
            );
            return None;
        }
        let record = WidgetRecord::new(platform);
        if let Err(err) = self.layout.insert(record.clone()) {
            tracing::warn!(error = %err, "Could not add widget");
            return None;
        }
        Some(self.save(record).await)
    }

    async fn save(&self, record: WidgetRecord) -> SaveOutcome {
        save_with(self.gateway.as_ref(), &self.profile_id, record).await
    }
}

async fn save_with<G: LayoutGateway>(
    gateway: &G,
    profile_id: &ProfileId,
    record: WidgetRecord,
) -> SaveOutcome {
    match gateway.save_widget(&record, profile_id).await {
        Ok(()) => SaveOutcome::Saved(record),
        Err(err) => {
            tracing::warn!(
                profile_id = %profile_id,
                widget_id = %record.id,
                error = %err,
                "Widget save failed; keeping in-memory change",
            );
            SaveOutcome::Failed { record, error: err }
        }
    }
}
