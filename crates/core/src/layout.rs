//! In-memory widget layout of one profile and its render order.
//!
//! Records are stored as snapshots keyed by id and replaced wholesale on
//! every mutation. Stacking follows insertion/load order; widgets that are
//! moved or resized are raised to the end of the order so they draw on top.
//! Overlapping placements are allowed: there is no collision detection or
//! re-flow.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::grid::{GridMetrics, GridPosition, PixelRect};
use crate::platform::Platform;
use crate::types::WidgetId;
use crate::widget::{WidgetMutation, WidgetRecord};

/// Column stride between consecutive default widgets when seeding a profile.
pub const SEED_COLUMN_STRIDE: u32 = 2;

/// A visible widget with its resolved pixel geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedWidget {
    pub record: WidgetRecord,
    pub rect: PixelRect,
    pub z_index: usize,
}

#[derive(Debug, Clone, Default)]
pub struct WidgetLayout {
    records: HashMap<WidgetId, WidgetRecord>,
    order: Vec<WidgetId>,
}

impl WidgetLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a layout from records in load order.
    ///
    /// Later duplicates of an id or a platform are dropped.
    pub fn from_records(records: impl IntoIterator<Item = WidgetRecord>) -> Self {
        let mut layout = Self::new();
        for record in records {
            let widget_id = record.id.clone();
            // First one wins.
            if let Err(err) = layout.insert(record) {
                tracing::warn!(widget_id = %widget_id, error = %err, "Skipping widget on load");
            }
        }
        layout
    }

    /// Default records for a freshly initialized profile: one per platform,
    /// laid out left to right on the first row.
    pub fn seed(platforms: &[Platform]) -> Vec<WidgetRecord> {
        let mut seen = Vec::with_capacity(platforms.len());
        for platform in platforms {
            if !seen.contains(platform) {
                seen.push(*platform);
            }
        }
        seen.into_iter()
            .zip(0u32..)
            .map(|(platform, index)| {
                WidgetRecord::new(platform)
                    .with_position(GridPosition::new(index * SEED_COLUMN_STRIDE, 0))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: &WidgetId) -> Option<&WidgetRecord> {
        self.records.get(id)
    }

    pub fn contains_platform(&self, platform: Platform) -> bool {
        self.records.values().any(|r| r.platform == platform)
    }

    /// All records (hidden included) in render order.
    pub fn records(&self) -> impl Iterator<Item = &WidgetRecord> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// Ids in render order, bottom first.
    pub fn render_order(&self) -> &[WidgetId] {
        &self.order
    }

    /// Insert a new record at the top of the stack.
    ///
    /// Fails on a duplicate id or a second widget for the same platform.
    pub fn insert(&mut self, record: WidgetRecord) -> Result<(), CoreError> {
        if self.records.contains_key(&record.id) {
            return Err(CoreError::Conflict(format!(
                "Widget '{}' already exists",
                record.id
            )));
        }
        if self.contains_platform(record.platform) {
            return Err(CoreError::Conflict(format!(
                "A '{}' widget already exists on this profile",
                record.platform.key()
            )));
        }
        self.order.push(record.id.clone());
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    /// Replace the snapshot for an existing id, keeping its stack slot.
    pub fn replace(&mut self, record: WidgetRecord) -> Result<(), CoreError> {
        match self.records.get_mut(&record.id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(CoreError::NotFound {
                entity: "Widget",
                id: record.id.to_string(),
            }),
        }
    }

    /// Apply a committed mutation, returning the new snapshot.
    ///
    /// Geometric mutations also raise the widget to the top of the stack.
    pub fn apply(&mut self, mutation: &WidgetMutation) -> Result<WidgetRecord, CoreError> {
        let id = mutation.widget_id();
        let current = self.records.get(id).ok_or_else(|| CoreError::NotFound {
            entity: "Widget",
            id: id.to_string(),
        })?;
        let next = mutation.apply(current)?;
        self.records.insert(id.clone(), next.clone());
        if mutation.is_geometric() {
            self.raise(id);
        }
        Ok(next)
    }

    /// Move a widget to the end of the render order (drawn last, on top).
    pub fn raise(&mut self, id: &WidgetId) -> bool {
        let Some(index) = self.order.iter().position(|o| o == id) else {
            return false;
        };
        if index + 1 != self.order.len() {
            let raised = self.order.remove(index);
            self.order.push(raised);
        }
        true
    }

    /// Visible widgets in render order with their pixel rectangles.
    pub fn render_pass(&self, metrics: &GridMetrics) -> Vec<RenderedWidget> {
        self.records()
            .filter(|r| r.visible)
            .enumerate()
            .map(|(z_index, record)| RenderedWidget {
                rect: metrics.pixel_rect(record.grid_position, record.grid_size),
                record: record.clone(),
                z_index,
            })
            .collect()
    }
}
