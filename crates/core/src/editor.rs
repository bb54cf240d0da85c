//! Grid editor: routes pointer input to at most one interacting widget.
//!
//! Only the widget that received the accepted pointer-down gets move/up
//! events until it returns to idle, so interactions are serialized across the
//! whole grid. While a preview is live the widget is raised to the top of the
//! layout's render order and a dashed placeholder marks the drop target.

use serde::Serialize;

use crate::grid::{GridMetrics, PixelPoint, PixelRect};
use crate::interaction::{EditMode, InteractionMode, Preview, WidgetInteraction};
use crate::layout::WidgetLayout;
use crate::types::WidgetId;
use crate::widget::{WidgetMutation, WidgetRecord};

/// Dashed outline drawn under the pointer during an interaction. Purely
/// illustrative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placeholder {
    pub rect: PixelRect,
    pub resizing: bool,
}

#[derive(Debug, Clone)]
pub struct GridEditor {
    metrics: GridMetrics,
    active: Option<WidgetInteraction>,
}

impl GridEditor {
    pub fn new(metrics: GridMetrics) -> Self {
        Self {
            metrics,
            active: None,
        }
    }

    pub fn metrics(&self) -> &GridMetrics {
        &self.metrics
    }

    pub fn mode(&self) -> InteractionMode {
        self.active
            .as_ref()
            .map_or(InteractionMode::Idle, WidgetInteraction::mode)
    }

    /// Widget currently receiving pointer events, if any.
    pub fn active_widget(&self) -> Option<&WidgetId> {
        self.active
            .as_ref()
            .and_then(WidgetInteraction::session)
            .map(|s| s.widget_id())
    }

    pub fn preview(&self) -> Option<Preview> {
        self.active.as_ref().and_then(WidgetInteraction::preview)
    }

    /// Pointer-down on widget `id`. Ignored outside edit mode, for unknown
    /// widgets, and while any widget is already interacting.
    pub fn pointer_down(
        &mut self,
        layout: &WidgetLayout,
        id: &WidgetId,
        pointer: PixelPoint,
        edit_mode: EditMode,
    ) -> Option<InteractionMode> {
        if self.active.is_some() {
            return None;
        }
        let record = layout.get(id)?;
        let mut interaction = WidgetInteraction::new();
        let mode = interaction.pointer_down(pointer, record, &self.metrics, edit_mode)?;
        self.active = Some(interaction);
        Some(mode)
    }

    /// Returns `true` when a frame callback must be scheduled.
    pub fn pointer_move(&mut self, pointer: PixelPoint) -> bool {
        self.active
            .as_mut()
            .is_some_and(|interaction| interaction.pointer_move(pointer))
    }

    /// Process the coalesced pointer sample, raising the widget whenever its
    /// preview changes.
    pub fn on_frame(&mut self, layout: &mut WidgetLayout) -> Option<Preview> {
        let interaction = self.active.as_mut()?;
        let preview = interaction.on_frame(&self.metrics)?;
        if let Some(session) = interaction.session() {
            layout.raise(session.widget_id());
        }
        Some(preview)
    }

    /// Release the pointer. Returns the mutation to commit, if any; the
    /// caller pushes it through the layout sync.
    pub fn pointer_up(
        &mut self,
        layout: &mut WidgetLayout,
        pointer: PixelPoint,
    ) -> Option<WidgetMutation> {
        let mut interaction = self.active.take()?;
        let mutation = interaction.pointer_up(pointer, &self.metrics)?;
        layout.raise(mutation.widget_id());
        Some(mutation)
    }

    /// Tear down any in-flight interaction and its pending frame.
    pub fn cancel(&mut self) -> bool {
        self.active.take().is_some_and(|mut i| i.cancel())
    }

    /// Record of the active widget with its live preview applied, for
    /// drawing. `None` when idle or before the first preview.
    pub fn preview_record(&self, layout: &WidgetLayout) -> Option<WidgetRecord> {
        let id = self.active_widget()?;
        let record = layout.get(id)?;
        match self.preview()? {
            Preview::Position(position) => Some(record.with_position(position)),
            Preview::Size(size) => Some(record.with_size(size)),
        }
    }

    /// Drop-target outline.
    ///
    /// Dragging: preview cell with the widget's current size. Resizing: the
    /// fixed top-left anchor with the preview size.
    pub fn placeholder(&self, layout: &WidgetLayout) -> Option<Placeholder> {
        let session = self.active.as_ref()?.session()?;
        let record = layout.get(session.widget_id())?;
        let preview = session.preview()?;
        let (rect, resizing) = match preview {
            Preview::Position(position) => {
                (self.metrics.pixel_rect(position, record.grid_size), false)
            }
            Preview::Size(size) => (
                self.metrics.pixel_rect(session.anchor_position(), size),
                true,
            ),
        };
        Some(Placeholder { rect, resizing })
    }
}
