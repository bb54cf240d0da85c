//! Pointer-driven drag/resize state machine for a single widget.
//!
//! ```text
//! Idle --pointer_down--> Dragging | Resizing --pointer_up/cancel--> Idle
//! ```
//!
//! Pointer moves are coalesced: [`WidgetInteraction::pointer_move`] only
//! stores the latest sample, and the host processes it once per animation
//! frame via [`WidgetInteraction::on_frame`]. [`WidgetInteraction::pointer_up`]
//! always processes the final sample before committing.

use crate::grid::{GridMetrics, GridPosition, GridSize, PixelPoint};
use crate::types::WidgetId;
use crate::widget::{WidgetMutation, WidgetRecord};

/// Caller-owned flag gating the state machine. Outside edit mode every
/// pointer-down is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Viewing,
    Editing,
}

impl EditMode {
    pub fn is_editing(self) -> bool {
        self == Self::Editing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    Idle,
    Dragging,
    Resizing,
}

/// Live, not-yet-committed value shown while the pointer is down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preview {
    Position(GridPosition),
    Size(GridSize),
}

/// Widget geometry captured at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    Drag(GridPosition),
    Resize {
        position: GridPosition,
        size: GridSize,
    },
}

/// Ephemeral state of one in-progress interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionSession {
    widget_id: WidgetId,
    anchor_pointer: PixelPoint,
    anchor: Anchor,
    preview: Option<Preview>,
    pending: Option<PixelPoint>,
}

impl InteractionSession {
    pub fn mode(&self) -> InteractionMode {
        match self.anchor {
            Anchor::Drag(_) => InteractionMode::Dragging,
            Anchor::Resize { .. } => InteractionMode::Resizing,
        }
    }

    pub fn widget_id(&self) -> &WidgetId {
        &self.widget_id
    }

    pub fn preview(&self) -> Option<Preview> {
        self.preview
    }

    /// Whether a coalesced pointer sample is waiting for the next frame.
    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }

    /// Top-left cell the widget occupied when the interaction began.
    pub fn anchor_position(&self) -> GridPosition {
        match self.anchor {
            Anchor::Drag(position) => position,
            Anchor::Resize { position, .. } => position,
        }
    }

    fn compute(&self, pointer: PixelPoint, metrics: &GridMetrics) -> Preview {
        let delta = metrics.pixel_delta_to_grid_delta(
            pointer.x - self.anchor_pointer.x,
            pointer.y - self.anchor_pointer.y,
        );
        match self.anchor {
            Anchor::Drag(position) => Preview::Position(position.offset(delta)),
            Anchor::Resize { size, .. } => Preview::Size(size.grow(delta)),
        }
    }

    fn is_unchanged(&self, preview: Preview) -> bool {
        match (self.anchor, preview) {
            (Anchor::Drag(start), Preview::Position(p)) => start == p,
            (Anchor::Resize { size, .. }, Preview::Size(s)) => size == s,
            _ => false,
        }
    }
}

/// Resolve which interaction a pointer-down at `pointer` begins on `record`.
///
/// Pointers inside the `H x H` handle at the bottom-right corner resize;
/// anywhere else drags.
pub fn resolve_mode(
    record: &WidgetRecord,
    pointer: PixelPoint,
    metrics: &GridMetrics,
) -> InteractionMode {
    let rect = metrics.pixel_rect(record.grid_position, record.grid_size);
    if metrics.handle_rect(rect).contains(pointer) {
        InteractionMode::Resizing
    } else {
        InteractionMode::Dragging
    }
}

/// Per-widget interaction controller.
#[derive(Debug, Clone, Default)]
pub struct WidgetInteraction {
    session: Option<InteractionSession>,
}

impl WidgetInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InteractionMode {
        self.session
            .as_ref()
            .map_or(InteractionMode::Idle, InteractionSession::mode)
    }

    pub fn session(&self) -> Option<&InteractionSession> {
        self.session.as_ref()
    }

    pub fn preview(&self) -> Option<Preview> {
        self.session.as_ref().and_then(|s| s.preview)
    }

    /// Begin a drag or resize. Returns the entered mode, or `None` when the
    /// machine is inert (not editing) or already interacting.
    pub fn pointer_down(
        &mut self,
        pointer: PixelPoint,
        record: &WidgetRecord,
        metrics: &GridMetrics,
        edit_mode: EditMode,
    ) -> Option<InteractionMode> {
        if !edit_mode.is_editing() || self.session.is_some() {
            return None;
        }
        let anchor = match resolve_mode(record, pointer, metrics) {
            InteractionMode::Resizing => Anchor::Resize {
                position: record.grid_position,
                size: record.grid_size,
            },
            _ => Anchor::Drag(record.grid_position),
        };
        let session = InteractionSession {
            widget_id: record.id.clone(),
            anchor_pointer: pointer,
            anchor,
            preview: None,
            pending: None,
        };
        let mode = session.mode();
        self.session = Some(session);
        Some(mode)
    }

    /// Record a pointer sample. Returns `true` when the caller must schedule
    /// a frame, i.e. this is the first sample since the last processed one.
    pub fn pointer_move(&mut self, pointer: PixelPoint) -> bool {
        match self.session.as_mut() {
            Some(session) => session.pending.replace(pointer).is_none(),
            None => false,
        }
    }

    /// Process the latest pending sample. Returns the new preview when it
    /// differs from the previous one.
    pub fn on_frame(&mut self, metrics: &GridMetrics) -> Option<Preview> {
        let session = self.session.as_mut()?;
        let pointer = session.pending.take()?;
        let next = session.compute(pointer, metrics);
        if session.preview == Some(next) {
            return None;
        }
        session.preview = Some(next);
        Some(next)
    }

    /// Finish the interaction. The final pointer sample is always applied,
    /// and a mutation is emitted only when the result differs from the
    /// widget's geometry at pointer-down.
    pub fn pointer_up(
        &mut self,
        pointer: PixelPoint,
        metrics: &GridMetrics,
    ) -> Option<WidgetMutation> {
        let mut session = self.session.take()?;
        session.pending = None;

        // A release at the anchor with no prior movement never computed a
        // preview; keep it that way so nothing is committed.
        let final_preview = if session.preview.is_none() && pointer == session.anchor_pointer {
            None
        } else {
            Some(session.compute(pointer, metrics))
        };

        let preview = final_preview?;
        if session.is_unchanged(preview) {
            return None;
        }
        let id = session.widget_id;
        Some(match preview {
            Preview::Position(position) => WidgetMutation::Move { id, position },
            Preview::Size(size) => WidgetMutation::Resize { id, size },
        })
    }

    /// Abandon the interaction without committing, dropping any pending
    /// frame. Used on teardown and navigation.
    pub fn cancel(&mut self) -> bool {
        self.session.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::platform::Platform;

    fn metrics() -> GridMetrics {
        GridMetrics::new(120.0, 16.0, 16.0).unwrap()
    }

    fn widget(x: u32, y: u32, w: u32, h: u32) -> WidgetRecord {
        WidgetRecord::new(Platform::Github)
            .with_position(GridPosition::new(x, y))
            .with_size(GridSize::new(w, h).unwrap())
    }

    // -- Entry resolution ---------------------------------------------------

    #[test]
    fn pointer_in_handle_resolves_resizing() {
        let w = widget(0, 0, 2, 2);
        // 2x2 at pitch 136 spans 256px; handle covers 240..=256.
        assert_eq!(
            resolve_mode(&w, PixelPoint::new(250.0, 250.0), &metrics()),
            InteractionMode::Resizing
        );
    }

    #[test]
    fn pointer_outside_handle_resolves_dragging() {
        let w = widget(0, 0, 2, 2);
        let m = metrics();
        assert_eq!(resolve_mode(&w, PixelPoint::new(10.0, 10.0), &m), InteractionMode::Dragging);
        // Only one axis inside the handle band.
        assert_eq!(resolve_mode(&w, PixelPoint::new(250.0, 100.0), &m), InteractionMode::Dragging);
    }

    #[test]
    fn handle_is_relative_to_widget_origin() {
        let w = widget(1, 1, 1, 1);
        // Origin (136,136), size 120 -> handle 240..=256.
        assert_eq!(
            resolve_mode(&w, PixelPoint::new(250.0, 250.0), &metrics()),
            InteractionMode::Resizing
        );
    }

    // -- Gating -------------------------------------------------------------

    #[test]
    fn inert_outside_edit_mode() {
        let mut ix = WidgetInteraction::new();
        let started = ix.pointer_down(
            PixelPoint::new(5.0, 5.0),
            &widget(0, 0, 2, 2),
            &metrics(),
            EditMode::Viewing,
        );
        assert_eq!(started, None);
        assert_eq!(ix.mode(), InteractionMode::Idle);
        assert!(!ix.pointer_move(PixelPoint::new(300.0, 0.0)));
    }

    #[test]
    fn second_pointer_down_is_ignored() {
        let m = metrics();
        let w = widget(0, 0, 2, 2);
        let mut ix = WidgetInteraction::new();
        assert_eq!(
            ix.pointer_down(PixelPoint::new(5.0, 5.0), &w, &m, EditMode::Editing),
            Some(InteractionMode::Dragging)
        );
        assert_eq!(
            ix.pointer_down(PixelPoint::new(250.0, 250.0), &w, &m, EditMode::Editing),
            None
        );
        assert_eq!(ix.mode(), InteractionMode::Dragging);
    }

    // -- Dragging -----------------------------------------------------------

    #[test]
    fn drag_preview_then_commit() {
        let m = metrics();
        let w = widget(0, 0, 2, 2);
        let mut ix = WidgetInteraction::new();
        ix.pointer_down(PixelPoint::new(10.0, 10.0), &w, &m, EditMode::Editing);

        assert!(ix.pointer_move(PixelPoint::new(140.0, 10.0)));
        assert_eq!(ix.on_frame(&m), Some(Preview::Position(GridPosition::new(1, 0))));

        let mutation = ix.pointer_up(PixelPoint::new(140.0, 10.0), &m);
        assert_matches!(
            mutation,
            Some(WidgetMutation::Move { position, .. }) if position == GridPosition::new(1, 0)
        );
        assert_eq!(ix.mode(), InteractionMode::Idle);
    }

    #[test]
    fn drag_clamps_at_zero_per_axis() {
        let m = metrics();
        let w = widget(1, 3, 1, 1);
        let mut ix = WidgetInteraction::new();
        ix.pointer_down(PixelPoint::new(150.0, 420.0), &w, &m, EditMode::Editing);
        ix.pointer_move(PixelPoint::new(-500.0, 300.0));
        assert_eq!(ix.on_frame(&m), Some(Preview::Position(GridPosition::new(0, 2))));
    }

    #[test]
    fn moves_are_coalesced_to_latest_sample() {
        let m = metrics();
        let w = widget(0, 0, 1, 1);
        let mut ix = WidgetInteraction::new();
        ix.pointer_down(PixelPoint::new(10.0, 10.0), &w, &m, EditMode::Editing);

        assert!(ix.pointer_move(PixelPoint::new(150.0, 10.0)));
        assert!(!ix.pointer_move(PixelPoint::new(290.0, 10.0)));
        assert!(!ix.pointer_move(PixelPoint::new(420.0, 10.0)));
        assert!(ix.session().unwrap().has_pending_frame());
        assert_eq!(ix.on_frame(&m), Some(Preview::Position(GridPosition::new(3, 0))));
        // Nothing pending any more.
        assert!(!ix.session().unwrap().has_pending_frame());
        assert_eq!(ix.on_frame(&m), None);
    }

    #[test]
    fn pointer_up_processes_pending_sample() {
        let m = metrics();
        let w = widget(0, 0, 1, 1);
        let mut ix = WidgetInteraction::new();
        ix.pointer_down(PixelPoint::new(10.0, 10.0), &w, &m, EditMode::Editing);
        ix.pointer_move(PixelPoint::new(150.0, 10.0));
        ix.on_frame(&m);
        // Frame for this sample never ran.
        ix.pointer_move(PixelPoint::new(290.0, 10.0));

        let mutation = ix.pointer_up(PixelPoint::new(290.0, 10.0), &m);
        assert_matches!(
            mutation,
            Some(WidgetMutation::Move { position, .. }) if position == GridPosition::new(2, 0)
        );
    }

    #[test]
    fn release_without_movement_commits_nothing() {
        let m = metrics();
        let w = widget(0, 0, 2, 2);
        let mut ix = WidgetInteraction::new();
        ix.pointer_down(PixelPoint::new(10.0, 10.0), &w, &m, EditMode::Editing);
        assert_eq!(ix.pointer_up(PixelPoint::new(10.0, 10.0), &m), None);
        assert_eq!(ix.mode(), InteractionMode::Idle);
    }

    #[test]
    fn sub_cell_jitter_commits_nothing() {
        let m = metrics();
        let w = widget(2, 2, 1, 1);
        let mut ix = WidgetInteraction::new();
        ix.pointer_down(PixelPoint::new(300.0, 300.0), &w, &m, EditMode::Editing);
        ix.pointer_move(PixelPoint::new(330.0, 290.0));
        assert_eq!(ix.on_frame(&m), Some(Preview::Position(GridPosition::new(2, 2))));
        assert_eq!(ix.pointer_up(PixelPoint::new(330.0, 290.0), &m), None);
    }

    // -- Resizing -----------------------------------------------------------

    #[test]
    fn resize_shrinks_and_clamps_at_one() {
        let m = metrics();
        let w = widget(0, 0, 2, 2);
        let mut ix = WidgetInteraction::new();
        assert_eq!(
            ix.pointer_down(PixelPoint::new(250.0, 250.0), &w, &m, EditMode::Editing),
            Some(InteractionMode::Resizing)
        );
        ix.pointer_move(PixelPoint::new(-400.0, 250.0));
        assert_eq!(
            ix.on_frame(&m),
            Some(Preview::Size(GridSize::new(1, 2).unwrap()))
        );
    }

    #[test]
    fn resize_keeps_top_left_anchor() {
        let m = metrics();
        let w = widget(3, 1, 1, 1);
        let mut ix = WidgetInteraction::new();
        ix.pointer_down(PixelPoint::new(524.0, 252.0), &w, &m, EditMode::Editing);
        let session = ix.session().unwrap();
        assert_eq!(session.mode(), InteractionMode::Resizing);
        assert_eq!(session.anchor_position(), GridPosition::new(3, 1));

        let mutation = ix.pointer_up(PixelPoint::new(660.0, 388.0), &m);
        assert_matches!(
            mutation,
            Some(WidgetMutation::Resize { size, .. }) if size == GridSize::new(2, 2).unwrap()
        );
    }

    // -- Cancellation -------------------------------------------------------

    #[test]
    fn cancel_drops_session_and_pending_frame() {
        let m = metrics();
        let w = widget(0, 0, 1, 1);
        let mut ix = WidgetInteraction::new();
        ix.pointer_down(PixelPoint::new(10.0, 10.0), &w, &m, EditMode::Editing);
        ix.pointer_move(PixelPoint::new(400.0, 10.0));
        assert!(ix.cancel());
        assert_eq!(ix.on_frame(&m), None);
        assert_eq!(ix.pointer_up(PixelPoint::new(400.0, 10.0), &m), None);
        assert!(!ix.cancel());
    }
}
