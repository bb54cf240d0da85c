//! Grid coordinate model.
//!
//! Widgets are placed in integer grid cells; everything drawn on screen is
//! derived from cell counts through two constants, the cell size `S` and the
//! inter-cell gap `G`. Pointer deltas travel the other way and are quantized
//! by [`GridMetrics::pixel_delta_to_grid_delta`], the only rounding rule used
//! by drag and resize.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default edge length of one grid cell in pixels.
pub const DEFAULT_CELL_SIZE: f64 = 120.0;

/// Default gap between neighbouring cells in pixels.
pub const DEFAULT_GAP: f64 = 16.0;

/// Default edge length of the bottom-right resize handle in pixels.
pub const DEFAULT_HANDLE_SIZE: f64 = 16.0;

// ---------------------------------------------------------------------------
// Grid units
// ---------------------------------------------------------------------------

/// Top-left cell occupied by a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: u32,
    pub y: u32,
}

impl GridPosition {
    pub const ORIGIN: GridPosition = GridPosition { x: 0, y: 0 };

    /// Largest coordinate a stored position can hold on either axis.
    pub const MAX_AXIS: u32 = i32::MAX as u32;

    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Shift by a signed delta, clamping each axis independently at zero.
    pub fn offset(self, delta: GridDelta) -> Self {
        Self {
            x: clamp_axis(self.x, delta.dx, 0),
            y: clamp_axis(self.y, delta.dy, 0),
        }
    }
}

/// Footprint of a widget in cells. Both dimensions are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    pub const MIN: GridSize = GridSize { width: 1, height: 1 };

    /// Build a size, rejecting zero-width or zero-height footprints.
    pub fn new(width: u32, height: u32) -> Result<Self, CoreError> {
        if width == 0 || height == 0 {
            return Err(CoreError::Validation(format!(
                "Grid size {width}x{height} must be at least 1x1"
            )));
        }
        Ok(Self { width, height })
    }

    /// Grow (or shrink) by a signed delta, clamping each dimension at 1.
    pub fn grow(self, delta: GridDelta) -> Self {
        Self {
            width: clamp_axis(self.width, delta.dx, 1),
            height: clamp_axis(self.height, delta.dy, 1),
        }
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::MIN
    }
}

/// Signed cell delta produced by quantizing a pointer movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridDelta {
    pub dx: i32,
    pub dy: i32,
}

impl GridDelta {
    pub const ZERO: GridDelta = GridDelta { dx: 0, dy: 0 };

    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

fn clamp_axis(value: u32, delta: i32, floor: i64) -> u32 {
    let next = (i64::from(value) + i64::from(delta)).max(floor);
    u32::try_from(next).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// Pixel units
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelSize {
    pub width: f64,
    pub height: f64,
}

/// Axis-aligned rectangle in pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub origin: PixelPoint,
    pub size: PixelSize,
}

impl PixelRect {
    /// Whether `point` lies inside the rectangle (edges inclusive).
    pub fn contains(&self, point: PixelPoint) -> bool {
        point.x >= self.origin.x
            && point.y >= self.origin.y
            && point.x <= self.origin.x + self.size.width
            && point.y <= self.origin.y + self.size.height
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Pixel constants of one rendering context.
///
/// Configured per grid, never per widget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridMetrics {
    cell_size: f64,
    gap: f64,
    handle_size: f64,
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            gap: DEFAULT_GAP,
            handle_size: DEFAULT_HANDLE_SIZE,
        }
    }
}

impl GridMetrics {
    /// Validate and build metrics.
    ///
    /// The handle must be strictly smaller than a cell, otherwise a 1x1
    /// widget could never be dragged.
    pub fn new(cell_size: f64, gap: f64, handle_size: f64) -> Result<Self, CoreError> {
        for (name, value) in [
            ("cell_size", cell_size),
            ("gap", gap),
            ("handle_size", handle_size),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CoreError::Validation(format!(
                    "{name} must be a positive finite pixel length, got {value}"
                )));
            }
        }
        if handle_size >= cell_size {
            return Err(CoreError::Validation(format!(
                "handle_size {handle_size} must be smaller than cell_size {cell_size}"
            )));
        }
        Ok(Self {
            cell_size,
            gap,
            handle_size,
        })
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn gap(&self) -> f64 {
        self.gap
    }

    pub fn handle_size(&self) -> f64 {
        self.handle_size
    }

    /// Cell size plus gap: the distance between the origins of adjacent cells.
    pub fn pitch(&self) -> f64 {
        self.cell_size + self.gap
    }

    pub fn to_pixel_position(&self, position: GridPosition) -> PixelPoint {
        PixelPoint {
            x: f64::from(position.x) * self.pitch(),
            y: f64::from(position.y) * self.pitch(),
        }
    }

    pub fn to_pixel_size(&self, size: GridSize) -> PixelSize {
        PixelSize {
            width: span(size.width, self.cell_size, self.gap),
            height: span(size.height, self.cell_size, self.gap),
        }
    }

    pub fn pixel_rect(&self, position: GridPosition, size: GridSize) -> PixelRect {
        PixelRect {
            origin: self.to_pixel_position(position),
            size: self.to_pixel_size(size),
        }
    }

    /// Quantize a pointer delta to whole cells (round to nearest, halves away
    /// from zero).
    pub fn pixel_delta_to_grid_delta(&self, dx: f64, dy: f64) -> GridDelta {
        GridDelta {
            dx: quantize(dx, self.pitch()),
            dy: quantize(dy, self.pitch()),
        }
    }

    /// Inverse of [`to_pixel_position`](Self::to_pixel_position).
    ///
    /// Exact for pixel points produced by the forward mapping; arbitrary
    /// points snap to the nearest cell origin and never go negative.
    pub fn to_grid_position(&self, point: PixelPoint) -> GridPosition {
        GridPosition::ORIGIN.offset(self.pixel_delta_to_grid_delta(point.x, point.y))
    }

    /// Bottom-right handle region of a widget occupying `rect`.
    pub fn handle_rect(&self, rect: PixelRect) -> PixelRect {
        PixelRect {
            origin: PixelPoint {
                x: rect.origin.x + rect.size.width - self.handle_size,
                y: rect.origin.y + rect.size.height - self.handle_size,
            },
            size: PixelSize {
                width: self.handle_size,
                height: self.handle_size,
            },
        }
    }
}

fn span(cells: u32, cell_size: f64, gap: f64) -> f64 {
    let cells = f64::from(cells);
    cells * cell_size + (cells - 1.0).max(0.0) * gap
}

fn quantize(pixels: f64, pitch: f64) -> i32 {
    let cells = (pixels / pitch).round();
    if cells.is_nan() {
        0
    } else {
        // `as` saturates at the i32 bounds.
        cells as i32
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
