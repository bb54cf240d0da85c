//! Widget records and the mutations that produce new snapshots of them.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::grid::{GridPosition, GridSize};
use crate::platform::{Platform, WidgetKind};
use crate::types::WidgetId;

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One placed widget on a profile grid.
///
/// Records are treated as immutable snapshots: every edit goes through a
/// `with_*` method or [`WidgetMutation::apply`] and yields a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetRecord {
    pub id: WidgetId,
    pub kind: WidgetKind,
    pub platform: Platform,
    pub grid_position: GridPosition,
    pub grid_size: GridSize,
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_color: Option<String>,
}

impl WidgetRecord {
    /// Fresh, visible widget at the grid origin with the platform's default
    /// size and a newly generated id.
    pub fn new(platform: Platform) -> Self {
        Self {
            id: WidgetId::generate(),
            kind: platform.kind(),
            platform,
            grid_position: GridPosition::ORIGIN,
            grid_size: platform.default_size(),
            visible: true,
            integration_url: None,
            custom_color: None,
        }
    }

    pub fn with_position(&self, grid_position: GridPosition) -> Self {
        Self {
            grid_position,
            ..self.clone()
        }
    }

    pub fn with_size(&self, grid_size: GridSize) -> Self {
        Self {
            grid_size,
            ..self.clone()
        }
    }

    pub fn with_visibility(&self, visible: bool) -> Self {
        Self {
            visible,
            ..self.clone()
        }
    }

    pub fn with_color(&self, custom_color: Option<String>) -> Self {
        Self {
            custom_color,
            ..self.clone()
        }
    }

    pub fn with_integration_url(&self, integration_url: Option<String>) -> Self {
        Self {
            integration_url,
            ..self.clone()
        }
    }

    /// Colour to draw the widget accent with: the custom override if set,
    /// otherwise the platform palette.
    pub fn accent_color(&self) -> &str {
        self.custom_color
            .as_deref()
            .unwrap_or(self.platform.descriptor().palette.accent)
    }

    /// Check record invariants.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id.as_str().trim().is_empty() {
            return Err(CoreError::Validation("Widget id must not be empty".into()));
        }
        if self.kind != self.platform.kind() {
            return Err(CoreError::Validation(format!(
                "Widget type '{}' does not match platform '{}' (expected '{}')",
                self.kind.as_str(),
                self.platform.key(),
                self.platform.kind().as_str()
            )));
        }
        GridSize::new(self.grid_size.width, self.grid_size.height)?;
        let GridPosition { x, y } = self.grid_position;
        if x > GridPosition::MAX_AXIS || y > GridPosition::MAX_AXIS {
            return Err(CoreError::Validation(format!(
                "Grid position ({x}, {y}) exceeds the maximum of {}",
                GridPosition::MAX_AXIS
            )));
        }
        if let Some(color) = &self.custom_color {
            validate_color(color)?;
        }
        if let Some(url) = &self.integration_url {
            validate_integration_url(self.platform, url)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// Accept `#rgb` or `#rrggbb` hex colours.
pub fn validate_color(color: &str) -> Result<(), CoreError> {
    let hex = color.strip_prefix('#').unwrap_or_default();
    let ok = matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit());
    if ok {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid colour '{color}'. Expected #rgb or #rrggbb"
        )))
    }
}

/// Integration URLs are only meaningful on service widgets and must point at
/// the platform's own domain.
pub fn validate_integration_url(platform: Platform, url: &str) -> Result<(), CoreError> {
    let Some(prefix) = platform.descriptor().integration_url_prefix else {
        return Err(CoreError::Validation(format!(
            "Platform '{}' does not accept an integration URL",
            platform.key()
        )));
    };
    match url.strip_prefix(prefix) {
        Some(rest) if !rest.trim().is_empty() => Ok(()),
        _ => Err(CoreError::Validation(format!(
            "Integration URL for '{}' must start with {prefix}",
            platform.key()
        ))),
    }
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// A committed change to one widget, emitted by drag/resize commits and by
/// direct edits. Every mutation results in one full-record upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetMutation {
    Move { id: WidgetId, position: GridPosition },
    Resize { id: WidgetId, size: GridSize },
    SetVisibility { id: WidgetId, visible: bool },
    SetColor { id: WidgetId, color: Option<String> },
    SetIntegrationUrl { id: WidgetId, url: Option<String> },
}

impl WidgetMutation {
    pub fn widget_id(&self) -> &WidgetId {
        match self {
            Self::Move { id, .. }
            | Self::Resize { id, .. }
            | Self::SetVisibility { id, .. }
            | Self::SetColor { id, .. }
            | Self::SetIntegrationUrl { id, .. } => id,
        }
    }

    /// Whether the mutation changes geometry (and so raises the widget).
    pub fn is_geometric(&self) -> bool {
        matches!(self, Self::Move { .. } | Self::Resize { .. })
    }

    /// Produce the next snapshot of `record`, validating edited fields.
    pub fn apply(&self, record: &WidgetRecord) -> Result<WidgetRecord, CoreError> {
        match self {
            Self::Move { position, .. } => Ok(record.with_position(*position)),
            Self::Resize { size, .. } => {
                let size = GridSize::new(size.width, size.height)?;
                Ok(record.with_size(size))
            }
            Self::SetVisibility { visible, .. } => Ok(record.with_visibility(*visible)),
            Self::SetColor { color, .. } => {
                if let Some(c) = color {
                    validate_color(c)?;
                }
                Ok(record.with_color(color.clone()))
            }
            Self::SetIntegrationUrl { url, .. } => {
                if let Some(u) = url {
                    validate_integration_url(record.platform, u)?;
                }
                Ok(record.with_integration_url(url.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn new_record_uses_platform_defaults() {
        let record = WidgetRecord::new(Platform::Youtube);
        assert_eq!(record.kind, WidgetKind::Social);
        assert_eq!(record.grid_position, GridPosition::ORIGIN);
        assert_eq!(record.grid_size, GridSize::new(4, 2).unwrap());
        assert!(record.visible);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn with_methods_leave_original_untouched() {
        let original = WidgetRecord::new(Platform::Github);
        let moved = original.with_position(GridPosition::new(3, 1));
        assert_eq!(original.grid_position, GridPosition::ORIGIN);
        assert_eq!(moved.grid_position, GridPosition::new(3, 1));
        assert_eq!(moved.id, original.id);
    }

    #[test]
    fn kind_must_match_platform() {
        let mut record = WidgetRecord::new(Platform::Calendly);
        record.kind = WidgetKind::Social;
        assert_matches!(record.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn position_must_fit_storage_range() {
        let edge = GridPosition::new(GridPosition::MAX_AXIS, 0);
        assert!(WidgetRecord::new(Platform::Github).with_position(edge).validate().is_ok());

        let beyond = GridPosition::new(0, GridPosition::MAX_AXIS + 1);
        let record = WidgetRecord::new(Platform::Github).with_position(beyond);
        assert_matches!(record.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn colour_validation() {
        assert!(validate_color("#fff").is_ok());
        assert!(validate_color("#1DA1F2").is_ok());
        assert!(validate_color("1da1f2").is_err());
        assert!(validate_color("#12345").is_err());
        assert!(validate_color("#ggg").is_err());
    }

    #[test]
    fn integration_url_only_on_service_widgets() {
        assert!(validate_integration_url(Platform::Calendly, "https://calendly.com/ada").is_ok());
        assert!(validate_integration_url(Platform::Calendly, "https://calendly.com/").is_err());
        assert!(validate_integration_url(Platform::Calendly, "https://evil.example/").is_err());
        assert!(
            validate_integration_url(Platform::Instagram, "https://instagram.com/ada").is_err()
        );
    }

    #[test]
    fn accent_prefers_custom_colour() {
        let record = WidgetRecord::new(Platform::Twitter);
        assert_eq!(record.accent_color(), "#1da1f2");
        let tinted = record.with_color(Some("#000".into()));
        assert_eq!(tinted.accent_color(), "#000");
    }

    #[test]
    fn apply_rejects_invalid_edits() {
        let record = WidgetRecord::new(Platform::Twitter);
        let bad_color = WidgetMutation::SetColor {
            id: record.id.clone(),
            color: Some("red".into()),
        };
        assert!(bad_color.apply(&record).is_err());

        let bad_size = WidgetMutation::Resize {
            id: record.id.clone(),
            size: GridSize { width: 0, height: 2 },
        };
        assert!(bad_size.apply(&record).is_err());
    }

    #[test]
    fn apply_clears_optional_fields() {
        let record = WidgetRecord::new(Platform::Buymeacoffee)
            .with_integration_url(Some("https://buymeacoffee.com/ada".into()));
        let cleared = WidgetMutation::SetIntegrationUrl {
            id: record.id.clone(),
            url: None,
        }
        .apply(&record)
        .unwrap();
        assert_eq!(cleared.integration_url, None);
    }

    #[test]
    fn wire_format_is_camel_case() {
        let record = WidgetRecord::new(Platform::Instagram);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["gridPosition"]["x"], 0);
        assert_eq!(json["gridSize"]["width"], 2);
        assert_eq!(json["platform"], "instagram");
        assert_eq!(json["kind"], "social");
        assert!(json.get("customColor").is_none());
    }
}
