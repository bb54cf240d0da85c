//! Widget layout row model, upsert DTO and the `"WxH"` size codec.

use biogrid_core::error::CoreError;
use biogrid_core::grid::{GridPosition, GridSize};
use biogrid_core::platform::{Platform, WidgetKind};
use biogrid_core::types::{Timestamp, WidgetId};
use biogrid_core::widget::WidgetRecord;
use serde::Serialize;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Size token codec
// ---------------------------------------------------------------------------

/// Size used when a stored token cannot be parsed.
pub const FALLBACK_SIZE: GridSize = GridSize::MIN;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Malformed size token '{0}', expected '<width>x<height>'")]
pub struct SizeTokenError(pub String);

/// Encode a size as its compact storage token, e.g. `"2x1"`.
pub fn encode_size(size: GridSize) -> String {
    format!("{}x{}", size.width, size.height)
}

/// Strictly parse a `"WxH"` token. Both parts must be positive integers.
pub fn parse_size(token: &str) -> Result<GridSize, SizeTokenError> {
    let malformed = || SizeTokenError(token.to_string());
    let (width, height) = token.split_once('x').ok_or_else(malformed)?;
    let width: u32 = width.parse().map_err(|_| malformed())?;
    let height: u32 = height.parse().map_err(|_| malformed())?;
    GridSize::new(width, height).map_err(|_| malformed())
}

/// Decode a stored token, failing closed to a 1x1 footprint.
pub fn decode_size(token: &str) -> GridSize {
    parse_size(token).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "Falling back to minimum widget size");
        FALLBACK_SIZE
    })
}

// ---------------------------------------------------------------------------
// Entity struct (database row)
// ---------------------------------------------------------------------------

/// A row from the `widget_layouts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WidgetLayoutRow {
    pub id: String,
    pub profile_id: String,
    pub widget_id: String,
    pub widget_type: String,
    pub platform: String,
    pub position_x: i32,
    pub position_y: i32,
    pub size: String,
    pub is_visible: bool,
    pub custom_color: Option<String>,
    pub integration_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl WidgetLayoutRow {
    /// Convert to the domain record.
    ///
    /// Unknown platforms or widget types are an error; a malformed size
    /// token is not (see [`decode_size`]).
    pub fn into_record(self) -> Result<WidgetRecord, CoreError> {
        let platform = Platform::from_key(&self.platform)?;
        let kind = WidgetKind::from_name(&self.widget_type)?;
        let position = GridPosition::new(
            non_negative(self.position_x, "position_x")?,
            non_negative(self.position_y, "position_y")?,
        );
        Ok(WidgetRecord {
            id: WidgetId::new(self.widget_id),
            kind,
            platform,
            grid_position: position,
            grid_size: decode_size(&self.size),
            visible: self.is_visible,
            integration_url: self.integration_url,
            custom_color: self.custom_color,
        })
    }
}

fn non_negative(value: i32, column: &str) -> Result<u32, CoreError> {
    u32::try_from(value)
        .map_err(|_| CoreError::Validation(format!("{column} must be non-negative, got {value}")))
}

// ---------------------------------------------------------------------------
// DTO (upsert payload)
// ---------------------------------------------------------------------------

/// Full-row payload for an upsert. Built from a validated record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertWidgetLayout {
    pub widget_id: String,
    pub widget_type: String,
    pub platform: String,
    pub position_x: i32,
    pub position_y: i32,
    pub size: String,
    pub is_visible: bool,
    pub custom_color: Option<String>,
    pub integration_url: Option<String>,
}

impl UpsertWidgetLayout {
    pub fn from_record(record: &WidgetRecord) -> Result<Self, CoreError> {
        record.validate()?;
        Ok(Self {
            widget_id: record.id.to_string(),
            widget_type: record.kind.as_str().to_string(),
            platform: record.platform.key().to_string(),
            position_x: to_column(record.grid_position.x, "position_x")?,
            position_y: to_column(record.grid_position.y, "position_y")?,
            size: encode_size(record.grid_size),
            is_visible: record.visible,
            custom_color: record.custom_color.clone(),
            integration_url: record.integration_url.clone(),
        })
    }
}

fn to_column(value: u32, column: &str) -> Result<i32, CoreError> {
    i32::try_from(value)
        .map_err(|_| CoreError::Validation(format!("{column} {value} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_token_format() {
        assert_eq!(encode_size(GridSize::new(2, 1).unwrap()), "2x1");
        assert_eq!(parse_size("4x2").unwrap(), GridSize::new(4, 2).unwrap());
    }

    #[test]
    fn malformed_tokens_are_rejected_strictly() {
        for token in ["", "2", "2x", "x2", "2X2", "2x2x2", "-1x2", "0x1", "a x b", " 2x2"] {
            assert!(parse_size(token).is_err(), "{token:?} should not parse");
        }
    }

    #[test]
    fn decode_falls_back_to_minimum() {
        assert_eq!(decode_size("garbage"), GridSize::MIN);
        assert_eq!(decode_size("0x0"), GridSize::MIN);
        assert_eq!(decode_size("3x2"), GridSize::new(3, 2).unwrap());
    }

    fn row(platform: &str, widget_type: &str, size: &str) -> WidgetLayoutRow {
        WidgetLayoutRow {
            id: "w1".into(),
            profile_id: "p1".into(),
            widget_id: "w1".into(),
            widget_type: widget_type.into(),
            platform: platform.into(),
            position_x: 2,
            position_y: 0,
            size: size.into(),
            is_visible: true,
            custom_color: None,
            integration_url: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn row_converts_to_record() {
        let record = row("github", "social", "2x2").into_record().unwrap();
        assert_eq!(record.id.as_str(), "w1");
        assert_eq!(record.platform, Platform::Github);
        assert_eq!(record.grid_position, GridPosition::new(2, 0));
        assert_eq!(record.grid_size, GridSize::new(2, 2).unwrap());
    }

    #[test]
    fn row_with_bad_size_still_loads() {
        let record = row("github", "social", "wide").into_record().unwrap();
        assert_eq!(record.grid_size, GridSize::MIN);
    }

    #[test]
    fn row_with_unknown_platform_is_rejected() {
        assert!(row("myspace", "social", "2x2").into_record().is_err());
        assert!(row("github", "banner", "2x2").into_record().is_err());
    }

    #[test]
    fn upsert_payload_from_record() {
        let record = WidgetRecord::new(Platform::Calendly)
            .with_position(GridPosition::new(1, 4))
            .with_integration_url(Some("https://calendly.com/ada".into()));
        let dto = UpsertWidgetLayout::from_record(&record).unwrap();
        assert_eq!(dto.widget_type, "service");
        assert_eq!(dto.platform, "calendly");
        assert_eq!((dto.position_x, dto.position_y), (1, 4));
        assert_eq!(dto.size, "2x1");
        assert_eq!(dto.widget_id, record.id.to_string());
    }

    #[test]
    fn upsert_payload_rejects_invalid_record() {
        let mut record = WidgetRecord::new(Platform::Twitter);
        record.custom_color = Some("blue".into());
        assert!(UpsertWidgetLayout::from_record(&record).is_err());
    }
}
