use axum::response::IntoResponse;
use axum::Json;
use biogrid_core::platform::{Platform, PlatformDescriptor};
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;

/// One entry of the platform catalog.
#[derive(Debug, Serialize)]
pub struct PlatformEntry {
    pub key: &'static str,
    #[serde(flatten)]
    pub descriptor: &'static PlatformDescriptor,
}

/// GET /api/v1/platforms
///
/// Every supported platform with its default size, colours and widget type.
pub async fn list_platforms() -> AppResult<impl IntoResponse> {
    let entries: Vec<PlatformEntry> = Platform::ALL
        .iter()
        .map(|platform| PlatformEntry {
            key: platform.key(),
            descriptor: platform.descriptor(),
        })
        .collect();

    Ok(Json(DataResponse { data: entries }))
}
