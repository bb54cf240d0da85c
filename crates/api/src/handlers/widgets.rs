//! Handlers for a profile's widget layout.
//!
//! Reads and writes go through the layout gateway so the HTTP surface shares
//! the load-or-seed and upsert semantics used by the editor.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use biogrid_core::error::CoreError;
use biogrid_core::gateway::{GatewayError, LayoutGateway};
use biogrid_core::layout::WidgetLayout;
use biogrid_core::platform::Platform;
use biogrid_core::sync::{resolve_platforms, LayoutSync, LoadState, SaveOutcome};
use biogrid_core::types::{ProfileId, WidgetId};
use biogrid_core::widget::WidgetRecord;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

/// Body of `POST /widgets/initialize`: the profile's connected accounts.
#[derive(Debug, Default, Deserialize)]
pub struct InitializeLayout {
    #[serde(default)]
    pub platforms: Vec<String>,
}

/// Body of `POST /widgets`.
#[derive(Debug, Deserialize)]
pub struct AddWidget {
    pub platform: String,
}

/// A layout together with how it was obtained.
#[derive(Debug, Serialize)]
pub struct LayoutSnapshot {
    pub state: LoadState,
    pub widgets: Vec<WidgetRecord>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Open the profile's layout, refusing to continue on an unconfirmed load so
/// that callers never act on an empty layout that may not be empty.
async fn open_layout<G: LayoutGateway + 'static>(
    gateway: Arc<G>,
    profile_id: ProfileId,
    connected: &[Platform],
) -> AppResult<LayoutSync<G>> {
    let sync = LayoutSync::open(gateway, profile_id, connected).await;
    if sync.state() == LoadState::Unconfirmed {
        return Err(GatewayError::Unavailable("Widget layout could not be loaded".into()).into());
    }
    Ok(sync)
}

fn snapshot<G>(sync: &LayoutSync<G>) -> LayoutSnapshot
where
    G: LayoutGateway + 'static,
{
    LayoutSnapshot {
        state: sync.state(),
        widgets: sync.layout().records().cloned().collect(),
    }
}

/// Add a widget for `platform`, or return the one the profile already has.
///
/// A concurrent add for the same platform can land between our load and our
/// insert. The store then rejects our row and the stored widget is returned.
pub(crate) async fn add_or_existing<G: LayoutGateway + 'static>(
    gateway: Arc<G>,
    profile_id: ProfileId,
    platform: Platform,
) -> AppResult<(StatusCode, WidgetRecord)> {
    let mut sync = open_layout(Arc::clone(&gateway), profile_id, &[]).await?;

    match sync.add_widget(platform).await {
        Some(SaveOutcome::Saved(record)) => {
            tracing::info!(
                profile_id = %sync.profile_id(),
                widget_id = %record.id,
                platform = platform.key(),
                "Widget added",
            );
            Ok((StatusCode::CREATED, record))
        }
        Some(SaveOutcome::Failed {
            error: GatewayError::Rejected(reason),
            ..
        }) => {
            tracing::info!(
                profile_id = %sync.profile_id(),
                platform = platform.key(),
                "Widget add rejected by the store, returning the stored widget",
            );
            gateway
                .load_layout(sync.profile_id())
                .await?
                .into_records()
                .into_iter()
                .find(|r| r.platform == platform)
                .map(|record| (StatusCode::OK, record))
                .ok_or_else(|| GatewayError::Rejected(reason).into())
        }
        Some(SaveOutcome::Failed { error, .. }) => Err(error.into()),
        None => sync
            .layout()
            .records()
            .find(|r| r.platform == platform)
            .cloned()
            .map(|record| (StatusCode::OK, record))
            .ok_or_else(|| CoreError::Internal("Widget vanished during add".into()).into()),
    }
}

// ---------------------------------------------------------------------------
// Layout endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/profiles/{profile_id}/widgets
///
/// All stored widgets of a profile in load order, hidden ones included.
pub async fn list_widgets(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let profile_id = ProfileId::new(profile_id);
    let records = state.gateway.load_layout(&profile_id).await?.into_records();

    Ok(Json(DataResponse { data: records }))
}

/// POST /api/v1/profiles/{profile_id}/widgets/initialize
///
/// Load the layout, seeding one default widget per connected platform when
/// the profile has none. Unknown platform keys are ignored.
pub async fn initialize_layout(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Json(input): Json<InitializeLayout>,
) -> AppResult<impl IntoResponse> {
    let connected = resolve_platforms(&input.platforms);
    let sync = open_layout(state.gateway.clone(), ProfileId::new(profile_id), &connected).await?;

    tracing::info!(
        profile_id = %sync.profile_id(),
        state = ?sync.state(),
        count = sync.layout().len(),
        "Widget layout initialized",
    );

    let status = match sync.state() {
        LoadState::Seeded => StatusCode::CREATED,
        _ => StatusCode::OK,
    };
    Ok((status, Json(DataResponse { data: snapshot(&sync) })))
}

/// POST /api/v1/profiles/{profile_id}/widgets
///
/// Add a widget for a platform at the origin with its default size. A
/// profile holds at most one widget per platform; adding an existing one
/// returns it unchanged.
pub async fn add_widget(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Json(input): Json<AddWidget>,
) -> AppResult<impl IntoResponse> {
    let platform = Platform::from_key(&input.platform)?;
    let (status, record) =
        add_or_existing(state.gateway.clone(), ProfileId::new(profile_id), platform).await?;

    Ok((status, Json(DataResponse { data: record })))
}

/// PUT /api/v1/profiles/{profile_id}/widgets/{widget_id}
///
/// Upsert the full widget record. The body id must match the path.
pub async fn save_widget(
    State(state): State<AppState>,
    Path((profile_id, widget_id)): Path<(String, String)>,
    Json(record): Json<WidgetRecord>,
) -> AppResult<impl IntoResponse> {
    if record.id.as_str() != widget_id {
        return Err(AppError::BadRequest(format!(
            "Body id '{}' does not match path id '{widget_id}'",
            record.id
        )));
    }
    record.validate()?;

    let profile_id = ProfileId::new(profile_id);
    state.gateway.save_widget(&record, &profile_id).await?;

    tracing::info!(
        profile_id = %profile_id,
        widget_id = %record.id,
        x = record.grid_position.x,
        y = record.grid_position.y,
        width = record.grid_size.width,
        height = record.grid_size.height,
        visible = record.visible,
        "Widget saved",
    );

    Ok(Json(DataResponse { data: record }))
}

/// DELETE /api/v1/profiles/{profile_id}/widgets/{widget_id}
pub async fn delete_widget(
    State(state): State<AppState>,
    Path((profile_id, widget_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let profile_id = ProfileId::new(profile_id);
    let widget_id = WidgetId::new(widget_id);
    let deleted = state.gateway.delete_widget(&profile_id, &widget_id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Widget",
            id: widget_id.to_string(),
        }));
    }

    tracing::info!(profile_id = %profile_id, widget_id = %widget_id, "Widget deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// GET /api/v1/profiles/{profile_id}/render
///
/// Visible widgets in stacking order with pixel rectangles computed from the
/// configured grid metrics.
pub async fn render_layout(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let profile_id = ProfileId::new(profile_id);
    let records = state.gateway.load_layout(&profile_id).await?.into_records();
    let layout = WidgetLayout::from_records(records);

    Ok(Json(DataResponse {
        data: layout.render_pass(&state.config.grid),
    }))
}
