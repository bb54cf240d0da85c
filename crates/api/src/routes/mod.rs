pub mod health;
pub mod platforms;
pub mod widgets;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /platforms                                       platform catalog
/// /profiles/{profile_id}/widgets                   list, add
/// /profiles/{profile_id}/widgets/initialize        load-or-seed
/// /profiles/{profile_id}/widgets/{widget_id}       upsert, delete
/// /profiles/{profile_id}/render                    visible widgets with pixel geometry
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/platforms", platforms::router())
        .nest("/profiles/{profile_id}", widgets::router())
}
