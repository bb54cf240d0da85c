//! Route definitions for a profile's widget layout, mounted at
//! `/profiles/{profile_id}`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::widgets;
use crate::state::AppState;

/// ```text
/// GET    /widgets               -> list_widgets
/// POST   /widgets               -> add_widget
/// POST   /widgets/initialize    -> initialize_layout
/// PUT    /widgets/{widget_id}   -> save_widget
/// DELETE /widgets/{widget_id}   -> delete_widget
/// GET    /render                -> render_layout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/widgets",
            get(widgets::list_widgets).post(widgets::add_widget),
        )
        .route("/widgets/initialize", post(widgets::initialize_layout))
        .route(
            "/widgets/{widget_id}",
            put(widgets::save_widget).delete(widgets::delete_widget),
        )
        .route("/render", get(widgets::render_layout))
}
