//! Repository for the `widget_layouts` table.
//!
//! One row per widget per profile. Writes are full-row upserts keyed by
//! `(profile_id, widget_id)`, so callers can save after every single-field
//! edit without reading first.

use sqlx::PgPool;

use crate::models::widget_layout::{UpsertWidgetLayout, WidgetLayoutRow};

/// Column list for `widget_layouts` queries.
const COLUMNS: &str = "\
    id, profile_id, widget_id, widget_type, platform, position_x, position_y, \
    size, is_visible, custom_color, integration_url, created_at, updated_at";

/// Provides data access for widget layout rows.
pub struct WidgetLayoutRepo;

impl WidgetLayoutRepo {
    /// List all rows for a profile in load order (oldest first).
    pub async fn list_by_profile(
        pool: &PgPool,
        profile_id: &str,
    ) -> Result<Vec<WidgetLayoutRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM widget_layouts \
             WHERE profile_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, WidgetLayoutRow>(&query)
            .bind(profile_id)
            .fetch_all(pool)
            .await
    }

    /// Find a single widget row within a profile.
    pub async fn find(
        pool: &PgPool,
        profile_id: &str,
        widget_id: &str,
    ) -> Result<Option<WidgetLayoutRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM widget_layouts \
             WHERE profile_id = $1 AND widget_id = $2"
        );
        sqlx::query_as::<_, WidgetLayoutRow>(&query)
            .bind(profile_id)
            .bind(widget_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or overwrite the full row for a widget.
    ///
    /// `id` mirrors `widget_id`; `created_at` is kept on overwrite and
    /// `updated_at` is maintained by trigger.
    pub async fn upsert(
        pool: &PgPool,
        profile_id: &str,
        dto: &UpsertWidgetLayout,
    ) -> Result<WidgetLayoutRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO widget_layouts \
                 (id, profile_id, widget_id, widget_type, platform, position_x, position_y, \
                  size, is_visible, custom_color, integration_url) \
             VALUES ($1, $2, $1, $3, $4, $5, $6, $7, $8, $9, $10) \
             ON CONFLICT (profile_id, widget_id) DO UPDATE SET \
                 widget_type     = EXCLUDED.widget_type, \
                 platform        = EXCLUDED.platform, \
                 position_x      = EXCLUDED.position_x, \
                 position_y      = EXCLUDED.position_y, \
                 size            = EXCLUDED.size, \
                 is_visible      = EXCLUDED.is_visible, \
                 custom_color    = EXCLUDED.custom_color, \
                 integration_url = EXCLUDED.integration_url \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WidgetLayoutRow>(&query)
            .bind(&dto.widget_id)
            .bind(profile_id)
            .bind(&dto.widget_type)
            .bind(&dto.platform)
            .bind(dto.position_x)
            .bind(dto.position_y)
            .bind(&dto.size)
            .bind(dto.is_visible)
            .bind(&dto.custom_color)
            .bind(&dto.integration_url)
            .fetch_one(pool)
            .await
    }

    /// Hard-delete a widget row.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(
        pool: &PgPool,
        profile_id: &str,
        widget_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM widget_layouts WHERE profile_id = $1 AND widget_id = $2")
                .bind(profile_id)
                .bind(widget_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
