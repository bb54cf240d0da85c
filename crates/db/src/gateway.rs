//! PostgreSQL implementation of the core [`LayoutGateway`].

use biogrid_core::gateway::{GatewayError, LayoutGateway, LoadOutcome};
use biogrid_core::types::{ProfileId, WidgetId};
use biogrid_core::widget::WidgetRecord;

use crate::models::widget_layout::UpsertWidgetLayout;
use crate::repositories::WidgetLayoutRepo;
use crate::DbPool;

/// Gateway over the `widget_layouts` table.
#[derive(Debug, Clone)]
pub struct PgLayoutGateway {
    pool: DbPool,
}

impl PgLayoutGateway {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl LayoutGateway for PgLayoutGateway {
    async fn load_layout(&self, profile_id: &ProfileId) -> Result<LoadOutcome, GatewayError> {
        let rows = WidgetLayoutRepo::list_by_profile(&self.pool, profile_id.as_str())
            .await
            .map_err(classify_sqlx_error)?;

        let stored = rows.len();
        let records: Vec<WidgetRecord> = rows
            .into_iter()
            .filter_map(|row| {
                let widget_id = row.widget_id.clone();
                match row.into_record() {
                    Ok(record) => Some(record),
                    Err(err) => {
                        tracing::warn!(
                            profile_id = %profile_id,
                            widget_id = %widget_id,
                            error = %err,
                            "Skipping unreadable widget row",
                        );
                        None
                    }
                }
            })
            .collect();

        // Rows exist but none could be read: not a confirmed empty profile.
        if stored > 0 && records.is_empty() {
            return Err(GatewayError::Corrupt(format!(
                "none of the {stored} stored widget rows for profile '{profile_id}' are readable"
            )));
        }

        Ok(LoadOutcome::from_records(records))
    }

    async fn save_widget(
        &self,
        record: &WidgetRecord,
        profile_id: &ProfileId,
    ) -> Result<(), GatewayError> {
        let dto = UpsertWidgetLayout::from_record(record)
            .map_err(|err| GatewayError::Rejected(err.to_string()))?;
        WidgetLayoutRepo::upsert(&self.pool, profile_id.as_str(), &dto)
            .await
            .map_err(classify_sqlx_error)?;
        tracing::debug!(profile_id = %profile_id, widget_id = %record.id, "Widget saved");
        Ok(())
    }

    async fn delete_widget(
        &self,
        profile_id: &ProfileId,
        widget_id: &WidgetId,
    ) -> Result<bool, GatewayError> {
        WidgetLayoutRepo::delete(&self.pool, profile_id.as_str(), widget_id.as_str())
            .await
            .map_err(classify_sqlx_error)
    }
}

/// Constraint violations are rejections; everything else means the store
/// could not be reached or the query failed.
fn classify_sqlx_error(err: sqlx::Error) -> GatewayError {
    match &err {
        sqlx::Error::Database(db_err)
            if matches!(db_err.code().as_deref(), Some("23505" | "23514")) =>
        {
            GatewayError::Rejected(db_err.to_string())
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            GatewayError::Corrupt(err.to_string())
        }
        _ => GatewayError::Unavailable(err.to_string()),
    }
}
