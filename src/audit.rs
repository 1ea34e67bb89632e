use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult, state::AppState};

pub async fn log_audit(
    pool: &DbPool,
    user_id: Option<Uuid>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
    created_at: DateTime<Utc>,
) -> AppResult<()> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(action)
    .bind(resource)
    .bind(metadata.map(|m| m.to_string()))
    .bind(created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Records an audit entry after the business write has committed.
/// A failed audit write is logged and never fails the request.
pub async fn record(
    state: &AppState,
    user_id: Option<Uuid>,
    action: &str,
    resource: &str,
    metadata: Value,
) {
    let created_at = state.clock.now();
    if let Err(err) = log_audit(
        &state.pool,
        user_id,
        action,
        Some(resource),
        Some(metadata),
        created_at,
    )
    .await
    {
        tracing::warn!(error = %err, action, "audit log failed");
    }
}
