use axum::extract::State;
use axum::Json;
use tracing::warn;

use crate::api::AppState;
use crate::db::{Database, DbError, Fetched};
use crate::error::AppError;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Ready once the database answers `SELECT 1` on a fresh connection.
pub async fn ready(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let mut db = Database::new(state.config.database.clone());

    match probe(&mut db).await {
        Ok(Fetched::One(Some(_))) => Ok(Json(serde_json::json!({"status": "ready"}))),
        Ok(_) => {
            warn!("Readiness probe returned no row");
            Err(AppError::Unavailable("database returned no row".into()))
        }
        Err(e) => {
            warn!(error = %e, "Readiness probe failed");
            Err(AppError::Unavailable(e.to_string()))
        }
    }
}

async fn probe(db: &mut Database) -> Result<Fetched, DbError> {
    let mut stmt = db.execute("SELECT 1 AS ok", None).await?;
    Ok(db.fetch_results(&mut stmt, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_returns_ok() {
        let Json(body) = health().await;
        assert_eq!(body["status"], "ok");
    }
}
