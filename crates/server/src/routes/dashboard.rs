//! Dashboard route handler.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use mercado_core::{Role, UserId};

use crate::error::Result;
use crate::middleware::auth::RequireAuth;
use crate::services::auth::AuthService;
use crate::services::dashboard::{DashboardService, DashboardStats};
use crate::state::AppState;

/// The account summary shown alongside the stats.
#[derive(Debug, Serialize)]
pub struct DashboardUser {
    pub id: UserId,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub user: DashboardUser,
    pub role: Role,
    pub stats: DashboardStats,
}

/// Compute the caller's dashboard.
///
/// The subject row is re-read so a vanished account yields 404 rather
/// than statistics for a ghost.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<DashboardResponse>> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let account = auth.current_user(user.id).await?;

    let stats = DashboardService::new(state.pool()).stats(&user).await?;

    Ok(Json(DashboardResponse {
        user: DashboardUser {
            id: account.id,
            email: account.email.to_string(),
            created_at: account.created_at,
        },
        role: user.role,
        stats,
    }))
}
