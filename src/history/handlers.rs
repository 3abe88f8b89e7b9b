use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{error, instrument};

use crate::{
    accounts::extractors::AuthUser,
    history::{dto::AppendEntryRequest, repo_types::QueryLog},
    state::AppState,
};

pub fn history_routes() -> Router<AppState> {
    Router::new().route("/history", get(list_history).post(append_history))
}

#[instrument(skip(state))]
pub async fn list_history(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
) -> Result<Json<Vec<QueryLog>>, (StatusCode, String)> {
    let entries = QueryLog::list_by_user(&state.db, &username)
        .await
        .map_err(|e| {
            error!(error = %e, "list history failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    Ok(Json(entries))
}

#[instrument(skip(state, payload))]
pub async fn append_history(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Json(payload): Json<AppendEntryRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    QueryLog::append(
        &state.db,
        &username,
        &payload.user_message,
        &payload.bot_response,
    )
    .await
    .map_err(|e| {
        error!(error = %e, "append history failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    Ok(StatusCode::CREATED)
}
