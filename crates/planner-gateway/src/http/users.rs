use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use planner_users::{NewUser, User, UserError};
use tracing::error;

use super::{api_error, ApiError};
use crate::app::AppState;

/// GET /api/users — all users ordered by name.
pub async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>, ApiError> {
    state.users.list_users().map(Json).map_err(user_error)
}

/// POST /api/users — 201 with the stored user, 400 when name or email is blank.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state
        .users
        .create_user(&payload.name, &payload.email)
        .map_err(user_error)?;
    Ok((StatusCode::CREATED, Json(user)))
}

fn user_error(e: UserError) -> ApiError {
    match e {
        UserError::InvalidInput(msg) => api_error(StatusCode::BAD_REQUEST, msg),
        UserError::DatabaseError(e) => {
            error!(error = %e, "user directory failure");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}
