/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - route ごとに必要な guard を宣言順に適用する (先に書いたものが先に走る)
 * - authenticate は app 側で v1 全体に 1 回だけ掛ける
 */
use axum::{
    Router,
    handler::Handler,
    middleware::from_fn,
    routing::{get, post},
};
use tower::ServiceBuilder;

use crate::middleware::auth::{ensure_admin, ensure_correct_user_or_admin, ensure_logged_in};
use crate::state::AppState;

use crate::api::v1::handlers::{
    auth::{register, token},
    health::health,
    jobs::{create_job, delete_job, get_job, list_jobs, update_job},
    users::{create_user, delete_user, get_user, list_users, update_user},
};

/// `guarded!(handler, [guard_a, guard_b])` runs `guard_a`, then `guard_b`, then `handler`.
macro_rules! guarded {
    ($handler:expr, [$($guard:expr),+ $(,)?]) => {
        $handler.layer(ServiceBuilder::new()$(.layer(from_fn($guard)))+)
    };
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/auth/token", post(token))
        .route("/auth/register", post(register))
        .route(
            "/users",
            get(guarded!(list_users, [ensure_logged_in, ensure_admin]))
                .post(guarded!(create_user, [ensure_logged_in, ensure_admin])),
        )
        .route(
            "/users/{username}",
            get(guarded!(get_user, [ensure_correct_user_or_admin]))
                .patch(guarded!(update_user, [ensure_correct_user_or_admin]))
                .delete(guarded!(delete_user, [ensure_correct_user_or_admin])),
        )
        .route(
            "/jobs",
            get(list_jobs).post(guarded!(create_job, [ensure_logged_in, ensure_admin])),
        )
        .route(
            "/jobs/{id}",
            get(get_job)
                .patch(guarded!(update_job, [ensure_logged_in, ensure_admin]))
                .delete(guarded!(delete_job, [ensure_logged_in, ensure_admin])),
        )
}
