//! Bearer token → `Principal` を request extensions に入れる
//!
//! Runs once for every `/api/v1` request, before any guard.
//! - No `Authorization` header: nothing is inserted, the request continues.
//! - Invalid / expired / malformed token: same as no header. Never rejects here;
//!   access decisions belong to the guards in [`super::guards`].

use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::{self, Next},
    response::Response,
};

use crate::services::auth::{Principal, TokenCodec};
use crate::state::AppState;

const BEARER_PREFIX: &str = "bearer ";

/// Apply the authentication step to every route of `router`.
///
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::authenticate::apply(v1, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, authenticate))
}

pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let principal =
        principal_from_header(&state.tokens, req.headers().get(header::AUTHORIZATION));

    if let Some(principal) = principal {
        req.extensions_mut().insert(principal);
    }

    next.run(req).await
}

/// Strip an optional case-insensitive `Bearer ` prefix and surrounding whitespace.
pub fn bearer_token(value: &str) -> &str {
    let value = value.trim();
    match value.get(..BEARER_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(BEARER_PREFIX) => {
            value[BEARER_PREFIX.len()..].trim()
        }
        _ => value,
    }
}

/// "no credentials" and "bad credentials" both come back as `None`.
pub fn principal_from_header(
    codec: &TokenCodec,
    header: Option<&HeaderValue>,
) -> Option<Principal> {
    let value = header?.to_str().ok()?;
    let token = bearer_token(value);
    if token.is_empty() {
        return None;
    }

    match codec.decode(token) {
        Ok(principal) => Some(principal),
        Err(err) => {
            tracing::debug!(error = %err, "ignoring invalid bearer token");
            None
        }
    }
}
