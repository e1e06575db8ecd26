//! Authorization guards: must-be-logged-in / must-be-admin / must-be-self-or-admin.
//!
//! Each guard is a pure decision over the `Principal` left in the request
//! extensions by [`super::authenticate`] (plus the `username` path param for
//! self-or-admin). The `ensure_*` wrappers turn a `Denied` into
//! `AppError::Unauthorized`; the reason only goes to the debug log.
//!
//! Routes compose them in order:
//! ```ignore
//! post(create_job.layer(
//!     ServiceBuilder::new()
//!         .layer(middleware::from_fn(ensure_logged_in))
//!         .layer(middleware::from_fn(ensure_admin)),
//! ))
//! ```

use axum::{
    extract::{RawPathParams, Request, rejection::RawPathParamsRejection},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::Principal;

/// Path parameter compared against the principal by [`require_self_or_admin`].
pub const USERNAME_PARAM: &str = "username";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Anonymous,
    EmptyUsername,
    NotAdmin,
    NotSelfOrAdmin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }

    fn enforce(self, guard: &'static str) -> Result<(), AppError> {
        match self {
            Decision::Allowed => Ok(()),
            Decision::Denied(reason) => {
                tracing::debug!(guard, ?reason, "request denied");
                Err(AppError::Unauthorized)
            }
        }
    }
}

pub fn require_logged_in(principal: Option<&Principal>) -> Decision {
    match principal {
        None => Decision::Denied(DenyReason::Anonymous),
        Some(p) if p.username().is_empty() => Decision::Denied(DenyReason::EmptyUsername),
        Some(_) => Decision::Allowed,
    }
}

pub fn require_admin(principal: Option<&Principal>) -> Decision {
    if let Decision::Denied(reason) = require_logged_in(principal) {
        return Decision::Denied(reason);
    }
    match principal {
        Some(p) if p.is_admin() => Decision::Allowed,
        _ => Decision::Denied(DenyReason::NotAdmin),
    }
}

/// Admin status and username match are OR-ed: an admin is never denied on another user's resource.
pub fn require_self_or_admin(principal: Option<&Principal>, username: Option<&str>) -> Decision {
    let Some(p) = principal else {
        return Decision::Denied(DenyReason::Anonymous);
    };

    let is_admin = p.is_admin();
    let is_self = username.is_some_and(|u| u == p.username());

    if is_admin || is_self {
        Decision::Allowed
    } else {
        Decision::Denied(DenyReason::NotSelfOrAdmin)
    }
}

pub async fn ensure_logged_in(req: Request, next: Next) -> Result<Response, AppError> {
    require_logged_in(req.extensions().get::<Principal>()).enforce("logged_in")?;
    Ok(next.run(req).await)
}

pub async fn ensure_admin(req: Request, next: Next) -> Result<Response, AppError> {
    require_admin(req.extensions().get::<Principal>()).enforce("admin")?;
    Ok(next.run(req).await)
}

pub async fn ensure_correct_user_or_admin(
    params: Result<RawPathParams, RawPathParamsRejection>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let username = params.ok().and_then(|params| {
        params
            .iter()
            .find(|(key, _)| *key == USERNAME_PARAM)
            .map(|(_, value)| value.to_owned())
    });

    require_self_or_admin(req.extensions().get::<Principal>(), username.as_deref())
        .enforce("self_or_admin")?;
    Ok(next.run(req).await)
}
