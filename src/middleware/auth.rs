use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::User;
use crate::database::repositories::UserRepository;
use crate::error::ApiError;

/// Authenticated identity resolved from the request credential.
///
/// Resolution happens once per inbound request; the principal travels with
/// the request as an extension rather than through any process-wide state.
#[derive(Clone, Debug)]
pub struct Principal {
    pub user: User,
}

impl Principal {
    pub fn username(&self) -> &str {
        &self.user.username
    }

    pub fn is_admin(&self) -> bool {
        self.user.is_admin()
    }
}

/// Token-resolution middleware.
///
/// Looks the Authorization credential up as a stored session token. A miss
/// leaves the request anonymous; protected endpoints reject it through the
/// extractors below.
pub async fn resolve_principal(mut request: Request, next: Next) -> Response {
    if let Some(token) = bearer_token(request.headers()) {
        match lookup_principal(&token).await {
            Ok(Some(user)) => {
                request.extensions_mut().insert(Principal { user });
            }
            Ok(None) => {}
            Err(err) => {
                // Treat a failed lookup as anonymous; the request will be
                // rejected downstream if the endpoint needs a principal.
                tracing::error!("Principal lookup failed: {}", err);
            }
        }
    }

    next.run(request).await
}

async fn lookup_principal(token: &str) -> Result<Option<User>, DatabaseError> {
    let pool = DatabaseManager::pool().await?;
    UserRepository::new(pool).find_by_token(token).await
}

/// Extract the opaque token from the Authorization header.
///
/// The stored value is the credential itself; an optional `Bearer ` prefix
/// is stripped for clients that send one.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get("authorization")?.to_str().ok()?;
    let token = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Unauthorized"))
    }
}

/// Principal that must carry the ADMIN role.
///
/// Missing credential stays 401; an authenticated non-admin is 403, which
/// keeps the two cases distinguishable for clients.
#[derive(Clone, Debug)]
pub struct AdminPrincipal(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for AdminPrincipal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let principal = Principal::from_request_parts(parts, state).await?;
        if !principal.is_admin() {
            return Err(ApiError::forbidden("Forbidden"));
        }
        Ok(AdminPrincipal(principal))
    }
}

impl AdminPrincipal {
    pub fn username(&self) -> &str {
        self.0.username()
    }
}
