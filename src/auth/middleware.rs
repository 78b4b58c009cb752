//! Authentication middleware for Axum

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::jwt::{verify_token, AuthError, Claims, JwtConfig};
use crate::domain::UserRole;

#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Identity taken from a verified token, stored in request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            role: claims.role(),
            user_id: claims.sub,
            email: claims.email,
            name: claims.name,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

fn bearer_token(request: &Request<Body>) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
}

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Browsers cannot set headers on a WebSocket handshake, so `?token=` is accepted too
fn query_token(request: &Request<Body>) -> Option<String> {
    let Query(query) = Query::<TokenQuery>::try_from_uri(request.uri()).ok()?;
    query.token.filter(|token| !token.is_empty())
}

/// JWT authentication middleware - requires valid token
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&request).or_else(|| query_token(&request)) else {
        return auth_error_response(AuthError::MissingToken);
    };

    match verify_token(&token, &auth_state.jwt_config) {
        Ok(claims) => {
            if claims.is_expired() {
                return auth_error_response(AuthError::ExpiredToken);
            }
            request
                .extensions_mut()
                .insert(AuthenticatedUser::from_claims(claims));
            next.run(request).await
        }
        Err(e) if matches!(e.kind(), jsonwebtoken::errors::ErrorKind::ExpiredSignature) => {
            auth_error_response(AuthError::ExpiredToken)
        }
        Err(_) => auth_error_response(AuthError::InvalidToken),
    }
}

/// Admin-only middleware - must be used after auth_middleware
pub async fn admin_middleware(request: Request<Body>, next: Next) -> Response {
    match request.extensions().get::<AuthenticatedUser>() {
        Some(user) if user.is_admin() => next.run(request).await,
        Some(_) => auth_error_response(AuthError::InsufficientPermissions),
        None => auth_error_response(AuthError::MissingToken),
    }
}

fn auth_error_response(error: AuthError) -> Response {
    let status = match error {
        AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
        _ => StatusCode::UNAUTHORIZED,
    };

    let body = Json(json!({
        "success": false,
        "data": null,
        "error": error.message()
    }));

    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_from_header_or_query() {
        let request = Request::builder()
            .uri("/x")
            .header(header::AUTHORIZATION, "Bearer abc.def")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&request).as_deref(), Some("abc.def"));

        let request = Request::builder()
            .uri("/ws?pool_table_id=1&token=xyz")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&request), None);
        assert_eq!(query_token(&request).as_deref(), Some("xyz"));
    }

    #[test]
    fn query_token_is_percent_decoded() {
        let request = Request::builder()
            .uri("/ws?pool_table_id=1&token=abc%2Edef%3D%3D")
            .body(Body::empty())
            .unwrap();
        assert_eq!(query_token(&request).as_deref(), Some("abc.def=="));

        let request = Request::builder()
            .uri("/ws?token=")
            .body(Body::empty())
            .unwrap();
        assert_eq!(query_token(&request), None);

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        assert_eq!(query_token(&request), None);
    }
}
