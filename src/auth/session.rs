use axum::http::HeaderMap;
use tracing::{debug, warn};

use crate::services::auth_service::{get_auth_token, validate_jwt};

/// Identity of an authenticated caller, taken from the session token claims
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserContext {
    pub uid: String,
    pub roles: Vec<String>,
}

/// Outcome of checking the caller's session
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Session {
    Authenticated(UserContext),
    Unauthenticated,
}

/// Decides whether the current request belongs to an authenticated caller
pub trait SessionVerifier: Send + Sync {
    fn verify(&self, headers: &HeaderMap) -> Session;
}

/// Verifies HS256 session tokens sent as a bearer token or a cookie
pub struct JwtSessionVerifier {
    secret: String,
    cookie_name: String,
}

impl JwtSessionVerifier {
    pub fn new(secret: impl Into<String>, cookie_name: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            cookie_name: cookie_name.into(),
        }
    }
}

impl SessionVerifier for JwtSessionVerifier {
    fn verify(&self, headers: &HeaderMap) -> Session {
        let token = match get_auth_token(headers, &self.cookie_name) {
            Ok(token) => token,
            Err(e) => {
                debug!("No session token: {}", e);
                return Session::Unauthenticated;
            }
        };

        let token_data = match validate_jwt(&token, &self.secret) {
            Ok(token_data) => token_data,
            Err(e) => {
                warn!("JWT validation failed: {}", e);
                return Session::Unauthenticated;
            }
        };

        let claims = token_data.claims;
        let Some(uid) = claims.get("sub").and_then(|v| v.as_str()) else {
            warn!("JWT token does not contain 'sub' claim");
            return Session::Unauthenticated;
        };

        let roles = match claims.get("roles").and_then(|v| v.as_array()) {
            Some(roles_array) => roles_array
                .iter()
                .filter_map(|r| r.as_str().map(|s| s.to_string()))
                .collect::<Vec<String>>(),
            None => Vec::new(),
        };
        debug!("Session verified for user: {}", uid);
        Session::Authenticated(UserContext {
            uid: uid.to_string(),
            roles,
        })
    }
}
