use axum::http::{header, HeaderMap};
use jsonwebtoken::{decode, Algorithm, DecodingKey, TokenData, Validation};

// Get the session token from the request headers
pub fn get_auth_token(headers: &HeaderMap, cookie_name: &str) -> Result<String, String> {
    // 1. Try to get token from Authorization header
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| "Invalid Authorization header".to_string())?;
        Ok(strip_bearer(auth_str).to_string())
    }
    // 2. Try to get token from cookies
    else {
        let cookie_header = headers
            .get(header::COOKIE)
            .ok_or_else(|| "Missing Authorization header or Cookie".to_string())?
            .to_str()
            .map_err(|_| "Invalid Cookie header".to_string())?;

        for cookie in cookie::Cookie::split_parse(cookie_header).flatten() {
            if cookie.name() == cookie_name {
                return Ok(cookie.value().to_string());
            }
        }
        Err(format!("{} cookie not found", cookie_name))
    }
}

// Drop a leading "Bearer " scheme, matched without regard to case
fn strip_bearer(auth_str: &str) -> &str {
    match auth_str.get(..7) {
        Some(scheme) if scheme.eq_ignore_ascii_case("bearer ") => &auth_str[7..],
        _ => auth_str,
    }
}

// Validate a JWT token and return the token data
pub fn validate_jwt(
    token: &str,
    secret: &str,
) -> Result<TokenData<serde_json::Value>, jsonwebtoken::errors::Error> {
    let validation = Validation::new(Algorithm::HS256);
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    decode::<serde_json::Value>(token, &decoding_key, &validation)
}
