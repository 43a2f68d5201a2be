//! Session cookie building and token extraction.

use std::time::Duration;

use axum::http::{
    header::{InvalidHeaderValue, AUTHORIZATION, COOKIE},
    HeaderMap, HeaderValue,
};

pub const SESSION_COOKIE_NAME: &str = "token";

/// `HttpOnly`, `SameSite=Strict` cookie carrying the session token.
pub fn session_cookie(token: &str, ttl: Duration, secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    let max_age = ttl.as_secs();
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Strict; Max-Age={max_age}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub fn clear_session_cookie(secure: bool) -> HeaderValue {
    if secure {
        HeaderValue::from_static("token=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0; Secure")
    } else {
        HeaderValue::from_static("token=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0")
    }
}

/// Bearer header first, then the session cookie.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_bearer_token(headers) {
        return Some(token);
    }

    for header in headers.get_all(COOKIE) {
        let Ok(value) = header.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let Some((key, val)) = pair.trim().split_once('=') else {
                continue;
            };
            let val = val.trim();
            if key.trim() == SESSION_COOKIE_NAME && !val.is_empty() {
                return Some(val.to_string());
            }
        }
    }

    None
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(axum::http::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("abc", Duration::from_secs(604_800), false).unwrap();
        assert_eq!(
            cookie.to_str().unwrap(),
            "token=abc; Path=/; HttpOnly; SameSite=Strict; Max-Age=604800"
        );

        let secure = session_cookie("abc", Duration::from_secs(60), true).unwrap();
        assert!(secure.to_str().unwrap().ends_with("; Secure"));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let cleared = clear_session_cookie(false);
        assert!(cleared.to_str().unwrap().contains("Max-Age=0"));
        assert!(cleared.to_str().unwrap().starts_with("token=;"));
    }

    #[test]
    fn extracts_token_from_cookie_header() {
        let map = headers(&[(COOKIE, "theme=dark; token=abc.def.ghi; lang=cs")]);
        assert_eq!(extract_session_token(&map).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn bearer_header_wins_over_cookie() {
        let map = headers(&[(COOKIE, "token=from-cookie"), (AUTHORIZATION, "Bearer from-header")]);
        assert_eq!(extract_session_token(&map).as_deref(), Some("from-header"));
    }

    #[test]
    fn missing_or_empty_token() {
        assert!(extract_session_token(&HeaderMap::new()).is_none());
        assert!(extract_session_token(&headers(&[(COOKIE, "token=")])).is_none());
        assert!(extract_session_token(&headers(&[(COOKIE, "tokenx=abc")])).is_none());
        assert!(extract_session_token(&headers(&[(AUTHORIZATION, "Basic abc")])).is_none());
    }
}
