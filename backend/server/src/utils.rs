use axum::http::{
    HeaderMap,
    header::{CONTENT_TYPE, HOST},
};

use crate::error::AppError;

pub const PASSWORD_HEADER: &str = "pw";

/// A missing configured password locks the endpoint rather than opening it.
pub fn check_password(headers: &HeaderMap, expected: Option<&str>) -> Result<(), AppError> {
    let provided = headers
        .get(PASSWORD_HEADER)
        .and_then(|value| value.to_str().ok());

    match (provided, expected) {
        (Some(provided), Some(expected)) if provided == expected => Ok(()),
        _ => Err(AppError::Unauthorized),
    }
}

pub fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

/// `www.` hosts get bounced to the bare domain, keeping path and query.
pub fn www_redirect(
    headers: &HeaderMap,
    canonical_host: &str,
    path_and_query: &str,
) -> Option<String> {
    let host = headers.get(HOST)?.to_str().ok()?;

    host.starts_with("www.")
        .then(|| format!("https://{canonical_host}{path_and_query}"))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (key, value) in pairs {
            map.insert(*key, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_password() {
        let good = headers(&[("pw", "hunter2")]);
        let bad = headers(&[("pw", "hunter3")]);

        assert!(check_password(&good, Some("hunter2")).is_ok());
        assert!(check_password(&bad, Some("hunter2")).is_err());
        assert!(check_password(&HeaderMap::new(), Some("hunter2")).is_err());
        assert!(check_password(&good, None).is_err());
    }

    #[test]
    fn test_is_json() {
        let mut map = HeaderMap::new();
        assert!(!is_json(&map));

        map.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        assert!(is_json(&map));
    }

    #[test]
    fn test_www_redirect() {
        let mut map = HeaderMap::new();
        map.insert(HOST, HeaderValue::from_static("www.korysanchez.me"));

        assert_eq!(
            www_redirect(&map, "korysanchez.me", "/lego?x=1").as_deref(),
            Some("https://korysanchez.me/lego?x=1")
        );

        map.insert(HOST, HeaderValue::from_static("korysanchez.me"));
        assert!(www_redirect(&map, "korysanchez.me", "/").is_none());
        assert!(www_redirect(&HeaderMap::new(), "korysanchez.me", "/").is_none());
    }
}
