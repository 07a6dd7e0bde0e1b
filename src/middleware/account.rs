use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;

/// Header carrying the caller's account id, set by the upstream gateway after
/// authentication.
pub const ACCOUNT_HEADER: &str = "x-rh-account-id";

/// Authenticated account the request acts on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Account(pub i32);

/// Resolves the caller's account and injects it into request extensions
pub async fn account_middleware(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let account = extract_account(request.headers()).map_err(|msg| {
        tracing::warn!("Rejected request without valid account: {}", msg);
        ApiError::unauthorized(msg)
    })?;

    request.extensions_mut().insert(account);
    Ok(next.run(request).await)
}

fn extract_account(headers: &HeaderMap) -> Result<Account, String> {
    let raw = headers
        .get(ACCOUNT_HEADER)
        .ok_or_else(|| format!("missing {} header", ACCOUNT_HEADER))?
        .to_str()
        .map_err(|_| format!("invalid {} header", ACCOUNT_HEADER))?;

    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .map(Account)
        .ok_or_else(|| format!("invalid {} header", ACCOUNT_HEADER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn parses_account_header() {
        let mut headers = HeaderMap::new();
        headers.insert(ACCOUNT_HEADER, HeaderValue::from_static(" 42 "));
        assert_eq!(extract_account(&headers), Ok(Account(42)));
    }

    #[test]
    fn rejects_missing_or_bad_header() {
        assert!(extract_account(&HeaderMap::new()).is_err());

        let mut headers = HeaderMap::new();
        headers.insert(ACCOUNT_HEADER, HeaderValue::from_static("abc"));
        assert!(extract_account(&headers).is_err());

        headers.insert(ACCOUNT_HEADER, HeaderValue::from_static("0"));
        assert!(extract_account(&headers).is_err());
    }
}
