//! Caller identity carried in the request context.

use axum::http::HeaderMap;

use super::UserId;
use crate::error::ApiError;

/// Header naming the user on whose behalf a request is made.
///
/// The value is trusted as-is; verifying it is the job of whatever sits in
/// front of the gateway.
pub const CALLER_HEADER: &str = "x-user-id";

/// The user a request acts for.
///
/// Inserted into the GraphQL request data by the HTTP handler and read by
/// mutations that attribute ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerIdentity {
    user_id: UserId,
}

impl CallerIdentity {
    /// Creates an identity for the given user.
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    /// Returns the caller's user id.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Extracts the identity from request headers.
    ///
    /// Returns `Ok(None)` when the header is absent or blank.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] if the header is present but is
    /// not a valid user id.
    pub fn from_headers(headers: &HeaderMap) -> Result<Option<Self>, ApiError> {
        let Some(value) = headers.get(CALLER_HEADER) else {
            return Ok(None);
        };
        let raw = value
            .to_str()
            .map_err(|_| ApiError::InvalidInput(format!("{CALLER_HEADER} is not ASCII")))?;
        if raw.trim().is_empty() {
            return Ok(None);
        }
        UserId::parse(raw).map(|id| Some(Self::new(id)))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn absent_header_is_none() {
        let Ok(None) = CallerIdentity::from_headers(&HeaderMap::new()) else {
            panic!("expected no identity");
        };
    }

    #[test]
    fn valid_header_is_parsed() {
        let id = UserId::new();
        let mut headers = HeaderMap::new();
        let Ok(value) = HeaderValue::from_str(&id.to_string()) else {
            panic!("valid header value");
        };
        headers.insert(CALLER_HEADER, value);

        let Ok(Some(caller)) = CallerIdentity::from_headers(&headers) else {
            panic!("expected identity");
        };
        assert_eq!(caller.user_id(), id);
    }

    #[test]
    fn malformed_header_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(CALLER_HEADER, HeaderValue::from_static("admin"));
        assert!(CallerIdentity::from_headers(&headers).is_err());
    }
}
