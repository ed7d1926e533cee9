//! Token auth helpers for router tests.

use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderName, HeaderValue};

use recipebox_auth_types::token::generate_token_key;

/// A token key plus the headers a client would send with it.
pub struct TestToken {
    pub key: String,
}

impl TestToken {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// A well-formed key that no store knows about.
    pub fn random() -> Self {
        Self::new(generate_token_key())
    }

    /// `Authorization` header name and value, for `TestRequest::add_header`.
    pub fn header(&self) -> (HeaderName, HeaderValue) {
        (AUTHORIZATION, self.header_value())
    }

    pub fn header_value(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("Token {}", self.key)).unwrap()
    }

    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, self.header_value());
        map
    }
}
