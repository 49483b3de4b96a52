//! Request interceptors.
//!
//! Interceptors run after caller headers are applied and before the default
//! content type is considered. They run in registration order, each with
//! mutable access to the whole request, so a later interceptor sees and can
//! overwrite what an earlier one set.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use uuid::Uuid;

use crate::http::HttpRequest;

/// Hook that mutates a request before it is sent.
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, request: &mut HttpRequest);
}

impl<F> RequestInterceptor for F
where
    F: Fn(&mut HttpRequest) + Send + Sync,
{
    fn intercept(&self, request: &mut HttpRequest) {
        self(request)
    }
}

/// Sets a fixed header, replacing any existing value.
#[derive(Debug, Clone)]
pub struct HeaderInterceptor {
    name: String,
    value: String,
}

impl HeaderInterceptor {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl RequestInterceptor for HeaderInterceptor {
    fn intercept(&self, request: &mut HttpRequest) {
        request.set_header(self.name.clone(), self.value.clone());
    }
}

/// `Authorization: Bearer <token>`.
#[derive(Clone)]
pub struct BearerAuth {
    token: String,
}

impl BearerAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerAuth").finish_non_exhaustive()
    }
}

impl RequestInterceptor for BearerAuth {
    fn intercept(&self, request: &mut HttpRequest) {
        request.set_header("Authorization", format!("Bearer {}", self.token));
    }
}

/// `Authorization: Basic base64(user:password)`.
#[derive(Clone)]
pub struct BasicAuth {
    encoded: String,
}

impl BasicAuth {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            encoded: STANDARD.encode(format!("{username}:{password}")),
        }
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth").finish_non_exhaustive()
    }
}

impl RequestInterceptor for BasicAuth {
    fn intercept(&self, request: &mut HttpRequest) {
        request.set_header("Authorization", format!("Basic {}", self.encoded));
    }
}

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Tags each request with a random UUID unless the caller already set one.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdInterceptor;

impl RequestInterceptor for RequestIdInterceptor {
    fn intercept(&self, request: &mut HttpRequest) {
        if !request.has_header(REQUEST_ID_HEADER) {
            request.add_header(REQUEST_ID_HEADER, Uuid::new_v4().to_string());
        }
    }
}
