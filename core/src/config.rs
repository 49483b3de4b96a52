//! Client configuration and builder.

use std::sync::Arc;
use std::time::Duration;

use crate::client::HttpClient;
use crate::http::HttpVersion;
use crate::interceptor::RequestInterceptor;
use crate::transport::{Transport, UreqTransport};

/// Redirect policy applied by the transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Redirect {
    /// Return 3xx responses as-is.
    Never,
    /// Follow every redirect.
    #[default]
    Always,
    /// Follow redirects except https to http downgrades.
    Normal,
}

/// Connection pool settings for the transport.
///
/// The pool is created once with the client and shared by every call and
/// every clone of the client; it is released when the last clone is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_idle_connections: usize,
    pub max_idle_connections_per_host: usize,
    pub max_idle_age: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_idle_connections: 10,
            max_idle_connections_per_host: 3,
            max_idle_age: Duration::from_secs(15),
        }
    }
}

/// Everything captured when a client is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Bound on waiting for the response head and for each body read.
    pub read_timeout: Duration,
    pub redirect: Redirect,
    pub version: HttpVersion,
    pub pool: PoolConfig,
    /// Initial default content type; can be changed later on the client.
    pub default_content_type: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout: Duration::from_secs(60),
            read_timeout: Duration::from_secs(60),
            redirect: Redirect::default(),
            version: HttpVersion::default(),
            pool: PoolConfig::default(),
            default_content_type: None,
        }
    }
}

/// Builder for `HttpClient`.
pub struct ClientBuilder {
    config: ClientConfig,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            config: ClientConfig::new(base_url),
            interceptors: Vec::new(),
            transport: None,
        }
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    pub fn redirect(mut self, redirect: Redirect) -> Self {
        self.config.redirect = redirect;
        self
    }

    pub fn version(mut self, version: HttpVersion) -> Self {
        self.config.version = version;
        self
    }

    pub fn pool(mut self, pool: PoolConfig) -> Self {
        self.config.pool = pool;
        self
    }

    pub fn default_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.config.default_content_type = Some(content_type.into());
        self
    }

    /// Register an interceptor. Interceptors run in registration order.
    pub fn interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn interceptors(mut self, interceptors: Vec<Arc<dyn RequestInterceptor>>) -> Self {
        self.interceptors.extend(interceptors);
        self
    }

    /// Send through `transport` instead of the default ureq agent. Timeout,
    /// redirect, version and pool settings are then the transport's business.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn build(self) -> HttpClient {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(UreqTransport::new(&self.config)),
        };
        HttpClient::from_parts(self.config, self.interceptors, transport)
    }
}
