//! The synchronous HTTP client.
//!
//! # Design
//! A call goes through three public stages that can also be used on their
//! own:
//! - `build_request` renders the URL, applies caller headers, runs
//!   interceptors and fills in the default content type. It does no I/O.
//! - `execute` hands the request to the transport and blocks until the full
//!   response is buffered.
//! - `parse_response` accepts only status 200 and decodes the body.
//!
//! `HttpClient` is cheap to clone. Clones share the transport (and with it the
//! connection pool), the interceptor list and the default content type cell.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{debug, enabled, info, Level};

use crate::config::{ClientBuilder, ClientConfig};
use crate::error::{ClientError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::interceptor::RequestInterceptor;
use crate::serializer::BodySerializer;
use crate::template::{append_query, render_path, render_url, RequestParams};
use crate::transport::Transport;

/// Timeout set on every request built by the client, independent of the
/// connect and read timeouts. Interceptors may change it per request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const CONTENT_TYPE: &str = "Content-Type";

/// Blocking HTTP client that renders templated URLs, encodes and decodes
/// bodies with caller-chosen serializers, and rejects non-200 responses.
#[derive(Clone)]
pub struct HttpClient {
    config: Arc<ClientConfig>,
    interceptors: Arc<[Arc<dyn RequestInterceptor>]>,
    transport: Arc<dyn Transport>,
    default_content_type: Arc<RwLock<Option<String>>>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("interceptors", &self.interceptors.len())
            .field("default_content_type", &*self.default_content_type.read())
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Client with default settings and no interceptors.
    pub fn new(base_url: impl Into<String>) -> Self {
        ClientBuilder::new(base_url).build()
    }

    pub fn with_interceptors(
        base_url: impl Into<String>,
        interceptors: Vec<Arc<dyn RequestInterceptor>>,
    ) -> Self {
        ClientBuilder::new(base_url).interceptors(interceptors).build()
    }

    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    pub(crate) fn from_parts(
        config: ClientConfig,
        interceptors: Vec<Arc<dyn RequestInterceptor>>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let default_content_type = Arc::new(RwLock::new(config.default_content_type.clone()));
        Self {
            config: Arc::new(config),
            interceptors: interceptors.into(),
            transport,
            default_content_type,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn default_content_type(&self) -> Option<String> {
        self.default_content_type.read().clone()
    }

    /// Change the content type applied to requests that end up without one.
    ///
    /// Takes effect for requests built after the call returns. Requests being
    /// built concurrently may see either value.
    pub fn set_default_content_type(&self, content_type: Option<String>) {
        *self.default_content_type.write() = content_type;
    }

    pub fn get<R>(
        &self,
        path_template: &str,
        params: &RequestParams,
        response_serializer: &dyn BodySerializer<R>,
    ) -> Result<R, ClientError> {
        self.request::<(), R>(HttpMethod::Get, path_template, params, None, response_serializer)
    }

    /// POST `body`, or an empty body when `None`.
    pub fn post<B, R>(
        &self,
        path_template: &str,
        params: &RequestParams,
        body: Option<&B>,
        request_serializer: &dyn BodySerializer<B>,
        response_serializer: &dyn BodySerializer<R>,
    ) -> Result<R, ClientError> {
        let body = body.map(|b| (b, request_serializer));
        self.request(HttpMethod::Post, path_template, params, body, response_serializer)
    }

    /// Build, send and decode one request.
    ///
    /// `body` pairs the value with the serializer that encodes it; `None`
    /// sends an empty body. Nothing is retried.
    pub fn request<B, R>(
        &self,
        method: HttpMethod,
        path_template: &str,
        params: &RequestParams,
        body: Option<(&B, &dyn BodySerializer<B>)>,
        response_serializer: &dyn BodySerializer<R>,
    ) -> Result<R, ClientError> {
        let body = match body {
            Some((value, serializer)) => serializer
                .serialize(value)
                .map_err(ClientError::Serialization)?,
            None => Vec::new(),
        };
        let request = self.build_request(method, path_template, params, body);
        let response = self.execute(&request)?;
        Self::parse_response(response, response_serializer)
    }

    /// Render the outgoing request without sending it.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path_template: &str,
        params: &RequestParams,
        body: Vec<u8>,
    ) -> HttpRequest {
        let path = render_path(path_template, &params.path);
        debug!(%method, path = %path, path_template, params = ?params.path, "rendered path params");

        let url = append_query(&render_url(&self.config.base_url, &path), &params.query);
        info!(%method, url = %url, "rendered url");

        let mut request = HttpRequest::new(method, url, REQUEST_TIMEOUT);
        request.body = body;
        for (name, value) in &params.headers {
            request.add_header(name.as_str(), value.as_str());
        }
        if enabled!(Level::DEBUG) {
            debug!(
                url = %request.url,
                headers = ?request.headers,
                body = %String::from_utf8_lossy(&request.body),
                "created request"
            );
        }

        for interceptor in self.interceptors.iter() {
            interceptor.intercept(&mut request);
        }

        if !request.has_header(CONTENT_TYPE) {
            if let Some(content_type) = self.default_content_type.read().as_deref() {
                request.set_header(CONTENT_TYPE, content_type);
            }
        }
        request
    }

    /// Send `request` and wait for the buffered response.
    pub fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        if enabled!(Level::DEBUG) {
            debug!(
                base_url = %self.config.base_url,
                method = %request.method,
                url = %request.url,
                headers = ?request.headers,
                "sending request"
            );
        } else {
            info!(
                base_url = %self.config.base_url,
                method = %request.method,
                url = %request.url,
                "sending request"
            );
        }
        let response = self.transport.send(request)?;
        if enabled!(Level::DEBUG) {
            debug!(
                url = %request.url,
                status = response.status,
                headers = ?response.headers,
                body = %String::from_utf8_lossy(&response.body),
                "received response"
            );
        }
        Ok(response)
    }

    /// Decode a 200 response; any other status becomes `ClientError::NotOk`.
    pub fn parse_response<R>(
        response: HttpResponse,
        response_serializer: &dyn BodySerializer<R>,
    ) -> Result<R, ClientError> {
        if response.status != 200 {
            return Err(ClientError::NotOk {
                status: response.status,
                body: response.text(),
            });
        }
        info!(status = response.status, "response ok");
        response_serializer
            .deserialize(&response.body)
            .map_err(ClientError::Deserialization)
    }
}
