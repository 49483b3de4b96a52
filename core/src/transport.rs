//! Sending requests over the network.
//!
//! # Design
//! `Transport` is the seam between the client, which only builds and parses
//! plain data, and whatever HTTP stack actually does the I/O. The default is
//! `UreqTransport`, a blocking `ureq::Agent` built once from `ClientConfig`
//! and reused for every call. Tests substitute their own transport.
//!
//! ureq is told never to follow redirects; `UreqTransport` follows them itself
//! so the `Redirect` policy can be honored exactly.

use std::borrow::Cow;

use tracing::{debug, warn};
use ureq::typestate::WithoutBody;
use url::Url;

use crate::config::{ClientConfig, Redirect};
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpVersion};

/// Hops followed before giving up with `TransportError::TooManyRedirects`.
pub const MAX_REDIRECTS: u32 = 5;

/// Executes one request and buffers the whole response.
///
/// Implementations block the calling thread and must be safe to share
/// between threads. A response with any status code is `Ok`; only failures
/// to get a response are errors.
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking transport on a pooled `ureq::Agent`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    redirect: Redirect,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        if config.version == HttpVersion::Http2 {
            warn!("HTTP/2 requested but the ureq transport speaks HTTP/1.1; falling back");
        }
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_connect(Some(config.connect_timeout))
            .timeout_recv_response(Some(config.read_timeout))
            .timeout_recv_body(Some(config.read_timeout))
            .max_redirects(0)
            .max_idle_connections(config.pool.max_idle_connections)
            .max_idle_connections_per_host(config.pool.max_idle_connections_per_host)
            .max_idle_age(config.pool.max_idle_age)
            .build()
            .new_agent();
        Self {
            agent,
            redirect: config.redirect,
        }
    }

    fn send_once(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.as_str();
        let body = request.body.as_slice();
        let result = match request.method {
            HttpMethod::Get => send_optional_body(self.agent.get(url), request),
            HttpMethod::Delete => send_optional_body(self.agent.delete(url), request),
            HttpMethod::Head => send_optional_body(self.agent.head(url), request),
            HttpMethod::Post => prepare(self.agent.post(url), request).send(body),
            HttpMethod::Put => prepare(self.agent.put(url), request).send(body),
            HttpMethod::Patch => prepare(self.agent.patch(url), request).send(body),
        };
        let mut response = result?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Apply the per-request timeout and headers to a ureq request.
fn prepare<B>(builder: ureq::RequestBuilder<B>, request: &HttpRequest) -> ureq::RequestBuilder<B> {
    let mut builder = builder.config().timeout_global(Some(request.timeout)).build();
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// GET, DELETE and HEAD carry a body only when one was set.
fn send_optional_body(
    builder: ureq::RequestBuilder<WithoutBody>,
    request: &HttpRequest,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    let builder = prepare(builder, request);
    if request.body.is_empty() {
        builder.call()
    } else {
        builder.force_send_body().send(request.body.as_slice())
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut current = Cow::Borrowed(request);
        let mut response = self.send_once(&current)?;
        let mut hops = 0;
        while let Some(next) = redirect_request(self.redirect, &current, &response)? {
            if hops == MAX_REDIRECTS {
                return Err(TransportError::TooManyRedirects(MAX_REDIRECTS));
            }
            hops += 1;
            debug!(
                status = response.status,
                from = %current.url,
                to = %next.url,
                method = %next.method,
                "following redirect"
            );
            response = self.send_once(&next)?;
            current = Cow::Owned(next);
        }
        Ok(response)
    }
}

/// Dropped when a redirect leaves the original origin.
const CREDENTIAL_HEADERS: [&str; 3] = ["Authorization", "Proxy-Authorization", "Cookie"];

/// The request to send next if `response` is a redirect `policy` allows.
///
/// 303 turns anything but HEAD into a bodiless GET; 301 and 302 do the same
/// for POST. 307 and 308 resend the request unchanged. Credentials are not
/// forwarded to a different origin.
pub fn redirect_request(
    policy: Redirect,
    request: &HttpRequest,
    response: &HttpResponse,
) -> Result<Option<HttpRequest>, TransportError> {
    if policy == Redirect::Never || !matches!(response.status, 301 | 302 | 303 | 307 | 308) {
        return Ok(None);
    }
    let Some(location) = response.header("Location") else {
        return Ok(None);
    };
    let base = Url::parse(&request.url)
        .map_err(|e| TransportError::InvalidRequest(format!("{}: {e}", request.url)))?;
    let target = base
        .join(location)
        .map_err(|e| TransportError::InvalidRequest(format!("redirect to {location}: {e}")))?;
    if policy == Redirect::Normal && base.scheme() == "https" && target.scheme() == "http" {
        debug!(from = %base, to = %target, "not following https to http redirect");
        return Ok(None);
    }

    let mut next = request.clone();
    next.url = target.to_string();
    if target.origin() != base.origin() {
        for name in CREDENTIAL_HEADERS {
            next.remove_header(name);
        }
    }
    let to_get = match response.status {
        303 => request.method != HttpMethod::Head,
        301 | 302 => request.method == HttpMethod::Post,
        _ => false,
    };
    if to_get {
        next.method = HttpMethod::Get;
        next.body.clear();
        next.remove_header("Content-Type");
        next.remove_header("Content-Length");
    }
    Ok(Some(next))
}
