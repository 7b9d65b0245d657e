//! Request dispatch module
//!
//! Entry point for HTTP request processing: method dispatch, response
//! decoration and access logging.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    HeaderName, HeaderValue, IF_MODIFIED_SINCE, IF_NONE_MATCH, REFERER, SERVER, USER_AGENT,
};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) URI path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_modified_since: Option<&'a str>,
    pub has_if_none_match: bool,
}

impl<'a> RequestContext<'a> {
    fn from_parts(parts: &'a Parts) -> Self {
        let headers = &parts.headers;
        Self {
            path: parts.uri.path(),
            query: parts.uri.query(),
            is_head: parts.method == Method::HEAD,
            if_modified_since: headers
                .get(IF_MODIFIED_SINCE)
                .and_then(|v| v.to_str().ok()),
            has_if_none_match: headers.contains_key(IF_NONE_MATCH),
        }
    }
}

/// Main entry point for HTTP request handling
///
/// Generic over the request body: bodies are never read.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, _body) = req.into_parts();

    let mut response = dispatch(&parts, &state).await;
    finalize_response(&mut response, &state.config.http.server_name);

    if state.config.logging.access_log {
        let entry = access_entry(&parts, &response, remote_addr, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

async fn dispatch(parts: &Parts, state: &AppState) -> Response<Full<Bytes>> {
    match parts.method {
        Method::GET | Method::HEAD => {
            let ctx = RequestContext::from_parts(parts);
            static_files::serve(&ctx, state).await
        }
        // Preflight succeeds for every path, existing or not
        Method::OPTIONS => http::build_options_response(),
        _ => http::build_501_response(&parts.method),
    }
}

/// Decorate a response just before it is sent; applies to every status
pub fn finalize_response<B>(response: &mut Response<B>, server_name: &str) {
    http::apply_cors_headers(response);
    match HeaderValue::from_str(server_name) {
        Ok(value) => {
            response.headers_mut().insert(SERVER, value);
        }
        Err(_) => logger::log_warning(&format!("Invalid server name header: {server_name:?}")),
    }
}

fn access_entry(
    parts: &Parts,
    response: &Response<Full<Bytes>>,
    remote_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let header = |name: HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        parts.method.to_string(),
        parts.uri.path().to_string(),
    );
    entry.query = parts.uri.query().map(ToString::to_string);
    entry.http_version = version_label(parts.version).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = usize::try_from(hyper::body::Body::size_hint(response.body()).lower())
        .unwrap_or(usize::MAX);
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::test_support::TempSite;
    use http_body_util::{BodyExt, Empty};
    use hyper::StatusCode;

    fn state_for(site: &TempSite) -> Arc<AppState> {
        let mut cfg = Config::for_root(site.path().to_string_lossy());
        cfg.logging.access_log = false;
        Arc::new(AppState::new(cfg).unwrap())
    }

    fn request(method: Method, uri: &str) -> Request<Empty<Bytes>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Origin", "https://wallet.example")
            .body(Empty::new())
            .unwrap()
    }

    async fn send(state: &Arc<AppState>, req: Request<Empty<Bytes>>) -> Response<Full<Bytes>> {
        let addr: SocketAddr = "127.0.0.1:50000".parse().unwrap();
        handle_request(req, Arc::clone(state), addr).await.unwrap()
    }

    fn assert_cors(resp: &Response<Full<Bytes>>) {
        let h = resp.headers();
        assert_eq!(h["access-control-allow-origin"], "*");
        assert_eq!(h["access-control-allow-methods"], "GET, POST, OPTIONS");
        assert_eq!(h["access-control-allow-headers"], "X-Requested-With");
    }

    async fn body_bytes(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_get_existing_file() {
        let site = TempSite::new("router-get");
        site.write("index.html", "<html></html>");
        let state = state_for(&site);

        let resp = send(&state, request(Method::GET, "/index.html")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_cors(&resp);
        assert_eq!(body_bytes(resp).await, "<html></html>");
    }

    #[tokio::test]
    async fn test_get_missing_file_keeps_cors() {
        let site = TempSite::new("router-missing");
        let state = state_for(&site);

        let resp = send(&state, request(Method::GET, "/missing.html")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_cors(&resp);
    }

    #[tokio::test]
    async fn test_options_any_path() {
        let site = TempSite::new("router-options");
        let state = state_for(&site);

        for uri in ["/anything", "/", "/deep/missing/path.js?x=1"] {
            let resp = send(&state, request(Method::OPTIONS, uri)).await;
            assert_eq!(resp.status(), StatusCode::OK);
            assert_cors(&resp);
            assert!(body_bytes(resp).await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_post_not_implemented_keeps_cors() {
        let site = TempSite::new("router-post");
        site.write("index.html", "<html></html>");
        let state = state_for(&site);

        let resp = send(&state, request(Method::POST, "/index.html")).await;
        assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
        assert_cors(&resp);

        let resp = send(&state, request(Method::DELETE, "/index.html")).await;
        assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
        assert_cors(&resp);
    }

    #[tokio::test]
    async fn test_redirect_keeps_cors() {
        let site = TempSite::new("router-redirect");
        site.write("assets/app.js", "1");
        let state = state_for(&site);

        let resp = send(&state, request(Method::GET, "/assets")).await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_cors(&resp);
    }

    #[tokio::test]
    async fn test_head_request() {
        let site = TempSite::new("router-head");
        site.write("index.html", "<html></html>");
        let state = state_for(&site);

        let resp = send(&state, request(Method::HEAD, "/index.html")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-length"], "13");
        assert_cors(&resp);
        assert!(body_bytes(resp).await.is_empty());
    }

    #[test]
    fn test_finalize_sets_server_header() {
        let mut resp = Response::new(());
        finalize_response(&mut resp, "cors-static-server/test");
        assert_eq!(resp.headers()["server"], "cors-static-server/test");
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    }

    #[test]
    fn test_finalize_skips_invalid_server_name() {
        let mut resp = Response::new(());
        finalize_response(&mut resp, "bad\nname");
        assert!(resp.headers().get("server").is_none());
        assert_eq!(resp.headers()["access-control-allow-methods"], "GET, POST, OPTIONS");
    }

    #[test]
    fn test_access_entry_fields() {
        let req = Request::builder()
            .method(Method::GET)
            .uri("/app.js?v=3")
            .header("User-Agent", "curl/8.0")
            .body(())
            .unwrap();
        let (parts, ()) = req.into_parts();
        let resp = http::build_404_response();
        let addr: SocketAddr = "10.0.0.7:41000".parse().unwrap();

        let entry = access_entry(&parts, &resp, addr, Instant::now());
        assert_eq!(entry.remote_addr, "10.0.0.7");
        assert_eq!(entry.path, "/app.js");
        assert_eq!(entry.query.as_deref(), Some("v=3"));
        assert_eq!(entry.status, 404);
        assert_eq!(entry.body_bytes, "404 Not Found".len());
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.0"));
        assert!(entry.referer.is_none());
    }
}
