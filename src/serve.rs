//! Dashboard server.
//!
//! A `tiny_http` loop on the main thread. Every page request re-runs the
//! whole pipeline, so the page always reflects the current datasets and
//! secrets.
//!
//! | Route                 | Response                               |
//! |-----------------------|----------------------------------------|
//! | `GET /`, `/index.html`| Freshly rendered dashboard             |
//! | `GET /healthz`        | `ok`                                   |
//! | other `GET`           | 404                                    |
//! | any other method      | 405                                    |

use crate::{
    config::AppConfig,
    fetch::HttpClient,
    log,
    page::error_page,
    pipeline::{self, http_client},
    utils::error::{CAUSED_BY, error_chain},
};
use anyhow::{Context, Result};
use std::{io::Cursor, net::SocketAddr, sync::Arc};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

const HTML: &str = "text/html; charset=utf-8";
const TEXT: &str = "text/plain; charset=utf-8";

// ============================================================================
// Server Entry Point
// ============================================================================

/// Serve the dashboard until Ctrl+C.
pub fn serve_dashboard(config: &AppConfig) -> Result<()> {
    let interface: std::net::IpAddr = config
        .serve
        .interface
        .parse()
        .with_context(|| format!("Invalid interface `{}`", config.serve.interface))?;
    let http = http_client(config).context("Failed to build HTTP client")?;

    let (server, addr) = try_bind_port(interface, config.serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{}", addr);

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, config, &http) {
            log!("serve"; "request error: {e}");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(
    interface: std::net::IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow::anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries.saturating_sub(1)),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

// ============================================================================
// Request Handling
// ============================================================================

/// Where a request goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Dashboard,
    Health,
    NotFound,
    MethodNotAllowed,
}

impl Route {
    fn resolve(method: &Method, url: &str) -> Self {
        if *method != Method::Get {
            return Self::MethodNotAllowed;
        }
        match request_path(url).as_str() {
            "" | "index.html" => Self::Dashboard,
            "healthz" => Self::Health,
            _ => Self::NotFound,
        }
    }
}

/// Decoded request path without query string or surrounding slashes.
fn request_path(url: &str) -> String {
    let decoded = urlencoding::decode(url)
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();
    let without_query = decoded.split('?').next().unwrap_or(&decoded);
    without_query.trim_matches('/').to_owned()
}

fn handle_request(request: Request, config: &AppConfig, http: &dyn HttpClient) -> Result<()> {
    match Route::resolve(request.method(), request.url()) {
        Route::Dashboard => {
            let (status, body) = dashboard_response(config, http);
            respond(request, status, HTML, body)
        }
        Route::Health => respond(request, 200, TEXT, "ok".to_owned()),
        Route::NotFound => respond(request, 404, TEXT, "404 Not Found".to_owned()),
        Route::MethodNotAllowed => respond(request, 405, TEXT, "405 Method Not Allowed".to_owned()),
    }
}

/// Status and body for a dashboard request: the page, or the error page
/// with status 500 when the render fails.
fn dashboard_response(config: &AppConfig, http: &dyn HttpClient) -> (u16, String) {
    match pipeline::run(config, http) {
        Ok(page) => (200, page.html),
        Err(err) => {
            log!("error"; "{}", error_chain(&err, CAUSED_BY));
            (500, error_page(&config.base.title, &err))
        }
    }
}

// ============================================================================
// Response Helpers
// ============================================================================

fn respond(request: Request, status: u16, content_type: &str, body: String) -> Result<()> {
    let header = Header::from_bytes("Content-Type", content_type)
        .map_err(|()| anyhow::anyhow!("invalid content type `{content_type}`"))?;
    let length = body.len();
    let response = Response::new(
        StatusCode(status),
        vec![header],
        Cursor::new(body.into_bytes()),
        Some(length),
        None,
    );
    request.respond(response)?;
    Ok(())
}
