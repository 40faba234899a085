//! One page render: secrets → datasets → layers → map → page.
//!
//! Every stage runs to completion before the next starts. All secrets are
//! resolved before the first request, so a missing key costs no network
//! traffic.

use crate::config::AppConfig;
use crate::fetch::{FetchError, HttpClient, HttpError, ReqwestClient, fetch_dataset};
use crate::log;
use crate::map::{Marker, MapView, RenderError, compose_layer, render_map};
use crate::page::{PageContext, present};
use crate::secrets::{SecretError, Secrets};
use chrono::Local;
use std::time::Instant;
use thiserror::Error;

/// Any failure that prevents the page from rendering.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Secret(#[from] SecretError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Client(#[from] HttpError),
}

/// A rendered dashboard page.
#[derive(Debug)]
pub struct RenderedPage {
    pub html: String,
    pub view: MapView,
}

/// HTTP client built from `[fetch]`.
pub fn http_client(config: &AppConfig) -> Result<ReqwestClient, HttpError> {
    ReqwestClient::new(&config.fetch.user_agent, config.fetch.timeout_secs)
}

/// Run the full pipeline once.
pub fn run(config: &AppConfig, http: &dyn HttpClient) -> Result<RenderedPage, PipelineError> {
    let started = Instant::now();

    let secrets = Secrets::from_path(&config.secrets.path)?;
    let resolved = resolve_secrets(config, &secrets)?;

    let mut layers = Vec::with_capacity(config.layers.len());
    for (layer, url) in config.layers.iter().zip(&resolved.layer_urls) {
        let dataset = fetch_dataset(http, &layer.id, url)?;
        layers.push(compose_layer(dataset, layer)?);
    }

    let markers = config
        .markers
        .iter()
        .map(|marker| {
            let image = marker
                .image
                .as_deref()
                .and_then(|key| secrets.get(key))
                .map(str::to_owned);
            Marker::new(marker, &config.map.marker_icon, image)
        })
        .collect();

    let view = render_map(&config.map, &resolved.token, layers, markers, http);

    let illustration = config
        .page
        .illustration_key
        .as_deref()
        .and_then(|key| secrets.get(key));
    let html = present(&PageContext {
        config,
        view: &view,
        illustration,
        rendered_at: Local::now(),
    });

    log!(
        "render";
        "{} overlays, {} KB in {:.2?}",
        view.overlays.len(),
        html.len() / 1024,
        started.elapsed()
    );
    Ok(RenderedPage { html, view })
}

/// Secret values the render cannot do without.
struct ResolvedSecrets {
    token: String,
    /// Dataset URL of each layer, parallel to `config.layers`.
    layer_urls: Vec<String>,
}

/// Check every required key in one pass: the token, each layer source and
/// each marker image.
fn resolve_secrets(config: &AppConfig, secrets: &Secrets) -> Result<ResolvedSecrets, SecretError> {
    let mut keys: Vec<&str> = vec![config.map.token_key.as_str()];
    keys.extend(config.layers.iter().map(|layer| layer.source.as_str()));
    keys.extend(config.markers.iter().filter_map(|m| m.image.as_deref()));

    let mut values = secrets.require(&keys)?.into_iter();
    let token = values.next().unwrap_or_default();
    let layer_urls = values.take(config.layers.len()).collect();

    Ok(ResolvedSecrets { token, layer_urls })
}
