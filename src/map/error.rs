//! Map rendering errors.

use crate::fetch::HttpError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("access token is not a valid Mapbox token")]
    InvalidAccessToken,

    #[error("tile provider rejected the access token (HTTP {0})")]
    TokenRejected(u16),

    #[error("tile provider check failed")]
    Probe(#[source] HttpError),

    #[error("layer `{layer}` has no numeric values for `{property}`")]
    MissingProperty { layer: String, property: String },
}
