//! Error types for building, importing and animating scene objects.

/// Errors raised while constructing models or invoking methods on them.
///
/// Lenient paths (attribute application, animations, unknown caller keys)
/// never produce these; they log and move on instead.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// A `createModel` entry names neither a light nor a geometry/material pair,
    /// or an entry names more than one construction strategy.
    #[error("model descriptor has an unrecognized shape: {0}")]
    UnrecognizedShape(String),

    #[error("unknown geometry kind `{0}`")]
    UnknownGeometry(String),

    #[error("unknown material kind `{0}`")]
    UnknownMaterial(String),

    #[error("unknown light kind `{0}`")]
    UnknownLight(String),

    /// A method was invoked that the target does not expose.
    #[error("`{target}` has no method `{method}`")]
    UnknownMethod { target: String, method: String },

    #[error("invalid arguments for `{name}`: {reason}")]
    InvalidArguments { name: String, reason: String },

    /// The loader finished but the file contained nothing to attach.
    #[error("`{url}` yielded no model")]
    EmptyModel { url: String },

    #[error("failed to load `{url}`")]
    AssetLoad {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("failed to parse `{url}`: {reason}")]
    Parse { url: String, reason: String },

    #[error("failed to decode texture `{url}`")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },
}

impl SceneError {
    pub(crate) fn asset_load(url: &str, error: anyhow::Error) -> Self {
        Self::AssetLoad {
            url: url.to_string(),
            source: error.into(),
        }
    }

    pub(crate) fn invalid_arguments(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors that can occur when reading loader configuration or entity files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the file from disk.
    #[error("failed to read config: {0}")]
    ReadError(#[source] std::io::Error),

    /// Failed to parse RON loader configuration.
    #[error("failed to parse config: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    /// Failed to parse a JSON entity file.
    #[error("failed to parse entities: {0}")]
    EntityError(#[source] serde_json::Error),
}
