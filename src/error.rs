//! Error types shared across the sprite pipeline
//!
//! Library code returns [`ForgeError`]; renderer backends report [`RenderError`],
//! which capture jobs wrap together with the entity and angle that failed.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, ForgeError>;

#[derive(Debug, Error)]
pub enum ForgeError {
    /// A primitive form outside the supported set, or size parameters for a different form
    #[error("invalid primitive kind '{0}' (expected box, cylinder, cone, sphere, plane or torus)")]
    InvalidPrimitiveKind(String),

    /// `finish` was called on an assembly with no parts
    #[error("assembly '{prefix}' has no parts to merge")]
    EmptyAssembly { prefix: String },

    /// A part was added to an assembly whose prefix its name does not carry
    #[error("part '{part}' does not belong to assembly '{prefix}'")]
    PartOutsideAssembly { prefix: String, part: String },

    /// A capture job referenced an entity that is not in the scene
    #[error("no entity named '{0}' in the scene")]
    UnknownEntity(String),

    /// Neither the preferred output directory nor the fallback could be written
    #[error("output directory {path} is not writable")]
    DirectoryUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A single frame failed to render; the enclosing job is aborted
    #[error("rendering '{entity}' at {angle}° failed")]
    Render {
        entity: String,
        angle: f32,
        #[source]
        source: RenderError,
    },

    /// Renderer negotiation could not satisfy the requested engine
    #[error("no renderer available: {0}")]
    NoRenderer(String),

    #[error("failed to parse config {path}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("i/o error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ForgeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure reported by a renderer backend for one frame
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to encode {path}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Backend-specific failure (adapter loss, buffer mapping, injected test failures)
    #[error("{0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_carries_frame_context() {
        let err = ForgeError::Render {
            entity: "Tank".to_string(),
            angle: 90.0,
            source: RenderError::Backend("device lost".to_string()),
        };
        assert_eq!(err.to_string(), "rendering 'Tank' at 90° failed");
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("device lost"));
    }

    #[test]
    fn test_empty_assembly_message_names_prefix() {
        let err = ForgeError::EmptyAssembly {
            prefix: "Ghost".to_string(),
        };
        assert!(err.to_string().contains("Ghost"));
    }
}
