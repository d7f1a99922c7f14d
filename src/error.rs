//! Error type shared by the atlas registry, the description loader and the
//! animated sprite.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("Region not found: {0}")]
    RegionNotFound(String),

    #[error("Animation not found: {0}")]
    AnimationNotFound(String),

    #[error("Region already exists: {0}")]
    DuplicateRegion(String),

    #[error("Animation already exists: {0}")]
    DuplicateAnimation(String),

    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Missing <{0}> element")]
    MissingElement(&'static str),

    #[error("Missing attribute '{attribute}' on <{element}>")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("Invalid integer for '{attribute}': {value:?}")]
    InvalidInteger {
        attribute: &'static str,
        value: String,
    },

    #[error("Invalid animation delay: {0:?}")]
    InvalidDelay(String),

    #[error("Animation has no frames")]
    EmptyAnimation,

    #[error("Failed to load texture {path}: {reason}")]
    Texture { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AtlasError>;
