//! Error Types
//!
//! This module defines the error types used throughout the loader.
//!
//! # Overview
//!
//! Two failure classes exist:
//! - [`ImportError`]: a single asset could not be fetched or turned into scene
//!   content (network failure, missing or malformed asset, missing primary mesh).
//! - [`Error`]: the crate-wide error, wrapping import failures together with
//!   configuration and task-level failures.
//!
//! Avatar mesh loading never surfaces an [`ImportError`] to its caller (it
//! recovers with a fallback mesh), while animation loading propagates it.
//!
//! ```rust,ignore
//! use avatar_loader::errors::Result;
//!
//! async fn fetch(manager: &mut ResourceManager<MemoryImporter>) -> Result<()> {
//!     let result = manager.load_avatar_animations("anims/idle.glb").await?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Failure while importing a single asset.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The requested asset was not found.
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level network failure.
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP response error with status code.
    #[error("HTTP response error: status {status} ({url})")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// URL parsing error.
    #[cfg(feature = "http")]
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// The asset bytes could not be decoded into scene content.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The asset decoded but does not have the expected shape.
    #[error("Malformed asset {url}: {reason}")]
    Malformed {
        /// Requested URL
        url: String,
        /// What was wrong with it
        reason: String,
    },

    /// The import produced no meshes.
    #[error("No mesh found in {0}")]
    MissingPrimaryMesh(String),

    /// Feature not enabled.
    #[error("Feature not enabled: {0}")]
    FeatureNotEnabled(String),
}

/// The main error type for the loader.
#[derive(Error, Debug)]
pub enum Error {
    /// An asset import failed.
    #[error(transparent)]
    Import(#[from] ImportError),

    /// Loader settings could not be parsed.
    #[error("Settings parse error: {0}")]
    Settings(#[from] serde_json::Error),

    /// A referenced scene node no longer exists.
    #[error("Scene node not found: {0}")]
    NodeNotFound(String),
}

/// Alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
