//! Error types for the access control system.

use thiserror::Error;

/// The main error type for access control operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Resource with the given id already exists.
    #[error("Resource '{0}' already exists")]
    ResourceAlreadyExists(String),

    /// Resource with the given id was not found.
    #[error("Resource '{0}' not found")]
    ResourceNotFound(String),

    /// Role with the given id already exists.
    #[error("Role '{0}' already exists")]
    RoleAlreadyExists(String),

    /// Role with the given id was not found.
    #[error("Role '{0}' not found")]
    RoleNotFound(String),

    /// Child resource is already owned by a parent.
    #[error("Resource '{child}' is already attached under '{parent}'")]
    AlreadyAttached { child: String, parent: String },

    /// Attachment would close a containment cycle.
    #[error("Attaching '{child}' under '{parent}' would create a containment cycle")]
    AttachmentCycle { child: String, parent: String },
}

/// Result type alias for access control operations.
pub type Result<T> = std::result::Result<T, Error>;
