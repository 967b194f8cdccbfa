//! # Resource RBAC
//!
//! Hierarchical access control over resource containment trees and role
//! seniority graphs, with incremental permission propagation.
//!
//! A permission is granted to a role for an action at a single resource
//! node, and becomes visible across both hierarchies at once: downward to
//! the node's descendants in the containment tree, and upward through role
//! seniority (a senior role inherits every grant of its juniors). Instead of
//! recomputing that closure on every check, the engine maintains shortcut
//! links between permission-bearing nodes, pushes each new grant through
//! them once at assignment time, and answers access queries by walking the
//! shortcut chain.
//!
//! ## Features
//!
//! - Resource containment trees with lazy breadth-first traversal
//! - Role seniority graphs with multiple seniors and juniors per role
//! - Cycle-tolerant seniority closure (caller-introduced cycles collapse
//!   into mutually-inheriting role classes instead of hanging)
//! - Incremental propagation of new grants through derived shortcut links
//! - Access checks that skip permission-transparent nodes entirely
//! - Read-only inspection and serializable snapshots for rendering state
//! - Audit logging of hierarchy changes and access decisions
//!
//! ## Quick Start
//!
//! ```rust
//! use resource_rbac::AccessSystem;
//!
//! let mut system = AccessSystem::new();
//!
//! // Containment: root -> folder -> file
//! system.add_resource("root")?;
//! system.add_resource("folder")?;
//! system.add_resource("file")?;
//! system.attach("root", "folder")?;
//! system.attach("folder", "file")?;
//!
//! // Seniority: admin is senior to user
//! system.add_role("user")?;
//! system.add_role("admin")?;
//! system.add_senior("user", "admin")?;
//!
//! // A single grant at the folder...
//! system.assign("folder", "user", "read")?;
//!
//! // ...covers the folder's subtree and the senior role.
//! assert!(system.can_access("user", "file", "read")?);
//! assert!(system.can_access("admin", "file", "read")?);
//! assert!(!system.can_access("user", "root", "read")?);
//! # Ok::<(), resource_rbac::Error>(())
//! ```
//!
//! ## Audit Logging
//!
//! When the `audit` feature is enabled, the engine logs hierarchy changes,
//! grants, and access decisions through the standard Rust logging facade.
//! To enable logging:
//!
//! ```rust
//! use resource_rbac::init_audit_logger;
//!
//! // Initialize logging (must be called early in program execution)
//! init_audit_logger();
//!
//! // Configure log level through the RUST_LOG environment variable:
//! // RUST_LOG=info,resource_rbac=debug
//! ```
//!
//! ## Known Limitation
//!
//! Role seniority is folded into effective permissions at assignment time.
//! Adding a senior role to an existing role afterwards does **not**
//! retroactively update grants made earlier; make seniority edges before
//! assigning permissions.

#[cfg(feature = "audit")]
pub fn init_audit_logger() {
    env_logger::init();
}

pub mod core;
pub mod error;
pub mod query;
pub mod resource;
pub mod role;
pub mod snapshot;

// Re-export main types for convenience
pub use crate::{
    core::{AccessSystem, AccessSystemConfig},
    error::{Error, Result},
    query::{AccessQuery, AccessStatistics, AccessSystemInspect},
    resource::{ResourceNode, ResourceTree, SubtreeIter},
    role::RoleGraph,
    snapshot::{ResourceView, SnapshotMetadata, TreeSnapshot},
};
