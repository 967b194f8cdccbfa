//! Core access control engine.
//!
//! This module contains the central `AccessSystem` struct, which owns the
//! resource containment tree and the role seniority graph and implements the
//! three operations everything else builds on: permission assignment,
//! incremental propagation, and access queries.
//!
//! # Architecture
//!
//! The engine keeps derived shortcut links on resource nodes so that access
//! checks never walk permission-transparent parts of the tree:
//!
//! - **Access parent**: the nearest strict ancestor that carries explicit
//!   permissions. Queries climb this chain instead of the containment chain.
//! - **Access children**: the reciprocal link set. New grants are pushed
//!   through it once, at assignment time, so queries stay cheap.
//!
//! Role seniority is folded into the effective permission sets when a grant
//! is made. Queries therefore never consult the role graph; the flip side is
//! that seniority edges added later do not widen grants made earlier.
//!
//! # Concurrency
//!
//! Assignment rewires shortcut state that queries read, so the engine assumes
//! a single exclusive caller. All mutating operations take `&mut self`.

#[cfg(feature = "audit")]
use log::{info, warn};

use crate::{
    error::{Error, Result},
    resource::{ResourceNode, ResourceTree},
    role::RoleGraph,
};
use std::collections::HashSet;

/// Configuration for the access system.
#[derive(Debug, Clone)]
pub struct AccessSystemConfig {
    /// Whether attach operations walk the ancestor chain to reject
    /// containment cycles.
    pub detect_structural_violations: bool,
    /// Whether to emit audit log records (requires the `audit` feature).
    pub enable_audit: bool,
}

impl Default for AccessSystemConfig {
    fn default() -> Self {
        Self {
            detect_structural_violations: true,
            enable_audit: true,
        }
    }
}

/// The hierarchical access control engine.
///
/// Permissions are granted to a role for an action at one resource node and
/// become visible downward through the containment tree and upward through
/// role seniority. See the crate docs for a walkthrough.
pub struct AccessSystem {
    resources: ResourceTree,
    roles: RoleGraph,
    config: AccessSystemConfig,
}

impl AccessSystem {
    /// Create a new engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(AccessSystemConfig::default())
    }

    /// Create a new engine with custom configuration.
    pub fn with_config(config: AccessSystemConfig) -> Self {
        Self {
            resources: ResourceTree::new(),
            roles: RoleGraph::new(),
            config,
        }
    }

    /// Register a resource node.
    pub fn add_resource(&mut self, id: &str) -> Result<()> {
        self.resources.add(id)?;

        #[cfg(feature = "audit")]
        if self.config.enable_audit {
            info!("Resource '{id}' registered");
        }

        Ok(())
    }

    /// Attach `child` under `parent` in the containment tree.
    pub fn attach(&mut self, parent: &str, child: &str) -> Result<()> {
        self.resources
            .attach_inner(parent, child, self.config.detect_structural_violations)?;

        #[cfg(feature = "audit")]
        if self.config.enable_audit {
            info!("Resource '{child}' attached under '{parent}'");
        }

        Ok(())
    }

    /// Register a role.
    pub fn add_role(&mut self, id: &str) -> Result<()> {
        self.roles.add(id)?;

        #[cfg(feature = "audit")]
        if self.config.enable_audit {
            info!("Role '{id}' registered");
        }

        Ok(())
    }

    /// Make `senior` a direct senior of `role`.
    ///
    /// Seniority is folded into effective permissions when a grant is made,
    /// so edges added here only affect future [`assign`](Self::assign) calls;
    /// grants made earlier are not retroactively widened.
    pub fn add_senior(&mut self, role: &str, senior: &str) -> Result<()> {
        self.roles.add_senior(role, senior)?;

        #[cfg(feature = "audit")]
        if self.config.enable_audit {
            info!("Role '{senior}' is now senior to '{role}'");
        }

        Ok(())
    }

    /// Grant `role` the given `action` at `resource`.
    ///
    /// The grant covers the resource's subtree and every role senior to
    /// `role` at call time. Re-granting an existing (resource, role, action)
    /// triple is an idempotent no-op.
    pub fn assign(&mut self, resource: &str, role: &str, action: &str) -> Result<()> {
        if !self.roles.contains(role) {
            return Err(Error::RoleNotFound(role.to_string()));
        }
        let (already_granted, first_grant) = {
            let node = self
                .resources
                .get(resource)
                .ok_or_else(|| Error::ResourceNotFound(resource.to_string()))?;
            let already = node
                .explicit_roles(action)
                .is_some_and(|roles| roles.contains(role));
            (already, !node.is_boundary())
        };
        if already_granted {
            return Ok(());
        }

        // The very first grant of any action turns the node from
        // permission-transparent into a permission boundary, exactly once.
        if first_grant {
            self.rewire_boundary(resource)?;
        }

        self.node_mut(resource)?
            .explicit
            .entry(action.to_string())
            .or_default()
            .insert(role.to_string());

        // Seniority-expanded role set for this single grant.
        let mut closure = self.roles.ancestor_closure(role);
        closure.insert(role.to_string());
        self.propagate(resource, &closure, action)?;

        #[cfg(feature = "audit")]
        if self.config.enable_audit {
            info!("Granted '{action}' on '{resource}' to role '{role}'");
        }

        Ok(())
    }

    /// Check whether `role` may perform `action` on `resource`.
    ///
    /// Walks the access-parent chain upward from the resource and answers
    /// from the effective permission sets alone; the role graph is never
    /// consulted here.
    pub fn can_access(&self, role: &str, resource: &str, action: &str) -> Result<bool> {
        let mut current = self
            .resources
            .get(resource)
            .ok_or_else(|| Error::ResourceNotFound(resource.to_string()))?;
        loop {
            if current
                .effective_roles(action)
                .is_some_and(|roles| roles.contains(role))
            {
                #[cfg(feature = "audit")]
                if self.config.enable_audit {
                    info!(
                        "Access GRANTED: role '{role}', action '{action}', resource '{resource}'"
                    );
                }
                return Ok(true);
            }
            match current.access_parent() {
                Some(parent) => {
                    current = self
                        .resources
                        .get(parent)
                        .ok_or_else(|| Error::ResourceNotFound(parent.to_string()))?;
                }
                None => {
                    #[cfg(feature = "audit")]
                    if self.config.enable_audit {
                        warn!(
                            "Access DENIED: role '{role}', action '{action}', resource '{resource}'"
                        );
                    }
                    return Ok(false);
                }
            }
        }
    }

    /// Read-only view of the resource tree.
    pub fn resources(&self) -> &ResourceTree {
        &self.resources
    }

    /// Read-only view of the role graph.
    pub fn roles(&self) -> &RoleGraph {
        &self.roles
    }

    /// The engine's configuration.
    pub fn config(&self) -> &AccessSystemConfig {
        &self.config
    }

    // Internal implementation

    fn node_mut(&mut self, id: &str) -> Result<&mut ResourceNode> {
        self.resources
            .get_mut(id)
            .ok_or_else(|| Error::ResourceNotFound(id.to_string()))
    }

    /// Turn `resource` into a permission boundary and rewire the shortcut
    /// overlay around it.
    ///
    /// The node stops climbing upward from now on, even for actions it never
    /// defines itself; it is linked under the boundary it used to inherit
    /// from; and every descendant whose shortcut still points at that old
    /// boundary is re-pointed here. The equality test runs per node over the
    /// whole containment subtree, which leaves the wiring of other, already
    /// established boundaries alone.
    fn rewire_boundary(&mut self, resource: &str) -> Result<()> {
        let old_boundary = self.node_mut(resource)?.access_parent.take();

        if let Some(boundary) = &old_boundary {
            self.node_mut(boundary)?
                .access_children
                .insert(resource.to_string());
        }

        let descendants: Vec<String> = self
            .resources
            .iter_subtree(resource)
            .skip(1)
            .map(|node| node.id().to_string())
            .collect();

        for id in descendants {
            let repointed = {
                let node = self.node_mut(&id)?;
                if node.access_parent == old_boundary {
                    node.access_parent = Some(resource.to_string());
                    true
                } else {
                    false
                }
            };
            if repointed {
                if let Some(boundary) = &old_boundary {
                    self.node_mut(boundary)?.access_children.remove(&id);
                }
                self.node_mut(resource)?.access_children.insert(id);
            }
        }

        Ok(())
    }

    /// Union `roles` into the node's effective set for `action` and push the
    /// update through the shortcut children for as long as it keeps growing
    /// a set.
    ///
    /// The growth check stops re-traversal for grants that add nothing new;
    /// the shortcut links always point strictly downward in the containment
    /// tree, so the recursion is finite either way.
    fn propagate(&mut self, resource: &str, roles: &HashSet<String>, action: &str) -> Result<()> {
        let grew = {
            let node = self.node_mut(resource)?;
            let effective = node.effective.entry(action.to_string()).or_default();
            let before = effective.len();
            effective.extend(roles.iter().cloned());
            effective.len() > before
        };
        if !grew {
            return Ok(());
        }

        let shortcut_children: Vec<String> = self
            .resources
            .get(resource)
            .map(|node| node.access_children.iter().cloned().collect())
            .unwrap_or_default();
        for child in shortcut_children {
            self.propagate(&child, roles, action)?;
        }

        Ok(())
    }
}

impl Default for AccessSystem {
    fn default() -> Self {
        Self::new()
    }
}
