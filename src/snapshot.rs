//! Structured snapshots of hierarchy and permission state.
//!
//! This module provides types for capturing the access system in a
//! structured, serializable form, enabling use cases like API responses,
//! admin interfaces, and audit exports without exposing the live engine
//! state. A snapshot is a point-in-time copy; it does not track later
//! mutations.

#[cfg(feature = "persistence")]
use serde::{Deserialize, Serialize};

use crate::core::AccessSystem;
use crate::resource::ResourceNode;
use std::collections::HashMap;
use std::time::Instant;

/// A point-in-time structured view of the whole access system.
///
/// # Example
/// ```rust
/// use resource_rbac::{AccessSystem, TreeSnapshot};
///
/// let mut system = AccessSystem::new();
/// system.add_resource("root")?;
/// system.add_resource("doc")?;
/// system.attach("root", "doc")?;
/// system.add_role("viewer")?;
/// system.assign("doc", "viewer", "read")?;
///
/// let snapshot = TreeSnapshot::capture(&system);
/// assert_eq!(snapshot.total_resources, 2);
/// assert_eq!(snapshot.boundary_count, 1);
/// # Ok::<(), resource_rbac::Error>(())
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "persistence", derive(Serialize, Deserialize))]
pub struct TreeSnapshot {
    /// Views of every resource node, ancestors before their descendants.
    pub nodes: Vec<ResourceView>,
    /// Total number of resource nodes captured.
    pub total_resources: usize,
    /// Number of permission boundaries at capture time.
    pub boundary_count: usize,
    /// Maximum containment depth (roots are depth 0).
    pub max_depth: usize,
    /// Metadata about the capture.
    pub metadata: SnapshotMetadata,
}

/// Read-only view of a single resource node.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "persistence", derive(Serialize, Deserialize))]
pub struct ResourceView {
    /// The node's id.
    pub id: String,
    /// Containment parent, if attached.
    pub parent: Option<String>,
    /// Containment depth (roots are depth 0).
    pub depth: usize,
    /// Directly granted roles per action, sorted for stable output.
    pub explicit: HashMap<String, Vec<String>>,
    /// Expanded authorized roles per action, sorted for stable output.
    pub effective: HashMap<String, Vec<String>>,
    /// The node's access parent at capture time.
    pub access_parent: Option<String>,
    /// The node's shortcut children at capture time, sorted.
    pub access_children: Vec<String>,
}

/// Metadata about a snapshot.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "persistence", derive(Serialize, Deserialize))]
pub struct SnapshotMetadata {
    /// When the snapshot was generated.
    #[cfg(feature = "persistence")]
    pub generated_at: chrono::DateTime<chrono::Utc>,
    /// Version of the snapshot schema.
    pub schema_version: String,
    /// Number of explicit (resource, action, role) grant triples captured.
    pub total_assignments: usize,
    /// How long the capture took.
    pub generation_time_ms: u64,
}

impl TreeSnapshot {
    /// Capture the current state of an access system.
    pub fn capture(system: &AccessSystem) -> Self {
        let started = Instant::now();
        let tree = system.resources();

        let mut roots: Vec<&str> = tree
            .ids()
            .filter(|id| tree.get(id).is_some_and(|node| node.parent().is_none()))
            .collect();
        roots.sort_unstable();

        let mut depths: HashMap<String, usize> = HashMap::new();
        let mut nodes = Vec::with_capacity(tree.len());
        let mut boundary_count = 0;
        let mut total_assignments = 0;
        let mut max_depth = 0;

        for root in roots {
            for node in tree.iter_subtree(root) {
                // Ancestor-before-descendant ordering makes the parent's
                // depth available by the time a child is visited.
                let depth = node
                    .parent()
                    .and_then(|parent| depths.get(parent))
                    .map_or(0, |d| d + 1);
                depths.insert(node.id().to_string(), depth);
                max_depth = max_depth.max(depth);
                if node.is_boundary() {
                    boundary_count += 1;
                }
                total_assignments += node
                    .explicit_permissions()
                    .values()
                    .map(|roles| roles.len())
                    .sum::<usize>();
                nodes.push(ResourceView::from_node(node, depth));
            }
        }

        Self {
            total_resources: nodes.len(),
            nodes,
            boundary_count,
            max_depth,
            metadata: SnapshotMetadata {
                #[cfg(feature = "persistence")]
                generated_at: chrono::Utc::now(),
                schema_version: "1.0.0".to_string(),
                total_assignments,
                generation_time_ms: started.elapsed().as_millis() as u64,
            },
        }
    }

    /// Find a captured node view by id.
    pub fn find(&self, id: &str) -> Option<&ResourceView> {
        self.nodes.iter().find(|view| view.id == id)
    }

    /// Views of the nodes that carried explicit permissions at capture time.
    pub fn boundaries(&self) -> Vec<&ResourceView> {
        self.nodes.iter().filter(|view| view.is_boundary()).collect()
    }
}

impl ResourceView {
    fn from_node(node: &ResourceNode, depth: usize) -> Self {
        Self {
            id: node.id().to_string(),
            parent: node.parent().map(str::to_string),
            depth,
            explicit: sorted_role_map(node.explicit_permissions()),
            effective: sorted_role_map(node.effective_permissions()),
            access_parent: node.access_parent().map(str::to_string),
            access_children: {
                let mut children: Vec<String> =
                    node.access_children().iter().cloned().collect();
                children.sort_unstable();
                children
            },
        }
    }

    /// Whether the node carried any explicit permission at capture time.
    pub fn is_boundary(&self) -> bool {
        self.explicit.values().any(|roles| !roles.is_empty())
    }
}

fn sorted_role_map(
    map: &HashMap<String, std::collections::HashSet<String>>,
) -> HashMap<String, Vec<String>> {
    map.iter()
        .map(|(action, roles)| {
            let mut sorted: Vec<String> = roles.iter().cloned().collect();
            sorted.sort_unstable();
            (action.clone(), sorted)
        })
        .collect()
}
