//! Read-only inspection interface over the access system state.
//!
//! This module provides a high-level query API for analyzing the hierarchy
//! and permission state without touching it: which nodes are permission
//! boundaries, what a query walk would look like, which roles are visible
//! where. It exposes the data an external presentation layer (CLI, admin
//! interface, API response) needs to render the system.

use crate::core::AccessSystem;
use std::collections::HashSet;

/// Query interface for access system analysis.
///
/// All methods are pure reads. Unknown ids yield empty results rather than
/// errors, which keeps rendering code simple.
pub struct AccessQuery<'a> {
    system: &'a AccessSystem,
}

/// Trait for providing query capabilities.
pub trait AccessSystemInspect {
    /// Get a query interface for this access system.
    fn query(&self) -> AccessQuery<'_>;
}

impl AccessSystemInspect for AccessSystem {
    fn query(&self) -> AccessQuery<'_> {
        AccessQuery { system: self }
    }
}

/// Aggregate statistics over the hierarchy and permission state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "persistence", derive(serde::Serialize, serde::Deserialize))]
pub struct AccessStatistics {
    /// Number of registered resource nodes.
    pub total_resources: usize,
    /// Number of registered roles.
    pub total_roles: usize,
    /// Number of resource nodes carrying explicit permissions.
    pub boundary_resources: usize,
    /// Number of explicit (resource, action, role) grant triples.
    pub explicit_assignments: usize,
    /// Number of distinct action tokens granted anywhere.
    pub distinct_actions: usize,
}

impl<'a> AccessQuery<'a> {
    /// Ids of every resource node that carries explicit permissions.
    pub fn boundary_resources(&self) -> Vec<&'a str> {
        let tree = self.system.resources();
        let mut ids: Vec<&str> = tree
            .ids()
            .filter(|id| tree.get(id).is_some_and(|node| node.is_boundary()))
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Actions explicitly granted at a node, sorted.
    pub fn actions_at(&self, resource: &str) -> Vec<&'a str> {
        let mut actions: Vec<&str> = self
            .system
            .resources()
            .get(resource)
            .map(|node| {
                node.explicit_permissions()
                    .iter()
                    .filter(|(_, roles)| !roles.is_empty())
                    .map(|(action, _)| action.as_str())
                    .collect()
            })
            .unwrap_or_default();
        actions.sort_unstable();
        actions
    }

    /// Roles directly granted `action` at `resource`.
    pub fn explicit_roles(&self, resource: &str, action: &str) -> HashSet<String> {
        self.system
            .resources()
            .get(resource)
            .and_then(|node| node.explicit_roles(action))
            .cloned()
            .unwrap_or_default()
    }

    /// Fully expanded roles authorized for `action` at `resource`.
    pub fn effective_roles(&self, resource: &str, action: &str) -> HashSet<String> {
        self.system
            .resources()
            .get(resource)
            .and_then(|node| node.effective_roles(action))
            .cloned()
            .unwrap_or_default()
    }

    /// The chain of nodes an access check would visit starting at
    /// `resource`: the node itself, then each access parent in turn.
    pub fn boundary_chain(&self, resource: &str) -> Vec<&'a str> {
        let tree = self.system.resources();
        let mut chain = Vec::new();
        let mut current = tree.get(resource);
        while let Some(node) = current {
            chain.push(node.id());
            current = node.access_parent().and_then(|parent| tree.get(parent));
        }
        chain
    }

    /// Every role holding at least one explicit grant inside the subtree
    /// rooted at `resource`.
    pub fn roles_granted_in_subtree(&self, resource: &str) -> HashSet<String> {
        self.system
            .resources()
            .iter_subtree(resource)
            .flat_map(|node| node.explicit_permissions().values())
            .flatten()
            .cloned()
            .collect()
    }

    /// Aggregate statistics over the whole system.
    pub fn statistics(&self) -> AccessStatistics {
        let tree = self.system.resources();
        let mut boundary_resources = 0;
        let mut explicit_assignments = 0;
        let mut actions: HashSet<&str> = HashSet::new();
        for id in tree.ids() {
            let Some(node) = tree.get(id) else { continue };
            if node.is_boundary() {
                boundary_resources += 1;
            }
            for (action, roles) in node.explicit_permissions() {
                if !roles.is_empty() {
                    actions.insert(action.as_str());
                    explicit_assignments += roles.len();
                }
            }
        }
        AccessStatistics {
            total_resources: tree.len(),
            total_roles: self.system.roles().len(),
            boundary_resources,
            explicit_assignments,
            distinct_actions: actions.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_system() -> AccessSystem {
        let mut system = AccessSystem::new();
        for id in ["root", "projects", "docs", "readme"] {
            system.add_resource(id).unwrap();
        }
        system.attach("root", "projects").unwrap();
        system.attach("projects", "docs").unwrap();
        system.attach("docs", "readme").unwrap();
        for role in ["viewer", "editor"] {
            system.add_role(role).unwrap();
        }
        system.add_senior("viewer", "editor").unwrap();
        system.assign("projects", "viewer", "read").unwrap();
        system.assign("docs", "editor", "write").unwrap();
        system
    }

    #[test]
    fn test_boundary_listing_and_actions() {
        let system = sample_system();
        let query = system.query();

        assert_eq!(query.boundary_resources(), ["docs", "projects"]);
        assert_eq!(query.actions_at("projects"), ["read"]);
        assert_eq!(query.actions_at("docs"), ["write"]);
        assert!(query.actions_at("root").is_empty());
        assert!(query.actions_at("ghost").is_empty());
    }

    #[test]
    fn test_role_sets() {
        let system = sample_system();
        let query = system.query();

        assert_eq!(
            query.explicit_roles("projects", "read"),
            HashSet::from(["viewer".to_string()])
        );
        // Seniority was folded in at assignment time.
        assert_eq!(
            query.effective_roles("projects", "read"),
            HashSet::from(["viewer".to_string(), "editor".to_string()])
        );
        assert!(query.explicit_roles("projects", "write").is_empty());
    }

    #[test]
    fn test_boundary_chain() {
        let system = sample_system();
        let query = system.query();

        assert_eq!(query.boundary_chain("readme"), ["readme", "docs"]);
        assert_eq!(query.boundary_chain("docs"), ["docs"]);
        assert_eq!(query.boundary_chain("root"), ["root"]);
        assert!(query.boundary_chain("ghost").is_empty());
    }

    #[test]
    fn test_subtree_roles_and_statistics() {
        let system = sample_system();
        let query = system.query();

        assert_eq!(
            query.roles_granted_in_subtree("root"),
            HashSet::from(["viewer".to_string(), "editor".to_string()])
        );
        assert_eq!(
            query.roles_granted_in_subtree("docs"),
            HashSet::from(["editor".to_string()])
        );

        let stats = query.statistics();
        assert_eq!(stats.total_resources, 4);
        assert_eq!(stats.total_roles, 2);
        assert_eq!(stats.boundary_resources, 2);
        assert_eq!(stats.explicit_assignments, 2);
        assert_eq!(stats.distinct_actions, 2);
    }
}
