//! Role seniority graph and cycle-safe ancestor closure.

use crate::error::{Error, Result};
use dashmap::DashMap;
use std::collections::HashSet;

/// Seniority edges for a single role.
#[derive(Debug, Default, Clone)]
struct RoleEntry {
    seniors: HashSet<String>,
    juniors: HashSet<String>,
}

/// The role seniority graph.
///
/// A role may have multiple senior and multiple junior roles, so the graph is
/// a DAG rather than a tree. The relation is expected to stay acyclic, but a
/// cycle introduced by caller error is tolerated rather than rejected:
/// traversals are guarded by a visited set, and a cycle simply collapses the
/// roles involved into a class that inherit each other's grants.
///
/// Seniority is consulted once, at assignment time. Edges added after a
/// permission has already been assigned do not retroactively widen the
/// effective sets computed for that assignment.
#[derive(Debug, Default)]
pub struct RoleGraph {
    // Role id -> direct seniority edges, both directions kept in sync.
    roles: DashMap<String, RoleEntry>,
}

impl RoleGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new role.
    pub fn add(&mut self, id: &str) -> Result<()> {
        if self.roles.contains_key(id) {
            return Err(Error::RoleAlreadyExists(id.to_string()));
        }
        self.roles.insert(id.to_string(), RoleEntry::default());
        Ok(())
    }

    /// Check whether a role with the given id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.roles.contains_key(id)
    }

    /// Add a mutual seniority edge: `senior` becomes a direct senior of
    /// `role`, and `role` a direct junior of `senior`.
    pub fn add_senior(&mut self, role: &str, senior: &str) -> Result<()> {
        if !self.roles.contains_key(role) {
            return Err(Error::RoleNotFound(role.to_string()));
        }
        if !self.roles.contains_key(senior) {
            return Err(Error::RoleNotFound(senior.to_string()));
        }
        if let Some(mut entry) = self.roles.get_mut(role) {
            entry.seniors.insert(senior.to_string());
        }
        if let Some(mut entry) = self.roles.get_mut(senior) {
            entry.juniors.insert(role.to_string());
        }
        Ok(())
    }

    /// Direct seniors of a role. Unknown ids yield an empty set.
    pub fn seniors(&self, id: &str) -> HashSet<String> {
        self.roles
            .get(id)
            .map(|entry| entry.seniors.clone())
            .unwrap_or_default()
    }

    /// Direct juniors of a role. Unknown ids yield an empty set.
    pub fn juniors(&self, id: &str) -> HashSet<String> {
        self.roles
            .get(id)
            .map(|entry| entry.juniors.clone())
            .unwrap_or_default()
    }

    /// All roles reachable from `id` by following senior edges transitively.
    ///
    /// The starting role itself is not part of the result. The traversal is
    /// guarded by a visited set, so it terminates and returns a well-defined
    /// membership even when the seniority graph contains cycles.
    pub fn ancestor_closure(&self, id: &str) -> HashSet<String> {
        let mut closure = HashSet::new();
        let mut visited = HashSet::from([id.to_string()]);
        let mut pending = vec![id.to_string()];

        while let Some(current) = pending.pop() {
            let seniors: Vec<String> = match self.roles.get(&current) {
                Some(entry) => entry.seniors.iter().cloned().collect(),
                None => continue,
            };
            for senior in seniors {
                if visited.insert(senior.clone()) {
                    closure.insert(senior.clone());
                    pending.push(senior);
                }
            }
        }

        closure
    }

    /// Number of registered roles.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Whether the graph holds no roles.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// All registered role ids, in no particular order.
    pub fn ids(&self) -> Vec<String> {
        self.roles.iter().map(|entry| entry.key().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_duplicate() {
        let mut graph = RoleGraph::new();
        graph.add("user").unwrap();
        assert!(graph.contains("user"));
        assert!(matches!(graph.add("user"), Err(Error::RoleAlreadyExists(_))));
    }

    #[test]
    fn test_mutual_edges() {
        let mut graph = RoleGraph::new();
        graph.add("user").unwrap();
        graph.add("admin").unwrap();
        graph.add_senior("user", "admin").unwrap();

        assert!(graph.seniors("user").contains("admin"));
        assert!(graph.juniors("admin").contains("user"));
        assert!(graph.juniors("user").is_empty());
    }

    #[test]
    fn test_add_senior_unknown_role() {
        let mut graph = RoleGraph::new();
        graph.add("user").unwrap();
        assert!(matches!(
            graph.add_senior("user", "ghost"),
            Err(Error::RoleNotFound(_))
        ));
        assert!(matches!(
            graph.add_senior("ghost", "user"),
            Err(Error::RoleNotFound(_))
        ));
    }

    #[test]
    fn test_transitive_closure() {
        let mut graph = RoleGraph::new();
        for id in ["intern", "developer", "lead", "cto"] {
            graph.add(id).unwrap();
        }
        graph.add_senior("intern", "developer").unwrap();
        graph.add_senior("developer", "lead").unwrap();
        graph.add_senior("lead", "cto").unwrap();

        let closure = graph.ancestor_closure("intern");
        assert_eq!(
            closure,
            HashSet::from([
                "developer".to_string(),
                "lead".to_string(),
                "cto".to_string()
            ])
        );
        assert!(graph.ancestor_closure("cto").is_empty());
    }

    #[test]
    fn test_closure_with_multiple_seniors() {
        let mut graph = RoleGraph::new();
        for id in ["dev", "qa_lead", "eng_lead", "director"] {
            graph.add(id).unwrap();
        }
        graph.add_senior("dev", "qa_lead").unwrap();
        graph.add_senior("dev", "eng_lead").unwrap();
        graph.add_senior("qa_lead", "director").unwrap();
        graph.add_senior("eng_lead", "director").unwrap();

        let closure = graph.ancestor_closure("dev");
        assert_eq!(closure.len(), 3);
        assert!(closure.contains("director"));
    }

    #[test]
    fn test_closure_tolerates_cycle() {
        let mut graph = RoleGraph::new();
        graph.add("a").unwrap();
        graph.add("b").unwrap();
        graph.add_senior("a", "b").unwrap();
        graph.add_senior("b", "a").unwrap();

        // Mutually senior roles inherit each other; the traversal terminates.
        assert_eq!(graph.ancestor_closure("a"), HashSet::from(["b".to_string()]));
        assert_eq!(graph.ancestor_closure("b"), HashSet::from(["a".to_string()]));
    }

    #[test]
    fn test_closure_unknown_role() {
        let graph = RoleGraph::new();
        assert!(graph.ancestor_closure("ghost").is_empty());
    }
}
