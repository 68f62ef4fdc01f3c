//! Directed follow edges and the per-run edge set.

use std::collections::HashSet;

use crate::persona::PersonaId;

/// A directed "follower follows followed" relationship.
///
/// Self-follows cannot be represented: [`Edge::new`] refuses them.
///
/// # Examples
/// ```
/// use followgraph_core::{Edge, PersonaId};
///
/// let edge = Edge::new(PersonaId::new(0), PersonaId::new(1)).expect("distinct endpoints");
/// assert_eq!(edge.reversed().follower(), PersonaId::new(1));
/// assert!(Edge::new(PersonaId::new(2), PersonaId::new(2)).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    follower: PersonaId,
    followed: PersonaId,
}

impl Edge {
    /// Builds an edge, returning `None` when both endpoints coincide.
    #[must_use]
    pub fn new(follower: PersonaId, followed: PersonaId) -> Option<Self> {
        (follower != followed).then_some(Self { follower, followed })
    }

    /// Returns the persona doing the following.
    #[must_use]
    pub fn follower(self) -> PersonaId {
        self.follower
    }

    /// Returns the persona being followed.
    #[must_use]
    pub fn followed(self) -> PersonaId {
        self.followed
    }

    /// Returns the edge pointing the other way.
    #[must_use]
    pub fn reversed(self) -> Self {
        Self {
            follower: self.followed,
            followed: self.follower,
        }
    }
}

/// Insertion-ordered set of edges committed during one run.
///
/// Membership is checked on every insertion so an ordered pair is stored at
/// most once; iteration follows commit order, which keeps seeded runs
/// reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeSet {
    ordered: Vec<Edge>,
    members: HashSet<Edge>,
}

impl EdgeSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `edge`, returning `true` when it was not already present.
    pub fn insert(&mut self, edge: Edge) -> bool {
        if !self.members.insert(edge) {
            return false;
        }
        self.ordered.push(edge);
        true
    }

    /// Returns whether `edge` has been committed.
    #[must_use]
    pub fn contains(&self, edge: Edge) -> bool {
        self.members.contains(&edge)
    }

    /// Returns the number of committed edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Returns whether no edges have been committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Iterates in commit order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Edge> + '_ {
        self.ordered.iter().copied()
    }

    /// Returns the edges as a slice in commit order.
    #[must_use]
    pub fn as_slice(&self) -> &[Edge] {
        &self.ordered
    }
}

impl FromIterator<Edge> for EdgeSet {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        let mut set = Self::new();
        for edge in iter {
            set.insert(edge);
        }
        set
    }
}

impl<'a> IntoIterator for &'a EdgeSet {
    type Item = Edge;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Edge>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ordered.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(a: usize, b: usize) -> Edge {
        Edge::new(PersonaId::new(a), PersonaId::new(b)).expect("test edges are not loops")
    }

    #[test]
    fn insert_rejects_repeats_and_keeps_order() {
        let mut set = EdgeSet::new();
        assert!(set.insert(edge(2, 0)));
        assert!(set.insert(edge(0, 2)));
        assert!(!set.insert(edge(2, 0)));
        assert_eq!(set.len(), 2);
        assert_eq!(set.as_slice(), &[edge(2, 0), edge(0, 2)]);
    }

    #[test]
    fn from_iter_collapses_duplicates() {
        let set: EdgeSet = [edge(0, 1), edge(1, 0), edge(0, 1)].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains(edge(1, 0)));
    }
}
