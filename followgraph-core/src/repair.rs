//! Degree-floor repair over a sampled edge set.
//!
//! Repair runs passes over the roster in registry order, topping up any
//! persona whose in- or out-degree sits below the floor. Reciprocation is
//! preferred: a persona short of followings follows back one of its
//! followers, and a persona short of followers is followed back by someone
//! it follows. Only when no such partner exists is a random persona chosen.
//! Passes stop at a fixed point or at the configured cap.

use std::collections::BTreeSet;

use rand::{Rng, seq::SliceRandom};
use tracing::{debug, instrument, warn};

use crate::{
    edges::{Edge, EdgeSet},
    params::RepairParams,
    persona::PersonaId,
    registry::PersonaRegistry,
};

/// Outcome of a repair run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairReport {
    /// Passes executed, including the final pass that added nothing.
    pub passes: usize,
    /// Edges added across all passes.
    pub edges_added: usize,
    /// Whether a pass completed without changes before the cap.
    pub converged: bool,
    /// Personas still below the floor, in registry order.
    pub deficient: Vec<PersonaId>,
}

impl RepairReport {
    /// Returns whether every persona reached the floor.
    #[must_use]
    pub fn floor_satisfied(&self) -> bool {
        self.deficient.is_empty()
    }
}

/// Raises every persona to the degree floor where the roster allows it.
///
/// The registry's counters are recomputed from `edges` before the first
/// pass, and added edges are counted as they are linked. The returned set
/// lists edges grouped by follower in registry order.
///
/// Rosters with fewer than `floor + 1` personas cannot meet the floor. Such
/// runs stop at the first pass that finds nothing to add and report the
/// shortfall through [`RepairReport::deficient`].
#[instrument(
    name = "core.repair",
    skip_all,
    fields(
        personas = registry.len(),
        edges = edges.len(),
        floor = params.degree_floor(),
    ),
)]
pub fn repair<R>(
    registry: &mut PersonaRegistry,
    edges: &EdgeSet,
    params: RepairParams,
    rng: &mut R,
) -> (EdgeSet, RepairReport)
where
    R: Rng + ?Sized,
{
    registry.sync_counters(edges);
    let ids: Vec<PersonaId> = registry.ids().collect();
    let floor = usize::try_from(params.degree_floor()).unwrap_or(usize::MAX);
    let mut adjacency = Adjacency::from_edges(ids.len(), edges);

    let mut passes = 0;
    let mut edges_added = 0;
    let mut converged = false;
    while passes < params.max_passes() {
        passes += 1;
        let mut added = 0;
        for &me in &ids {
            if adjacency.out_degree(me) < floor {
                if let Some(edge) = adjacency.pick_following(&ids, me, rng) {
                    added += usize::from(adjacency.commit(registry, edge));
                }
            }
            if adjacency.in_degree(me) < floor {
                if let Some(edge) = adjacency.pick_follower(&ids, me, rng) {
                    added += usize::from(adjacency.commit(registry, edge));
                }
            }
        }
        debug!(pass = passes, added, "repair pass finished");
        edges_added += added;
        if added == 0 {
            converged = true;
            break;
        }
    }

    let deficient: Vec<PersonaId> = ids
        .iter()
        .copied()
        .filter(|&id| adjacency.out_degree(id) < floor || adjacency.in_degree(id) < floor)
        .collect();
    if !deficient.is_empty() {
        warn!(
            deficient = deficient.len(),
            passes,
            converged,
            "degree floor not met for every persona"
        );
    }

    let report = RepairReport {
        passes,
        edges_added,
        converged,
        deficient,
    };
    (adjacency.into_edges(), report)
}

/// Ordered out- and in-neighbour sets per persona.
struct Adjacency {
    outgoing: Vec<BTreeSet<PersonaId>>,
    incoming: Vec<BTreeSet<PersonaId>>,
}

impl Adjacency {
    fn from_edges(len: usize, edges: &EdgeSet) -> Self {
        let mut adjacency = Self {
            outgoing: vec![BTreeSet::new(); len],
            incoming: vec![BTreeSet::new(); len],
        };
        for edge in edges {
            adjacency.link(edge);
        }
        adjacency
    }

    fn following(&self, id: PersonaId) -> Option<&BTreeSet<PersonaId>> {
        self.outgoing.get(id.index())
    }

    fn followers(&self, id: PersonaId) -> Option<&BTreeSet<PersonaId>> {
        self.incoming.get(id.index())
    }

    fn out_degree(&self, id: PersonaId) -> usize {
        self.following(id).map_or(0, BTreeSet::len)
    }

    fn in_degree(&self, id: PersonaId) -> usize {
        self.followers(id).map_or(0, BTreeSet::len)
    }

    fn follows(&self, follower: PersonaId, followed: PersonaId) -> bool {
        self.following(follower)
            .is_some_and(|set| set.contains(&followed))
    }

    /// Links `edge`, returning `true` when it was absent.
    fn link(&mut self, edge: Edge) -> bool {
        let Some(out) = self.outgoing.get_mut(edge.follower().index()) else {
            return false;
        };
        if !out.insert(edge.followed()) {
            return false;
        }
        if let Some(inc) = self.incoming.get_mut(edge.followed().index()) {
            inc.insert(edge.follower());
        }
        true
    }

    fn commit(&mut self, registry: &mut PersonaRegistry, edge: Edge) -> bool {
        let linked = self.link(edge);
        if linked {
            registry.record_edge(edge);
        }
        linked
    }

    /// Chooses someone for `me` to follow: an unreciprocated follower if any,
    /// otherwise any persona `me` does not yet follow.
    fn pick_following<R>(&self, ids: &[PersonaId], me: PersonaId, rng: &mut R) -> Option<Edge>
    where
        R: Rng + ?Sized,
    {
        let follow_backs: Vec<PersonaId> = self
            .followers(me)
            .into_iter()
            .flatten()
            .copied()
            .filter(|&follower| !self.follows(me, follower))
            .collect();
        let target = match follow_backs.choose(rng) {
            Some(&target) => target,
            None => {
                let fresh: Vec<PersonaId> = ids
                    .iter()
                    .copied()
                    .filter(|&other| other != me && !self.follows(me, other))
                    .collect();
                *fresh.choose(rng)?
            }
        };
        Edge::new(me, target)
    }

    /// Chooses someone to follow `me`: a followee who does not follow back if
    /// any, otherwise any persona not yet following `me`.
    fn pick_follower<R>(&self, ids: &[PersonaId], me: PersonaId, rng: &mut R) -> Option<Edge>
    where
        R: Rng + ?Sized,
    {
        let reciprocators: Vec<PersonaId> = self
            .following(me)
            .into_iter()
            .flatten()
            .copied()
            .filter(|&followee| !self.follows(followee, me))
            .collect();
        let follower = match reciprocators.choose(rng) {
            Some(&follower) => follower,
            None => {
                let fresh: Vec<PersonaId> = ids
                    .iter()
                    .copied()
                    .filter(|&other| other != me && !self.follows(other, me))
                    .collect();
                *fresh.choose(rng)?
            }
        };
        Edge::new(follower, me)
    }

    fn into_edges(self) -> EdgeSet {
        self.outgoing
            .into_iter()
            .enumerate()
            .flat_map(|(index, targets)| {
                let follower = PersonaId::new(index);
                targets
                    .into_iter()
                    .filter_map(move |target| Edge::new(follower, target))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::uniform_roster;
    use rand::{SeedableRng, rngs::SmallRng};
    use rstest::rstest;

    fn edge(a: usize, b: usize) -> Edge {
        Edge::new(PersonaId::new(a), PersonaId::new(b)).expect("test edges are not loops")
    }

    fn counted(registry: &mut PersonaRegistry, edges: &[Edge]) -> EdgeSet {
        let set: EdgeSet = edges.iter().copied().collect();
        for edge in &set {
            registry.record_edge(edge);
        }
        set
    }

    #[rstest]
    #[case::three(3)]
    #[case::five(5)]
    #[case::forty(40)]
    fn empty_graph_is_raised_to_floor(#[case] size: usize) {
        let mut registry = uniform_roster(size, 0, 0);
        let mut rng = SmallRng::seed_from_u64(5);
        let (edges, report) = repair(
            &mut registry,
            &EdgeSet::new(),
            RepairParams::default(),
            &mut rng,
        );

        assert!(report.converged, "repair must reach a fixed point");
        assert!(report.floor_satisfied(), "deficient: {:?}", report.deficient);
        assert_eq!(edges.len(), report.edges_added);
        for persona in registry.iter() {
            assert!(persona.current_out() >= 2 && persona.current_in() >= 2);
        }
    }

    #[rstest]
    #[case::single(1)]
    #[case::pair(2)]
    fn tiny_rosters_terminate_with_deficits(#[case] size: usize) {
        let mut registry = uniform_roster(size, 0, 0);
        let mut rng = SmallRng::seed_from_u64(5);
        let (_, report) = repair(
            &mut registry,
            &EdgeSet::new(),
            RepairParams::default(),
            &mut rng,
        );

        assert!(report.converged);
        assert!(report.passes <= 2, "took {} passes", report.passes);
        assert_eq!(report.deficient.len(), size);
    }

    fn single_pass_at_floor_one() -> RepairParams {
        RepairParams {
            degree_floor: 1,
            max_passes: 1,
        }
    }

    #[test]
    fn follow_back_is_preferred_for_missing_followings() {
        // 1 and 2 follow 0, who follows nobody; 1, 2 and 3 already meet the floor.
        let mut registry = uniform_roster(4, 0, 0);
        let initial = counted(
            &mut registry,
            &[edge(1, 0), edge(2, 0), edge(1, 3), edge(3, 1), edge(3, 2)],
        );
        let mut rng = SmallRng::seed_from_u64(17);
        let (edges, report) = repair(&mut registry, &initial, single_pass_at_floor_one(), &mut rng);

        assert_eq!(report.edges_added, 1);
        assert_ne!(edges.contains(edge(0, 1)), edges.contains(edge(0, 2)));
        assert!(!edges.contains(edge(0, 3)));
    }

    #[test]
    fn followee_reciprocates_for_missing_followers() {
        // 0 follows 1 and 2, nobody follows 0; 1, 2 and 3 already meet the floor.
        let mut registry = uniform_roster(4, 0, 0);
        let initial = counted(
            &mut registry,
            &[edge(0, 1), edge(0, 2), edge(1, 3), edge(2, 3), edge(3, 1)],
        );
        let mut rng = SmallRng::seed_from_u64(23);
        let (edges, report) = repair(&mut registry, &initial, single_pass_at_floor_one(), &mut rng);

        assert_eq!(report.edges_added, 1);
        assert_ne!(edges.contains(edge(1, 0)), edges.contains(edge(2, 0)));
        assert!(!edges.contains(edge(3, 0)));
    }

    #[test]
    fn stale_counters_are_recounted_from_edges() {
        let mut registry = uniform_roster(3, 0, 0);
        let full = [
            edge(0, 1),
            edge(0, 2),
            edge(1, 0),
            edge(1, 2),
            edge(2, 0),
            edge(2, 1),
        ];
        let initial = counted(&mut registry, &full);
        // Count the same edges a second time so every counter reads 4.
        for edge in &initial {
            registry.record_edge(edge);
        }
        let mut rng = SmallRng::seed_from_u64(4);
        let (_, report) = repair(&mut registry, &initial, RepairParams::default(), &mut rng);

        assert_eq!(report.edges_added, 0);
        for persona in registry.iter() {
            assert_eq!((persona.current_out(), persona.current_in()), (2, 2));
        }
    }

    #[test]
    fn satisfied_graph_is_left_untouched() {
        let mut registry = uniform_roster(3, 0, 0);
        let full = [
            edge(0, 1),
            edge(0, 2),
            edge(1, 0),
            edge(1, 2),
            edge(2, 0),
            edge(2, 1),
        ];
        let initial = counted(&mut registry, &full);
        let mut rng = SmallRng::seed_from_u64(1);
        let (edges, report) = repair(&mut registry, &initial, RepairParams::default(), &mut rng);

        assert_eq!(report.passes, 1);
        assert_eq!(report.edges_added, 0);
        assert_eq!(edges.len(), full.len());
    }

    #[test]
    fn pass_cap_bounds_work() {
        let mut registry = uniform_roster(30, 0, 0);
        let params = RepairParams {
            max_passes: 1,
            ..RepairParams::default()
        };
        let mut rng = SmallRng::seed_from_u64(2);
        let (_, report) = repair(&mut registry, &EdgeSet::new(), params, &mut rng);

        assert_eq!(report.passes, 1);
        assert!(!report.converged);
        assert!(report.edges_added > 0);
    }

    #[test]
    fn counters_track_adjacency_after_repair() {
        let mut registry = uniform_roster(8, 0, 0);
        let initial = counted(&mut registry, &[edge(0, 1), edge(1, 2), edge(3, 0)]);
        let mut rng = SmallRng::seed_from_u64(8);
        let (edges, _) = repair(&mut registry, &initial, RepairParams::default(), &mut rng);

        let mut outs = vec![0_u64; registry.len()];
        let mut ins = vec![0_u64; registry.len()];
        for edge in &edges {
            outs[edge.follower().index()] += 1;
            ins[edge.followed().index()] += 1;
        }
        for persona in registry.iter() {
            assert_eq!(persona.current_out(), outs[persona.id().index()]);
            assert_eq!(persona.current_in(), ins[persona.id().index()]);
        }
    }
}
