//! Follow-probability model for ordered persona pairs.
//!
//! The model resolves a base probability from hub tags and faction
//! membership, then layers the enabled modifiers in a fixed order:
//! fullness damping (or the under-quota boost), the bandwagon effect, and
//! big-follows-small suppression. Every modifier is multiplicative and the
//! result is clamped to `[0, 1]`.

use crate::{
    params::{AffinityParams, FULLNESS_DAMPING},
    persona::Persona,
    registry::PersonaRegistry,
};

/// Rule that supplied the base probability for a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseRule {
    /// Target is a hub for a country the follower belongs to.
    CountryHub,
    /// Target is a global hub.
    GlobalHub,
    /// Both personas share a faction.
    IntraFaction,
    /// The personas belong to different factions.
    InterFaction,
}

/// Pure follow-probability function bound to one run's parameters.
///
/// # Examples
/// ```
/// use followgraph_core::{AffinityModel, BaseRule, GraphBuilder, PersonaRecord, PersonaRegistry};
///
/// let registry = PersonaRegistry::try_from_records(
///     "demo",
///     vec![
///         PersonaRecord::new("Ada", "ada", "blue").with_tags("#uk"),
///         PersonaRecord::new("Bo", "bo", "red").with_tags("#hub_uk"),
///     ],
/// )?;
/// let graph = GraphBuilder::new().build()?;
/// let model = AffinityModel::new(graph.affinity_params(), &registry);
/// let ada = registry.get(registry.id_of("ada")?).expect("registered");
/// let bo = registry.get(registry.id_of("bo")?).expect("registered");
/// assert_eq!(model.base_rule(ada, bo), BaseRule::CountryHub);
/// assert_eq!(model.base_probability(ada, bo), 0.6);
/// # Ok::<(), followgraph_core::GraphError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AffinityModel<'params> {
    params: &'params AffinityParams,
    max_desired_in: u64,
}

impl<'params> AffinityModel<'params> {
    /// Binds `params` to the roster-wide maximum desired follower count.
    #[must_use]
    pub fn new(params: &'params AffinityParams, registry: &PersonaRegistry) -> Self {
        Self::with_max_desired_in(params, registry.max_desired_in())
    }

    /// Binds `params` to an explicit roster maximum (zero is treated as 1).
    #[must_use]
    pub fn with_max_desired_in(params: &'params AffinityParams, max_desired_in: u64) -> Self {
        Self {
            params,
            max_desired_in: max_desired_in.max(1),
        }
    }

    /// Resolves which base rule applies to `follower` following `target`.
    ///
    /// Only the target's first `#hub_<code>` tag is considered; when the
    /// follower lacks that country, resolution falls through to the global
    /// hub and faction rules.
    #[must_use]
    pub fn base_rule(&self, follower: &Persona, target: &Persona) -> BaseRule {
        if target
            .tags()
            .country_hub()
            .is_some_and(|code| follower.tags().has_country(code))
        {
            return BaseRule::CountryHub;
        }
        if target.tags().is_global_hub() {
            return BaseRule::GlobalHub;
        }
        if follower.faction() == target.faction() {
            return BaseRule::IntraFaction;
        }
        BaseRule::InterFaction
    }

    /// Base probability before any modifier.
    #[must_use]
    pub fn base_probability(&self, follower: &Persona, target: &Persona) -> f64 {
        match self.base_rule(follower, target) {
            BaseRule::CountryHub => self.params.hub_country_probability,
            BaseRule::GlobalHub => self.params.hub_global_probability,
            BaseRule::IntraFaction => self.params.p_intra_faction,
            BaseRule::InterFaction => self.params.p_inter_faction,
        }
    }

    /// Final probability that `follower` follows `target`, in `[0, 1]`.
    #[must_use]
    pub fn probability(&self, follower: &Persona, target: &Persona) -> f64 {
        let modifiers = self.params.modifiers;
        let mut p = self.base_probability(follower, target);

        if modifiers.fullness_damping {
            p *= self.fullness_factor(target);
        }
        if modifiers.bandwagon {
            p *= self.bandwagon_factor(target);
        }
        if modifiers.scale_suppression && self.is_suppressed(follower, target) {
            return 0.0;
        }
        p.clamp(0.0, 1.0)
    }

    fn fullness_factor(&self, target: &Persona) -> f64 {
        if target.is_follower_quota_met() {
            return FULLNESS_DAMPING;
        }
        let desired = target.desired_in();
        let shortfall = desired.saturating_sub(target.current_in()) as f64;
        1.0 + self.params.boost_coefficient * shortfall / desired.max(1) as f64
    }

    fn bandwagon_factor(&self, target: &Persona) -> f64 {
        let popularity = target.desired_in() as f64 / self.max_desired_in as f64;
        1.0 + self.params.bandwagon_scale * popularity
    }

    fn is_suppressed(&self, follower: &Persona, target: &Persona) -> bool {
        let ratio = follower_ratio(follower.desired_in(), target.desired_in());
        if ratio > self.params.big_follow_ratio_threshold {
            return true;
        }
        target.desired_in() < self.params.min_follow_cutoff && ratio > self.params.big_user_ratio
    }
}

/// `follower_in / max(1, target_in)`, infinite when only the target is empty.
fn follower_ratio(follower_in: u64, target_in: u64) -> f64 {
    if target_in == 0 && follower_in > 0 {
        return f64::INFINITY;
    }
    follower_in as f64 / target_in.max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GraphBuilder, Modifiers, PersonaRecord, PersonaRegistry};
    use rstest::rstest;

    fn pair(follower: PersonaRecord, target: PersonaRecord) -> PersonaRegistry {
        PersonaRegistry::try_from_records("pair", vec![follower, target])
            .expect("pair roster must build")
    }

    fn persona(registry: &PersonaRegistry, index: usize) -> &Persona {
        registry
            .get(crate::PersonaId::new(index))
            .expect("index within roster")
    }

    fn bare_params() -> AffinityParams {
        GraphBuilder::new()
            .with_modifiers(Modifiers::none())
            .build()
            .expect("params valid")
            .affinity_params()
            .clone()
    }

    #[rstest]
    #[case::zero_target(5, 0, f64::INFINITY)]
    #[case::both_zero(0, 0, 0.0)]
    #[case::even(10, 10, 1.0)]
    #[case::big(100, 4, 25.0)]
    fn follower_ratio_handles_zero_targets(
        #[case] follower_in: u64,
        #[case] target_in: u64,
        #[case] expected: f64,
    ) {
        assert_eq!(follower_ratio(follower_in, target_in), expected);
    }

    #[test]
    fn full_target_is_damped_not_zeroed() {
        let params = GraphBuilder::new()
            .with_p_intra_faction(0.5)
            .with_modifiers(Modifiers {
                fullness_damping: true,
                ..Modifiers::none()
            })
            .build()
            .expect("params valid")
            .affinity_params()
            .clone();
        // desired_in of zero means the quota is met from the start
        let registry = pair(
            PersonaRecord::new("U", "u", "f"),
            PersonaRecord::new("V", "v", "f"),
        );
        let model = AffinityModel::new(&params, &registry);
        let p = model.probability(persona(&registry, 0), persona(&registry, 1));
        assert!((p - 0.1).abs() < 1e-12, "expected damped 0.1, got {p}");
    }

    #[test]
    fn under_quota_target_is_boosted() {
        let params = GraphBuilder::new()
            .with_p_intra_faction(0.5)
            .with_boost_coefficient(0.2)
            .with_modifiers(Modifiers {
                fullness_damping: true,
                ..Modifiers::none()
            })
            .build()
            .expect("params valid")
            .affinity_params()
            .clone();
        let registry = pair(
            PersonaRecord::new("U", "u", "f"),
            PersonaRecord::new("V", "v", "f").with_desired(4, 0),
        );
        let model = AffinityModel::new(&params, &registry);
        let p = model.probability(persona(&registry, 0), persona(&registry, 1));
        assert!((p - 0.6).abs() < 1e-12, "expected boosted 0.6, got {p}");
    }

    #[test]
    fn bandwagon_scales_with_relative_popularity() {
        let params = GraphBuilder::new()
            .with_p_inter_faction(0.2)
            .with_bandwagon_scale(1.0)
            .with_modifiers(Modifiers {
                bandwagon: true,
                ..Modifiers::none()
            })
            .build()
            .expect("params valid")
            .affinity_params()
            .clone();
        let registry = pair(
            PersonaRecord::new("U", "u", "a").with_desired(100, 1),
            PersonaRecord::new("V", "v", "b").with_desired(50, 1),
        );
        let model = AffinityModel::new(&params, &registry);
        let p = model.probability(persona(&registry, 0), persona(&registry, 1));
        assert!((p - 0.3).abs() < 1e-12, "expected 0.2 * 1.5, got {p}");
    }

    #[test]
    fn probability_is_clamped_to_one() {
        let params = GraphBuilder::new()
            .with_p_intra_faction(1.0)
            .with_bandwagon_scale(3.0)
            .with_modifiers(Modifiers {
                bandwagon: true,
                ..Modifiers::none()
            })
            .build()
            .expect("params valid")
            .affinity_params()
            .clone();
        let registry = pair(
            PersonaRecord::new("U", "u", "f").with_desired(1, 1),
            PersonaRecord::new("V", "v", "f").with_desired(9, 1),
        );
        let model = AffinityModel::new(&params, &registry);
        assert_eq!(
            model.probability(persona(&registry, 0), persona(&registry, 1)),
            1.0
        );
    }

    #[test]
    fn cutoff_only_applies_to_bigger_followers() {
        let params = GraphBuilder::new()
            .with_p_intra_faction(0.5)
            .with_min_follow_cutoff(20)
            .with_big_follow_ratio_threshold(100.0)
            .with_modifiers(Modifiers {
                scale_suppression: true,
                ..Modifiers::none()
            })
            .build()
            .expect("params valid")
            .affinity_params()
            .clone();
        let registry = PersonaRegistry::try_from_records(
            "trio",
            vec![
                PersonaRecord::new("Big", "big", "f").with_desired(30, 1),
                PersonaRecord::new("Small", "small", "f").with_desired(10, 1),
                PersonaRecord::new("Tiny", "tiny", "f").with_desired(5, 1),
            ],
        )
        .expect("roster must build");
        let model = AffinityModel::new(&params, &registry);
        let (big, small, tiny) = (
            persona(&registry, 0),
            persona(&registry, 1),
            persona(&registry, 2),
        );
        assert_eq!(model.probability(big, small), 0.0);
        assert_eq!(model.probability(tiny, small), 0.5);
        assert_eq!(model.probability(small, big), 0.5);
    }

    #[test]
    fn base_probability_ignores_modifiers() {
        let params = bare_params();
        let registry = pair(
            PersonaRecord::new("U", "u", "a"),
            PersonaRecord::new("V", "v", "b").with_tags("#hub"),
        );
        let model = AffinityModel::new(&params, &registry);
        assert_eq!(
            model.base_probability(persona(&registry, 0), persona(&registry, 1)),
            params.hub_global_probability()
        );
    }
}
