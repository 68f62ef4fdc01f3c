//! Roster fixture strategies for property tests.

use proptest::prelude::*;
use rand::{Rng, SeedableRng, rngs::SmallRng, seq::SliceRandom};

use crate::{Modifiers, persona::PersonaRecord};

const MAX_PERSONAS: usize = 24;
const TAG_POOL: &[&str] = &["#uk", "#fr", "#hub", "#hub_uk", "#hub_fr", "#news", "#sport"];

/// Roster plus run settings for one property case.
#[derive(Debug, Clone)]
pub(super) struct RosterFixture {
    pub(super) records: Vec<PersonaRecord>,
    pub(super) modifiers: Modifiers,
    pub(super) p_intra_faction: f64,
    pub(super) p_inter_faction: f64,
    pub(super) seed: u64,
}

/// Generates rosters between one and [`MAX_PERSONAS`] personas.
pub(super) fn roster_fixture_strategy() -> impl Strategy<Value = RosterFixture> {
    (
        1..=MAX_PERSONAS,
        any::<u64>(),
        any::<[bool; 3]>(),
        0.0..=1.0_f64,
        0.0..=1.0_f64,
    )
        .prop_map(|(size, seed, toggles, p_intra, p_inter)| {
            let mut rng = SmallRng::seed_from_u64(seed);
            RosterFixture {
                records: generate_records(size, &mut rng),
                modifiers: Modifiers {
                    fullness_damping: toggles[0],
                    bandwagon: toggles[1],
                    scale_suppression: toggles[2],
                },
                p_intra_faction: p_intra,
                p_inter_faction: p_inter,
                seed,
            }
        })
}

fn generate_records(size: usize, rng: &mut SmallRng) -> Vec<PersonaRecord> {
    let factions = rng.gen_range(1..=3_usize);
    (0..size)
        .map(|i| {
            let tag_count = rng.gen_range(0..=2_usize);
            let tags: Vec<&str> = TAG_POOL.choose_multiple(rng, tag_count).copied().collect();
            PersonaRecord::new(
                format!("Persona {i}"),
                format!("p{i}"),
                format!("faction-{}", rng.gen_range(0..factions)),
            )
            .with_tags(tags.join(" "))
            .with_desired(rng.gen_range(0..=40), rng.gen_range(0..=8))
        })
        .collect()
}
