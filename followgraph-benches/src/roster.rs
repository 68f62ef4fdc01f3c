//! Seeded synthetic rosters for benchmarking.
//!
//! Personas are spread over a handful of factions and countries. A small
//! share carry country or global hub tags, and roughly one in ten wants an
//! order of magnitude more followers than the rest, so the affinity
//! modifiers see a skewed popularity distribution.

use followgraph_core::PersonaRecord;
use rand::{Rng, SeedableRng, rngs::SmallRng, seq::SliceRandom};

const FACTIONS: &[&str] = &["red", "blue", "green", "gold", "grey"];
const COUNTRIES: &[&str] = &["uk", "fr", "de", "jp", "br", "ca"];

/// Errors that may occur during synthetic roster generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum SyntheticRosterError {
    /// The requested persona count was zero.
    #[error("persona count must be greater than zero")]
    ZeroPersonas,
    /// The requested maximum desired degree was zero.
    #[error("maximum desired degree must be greater than zero")]
    ZeroDegree,
}

/// Configuration for synthetic roster generation.
#[derive(Clone, Debug)]
pub struct SyntheticRosterConfig {
    /// Number of personas to generate.
    pub persona_count: usize,
    /// Upper bound for ordinary desired follower and following counts.
    pub max_desired: u64,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// Generates persona records with handles `p0`, `p1`, ...
///
/// # Errors
///
/// Returns [`SyntheticRosterError::ZeroPersonas`] if `persona_count` is
/// zero, or [`SyntheticRosterError::ZeroDegree`] if `max_desired` is zero.
///
/// # Examples
///
/// ```
/// use followgraph_benches::roster::{SyntheticRosterConfig, synthetic_roster};
///
/// let config = SyntheticRosterConfig { persona_count: 8, max_desired: 5, seed: 7 };
/// let roster = synthetic_roster(&config).expect("valid config");
/// assert_eq!(roster.len(), 8);
/// assert_eq!(roster[3].handle, "p3");
/// ```
pub fn synthetic_roster(
    config: &SyntheticRosterConfig,
) -> Result<Vec<PersonaRecord>, SyntheticRosterError> {
    if config.persona_count == 0 {
        return Err(SyntheticRosterError::ZeroPersonas);
    }
    if config.max_desired == 0 {
        return Err(SyntheticRosterError::ZeroDegree);
    }

    let mut rng = SmallRng::seed_from_u64(config.seed);
    let roster = (0..config.persona_count)
        .map(|index| synthetic_record(index, config.max_desired, &mut rng))
        .collect();
    Ok(roster)
}

fn synthetic_record(index: usize, max_desired: u64, rng: &mut SmallRng) -> PersonaRecord {
    let faction = FACTIONS.choose(rng).copied().unwrap_or("red");
    let country = COUNTRIES.choose(rng).copied().unwrap_or("uk");

    let mut tags = vec![format!("#{country}")];
    if rng.gen_ratio(1, 25) {
        tags.push(format!("#hub_{country}"));
    }
    if rng.gen_ratio(1, 100) {
        tags.push("#hub".to_owned());
    }

    let ordinary = rng.gen_range(1..=max_desired);
    let desired_in = if rng.gen_ratio(1, 10) {
        ordinary.saturating_mul(10)
    } else {
        ordinary
    };
    let desired_out = rng.gen_range(1..=max_desired);

    PersonaRecord::new(format!("Persona {index}"), format!("p{index}"), faction)
        .with_tags(tags.join(" "))
        .with_desired(desired_in, desired_out)
}
