//! Shared test utilities for `followgraph-core`.

use followgraph_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::{persona::PersonaRecord, registry::PersonaRegistry};

/// Builds a standard proptest configuration from the shared CI profile.
///
/// This keeps property suites aligned on the same `PROGTEST_CASES` and
/// `FOLLOWGRAPH_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Records for `size` same-faction personas with handles `p0`, `p1`, ...
#[must_use]
pub(crate) fn uniform_records(size: usize, desired_in: u64, desired_out: u64) -> Vec<PersonaRecord> {
    (0..size)
        .map(|i| {
            PersonaRecord::new(format!("Persona {i}"), format!("p{i}"), "uniform")
                .with_desired(desired_in, desired_out)
        })
        .collect()
}

/// Registry over [`uniform_records`].
///
/// # Panics
/// Panics when `size` is zero.
#[must_use]
pub(crate) fn uniform_roster(size: usize, desired_in: u64, desired_out: u64) -> PersonaRegistry {
    PersonaRegistry::try_from_records("uniform", uniform_records(size, desired_in, desired_out))
        .expect("uniform roster must build")
}
