//! Degree-repair benchmarks.
//!
//! Starts every iteration from an empty edge set so the repair engine alone
//! builds the graph up to the degree floor.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{SeedableRng, rngs::SmallRng};

use followgraph_benches::{
    error::BenchSetupError,
    params::RepairBenchParams,
    roster::{SyntheticRosterConfig, synthetic_roster},
};
use followgraph_core::{EdgeSet, GraphBuilder, PersonaRegistry, repair};

/// Seed used for roster generation and every run.
const SEED: u64 = 7;

/// Roster sizes to benchmark.
const PERSONA_COUNTS: &[usize] = &[50, 200, 500];

/// Degree floors to enforce.
const FLOORS: &[u64] = &[2, 5];

fn repair_from_empty_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("repair_from_empty");
    group.sample_size(20);
    let empty = EdgeSet::new();

    for &persona_count in PERSONA_COUNTS {
        let records = synthetic_roster(&SyntheticRosterConfig {
            persona_count,
            max_desired: 8,
            seed: SEED,
        })?;
        let registry = PersonaRegistry::try_from_records("bench", records)?;

        for &degree_floor in FLOORS {
            let repair_params = GraphBuilder::new()
                .with_degree_floor(degree_floor)
                .build()?
                .repair_params();
            let params = RepairBenchParams {
                persona_count,
                degree_floor,
            };

            group.bench_with_input(
                BenchmarkId::from_parameter(&params),
                &registry,
                |b, registry| {
                    b.iter(|| {
                        let mut working = registry.clone();
                        let mut rng = SmallRng::seed_from_u64(SEED);
                        repair(&mut working, &empty, repair_params, &mut rng)
                    });
                },
            );
        }
    }

    group.finish();
    Ok(())
}

fn repair_from_empty(c: &mut Criterion) {
    if let Err(err) = repair_from_empty_impl(c) {
        panic!("repair benchmark setup failed: {err}");
    }
}

criterion_group!(benches, repair_from_empty);
criterion_main!(benches);
