//! Structural checks applied to every generated graph.

use std::collections::HashSet;

use proptest::test_runner::{TestCaseError, TestCaseResult};

use crate::{GeneratedGraph, GraphBuilder, params::DEFAULT_DEGREE_FLOOR};

use super::strategies::RosterFixture;

/// Runs generation for `fixture` with its own seed and settings.
pub(super) fn generate(fixture: &RosterFixture) -> Result<GeneratedGraph, TestCaseError> {
    GraphBuilder::new()
        .with_modifiers(fixture.modifiers)
        .with_p_intra_faction(fixture.p_intra_faction)
        .with_p_inter_faction(fixture.p_inter_faction)
        .with_seed(fixture.seed)
        .build()
        .and_then(|graph| graph.generate("property", fixture.records.clone()))
        .map_err(|err| TestCaseError::fail(format!("generation failed: {err}")))
}

/// Every edge joins two distinct personas and appears once.
pub(super) fn run_simple_graph_property(fixture: &RosterFixture) -> TestCaseResult {
    let generated = generate(fixture)?;
    let mut seen = HashSet::new();
    for edge in generated.edges() {
        if edge.follower() == edge.followed() {
            return Err(TestCaseError::fail(format!("self-loop on {}", edge.follower())));
        }
        if !seen.insert(edge) {
            return Err(TestCaseError::fail(format!(
                "duplicate edge {} -> {}",
                edge.follower(),
                edge.followed()
            )));
        }
    }
    Ok(())
}

/// Persona counters equal the degrees implied by the edge set.
pub(super) fn run_counter_consistency_property(fixture: &RosterFixture) -> TestCaseResult {
    let generated = generate(fixture)?;
    let registry = generated.registry();
    let mut outs = vec![0_u64; registry.len()];
    let mut ins = vec![0_u64; registry.len()];
    for edge in generated.edges() {
        outs[edge.follower().index()] += 1;
        ins[edge.followed().index()] += 1;
    }
    for persona in registry.iter() {
        let index = persona.id().index();
        if persona.current_out() != outs[index] || persona.current_in() != ins[index] {
            return Err(TestCaseError::fail(format!(
                "{} counters ({}, {}) disagree with edges ({}, {})",
                persona.handle(),
                persona.current_in(),
                persona.current_out(),
                ins[index],
                outs[index],
            )));
        }
    }
    Ok(())
}

/// Rosters large enough to admit the floor always reach it.
pub(super) fn run_degree_floor_property(fixture: &RosterFixture) -> TestCaseResult {
    let generated = generate(fixture)?;
    let reachable = fixture.records.len() as u64 > DEFAULT_DEGREE_FLOOR;
    let report = generated.repair_report();
    if reachable && !report.floor_satisfied() {
        return Err(TestCaseError::fail(format!(
            "{} personas below floor after {} passes",
            report.deficient.len(),
            report.passes
        )));
    }
    if !report.converged {
        return Err(TestCaseError::fail("repair hit the pass cap"));
    }
    Ok(())
}

/// Two runs with the same seed produce identical edge lists.
pub(super) fn run_determinism_property(fixture: &RosterFixture) -> TestCaseResult {
    let first = generate(fixture)?;
    let second = generate(fixture)?;
    if first.edges().as_slice() != second.edges().as_slice() {
        return Err(TestCaseError::fail("same seed produced different edges"));
    }
    Ok(())
}
