//! Followgraph core library.
//!
//! Generates synthetic "who follows whom" graphs over a roster of personas.
//! A run samples follow edges through a tag- and faction-aware affinity
//! model, then repairs the result so every persona reaches a minimum in- and
//! out-degree.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod affinity;
mod builder;
mod edges;
mod error;
mod graph;
mod matrix;
mod params;
mod persona;
#[cfg(test)]
mod property;
mod registry;
mod repair;
mod sampler;
#[cfg(test)]
mod test_utils;

pub use crate::{
    affinity::{AffinityModel, BaseRule},
    builder::{DEFAULT_SEED, GraphBuilder},
    edges::{Edge, EdgeSet},
    error::{GraphError, GraphErrorCode, Result},
    graph::{FollowGraph, GeneratedGraph},
    matrix::{RelationshipCode, RelationshipMatrix},
    params::{
        AffinityParams, DEFAULT_BANDWAGON_SCALE, DEFAULT_BIG_FOLLOW_RATIO_THRESHOLD,
        DEFAULT_BIG_USER_RATIO, DEFAULT_BOOST_COEFFICIENT, DEFAULT_DEGREE_FLOOR,
        DEFAULT_HUB_COUNTRY_PROBABILITY, DEFAULT_HUB_GLOBAL_PROBABILITY, DEFAULT_MAX_REPAIR_PASSES,
        DEFAULT_MIN_FOLLOW_CUTOFF, DEFAULT_P_INTER_FACTION, DEFAULT_P_INTRA_FACTION,
        FULLNESS_DAMPING, Modifiers, RepairParams,
    },
    persona::{Persona, PersonaId, PersonaRecord, TagSet},
    registry::{DegreeReport, PersonaRegistry},
    repair::{RepairReport, repair},
    sampler::{SamplingStats, sample},
};
