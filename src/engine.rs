// src/engine.rs

//! # Graph Rank Engine — Orchestration
//!
//! **Layer:** Graph Theory / Pipeline Orchestration
//! **Implements:** SPEC-GRAPH-RANK Section 4 (Pipeline), Section 10.1
//!
//! Sequences the nine pipeline stages end to end: prefix sum, stake
//! aggregation (both views), stationary weight, entropy field, edge weight,
//! inbound compression, power-method rank, light and karma. Every
//! precondition in Section 3 and Section 7 is checked up front, before any
//! stage-1 scratch is allocated, mirroring the reference engine's
//! validate-then-allocate discipline.

use crate::compress::compress_inbound;
use crate::config::EngineConfig;
use crate::edge_weight::compute_edge_weights;
use crate::entropy::compute_entropy_field;
use crate::error::EngineError;
use crate::graph::RawGraph;
use crate::light_karma::{accumulate_karma, compute_light};
use crate::prefix_sum::exclusive_prefix_sum;
use crate::rank::{solve_rank, SolverState};
use crate::stake::aggregate_total_stake;
use crate::stationary::compute_stationary_weight;

/// Diagnostics returned alongside the four output arrays, exposing the
/// solver's internal state without requiring the caller to re-derive it.
///
/// # Document IDs
/// Implements: SPEC-GRAPH-RANK Section 10.5 (Diagnostics)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceReport {
    pub iterations: u64,
    pub final_delta: f64,
    pub converged: bool,
    pub dangling_count: usize,
}

/// The four published output arrays of one full pipeline run.
pub struct RankOutput {
    pub rank: Vec<f64>,
    pub entropy: Vec<f64>,
    pub light: Vec<f64>,
    pub karma: Vec<f64>,
    pub report: ConvergenceReport,
}

/// Orchestrates the nine-stage pipeline for one invocation. Owns the
/// [`EngineConfig`] tunables (`max_iterations`, `max_scratch_bytes`) that
/// are not part of a single call's mathematical input.
///
/// # Document IDs
/// Implements: SPEC-GRAPH-RANK Section 10.1 (Orchestration)
pub struct GraphRankEngine {
    config: EngineConfig,
}

impl GraphRankEngine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Runs all nine pipeline stages over a [`RawGraph`] and returns the
    /// published output arrays plus a [`ConvergenceReport`].
    ///
    /// Validates every structural precondition (Section 3 invariants, Section 7
    /// `PreconditionViolation`/`NumericalDegeneracy` families) before allocating
    /// any stage-1 scratch; a `ScratchBudgetExceeded` check runs against the
    /// configured ceiling immediately after, ahead of the first allocation.
    ///
    /// # Document IDs
    /// Implements: SPEC-GRAPH-RANK Section 4 (full pipeline), Section 5 (Memory
    /// & Scratch Budget), Section 7 (Error Handling Design)
    pub fn run(
        &self,
        graph: &RawGraph<'_>,
        damping_factor: f64,
        tolerance: f64,
        deterministic_karma: bool,
    ) -> Result<RankOutput, EngineError> {
        run_pipeline(graph, damping_factor, tolerance, deterministic_karma, &self.config)
    }
}

/// Runs all nine pipeline stages over a [`RawGraph`] and returns the
/// published output arrays plus a [`ConvergenceReport`]. Free-function form
/// of [`GraphRankEngine::run`], for callers that do not need to reuse a
/// config across invocations.
///
/// # Document IDs
/// Implements: SPEC-GRAPH-RANK Section 4 (full pipeline), Section 5 (Memory
/// & Scratch Budget), Section 7 (Error Handling Design)
#[allow(clippy::too_many_arguments)]
pub fn run_pipeline(
    graph: &RawGraph<'_>,
    damping_factor: f64,
    tolerance: f64,
    deterministic_karma: bool,
    config: &EngineConfig,
) -> Result<RankOutput, EngineError> {
    log::debug!(
        "pipeline start: num_users={} num_nodes={} num_edges={}",
        graph.num_users,
        graph.num_nodes,
        graph.num_edges
    );

    if !(damping_factor > 0.0 && damping_factor < 1.0) {
        return Err(EngineError::InvalidDampingFactor(damping_factor));
    }
    if !(tolerance > 0.0) {
        return Err(EngineError::InvalidTolerance(tolerance));
    }

    graph.validate_structure()?;

    // Stage 0: prefix sums for both CSR views (host-driven, serial by design).
    let (out_start, out_total) = exclusive_prefix_sum(graph.out_count);
    let (in_start, in_total) = exclusive_prefix_sum(graph.in_count);
    debug_assert_eq!(out_total, graph.num_edges as u64);
    debug_assert_eq!(in_total, graph.num_edges as u64);

    graph.validate_inbound_sorted(&in_start)?;

    // Section 5 peak scratch estimate: the compressed inbound view can be as
    // large as the raw inbound view (worst case, no source repeats), plus the
    // four f64 output arrays and the two rank ping-pong buffers.
    let peak_scratch_bytes = estimate_peak_scratch_bytes(graph.num_nodes, graph.num_edges);
    if peak_scratch_bytes > config.max_scratch_bytes {
        return Err(EngineError::ScratchBudgetExceeded {
            requested_bytes: peak_scratch_bytes,
            limit_bytes: config.max_scratch_bytes,
        });
    }

    log::debug!("stage 1/2: aggregating stake over outbound and inbound views");
    let total_out_stake = aggregate_total_stake(
        graph.num_nodes,
        &out_start,
        graph.out_count,
        graph.out_author,
        graph.stakes,
    );
    let total_in_stake = aggregate_total_stake(
        graph.num_nodes,
        &in_start,
        graph.in_count,
        graph.in_author,
        graph.stakes,
    );

    log::debug!("stage 3: computing stationary weight");
    let _stationary_weight =
        compute_stationary_weight(&total_in_stake, &total_out_stake, damping_factor);

    log::debug!("stage 4: computing entropy field");
    let entropy = compute_entropy_field(
        graph.num_nodes,
        &out_start,
        graph.out_count,
        graph.out_author,
        &in_start,
        graph.in_count,
        graph.in_author,
        &total_out_stake,
        &total_in_stake,
        graph.stakes,
    );

    log::debug!("stage 5: computing local cyberlink edge weights");
    let w = compute_edge_weights(
        graph.num_nodes,
        &out_start,
        graph.out_count,
        graph.out_author,
        &total_out_stake,
        &total_in_stake,
        graph.stakes,
        graph.num_edges,
    );

    log::debug!("stage 6: compressing inbound multigraph");
    let compressed = compress_inbound(
        graph.num_nodes,
        &in_start,
        graph.in_count,
        graph.in_source,
        graph.in_author,
        graph.stakes,
        &total_out_stake,
    );

    log::debug!("stage 7: solving power-method rank iteration");
    let rank_result = solve_rank(
        graph.num_nodes,
        &compressed.comp_start,
        &compressed.comp_count,
        &compressed.compressed_in,
        damping_factor,
        tolerance,
        config.max_iterations,
    );
    if rank_result.state != SolverState::Converged {
        log::warn!(
            "pipeline completed without full convergence: iterations={}, final_delta={}",
            rank_result.iterations,
            rank_result.final_delta
        );
    }

    log::debug!("stage 8: computing light and karma");
    let light = compute_light(&rank_result.rank, &entropy);
    let karma = accumulate_karma(
        graph.num_users,
        graph.num_nodes,
        &out_start,
        graph.out_count,
        graph.out_author,
        &light,
        &w,
        deterministic_karma,
    );

    let dangling_count = compressed.comp_count.iter().filter(|&&c| c == 0).count();

    log::info!(
        "pipeline finished: iterations={}, converged={}, final_delta={}",
        rank_result.iterations,
        rank_result.state == SolverState::Converged,
        rank_result.final_delta
    );

    Ok(RankOutput {
        rank: rank_result.rank,
        entropy,
        light,
        karma,
        report: ConvergenceReport {
            iterations: rank_result.iterations,
            final_delta: rank_result.final_delta,
            converged: rank_result.state == SolverState::Converged,
            dangling_count,
        },
    })
}

/// Rough upper bound on peak scratch bytes required between stage 6 and
/// stage 7 (§5): the compressed inbound view (worst case as large as the raw
/// inbound view) plus the output arrays and the rank ping-pong buffers.
fn estimate_peak_scratch_bytes(num_nodes: usize, num_edges: usize) -> u64 {
    let compressed_in_bytes = num_edges as u64 * 16; // CompressedInLink: usize + f64
    let f64_arrays_bytes = num_nodes as u64 * 8 * 6; // entropy, light, karma(~), rank x2 ping-pong, stationary
    let edge_weight_bytes = num_edges as u64 * 8;
    compressed_in_bytes + f64_arrays_bytes + edge_weight_bytes
}
