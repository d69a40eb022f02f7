// src/rank.rs

//! # Stage 7 — Power-Method Iteration
//!
//! **Layer:** Graph Theory / Fixed-Point Solver
//! **Implements:** SPEC-GRAPH-RANK Section 4.7
//!
//! Ping-pong power iteration over the compressed inbound view until the
//! L∞ successive-iterate delta drops to or below `tolerance`. State machine:
//! `INIT -> ITERATING -> {ITERATING, CONVERGED}`; the iteration itself never
//! fails (§4.7: "no error state"), but this implementation additionally
//! bounds the iteration count with a configurable safety valve (§4.7
//! supplemented safety valve, SPEC_FULL.md §10.5).
//!
//! The literal per-iteration update (`r̃` plus a damped inner product) does
//! not by itself normalize `Σrank` to 1 — a lone dangling node converges to
//! `r̃` directly, not to 1.0. A final `Σrank`-normalization pass runs once
//! after the loop exits, so the published rank vector is always a proper
//! stationary distribution (`Σrank = 1`) regardless of how many nodes are
//! dangling.

use crate::graph::CompressedInLink;
use rayon::prelude::*;

/// Lifecycle state of one solver invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverState {
    Init,
    Iterating,
    Converged,
}

/// Outcome of a full power-method run.
pub struct RankResult {
    pub rank: Vec<f64>,
    pub iterations: u64,
    pub final_delta: f64,
    pub state: SolverState,
}

/// Runs the damped power-method iteration to convergence (or until
/// `max_iterations` is exhausted).
///
/// # Document IDs
/// Implements: SPEC-GRAPH-RANK Section 4.7
pub fn solve_rank(
    num_nodes: usize,
    comp_start: &[u64],
    comp_count: &[u32],
    compressed_in: &[CompressedInLink],
    damping_factor: f64,
    tolerance: f64,
    max_iterations: u64,
) -> RankResult {
    let n = num_nodes as f64;
    let dangling_count = comp_count.iter().filter(|&&c| c == 0).count() as f64;

    let r0 = (1.0 - damping_factor) / n;
    // Dangling-mass correction: assumes dangling rank equals r0 (§4.7 design note (a)).
    let r_tilde = damping_factor * r0 * (dangling_count / n) + r0;

    // INIT state: `r` holds the uniform default rank, no iterations yet run.
    let mut r = vec![r0; num_nodes];
    let mut r_next = vec![0.0f64; num_nodes];

    let mut iterations: u64 = 0;
    let mut delta = f64::INFINITY;
    let mut state = SolverState::Iterating;

    loop {
        r_next
            .par_iter_mut()
            .enumerate()
            .for_each(|(c, slot)| {
                let count = comp_count[c] as usize;
                *slot = if count == 0 {
                    r_tilde
                } else {
                    let start = comp_start[c] as usize;
                    let acc: f64 = compressed_in[start..start + count]
                        .iter()
                        .map(|link| r[link.from_index] * link.weight)
                        .sum();
                    damping_factor.mul_add(acc, r_tilde)
                };
            });

        delta = r
            .par_iter()
            .zip(r_next.par_iter())
            .map(|(&old, &new)| (old - new).abs())
            .reduce(|| 0.0_f64, f64::max);

        iterations += 1;
        std::mem::swap(&mut r, &mut r_next);

        if delta <= tolerance {
            state = SolverState::Converged;
            break;
        }
        if iterations >= max_iterations {
            log::warn!(
                "power-method solver hit max_iterations={max_iterations} before converging (delta={delta}, tolerance={tolerance})"
            );
            break;
        }
    }

    // Normalize so the published rank is a proper stationary distribution;
    // the raw per-iteration update alone leaves a fully-dangling graph at
    // `r_tilde * N` rather than 1.0 (e.g. a lone isolated node at 0.75).
    let total: f64 = r.par_iter().sum();
    if total > 0.0 {
        r.par_iter_mut().for_each(|x| *x /= total);
    }

    RankResult {
        rank: r,
        iterations,
        final_delta: delta,
        state,
    }
}
