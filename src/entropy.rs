// src/entropy.rs

//! # Stage 4 — Entropy Field
//!
//! **Layer:** Graph Theory / Information Measure
//! **Implements:** SPEC-GRAPH-RANK Section 4.4
//!
//! `entropy[c] = H_out[c] + H_in[c]`, where both sides reuse the same
//! combined normalizer `oil[c] = totalOutStake[c] + totalInStake[c]` —
//! centered on node `c`, not separately normalized per side (§9 open
//! question, replicated verbatim per DESIGN.md).
//!
//! Strictly limits domain execution to `p_i > 0` to resolve the analytical
//! asymptote `lim_{p->0} p log2(p) = 0`, the same L'Hopital guard the
//! reference engine's entropy kernels apply.

use rayon::prelude::*;

/// Computes `-Σ p_i log2(p_i)` over a slice of edge authors, normalized by
/// `oil`. Guards `p_i == 0` (suppresses the `log2(0)` singularity) and
/// `oil == 0` (empty slice, returns 0 by construction).
///
/// # Document IDs
/// Implements: SPEC-GRAPH-RANK Section 4.4 (Edge cases)
#[inline]
fn side_entropy(authors: &[u64], stakes: &[u64], oil: f64) -> f64 {
    if oil <= 0.0 {
        return 0.0;
    }
    authors.iter().fold(0.0, |acc, &author| {
        let p = stakes[author as usize] as f64 / oil;
        if p > 0.0 {
            acc - p * p.log2()
        } else {
            acc
        }
    })
}

/// Computes the published entropy field `entropy[c] = H_out[c] + H_in[c]`
/// over every node, data-parallel over `[0, C)`.
///
/// # Document IDs
/// Implements: SPEC-GRAPH-RANK Section 4.4
#[allow(clippy::too_many_arguments)]
pub fn compute_entropy_field(
    num_nodes: usize,
    out_start: &[u64],
    out_count: &[u32],
    out_author: &[u64],
    in_start: &[u64],
    in_count: &[u32],
    in_author: &[u64],
    total_out_stake: &[u64],
    total_in_stake: &[u64],
    stakes: &[u64],
) -> Vec<f64> {
    (0..num_nodes)
        .into_par_iter()
        .map(|c| {
            let oil = total_out_stake[c] as f64 + total_in_stake[c] as f64;

            let out_s = out_start[c] as usize;
            let out_n = out_count[c] as usize;
            let h_out = side_entropy(&out_author[out_s..out_s + out_n], stakes, oil);

            let in_s = in_start[c] as usize;
            let in_n = in_count[c] as usize;
            let h_in = side_entropy(&in_author[in_s..in_s + in_n], stakes, oil);

            h_out + h_in
        })
        .collect()
}
