// src/edge_weight.rs

//! # Stage 5 — Local Cyberlink Weight `w`
//!
//! **Implements:** SPEC-GRAPH-RANK Section 4.5
//!
//! `w[e] = stake[outAuthor[e]] / (totalOutStake[c] + totalInStake[c])` for
//! every outbound edge `e` of node `c`. These values feed only the karma
//! stage (§4.8); they are not reused as rank-solver transition probabilities.

use rayon::prelude::*;

/// Computes the local edge weight for every outbound edge.
///
/// # Document IDs
/// Implements: SPEC-GRAPH-RANK Section 4.5
pub fn compute_edge_weights(
    num_nodes: usize,
    out_start: &[u64],
    out_count: &[u32],
    out_author: &[u64],
    total_out_stake: &[u64],
    total_in_stake: &[u64],
    stakes: &[u64],
    num_edges: usize,
) -> Vec<f64> {
    // outTarget/outAuthor are grouped by source (CSR convention), so
    // flattening per-node weight vectors in node order reproduces exact edge
    // order without needing an edge->node lookup.
    let w: Vec<f64> = (0..num_nodes)
        .into_par_iter()
        .flat_map_iter(|c| {
            let s = out_start[c] as usize;
            let n = out_count[c] as usize;
            let oil = total_out_stake[c] as f64 + total_in_stake[c] as f64;
            (s..s + n).map(move |e| {
                if oil > 0.0 {
                    stakes[out_author[e] as usize] as f64 / oil
                } else {
                    0.0
                }
            })
        })
        .collect();

    debug_assert_eq!(w.len(), num_edges);
    w
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_weight_basic() {
        let stakes = vec![10u64, 30];
        let out_author = vec![0u64, 1];
        let out_start = vec![0u64];
        let out_count = vec![2u32];
        let total_out = vec![40u64];
        let total_in = vec![0u64];

        let w = compute_edge_weights(1, &out_start, &out_count, &out_author, &total_out, &total_in, &stakes, 2);
        assert!((w[0] - 0.25).abs() < 1e-12);
        assert!((w[1] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_edge_weight_isolated_denominator_is_zero() {
        let stakes = vec![10u64];
        let out_author = vec![0u64];
        let out_start = vec![0u64];
        let out_count = vec![1u32];
        let total_out = vec![0u64];
        let total_in = vec![0u64];
        let w = compute_edge_weights(1, &out_start, &out_count, &out_author, &total_out, &total_in, &stakes, 1);
        assert_eq!(w[0], 0.0);
    }
}
