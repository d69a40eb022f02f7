// src/light_karma.rs

//! # Stage 8 — Light & Karma
//!
//! **Layer:** Graph Theory / Attribution
//! **Implements:** SPEC-GRAPH-RANK Section 4.8
//!
//! `light[c] = rank[c] * entropy[c]`, data-parallel over nodes. `karma[u]`
//! is a scatter-accumulate over every outbound edge keyed by its author;
//! the source treats this as sequential, so a `deterministic` flag selects
//! between the literal sequential reference path and a parallel
//! partial-sum-merge path (§4.8 supplemented `deterministic` mode).

use rayon::prelude::*;

/// Computes `light[c] = rank[c] * entropy[c]` for every node.
///
/// # Document IDs
/// Implements: SPEC-GRAPH-RANK Section 4.8
pub fn compute_light(rank: &[f64], entropy: &[f64]) -> Vec<f64> {
    rank.par_iter()
        .zip(entropy.par_iter())
        .map(|(&r, &e)| r * e)
        .collect()
}

/// Accumulates `karma[u] = Σ light[c] * w[e]` over every outbound edge `e`
/// authored by `u`, targeting `c`.
///
/// `deterministic = true` reproduces the literal sequential per-edge
/// accumulation of the reference source, exactly in edge-array order.
/// `deterministic = false` accumulates per-worker partial sums over node
/// chunks and merges them in a final sequential reduction, avoiding a
/// single shared atomic per edge while remaining within the tolerance of
/// the sequential result (§8, Testable Property 7).
///
/// # Document IDs
/// Implements: SPEC-GRAPH-RANK Section 4.8
pub fn accumulate_karma(
    num_users: usize,
    num_nodes: usize,
    out_start: &[u64],
    out_count: &[u32],
    out_author: &[u64],
    light: &[f64],
    w: &[f64],
    deterministic: bool,
) -> Vec<f64> {
    if deterministic {
        let mut karma = vec![0.0f64; num_users];
        for c in 0..num_nodes {
            let s = out_start[c] as usize;
            let n = out_count[c] as usize;
            for e in s..s + n {
                karma[out_author[e] as usize] += light[c] * w[e];
            }
        }
        return karma;
    }

    // Each node's outbound slice contributes independently; per-node partial
    // contributions are computed in parallel, then merged sequentially. This
    // keeps the reduction associative without a global atomic per edge.
    let partials: Vec<Vec<f64>> = (0..num_nodes)
        .into_par_iter()
        .map(|c| {
            let mut local = vec![0.0f64; num_users];
            let s = out_start[c] as usize;
            let n = out_count[c] as usize;
            for e in s..s + n {
                local[out_author[e] as usize] += light[c] * w[e];
            }
            local
        })
        .collect();

    let mut karma = vec![0.0f64; num_users];
    for partial in &partials {
        for (u, &v) in partial.iter().enumerate() {
            karma[u] += v;
        }
    }
    karma
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_is_elementwise_product() {
        let rank = vec![0.5, 0.25];
        let entropy = vec![2.0, 4.0];
        let light = compute_light(&rank, &entropy);
        assert!((light[0] - 1.0).abs() < 1e-12);
        assert!((light[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_karma_single_edge_attribution() {
        // S6: single edge 0->1 by user 0.
        let light = vec![2.0, 0.0];
        let w = vec![1.0];
        let out_start = vec![0u64, 1];
        let out_count = vec![1u32, 0];
        let out_author = vec![0u64];
        let karma = accumulate_karma(1, 2, &out_start, &out_count, &out_author, &light, &w, true);
        assert!((karma[0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_karma_conservation_matches_total_light_when_weights_sum_to_one() {
        // Node 0 has two outbound edges to nodes 1 and 2, each with weight
        // summing to 1.0 across the node's outbound slice (oil > 0 by
        // construction), so karma should conserve light[0].
        let light = vec![3.0, 0.0, 0.0];
        let w = vec![0.4, 0.6];
        let out_start = vec![0u64, 2, 2];
        let out_count = vec![2u32, 0, 0];
        let out_author = vec![0u64, 1];
        let karma = accumulate_karma(2, 3, &out_start, &out_count, &out_author, &light, &w, true);
        let total_karma: f64 = karma.iter().sum();
        let total_light: f64 = light.iter().sum();
        assert!((total_karma - total_light).abs() < 1e-9);
    }

    #[test]
    fn test_deterministic_and_parallel_paths_agree() {
        let light = vec![1.0, 2.0, 3.0];
        let w = vec![0.5, 0.5, 1.0, 1.0];
        let out_start = vec![0u64, 2, 3];
        let out_count = vec![2u32, 1, 1];
        let out_author = vec![0u64, 1, 0, 1];
        let seq = accumulate_karma(2, 3, &out_start, &out_count, &out_author, &light, &w, true);
        let par = accumulate_karma(2, 3, &out_start, &out_count, &out_author, &light, &w, false);
        for u in 0..2 {
            assert!((seq[u] - par[u]).abs() < 1e-9);
        }
    }
}
