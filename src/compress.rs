// src/compress.rs

//! # Stage 6 — Inbound Compression
//!
//! **Layer:** Graph Theory / Multigraph Simplification
//! **Implements:** SPEC-GRAPH-RANK Section 4.6
//!
//! Coalesces runs of inbound edges sharing the same source into a single
//! `CompressedInLink`, exploiting invariant 3.2 (inbound edges sorted by
//! source within each node's slice). Three passes, matching the source's
//! count/prefix-sum/emit structure: a parallel count pass, a host prefix
//! sum (reusing [`crate::prefix_sum`]), and a parallel emit pass.

use crate::graph::CompressedInLink;
use crate::prefix_sum::exclusive_prefix_sum;
use rayon::prelude::*;

/// Counts, for a single node's sorted inbound slice, how many compressed
/// entries it will emit (one per run of equal `inSource`).
#[inline]
fn count_runs(in_source: &[u64]) -> u32 {
    if in_source.is_empty() {
        return 0;
    }
    let mut runs = 1u32;
    for w in in_source.windows(2) {
        if w[1] != w[0] {
            runs += 1;
        }
    }
    runs
}

/// Pass 1 (Count pass, §4.6 step 1): computes `compCount[c]` for every node.
///
/// # Document IDs
/// Implements: SPEC-GRAPH-RANK Section 4.6 (Count pass)
pub fn count_compressed_entries(
    num_nodes: usize,
    in_start: &[u64],
    in_count: &[u32],
    in_source: &[u64],
) -> Vec<u32> {
    (0..num_nodes)
        .into_par_iter()
        .map(|c| {
            let s = in_start[c] as usize;
            let n = in_count[c] as usize;
            count_runs(&in_source[s..s + n])
        })
        .collect()
}

/// Emits the compressed inbound entries for a single node's sorted slice.
///
/// Each run `[a, b]` of equal `inSource` contributes one entry with
/// aggregated stake `σ = Σ stake[inAuthor[j]]` for `j ∈ [a, b]`, weight
/// `σ / totalOutStake[source]` (§4.6 step 3).
#[inline]
fn emit_runs(
    in_source: &[u64],
    in_author: &[u64],
    stakes: &[u64],
    total_out_stake: &[u64],
) -> Vec<CompressedInLink> {
    let mut out = Vec::with_capacity(in_source.len());
    let mut i = 0usize;
    while i < in_source.len() {
        let source = in_source[i];
        let mut j = i;
        let mut sigma: u64 = 0;
        while j < in_source.len() && in_source[j] == source {
            sigma += stakes[in_author[j] as usize];
            j += 1;
        }
        let denom = total_out_stake[source as usize];
        let weight = if denom > 0 {
            sigma as f64 / denom as f64
        } else {
            0.0
        };
        out.push(CompressedInLink {
            from_index: source as usize,
            weight,
        });
        i = j;
    }
    out
}

/// Result of the full stage-6 compression: the compressed inbound CSR view.
pub struct CompressedInbound {
    pub comp_start: Vec<u64>,
    pub comp_count: Vec<u32>,
    pub compressed_in: Vec<CompressedInLink>,
}

/// Runs the full three-pass compression algorithm (§4.6).
///
/// # Document IDs
/// Implements: SPEC-GRAPH-RANK Section 4.6, Section 8 (Testable Property 3)
pub fn compress_inbound(
    num_nodes: usize,
    in_start: &[u64],
    in_count: &[u32],
    in_source: &[u64],
    in_author: &[u64],
    stakes: &[u64],
    total_out_stake: &[u64],
) -> CompressedInbound {
    // Pass 1: count.
    let comp_count = count_compressed_entries(num_nodes, in_start, in_count, in_source);

    // Pass 2: host prefix sum (stage 0's kernel, reused per §4.6 step 2).
    let (comp_start, total_k) = exclusive_prefix_sum(&comp_count);

    // Pass 3: emit, data-parallel over nodes; each node writes into its own
    // disjoint region of the flattened output.
    let per_node: Vec<Vec<CompressedInLink>> = (0..num_nodes)
        .into_par_iter()
        .map(|c| {
            let s = in_start[c] as usize;
            let n = in_count[c] as usize;
            emit_runs(
                &in_source[s..s + n],
                &in_author[s..s + n],
                stakes,
                total_out_stake,
            )
        })
        .collect();

    let mut compressed_in = Vec::with_capacity(total_k as usize);
    for mut entries in per_node {
        compressed_in.append(&mut entries);
    }

    debug_assert_eq!(compressed_in.len(), total_k as usize);

    CompressedInbound {
        comp_start,
        comp_count,
        compressed_in,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_runs_empty() {
        assert_eq!(count_runs(&[]), 0);
    }

    #[test]
    fn test_count_runs_single_source_collapses() {
        assert_eq!(count_runs(&[3, 3, 3]), 1);
    }

    #[test]
    fn test_count_runs_distinct_sources() {
        assert_eq!(count_runs(&[0, 1, 1, 2, 5, 5, 5]), 4);
    }

    #[test]
    fn test_compress_folds_two_authors_same_source() {
        // S4: two edges 0->1 authored by users 0 and 1, stake [3, 7].
        // Expect compCount[1] = 1, weight = (3+7)/totalOutStake[0] = 1.0.
        let stakes = vec![3u64, 7];
        let in_source = vec![0u64, 0]; // both point at node 1, from node 0.
        let in_author = vec![0u64, 1];
        let in_count = vec![0u32, 2];
        let in_start = vec![0u64, 0];
        let total_out_stake = vec![10u64, 0]; // node 0's total outbound stake = 3 + 7.

        let result = compress_inbound(2, &in_start, &in_count, &in_source, &in_author, &stakes, &total_out_stake);
        assert_eq!(result.comp_count, vec![0, 1]);
        assert_eq!(result.compressed_in.len(), 1);
        assert_eq!(result.compressed_in[0].from_index, 0);
        assert!((result.compressed_in[0].weight - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_compress_faithfulness_invariant() {
        // Node with inbound edges from 3 distinct sources, one repeated.
        let stakes = vec![2u64, 3, 5, 7];
        // Sorted by source: source 0 (authors 0,1), source 2 (author 2), source 3 (author 3)
        let in_source = vec![0u64, 0, 2, 3];
        let in_author = vec![0u64, 1, 2, 3];
        let in_count = vec![4u32, 0, 0, 0];
        let in_start = vec![0u64, 4, 4, 4];
        let total_out_stake = vec![5u64, 0, 10, 7]; // node0 total out = 2+3

        let result = compress_inbound(4, &in_start, &in_count, &in_source, &in_author, &stakes, &total_out_stake);
        assert_eq!(result.compressed_in.len(), 3);

        let raw_sum: u64 = in_author.iter().map(|&a| stakes[a as usize]).sum();
        let reconstructed: f64 = result
            .compressed_in
            .iter()
            .map(|link| link.weight * total_out_stake[link.from_index] as f64)
            .sum();
        assert!((reconstructed - raw_sum as f64).abs() < 1e-9);
    }

    #[test]
    fn test_compress_empty_slice_emits_nothing() {
        let stakes = vec![1u64];
        let in_source: Vec<u64> = vec![];
        let in_author: Vec<u64> = vec![];
        let in_count = vec![0u32];
        let in_start = vec![0u64];
        let total_out_stake = vec![1u64];
        let result = compress_inbound(1, &in_start, &in_count, &in_source, &in_author, &stakes, &total_out_stake);
        assert_eq!(result.comp_count[0], 0);
        assert!(result.compressed_in.is_empty());
    }
}
