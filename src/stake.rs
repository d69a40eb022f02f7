// src/stake.rs

//! # Stages 1 & 2 — Stake Aggregation
//!
//! **Layer:** Graph Theory / Statistical Aggregation
//! **Implements:** SPEC-GRAPH-RANK Section 4.2
//!
//! Computes, for each node, the total authoring stake over its outbound (or
//! inbound) slice. Data-parallel over nodes; each worker iterates a node's
//! slice serially. The same kernel body is invoked twice — once per view —
//! exactly as the source invokes one kernel against two CSR orientations.

use rayon::prelude::*;

/// Computes `total[c] = Σ stake[author[e]]` over each node's edge slice.
///
/// Integer addition in 64 bits; overflow is impossible under the caller's
/// precondition `U · max(stake) < 2⁶⁴` (§4.2).
///
/// # Document IDs
/// Implements: SPEC-GRAPH-RANK Section 4.2, Section 8 (Testable Property 2)
pub fn aggregate_total_stake(
    num_nodes: usize,
    start: &[u64],
    count: &[u32],
    author: &[u64],
    stakes: &[u64],
) -> Vec<u64> {
    (0..num_nodes)
        .into_par_iter()
        .map(|c| {
            let s = start[c] as usize;
            let n = count[c] as usize;
            author[s..s + n]
                .iter()
                .map(|&a| stakes[a as usize])
                .sum::<u64>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_matches_direct_sum() {
        // 3 nodes, edges authored by users with stakes [10, 20, 30].
        let stakes = vec![10u64, 20, 30];
        // node0: authors [0, 1]; node1: authors []; node2: authors [2, 2, 0]
        let author = vec![0u64, 1, 2, 2, 0];
        let count = vec![2u32, 0, 3];
        let start = vec![0u64, 2, 2];

        let total = aggregate_total_stake(3, &start, &count, &author, &stakes);
        assert_eq!(total, vec![30, 0, 30 + 30 + 10]);
    }

    #[test]
    fn test_aggregate_all_dangling() {
        let stakes = vec![5u64];
        let author: Vec<u64> = vec![];
        let count = vec![0u32, 0];
        let start = vec![0u64, 0];
        let total = aggregate_total_stake(2, &start, &count, &author, &stakes);
        assert_eq!(total, vec![0, 0]);
    }

    #[test]
    fn test_aggregate_zero_stake_author_contributes_nothing() {
        let stakes = vec![0u64, 100];
        let author = vec![0u64, 0, 1];
        let count = vec![3u32];
        let start = vec![0u64];
        let total = aggregate_total_stake(1, &start, &count, &author, &stakes);
        assert_eq!(total, vec![100]);
    }
}
