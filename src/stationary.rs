// src/stationary.rs

//! # Stage 3 — Stationary Weight `S`
//!
//! **Implements:** SPEC-GRAPH-RANK Section 4.3
//!
//! `S[c] = α · totalInStake[c] + (1 − α) · totalOutStake[c]`. Computed as
//! doubles via unsigned-to-double conversion with round-to-nearest, followed
//! by a single fused product-add per term. Data-parallel over nodes, no
//! dependencies between nodes.

use rayon::prelude::*;

/// Computes the per-node stationary weight `S[c]`.
///
/// # Document IDs
/// Implements: SPEC-GRAPH-RANK Section 4.3
pub fn compute_stationary_weight(
    total_in_stake: &[u64],
    total_out_stake: &[u64],
    damping_factor: f64,
) -> Vec<f64> {
    total_in_stake
        .par_iter()
        .zip(total_out_stake.par_iter())
        .map(|(&in_stake, &out_stake)| {
            // Fused product-add per term, matching §4.3's numerical policy.
            damping_factor.mul_add(in_stake as f64, (1.0 - damping_factor) * out_stake as f64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stationary_weight_matches_formula() {
        let total_in = vec![10u64, 0, 5];
        let total_out = vec![2u64, 8, 5];
        let alpha = 0.85;
        let s = compute_stationary_weight(&total_in, &total_out, alpha);
        for i in 0..3 {
            let expected = alpha * total_in[i] as f64 + (1.0 - alpha) * total_out[i] as f64;
            assert!((s[i] - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_stationary_weight_zero_damping_is_pure_outstake() {
        let total_in = vec![100u64];
        let total_out = vec![7u64];
        let s = compute_stationary_weight(&total_in, &total_out, 0.0);
        assert!((s[0] - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_stationary_weight_full_damping_is_pure_instake() {
        let total_in = vec![100u64];
        let total_out = vec![7u64];
        let s = compute_stationary_weight(&total_in, &total_out, 1.0);
        assert!((s[0] - 100.0).abs() < 1e-12);
    }
}
