// src/prefix_sum.rs

//! # Stage 0 — Host-Driven Prefix Sum
//!
//! **Layer:** Graph Theory / CSR Construction
//! **Implements:** SPEC-GRAPH-RANK Section 4.1
//!
//! Serial by design: the sequential dependence between successive prefix sums
//! does not amortize on a data-parallel backend for `C` in the typical range,
//! so this stage runs on the host control thread rather than as a kernel.

/// Computes the exclusive prefix sum of `count[0..C)`, returning `(start, total)`.
///
/// `start[0] = 0`, `start[c] = start[c-1] + count[c-1]`. Accumulation is in
/// 64 bits; the caller guarantees the total fits (§4.1 overflow policy).
///
/// # Document IDs
/// Implements: SPEC-GRAPH-RANK Section 4.1, Section 8 (Testable Property 1)
pub fn exclusive_prefix_sum(count: &[u32]) -> (Vec<u64>, u64) {
    let mut start = Vec::with_capacity(count.len());
    let mut running: u64 = 0;
    for &c in count {
        start.push(running);
        running += u64::from(c);
    }
    (start, running)
}
