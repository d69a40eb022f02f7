// src/error.rs

//! # Graph Rank Engine — Error Taxonomy
//!
//! **Layer:** API / Error Governance
//! **Status:** Normative — Strict Mathematical Execution Environment
//! **Implements:** SPEC-GRAPH-RANK (Section 7: Error Handling Design)
//!
//! Every fallible boundary in the engine returns one of the three families below.
//! No `unwrap()` or `panic!()` escapes a stage kernel; a violated precondition or
//! a degenerate parameter is always promoted to a typed `EngineError` before any
//! scratch is allocated.

use thiserror::Error;

/// Formal error hierarchy for the graph rank engine.
/// Implements: SPEC-GRAPH-RANK Section 7 (Error Handling Design)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    // ------------------------------------------------------------------
    // PreconditionViolation family
    // ------------------------------------------------------------------
    /// Outbound and inbound CSR views disagree on total edge count.
    #[error("PreconditionViolation: outbound edge count {outbound} != inbound edge count {inbound}")]
    EdgeCountMismatch { outbound: usize, inbound: usize },

    /// `start[c] + count[c] > E` for some node, or `start` is not the exclusive
    /// prefix sum of `count`.
    #[error("PreconditionViolation: CSR bounds violated at node {node}: start={start}, count={count}, total_edges={total_edges}")]
    CsrBoundsViolation {
        node: usize,
        start: usize,
        count: usize,
        total_edges: usize,
    },

    /// An edge's author/source/target index falls outside its declared domain.
    #[error("PreconditionViolation: edge {edge} has out-of-range {field}={value}, domain size={domain}")]
    IndexOutOfRange {
        edge: usize,
        field: &'static str,
        value: u64,
        domain: usize,
    },

    /// A node's inbound slice is not sorted ascending by source, which the
    /// compression stage (§4.6) requires as a precondition.
    #[error("PreconditionViolation: inbound slice of node {node} is not sorted by source at position {position}")]
    UnsortedInboundSlice { node: usize, position: usize },

    /// A caller-supplied array has the wrong length for the declared graph size.
    #[error("PreconditionViolation: array '{name}' has length {actual}, expected {expected}")]
    ArrayLengthMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    // ------------------------------------------------------------------
    // ResourceExhaustion family
    // ------------------------------------------------------------------
    /// The peak scratch size required between stage 6 and stage 7 (§5) exceeds
    /// the configured ceiling, or an actual allocation failed.
    #[error("ResourceExhaustion: required {requested_bytes} scratch bytes exceeds ceiling {limit_bytes}")]
    ScratchBudgetExceeded {
        requested_bytes: u64,
        limit_bytes: u64,
    },

    // ------------------------------------------------------------------
    // NumericalDegeneracy family
    // ------------------------------------------------------------------
    /// `dampingFactor` outside the open interval (0, 1).
    #[error("NumericalDegeneracy: dampingFactor {0} is not in the open interval (0, 1)")]
    InvalidDampingFactor(f64),

    /// `tolerance <= 0`.
    #[error("NumericalDegeneracy: tolerance {0} must be strictly positive")]
    InvalidTolerance(f64),
}

impl EngineError {
    /// `true` for every variant drawn from the PreconditionViolation family.
    #[must_use]
    pub fn is_precondition_violation(&self) -> bool {
        matches!(
            self,
            EngineError::EdgeCountMismatch { .. }
                | EngineError::CsrBoundsViolation { .. }
                | EngineError::IndexOutOfRange { .. }
                | EngineError::UnsortedInboundSlice { .. }
                | EngineError::ArrayLengthMismatch { .. }
        )
    }

    /// `true` for every variant drawn from the ResourceExhaustion family.
    #[must_use]
    pub fn is_resource_exhaustion(&self) -> bool {
        matches!(self, EngineError::ScratchBudgetExceeded { .. })
    }

    /// `true` for every variant drawn from the NumericalDegeneracy family.
    #[must_use]
    pub fn is_numerical_degeneracy(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidDampingFactor(_) | EngineError::InvalidTolerance(_)
        )
    }
}
