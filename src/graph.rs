// src/graph.rs

//! # Graph Rank Engine — Data Model & Precondition Validation
//!
//! **Layer:** Graph Theory / Data Model
//! **Implements:** SPEC-GRAPH-RANK Section 3 (Data Model)
//!
//! Defines the caller-facing CSR adjacency (`RawGraph`) and the derived,
//! engine-owned compressed inbound view (`CompressedInLink`). Precondition
//! checks here are the engine's first line of defense: every violation is
//! rejected via `EngineError` before any stage-1 scratch is allocated.

use crate::error::EngineError;

/// Borrowed, caller-owned bipartite "user → link → content" graph, expressed
/// as a dual CSR (outbound-by-source, inbound-by-target).
///
/// # Document IDs
/// Implements: SPEC-GRAPH-RANK Section 3 (Primary entities, Adjacency representation)
pub struct RawGraph<'a> {
    pub num_users: usize,
    pub num_nodes: usize,
    pub num_edges: usize,

    /// `stake[u]`, non-negative integer weight per user.
    pub stakes: &'a [u64],

    /// `outCount[c]`: number of outbound edges per node.
    pub out_count: &'a [u32],
    /// `inCount[c]`: number of inbound edges per node.
    pub in_count: &'a [u32],

    /// `outTarget[e]`: destination node of outbound edge `e`, grouped by source.
    pub out_target: &'a [u64],
    /// `outAuthor[e]`: authoring user of outbound edge `e`, grouped by source.
    pub out_author: &'a [u64],

    /// `inSource[e]`: source node of inbound edge `e`, grouped by target,
    /// sorted ascending within each node's slice (invariant 3.2).
    pub in_source: &'a [u64],
    /// `inAuthor[e]`: authoring user of inbound edge `e`, grouped by target.
    pub in_author: &'a [u64],
}

impl<'a> RawGraph<'a> {
    /// Structural precondition checks that do not depend on the CSR start
    /// offsets (those are computed by stage 0 and checked separately via
    /// [`RawGraph::validate_inbound_sorted`]).
    ///
    /// # Document IDs
    /// Implements: SPEC-GRAPH-RANK Section 3 (Invariants 1, 3), Section 7 (PreconditionViolation)
    pub fn validate_structure(&self) -> Result<(), EngineError> {
        self.check_len("stakes", self.stakes.len(), self.num_users)?;
        self.check_len("outCount", self.out_count.len(), self.num_nodes)?;
        self.check_len("inCount", self.in_count.len(), self.num_nodes)?;
        self.check_len("outTarget", self.out_target.len(), self.num_edges)?;
        self.check_len("outAuthor", self.out_author.len(), self.num_edges)?;
        self.check_len("inSource", self.in_source.len(), self.num_edges)?;
        self.check_len("inAuthor", self.in_author.len(), self.num_edges)?;

        let out_total: u64 = self.out_count.iter().map(|&c| u64::from(c)).sum();
        if out_total != self.num_edges as u64 {
            return Err(EngineError::CsrBoundsViolation {
                node: self.num_nodes,
                start: 0,
                count: out_total as usize,
                total_edges: self.num_edges,
            });
        }
        let in_total: u64 = self.in_count.iter().map(|&c| u64::from(c)).sum();
        if in_total != out_total {
            return Err(EngineError::EdgeCountMismatch {
                outbound: out_total as usize,
                inbound: in_total as usize,
            });
        }

        for (e, &target) in self.out_target.iter().enumerate() {
            if target >= self.num_nodes as u64 {
                return Err(EngineError::IndexOutOfRange {
                    edge: e,
                    field: "outTarget",
                    value: target,
                    domain: self.num_nodes,
                });
            }
        }
        for (e, &author) in self.out_author.iter().enumerate() {
            if author >= self.num_users as u64 {
                return Err(EngineError::IndexOutOfRange {
                    edge: e,
                    field: "outAuthor",
                    value: author,
                    domain: self.num_users,
                });
            }
        }
        for (e, &source) in self.in_source.iter().enumerate() {
            if source >= self.num_nodes as u64 {
                return Err(EngineError::IndexOutOfRange {
                    edge: e,
                    field: "inSource",
                    value: source,
                    domain: self.num_nodes,
                });
            }
        }
        for (e, &author) in self.in_author.iter().enumerate() {
            if author >= self.num_users as u64 {
                return Err(EngineError::IndexOutOfRange {
                    edge: e,
                    field: "inAuthor",
                    value: author,
                    domain: self.num_users,
                });
            }
        }

        Ok(())
    }

    #[inline]
    fn check_len(&self, name: &'static str, actual: usize, expected: usize) -> Result<(), EngineError> {
        if actual != expected {
            return Err(EngineError::ArrayLengthMismatch {
                name,
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Validates invariant 3.2: within every node's inbound slice, `inSource`
    /// is sorted ascending. This is a precondition on the caller (the
    /// compression stage, §4.6, relies on it to fold runs of equal sources).
    ///
    /// # Document IDs
    /// Implements: SPEC-GRAPH-RANK Section 3 (Invariant 2)
    pub fn validate_inbound_sorted(&self, in_start: &[u64]) -> Result<(), EngineError> {
        for c in 0..self.num_nodes {
            let start = in_start[c] as usize;
            let count = self.in_count[c] as usize;
            for j in 1..count {
                if self.in_source[start + j] < self.in_source[start + j - 1] {
                    return Err(EngineError::UnsortedInboundSlice {
                        node: c,
                        position: start + j,
                    });
                }
            }
        }
        Ok(())
    }

    #[inline]
    pub fn out_slice(&self, node: usize, out_start: &[u64]) -> std::ops::Range<usize> {
        let start = out_start[node] as usize;
        start..start + self.out_count[node] as usize
    }

    #[inline]
    pub fn in_slice(&self, node: usize, in_start: &[u64]) -> std::ops::Range<usize> {
        let start = in_start[node] as usize;
        start..start + self.in_count[node] as usize
    }
}

/// One coalesced entry of the compressed inbound view: the aggregated
/// contribution fraction of all raw inbound edges sharing a common source.
///
/// # Document IDs
/// Implements: SPEC-GRAPH-RANK Section 3 (Derived entity — CompressedInLink)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressedInLink {
    /// Source node index contributing this weight.
    pub from_index: usize,
    /// Contribution fraction in `[0, 1]`.
    pub weight: f64,
}
