//! Error type shared by all fallible operations of the crate.
use nalgebra_sparse::pattern::SparsityPatternFormatError;
use thiserror::Error;

/// The kind of mesh entity referenced by a connectivity entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EntityKind {
    Vertex,
    Edge,
}

#[derive(Debug, Error)]
pub enum DofError {
    /// The requested polynomial order has no DoF layout.
    #[error("unsupported basis order {order}: supported orders are 1, 2 and 3")]
    UnsupportedOrder { order: usize },
    /// Sparsity was queried before `build_sparsity` was called (or after it was invalidated).
    #[error("sparsity pattern has not been built, call `build_sparsity` first")]
    SparsityNotBuilt,
    /// Renumbering was requested over a coupling graph with several connected components
    /// while the configured policy rejects such graphs.
    #[error("coupling graph is disconnected ({components} connected components)")]
    DisconnectedGraph { components: usize },
    #[error("invalid permutation: every index in 0..{len} must appear exactly once")]
    InvalidPermutation { len: usize },
    #[error("element vertex connectivity has {vertices} entries but edge connectivity has {edges}")]
    ConnectivityLengthMismatch { vertices: usize, edges: usize },
    #[error("{kind:?} index {index} in element {element} is out of bounds (global count is {count})")]
    EntityOutOfBounds {
        kind: EntityKind,
        element: usize,
        index: usize,
        count: usize,
    },
    #[error("processes own {found} elements in total, but the global element count is {expected}")]
    ElementCountMismatch { expected: usize, found: usize },
    #[error("graph received from rank {rank} has {found} DoFs, expected {expected}")]
    GraphSizeMismatch { rank: usize, expected: usize, found: usize },
    #[error("invalid sparsity pattern")]
    InvalidPattern(#[from] SparsityPatternFormatError),
}
