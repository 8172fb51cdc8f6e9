//! Global degree-of-freedom numbering for hierarchical quadrilateral finite elements on
//! distributed meshes.
//!
//! Each process owns a partition of the mesh. From its local element connectivity and the
//! global entity counts, a [`DofHandler`] assigns every DoF a global index, builds the
//! DoF coupling graph, optionally renumbers the DoFs breadth-first to reduce the bandwidth of
//! the finite element matrix, and produces the compressed row structure of the matrix.
//! All communication goes through a [`Collective`](comm::Collective).
pub mod basis;
pub mod comm;
pub mod config;
pub mod connectivity;
pub mod dof;
pub mod error;
pub mod graph;
pub mod handler;
pub mod mesh;
pub mod reorder;
pub mod sparsity;
pub mod util;

#[cfg(feature = "proptest-support")]
pub mod proptest;

pub extern crate nalgebra_sparse;

pub use basis::BasisOrder;
pub use error::DofError;
pub use handler::{DofHandler, HandlerState};
