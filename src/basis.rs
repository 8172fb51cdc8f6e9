//! Polynomial order of the hierarchical quadrilateral basis.
use crate::error::DofError;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;

/// Validated polynomial order `p` of a hierarchical tensor-product basis on quadrilaterals.
///
/// The order determines how many DoFs live on each entity of an element:
///
/// - one per vertex,
/// - `p - 1` per edge (one per order level above linear),
/// - `(p - 1)^2` bubble DoFs per element interior.
///
/// Only orders for which shape functions are defined (1, 2 and 3) are accepted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct BasisOrder(usize);

impl BasisOrder {
    pub const MIN: usize = 1;
    pub const MAX: usize = 3;

    pub const LINEAR: BasisOrder = BasisOrder(1);
    pub const QUADRATIC: BasisOrder = BasisOrder(2);
    pub const CUBIC: BasisOrder = BasisOrder(3);

    pub fn new(order: usize) -> Result<Self, DofError> {
        if (Self::MIN..=Self::MAX).contains(&order) {
            Ok(Self(order))
        } else {
            Err(DofError::UnsupportedOrder { order })
        }
    }

    pub fn degree(&self) -> usize {
        self.0
    }

    /// Number of DoFs in the interior of each edge.
    pub fn dofs_per_edge(&self) -> usize {
        self.0 - 1
    }

    /// Number of bubble DoFs in the interior of each element.
    pub fn bubble_dofs_per_element(&self) -> usize {
        (self.0 - 1) * (self.0 - 1)
    }

    /// Total number of DoFs touched by a single quadrilateral element.
    pub fn dofs_per_element(&self) -> usize {
        4 + 4 * self.dofs_per_edge() + self.bubble_dofs_per_element()
    }
}

impl Default for BasisOrder {
    fn default() -> Self {
        Self::LINEAR
    }
}

impl TryFrom<usize> for BasisOrder {
    type Error = DofError;

    fn try_from(order: usize) -> Result<Self, Self::Error> {
        Self::new(order)
    }
}

impl From<BasisOrder> for usize {
    fn from(order: BasisOrder) -> Self {
        order.0
    }
}

impl fmt::Display for BasisOrder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
