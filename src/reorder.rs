//! Bandwidth-reducing renumbering of DoFs.
use crate::dof::ElementDofConnectivity;
use crate::error::DofError;
use crate::graph::DofGraph;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A representation of an index permutation.
///
/// More precisely, given `n` objects stored contiguously, the permutation internally
/// stores a permutation array `perm` such that for *target index* `i` in `0 .. n`,
/// the corresponding *source index* is given by
///
/// ```ignore
/// target[i] = source[perm[i]]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    perm: Vec<usize>,
}

impl Permutation {
    pub fn from_vec(perm: Vec<usize>) -> Result<Self, DofError> {
        let mut visited = vec![false; perm.len()];
        for &index in &perm {
            match visited.get_mut(index) {
                Some(seen) if !*seen => *seen = true,
                _ => return Err(DofError::InvalidPermutation { len: perm.len() }),
            }
        }
        Ok(Self { perm })
    }

    pub fn identity(len: usize) -> Self {
        Self {
            perm: (0..len).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.perm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perm.is_empty()
    }

    pub fn perm(&self) -> &[usize] {
        &self.perm
    }

    pub fn source_index(&self, target_index: usize) -> usize {
        self.perm[target_index]
    }

    pub fn inverse(&self) -> Permutation {
        let mut inverse_perm = vec![usize::MAX; self.len()];
        for (target_idx, &source_idx) in self.perm().iter().enumerate() {
            inverse_perm[source_idx] = target_idx;
        }
        Self { perm: inverse_perm }
    }

    pub fn apply_to_slice<T: Clone>(&self, slice: &[T]) -> Vec<T> {
        assert_eq!(slice.len(), self.len(), "Slice and permutation must have the same size.");
        self.perm()
            .iter()
            .map(|source_idx| slice[*source_idx].clone())
            .collect()
    }
}

/// Bijection from original global DoF indices to active global DoF indices.
///
/// Before renumbering this is the identity. Entry `i` is the active index of original DoF `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DofMap {
    original_to_active: Permutation,
}

impl DofMap {
    pub fn identity(num_dofs: usize) -> Self {
        Self {
            original_to_active: Permutation::identity(num_dofs),
        }
    }

    /// Creates a map from the active index of every original DoF.
    pub fn from_vec(original_to_active: Vec<usize>) -> Result<Self, DofError> {
        Ok(Self {
            original_to_active: Permutation::from_vec(original_to_active)?,
        })
    }

    /// Creates the map which numbers DoFs in the given order.
    ///
    /// `order.source_index(k)` is the original DoF that receives active index `k`.
    pub fn from_order(order: &Permutation) -> Self {
        Self {
            original_to_active: order.inverse(),
        }
    }

    pub fn num_dofs(&self) -> usize {
        self.original_to_active.len()
    }

    pub fn active_index(&self, original: usize) -> usize {
        self.original_to_active.source_index(original)
    }

    pub fn original_index(&self, active: usize) -> usize {
        self.active_order().source_index(active)
    }

    /// The original DoFs listed in active order.
    pub fn active_order(&self) -> Permutation {
        self.original_to_active.inverse()
    }

    pub fn as_slice(&self) -> &[usize] {
        self.original_to_active.perm()
    }

    pub fn is_identity(&self) -> bool {
        self.as_slice().iter().enumerate().all(|(i, &j)| i == j)
    }

    /// Reorders per-DoF values given in original order into active order.
    pub fn permute_to_active<T: Clone>(&self, values: &[T]) -> Vec<T> {
        self.active_order().apply_to_slice(values)
    }

    /// Replaces all original DoF indices of the connectivity with active indices.
    pub fn apply(&self, element_dofs: &ElementDofConnectivity) -> ElementDofConnectivity {
        element_dofs.map_dofs(|dof| self.active_index(dof))
    }
}

/// How renumbering treats a coupling graph with more than one connected component.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisconnectedPolicy {
    /// Components are numbered one after another, each starting from its own seed.
    #[default]
    Consecutive,
    /// Renumbering fails with [`DofError::DisconnectedGraph`].
    Reject,
}

/// Result of a breadth-first traversal of a coupling graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreadthFirstOrder {
    /// `order.source_index(k)` is the `k`-th visited DoF.
    pub order: Permutation,
    /// Number of traversals needed to visit every DoF.
    pub num_components: usize,
}

/// Visits all DoFs of the graph breadth-first.
///
/// Each traversal starts from the unvisited DoF of minimum degree, taking the lowest index
/// among ties, and visits the neighbors of each DoF in ascending index order. Traversals are
/// repeated until every DoF has been visited.
///
/// This is the Cuthill-McKee ordering without sorting neighbors by degree.
pub fn breadth_first_order(graph: &DofGraph) -> BreadthFirstOrder {
    let num_dofs = graph.num_dofs();
    let mut seeds: Vec<_> = (0..num_dofs).collect();
    seeds.sort_by_key(|&dof| (graph.degree(dof), dof));

    let mut queue = VecDeque::new();
    let mut order = Vec::with_capacity(num_dofs);
    let mut visited = vec![false; num_dofs];
    let mut num_components = 0;

    for seed in seeds {
        if visited[seed] {
            continue;
        }
        num_components += 1;
        debug!("Breadth-first traversal from seed DoF {} (degree {})", seed, graph.degree(seed));
        visited[seed] = true;
        queue.push_back(seed);

        while let Some(dof) = queue.pop_front() {
            order.push(dof);
            for neighbor in graph.neighbors(dof) {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    queue.push_back(neighbor);
                }
            }
        }
    }

    assert_eq!(order.len(), num_dofs, "Internal error: Traversal must visit every DoF");
    BreadthFirstOrder {
        order: Permutation { perm: order },
        num_components,
    }
}

/// Computes a bandwidth-reducing DoF map for the given (global) coupling graph.
pub fn renumber(graph: &DofGraph, policy: DisconnectedPolicy) -> Result<DofMap, DofError> {
    let BreadthFirstOrder { order, num_components } = breadth_first_order(graph);
    if num_components > 1 {
        match policy {
            DisconnectedPolicy::Consecutive => warn!(
                "DoF graph has {} connected components, numbering them consecutively",
                num_components
            ),
            DisconnectedPolicy::Reject => {
                return Err(DofError::DisconnectedGraph {
                    components: num_components,
                })
            }
        }
    }
    Ok(DofMap::from_order(&order))
}
