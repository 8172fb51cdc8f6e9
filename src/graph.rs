//! Symmetric coupling graph between DoFs.
use crate::comm::Collective;
use crate::dof::ElementDofConnectivity;
use crate::error::DofError;
use log::debug;
use nalgebra_sparse::pattern::SparsityPattern;
use std::collections::BTreeSet;
use std::iter::once;

/// Coupling graph over `n` DoFs.
///
/// Two DoFs are adjacent if some element touches both of them. Every DoF touched by an
/// element is adjacent to itself, so the adjacency of a DoF is exactly the column set of its
/// row in the finite element matrix. Adjacency sets are kept sorted.
///
/// A graph built on a single process only covers the elements of that process.
/// Use [`DofGraph::union_all`] to obtain the graph of the whole mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DofGraph {
    adjacency: Vec<BTreeSet<usize>>,
}

impl DofGraph {
    /// A graph over `num_dofs` DoFs without any edges.
    pub fn new(num_dofs: usize) -> Self {
        Self {
            adjacency: vec![BTreeSet::new(); num_dofs],
        }
    }

    /// Couples all DoFs of each element with each other.
    ///
    /// # Panics
    ///
    /// Panics if an element references a DoF outside `0 .. num_dofs`.
    pub fn from_element_dofs(num_dofs: usize, element_dofs: &ElementDofConnectivity) -> Self {
        let mut graph = Self::new(num_dofs);
        for dofs in element_dofs.iter() {
            graph.insert_clique(dofs);
        }
        graph
    }

    /// Couples every pair of the given DoFs, including each DoF with itself.
    pub fn insert_clique(&mut self, dofs: &[usize]) {
        for &i in dofs {
            assert!(i < self.num_dofs(), "DoF index {} out of bounds", i);
            self.adjacency[i].extend(dofs.iter().copied());
        }
    }

    pub fn num_dofs(&self) -> usize {
        self.adjacency.len()
    }

    /// Total number of (directed) couplings, i.e. the number of non-zeros of the matrix.
    pub fn nnz(&self) -> usize {
        self.adjacency.iter().map(BTreeSet::len).sum()
    }

    /// The DoFs coupled with `dof`, in ascending order.
    pub fn neighbors(&self, dof: usize) -> impl DoubleEndedIterator<Item = usize> + '_ {
        self.adjacency[dof].iter().copied()
    }

    pub fn degree(&self, dof: usize) -> usize {
        self.adjacency[dof].len()
    }

    pub fn contains(&self, i: usize, j: usize) -> bool {
        self.adjacency.get(i).map_or(false, |row| row.contains(&j))
    }

    pub fn is_symmetric(&self) -> bool {
        self.adjacency
            .iter()
            .enumerate()
            .all(|(i, row)| row.iter().all(|&j| self.adjacency[j].contains(&i)))
    }

    /// Adds all couplings of `other` to this graph.
    ///
    /// # Panics
    ///
    /// Panics if the graphs are over different numbers of DoFs.
    pub fn union_with(&mut self, other: &DofGraph) {
        assert_eq!(self.num_dofs(), other.num_dofs(), "Graphs must have the same number of DoFs.");
        for (row, other_row) in self.adjacency.iter_mut().zip(&other.adjacency) {
            row.extend(other_row.iter().copied());
        }
    }

    /// Compressed row representation `(offsets, indices)` of the adjacency.
    pub fn to_offsets_and_indices(&self) -> (Vec<usize>, Vec<usize>) {
        let mut offsets = Vec::with_capacity(self.num_dofs() + 1);
        let mut indices = Vec::with_capacity(self.nnz());
        offsets.push(0);
        for row in &self.adjacency {
            indices.extend(row.iter().copied());
            offsets.push(indices.len());
        }
        (offsets, indices)
    }

    /// Reconstructs a graph from its compressed row representation.
    ///
    /// The column indices of each row must be sorted and unique.
    pub fn from_offsets_and_indices(
        num_dofs: usize,
        offsets: Vec<usize>,
        indices: Vec<usize>,
    ) -> Result<Self, DofError> {
        let pattern = SparsityPattern::try_from_offsets_and_indices(num_dofs, num_dofs, offsets, indices)?;
        Ok(Self::from(&pattern))
    }

    /// Builds the union of the graphs of all processes, available on every process.
    ///
    /// Each process contributes its local graph. All graphs must be over the same global DoF
    /// numbering.
    pub fn union_all<C: Collective + ?Sized>(&self, comm: &C) -> Result<DofGraph, DofError> {
        let gathered = comm.all_gather_indices(&self.encode());
        let mut union = DofGraph::new(self.num_dofs());
        for (rank, payload) in gathered.into_iter().enumerate() {
            let remote = Self::decode(rank, self.num_dofs(), payload)?;
            union.union_with(&remote);
        }

        debug!(
            "Rank {} assembled global DoF graph with {} DoFs and {} couplings",
            comm.rank(),
            union.num_dofs(),
            union.nnz()
        );
        Ok(union)
    }

    /// Flattens the graph into `[num_dofs, offsets.., indices..]` for transfer.
    pub(crate) fn encode(&self) -> Vec<usize> {
        let (offsets, indices) = self.to_offsets_and_indices();
        once(self.num_dofs()).chain(offsets).chain(indices).collect()
    }

    /// Inverse of [`DofGraph::encode`] for a payload received from `rank`.
    pub(crate) fn decode(rank: usize, expected: usize, payload: Vec<usize>) -> Result<Self, DofError> {
        let found = payload.first().copied().unwrap_or(0);
        let nnz = payload.get(expected + 1).copied();
        match nnz {
            Some(nnz) if found == expected && payload.len() == expected + 2 + nnz => {
                let offsets = payload[1..expected + 2].to_vec();
                let indices = payload[expected + 2..].to_vec();
                Self::from_offsets_and_indices(expected, offsets, indices)
            }
            _ => Err(DofError::GraphSizeMismatch { rank, expected, found }),
        }
    }

    /// Labels every DoF with the index of its connected component.
    ///
    /// Components are numbered in order of their smallest DoF. Returns the labels and the
    /// number of components.
    pub fn connected_components(&self) -> (Vec<usize>, usize) {
        const UNLABELED: usize = usize::MAX;
        let mut labels = vec![UNLABELED; self.num_dofs()];
        let mut stack = Vec::new();
        let mut count = 0;

        for start in 0..self.num_dofs() {
            if labels[start] != UNLABELED {
                continue;
            }
            labels[start] = count;
            stack.push(start);
            while let Some(dof) = stack.pop() {
                for neighbor in self.neighbors(dof) {
                    if labels[neighbor] == UNLABELED {
                        labels[neighbor] = count;
                        stack.push(neighbor);
                    }
                }
            }
            count += 1;
        }
        (labels, count)
    }
}

impl<'a> From<&'a SparsityPattern> for DofGraph {
    fn from(pattern: &'a SparsityPattern) -> Self {
        let adjacency = (0..pattern.major_dim())
            .map(|i| pattern.lane(i).iter().copied().collect())
            .collect();
        Self { adjacency }
    }
}
