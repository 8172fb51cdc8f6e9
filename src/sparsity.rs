//! Compressed sparse row structure of the finite element matrix.
use crate::error::DofError;
use crate::graph::DofGraph;
use nalgebra_sparse::pattern::SparsityPattern;
use serde::Serialize;

/// Row-compressed non-zero structure of a square matrix over the (active) DoFs.
///
/// Row `i` lists, in ascending order, all DoFs coupled with DoF `i` through some element of
/// the graph it was built from. When built from the local graph of a process, rows of DoFs
/// untouched by that process are empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sparsity {
    row_offsets: Vec<usize>,
    column_indices: Vec<usize>,
}

impl Sparsity {
    pub fn from_graph(graph: &DofGraph) -> Self {
        let (row_offsets, column_indices) = graph.to_offsets_and_indices();
        Self {
            row_offsets,
            column_indices,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.row_offsets.len() - 1
    }

    pub fn nnz(&self) -> usize {
        self.column_indices.len()
    }

    /// Offsets of the rows into [`Sparsity::column_indices`], with `num_rows + 1` entries.
    pub fn row_offsets(&self) -> &[usize] {
        &self.row_offsets
    }

    pub fn column_indices(&self) -> &[usize] {
        &self.column_indices
    }

    pub fn row(&self, index: usize) -> &[usize] {
        &self.column_indices[self.row_offsets[index]..self.row_offsets[index + 1]]
    }

    pub fn row_lengths(&self) -> Vec<usize> {
        self.row_offsets.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// The largest distance `|i - j|` of a non-zero entry `(i, j)` from the diagonal.
    pub fn bandwidth(&self) -> usize {
        (0..self.num_rows())
            .filter_map(|i| {
                let row = self.row(i);
                let first = row.first()?;
                let last = row.last()?;
                Some(i.saturating_sub(*first).max(last.saturating_sub(i)))
            })
            .max()
            .unwrap_or(0)
    }

    /// Converts the structure to a pattern usable with `nalgebra_sparse` matrices.
    pub fn to_pattern(&self) -> Result<SparsityPattern, DofError> {
        let pattern = SparsityPattern::try_from_offsets_and_indices(
            self.num_rows(),
            self.num_rows(),
            self.row_offsets.clone(),
            self.column_indices.clone(),
        )?;
        Ok(pattern)
    }
}
