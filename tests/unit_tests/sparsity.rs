use dofgraph::dof::ElementDofConnectivity;
use dofgraph::graph::DofGraph;
use dofgraph::nalgebra_sparse::CsrMatrix;
use dofgraph::proptest::dof_count_and_element_dofs;
use dofgraph::reorder::{renumber, DisconnectedPolicy};
use dofgraph::sparsity::Sparsity;
use nalgebra::DVector;
use proptest::prelude::*;

fn vertex_bubble_element_dofs() -> ElementDofConnectivity {
    ElementDofConnectivity::from_rows(&[
        [0usize, 1, 4, 3, 9],
        [3, 4, 7, 6, 10],
        [1, 2, 5, 4, 11],
        [4, 5, 8, 7, 12],
    ])
}

/// Multiplies the all-ones matrix with the given sparsity by the all-ones vector.
fn ones_product(sparsity: &Sparsity) -> Vec<usize> {
    let pattern = sparsity.to_pattern().unwrap();
    let matrix = CsrMatrix::try_from_pattern_and_values(pattern, vec![1.0; sparsity.nnz()]).unwrap();
    let ones = DVector::repeat(sparsity.num_rows(), 1.0);
    let product = &matrix * &ones;
    product.iter().map(|&x: &f64| x as usize).collect()
}

#[test]
fn vertex_bubble_grid_row_sums() {
    let graph = DofGraph::from_element_dofs(13, &vertex_bubble_element_dofs());
    let sparsity = Sparsity::from_graph(&graph);
    assert_eq!(ones_product(&sparsity), vec![5, 8, 5, 8, 13, 8, 5, 8, 5, 5, 5, 5, 5]);
    assert_eq!(sparsity.row_lengths(), ones_product(&sparsity));
    assert_eq!(sparsity.row(9), &[0, 1, 3, 4, 9]);
}

#[test]
fn renumbering_reduces_bandwidth_of_vertex_bubble_grid() {
    let element_dofs = vertex_bubble_element_dofs();
    let graph = DofGraph::from_element_dofs(13, &element_dofs);
    let dof_map = renumber(&graph, DisconnectedPolicy::Reject).unwrap();
    let renumbered = DofGraph::from_element_dofs(13, &dof_map.apply(&element_dofs));

    let before = Sparsity::from_graph(&graph);
    let after = Sparsity::from_graph(&renumbered);
    assert_eq!(before.bandwidth(), 10);
    assert_eq!(after.bandwidth(), 9);
    assert_eq!(after.nnz(), before.nnz());
}

#[test]
fn empty_sparsity() {
    let sparsity = Sparsity::from_graph(&DofGraph::new(0));
    assert_eq!(sparsity.num_rows(), 0);
    assert_eq!(sparsity.row_offsets(), &[0]);
    assert!(sparsity.column_indices().is_empty());
    assert_eq!(sparsity.to_pattern().unwrap().major_dim(), 0);
}

proptest! {
    #[test]
    fn csr_invariants((num_dofs, element_dofs) in dof_count_and_element_dofs(20)) {
        let graph = DofGraph::from_element_dofs(num_dofs, &element_dofs);
        let sparsity = Sparsity::from_graph(&graph);

        let offsets = sparsity.row_offsets();
        prop_assert_eq!(offsets.len(), num_dofs + 1);
        prop_assert_eq!(offsets[0], 0);
        prop_assert_eq!(offsets[num_dofs], sparsity.column_indices().len());
        prop_assert!(offsets.windows(2).all(|w| w[0] <= w[1]));

        for i in 0..num_dofs {
            let row = sparsity.row(i);
            prop_assert!(row.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(row.to_vec(), graph.neighbors(i).collect::<Vec<_>>());
        }

        // Building twice gives the same structure
        prop_assert_eq!(Sparsity::from_graph(&graph), sparsity.clone());
        prop_assert_eq!(sparsity.to_pattern().unwrap().nnz(), graph.nnz());
    }
}
