use dofgraph::comm::SerialComm;
use dofgraph::dof::ElementDofConnectivity;
use dofgraph::graph::DofGraph;
use dofgraph::proptest::dof_count_and_element_dofs;
use proptest::prelude::*;
use util::assert_panics;

/// Vertex and bubble DoFs of a 2x2 grid, without edge DoFs.
fn vertex_bubble_element_dofs() -> ElementDofConnectivity {
    ElementDofConnectivity::from_rows(&[
        [0usize, 1, 4, 3, 9],
        [3, 4, 7, 6, 10],
        [1, 2, 5, 4, 11],
        [4, 5, 8, 7, 12],
    ])
}

#[test]
fn element_cliques_with_diagonal() {
    let graph = DofGraph::from_element_dofs(13, &vertex_bubble_element_dofs());
    assert_eq!(graph.neighbors(0).collect::<Vec<_>>(), vec![0, 1, 3, 4, 9]);
    assert_eq!(graph.neighbors(4).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
    assert_eq!(graph.neighbors(12).collect::<Vec<_>>(), vec![4, 5, 7, 8, 12]);
    assert!(graph.contains(1, 11));
    assert!(!graph.contains(0, 2));

    let degrees: Vec<_> = (0..13).map(|dof| graph.degree(dof)).collect();
    assert_eq!(degrees, vec![5, 8, 5, 8, 13, 8, 5, 8, 5, 5, 5, 5, 5]);
    assert_eq!(graph.connected_components().1, 1);
}

#[test]
fn union_with_serial_comm_is_identity() {
    let graph = DofGraph::from_element_dofs(13, &vertex_bubble_element_dofs());
    assert_eq!(graph.union_all(&SerialComm).unwrap(), graph);
}

#[test]
fn union_of_element_subsets_equals_graph_of_all_elements() {
    let all = vertex_bubble_element_dofs();
    let mut union = DofGraph::new(13);
    for row in all.iter() {
        let single = ElementDofConnectivity::from_rows(&[row]);
        union.union_with(&DofGraph::from_element_dofs(13, &single));
    }
    assert_eq!(union, DofGraph::from_element_dofs(13, &all));
}

#[test]
fn clique_with_out_of_bounds_dof_panics() {
    assert_panics!(DofGraph::new(3).insert_clique(&[0, 3]));
    assert_panics!(DofGraph::from_element_dofs(
        2,
        &ElementDofConnectivity::from_rows(&[[0usize, 2]])
    ));
}

#[test]
fn untouched_dofs_have_empty_adjacency() {
    let element_dofs = ElementDofConnectivity::from_rows(&[[1usize, 2]]);
    let graph = DofGraph::from_element_dofs(4, &element_dofs);
    assert_eq!(graph.degree(0), 0);
    assert_eq!(graph.degree(3), 0);
    assert_eq!(graph.connected_components().1, 3);
}

proptest! {
    #[test]
    fn graph_is_symmetric_with_diagonal((num_dofs, element_dofs) in dof_count_and_element_dofs(20)) {
        let graph = DofGraph::from_element_dofs(num_dofs, &element_dofs);
        prop_assert!(graph.is_symmetric());
        for row in element_dofs.iter() {
            for &i in row {
                prop_assert!(graph.contains(i, i));
                for &j in row {
                    prop_assert!(graph.contains(i, j));
                }
            }
        }

        let (offsets, indices) = graph.to_offsets_and_indices();
        prop_assert_eq!(offsets.len(), num_dofs + 1);
        prop_assert_eq!(offsets[num_dofs], graph.nnz());
        let restored = DofGraph::from_offsets_and_indices(num_dofs, offsets, indices).unwrap();
        prop_assert_eq!(restored, graph);
    }
}
