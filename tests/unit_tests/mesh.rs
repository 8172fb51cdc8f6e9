use dofgraph::connectivity::{Quad4d2Connectivity, QuadEdgeConnectivity, Segment2d2Connectivity};
use dofgraph::error::{DofError, EntityKind};
use dofgraph::mesh::procedural::create_rectangular_uniform_quad_mesh;
use dofgraph::mesh::{MeshPartition, QuadMesh, QuadPartition};
use dofgraph::proptest::rectangular_quad_mesh;
use itertools::Itertools;
use proptest::prelude::*;


#[test]
fn two_by_two_grid_edges_follow_first_appearance() {
    let mesh = create_rectangular_uniform_quad_mesh(2, 2);
    assert_eq!(mesh.num_vertices(), 9);
    assert_eq!(mesh.num_edges(), 12);
    assert_eq!(
        mesh.edge_connectivity(),
        &[
            QuadEdgeConnectivity([0, 1, 2, 3]),
            QuadEdgeConnectivity([4, 5, 6, 1]),
            QuadEdgeConnectivity([2, 7, 8, 9]),
            QuadEdgeConnectivity([6, 10, 11, 7]),
        ]
    );
    // Edges keep the orientation of the element that introduced them
    assert_eq!(mesh.edges()[2], Segment2d2Connectivity([4, 3]));
}

#[test]
fn partition_keeps_global_counts_and_element_order() {
    let mesh = create_rectangular_uniform_quad_mesh(2, 2);
    let partition = mesh.partition(&[1, 0, 1, 0], 1);
    assert_eq!(partition.local_element_count(), 2);
    assert_eq!(
        partition.element_vertices(),
        &[Quad4d2Connectivity([0, 1, 4, 3]), Quad4d2Connectivity([3, 4, 7, 6])]
    );
    assert_eq!(
        partition.element_edges(),
        &[QuadEdgeConnectivity([0, 1, 2, 3]), QuadEdgeConnectivity([2, 7, 8, 9])]
    );
    assert_eq!(partition.global_vertex_count(), 9);
    assert_eq!(partition.global_edge_count(), 12);
    assert_eq!(partition.global_element_count(), 4);

    let empty = mesh.partition(&[1, 0, 1, 0], 2);
    assert_eq!(empty.local_element_count(), 0);
    assert_eq!(empty.global_element_count(), 4);
}

#[test]
fn partition_rejects_out_of_bounds_edges() {
    let result = QuadPartition::from_local_parts(
        vec![Quad4d2Connectivity([0, 1, 3, 2])],
        vec![QuadEdgeConnectivity([0, 1, 2, 4])],
        4,
        4,
        1,
    );
    assert!(matches!(
        result,
        Err(DofError::EntityOutOfBounds {
            kind: EntityKind::Edge,
            element: 0,
            index: 4,
            count: 4
        })
    ));
}

#[test]
fn disconnected_quads_share_no_edges() {
    let mesh = QuadMesh::from_connectivity(
        8,
        vec![Quad4d2Connectivity([0, 1, 2, 3]), Quad4d2Connectivity([4, 5, 6, 7])],
    )
    .unwrap();
    assert_eq!(mesh.num_edges(), 8);
    assert_eq!(mesh.edge_connectivity()[1], QuadEdgeConnectivity([4, 5, 6, 7]));
}

proptest! {
    #[test]
    fn structured_grid_edge_count(mesh in rectangular_quad_mesh(6)) {
        // Every element has four distinct edges, and every edge joins the two vertices it
        // was created from
        for (quad, quad_edges) in mesh.connectivity().iter().zip(mesh.edge_connectivity()) {
            prop_assert_eq!(quad_edges.iter().unique().count(), 4);
            for k in 0..4 {
                let edge = mesh.edges()[quad_edges[k]].sorted();
                let mut expected = [quad[k], quad[(k + 1) % 4]];
                expected.sort_unstable();
                prop_assert_eq!(edge, expected);
            }
        }

        // Euler's formula for a planar, simply connected quad mesh: V - E + F = 1
        prop_assert_eq!(mesh.num_vertices() + mesh.num_elements(), mesh.num_edges() + 1);
    }
}
