use dofgraph::comm::SerialComm;
use dofgraph::dof::{
    build_distributed_element_dofs, build_element_dofs, element_offset, DofLayout, ElementDofConnectivity,
};
use dofgraph::error::DofError;
use dofgraph::mesh::procedural::create_rectangular_uniform_quad_mesh;
use dofgraph::mesh::MeshPartition;
use dofgraph::proptest::{basis_order, rectangular_quad_mesh};
use dofgraph::BasisOrder;
use proptest::prelude::*;
use util::assert_panics;

#[test]
fn quadratic_two_by_two_grid_element_dofs() {
    let mesh = create_rectangular_uniform_quad_mesh(2, 2);
    let (layout, offset, element_dofs) =
        build_distributed_element_dofs(&SerialComm, BasisOrder::QUADRATIC, &mesh.to_partition()).unwrap();

    assert_eq!(layout.num_dofs(), 25);
    assert_eq!(offset, 0);
    let rows: Vec<_> = element_dofs.iter().map(<[usize]>::to_vec).collect();
    assert_eq!(
        rows,
        vec![
            vec![0, 1, 4, 3, 9, 10, 11, 12, 21],
            vec![1, 2, 5, 4, 13, 14, 15, 10, 22],
            vec![3, 4, 7, 6, 11, 16, 17, 18, 23],
            vec![4, 5, 8, 7, 15, 19, 20, 16, 24],
        ]
    );
}

#[test]
fn linear_order_only_has_vertex_dofs() {
    let mesh = create_rectangular_uniform_quad_mesh(3, 2);
    let layout = DofLayout::from_partition(BasisOrder::LINEAR, &mesh.to_partition());
    assert_eq!(layout.num_dofs(), mesh.num_vertices());

    let element_dofs = build_element_dofs(&layout, &mesh.to_partition(), 0).unwrap();
    for (row, quad) in element_dofs.iter().zip(mesh.connectivity()) {
        assert_eq!(row, &quad.0[..]);
    }
}

#[test]
fn cubic_edge_dofs_are_grouped_by_level() {
    let mesh = create_rectangular_uniform_quad_mesh(2, 1);
    let layout = DofLayout::from_partition(BasisOrder::CUBIC, &mesh.to_partition());
    // 6 vertices, 7 edges with 2 DoFs each, 2 elements with 4 bubbles each
    assert_eq!(layout.num_dofs(), 6 + 14 + 8);
    assert_eq!(layout.edge_dof(1, 4), 6 + 7 + 4);
    assert_eq!(layout.bubble_dofs(1), 24..28);

    let element_dofs = build_element_dofs(&layout, &mesh.to_partition(), 0).unwrap();
    assert_eq!(
        element_dofs.get(1).unwrap(),
        &[1, 2, 5, 4, 10, 11, 12, 7, 17, 18, 19, 14, 24, 25, 26, 27]
    );
}

#[test]
fn single_element_offsets() {
    let mesh = create_rectangular_uniform_quad_mesh(1, 1);
    let offsets: Vec<_> = [1, 2, 3]
        .iter()
        .map(|&p| DofLayout::from_partition(BasisOrder::new(p).unwrap(), &mesh.to_partition()).num_dofs())
        .collect();
    assert_eq!(offsets, vec![4, 9, 16]);

    assert_eq!(element_offset(&SerialComm, 1), (0, 1));
}

#[test]
fn element_count_mismatch_is_detected() {
    let mesh = create_rectangular_uniform_quad_mesh(2, 1);
    // Only one of the two elements is owned by the single process
    let partition = mesh.partition(&[0, 1], 0);
    let result = build_distributed_element_dofs(&SerialComm, BasisOrder::LINEAR, &partition);
    assert!(matches!(
        result,
        Err(DofError::ElementCountMismatch { expected: 2, found: 1 })
    ));

    let layout = DofLayout::from_partition(BasisOrder::QUADRATIC, &partition);
    assert!(matches!(
        build_element_dofs(&layout, &partition, 2),
        Err(DofError::ElementCountMismatch { expected: 2, found: 3 })
    ));
}

#[test]
fn unsupported_order_is_rejected() {
    assert!(matches!(BasisOrder::new(0), Err(DofError::UnsupportedOrder { order: 0 })));
    assert!(matches!(BasisOrder::new(4), Err(DofError::UnsupportedOrder { order: 4 })));
}

#[test]
fn element_dof_rows_must_have_equal_length() {
    assert_panics!(ElementDofConnectivity::from_flat(3, vec![0, 1, 2, 3]));
    assert_panics!(ElementDofConnectivity::from_flat(0, vec![]));
    assert_panics!(ElementDofConnectivity::from_rows(&[vec![0usize, 1], vec![2]]));
    assert_eq!(ElementDofConnectivity::from_flat(2, vec![0, 1, 2, 3]).len(), 2);
}

proptest! {
    #[test]
    fn element_dofs_cover_all_dofs(mesh in rectangular_quad_mesh(5), order in basis_order()) {
        let partition = mesh.to_partition();
        let layout = DofLayout::from_partition(order, &partition);
        let element_dofs = build_element_dofs(&layout, &partition, 0).unwrap();

        prop_assert_eq!(element_dofs.len(), partition.local_element_count());
        prop_assert_eq!(element_dofs.dofs_per_element(), order.dofs_per_element());

        let mut touched = vec![false; layout.num_dofs()];
        for row in element_dofs.iter() {
            for &dof in row {
                prop_assert!(dof < layout.num_dofs());
                touched[dof] = true;
            }
            // Element DoFs are pairwise distinct
            let mut sorted = row.to_vec();
            sorted.sort_unstable();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), row.len());
        }
        prop_assert!(touched.iter().all(|&t| t));
    }
}
