//! Strategies for property-based testing of DoF numbering.
use crate::basis::BasisOrder;
use crate::dof::ElementDofConnectivity;
use crate::mesh::procedural::create_rectangular_uniform_quad_mesh;
use crate::mesh::QuadMesh;
use ::proptest::collection::vec;
use ::proptest::prelude::*;

pub fn basis_order() -> impl Strategy<Value = BasisOrder> {
    (BasisOrder::MIN..=BasisOrder::MAX).prop_map(|p| BasisOrder::new(p).expect("Order is in supported range"))
}

/// Dimensions `(nx, ny)` of a structured grid with between 1 and `max_cells` cells per axis.
pub fn grid_dims(max_cells: usize) -> impl Strategy<Value = (usize, usize)> {
    let max_cells = max_cells.max(1);
    (1..=max_cells, 1..=max_cells)
}

pub fn rectangular_quad_mesh(max_cells: usize) -> impl Strategy<Value = QuadMesh> {
    grid_dims(max_cells).prop_map(|(nx, ny)| create_rectangular_uniform_quad_mesh(nx, ny))
}

/// A structured grid together with a number of processes to distribute it over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionedGridParams {
    pub nx: usize,
    pub ny: usize,
    pub num_ranks: usize,
}

pub fn partitioned_grid(max_cells: usize, max_ranks: usize) -> impl Strategy<Value = PartitionedGridParams> {
    (grid_dims(max_cells), 1..=max_ranks.max(1)).prop_map(|((nx, ny), num_ranks)| PartitionedGridParams {
        nx,
        ny,
        num_ranks,
    })
}

/// Arbitrary element DoF connectivity over `0 .. num_dofs` with `dofs_per_element` DoFs per
/// element. DoFs may repeat within an element.
pub fn element_dofs(
    num_dofs: usize,
    dofs_per_element: usize,
    max_elements: usize,
) -> impl Strategy<Value = ElementDofConnectivity> {
    assert!(num_dofs > 0 && dofs_per_element > 0);
    vec(vec(0..num_dofs, dofs_per_element), 0..=max_elements).prop_map(move |rows| {
        let flat = rows.into_iter().flatten().collect();
        ElementDofConnectivity::from_flat(dofs_per_element, flat)
    })
}

/// A number of DoFs together with arbitrary element DoF connectivity over them.
pub fn dof_count_and_element_dofs(max_dofs: usize) -> impl Strategy<Value = (usize, ElementDofConnectivity)> {
    (1..=max_dofs.max(1), 1..=4usize)
        .prop_flat_map(|(num_dofs, dofs_per_element)| (Just(num_dofs), element_dofs(num_dofs, dofs_per_element, 12)))
}
