//! Global DoF layout and element-to-DoF connectivity.
use crate::basis::BasisOrder;
use crate::comm::Collective;
use crate::error::DofError;
use crate::mesh::{validate_partition, MeshPartition};
use crate::util::prefix_sum;
use itertools::izip;
use log::debug;
use std::ops::Range;

/// Global numbering of the DoFs of a hierarchical quadrilateral basis, in original order.
///
/// DoFs are grouped by the entity they live on:
///
/// ```text
/// [ vertices | edge level 0 | ... | edge level p-2 | bubbles of element 0 | ... ]
///   nV         nE                   nE               (p-1)^2
/// ```
///
/// so the total number of DoFs is `nV + nE (p - 1) + nEl (p - 1)^2`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DofLayout {
    order: BasisOrder,
    num_vertices: usize,
    num_edges: usize,
    num_elements: usize,
}

impl DofLayout {
    pub fn new(order: BasisOrder, num_vertices: usize, num_edges: usize, num_elements: usize) -> Self {
        Self {
            order,
            num_vertices,
            num_edges,
            num_elements,
        }
    }

    /// The layout over the *global* entity counts of a partition.
    pub fn from_partition(order: BasisOrder, partition: &(impl MeshPartition + ?Sized)) -> Self {
        Self::new(
            order,
            partition.global_vertex_count(),
            partition.global_edge_count(),
            partition.global_element_count(),
        )
    }

    pub fn order(&self) -> BasisOrder {
        self.order
    }

    pub fn num_dofs(&self) -> usize {
        self.num_vertices
            + self.num_edges * self.order.dofs_per_edge()
            + self.num_elements * self.order.bubble_dofs_per_element()
    }

    pub fn dofs_per_element(&self) -> usize {
        self.order.dofs_per_element()
    }

    pub fn vertex_dof(&self, vertex: usize) -> usize {
        debug_assert!(vertex < self.num_vertices);
        vertex
    }

    /// The DoF of order level `level` (zero-based, so level 0 belongs to the quadratic
    /// functions) on the given edge.
    pub fn edge_dof(&self, level: usize, edge: usize) -> usize {
        debug_assert!(level < self.order.dofs_per_edge());
        debug_assert!(edge < self.num_edges);
        self.num_vertices + level * self.num_edges + edge
    }

    /// The contiguous range of bubble DoFs of the element with the given *global* index.
    pub fn bubble_dofs(&self, element: usize) -> Range<usize> {
        debug_assert!(element < self.num_elements);
        let per_element = self.order.bubble_dofs_per_element();
        let start = self.num_vertices + self.num_edges * self.order.dofs_per_edge() + element * per_element;
        start..start + per_element
    }
}

/// Computes the global index of the first local element of this process.
///
/// Processes own contiguous ranges of global element indices in rank order, so the offset is
/// the number of elements owned by all lower ranks. Returns the offset together with the total
/// number of elements over all processes.
pub fn element_offset<C: Collective + ?Sized>(comm: &C, local_element_count: usize) -> (usize, usize) {
    let offsets = prefix_sum(comm.all_gather_count(local_element_count));
    let total = offsets.last().copied().unwrap_or(0);
    (offsets[comm.rank()], total)
}

/// Element-to-DoF connectivity of the local elements of a process.
///
/// Every element touches the same number of DoFs, so the rows are stored contiguously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementDofConnectivity {
    dofs_per_element: usize,
    dofs: Vec<usize>,
}

impl ElementDofConnectivity {
    /// Creates the connectivity from a flat array of rows of length `dofs_per_element`.
    ///
    /// # Panics
    ///
    /// Panics if `dofs_per_element` is zero or does not divide the length of `dofs`.
    pub fn from_flat(dofs_per_element: usize, dofs: Vec<usize>) -> Self {
        assert!(dofs_per_element > 0, "Elements must have at least one DoF.");
        assert_eq!(
            dofs.len() % dofs_per_element,
            0,
            "Number of DoFs must be a multiple of the DoFs per element."
        );
        Self { dofs_per_element, dofs }
    }

    /// Creates the connectivity from rows of equal length.
    pub fn from_rows<Row: AsRef<[usize]>>(rows: &[Row]) -> Self {
        let dofs_per_element = rows.first().map(|row| row.as_ref().len()).unwrap_or(1);
        let mut dofs = Vec::with_capacity(rows.len() * dofs_per_element);
        for row in rows {
            assert_eq!(row.as_ref().len(), dofs_per_element, "All rows must have the same length.");
            dofs.extend_from_slice(row.as_ref());
        }
        Self::from_flat(dofs_per_element, dofs)
    }

    pub fn dofs_per_element(&self) -> usize {
        self.dofs_per_element
    }

    pub fn len(&self) -> usize {
        self.dofs.len() / self.dofs_per_element
    }

    pub fn is_empty(&self) -> bool {
        self.dofs.is_empty()
    }

    pub fn get(&self, element: usize) -> Option<&[usize]> {
        let start = element.checked_mul(self.dofs_per_element)?;
        self.dofs.get(start..start + self.dofs_per_element)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[usize]> {
        self.dofs.chunks_exact(self.dofs_per_element)
    }

    pub fn as_flat_slice(&self) -> &[usize] {
        &self.dofs
    }

    /// Returns the connectivity with every DoF index `i` replaced by `f(i)`.
    pub fn map_dofs(&self, f: impl Fn(usize) -> usize) -> Self {
        Self {
            dofs_per_element: self.dofs_per_element,
            dofs: self.dofs.iter().map(|&dof| f(dof)).collect(),
        }
    }
}

/// Assigns original global DoF indices to the local elements of a partition.
///
/// The row of a local element with global index `g` lists, in order:
///
/// 1. the DoFs of its 4 vertices,
/// 2. for each edge level, the DoFs of its 4 edges in local edge order,
/// 3. its `(p - 1)^2` bubble DoFs.
///
/// `element_offset` is the global index of the first local element.
pub fn build_element_dofs(
    layout: &DofLayout,
    partition: &(impl MeshPartition + ?Sized),
    element_offset: usize,
) -> Result<ElementDofConnectivity, DofError> {
    validate_partition(partition)?;
    if element_offset + partition.local_element_count() > partition.global_element_count() {
        return Err(DofError::ElementCountMismatch {
            expected: partition.global_element_count(),
            found: element_offset + partition.local_element_count(),
        });
    }
    let order = layout.order();
    let mut dofs = Vec::with_capacity(partition.local_element_count() * layout.dofs_per_element());

    for (local_index, quad, quad_edges) in izip!(0.., partition.element_vertices(), partition.element_edges()) {
        dofs.extend(quad.iter().map(|&v| layout.vertex_dof(v)));
        for level in 0..order.dofs_per_edge() {
            dofs.extend(quad_edges.iter().map(|&e| layout.edge_dof(level, e)));
        }
        dofs.extend(layout.bubble_dofs(element_offset + local_index));
    }

    debug!(
        "Built element DoFs for {} local elements (order {}, {} global DoFs)",
        partition.local_element_count(),
        order,
        layout.num_dofs()
    );
    Ok(ElementDofConnectivity::from_flat(layout.dofs_per_element(), dofs))
}

/// Determines the element offset of this process and builds the DoF map of its local elements.
///
/// Returns the global layout, the element offset and the local element DoFs.
pub fn build_distributed_element_dofs<C: Collective + ?Sized>(
    comm: &C,
    order: BasisOrder,
    partition: &(impl MeshPartition + ?Sized),
) -> Result<(DofLayout, usize, ElementDofConnectivity), DofError> {
    let (offset, total) = element_offset(comm, partition.local_element_count());
    if total != partition.global_element_count() {
        return Err(DofError::ElementCountMismatch {
            expected: partition.global_element_count(),
            found: total,
        });
    }
    let layout = DofLayout::from_partition(order, partition);
    let element_dofs = build_element_dofs(&layout, partition, offset)?;
    Ok((layout, offset, element_dofs))
}
