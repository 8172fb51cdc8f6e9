//! Quadrilateral meshes and the per-process partitions DoF numbering works on.
use crate::connectivity::{Connectivity, Quad4d2Connectivity, QuadEdgeConnectivity, Segment2d2Connectivity};
use crate::error::{DofError, EntityKind};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

pub mod procedural;

/// The part of a quadrilateral mesh owned by a single process.
///
/// Entities are referenced by their *global* indices, which must be consistent across all
/// processes sharing the mesh. The vertex and edge connectivities are parallel arrays:
/// entry `k` of an element's edge connectivity is the edge joining its local vertices `k` and
/// `(k + 1) % 4`.
pub trait MeshPartition {
    fn element_vertices(&self) -> &[Quad4d2Connectivity];
    fn element_edges(&self) -> &[QuadEdgeConnectivity];

    fn global_vertex_count(&self) -> usize;
    fn global_edge_count(&self) -> usize;
    fn global_element_count(&self) -> usize;

    fn local_element_count(&self) -> usize {
        self.element_vertices().len()
    }
}

/// Checks that the connectivity of a partition is internally consistent and only references
/// entities within the global counts.
pub fn validate_partition(partition: &(impl MeshPartition + ?Sized)) -> Result<(), DofError> {
    let vertices = partition.element_vertices();
    let edges = partition.element_edges();
    if vertices.len() != edges.len() {
        return Err(DofError::ConnectivityLengthMismatch {
            vertices: vertices.len(),
            edges: edges.len(),
        });
    }

    let check = |kind, element, indices: &[usize], count| {
        match indices.iter().find(|&&index| index >= count) {
            Some(&index) => Err(DofError::EntityOutOfBounds {
                kind,
                element,
                index,
                count,
            }),
            None => Ok(()),
        }
    };

    for (element, (quad, quad_edges)) in vertices.iter().zip(edges).enumerate() {
        check(EntityKind::Vertex, element, quad.vertex_indices(), partition.global_vertex_count())?;
        check(EntityKind::Edge, element, quad_edges.edge_indices(), partition.global_edge_count())?;
    }
    Ok(())
}

/// Local element connectivity of one process together with the global entity counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadPartition {
    connectivity: Vec<Quad4d2Connectivity>,
    edge_connectivity: Vec<QuadEdgeConnectivity>,
    global_vertex_count: usize,
    global_edge_count: usize,
    global_element_count: usize,
}

impl QuadPartition {
    /// Construct a partition from local connectivity and global entity counts.
    ///
    /// Returns an error if the connectivity arrays have different lengths or reference
    /// entities outside of the global counts.
    pub fn from_local_parts(
        connectivity: Vec<Quad4d2Connectivity>,
        edge_connectivity: Vec<QuadEdgeConnectivity>,
        global_vertex_count: usize,
        global_edge_count: usize,
        global_element_count: usize,
    ) -> Result<Self, DofError> {
        let partition = Self {
            connectivity,
            edge_connectivity,
            global_vertex_count,
            global_edge_count,
            global_element_count,
        };
        validate_partition(&partition)?;
        Ok(partition)
    }
}

impl MeshPartition for QuadPartition {
    fn element_vertices(&self) -> &[Quad4d2Connectivity] {
        &self.connectivity
    }

    fn element_edges(&self) -> &[QuadEdgeConnectivity] {
        &self.edge_connectivity
    }

    fn global_vertex_count(&self) -> usize {
        self.global_vertex_count
    }

    fn global_edge_count(&self) -> usize {
        self.global_edge_count
    }

    fn global_element_count(&self) -> usize {
        self.global_element_count
    }
}

/// Index-based quadrilateral mesh with globally numbered edges.
///
/// Edges are numbered in order of first appearance: elements are visited in order, and within
/// each element its faces are visited in local edge order. An edge is identified by its
/// unordered vertex pair, so the two elements sharing an edge agree on its index regardless of
/// winding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadMesh {
    num_vertices: usize,
    connectivity: Vec<Quad4d2Connectivity>,
    edge_connectivity: Vec<QuadEdgeConnectivity>,
    edges: Vec<Segment2d2Connectivity>,
}

impl QuadMesh {
    pub fn from_connectivity(num_vertices: usize, connectivity: Vec<Quad4d2Connectivity>) -> Result<Self, DofError> {
        let mut edge_lookup = FxHashMap::default();
        let mut edges = Vec::new();
        let mut edge_connectivity = Vec::with_capacity(connectivity.len());

        for (element, quad) in connectivity.iter().enumerate() {
            if let Some(&index) = quad.iter().find(|&&v| v >= num_vertices) {
                return Err(DofError::EntityOutOfBounds {
                    kind: EntityKind::Vertex,
                    element,
                    index,
                    count: num_vertices,
                });
            }

            let mut quad_edges = QuadEdgeConnectivity([0; 4]);
            for k in 0..quad.num_faces() {
                let segment = quad
                    .get_face_connectivity(k)
                    .expect("Since index is in bounds, connectivity must exist.");
                let next_index = edges.len();
                let edge_index = *edge_lookup.entry(segment.sorted()).or_insert(next_index);
                if edge_index == next_index {
                    edges.push(segment);
                }
                quad_edges[k] = edge_index;
            }
            edge_connectivity.push(quad_edges);
        }

        Ok(Self {
            num_vertices,
            connectivity,
            edge_connectivity,
            edges,
        })
    }

    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn num_elements(&self) -> usize {
        self.connectivity.len()
    }

    pub fn connectivity(&self) -> &[Quad4d2Connectivity] {
        &self.connectivity
    }

    pub fn edge_connectivity(&self) -> &[QuadEdgeConnectivity] {
        &self.edge_connectivity
    }

    /// The edges of the mesh, as oriented by the element that first referenced them.
    pub fn edges(&self) -> &[Segment2d2Connectivity] {
        &self.edges
    }

    /// Extracts the partition of the elements owned by `rank`.
    ///
    /// `owners[i]` is the rank owning element `i`. The owned elements keep their relative
    /// global order.
    ///
    /// # Panics
    ///
    /// Panics if `owners` does not have one entry per element.
    pub fn partition(&self, owners: &[usize], rank: usize) -> QuadPartition {
        assert_eq!(
            owners.len(),
            self.num_elements(),
            "Owner array must have one entry per element."
        );
        let (connectivity, edge_connectivity): (Vec<_>, Vec<_>) = owners
            .iter()
            .zip(self.connectivity.iter().zip(&self.edge_connectivity))
            .filter(|(owner, _)| **owner == rank)
            .map(|(_, (quad, quad_edges))| (*quad, *quad_edges))
            .unzip();

        QuadPartition {
            connectivity,
            edge_connectivity,
            global_vertex_count: self.num_vertices(),
            global_edge_count: self.num_edges(),
            global_element_count: self.num_elements(),
        }
    }

    /// The whole mesh as the partition of a single process.
    pub fn to_partition(&self) -> QuadPartition {
        self.partition(&vec![0; self.num_elements()], 0)
    }
}
