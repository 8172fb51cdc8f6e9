//! Basic procedural mesh generation and block partitioning routines.
use crate::connectivity::Quad4d2Connectivity;
use crate::mesh::{QuadMesh, QuadPartition};

/// Generates a structured `nx` by `ny` grid of quadrilaterals.
///
/// Vertex `(i, j)` has index `(nx + 1) * j + i`, with `i` running along the x-axis and `j` along
/// the y-axis. Elements are stored row by row starting at the origin, each with
/// counter-clockwise winding:
///
/// ```text
/// 6 ---- 7 ---- 8
/// |  e2  |  e3  |
/// 3 ---- 4 ---- 5
/// |  e0  |  e1  |
/// 0 ---- 1 ---- 2
/// ```
pub fn create_rectangular_uniform_quad_mesh(nx: usize, ny: usize) -> QuadMesh {
    if nx == 0 || ny == 0 {
        return QuadMesh::from_connectivity(0, Vec::new()).expect("Empty mesh is always valid");
    }

    let to_global_vertex_index = |i, j| (nx + 1) * j + i;

    let mut cells = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            cells.push(Quad4d2Connectivity([
                to_global_vertex_index(i, j),
                to_global_vertex_index(i + 1, j),
                to_global_vertex_index(i + 1, j + 1),
                to_global_vertex_index(i, j + 1),
            ]));
        }
    }

    QuadMesh::from_connectivity((nx + 1) * (ny + 1), cells)
        .expect("Internal error: Structured grid connectivity must be in bounds.")
}

/// Splits `num_processes` into a balanced two-dimensional process grid `[px, py]`.
///
/// The factors are as close to each other as possible, with the larger one first, so that
/// e.g. 4 processes form a 2x2 grid while a prime number of processes forms a single row.
pub fn block_dims(num_processes: usize) -> [usize; 2] {
    let mut py = 1;
    let mut candidate = 1;
    while candidate * candidate <= num_processes {
        if num_processes % candidate == 0 {
            py = candidate;
        }
        candidate += 1;
    }
    [num_processes.max(1) / py, py]
}

/// Assigns every element of a structured `nx` by `ny` grid to a block of a `dims[0]` by `dims[1]`
/// process grid.
///
/// An element belongs to the block whose extent contains its centroid, where the domain is split
/// into equally sized blocks along each axis. Block `(bx, by)` is owned by rank
/// `bx * dims[1] + by`. The result is indexed like the elements of
/// [`create_rectangular_uniform_quad_mesh`].
pub fn cartesian_block_owners(nx: usize, ny: usize, dims: [usize; 2]) -> Vec<usize> {
    assert!(dims[0] > 0 && dims[1] > 0, "Process grid dimensions must be positive.");
    // Centroid of cell i along an axis with n cells lies at (2i + 1) / 2n of the extent
    let block_of = |i: usize, n: usize, d: usize| (((2 * i + 1) * d) / (2 * n)).min(d - 1);

    let mut owners = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            let bx = block_of(i, nx, dims[0]);
            let by = block_of(j, ny, dims[1]);
            owners.push(bx * dims[1] + by);
        }
    }
    owners
}

/// Generates the partition owned by `rank` of a structured grid distributed over `size`
/// processes with [`block_dims`] and [`cartesian_block_owners`].
///
/// Every process generates the (cheap) global structured grid and keeps its own elements,
/// so all processes agree on global vertex and edge indices without communication.
pub fn create_partitioned_rectangular_mesh(nx: usize, ny: usize, rank: usize, size: usize) -> QuadPartition {
    let mesh = create_rectangular_uniform_quad_mesh(nx, ny);
    let owners = cartesian_block_owners(nx, ny, block_dims(size));
    mesh.partition(&owners, rank)
}
