//! Ties DoF numbering, coupling graph, renumbering and sparsity together per process.
use crate::basis::BasisOrder;
use crate::comm::Collective;
use crate::config::DofHandlerConfig;
use crate::dof::{build_distributed_element_dofs, DofLayout, ElementDofConnectivity};
use crate::error::DofError;
use crate::graph::DofGraph;
use crate::mesh::MeshPartition;
use crate::reorder::{renumber, DisconnectedPolicy, DofMap};
use crate::sparsity::Sparsity;
use log::{debug, info};

/// The lifecycle state of a [`DofHandler`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HandlerState {
    /// DoFs carry their original indices and no sparsity has been built.
    Built,
    /// DoFs have been renumbered and no sparsity has been built for the new numbering.
    Renumbered,
    /// The sparsity of the current numbering is available.
    SparsityReady,
}

/// Global DoF numbering of the local elements of one process.
///
/// Construction assigns original global DoF indices to all local elements and builds the local
/// coupling graph. [`DofHandler::renumber_dofs`] replaces the numbering with a
/// bandwidth-reducing one, and [`DofHandler::build_sparsity`] caches the row-compressed
/// structure of the local coupling graph in the current numbering.
///
/// Construction, [`DofHandler::renumber_dofs`] and [`DofHandler::gather_sparsity`] are
/// collective: every process of `comm` must call them in the same order.
#[derive(Debug)]
pub struct DofHandler<C> {
    comm: C,
    layout: DofLayout,
    element_offset: usize,
    // Element DoFs in original numbering
    element_dofs: ElementDofConnectivity,
    dof_map: DofMap,
    // Local coupling graph in active numbering
    graph: DofGraph,
    sparsity: Option<Sparsity>,
    renumbered: bool,
    disconnected_policy: DisconnectedPolicy,
}

impl<C: Collective> DofHandler<C> {
    pub fn new(partition: &(impl MeshPartition + ?Sized), order: BasisOrder, comm: C) -> Result<Self, DofError> {
        let (layout, element_offset, element_dofs) = build_distributed_element_dofs(&comm, order, partition)?;
        let num_dofs = layout.num_dofs();
        let graph = DofGraph::from_element_dofs(num_dofs, &element_dofs);

        info!(
            "Rank {}/{}: {} global DoFs (order {}), {} local elements at offset {}",
            comm.rank(),
            comm.size(),
            num_dofs,
            order,
            element_dofs.len(),
            element_offset
        );

        Ok(Self {
            comm,
            layout,
            element_offset,
            element_dofs,
            dof_map: DofMap::identity(num_dofs),
            graph,
            sparsity: None,
            renumbered: false,
            disconnected_policy: DisconnectedPolicy::default(),
        })
    }

    /// Builds a handler with the order and policies of `config`, renumbering if requested.
    pub fn from_config(
        partition: &(impl MeshPartition + ?Sized),
        config: &DofHandlerConfig,
        comm: C,
    ) -> Result<Self, DofError> {
        let mut handler = Self::new(partition, config.order, comm)?;
        handler.set_disconnected_policy(config.disconnected_policy);
        if config.renumber {
            handler.renumber_dofs()?;
        }
        Ok(handler)
    }

    pub fn with_disconnected_policy(mut self, policy: DisconnectedPolicy) -> Self {
        self.set_disconnected_policy(policy);
        self
    }

    pub fn set_disconnected_policy(&mut self, policy: DisconnectedPolicy) {
        self.disconnected_policy = policy;
    }

    pub fn disconnected_policy(&self) -> DisconnectedPolicy {
        self.disconnected_policy
    }

    pub fn comm(&self) -> &C {
        &self.comm
    }

    pub fn order(&self) -> BasisOrder {
        self.layout.order()
    }

    pub fn layout(&self) -> &DofLayout {
        &self.layout
    }

    pub fn global_dof_count(&self) -> usize {
        self.layout.num_dofs()
    }

    /// Global index of the first local element.
    pub fn element_offset(&self) -> usize {
        self.element_offset
    }

    pub fn state(&self) -> HandlerState {
        match (&self.sparsity, self.renumbered) {
            (Some(_), _) => HandlerState::SparsityReady,
            (None, true) => HandlerState::Renumbered,
            (None, false) => HandlerState::Built,
        }
    }

    pub fn is_renumbered(&self) -> bool {
        self.renumbered
    }

    /// The map from original to active DoF indices.
    pub fn dof_map(&self) -> &DofMap {
        &self.dof_map
    }

    /// The DoFs of the local elements in *original* numbering.
    ///
    /// Use [`DofHandler::dof_map`] or [`DofHandler::populate_active_element_dofs`] to obtain
    /// active indices.
    pub fn dof_connectivity(&self) -> &ElementDofConnectivity {
        &self.element_dofs
    }

    /// The local coupling graph in active numbering.
    pub fn dof_graph(&self) -> &DofGraph {
        &self.graph
    }

    /// Writes the active DoF indices of the given local element into `output`.
    ///
    /// # Panics
    ///
    /// Panics if the element is out of bounds or `output` does not have exactly
    /// `dofs_per_element` entries.
    pub fn populate_active_element_dofs(&self, output: &mut [usize], element: usize) {
        let dofs = self
            .element_dofs
            .get(element)
            .expect("Element index must be in bounds");
        assert_eq!(output.len(), dofs.len(), "Output must have one entry per element DoF.");
        for (active, &original) in output.iter_mut().zip(dofs) {
            *active = self.dof_map.active_index(original);
        }
    }

    /// Renumbers all DoFs breadth-first over the coupling graph of the whole mesh.
    ///
    /// The global graph is assembled from the local graphs of all processes in original
    /// numbering, so every process computes the same map and repeated calls yield the same
    /// result. Any previously built sparsity is discarded.
    pub fn renumber_dofs(&mut self) -> Result<(), DofError> {
        let num_dofs = self.global_dof_count();
        let local_graph = DofGraph::from_element_dofs(num_dofs, &self.element_dofs);
        let global_graph = local_graph.union_all(&self.comm)?;
        debug!(
            "Rank {}: global DoF graph has {} couplings",
            self.comm.rank(),
            global_graph.nnz()
        );

        let dof_map = renumber(&global_graph, self.disconnected_policy)?;
        let graph = DofGraph::from_element_dofs(num_dofs, &dof_map.apply(&self.element_dofs));

        info!(
            "Rank {}: renumbered {} DoFs, local bandwidth {} -> {}",
            self.comm.rank(),
            num_dofs,
            Sparsity::from_graph(&local_graph).bandwidth(),
            Sparsity::from_graph(&graph).bandwidth()
        );

        self.dof_map = dof_map;
        self.graph = graph;
        self.sparsity = None;
        self.renumbered = true;
        Ok(())
    }

    /// Builds the sparsity of the local coupling graph in the current numbering.
    pub fn build_sparsity(&mut self) -> &Sparsity {
        let graph = &self.graph;
        self.sparsity.get_or_insert_with(|| Sparsity::from_graph(graph))
    }

    pub fn sparsity(&self) -> Result<&Sparsity, DofError> {
        self.sparsity.as_ref().ok_or(DofError::SparsityNotBuilt)
    }

    /// Collects the local sparsity of every process on rank 0.
    ///
    /// Returns `Some` with one sparsity per rank on rank 0 and `None` on all other ranks.
    /// Every rank takes part in the collective, and ranks which have not built their sparsity
    /// then fail with [`DofError::SparsityNotBuilt`].
    pub fn gather_sparsity(&self) -> Result<Option<Vec<Sparsity>>, DofError> {
        // The cached sparsity is exactly the compressed local graph
        let gathered = self.comm.all_gather_indices(&self.graph.encode());
        self.sparsity()?;
        if self.comm.rank() != 0 {
            return Ok(None);
        }

        let num_dofs = self.global_dof_count();

        let sparsities = gathered
            .into_iter()
            .enumerate()
            .map(|(rank, payload)| DofGraph::decode(rank, num_dofs, payload).map(|g| Sparsity::from_graph(&g)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(sparsities))
    }
}
