mod config;
mod dof;
mod graph;
mod mesh;
mod sparsity;
