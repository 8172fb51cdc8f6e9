//! Numbers the DoFs of a structured quad grid distributed over a group of threads and reports
//! the resulting sparsity of every rank.
//!
//! ```text
//! RUST_LOG=info cargo run --example partitioned_grid -- --nx 8 --ny 6 --ranks 4 --order 2 --renumber
//! ```
use dofgraph::comm::{Collective, ThreadComm};
use dofgraph::config::{load_config_from_file, DofHandlerConfig};
use dofgraph::mesh::procedural::create_partitioned_rectangular_mesh;
use dofgraph::sparsity::Sparsity;
use dofgraph::{BasisOrder, DofHandler};
use eyre::{eyre, WrapErr};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::thread;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "partitioned_grid")]
struct Opt {
    /// Number of cells along the x-axis
    #[structopt(long, default_value = "4")]
    nx: usize,
    /// Number of cells along the y-axis
    #[structopt(long, default_value = "4")]
    ny: usize,
    /// Number of ranks (threads) to distribute the grid over
    #[structopt(long, default_value = "4")]
    ranks: usize,
    /// Polynomial order of the basis
    #[structopt(long, default_value = "1")]
    order: usize,
    /// Renumber DoFs to reduce bandwidth
    #[structopt(long)]
    renumber: bool,
    /// JSON handler config, overrides --order and --renumber
    #[structopt(long, parse(from_os_str))]
    config: Option<PathBuf>,
    /// Write the gathered sparsity of all ranks to this JSON file
    #[structopt(long, parse(from_os_str))]
    output: Option<PathBuf>,
}

fn run_rank(opt: &Opt, config: &DofHandlerConfig, comm: ThreadComm) -> eyre::Result<Option<Vec<Sparsity>>> {
    let rank = comm.rank();
    let partition = create_partitioned_rectangular_mesh(opt.nx, opt.ny, rank, comm.size());
    let mut handler = DofHandler::from_config(&partition, config, comm)
        .wrap_err_with(|| format!("failed to number DoFs on rank {}", rank))?;

    let (nnz, bandwidth) = {
        let sparsity = handler.build_sparsity();
        (sparsity.nnz(), sparsity.bandwidth())
    };
    info!(
        "Rank {}: {} local elements with {} DoFs each, {} non-zeros, local bandwidth {}",
        handler.comm().rank(),
        handler.dof_connectivity().len(),
        handler.layout().dofs_per_element(),
        nnz,
        bandwidth
    );
    Ok(handler.gather_sparsity()?)
}

fn main() -> eyre::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();
    if opt.ranks == 0 {
        return Err(eyre!("at least one rank is required"));
    }

    let config = match &opt.config {
        Some(path) => load_config_from_file(path)?,
        None => DofHandlerConfig {
            order: BasisOrder::new(opt.order)?,
            renumber: opt.renumber,
            ..Default::default()
        },
    };
    info!("Running with {:?}", config);

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = ThreadComm::group(opt.ranks)
            .into_iter()
            .map(|comm| {
                let opt = &opt;
                let config = &config;
                scope.spawn(move || run_rank(opt, config, comm))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(result) => result,
                Err(_) => Err(eyre!("rank thread panicked")),
            })
            .collect::<eyre::Result<Vec<_>>>()
    })?;

    let gathered = results
        .into_iter()
        .next()
        .flatten()
        .ok_or_else(|| eyre!("rank 0 did not gather any sparsity"))?;

    for (rank, sparsity) in gathered.iter().enumerate() {
        println!(
            "rank {:>3}: {:>8} rows {:>10} non-zeros, bandwidth {}",
            rank,
            sparsity.row_lengths().iter().filter(|&&len| len > 0).count(),
            sparsity.nnz(),
            sparsity.bandwidth()
        );
    }

    if let Some(output) = &opt.output {
        let json = serde_json::to_string(&gathered)?;
        fs::write(output, json).wrap_err("failed to write sparsity output file")?;
        println!("Wrote gathered sparsity to {}", output.display());
    }

    Ok(())
}
