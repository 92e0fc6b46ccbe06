use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ec_cli::io::{BoundsDto, GraphDto, read_labels, read_points, write_json, write_points};
use edgecloud::{
    LabelLookup, PipelineConfig, PipelineStats, build_edge_graph, run_pipeline, sample_with_rng,
    unique_points,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "edgecloud")]
#[command(about = "Normalise point clouds and build edge connectivity graphs")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Voxel downsample with a random-sampling cap
    #[command(name = "sample")]
    Sample(SampleArgs),
    /// Build the connectivity graph of an edge-point file
    #[command(name = "graph")]
    Graph(GraphArgs),
    /// Dedup, cap, select labelled edge points and build their graph
    #[command(name = "pipeline")]
    Pipeline(PipelineArgs),
}

#[derive(Args, Debug, Clone)]
struct SampleArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    #[arg(long, required = true)]
    out: PathBuf,
    #[arg(long, default_value_t = 0.5)]
    voxel_size: f32,
    #[arg(long, default_value_t = 50_000)]
    max_points: usize,
    /// Fix the random fallback for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug, Clone)]
struct GraphArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    #[arg(long, required = true)]
    out: PathBuf,
    #[arg(long, default_value_t = 2)]
    k: usize,
    #[arg(long, default_value_t = 2.0)]
    max_dist_factor: f32,
    /// Skip exact-duplicate removal when the input is known to be clean
    #[arg(long, default_value_t = false)]
    keep_duplicates: bool,
}

#[derive(Args, Debug, Clone)]
struct PipelineArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    /// One edge label per input point
    #[arg(long, required = true)]
    labels: PathBuf,
    /// Output directory
    #[arg(long, default_value = "out")]
    out: PathBuf,
    /// JSON pipeline config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    k: Option<usize>,
    #[arg(long)]
    max_dist_factor: Option<f32>,
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
struct MetaSample {
    input_points: usize,
    output_points: usize,
    voxel_size: f32,
    max_points: usize,
    seed: Option<u64>,
    bounds: Option<BoundsDto>,
}

#[derive(Debug, Clone, Serialize)]
struct MetaPipeline {
    config: PipelineConfig,
    seed: Option<u64>,
    raw: usize,
    unique: usize,
    capped: usize,
    classified_edge: usize,
    edge_points: usize,
    edges: usize,
    bounds: Option<BoundsDto>,
}

impl MetaPipeline {
    fn new(
        config: PipelineConfig,
        seed: Option<u64>,
        stats: PipelineStats,
        bounds: Option<BoundsDto>,
    ) -> Self {
        Self {
            config,
            seed,
            raw: stats.raw,
            unique: stats.unique,
            capped: stats.capped,
            classified_edge: stats.classified_edge,
            edge_points: stats.edge_points,
            edges: stats.edges,
            bounds,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Sample(args) => run_sample(args),
        Command::Graph(args) => run_graph(args),
        Command::Pipeline(args) => run_pipeline_cmd(args),
    }
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

fn run_sample(args: SampleArgs) -> Result<()> {
    let points = read_points(&args.input)?;
    let mut rng = rng_from(args.seed);

    let sampled = sample_with_rng(&points, args.voxel_size, args.max_points, &mut rng)
        .context("sampling points")?;
    info!(
        input = points.len(),
        output = sampled.len(),
        "sampled {}",
        args.input.display()
    );

    write_points(&args.out, &sampled)?;

    let meta_path = args.out.with_extension("meta.json");
    write_json(
        &meta_path,
        &MetaSample {
            input_points: points.len(),
            output_points: sampled.len(),
            voxel_size: args.voxel_size,
            max_points: args.max_points,
            seed: args.seed,
            bounds: BoundsDto::of(&sampled),
        },
    )
}

fn run_graph(args: GraphArgs) -> Result<()> {
    let mut points = read_points(&args.input)?;
    if !args.keep_duplicates {
        let before = points.len();
        points = unique_points(&points).context("deduplicating edge points")?;
        debug!(before, after = points.len(), "removed exact duplicates");
    }

    let graph =
        build_edge_graph(&points, args.k, args.max_dist_factor).context("building edge graph")?;
    info!(points = points.len(), edges = graph.len(), "graph built");

    write_json(&args.out, &GraphDto::new(&points, &graph))
}

fn run_pipeline_cmd(args: PipelineArgs) -> Result<()> {
    let mut cfg = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(k) = args.k {
        cfg.graph.k = k;
    }
    if let Some(f) = args.max_dist_factor {
        cfg.graph.max_dist_factor = f;
    }
    cfg.validate().context("validating pipeline config")?;

    let points = read_points(&args.input)?;
    let labels = read_labels(&args.labels)?;
    let mut classifier = LabelLookup::new(&points, &labels).context("indexing labels")?;
    let mut rng = rng_from(args.seed);
    let out = run_pipeline(&points, &mut classifier, &cfg, &mut rng).context("running pipeline")?;

    fs::create_dir_all(&args.out)
        .with_context(|| format!("creating output directory {}", args.out.display()))?;

    write_points(&args.out.join("edge_points.xyz"), &out.edge_points)?;
    write_json(
        &args.out.join("graph.json"),
        &GraphDto::new(&out.edge_points, &out.graph),
    )?;
    write_json(
        &args.out.join("meta.json"),
        &MetaPipeline::new(cfg, args.seed, out.stats, BoundsDto::of(&out.edge_points)),
    )?;

    info!(
        edge_points = out.stats.edge_points,
        edges = out.stats.edges,
        "wrote {}",
        args.out.display()
    );
    Ok(())
}
