use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use social_graph::graph::dot;
use social_graph::record::stream_records;
use social_graph::{AnalysisConfig, GraphBuilder, Strategy, generator, pipeline, report};

#[derive(Parser)]
#[command(name = "social-graph", version, about = "Rank and group entities of a message corpus")]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the interaction graph from a CSV corpus and report rankings and communities
    Analyze(AnalyzeArgs),
    /// Write a synthetic message corpus
    Generate {
        #[arg(long, default_value_t = 140)]
        users: usize,
        #[arg(long, default_value_t = 500)]
        messages: usize,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "messages.csv")]
        out: PathBuf,
    },
}

#[derive(clap::Args)]
struct AnalyzeArgs {
    /// CSV with author and text columns
    input: PathBuf,
    /// TOML file with analysis parameters
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    damping: Option<f64>,
    #[arg(long)]
    tolerance: Option<f64>,
    #[arg(long)]
    max_iterations: Option<usize>,
    #[arg(long)]
    top_k: Option<usize>,
    #[arg(long)]
    group_limit: Option<usize>,
    #[arg(long, value_enum)]
    strategy: Option<Strategy>,
    /// Write the graph as Graphviz DOT
    #[arg(long)]
    dot: Option<PathBuf>,
    /// Render the DOT output to PNG (needs --dot and graphviz)
    #[arg(long, requires = "dot")]
    png: Option<PathBuf>,
}

impl AnalyzeArgs {
    fn config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => AnalysisConfig::default(),
        };
        if let Some(v) = self.damping {
            config.damping_factor = v;
        }
        if let Some(v) = self.tolerance {
            config.tolerance = v;
        }
        if let Some(v) = self.max_iterations {
            config.max_iterations = v;
        }
        if let Some(v) = self.top_k {
            config.top_k = v;
        }
        if let Some(v) = self.group_limit {
            config.group_member_limit = v;
        }
        if let Some(v) = self.strategy {
            config.components_strategy = v;
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn analyze(args: &AnalyzeArgs) -> Result<()> {
    let config = args.config()?;

    let (rx, loader) = stream_records(&args.input, 4096)
        .with_context(|| format!("opening {}", args.input.display()))?;
    let built = GraphBuilder::new().build_stream(rx);
    loader
        .join()
        .map_err(|_| anyhow::anyhow!("CSV reader thread panicked"))?
        .with_context(|| format!("reading {}", args.input.display()))?;
    let (graph, stats) = built?;

    let analysis = pipeline::analyze(&graph, &config);
    let summary = pipeline::summarize(&graph, stats, &analysis, &config);
    print!("{}", report::render(&summary));

    if let Some(dot_path) = &args.dot {
        dot::save_dot(&graph, &analysis.components, dot_path)?;
        if let Some(png) = &args.png {
            dot::render_png(dot_path, png)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Analyze(args) => analyze(&args),
        Command::Generate {
            users,
            messages,
            seed,
            out,
        } => {
            let seed = seed.unwrap_or_else(rand::random);
            generator::generate_message_csv(users, messages, seed, &out)?;
            println!("Wrote {messages} messages from {users} users to {} (seed {seed})", out.display());
            Ok(())
        }
    }
}
