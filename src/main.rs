use clap::{Args, Parser, Subcommand};
use repo_summarizer::{git, graph, Analyzer, Config, Reporter};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "repo-summarizer")]
#[command(about = "Summarize a repository's structure and file dependencies")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a local checkout or a repository URL
    Analyze(AnalyzeArgs),
    /// Generate a documented configuration file
    Config {
        /// Output path for the config file (defaults to ~/.repo-summarizer.toml)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
#[command(group(clap::ArgGroup::new("source").required(true).args(["path", "url"])))]
struct AnalyzeArgs {
    /// Path to a local repository
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Git URL to clone and analyze
    #[arg(short, long)]
    url: Option<String>,

    /// Replace an existing clone target
    #[arg(long, requires = "url")]
    force: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON summary output file
    #[arg(short, long, default_value = "repo_json_summary.json")]
    output: PathBuf,

    /// Text report output file
    #[arg(short, long, default_value = "repo_print_summary.txt")]
    report: PathBuf,

    /// Write structure and dependency graphs (DOT + JSON) into this directory
    #[arg(long)]
    visualize: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    match cli.command {
        Commands::Analyze(args) => analyze_repository(args),
        Commands::Config { output } => generate_config(output),
    }
}

fn analyze_repository(args: AnalyzeArgs) -> anyhow::Result<()> {
    let start_time = Instant::now();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    let target = if let Some(path) = &args.path {
        path.clone()
    } else if let Some(url) = &args.url {
        println!("Cloning {}...", url);
        git::clone_repository(url, None, args.force)?
    } else {
        anyhow::bail!("either --path or --url is required");
    };
    config.target_directory = target;

    println!("Analyzing repository at {}...", config.target_directory.display());
    let analyzer = Analyzer::new(config)?;
    let summary = analyzer.generate_summary();

    let reporter = Reporter::new(analyzer.config().report.clone());
    let mut exported = reporter.export_all(&summary, &args.output, &args.report)?;

    if let Some(dir) = &args.visualize {
        exported.extend(graph::write_visualizations(
            &summary,
            analyzer.root(),
            &analyzer.config().visualization,
            dir,
        )?);
    }

    println!(
        "Found {} files in {} directories ({:.2}s)",
        summary.file_count,
        summary.directory_count,
        start_time.elapsed().as_secs_f64()
    );
    println!("Wrote:");
    for file in exported {
        println!("  - {}", file.display());
    }

    Ok(())
}

fn generate_config(output_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config_path = match output_path {
        Some(path) => path,
        None => Config::default_config_path()?,
    };

    std::fs::write(&config_path, Config::create_documented_config())?;
    println!("Configuration written to {}", config_path.display());

    Ok(())
}
