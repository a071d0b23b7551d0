use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use dialogue_graph::asset::{CharacterAsset, GraphAsset};
use dialogue_graph::common;
use dialogue_graph::config::EditorConfig;
use dialogue_graph::diagnostics::LoadReport;
use dialogue_graph::editor::EditorGraph;
use dialogue_graph::export::ExportFormat;
use dialogue_graph::object::{ObjectWorld, TypeRegistry};
use dialogue_graph::serialization::{self, LoadOptions};

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an empty dialogue asset
    Init {
        #[clap(short, long)]
        asset: PathBuf,
    },
    /// Write the default editor configuration
    InitConfig {
        #[clap(short, long, default_value = "dialogue-graph.yaml")]
        output: PathBuf,
    },
    /// Load an asset and print what the editor would show
    Inspect {
        #[clap(short, long)]
        asset: PathBuf,
    },
    /// Load an asset and fail when anything had to be recovered
    Validate {
        #[clap(short, long)]
        asset: PathBuf,
    },
    /// Re-encode an asset, JSON or YAML by extension
    Convert {
        #[clap(short, long)]
        input: PathBuf,
        #[clap(short, long)]
        output: PathBuf,
    },
    /// Render the dialogue flow as a diagram
    Export {
        #[clap(short, long)]
        asset: PathBuf,
        #[clap(short, long, value_enum)]
        format: ExportFormat,
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
    /// Summarise a character and check its conversations load
    Character {
        #[clap(short, long)]
        asset: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    let config = match &args.config {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EditorConfig::default(),
    };

    match args.command {
        Commands::Init { asset } => {
            info!("Initializing asset: {}", asset.display());
            GraphAsset::default().save(&asset, config.asset.pretty)?;
        }
        Commands::InitConfig { output } => {
            info!("Writing default config: {}", output.display());
            common::write_string_to_file(&output, &EditorConfig::default().to_yaml()?)?;
        }
        Commands::Inspect { asset } => {
            let (graph, report) = load_graph(&asset, &config)?;
            print_graph(&graph);
            print_report(&report);
        }
        Commands::Validate { asset } => {
            let (_, report) = load_graph(&asset, &config)?;
            print_report(&report);
            if !report.is_clean() {
                bail!(
                    "{} has {} diagnostics",
                    asset.display(),
                    report.diagnostics.len()
                );
            }
            println!("{} is valid", asset.display());
        }
        Commands::Convert { input, output } => {
            info!("Converting {} to {}", input.display(), output.display());
            let graph = GraphAsset::load(&input)?;
            graph.save(&output, config.asset.pretty)?;
        }
        Commands::Export {
            asset,
            format,
            output,
        } => {
            info!("Exporting {} as {}", asset.display(), format);
            let rendered = format.render(&GraphAsset::load(&asset)?)?;
            match output {
                Some(path) => common::write_string_to_file(&path, &rendered)?,
                None => print!("{}", rendered),
            }
        }
        Commands::Character { asset } => {
            let character = CharacterAsset::load(&asset)?;
            println!("Name: {}", character.name);
            if let Some(portrait) = &character.portrait {
                println!("Portrait: {}", portrait);
            }
            println!("Conversations: {}", character.conversations.len());

            let base_dir = asset.parent().unwrap_or_else(|| Path::new("."));
            for (path, conversation) in character
                .conversations
                .iter()
                .zip(character.load_conversations(base_dir)?)
            {
                println!("  {}: {}", path.display(), conversation.stats());
            }
        }
    }

    Ok(())
}

/// Rebuild the editor graph against an empty scene.
fn load_graph(path: &Path, config: &EditorConfig) -> Result<(EditorGraph, LoadReport)> {
    let asset = GraphAsset::load(path)
        .with_context(|| format!("Failed to read asset {}", path.display()))?;
    let world = ObjectWorld::new();
    let registry = TypeRegistry::new();
    let options = LoadOptions::from(&config.layout);
    Ok(serialization::load(&asset, &world, &registry, &options)?)
}

fn print_graph(graph: &EditorGraph) {
    println!("{}", graph.stats());
    for node in graph.nodes() {
        println!(
            "  {} {} at ({}, {})",
            node.id,
            node.node_type(),
            node.position.x,
            node.position.y
        );
    }
}

fn print_report(report: &LoadReport) {
    for diagnostic in &report.diagnostics {
        println!("  {}", diagnostic);
    }
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_deref()
        .unwrap_or("info")
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("handlebars=off,{}", log_level)))
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
