//! Point d'entrée CLI pour lotmap

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// Charger .env au démarrage
fn load_env() {
    // Chercher .env dans le répertoire courant ou parent
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

mod cli;

use cli::Commands;

/// Cartes de lotissement interactives à partir de plans SVG
#[derive(Parser)]
#[command(name = "lotmap")]
#[command(author, version)]
#[command(about = "Convertir des plans SVG en cartes de lots et suivre les ventes")]
#[command(long_about = "Convertit des plans SVG (quartier ou ville) en configurations de carte typées, les joint à un catalogue de lots et produit un rendu SVG coloré, un export GeoJSON ou un rapport.")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    // Configurer le logging
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Convert { path, output, mode } => {
            cli::cmd_convert(&path, &output, mode)?;
        }
        Commands::Render {
            path,
            output,
            config,
            mode,
            purchased,
            selected,
            no_grid,
        } => {
            info!(path = %path.display(), output = %output.display(), config = %config, "Render");
            cli::cmd_render(&path, &output, &config, mode, purchased, selected, no_grid)?;
        }
        Commands::Export {
            path,
            output,
            config,
            mode,
        } => {
            cli::cmd_export(&path, &output, &config, mode)?;
        }
        Commands::Inspect {
            path,
            config,
            mode,
            human,
            report,
        } => {
            cli::cmd_inspect(&path, &config, mode, human, report.as_deref())?;
        }
        Commands::Grid { config, output } => {
            info!(config = %config, output = %output.display(), "Grid layout");
            cli::cmd_grid(&config, &output)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
