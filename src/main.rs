use anyhow::{Context, Result};
use chess_uci_host::core::{default_settings_path, load_settings, save_settings, EngineSettings};
use chess_uci_host::game::TurnController;
use chess_uci_host::ui::{ConsoleInput, TextBoardRenderer};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Play chess in the terminal against a UCI engine
#[derive(Parser, Debug)]
#[command(name = "chess-uci-host", version)]
struct Cli {
    /// Path to the engine binary
    #[arg(long)]
    engine: Option<PathBuf>,

    /// Extra argument passed to the engine (repeatable)
    #[arg(long = "engine-arg")]
    engine_args: Vec<String>,

    /// Search depth for the engine's replies
    #[arg(long)]
    depth: Option<u32>,

    /// Deadline for each engine response, in milliseconds
    #[arg(long = "timeout-ms")]
    timeout_ms: Option<u64>,

    /// Engine option as NAME=VALUE, sent with setoption (repeatable)
    #[arg(long = "option")]
    options: Vec<String>,

    /// Settings file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective settings back to the settings file
    #[arg(long, default_value_t = false)]
    save_config: bool,

    /// Show the board from Black's side
    #[arg(long, default_value_t = false)]
    flip: bool,

    /// Debug logging, including the raw engine transcript
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Cli {
    fn apply_to(&self, settings: &mut EngineSettings) -> Result<()> {
        if let Some(engine) = &self.engine {
            settings.engine_path = engine.clone();
        }
        if !self.engine_args.is_empty() {
            settings.engine_args = self.engine_args.clone();
        }
        if let Some(depth) = self.depth {
            settings.search_depth = depth;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            settings.read_timeout_ms = timeout_ms;
        }
        for raw in &self.options {
            settings
                .set_option_from_str(raw)
                .with_context(|| format!("Bad --option '{}'", raw))?;
        }
        if self.flip {
            settings.flip_board = true;
        }
        Ok(())
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.clone().unwrap_or_else(default_settings_path);
    let mut settings = load_settings(&config_path);
    cli.apply_to(&mut settings)?;

    if cli.save_config {
        save_settings(&settings, &config_path)
            .with_context(|| format!("Failed to save settings to {}", config_path.display()))?;
        info!("[SETTINGS] Saved to {}", config_path.display());
    }

    let mut controller = TurnController::start(&settings).with_context(|| {
        format!(
            "Failed to start engine at {}",
            settings.engine_path.display()
        )
    })?;
    println!("Engine ready.");

    let stdin = io::stdin();
    let mut input = ConsoleInput::new(stdin.lock(), io::stdout());
    let mut renderer = TextBoardRenderer::new(io::stdout(), settings.flip_board);

    let outcome = controller
        .run(&mut input, &mut renderer)
        .context("Game aborted")?;
    info!("[TURN] Finished: {}", outcome);
    Ok(())
}
