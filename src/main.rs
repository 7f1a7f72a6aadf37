//! Container stream viewer - Entry Point

use clap::Parser;
use ctail::config::CliOverrides;
use ctail::model::{AppError, ContainerId, Endpoint, StreamMode, StreamTarget};
use ctail::state::PanelOptions;
use ctail::view::ColorConfig;
use std::path::PathBuf;
use tracing::info;

/// Follow container logs or attach to a container shell
#[derive(Parser, Debug)]
#[command(name = "ctail")]
#[command(version)]
#[command(about = "Follow container logs or attach to a container shell over a reconnecting websocket")]
pub struct Args {
    /// Container id to stream
    pub container: String,

    /// What to open: the log stream or an interactive terminal
    #[arg(short, long, default_value = "logs", value_parser = ["logs", "terminal"])]
    pub mode: String,

    /// Server base URL (http, https, ws or wss)
    #[arg(long)]
    pub server: Option<String>,

    /// Keep only the newest N log lines (0 = unbounded)
    #[arg(long)]
    pub max_lines: Option<usize>,

    /// Start with auto-follow disabled
    #[arg(long)]
    pub no_follow: bool,

    /// Start with search query active (log mode)
    #[arg(short, long)]
    pub search: Option<String>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    fn cli_overrides(&self) -> CliOverrides {
        CliOverrides {
            server: self.server.clone(),
            max_lines: self.max_lines,
            follow: self.no_follow.then_some(false),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = ctail::config::load_config_with_precedence(args.config.clone())?;
        let merged = ctail::config::merge_config(config_file);
        let with_env = ctail::config::apply_env_overrides(merged);
        ctail::config::apply_cli_overrides(with_env, args.cli_overrides())
    };

    // Validate the target before touching the terminal.
    let endpoint = Endpoint::parse(&config.server).map_err(AppError::from)?;
    let container = ContainerId::new(&args.container).map_err(AppError::from)?;
    let mode: StreamMode = args.mode.parse()?;
    let target = StreamTarget::new(container, mode);

    ctail::logging::init(&config.log_file_path).map_err(AppError::from)?;

    info!(
        config = ?config,
        %target,
        "Configuration loaded and resolved"
    );

    let options = PanelOptions::from(&config);
    let colors = ColorConfig::from_env_and_args(args.no_color);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(AppError::from)?;

    let result = runtime.block_on(async {
        match mode {
            StreamMode::Logs => {
                ctail::view::run_logs(&endpoint, target, &options, colors, args.search.as_deref())
                    .await
            }
            StreamMode::Terminal => ctail::view::run_terminal(&endpoint, target, &options).await,
        }
    });

    result.map_err(AppError::from)?;
    info!("exited cleanly");
    Ok(())
}
