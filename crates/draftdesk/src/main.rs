//! draftdesk CLI
#![deny(unsafe_code)]

use std::future::Future;

use anyhow::Context;
use clap::Parser;
use draftdesk::{Cli, Commands, commands};
use draftdesk_core::config::ConfigLoader;
use tracing::debug;

mod observability;

/// Run an async command on a fresh multi-threaded runtime.
fn block_on<F>(what: &str, future: F) -> anyhow::Result<()>
where
    F: Future<Output = anyhow::Result<()>>,
{
    let rt = tokio::runtime::Runtime::new()
        .with_context(|| format!("failed to create async runtime for {what}"))?;
    rt.block_on(future)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.color.apply();

    if cli.version_only {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // arg_required_else_help ensures we have --version-only or a subcommand
    let Some(command) = cli.command else {
        return Ok(());
    };

    if let Some(ref dir) = cli.chdir {
        std::env::set_current_dir(dir)
            .with_context(|| format!("failed to change directory to {}", dir.display()))?;
    }

    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let cwd = camino::Utf8PathBuf::try_from(cwd).map_err(|e| {
        anyhow::anyhow!(
            "current directory is not valid UTF-8: {}",
            e.into_path_buf().display()
        )
    })?;
    let mut loader = ConfigLoader::new().with_project_search(&cwd);
    if let Some(ref config_path) = cli.config {
        let config_path = camino::Utf8PathBuf::try_from(config_path.clone()).map_err(|e| {
            anyhow::anyhow!(
                "config path is not valid UTF-8: {}",
                e.into_path_buf().display()
            )
        })?;
        loader = loader.with_file(&config_path);
    }
    let (config, config_sources) = loader.load().context("failed to load configuration")?;

    let obs_config = observability::ObservabilityConfig::from_env_with_overrides(
        config
            .log_dir
            .as_ref()
            .map(|dir| dir.as_std_path().to_path_buf()),
    );
    let env_filter = observability::env_filter(cli.quiet, cli.verbose, config.log_level.as_str());
    let console = observability::console_level(cli.quiet, cli.verbose);
    let _guard = observability::init_observability(&obs_config, env_filter, console)
        .context("failed to initialize logging/tracing")?;

    debug!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        json = cli.json,
        color = ?cli.color,
        chdir = ?cli.chdir,
        file_logging = obs_config.writes_file(),
        "CLI initialized"
    );

    let max_input = if config.disable_input_limit {
        None
    } else {
        config
            .max_input_bytes
            .or(Some(draftdesk_core::DEFAULT_MAX_INPUT_BYTES))
    };

    let result = match command {
        Commands::Classify(args) => commands::classify::cmd_classify(args, cli.json, max_input),
        Commands::Count(args) => commands::count::cmd_count(args, cli.json, max_input),
        Commands::Thread(args) => commands::thread::cmd_thread(args, cli.json, max_input),
        Commands::Entities(args) => commands::entities::cmd_entities(args, cli.json, max_input),
        Commands::Tones(args) => commands::tones::cmd_tones(args, cli.json),
        Commands::Generate(args) => block_on(
            "generate",
            commands::generate::cmd_generate(args, cli.json, &config, max_input),
        ),
        Commands::Shorten(args) => block_on(
            "shorten",
            commands::shorten::cmd_shorten(args, cli.json, &config, max_input),
        ),
        Commands::Keys(command) => {
            block_on("keys", commands::keys::cmd_keys(command, cli.json, &config))
        }
        Commands::Models(command) => commands::models::cmd_models(command, cli.json, &config),
        Commands::Settings(command) => {
            commands::settings::cmd_settings(command, cli.json, &config)
        }
        Commands::Info(args) => commands::info::cmd_info(args, cli.json, &config, &config_sources),
        #[cfg(feature = "mcp")]
        Commands::Serve(args) => {
            block_on("MCP server", commands::serve::cmd_serve(args, max_input))
        }
    };
    if let Err(ref err) = result {
        tracing::error!(error = %err, "fatal error");
    }
    result
}
