use anyhow::Context;
use treesync_core::config::{Config, ConfigManager};
use treesync_core::decision::{MissingPolicy, OutdatedPolicy};
use treesync_core::error::SyncError;
use treesync_core::sync::{SyncOrchestrator, SyncReporter};

use crate::cli::Cli;
use crate::interactive::ConsolePrompter;

pub struct SyncCommand;

impl SyncCommand {
    pub fn execute(cli: &Cli) -> anyhow::Result<()> {
        let mut config = if cli.no_config {
            Config::default()
        } else {
            ConfigManager::load(cli.config.as_deref()).context("Failed to load configuration")?
        };

        // CLI flags override config file settings
        Self::merge_cli_flags(&mut config, cli);

        tracing::debug!("Effective configuration: {config:?}");

        let mut orchestrator =
            SyncOrchestrator::new(&config).context("Failed to initialize sync engine")?;

        let mut policy = config.policy();
        let result = if policy.is_complete() {
            orchestrator.run(&cli.dir1, &cli.dir2, &mut policy)
        } else {
            let mut provider = policy.or_ask(ConsolePrompter::from_stdin());
            orchestrator.run(&cli.dir1, &cli.dir2, &mut provider)
        };

        let summary = match result {
            Ok(summary) => summary,
            Err(e) if e.downcast_ref::<SyncError>().is_some_and(SyncError::is_abort) => {
                // Quitting at a prompt is not an error
                eprintln!("\nSync cancelled by user.");
                return Ok(());
            }
            Err(e) => return Err(e).context("Sync operation failed"),
        };

        println!("\n{}", SyncReporter::generate_summary(&summary));

        Ok(())
    }

    fn merge_cli_flags(config: &mut Config, cli: &Cli) {
        if cli.dry_run {
            config.dry_run = Some(true);
        }

        if cli.yes_all {
            config.on_missing = Some(MissingPolicy::Copy);
            config.on_outdated = Some(OutdatedPolicy::Update);
        }

        if let Some(mode) = cli.on_missing {
            config.on_missing = Some(mode.into());
        }
        if let Some(mode) = cli.on_outdated {
            config.on_outdated = Some(mode.into());
        }
    }
}
