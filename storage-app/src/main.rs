// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::{Confirm, Select};
use diskmap::actions::{
    ActionChoice, ActionOrchestrator, ActionOutcome, PartitionActionMachine, PartitionActionState,
};
use diskmap::config::Config;
use diskmap::error::DiskMapError;
use diskmap::models::Inventory;
use diskmap::{logging, views};
use storage_contracts::HttpDiskApi;
use storage_types::parse_size;

/// Filesystems offered when formatting a partition.
const FORMAT_CHOICES: [&str; 4] = ["ext4", "ntfs", "fat32", "swap"];

/// Disk layout map and partition actions for a remote disk management service
#[derive(Parser)]
#[command(name = "diskmap")]
#[command(about = "Show disk layouts and run partition/RAID actions", long_about = None)]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/diskmap/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the disk service, overriding the config file
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw every disk, its partitions and free space, then RAID arrays
    Show {
        /// Bar width in characters
        #[arg(long, default_value_t = 60)]
        width: usize,
    },
    /// List partitions that may be combined into a RAID array
    RaidCandidates,
    /// Create a partition in a disk's free space
    CreatePartition {
        /// Disk device path, e.g. /dev/sdb
        #[arg(long)]
        disk: String,
        /// Size such as "20000 MiB" or "20G"; floored to whole MiB
        #[arg(long, value_parser = parse_size_arg)]
        size: u64,
        /// Filesystem to create
        #[arg(long, default_value = "ext4")]
        fs: String,
    },
    /// Format or delete a partition, with confirmation
    Partition {
        /// Partition device path, e.g. /dev/sdb1
        path: String,
    },
    /// Create a software RAID array
    CreateRaid {
        /// RAID level (0, 1, 4, 5, 6 or 10)
        #[arg(long)]
        level: u8,
        /// Member device; repeat for each one
        #[arg(long = "device")]
        devices: Vec<String>,
    },
}

fn parse_size_arg(raw: &str) -> Result<u64, String> {
    parse_size(raw).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config =
        Config::load(cli.config.as_deref(), cli.api_url).context("Failed to load config")?;

    logging::init(&config);
    tracing::debug!(api = %config.api_base_url, capabilities = ?config.capabilities, "starting");

    let api = HttpDiskApi::new(&config.api_base_url, config.request_timeout())
        .context("Invalid disk service URL")?;
    let api = Arc::new(api);

    let mut inventory = Inventory::new();
    inventory
        .load(api.as_ref())
        .await
        .map_err(operator_error)?;

    let orchestrator = ActionOrchestrator::new(api, config.capabilities, config.layout);

    match cli.command.unwrap_or(Commands::Show { width: 60 }) {
        Commands::Show { width } => {
            print!(
                "{}",
                views::render_inventory(&inventory, &config.layout, width)
            );
        }
        Commands::RaidCandidates => {
            print!(
                "{}",
                views::render_raid_candidates(&inventory.raid_candidate_partitions())
            );
        }
        Commands::CreatePartition { disk, size, fs } => {
            let outcome = orchestrator
                .create_partition(&mut inventory, &disk, size, &fs)
                .await
                .map_err(operator_error)?;
            report(&outcome);
        }
        Commands::Partition { path } => {
            partition_flow(&orchestrator, &mut inventory, &path).await?;
        }
        Commands::CreateRaid { level, devices } => {
            let outcome = orchestrator
                .create_raid(&mut inventory, level, &devices)
                .await
                .map_err(operator_error)?;
            report(&outcome);
        }
    }

    Ok(())
}

/// Ask which action to take on `path`, then ask for confirmation.
async fn partition_flow(
    orchestrator: &ActionOrchestrator,
    inventory: &mut Inventory,
    path: &str,
) -> Result<()> {
    if inventory.current().partition(path).is_none() {
        anyhow::bail!("Partition {path} is not in the current inventory.");
    }

    let mut machine = PartitionActionMachine::new(orchestrator.capabilities());
    machine.activate(path).map_err(operator_error)?;

    let picked = Select::new()
        .with_prompt(format!("What should happen to {path}?"))
        .items(&["Format", "Delete", "Cancel"])
        .default(2)
        .interact_opt()
        .context("Failed to show action prompt")?;

    let choice = match picked {
        Some(0) => {
            let fs = Select::new()
                .with_prompt("Filesystem")
                .items(&FORMAT_CHOICES)
                .default(0)
                .interact_opt()
                .context("Failed to show filesystem prompt")?;
            match fs.and_then(|idx| FORMAT_CHOICES.get(idx)) {
                Some(fs_type) => ActionChoice::Format {
                    fs_type: fs_type.to_string(),
                },
                None => ActionChoice::Cancel,
            }
        }
        Some(1) => ActionChoice::Delete,
        _ => ActionChoice::Cancel,
    };
    machine.choose(choice).map_err(operator_error)?;

    let question = match machine.state() {
        PartitionActionState::ConfirmingFormat {
            partition_path,
            fs_type,
        } => format!("Format {partition_path} as {fs_type}? All data on it will be lost."),
        PartitionActionState::ConfirmingDelete { partition_path } => {
            format!("Delete {partition_path}? All data on it will be lost.")
        }
        PartitionActionState::Idle | PartitionActionState::ChoosingAction { .. } => {
            println!("Cancelled.");
            return Ok(());
        }
    };

    let confirmed = Confirm::new()
        .with_prompt(question)
        .default(false)
        .interact_opt()
        .context("Failed to show confirmation prompt")?
        .unwrap_or(false);

    let Some(action) = machine.confirm(confirmed) else {
        println!("Cancelled.");
        return Ok(());
    };

    let outcome = orchestrator
        .execute(inventory, action)
        .await
        .map_err(operator_error)?;
    report(&outcome);
    Ok(())
}

fn report(outcome: &ActionOutcome) {
    println!("{}: done.", outcome.operation.label());
    if !outcome.inventory_refreshed {
        println!("The change was applied but the disk list could not be reloaded.");
    }
}

fn operator_error(e: DiskMapError) -> anyhow::Error {
    anyhow::anyhow!(e.operator_message())
}
