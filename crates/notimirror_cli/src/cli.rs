//! CLI command definitions and handlers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::warn;
use notimirror_core::{
    FetchError, FileCache, FileFetcher, LoadOutcome, NoRemote, NotificationFetcher,
    NotificationService, Notifications, RefreshStatus, SyncSummary,
};
use regex::Regex;
use std::path::PathBuf;

use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "notimirror")]
#[command(author, version, about = "Mirror and triage a remote notification feed")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: platform config dir)
    #[arg(long, global = true, env = "NOTIMIRROR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Snapshot cache file
    #[arg(long, global = true)]
    pub cache: Option<PathBuf>,

    /// JSON file holding the latest remote snapshot
    #[arg(long, global = true)]
    pub remote: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List notifications
    #[command(alias = "ls")]
    List {
        /// Include hidden and done notifications
        #[arg(short, long)]
        all: bool,

        /// Only repositories whose full name matches this regex
        #[arg(short, long)]
        repo: Option<String>,

        /// Refresh even if the cache is still fresh
        #[arg(short, long)]
        force: bool,
    },

    /// Refresh the local snapshot from the remote
    Sync {
        /// Refresh even if the cache is still fresh
        #[arg(short, long)]
        force: bool,
    },

    /// Hide notifications from view and from remote updates
    Hide {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Mark notifications done; they disappear once the remote drops them
    Done {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Undo hide/done
    Restore {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Print ids of visible notifications
    Ids,
}

/// Remote selected by settings.
enum Remote {
    File(FileFetcher),
    Missing(NoRemote),
}

impl NotificationFetcher for Remote {
    fn fetch(&self) -> Result<Notifications, FetchError> {
        match self {
            Self::File(fetcher) => fetcher.fetch(),
            Self::Missing(fetcher) => fetcher.fetch(),
        }
    }
}

type Service = NotificationService<FileCache, Remote>;

fn build_service(settings: &Settings) -> Service {
    let cache = FileCache::new(&settings.cache_path, settings.cache_ttl);
    let remote = match &settings.remote_path {
        Some(path) => Remote::File(FileFetcher::new(path)),
        None => Remote::Missing(NoRemote),
    };
    NotificationService::new(cache, remote)
}

pub fn run(command: Commands, settings: &Settings) -> Result<()> {
    let service = build_service(settings);

    match command {
        Commands::List { all, repo, force } => list(&service, all, repo.as_deref(), force),
        Commands::Sync { force } => sync(&service, force),
        Commands::Hide { ids } => {
            let changed = service.hide(&ids).context("Failed to hide notifications")?;
            println!("Hid {changed} notification(s)");
            Ok(())
        }
        Commands::Done { ids } => {
            let changed = service
                .mark_done(&ids)
                .context("Failed to mark notifications done")?;
            println!("Marked {changed} notification(s) done");
            Ok(())
        }
        Commands::Restore { ids } => {
            let changed = service
                .restore(&ids)
                .context("Failed to restore notifications")?;
            println!("Restored {changed} notification(s)");
            Ok(())
        }
        Commands::Ids => {
            let outcome = load(&service, false)?;
            for id in outcome.notifications.visible().ids() {
                println!("{id}");
            }
            Ok(())
        }
    }
}

fn list(service: &Service, all: bool, repo: Option<&str>, force: bool) -> Result<()> {
    let outcome = load(service, force)?;
    let mut notifications = if all {
        outcome.notifications
    } else {
        outcome.notifications.visible()
    };

    if let Some(pattern) = repo {
        notifications = filter_by_repo(&notifications, pattern)?;
    }

    println!("{}", listing(&notifications));
    Ok(())
}

/// Rendered lines followed by the count, one newline apart.
fn listing(notifications: &Notifications) -> String {
    format!(
        "{}\nFound {} notifications",
        notifications.render_lines(),
        notifications.len()
    )
}

fn sync(service: &Service, force: bool) -> Result<()> {
    if force {
        let outcome = service.refresh().context("Failed to refresh notifications")?;
        print_summary(&outcome.summary);
        return Ok(());
    }

    let outcome = load(service, false)?;
    match outcome.status {
        RefreshStatus::Fresh => println!(
            "Cache is fresh ({} notifications); use --force to refresh",
            outcome.notifications.len()
        ),
        RefreshStatus::Refreshed(summary) => print_summary(&summary),
        RefreshStatus::Stale(_) => {}
    }
    Ok(())
}

fn load(service: &Service, force: bool) -> Result<LoadOutcome> {
    let outcome = service
        .load(force)
        .context("Failed to load the notifications")?;
    if let RefreshStatus::Stale(err) = &outcome.status {
        warn!("event=cli_load module=cli status=degraded error={}", err);
        eprintln!("warning: showing cached notifications, refresh failed: {err}");
    }
    Ok(outcome)
}

fn filter_by_repo(notifications: &Notifications, pattern: &str) -> Result<Notifications> {
    let regex = Regex::new(pattern).with_context(|| format!("Invalid --repo pattern `{pattern}`"))?;
    let matching = notifications
        .iter()
        .filter(|n| regex.is_match(&n.repository.full_name))
        .map(|n| n.id.as_str());
    Ok(notifications.filter_from_ids(matching))
}

fn print_summary(summary: &SyncSummary) {
    println!(
        "Synced {} notifications: {} new, {} updated, {} kept, {} pinned, {} removed",
        summary.total(),
        summary.inserted,
        summary.updated,
        summary.missing_kept,
        summary.retained,
        summary.dropped
    );
}
