// SPDX-License-Identifier: GPL-3.0-only

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{Duration, SystemTime};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{APP_NAME, Config};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const LOG_PREFIX: &str = "diskmap.log";
const LOG_DIR_ENV: &str = "DISKMAP_LOG_DIR";
const KEEP_DAYS: u64 = 7;

/// Install the global subscriber.
///
/// Stdout belongs to the rendered map, so console logs go to stderr. The
/// optional file layer rolls daily.
pub fn init(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(config));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_timer(tracing_subscriber::fmt::time::SystemTime);

    if !config.log_to_disk {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
        return;
    }

    match file_writer() {
        Ok((writer, guard)) => {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .with_timer(tracing_subscriber::fmt::time::SystemTime);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(stderr_layer)
                .with(file_layer)
                .init();

            // Keep the background logging worker alive for the duration of the process.
            let _ = LOG_GUARD.set(guard);
        }
        Err(e) => {
            eprintln!("{APP_NAME}: failed to initialize file logging: {e:#}");
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stderr_layer)
                .init();
        }
    }
}

fn default_filter(config: &Config) -> EnvFilter {
    let level = config.log_level.as_directive();
    // Our crates at the configured level, HTTP internals stay quiet.
    let directives = format!(
        "warn,diskmap={level},storage_contracts={level},storage_types={level},hyper=warn,reqwest=warn"
    );
    EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(level))
}

fn file_writer() -> anyhow::Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let dir = log_dir(
        std::env::var_os(LOG_DIR_ENV),
        std::env::var_os("XDG_STATE_HOME"),
        std::env::var_os("HOME"),
    );

    if let Err(e) = fs::create_dir_all(&dir) {
        return Err(anyhow::anyhow!(
            "create log directory failed: {} ({})",
            dir.display(),
            e
        ));
    }

    cleanup_old_logs(&dir, LOG_PREFIX);

    let appender = tracing_appender::rolling::daily(&dir, LOG_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    Ok((writer, guard))
}

fn log_dir(explicit: Option<OsString>, xdg_state: Option<OsString>, home: Option<OsString>) -> PathBuf {
    if let Some(dir) = explicit {
        return PathBuf::from(dir);
    }

    if let Some(xdg_state) = xdg_state {
        return PathBuf::from(xdg_state).join(APP_NAME).join("logs");
    }

    if let Some(home) = home {
        return PathBuf::from(home)
            .join(".local")
            .join("state")
            .join(APP_NAME)
            .join("logs");
    }

    std::env::temp_dir().join(APP_NAME).join("logs")
}

fn cleanup_old_logs(dir: &Path, prefix: &str) {
    let cutoff = SystemTime::now().checked_sub(Duration::from_secs(KEEP_DAYS * 24 * 60 * 60));
    let Some(cutoff) = cutoff else { return };

    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }

        // Only touch files created by our rolling appender.
        if !entry.file_name().to_string_lossy().starts_with(prefix) {
            continue;
        }

        let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
            continue;
        };
        if modified >= cutoff {
            continue;
        }

        let _ = fs::remove_file(entry.path());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_log_dir_wins() {
        let dir = log_dir(
            Some("/var/log/dm".into()),
            Some("/state".into()),
            Some("/home/op".into()),
        );
        assert_eq!(dir, PathBuf::from("/var/log/dm"));
    }

    #[test]
    fn log_dir_falls_back_through_state_and_home() {
        assert_eq!(
            log_dir(None, Some("/state".into()), Some("/home/op".into())),
            PathBuf::from("/state/diskmap/logs")
        );
        assert_eq!(
            log_dir(None, None, Some("/home/op".into())),
            PathBuf::from("/home/op/.local/state/diskmap/logs")
        );
    }

    #[test]
    fn default_filter_builds_for_every_level() {
        for raw in ["error", "warn", "info", "debug", "trace"] {
            let config = Config::from_toml_str(&format!("log_level = \"{raw}\"")).unwrap();
            let filter = default_filter(&config);
            let rendered = filter.to_string().to_lowercase();
            assert!(rendered.contains(&format!("diskmap={raw}")), "{rendered}");
        }
    }
}
