//! Watch command implementation.
//!
//! Editor events arrive as JSON lines on stdin. Every interval the current
//! snapshot is printed (and published when enabled). An optional second
//! timer publishes the latest snapshot on its own cadence. Everything runs
//! on one thread inside a single `select!` loop.

use anyhow::{Context, Result};
use context_logger_core::{EditorEvent, Session};
use context_logger_publish::Publisher;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval, Interval, MissedTickBehavior};

use super::output;
use crate::OutputFormat;

/// Runs the watch command.
pub fn run(
    interval_secs: Option<u64>,
    publish: bool,
    format: OutputFormat,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = super::load_config(config_path)?;
    let session = super::session(&config)?;
    let publisher = publish.then(|| super::publisher(&config)).transpose()?;

    let settings = WatchSettings {
        tick: Duration::from_secs(interval_secs.unwrap_or(config.logger.interval_secs).max(1)),
        auto_commit: config.publish.auto_commit_secs.map(Duration::from_secs),
        publish_on_tick: config.publish.on_tick,
        format,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;
    runtime.block_on(watch(session, publisher.as_ref(), &settings))
}

struct WatchSettings {
    tick: Duration,
    auto_commit: Option<Duration>,
    publish_on_tick: bool,
    format: OutputFormat,
}

async fn watch(
    mut session: Session,
    publisher: Option<&Publisher>,
    settings: &WatchSettings,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut ticker = interval(settings.tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    let mut auto_commit = match (publisher, settings.auto_commit) {
        (Some(_), Some(period)) => {
            let mut timer = interval(period);
            timer.tick().await;
            Some(timer)
        }
        _ => None,
    };

    tracing::info!(
        "Logging every {}s{}",
        settings.tick.as_secs(),
        if publisher.is_some() { ", publishing" } else { "" }
    );

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("Failed to read stdin")? {
                    Some(line) => handle_line(&mut session, &line, settings.format)?,
                    None => {
                        tracing::info!("Event stream closed, stopping");
                        break;
                    }
                }
            }

            _ = ticker.tick() => {
                let snapshot = session.snapshot();
                output::print_snapshot(&snapshot, settings.format)?;
                if settings.publish_on_tick {
                    if let Some(publisher) = publisher {
                        super::publish_logged(publisher, &snapshot);
                    }
                }
            }

            () = next_tick(&mut auto_commit) => {
                if let Some(publisher) = publisher {
                    tracing::debug!("Auto-commit");
                    super::publish_logged(publisher, &session.snapshot());
                }
            }

            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping");
                break;
            }
        }
    }

    Ok(())
}

/// Applies one stdin line; malformed lines are logged and skipped.
fn handle_line(session: &mut Session, line: &str, format: OutputFormat) -> Result<()> {
    if line.trim().is_empty() {
        return Ok(());
    }
    match serde_json::from_str::<EditorEvent>(line) {
        Ok(event) => {
            if let Some(snapshot) = session.handle(&event) {
                output::print_snapshot(&snapshot, format)?;
            }
        }
        Err(e) => tracing::warn!("Ignoring malformed event: {}", e),
    }
    Ok(())
}

/// Completes on the timer's next tick, or never without a timer.
async fn next_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => std::future::pending().await,
    }
}
