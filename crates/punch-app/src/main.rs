//! # punch-app
//!
//! Interactive punch-list shell: loads settings, signs in, and drives a
//! [`Controller`] from stdin while rendering its live snapshots and notices.
//!
//! ## Crate Position
//!
//! Top of the graph. Depends on every other `punch-*` crate; nothing depends
//! on it.

#![deny(unsafe_code)]

mod cli;
mod render;
mod shell;

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use futures::future::LocalBoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use metrics_exporter_prometheus::PrometheusHandle;
use punch_core::logging::init_subscriber;
use punch_runtime::bootstrap::{start, suggester_from_settings};
use punch_runtime::metrics::{install_recorder, render};
use punch_runtime::{Controller, Notice, View};
use punch_settings::{load_settings_from_path, settings_path};
use punch_store::{LocalIdentityProvider, MemoryStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};

use crate::cli::Cli;
use crate::render::{render_notice, render_unit, render_units};
use crate::shell::{Command, HELP};

/// Actions started from the shell and not yet finished.
type InFlight = FuturesUnordered<LocalBoxFuture<'static, ()>>;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let path = args.settings.clone().unwrap_or_else(settings_path);
    let mut settings = load_settings_from_path(&path)
        .with_context(|| format!("Failed to load settings from {}", path.display()))?;
    args.apply(&mut settings);
    settings.validate().context("Invalid settings")?;

    init_subscriber(&settings.logging.level, settings.logging.json);
    info!(settings = %path.display(), namespace = %settings.app.namespace, "starting");
    let metrics = install_recorder().context("Failed to install metrics recorder")?;

    let store = Arc::new(MemoryStore::new());
    let identity = LocalIdentityProvider::new();
    let suggester = suggester_from_settings(&settings.suggestions);

    let controller = match start(
        &settings,
        store,
        &identity,
        suggester,
        args.link.as_deref(),
    )
    .await
    {
        Ok(controller) => controller,
        Err(err) => {
            println!("{}", render_notice(&Notice::from(&err)));
            return Err(err).context("Startup failed");
        }
    };

    println!("type 'help' for commands");
    run_shell(controller, &metrics).await
}

/// Read commands until `quit`, Ctrl-C, or EOF (after in-flight actions
/// finish), redrawing on every snapshot.
///
/// Actions run concurrently with the feed, so a stalled gateway call holds
/// up only itself.
async fn run_shell(mut controller: Controller, metrics: &PrometheusHandle) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut notices = controller.subscribe_notices();
    let mut in_flight = InFlight::new();
    let mut stdin_open = true;
    let mut feed_live = controller.has_feed();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    while stdin_open || !in_flight.is_empty() {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    stdin_open = false;
                    continue;
                };
                match shell::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => dispatch(&mut controller, metrics, command, &mut in_flight),
                    Err(err) => println!("! {err}"),
                }
                feed_live = controller.has_feed();
            }
            update = controller.next_update(), if feed_live => {
                match update {
                    Some(update) => {
                        debug!(?update, "redraw");
                        println!("{}", render_view(&controller));
                    }
                    None => feed_live = false,
                }
            }
            Some(()) = in_flight.next(), if !in_flight.is_empty() => {}
            notice = notices.recv() => match notice {
                Ok(notice) => println!("{}", render_notice(&notice)),
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "notices lagged"),
                Err(RecvError::Closed) => break,
            },
            _ = &mut ctrl_c => break,
        }
    }

    while let Ok(notice) = notices.try_recv() {
        println!("{}", render_notice(&notice));
    }
    info!(abandoned = in_flight.len(), "shell closed");
    Ok(())
}

/// Run one command. Navigation and printing happen now; store and gateway
/// actions are queued on `in_flight`. Failures surface as notices.
fn dispatch(
    controller: &mut Controller,
    metrics: &PrometheusHandle,
    command: Command,
    in_flight: &mut InFlight,
) {
    let actions = controller.actions();
    match command {
        Command::Show => println!("{}", render_view(controller)),
        Command::Back => {
            let _ = controller.back();
        }
        Command::Open(name) => {
            let _ = controller.select_unit(name);
        }
        Command::Add { name, address } => queue(in_flight, async move {
            let _ = actions.add_unit(&name, &address).await;
        }),
        Command::Generate => queue(in_flight, async move {
            let _ = actions.generate_buildings().await;
        }),
        Command::Toggle { trade, index } => queue(in_flight, async move {
            let _ = actions.toggle_task(&trade, index).await;
        }),
        Command::Mark {
            trade,
            index,
            completed,
        } => queue(in_flight, async move {
            let _ = actions.set_task_completed(&trade, index, completed).await;
        }),
        Command::Task { trade, text } => queue(in_flight, async move {
            let _ = actions.add_task(&trade, &text).await;
        }),
        Command::Suggest(trade) => queue(in_flight, async move {
            let _ = actions.suggest_tasks(&trade).await;
        }),
        Command::Link => {
            if let Ok(link) = actions.share_link() {
                println!("{link}");
            }
        }
        Command::Metrics => {
            let text = render(metrics);
            if text.trim().is_empty() {
                println!("no metrics recorded yet");
            } else {
                println!("{}", text.trim_end());
            }
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
}

fn queue(in_flight: &mut InFlight, action: impl Future<Output = ()> + 'static) {
    in_flight.push(action.boxed_local());
}

fn render_view(controller: &Controller) -> String {
    match controller.view() {
        View::Home => render_units(controller.units()),
        View::UnitDetail(id) => controller
            .selected_unit()
            .map_or_else(|| format!("unit '{id}' (no data)"), render_unit),
    }
}
