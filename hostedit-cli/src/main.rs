//! Command-line front-end for the host editor
//!
//! Every command that changes a host goes through an editing session, so a
//! host with a live terminal session picks up a new encoding immediately.

mod cli;
mod view;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use hostedit_app::adapters::{JsonFileHostRepository, LocalTerminalManager};
use hostedit_app::config::{AppConfig, ConfigService, FileConfigService};
use hostedit_app::{AppState, AppStateBuilder};
use hostedit_core::types::{EditRequest, HostId};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Command, Target};
use view::ConsoleView;

#[tokio::main]
async fn main() -> ExitCode {
    // logs go to stderr, command output to stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let store_path = match cli.store {
        Some(ref path) => path.clone(),
        None => config.resolve_store_path()?,
    };
    tracing::debug!("Using host store {store_path:?}");

    let state = AppStateBuilder::new()
        .host_repository(Arc::new(JsonFileHostRepository::new(store_path)))
        .session_service(Arc::new(LocalTerminalManager::new()))
        .config(config)
        .build()?;
    let _prewarm = state.run_startup();

    match cli.command {
        Command::Charsets => list_charsets(&state).await,
        Command::Hosts => list_hosts(&state).await,
        Command::Add {
            nickname,
            target,
            encoding,
        } => add_host(&state, &nickname, &target, encoding.as_deref()).await,
        Command::SetEncoding { id, encoding } => set_encoding(&state, id, &encoding).await,
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let service = match cli.config {
        Some(ref path) => FileConfigService::new(path),
        None => FileConfigService::platform_default()?,
    };
    let config = service
        .load()
        .with_context(|| format!("loading {}", service.path().display()))?;
    tracing::debug!("Loaded config from {:?}", service.path());
    Ok(config)
}

async fn list_charsets(state: &AppState) -> anyhow::Result<()> {
    let catalog = state.ctx.catalog().fetch().await;
    for (display, name) in catalog.iter() {
        if display == name {
            println!("{name}");
        } else {
            println!("{name}\t{display}");
        }
    }
    Ok(())
}

async fn list_hosts(state: &AppState) -> anyhow::Result<()> {
    for host in state.list_hosts().await? {
        let id = host.id.map_or_else(|| "-".to_string(), |id| id.to_string());
        println!(
            "{id}\t{}\t{}@{}:{}\t{}",
            host.nickname, host.username, host.hostname, host.port, host.encoding
        );
    }
    Ok(())
}

async fn add_host(
    state: &AppState,
    nickname: &str,
    target: &str,
    encoding: Option<&str>,
) -> anyhow::Result<()> {
    let target = Target::parse(target)?;

    let view = ConsoleView::new();
    let mut editor = state
        .open_editor(EditRequest::for_new_host(), view.clone())
        .await?;
    editor.start();
    editor.wait_for_catalog().await;

    let mut host = state.blank_host(nickname, &target.username, &target.hostname);
    if let Some(port) = target.port {
        host.port = port;
    }
    if let Some(input) = encoding {
        host.encoding = view
            .resolve_encoding(input)
            .ok_or_else(|| anyhow!("unknown encoding {input:?}, see `hostedit charsets`"))?;
    }

    editor.on_validated(host);
    let id = editor
        .on_commit()
        .await?
        .ok_or_else(|| anyhow!("host was not committed"))?;
    println!("{id}");
    Ok(())
}

async fn set_encoding(state: &AppState, raw_id: i64, input: &str) -> anyhow::Result<()> {
    let Some(id) = HostId::from_raw(raw_id) else {
        bail!("invalid host id {raw_id}");
    };

    let view = ConsoleView::new();
    let mut editor = state
        .open_editor(EditRequest::for_existing_host(id), view.clone())
        .await?;
    editor.start();
    editor.wait_for_catalog().await;
    if editor.session_settled().await && editor.live_bridge().is_some() {
        tracing::info!("Host {id} has a live session, it will switch to the new encoding");
    }

    let encoding = view
        .resolve_encoding(input)
        .ok_or_else(|| anyhow!("unknown encoding {input:?}, see `hostedit charsets`"))?;
    let host = editor
        .current_host()
        .cloned()
        .ok_or_else(|| anyhow!("host {id} has no record"))?
        .with_encoding(encoding.as_str());

    editor.on_validated(host);
    let Some(saved) = editor.on_commit().await? else {
        bail!("host {id} was not committed");
    };
    println!("{saved}\t{encoding}");
    Ok(())
}
