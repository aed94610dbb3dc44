//! CLI entry point for codely.

mod cli;

use clap::Parser;
use codely::app::{self, App, TaskContext};
use codely::build_info;
use codely::config::load_config;
use codely::error::{CodelyError, MuxError};
use codely::logging;
use codely::notify::Notifier;
use codely::orchestrator::Orchestrator;
use codely::paths;
use codely::shed::{ShedClient, ShedDriver};
use codely::store::Store;
use codely::tmux::{MuxDriver, TmuxClient};
use codely::ui::{render, terminal};
use std::io;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();
    if args.version {
        println!("{}", build_info::cli_version_text());
        return;
    }

    let log_path = args
        .debug_file
        .as_deref()
        .map(paths::expand_tilde)
        .unwrap_or_else(paths::default_log_path);
    if let Err(e) = logging::init(args.debug, &log_path) {
        eprintln!("warning: failed to open debug log {}: {e}", log_path.display());
    }

    if let Err(e) = run(args).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(args: cli::Args) -> Result<(), CodelyError> {
    let config = load_config(args.config.as_deref())?;
    let mux = Arc::new(TmuxClient::from_env());
    if !mux.in_workspace() {
        return Err(MuxError::NotInTmux.into());
    }
    if !terminal::is_interactive() {
        return Err(CodelyError::NotInteractive);
    }
    info!(version = %build_info::short_version(), "starting");

    let state_path = args
        .state
        .as_deref()
        .map(paths::expand_tilde)
        .unwrap_or_else(paths::default_state_path);
    let store = Arc::new(Store::new(state_path));
    store.load()?;
    info!(
        tmux_session = %store.tmux_session(),
        projects = store.projects().len(),
        "loaded state"
    );
    store.reconcile_against_live_panes(mux.as_ref()).await;
    store.save()?;

    let shed = ShedClient::new(config.shed.enabled);
    let shed: Option<Arc<dyn ShedDriver>> = if shed.available() {
        Some(Arc::new(shed))
    } else {
        info!("shed not available; remote projects disabled");
        None
    };

    let anchor = match mux.anchor_pane().await {
        Ok(anchor) => anchor,
        Err(e) => {
            warn!(error = %e, "anchor detection failed");
            None
        }
    };
    match anchor {
        Some(pane) => {
            if let Err(e) = mux.resize(pane, config.ui.manager_width).await {
                warn!(error = %e, "failed to resize manager pane");
            }
        }
        None => warn!("anchor pane not found; pane creation disabled until refresh"),
    }

    let orch = Orchestrator::new(mux.clone(), shed, anchor);
    let (tx, rx) = mpsc::unbounded_channel();
    let ctx = TaskContext {
        orch: orch.clone(),
        store: store.clone(),
        notifier: Arc::new(Mutex::new(Notifier::new())),
        manager_width: config.ui.manager_width,
        tx: tx.clone(),
    };
    let app = App::new(store, config, orch);

    let _guard = terminal::TerminalGuard::acquire()?;
    let _input = terminal::spawn_input_thread(tx)?;
    let mut stdout = io::stdout();
    app::run(app, ctx, rx, |app| {
        let (width, height) = terminal::size();
        let lines = render::view(app);
        if let Err(e) = render::draw(&mut stdout, &lines, width, height, true) {
            warn!(error = %e, "draw failed");
        }
    })
    .await;
    Ok(())
}
