//! Effect execution on the tokio runtime.
//!
//! Each effect becomes one spawned task that reports back with a single
//! [`Msg`]. Tasks never touch the model; a closed channel just means the
//! loop has already stopped.

use super::messages::{Effect, Msg, ShedAction};
use super::{poll, TaskContext};
use crate::error::ShedError;
use crate::shed::ShedDriver;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub fn spawn_effect(effect: Effect, ctx: &TaskContext) {
    let ctx = ctx.clone();
    tokio::spawn(async move {
        if let Some(msg) = run_effect(effect, &ctx).await {
            if ctx.tx.send(msg).is_err() {
                debug!("event loop gone; dropping task result");
            }
        }
    });
}

async fn run_effect(effect: Effect, ctx: &TaskContext) -> Option<Msg> {
    let orch = &ctx.orch;
    match effect {
        Effect::Create(plan) => {
            let outcome = orch.create(plan).await;
            if outcome.result.is_ok() {
                if let Some(anchor) = orch.anchor() {
                    if let Err(e) = orch.mux().resize(anchor, ctx.manager_width).await {
                        debug!(error = %e, "anchor resize failed");
                    }
                }
            }
            Some(Msg::PaneCreated(outcome))
        }
        Effect::Show(plan) => Some(Msg::PanesSwapped(orch.show(plan).await)),
        Effect::Hide(plan) => Some(Msg::PaneHidden(orch.hide(plan).await)),
        Effect::Kill(plan) => Some(Msg::PaneKilled(orch.kill(plan).await)),
        Effect::Reconcile => Some(Msg::VisibilityReconciled(orch.reconcile().await)),
        Effect::Poll(targets) => {
            let shed = orch.shed().map(|s| s.as_ref());
            let updates = poll::poll_statuses(orch.mux().as_ref(), shed, targets).await;
            Some(Msg::StatusPolled(updates))
        }
        Effect::KillOrphan(pane) => match orch.mux().kill(pane).await {
            Ok(()) => None,
            Err(e) => {
                warn!(pane = %pane, error = %e, "failed to kill orphaned pane");
                None
            }
        },
        Effect::Focus(pane) => orch
            .mux()
            .focus(pane)
            .await
            .err()
            .map(|e| Msg::TaskFailed(e.to_string())),
        Effect::Notify(items) => {
            ctx.notifier
                .lock()
                .await
                .update(orch.mux().as_ref(), &items)
                .await;
            None
        }
        Effect::LoadFolders(roots) => {
            let folders = tokio::task::spawn_blocking(move || list_folders(&roots))
                .await
                .unwrap_or_default();
            Some(Msg::FoldersLoaded(folders))
        }
        Effect::LoadSheds => {
            let result = match orch.shed() {
                Some(shed) => shed.list().await,
                None => Err(ShedError::Unavailable),
            };
            Some(Msg::ShedsLoaded(result))
        }
        Effect::Shed(action, name) => {
            let result = match orch.shed() {
                Some(shed) => match action {
                    ShedAction::Start => shed.start(&name).await,
                    ShedAction::Stop => shed.stop(&name).await,
                    ShedAction::Delete => shed.delete(&name, true).await,
                },
                None => Err(ShedError::Unavailable),
            };
            Some(Msg::ShedActionDone {
                name,
                action,
                result,
            })
        }
        Effect::CreateShed { name, mut opts } => {
            let result = match orch.shed() {
                Some(shed) => {
                    if opts.server.is_none() {
                        opts.server = default_server(shed.as_ref()).await;
                    }
                    shed.create(&name, &opts).await
                }
                None => Err(ShedError::Unavailable),
            };
            let server = opts.server.unwrap_or_default();
            Some(Msg::ShedCreated {
                name,
                server,
                result,
            })
        }
        Effect::Save => {
            let store = ctx.store.clone();
            match tokio::task::spawn_blocking(move || store.save()).await {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(Msg::TaskFailed(format!("saving state failed: {e}"))),
                Err(e) => Some(Msg::TaskFailed(format!("saving state failed: {e}"))),
            }
        }
    }
}

/// The server `shed` marks as default, if the list can be read.
async fn default_server(shed: &dyn ShedDriver) -> Option<String> {
    match shed.list_servers().await {
        Ok(servers) => servers.into_iter().find(|s| s.default).map(|s| s.name),
        Err(e) => {
            debug!(error = %e, "shed server list failed");
            None
        }
    }
}

/// Non-hidden subdirectories of each root, sorted per root. Unreadable
/// roots are skipped.
pub fn list_folders(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut folders = Vec::new();
    for root in roots {
        match subdirectories(root) {
            Ok(mut found) => {
                found.sort();
                folders.extend(found);
            }
            Err(e) => debug!(root = %root.display(), error = %e, "skipping workspace root"),
        }
    }
    folders
}

fn subdirectories(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if !hidden && entry.file_type()?.is_dir() {
            found.push(entry.path());
        }
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Notifier;
    use crate::orchestrator::Orchestrator;
    use crate::shed::ShedState;
    use crate::store::Store;
    use crate::testsupport::{FakeMux, FakeShed, TestTempDir, ANCHOR};
    use std::sync::Arc;
    use tokio::sync::{mpsc, Mutex};

    fn context(
        dir: &TestTempDir,
        shed: Option<Arc<FakeShed>>,
    ) -> (Arc<FakeMux>, TaskContext, mpsc::UnboundedReceiver<Msg>) {
        let mux = Arc::new(FakeMux::new());
        let shed = shed.map(|s| s as Arc<dyn ShedDriver>);
        let (tx, rx) = mpsc::unbounded_channel();
        let ctx = TaskContext {
            orch: Orchestrator::new(mux.clone(), shed, Some(ANCHOR)),
            store: Arc::new(Store::new(dir.child("session.json"))),
            notifier: Arc::new(Mutex::new(Notifier::new())),
            manager_width: 38,
            tx,
        };
        (mux, ctx, rx)
    }

    #[test]
    fn folders_skip_hidden_entries_and_files() {
        let dir = TestTempDir::new("codely-folders");
        dir.write_text("ws/beta/README", "x");
        dir.write_text("ws/alpha/README", "x");
        dir.write_text("ws/.git/HEAD", "x");
        dir.write_text("ws/notes.txt", "x");

        let folders = list_folders(&[dir.child("ws"), dir.child("missing")]);
        assert_eq!(folders, vec![dir.child("ws/alpha"), dir.child("ws/beta")]);
    }

    #[tokio::test]
    async fn focus_failure_is_reported() {
        let dir = TestTempDir::new("codely-tasks");
        let (mux, ctx, _rx) = context(&dir, None);
        mux.fail_next("select-pane", 1);
        let msg = run_effect(Effect::Focus(ANCHOR), &ctx).await;
        assert!(matches!(msg, Some(Msg::TaskFailed(_))));
        assert!(run_effect(Effect::Focus(ANCHOR), &ctx).await.is_none());
    }

    #[tokio::test]
    async fn sheds_without_driver_are_unavailable() {
        let dir = TestTempDir::new("codely-tasks");
        let (_mux, ctx, _rx) = context(&dir, None);
        let msg = run_effect(Effect::LoadSheds, &ctx).await;
        assert!(matches!(msg, Some(Msg::ShedsLoaded(Err(ShedError::Unavailable)))));
    }

    #[tokio::test]
    async fn shed_actions_report_back() {
        let dir = TestTempDir::new("codely-tasks");
        let shed = Arc::new(FakeShed::with_sheds(&[("dev", "box", ShedState::Running)]));
        let (_mux, ctx, _rx) = context(&dir, Some(shed.clone()));
        let msg = run_effect(Effect::Shed(ShedAction::Stop, "dev".into()), &ctx).await;
        assert!(matches!(
            msg,
            Some(Msg::ShedActionDone { action: ShedAction::Stop, result: Ok(()), .. })
        ));
        assert_eq!(shed.calls(), vec!["stop dev"]);
    }

    #[tokio::test]
    async fn created_shed_lands_on_default_server() {
        let dir = TestTempDir::new("codely-tasks");
        let shed = Arc::new(FakeShed::with_sheds(&[]));
        let (_mux, ctx, _rx) = context(&dir, Some(shed.clone()));
        let effect = Effect::CreateShed {
            name: "dev".into(),
            opts: crate::shed::CreateOpts::default(),
        };
        let msg = run_effect(effect, &ctx).await;
        assert!(matches!(
            msg,
            Some(Msg::ShedCreated { ref server, result: Ok(()), .. }) if server == "local"
        ));
        assert_eq!(shed.calls(), vec!["create dev"]);
    }

    #[tokio::test]
    async fn spawned_effect_sends_one_message() {
        let dir = TestTempDir::new("codely-tasks");
        let (_mux, ctx, mut rx) = context(&dir, None);
        spawn_effect(Effect::Reconcile, &ctx);
        let msg = rx.recv().await;
        assert!(matches!(msg, Some(Msg::VisibilityReconciled(Ok(_)))));
    }

    #[tokio::test]
    async fn save_writes_state_file() {
        let dir = TestTempDir::new("codely-tasks");
        let (_mux, ctx, _rx) = context(&dir, None);
        assert!(run_effect(Effect::Save, &ctx).await.is_none());
        assert!(dir.child("session.json").exists());
    }
}
