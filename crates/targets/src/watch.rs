//! Reloading the policy when the configuration directory changes.

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use notify::Event;
use notify::EventKind;
use notify::RecommendedWatcher;
use notify::RecursiveMode;
use notify::Watcher;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::dir::ConfigDir;
use crate::dir::PATCH_LEVEL_FILE;
use crate::dir::TARGET_FILE;
use crate::dir::TEE_STATUS_FILE;
use crate::error::Result;
use crate::policy::TargetPolicy;

/// Watches a configuration directory and reloads a `TargetPolicy` whenever
/// one of its files is created, modified or removed.
///
/// Dropping the watcher stops the reload task.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl ConfigWatcher {
    /// Starts watching `root`. Must be called within a tokio runtime.
    pub fn spawn(policy: Arc<TargetPolicy>, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher = notify::recommended_watcher(move |event: notify::Result<Event>| {
            // the receiver is gone once the task stopped
            let _ = tx.send(event);
        })?;
        watcher.watch(&root, RecursiveMode::NonRecursive)?;
        info!("watching {}", root.display());

        let task = tokio::spawn(reload_on_change(policy, root, rx));
        Ok(Self { _watcher: watcher, task })
    }

}

impl Drop for ConfigWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn reload_on_change(
    policy: Arc<TargetPolicy>,
    root: PathBuf,
    mut rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
) {
    while let Some(event) = rx.recv().await {
        match event {
            Ok(event) if is_relevant(&event) => {
                debug!("config changed: {:?}", event.paths);
                match ConfigDir::load(&root).await {
                    Ok(config) => policy.reload(config).await,
                    Err(e) => error!("failed to reload {}: {e}", root.display()),
                }
            }
            Ok(_) => {}
            Err(e) => warn!("watch error on {}: {e}", root.display()),
        }
    }
    debug!("stopped watching {}", root.display());
}

fn is_relevant(event: &Event) -> bool {
    let changed = matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_));
    changed && event.paths.iter().any(|path| is_config_file(path))
}

fn is_config_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| [TARGET_FILE, PATCH_LEVEL_FILE, TEE_STATUS_FILE].contains(&name))
}
