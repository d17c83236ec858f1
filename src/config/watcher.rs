use anyhow::Result;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use tracing::{debug, error, info, warn};

/// Extensions read as descriptor or values files
pub const WATCHED_EXTENSIONS: [&str; 4] = ["json", "yaml", "yml", "toml"];

/// Watches the descriptor directory and the values file. `on_change` runs on
/// the watcher thread for every event touching a file the loader reads;
/// callers debounce.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
}

impl ConfigWatcher {
    pub fn new<F>(paths: Vec<String>, on_change: F) -> Result<Self>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let (tx, rx) = channel::<notify::Result<Event>>();
        let mut watcher = RecommendedWatcher::new(tx, notify::Config::default())?;

        let mut watched = Vec::new();
        for path in paths.iter().map(PathBuf::from) {
            if !path.exists() {
                warn!("Skipping missing path: {}", path.display());
                continue;
            }
            let mode = if path.is_dir() {
                RecursiveMode::NonRecursive
            } else {
                RecursiveMode::Recursive
            };
            watcher.watch(&path, mode)?;
            info!("Watching {}", path.display());
            watched.push(path);
        }

        std::thread::spawn(move || {
            for received in rx {
                match received {
                    Ok(event) if is_relevant(&event, &watched) => {
                        debug!("{:?} on {:?}", event.kind, event.paths);
                        on_change();
                    }
                    Ok(_) => {}
                    Err(e) => error!("Watch error: {}", e),
                }
            }
            debug!("Watcher channel closed");
        });

        Ok(Self { _watcher: watcher })
    }
}

/// Content changes to a descriptor-like file, or to one of the watched files
/// itself; reads and editor swap files are ignored
pub fn is_relevant(event: &Event, watched: &[PathBuf]) -> bool {
    if matches!(event.kind, EventKind::Access(_)) {
        return false;
    }
    event.paths.iter().any(|path| watched.iter().any(|w| w == path) || has_watched_extension(path))
}

fn has_watched_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| WATCHED_EXTENSIONS.contains(&ext))
}
