//! File watching for fragment and template changes.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Events emitted by the file watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// Something under the components directory changed
    ComponentChanged(PathBuf),

    /// Something under the templates directory changed
    TemplateChanged(PathBuf),
}

/// Watches the components and templates directories.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Watch `components_dir` and, if given, `templates_dir`.
    ///
    /// A directory that does not exist yet is watched through its nearest
    /// existing ancestor, so creating it later is still reported. Returns the
    /// watcher and a channel of events; dropping the watcher stops the events.
    pub fn new(
        components_dir: &Path,
        templates_dir: Option<&Path>,
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        let components = watch_target(components_dir);
        let templates = templates_dir.and_then(watch_target);

        let mut roots: Vec<&PathBuf> = Vec::new();
        for target in components.iter().chain(templates.iter()) {
            if !roots.contains(&&target.root) {
                roots.push(&target.root);
            }
        }
        for root in roots {
            watcher
                .watch(root, RecursiveMode::Recursive)
                .map_err(std::io::Error::other)?;
        }

        let components = components.map(|t| t.dir);
        let templates = templates.map(|t| t.dir);

        std::thread::spawn(move || {
            forward_events(
                &sync_rx,
                &async_tx,
                components.as_deref(),
                templates.as_deref(),
            );
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Quiet period that ends a burst of events.
const DEBOUNCE: Duration = Duration::from_millis(100);

/// Coalesce raw events and forward each distinct change once a burst ends.
///
/// Only events that classify as a change join the burst, so access events
/// around a write never hide it.
fn forward_events(
    rx: &mpsc::Receiver<notify::Event>,
    tx: &async_mpsc::Sender<WatchEvent>,
    components: Option<&Path>,
    templates: Option<&Path>,
) {
    let mut pending: Vec<WatchEvent> = Vec::new();

    loop {
        let event = if pending.is_empty() {
            match rx.recv() {
                Ok(event) => event,
                Err(_) => return,
            }
        } else {
            match rx.recv_timeout(DEBOUNCE) {
                Ok(event) => event,
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    if !flush(&mut pending, tx) {
                        return;
                    }
                    continue;
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    flush(&mut pending, tx);
                    return;
                }
            }
        };

        for path in &event.paths {
            if let Some(change) = classify_event(path, &event.kind, components, templates) {
                if !pending.contains(&change) {
                    pending.push(change);
                }
            }
        }
    }
}

/// Send every pending change. Returns false once the receiver is gone.
fn flush(pending: &mut Vec<WatchEvent>, tx: &async_mpsc::Sender<WatchEvent>) -> bool {
    for change in pending.drain(..) {
        if tx.blocking_send(change).is_err() {
            return false;
        }
    }
    true
}

/// Where to register a watch for a directory, and the absolute path that
/// events under it will carry.
struct WatchTarget {
    root: PathBuf,
    dir: PathBuf,
}

fn watch_target(dir: &Path) -> Option<WatchTarget> {
    // notify reports absolute paths
    if let Ok(canonical) = dir.canonicalize() {
        return Some(WatchTarget {
            root: canonical.clone(),
            dir: canonical,
        });
    }

    let absolute = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(dir)
    };

    let mut ancestor = absolute.parent();
    while let Some(candidate) = ancestor {
        if let Ok(existing) = candidate.canonicalize() {
            let rest = absolute.strip_prefix(candidate).ok()?;
            return Some(WatchTarget {
                dir: existing.join(rest),
                root: existing,
            });
        }
        ancestor = candidate.parent();
    }

    None
}

/// Classify a notify event by which watched directory it falls under.
fn classify_event(
    path: &Path,
    kind: &notify::EventKind,
    components: Option<&Path>,
    templates: Option<&Path>,
) -> Option<WatchEvent> {
    use notify::EventKind;

    if !matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) {
        return None;
    }

    if components.is_some_and(|dir| path.starts_with(dir)) {
        Some(WatchEvent::ComponentChanged(path.to_path_buf()))
    } else if templates.is_some_and(|dir| path.starts_with(dir)) {
        Some(WatchEvent::TemplateChanged(path.to_path_buf()))
    } else {
        None
    }
}
