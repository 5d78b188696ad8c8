//! File-watching preview loop

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use uimentor::{MentorConfig, PreviewCompositor};

use crate::{load_settings, read_optional, Sources};

/// Last seen contents of one watched file.
struct Watched {
    path: Option<PathBuf>,
    contents: String,
    unreadable: bool,
}

impl Watched {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        let contents = read_optional(path.as_deref())?;
        Ok(Self {
            path,
            contents,
            unreadable: false,
        })
    }

    /// Re-reads the file; returns the new contents if they changed.
    ///
    /// A read failure is logged once, when the file first becomes unreadable.
    fn refresh(&mut self) -> Option<String> {
        let path = self.path.as_deref()?;
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                if self.unreadable {
                    log::info!("{} is readable again", path.display());
                    self.unreadable = false;
                }
                if contents == self.contents {
                    return None;
                }
                self.contents = contents.clone();
                Some(contents)
            }
            Err(err) => {
                if !self.unreadable {
                    log::warn!("Failed to read {}: {}", path.display(), err);
                    self.unreadable = true;
                }
                None
            }
        }
    }

    fn file_name(&self) -> Option<OsString> {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_os_string())
    }
}

/// Directories to watch so that atomic saves (write + rename) are still seen.
fn watch_dirs<'a>(paths: impl IntoIterator<Item = &'a Path>) -> BTreeSet<PathBuf> {
    paths
        .into_iter()
        .map(|path| match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        })
        .collect()
}

fn touches(event: &Event, names: &[OsString]) -> bool {
    event
        .paths
        .iter()
        .filter_map(|path| path.file_name())
        .any(|name| names.iter().any(|watched| watched == name))
}

pub async fn run(config: &MentorConfig, sources: Sources) -> Result<()> {
    let out = sources
        .out
        .clone()
        .context("preview needs --out to write the composed document to")?;

    let mut settings = Watched::new(sources.settings.clone())?;
    let mut markup = Watched::new(sources.html.clone())?;
    let mut styles = Watched::new(sources.css.clone())?;
    let mut script = Watched::new(sources.js.clone())?;

    let mut compositor =
        PreviewCompositor::new(load_settings(settings.path.as_deref())?, config.debounce_ms);
    compositor.set_markup(markup.contents.clone(), 0);
    compositor.set_styles(styles.contents.clone(), 0);
    compositor.set_script(script.contents.clone(), 0);
    write(&out, compositor.flush())?;

    let sources_watched = [&settings, &markup, &styles, &script];
    let names: Vec<OsString> = sources_watched
        .iter()
        .filter_map(|watched| watched.file_name())
        .collect();
    let dirs = watch_dirs(
        sources_watched
            .iter()
            .filter_map(|watched| watched.path.as_deref()),
    );

    let (tx, mut events) = mpsc::unbounded_channel();
    let mut watcher: RecommendedWatcher =
        notify::recommended_watcher(move |event: notify::Result<Event>| {
            // The receiver only goes away when the loop below has ended.
            let _ = tx.send(event);
        })
        .context("Failed to start the file watcher")?;
    for dir in &dirs {
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", dir.display()))?;
    }

    println!(
        "Watching sources, writing {} (Ctrl-C to stop)",
        out.display()
    );

    let started = Instant::now();
    loop {
        let wake = compositor
            .deadline()
            .map(|deadline| started + Duration::from_millis(deadline));
        let settle = async move {
            match wake {
                Some(at) => tokio::time::sleep_until(at.into()).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            event = events.recv() => {
                match event {
                    Some(Ok(event)) if touches(&event, &names) => {}
                    Some(Ok(_)) => continue,
                    Some(Err(err)) => {
                        log::warn!("File watcher error: {}", err);
                        continue;
                    }
                    None => break,
                }
                let now = started.elapsed().as_millis() as u64;

                if let Some(text) = markup.refresh() {
                    compositor.set_markup(text, now);
                }
                if let Some(text) = styles.refresh() {
                    compositor.set_styles(text, now);
                }
                if let Some(text) = script.refresh() {
                    compositor.set_script(text, now);
                }
                if let Some(text) = settings.refresh() {
                    match serde_json::from_str(&text) {
                        Ok(parsed) => compositor.apply_settings(parsed, now),
                        Err(err) => log::warn!("Ignoring settings change: {}", err),
                    }
                }
            }
            _ = settle => {
                let now = started.elapsed().as_millis() as u64;
                if let Some(document) = compositor.poll(now) {
                    write(&out, document)?;
                    log::info!("Updated {}", out.display());
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

fn write(out: &Path, document: &str) -> Result<()> {
    std::fs::write(out, document).with_context(|| format!("Failed to write {}", out.display()))
}

#[cfg(test)]
mod tests {
    use notify::EventKind;

    use super::*;

    #[test]
    fn test_refresh_reports_changes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        std::fs::write(&path, "<p>one</p>").unwrap();

        let mut watched = Watched::new(Some(path.clone())).unwrap();
        assert_eq!(watched.refresh(), None);

        std::fs::write(&path, "<p>two</p>").unwrap();
        assert_eq!(watched.refresh().as_deref(), Some("<p>two</p>"));
        assert_eq!(watched.refresh(), None);
    }

    #[test]
    fn test_missing_file_is_flagged_until_readable_again() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("style.css");
        std::fs::write(&path, "a {}").unwrap();
        let mut watched = Watched::new(Some(path.clone())).unwrap();

        std::fs::remove_file(&path).unwrap();
        assert_eq!(watched.refresh(), None);
        assert!(watched.unreadable);
        assert_eq!(watched.refresh(), None);
        assert!(watched.unreadable);

        std::fs::write(&path, "b {}").unwrap();
        assert_eq!(watched.refresh().as_deref(), Some("b {}"));
        assert!(!watched.unreadable);
    }

    #[test]
    fn test_unwatched_source_never_refreshes() {
        let mut watched = Watched::new(None).unwrap();
        assert_eq!(watched.refresh(), None);
        assert_eq!(watched.file_name(), None);
    }

    #[test]
    fn test_watch_dirs_use_parent_or_cwd() {
        let dirs = watch_dirs([
            Path::new("index.html"),
            Path::new("site/style.css"),
            Path::new("site/app.js"),
        ]);
        let dirs: Vec<_> = dirs.into_iter().collect();
        assert_eq!(dirs, vec![PathBuf::from("."), PathBuf::from("site")]);
    }

    #[test]
    fn test_events_filtered_by_watched_name() {
        let names = vec![OsString::from("index.html")];
        let hit = Event::new(EventKind::Any).add_path(PathBuf::from("/tmp/site/index.html"));
        let miss = Event::new(EventKind::Any).add_path(PathBuf::from("/tmp/site/preview.html"));
        assert!(touches(&hit, &names));
        assert!(!touches(&miss, &names));
    }
}
