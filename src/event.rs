//! Event hub: terminal input, selection changes, data-file changes and a
//! clock tick, merged into one channel the UI loop drains in order.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::StreamExt;
use notify_debouncer_mini::DebounceEventResult;
use tokio::sync::mpsc;

use trail_explorer::model::TrailId;
use trail_explorer::state::SelectionWatch;

const TICK: Duration = Duration::from_secs(1);
const DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    /// The trail data file was written, replaced or removed
    FilesChanged(Vec<PathBuf>),
    SelectionChanged(Option<TrailId>),
    Tick,
}

impl Event {
    /// Terminal events the UI cares about; key releases and focus/paste
    /// events are dropped.
    fn from_terminal(event: CrosstermEvent) -> Option<Self> {
        match event {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Self::Key(key)),
            CrosstermEvent::Mouse(mouse) => Some(Self::Mouse(mouse)),
            CrosstermEvent::Resize(..) => Some(Self::Resize),
            _ => None,
        }
    }
}

type Sender = mpsc::UnboundedSender<Event>;

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    pub fn new(data_path: PathBuf, watch_enabled: bool, selection: SelectionWatch) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(forward_terminal(tx.clone()));
        tokio::spawn(forward_selection(selection, tx.clone()));
        tokio::spawn(tick(tx.clone()));
        if watch_enabled {
            tokio::spawn(async move {
                if let Err(e) = watch_data_file(&data_path, tx).await {
                    tracing::error!(error = %e, path = %data_path.display(), "file watcher failed");
                }
            });
        }

        Self { rx }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

async fn forward_terminal(tx: Sender) {
    let mut reader = EventStream::new();
    while let Some(Ok(raw)) = reader.next().await {
        if let Some(event) = Event::from_terminal(raw) {
            if tx.send(event).is_err() {
                return;
            }
        }
    }
}

/// One event per observed selection value.  Values written faster than the
/// loop drains them collapse into the latest.
async fn forward_selection(mut selection: SelectionWatch, tx: Sender) {
    while let Some(selected) = selection.changed().await {
        if tx.send(Event::SelectionChanged(selected)).is_err() {
            return;
        }
    }
}

async fn tick(tx: Sender) {
    let mut interval = tokio::time::interval(TICK);
    loop {
        interval.tick().await;
        if tx.send(Event::Tick).is_err() {
            return;
        }
    }
}

/// Watch the directory holding the data file, not the file itself: editors
/// that save by rename would otherwise detach the watch after one write.
async fn watch_data_file(data_path: &Path, tx: Sender) -> color_eyre::Result<()> {
    let dir = data_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf();
    let name: Option<OsString> = data_path.file_name().map(OsString::from);

    let (changed_tx, mut changed_rx) = mpsc::channel::<Vec<PathBuf>>(16);
    let mut debouncer = notify_debouncer_mini::new_debouncer(
        DEBOUNCE,
        move |result: DebounceEventResult| {
            let Ok(events) = result else { return };
            let hits: Vec<PathBuf> = events
                .into_iter()
                .map(|e| e.path)
                .filter(|p| p.file_name() == name.as_deref())
                .collect();
            if !hits.is_empty() {
                let _ = changed_tx.blocking_send(hits);
            }
        },
    )?;
    debouncer
        .watcher()
        .watch(&dir, notify::RecursiveMode::NonRecursive)?;
    tracing::debug!(dir = %dir.display(), "watching trail data");

    // `debouncer` must outlive this loop or the watch stops
    while let Some(paths) = changed_rx.recv().await {
        if tx.send(Event::FilesChanged(paths)).is_err() {
            break;
        }
    }
    drop(debouncer);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn test_only_key_presses_pass() {
        let press = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        let release =
            KeyEvent::new_with_kind(KeyCode::Char('q'), KeyModifiers::NONE, KeyEventKind::Release);

        assert!(matches!(
            Event::from_terminal(CrosstermEvent::Key(press)),
            Some(Event::Key(_))
        ));
        assert!(Event::from_terminal(CrosstermEvent::Key(release)).is_none());
        assert!(Event::from_terminal(CrosstermEvent::FocusGained).is_none());
        assert!(matches!(
            Event::from_terminal(CrosstermEvent::Resize(80, 24)),
            Some(Event::Resize)
        ));
    }
}
