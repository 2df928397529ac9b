//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cstview::model::{Position, TextRange};
use cstview::render::{CstRenderer, MarkupBuilder, RenderError, RenderOutput};
use cstview::session_store::{KeyValueStore, MemoryStore, SessionStore, StoreError};
use cstview::translator::{NodeEntry, NodeId, NodeLookup};
use cstview::widget::{MemoryPanel, MemoryWidget};
use cstview::{App, SyncConfig};

pub const TIMEOUT: Duration = Duration::from_secs(5);

/// Text containing this marker fails to "parse"
pub const SYNTAX_ERROR: &str = "!!";

/// Text containing this marker makes the renderer panic
pub const RENDER_PANIC: &str = "boom";

/// Sources the renderer was called with, in call order
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// Renderer treating every whitespace-separated word as a node
///
/// Each non-blank line is a parent node spanning its first to last word.
/// Identities keep counting up across renders, so no two renders share one.
pub struct WordRenderer {
    calls: CallLog,
    next_id: Arc<AtomicU32>,
    delay: Duration,
    last: Option<NodeLookup>,
}

impl WordRenderer {
    pub fn new() -> (Self, CallLog) {
        Self::with_delay(Duration::ZERO)
    }

    pub fn with_delay(delay: Duration) -> (Self, CallLog) {
        let calls: CallLog = Arc::default();
        let renderer = Self {
            calls: Arc::clone(&calls),
            next_id: Arc::new(AtomicU32::new(0)),
            delay,
            last: None,
        };
        (renderer, calls)
    }
}

/// Word and line nodes for `source`, numbered from `first_id`
pub fn word_entries(source: &str, first_id: &AtomicU32) -> Vec<NodeEntry> {
    let mut entries = Vec::new();
    for (line_idx, line) in source.split('\n').enumerate() {
        let mut words = Vec::new();
        let mut start = None;
        for (col, ch) in line.chars().chain(std::iter::once(' ')).enumerate() {
            match (ch.is_whitespace(), start) {
                (false, None) => start = Some(col),
                (true, Some(s)) => {
                    words.push((s, col));
                    start = None;
                }
                _ => {}
            }
        }
        let (Some(first), Some(last)) = (words.first(), words.last()) else {
            continue;
        };
        let pos = |col: usize| Position::new(line_idx + 1, col + 1);
        entries.push(NodeEntry {
            id: NodeId(first_id.fetch_add(1, Ordering::SeqCst)),
            kind: "line".to_string(),
            range: TextRange::new(pos(first.0), pos(last.1)),
            depth: 0,
        });
        for &(s, e) in &words {
            entries.push(NodeEntry {
                id: NodeId(first_id.fetch_add(1, Ordering::SeqCst)),
                kind: "word".to_string(),
                range: TextRange::new(pos(s), pos(e)),
                depth: 1,
            });
        }
    }
    entries
}

impl CstRenderer for WordRenderer {
    fn render(&mut self, source: &str) -> Result<RenderOutput, RenderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(source.to_string());
        }
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        if source.contains(RENDER_PANIC) {
            panic!("renderer crashed on {:?}", source);
        }
        if source.contains(SYNTAX_ERROR) {
            return Err(RenderError::Parse {
                message: "unexpected input".to_string(),
                position: None,
            });
        }

        let entries = word_entries(source, &self.next_id);
        let mut builder = MarkupBuilder::new();
        for entry in &entries {
            builder.open(entry.id, &entry.kind, entry.range);
            builder.close();
        }
        let lookup = NodeLookup::new(entries);
        self.last = Some(lookup.clone());
        Ok(RenderOutput {
            markup: builder.finish(),
            lookup,
        })
    }

    fn locate(&self, line: usize, column: usize) -> Option<NodeId> {
        self.last.as_ref()?.node_at(Position::new(line, column))
    }
}

/// Memory store the test can inspect while the app owns it
#[derive(Clone, Default)]
pub struct SharedStore(pub Rc<RefCell<MemoryStore>>);

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.0.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.0.borrow_mut().set(key, value)
    }
}

/// Store whose writes always fail
#[derive(Clone, Default)]
pub struct BrokenStore {
    pub attempts: Rc<RefCell<usize>>,
}

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
        *self.attempts.borrow_mut() += 1;
        Err(StoreError::Unavailable("quota exceeded".to_string()))
    }
}

pub type TestApp = App<MemoryWidget, MemoryPanel>;

/// Config without debounce for deterministic tests
pub fn instant_config() -> SyncConfig {
    SyncConfig {
        debounce_ms: 0,
        ..SyncConfig::default()
    }
}

/// Started app over a word renderer, seeded with `text` via the store
pub fn started_app(text: &str, config: &SyncConfig) -> (TestApp, CallLog) {
    let (renderer, calls) = WordRenderer::new();
    let app = started_app_with(text, config, Box::new(renderer));
    (app, calls)
}

pub fn started_app_with(
    text: &str,
    config: &SyncConfig,
    renderer: Box<dyn CstRenderer>,
) -> TestApp {
    let mut store = SessionStore::in_memory();
    store.persist(text).expect("memory store accepts writes");
    let mut app = App::new(
        config,
        MemoryWidget::new(""),
        MemoryPanel::new(),
        renderer,
        store,
    )
    .expect("app should start");
    app.start(TIMEOUT).expect("initial render should finish");
    app
}

/// Pump until idle, failing the test on timeout
pub fn settle(app: &mut TestApp) {
    assert!(app.run_until_idle(TIMEOUT), "app did not become idle");
}

pub fn snapshot_calls(calls: &CallLog) -> Vec<String> {
    calls.lock().map(|c| c.clone()).unwrap_or_default()
}
