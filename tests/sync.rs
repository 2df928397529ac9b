//! Event router tests: startup, cursor → node, click → range, failures

mod common;

use common::{instant_config, settle, snapshot_calls, started_app, SYNTAX_ERROR};
use cstview::model::{Position, SyncState, TextRange};
use cstview::widget::EditorWidget;
use cstview::NodeId;

const TEXT: &str = "alpha beta\n\ngamma";

// =============================================================================
// Startup
// =============================================================================

#[test]
fn test_startup_renders_before_input() {
    let (app, calls) = started_app(TEXT, &instant_config());

    assert_eq!(snapshot_calls(&calls), vec![TEXT.to_string()]);
    assert_eq!(app.session().sync_state, SyncState::Synced);
    assert!(!app.session().lookup.is_empty());
    assert!(app.panel().markup().contains("cst-node"));
    assert_eq!(app.widget().get_text(), TEXT);
}

#[test]
fn test_startup_does_not_persist_or_rerender_seed() {
    let (mut app, calls) = started_app(TEXT, &instant_config());
    settle(&mut app);
    assert_eq!(snapshot_calls(&calls).len(), 1);
    assert_eq!(app.session().document.revision(), 0);
}

// =============================================================================
// Cursor → node
// =============================================================================

#[test]
fn test_cursor_move_marks_node_and_updates_status() {
    let (mut app, _) = started_app(TEXT, &instant_config());

    app.widget_mut().move_cursor(Position::new(1, 8));
    settle(&mut app);

    let node = app.session().highlight.node().expect("`beta` is a node");
    let range = app.session().lookup.range_of(node).unwrap();
    assert_eq!(
        range,
        TextRange::new(Position::new(1, 7), Position::new(1, 11))
    );
    assert_eq!(app.panel().marked().len(), 1);
    assert_eq!(app.panel().marked()[0].0, node);
    assert_eq!(app.panel().scrolled_to(), Some(node));
    assert!(app.panel().status().contains("Ln 1, Col 8"));
    assert!(app.panel().status().contains(&format!("node {}", node)));
}

#[test]
fn test_cursor_on_blank_line_clears_node() {
    let (mut app, _) = started_app(TEXT, &instant_config());

    app.widget_mut().move_cursor(Position::new(1, 2));
    settle(&mut app);
    assert!(app.session().highlight.node().is_some());

    app.widget_mut().move_cursor(Position::new(2, 1));
    settle(&mut app);
    assert_eq!(app.session().highlight.node(), None);
    assert!(app.panel().marked().is_empty());
    assert!(!app.panel().status().contains("node"));
}

#[test]
fn test_cursor_past_last_token_is_not_found() {
    let (mut app, _) = started_app("alpha   ", &instant_config());
    app.widget_mut().move_cursor(Position::new(1, 8));
    settle(&mut app);
    assert_eq!(app.session().highlight.node(), None);
}

#[test]
fn test_shrinking_text_moves_status_to_clamped_cursor() {
    let (mut app, _) = started_app(TEXT, &instant_config());
    app.widget_mut().move_cursor(Position::new(3, 4));
    settle(&mut app);
    assert!(app.panel().status().contains("Ln 3, Col 4"));

    app.widget_mut().set_text("ab");
    settle(&mut app);

    assert_eq!(app.session().cursor, Position::new(1, 3));
    assert!(app.panel().status().contains("Ln 1, Col 3"));
    // 1:3 is past the last word of "ab"
    assert_eq!(app.session().highlight.node(), None);
}

#[test]
fn test_selection_length_in_status() {
    let (mut app, _) = started_app(TEXT, &instant_config());
    app.widget_mut()
        .select(TextRange::new(Position::new(1, 1), Position::new(1, 6)));
    settle(&mut app);
    assert!(app.panel().status().contains("5 selected"));
}

// =============================================================================
// Click → range
// =============================================================================

fn element_for(app: &common::TestApp, at: Position) -> String {
    app.session()
        .lookup
        .node_at(at)
        .expect("position is inside a node")
        .element_id()
}

#[test]
fn test_click_decorates_node_range() {
    let (mut app, _) = started_app(TEXT, &instant_config());

    let element = element_for(&app, Position::new(3, 1));
    app.panel().click(&element);
    settle(&mut app);

    let decorations = app.widget().decorations();
    assert_eq!(decorations.len(), 1);
    assert_eq!(
        decorations[0].range,
        TextRange::new(Position::new(3, 1), Position::new(3, 6))
    );
    assert_eq!(decorations[0].style_class, "cst-highlight");
    assert_eq!(app.widget().revealed(), Some(decorations[0].range));
}

#[test]
fn test_stale_click_after_rerender_clears_range() {
    let (mut app, _) = started_app(TEXT, &instant_config());

    let old_element = element_for(&app, Position::new(1, 1));
    app.panel().click(&old_element);
    settle(&mut app);
    assert_eq!(app.widget().decorations().len(), 1);

    // Re-render hands out fresh identities
    app.widget_mut().set_text("alpha beta delta");
    settle(&mut app);
    assert!(app.widget().decorations().is_empty());

    app.panel().click(&old_element);
    settle(&mut app);
    assert!(app.widget().decorations().is_empty());
    assert_eq!(app.session().highlight.range(), None);
}

#[test]
fn test_highlights_stay_exclusive() {
    let (mut app, _) = started_app(TEXT, &instant_config());

    let targets = [
        Position::new(1, 1),
        Position::new(1, 7),
        Position::new(3, 2),
        Position::new(2, 1),
        Position::new(1, 3),
    ];
    for at in targets {
        app.widget_mut().move_cursor(at);
        if let Some(id) = app.session().lookup.node_at(at) {
            app.panel().click(&id.element_id());
        }
        app.panel().click("cst-424242");
        if let Some(id) = app.session().lookup.node_at(at) {
            app.panel().click(&id.element_id());
        }
        settle(&mut app);

        assert!(app.widget().decorations().len() <= 1);
        assert!(app.panel().marked().len() <= 1);
    }
}

#[test]
fn test_non_node_element_click_is_a_miss() {
    let (mut app, _) = started_app(TEXT, &instant_config());
    app.panel().click("renderPanel");
    settle(&mut app);
    assert!(app.widget().decorations().is_empty());
}

// =============================================================================
// Render failures and empty buffers
// =============================================================================

#[test]
fn test_parse_error_keeps_last_good_render() {
    let (mut app, _) = started_app(TEXT, &instant_config());
    let good_markup = app.panel().markup().to_string();
    let good_ranges = app.session().lookup.covered_ranges();

    app.widget_mut().move_cursor(Position::new(3, 6));
    app.widget_mut().type_text(SYNTAX_ERROR);
    settle(&mut app);

    assert_eq!(app.session().sync_state, SyncState::Error);
    assert_eq!(app.panel().markup(), good_markup);
    assert_eq!(app.session().lookup.covered_ranges(), good_ranges);
    assert!(app.panel().status().contains("Parse error"));

    // Fixing the text recovers
    app.widget_mut().set_text("alpha");
    settle(&mut app);
    assert_eq!(app.session().sync_state, SyncState::Synced);
    assert_ne!(app.panel().markup(), good_markup);
}

#[test]
fn test_clearing_all_text() {
    let (mut app, _) = started_app(TEXT, &instant_config());
    app.widget_mut().move_cursor(Position::new(1, 1));
    settle(&mut app);

    app.widget_mut().set_text("");
    settle(&mut app);

    assert_eq!(app.session().sync_state, SyncState::Synced);
    assert!(app.session().lookup.is_empty());
    assert_eq!(app.session().highlight.node(), None);
    assert!(app.panel().marked().is_empty());

    app.widget_mut().move_cursor(Position::new(1, 1));
    app.panel().click(&NodeId(0).element_id());
    settle(&mut app);
    assert!(app.widget().decorations().is_empty());
}

#[test]
fn test_node_mark_follows_rerender() {
    let (mut app, _) = started_app(TEXT, &instant_config());
    app.widget_mut().move_cursor(Position::new(1, 2));
    settle(&mut app);
    let before = app.session().highlight.node().unwrap();

    app.widget_mut().move_cursor(Position::new(3, 6));
    app.widget_mut().type_text(" omega");
    app.widget_mut().move_cursor(Position::new(1, 2));
    settle(&mut app);

    let after = app.session().highlight.node().unwrap();
    assert_ne!(before, after, "renders reassign identities");
    assert_eq!(app.panel().marked().len(), 1);
    assert_eq!(app.panel().marked()[0].0, after);
}
