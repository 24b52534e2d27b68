//! End-to-end scenarios through the public engine API.

use std::cell::RefCell;
use std::rc::Rc;

use tessera_layout::{
    Delta, ItemRenderContext, LayoutConfig, LayoutEngine, LayoutError, LayoutEvent, LayoutHost,
    LayoutTree, MoveButtonClickEvent, MoveDirection, ResizeEvent, ResizeHandle, Size,
};
use tracing_test::traced_test;

const SIDEBAR_LAYOUT: &str = r#"{
    "key": "root",
    "direction": "row",
    "children": [
        {"key": "sidebar", "width": 200, "minWidth": 100, "resizableRight": true},
        {"key": "main"}
    ]
}"#;

const WORKSPACE_LAYOUT: &str = r#"{
    "key": "root",
    "direction": "row",
    "children": [
        {"key": "sideBar", "width": 250, "resizableRight": true},
        {"key": "noteList", "width": 250, "resizableRight": true},
        {"key": "editorColumn", "direction": "column", "children": [
            {"key": "toolbar", "height": 60, "resizableBottom": true},
            {"key": "editor"}
        ]},
        {"key": "pluginPanels", "direction": "column", "children": []}
    ]
}"#;

/// Host that adopts every tree the engine hands it, like an app persisting
/// its layout.
#[derive(Default)]
struct AppHost {
    layout: Option<LayoutTree>,
    clicks: Vec<MoveButtonClickEvent>,
}

impl LayoutHost for AppHost {
    type Content = Size;

    fn render_item(&self, _key: &str, ctx: &ItemRenderContext) -> Size {
        ctx.size
    }

    fn item_label(&self, key: &str) -> String {
        format!("Pane {key}")
    }

    fn on_resize(&mut self, event: ResizeEvent) {
        self.layout = Some(event.layout);
    }

    fn on_move_button_click(&mut self, event: MoveButtonClickEvent) {
        self.clicks.push(event);
    }
}

fn engine_for(json: &str, container: Size) -> LayoutEngine {
    let tree = LayoutTree::from_json(json).expect("valid json");
    LayoutEngine::new(LayoutConfig::default(), tree, container).expect("valid layout")
}

fn record_events(engine: &mut LayoutEngine) -> Rc<RefCell<Vec<LayoutEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let _id = engine.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    events
}

#[test]
fn sidebar_drag_clamps_to_minimum() {
    let mut engine = engine_for(SIDEBAR_LAYOUT, Size::new(1000, 600));
    let mut host = AppHost::default();
    assert_eq!(engine.sizes().get("sidebar"), Some(Size::new(200, 600)));
    assert_eq!(engine.sizes().get("main"), Some(Size::new(800, 600)));

    assert!(engine.begin_resize("sidebar"));
    assert!(engine.end_resize(&mut host, ResizeHandle::Right, Delta::new(-150, 0)));

    assert_eq!(engine.sizes().get("sidebar"), Some(Size::new(100, 600)));
    assert_eq!(engine.sizes().get("main"), Some(Size::new(900, 600)));
    let persisted = host.layout.take().expect("host received the layout");
    assert_eq!(persisted.find("sidebar").and_then(|n| n.width), Some(100));
    engine.set_layout(persisted).expect("engine accepts its own commit");
}

#[test]
fn drag_never_pushes_flexible_pane_off_screen() {
    let json = r#"{
        "key": "root",
        "direction": "row",
        "children": [
            {"key": "a", "width": 300, "resizableRight": true},
            {"key": "b", "width": 300, "resizableRight": true},
            {"key": "c"}
        ]
    }"#;
    let mut engine = engine_for(json, Size::new(1000, 600));
    let mut host = AppHost::default();

    assert!(engine.begin_resize("a"));
    assert_eq!(
        engine.resize_session().map(|session| session.max.width),
        Some(660)
    );
    assert!(engine.end_resize(&mut host, ResizeHandle::Right, Delta::new(700, 0)));

    let frame = engine.render(&host);
    let widths: Vec<(u32, u32)> = ["a", "b", "c"]
        .iter()
        .map(|key| {
            let rect = frame.get(key).expect("rendered").rect;
            (rect.x, rect.width)
        })
        .collect();
    assert_eq!(widths, vec![(0, 660), (660, 300), (960, 40)]);
}

#[test]
fn resize_updates_notify_subscribers() {
    let mut engine = engine_for(SIDEBAR_LAYOUT, Size::new(1000, 600));
    let mut host = AppHost::default();
    let events = record_events(&mut engine);

    assert!(engine.begin_resize("sidebar"));
    assert!(engine.resize(&mut host, ResizeHandle::Right, Delta::new(20, 0)));
    assert!(engine.resize(&mut host, ResizeHandle::Right, Delta::new(40, 0)));
    assert!(engine.end_resize(&mut host, ResizeHandle::Right, Delta::new(60, 0)));

    let widths: Vec<(bool, u32)> = events
        .borrow()
        .iter()
        .filter_map(|event| match event {
            LayoutEvent::Resizing { size, .. } => Some((false, size.width)),
            LayoutEvent::Resized { size, .. } => Some((true, size.width)),
            _ => None,
        })
        .collect();
    assert_eq!(widths, vec![(false, 220), (false, 240), (true, 260)]);
}

#[test]
fn main_cannot_move_up_at_root_level() {
    let engine = engine_for(SIDEBAR_LAYOUT, Size::new(1000, 600));
    assert!(!engine.can_move("main", MoveDirection::Up));
    assert!(!engine.can_move("main", MoveDirection::Down));
    assert!(engine.can_move("main", MoveDirection::Left));
}

#[test]
fn workspace_layout_geometry() {
    let engine = engine_for(WORKSPACE_LAYOUT, Size::new(1280, 720));
    let sizes = engine.sizes();
    assert_eq!(sizes.get("editorColumn"), Some(Size::new(780, 720)));
    assert_eq!(sizes.get("toolbar"), Some(Size::new(780, 60)));
    assert_eq!(sizes.get("editor"), Some(Size::new(780, 660)));

    let frame = engine.render(&AppHost::default());
    let panels = frame.get("pluginPanels").expect("rendered");
    assert!(!panels.visible);
    let editor = frame.get("editor").expect("rendered");
    assert_eq!(editor.rect.x, 500);
    assert_eq!(editor.rect.y, 60);
    // The toolbar's bottom handle belongs to the toolbar; the editor keeps
    // its full area.
    assert_eq!(editor.content, Some(Size::new(780, 660)));
    assert_eq!(
        frame.get("noteList").and_then(|item| item.content),
        Some(Size::new(245, 720))
    );
    assert_eq!(frame.visible_leaves().count(), 4);
}

#[test]
fn move_mode_round_trip() {
    let mut engine = engine_for(WORKSPACE_LAYOUT, Size::new(1280, 720));
    let mut host = AppHost::default();
    let events = record_events(&mut engine);

    engine.set_move_mode(true);
    let frame = engine.render(&host);
    assert!(frame.get("pluginPanels").is_some_and(|item| item.visible));
    let controls = frame
        .get("editor")
        .and_then(|item| item.move_controls.clone())
        .expect("leaf controls");
    assert_eq!(controls.label, "Pane editor");

    assert!(engine.click_move_button(&mut host, "editor", MoveDirection::Left));
    let click = host.clicks.pop().expect("click forwarded");
    assert!(engine.perform_move(&click.item_key, click.direction));

    let keys: Vec<&str> = engine
        .layout()
        .root()
        .children()
        .iter()
        .map(|child| child.key.as_str())
        .collect();
    assert_eq!(
        keys,
        vec!["sideBar", "noteList", "editor", "editorColumn", "pluginPanels"]
    );
    // "toolbar" is now alone in its column and lost its fixed height.
    assert_eq!(engine.layout().find("toolbar").and_then(|n| n.height), None);
    assert_eq!(
        events.borrow().as_slice(),
        &[LayoutEvent::Moved {
            key: "editor".into(),
            direction: MoveDirection::Left,
        }]
    );

    let frame = engine.render(&host);
    let focus = frame
        .get("editor")
        .and_then(|item| item.move_controls.as_ref())
        .and_then(|controls| controls.auto_focus);
    assert_eq!(focus, Some(MoveDirection::Left));

    let json = engine.layout().to_json().expect("serializes");
    assert_eq!(LayoutTree::from_json(&json).expect("parses"), *engine.layout());
}

#[test]
#[traced_test]
fn resize_after_node_removed_is_a_noop() {
    let mut engine = engine_for(SIDEBAR_LAYOUT, Size::new(1000, 600));
    let mut host = AppHost::default();
    assert!(engine.begin_resize("sidebar"));

    let without = LayoutTree::from_json(r#"{"key":"root","direction":"row","children":[{"key":"main"}]}"#)
        .expect("valid json");
    engine.set_layout(without).expect("valid layout");
    assert!(!engine.resize(&mut host, ResizeHandle::Right, Delta::new(40, 0)));
    assert!(host.layout.is_none());
    assert!(logs_contain("layout.resize.stale"));
}

#[test]
#[traced_test]
fn invalid_layout_is_rejected_and_logged() {
    let mut engine = engine_for(SIDEBAR_LAYOUT, Size::new(1000, 600));
    let ambiguous = LayoutTree::from_json(
        r#"{"key":"root","direction":"row","children":[{"key":"a","width":10},{"key":"b","width":20}]}"#,
    )
    .expect("valid json");
    let err = engine.set_layout(ambiguous).expect_err("ambiguous sizing");
    assert!(matches!(err, LayoutError::AmbiguousSizing { .. }));
    assert_eq!(err.key(), Some("b"));
    assert!(engine.layout().contains_key("sidebar"));
    assert!(logs_contain("layout.engine.rejected"));
}

#[test]
fn root_without_children_is_rejected() {
    let tree = LayoutTree::from_json(r#"{"key":"root","direction":"column","children":[]}"#)
        .expect("valid json");
    let err = LayoutEngine::new(LayoutConfig::default(), tree, Size::new(800, 600))
        .expect_err("empty root");
    assert!(matches!(err, LayoutError::EmptyRoot { .. }));
}

#[test]
fn malformed_json_is_reported() {
    let err = LayoutTree::from_json(r#"{"key": "root", "direction": "diagonal"}"#)
        .expect_err("unknown direction");
    assert!(matches!(err, LayoutError::Json(_)));
}

#[test]
fn config_changes_default_minimums() {
    let config = LayoutConfig::from_json(r#"{"defaultMinWidth": 300}"#).expect("valid json");
    let tree = LayoutTree::from_json(SIDEBAR_LAYOUT).expect("valid json");
    let mut engine = LayoutEngine::new(config, tree, Size::new(1000, 600)).expect("valid");
    let mut host = AppHost::default();

    assert!(engine.begin_resize("sidebar"));
    assert_eq!(
        engine.resize_session().map(|session| session.max.width),
        Some(700)
    );
    assert!(engine.end_resize(&mut host, ResizeHandle::Right, Delta::new(900, 0)));
    assert_eq!(engine.sizes().get("sidebar").map(|s| s.width), Some(700));
    assert_eq!(engine.sizes().get("main").map(|s| s.width), Some(300));
}
