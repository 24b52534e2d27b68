#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tessera_layout::{
    Delta, ItemRenderContext, LayoutConfig, LayoutEngine, LayoutHost, LayoutTree,
    MoveButtonClickEvent, MoveDirection, ResizeEvent, ResizeHandle, Size, validate,
};

const START: &str = r#"{
    "key": "root", "direction": "row", "children": [
        {"key": "sideBar", "width": 250, "minWidth": 120, "resizableRight": true},
        {"key": "noteList", "width": 250, "resizableRight": true},
        {"key": "editorColumn", "direction": "column", "children": [
            {"key": "toolbar", "height": 60, "resizableBottom": true},
            {"key": "editor", "minHeight": 200},
            {"key": "viewer", "visible": false}
        ]},
        {"key": "pluginPanels", "direction": "column", "children": []}
    ]
}"#;

#[derive(Debug, Arbitrary)]
enum Op {
    BeginResize { node: u8 },
    Resize { bottom: bool, dx: i16, dy: i16, finish: bool },
    AbandonResize,
    Move { node: u8, direction: u8 },
    Container { width: u16, height: u16 },
    MoveMode(bool),
}

#[derive(Default)]
struct Host {
    last: Option<LayoutTree>,
}

impl LayoutHost for Host {
    type Content = Size;

    fn render_item(&self, _key: &str, ctx: &ItemRenderContext) -> Size {
        ctx.size
    }

    fn on_resize(&mut self, event: ResizeEvent) {
        self.last = Some(event.layout);
    }

    fn on_move_button_click(&mut self, _event: MoveButtonClickEvent) {}
}

fuzz_target!(|ops: Vec<Op>| {
    let tree = LayoutTree::from_json(START).expect("seed layout parses");
    let mut engine = LayoutEngine::new(LayoutConfig::default(), tree, Size::new(1280, 720))
        .expect("seed layout is valid");
    let mut host = Host::default();

    for op in ops.into_iter().take(256) {
        let keys: Vec<String> = engine.layout().keys().into_iter().map(str::to_owned).collect();
        match op {
            Op::BeginResize { node } => {
                let _ = engine.begin_resize(&keys[usize::from(node) % keys.len()]);
            }
            Op::Resize {
                bottom,
                dx,
                dy,
                finish,
            } => {
                let handle = if bottom {
                    ResizeHandle::Bottom
                } else {
                    ResizeHandle::Right
                };
                let delta = Delta::new(i32::from(dx), i32::from(dy));
                if finish {
                    let _ = engine.end_resize(&mut host, handle, delta);
                } else {
                    let _ = engine.resize(&mut host, handle, delta);
                }
                if let Some(committed) = host.last.take() {
                    engine.set_layout(committed).expect("committed trees stay valid");
                }
            }
            Op::AbandonResize => engine.abandon_resize(),
            Op::Move { node, direction } => {
                let key = &keys[usize::from(node) % keys.len()];
                let direction = MoveDirection::ALL[usize::from(direction) % 4];
                let legal = engine.can_move(key, direction);
                assert_eq!(engine.perform_move(key, direction), legal);
            }
            Op::Container { width, height } => {
                engine.set_container_size(Size::new(u32::from(width), u32::from(height)));
            }
            Op::MoveMode(enabled) => engine.set_move_mode(enabled),
        }

        validate(engine.layout()).expect("engine trees stay valid");
        let frame = engine.render(&host);
        assert_eq!(frame.items.len(), engine.layout().node_count());
    }
});
