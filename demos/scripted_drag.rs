//! Drives a structure board the way a drag-reorder widget would and prints what the host
//! would have to do. Run with `RUST_LOG=debug` to see the coordinator's transitions.

use egui::Key;
use egui_structure_board::structure_board::identifier::draggable_class;
use egui_structure_board::{
    BoardBuilder, BoardMode, ContainerId, DragInfo, ItemId, PageMode, PlacementQuery,
    PluginSettings, StructureBoardOptions,
};

fn main() {
    env_logger::init();

    let mut builder = BoardBuilder::new();
    let content = builder.placeholder(1, PluginSettings::placeholder());
    let sidebar = builder.placeholder(
        2,
        PluginSettings::placeholder().with_restriction(["TextPlugin", "LinkPlugin"]),
    );
    let _footer = builder.static_placeholder(3, PluginSettings::placeholder());
    let clipboard = builder.clipboard();

    let row = builder.plugin(1, content, PluginSettings::new("RowPlugin"));
    let _column = builder.plugin(
        2,
        row,
        PluginSettings::new("ColumnPlugin").with_parent_restriction(["RowPlugin"]),
    );
    let _text = builder.plugin(3, content, PluginSettings::new("TextPlugin"));
    let _copied = builder.plugin(4, clipboard, PluginSettings::new("LinkPlugin"));

    let options = StructureBoardOptions {
        debug_event_log: true,
        debug_integrity: true,
        ..Default::default()
    };
    let mut board = builder.finish_structure_board(PageMode::Edit, BoardMode::Structure, options);
    println!("events: {:?}", board.drain_events());

    let scripted = [
        (3, sidebar, 0),
        (2, sidebar, 0),
        (4, sidebar, 1),
        (3, ContainerId::Clipboard, 0),
    ];
    for (item, target, index) in scripted {
        let class = draggable_class(ItemId(item));
        let helper = board.helper(Some(&class));
        match board.drag_start(DragInfo::new(&class), helper) {
            Ok(effects) => println!("start {item}: {effects:?}"),
            Err(err) => {
                println!("start {item}: {err}");
                continue;
            }
        }

        let verdict = board.authorize(&PlacementQuery {
            target: Some(target),
            ancestor: None,
            moving: Some(&class),
        });
        println!("  {target:?}: {verdict:?}");

        let effects = board.before_stop(DragInfo::new(&class));
        println!("  before stop: {effects:?}");
        if verdict.is_allowed() {
            if let Err(err) = board.board_mut().move_item(ItemId(item), target, index) {
                println!("  move failed: {err}");
            }
        }
        match board.update(DragInfo::new(&class)) {
            Some(outcome) => println!("  {} -> {:?}", outcome.event.name(), outcome.effects),
            None => println!("  nothing to synchronize"),
        }
    }

    let class = draggable_class(ItemId(1));
    let helper = board.helper(Some(&class));
    if board.drag_start(DragInfo::new(&class), helper).is_ok() {
        println!("cancel: {:?}", board.key_up(Key::Escape));
    }

    println!("\n{}", board.debug_log_text());
}
