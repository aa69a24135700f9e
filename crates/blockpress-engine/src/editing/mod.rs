/*!
 * # Editing Core Module
 *
 * The document is an ordered array of typed blocks. Everything that changes
 * it goes through [`store::DocumentStore`], which never mutates in place: a
 * mutation builds a new array that shares every untouched block with the old
 * one, so a renderer can skip blocks whose pointer did not change.
 *
 * Interaction state sits around the store, each piece owned by one type:
 *
 * - **`selection`**: which block or list item the toolbar acts on
 * - **`toolbar`**: turns toolbar actions into patches scoped to that selection
 * - **`caret`**: splices text in at the live caret and puts the caret back
 *   after the next render
 * - **`reorder`**: drag-to-reorder, committing one move on drop
 * - **`focal`**: focal-point dragging on full-width images, throttled to one
 *   update per animation frame via **`scheduler`**
 * - **`autosize`**: keeps text inputs as tall as their content
 *
 * [`editor::Editor`] ties these together for a host UI and accepts scripted
 * [`editor::Cmd`]s.
 *
 * ## Usage Pattern
 *
 * ```rust
 * use blockpress_engine::editing::*;
 * use blockpress_engine::models::{BlockKind, Format};
 *
 * let mut editor = Editor::default();
 * let heading = editor.add_block(BlockKind::Heading, &BlockPatch::new().content("Hello")).unwrap();
 * editor.select_block(heading.id).unwrap();
 * editor.apply_toolbar(&ToolbarAction::ToggleFormat(Format::Bold)).unwrap();
 * assert!(editor.is_format_active(Format::Bold));
 * ```
 */

pub mod autosize;
pub mod caret;
pub mod editor;
pub mod focal;
pub mod patch;
pub mod reorder;
pub mod scheduler;
pub mod selection;
pub mod store;
pub mod toolbar;

pub use autosize::{AUTO_SIZE_STYLE, AutoSizeInput, Height, MeasuredElement};
pub use caret::{
    CaretInsertion, CaretService, InputRegistry, PendingCaret, TargetKey, TextInputHandle,
    splice_utf16,
};
pub use editor::{Applied, Cmd, Editor, EditorObserver};
pub use focal::{Cursor, FocalPointDrag, Pointer, Rect, focal_point_at};
pub use patch::BlockPatch;
pub use reorder::{DragFeedback, DragSession, Move, ReorderEngine, SortableDrag, array_move};
pub use scheduler::{CoalescingScheduler, Scheduled};
pub use selection::{Selection, SelectionRouter};
pub use store::{Blocks, DocumentStore};
pub use toolbar::{ToolGroup, ToolbarAction, ToolbarController};
