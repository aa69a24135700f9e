use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::editing::caret::{CaretInsertion, CaretService, InputRegistry, TargetKey, TextInputHandle};
use crate::editing::focal::{Cursor, FocalPointDrag, Pointer, Rect};
use crate::editing::patch::BlockPatch;
use crate::editing::reorder::{DragFeedback, Move, ReorderEngine};
use crate::editing::scheduler::Scheduled;
use crate::editing::selection::{Selection, SelectionRouter};
use crate::editing::store::{Blocks, DocumentStore};
use crate::editing::toolbar::{ToolGroup, ToolbarAction, ToolbarController};
use crate::error::{EditorError, UploadError};
use crate::io::{self, IoError};
use crate::models::{Align, Block, BlockId, BlockKind, Format, ImageSize, ListItem};
use crate::settings::EditorSettings;

/// Receives change notifications from an [`Editor`]
///
/// Called once per committed mutation and once per actual selection change.
pub trait EditorObserver {
    fn document_changed(&mut self, _blocks: &[Arc<Block>]) {}

    fn selection_changed(&mut self, _block: Option<&Block>, _list_item: Option<usize>) {}
}

/// A scripted editor operation
///
/// Covers every entry point that does not need a live text input, so a host
/// without a rendered page can replay edits.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "cmd", rename_all = "camelCase")]
pub enum Cmd {
    AddBlock {
        #[serde(rename = "type")]
        kind: BlockKind,
        #[serde(default)]
        after: Option<BlockId>,
        #[serde(default)]
        defaults: BlockPatch,
    },
    UpdateBlock {
        id: BlockId,
        patch: BlockPatch,
    },
    DeleteBlock {
        id: BlockId,
    },
    MoveBlock {
        from: usize,
        to: usize,
    },
    SelectBlock {
        id: BlockId,
    },
    FocusListItem {
        id: BlockId,
        index: usize,
    },
    ClearSelection,
    AddListItem {
        id: BlockId,
        #[serde(default)]
        after: Option<usize>,
    },
    RemoveListItem {
        id: BlockId,
        index: usize,
    },
    SetListItemContent {
        id: BlockId,
        index: usize,
        content: String,
    },
    Toolbar {
        action: ToolbarAction,
    },
    BeginDrag {
        index: usize,
    },
    HoverDrag {
        #[serde(default)]
        index: Option<usize>,
    },
    Drop,
    CancelDrag,
    FocalPointerDown {
        id: BlockId,
    },
    FocalPointerMove {
        pointer: Pointer,
        rect: Rect,
    },
    AnimationFrame,
    FocalPointerUp,
    UploadSucceeded {
        id: BlockId,
        url: String,
    },
    UploadFailed {
        id: BlockId,
        reason: String,
    },
}

/// State after a command was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    pub version: u64,
    pub selection: Selection,
    /// Id of the block the command created, if any
    pub created: Option<BlockId>,
}

/// The editing session the host UI talks to
///
/// Owns the document store and every piece of interaction state around it.
/// Each entry point reconciles the selection with the store afterwards and
/// notifies observers about what actually changed.
pub struct Editor {
    store: DocumentStore,
    router: SelectionRouter,
    inputs: InputRegistry,
    caret: CaretService,
    reorder: ReorderEngine,
    focal: FocalPointDrag,
    toolbar: ToolbarController,
    settings: EditorSettings,
    observers: Vec<Box<dyn EditorObserver>>,
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("store", &self.store)
            .field("selection", &self.router.current())
            .field("inputs", &self.inputs)
            .field("settings", &self.settings)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

impl Editor {
    pub fn new(settings: EditorSettings) -> Self {
        Self::from_store(DocumentStore::new(), settings)
    }

    /// Open an existing document
    pub fn with_blocks(blocks: Vec<Block>, settings: EditorSettings) -> Result<Self, EditorError> {
        Ok(Self::from_store(DocumentStore::from_blocks(blocks)?, settings))
    }

    fn from_store(store: DocumentStore, settings: EditorSettings) -> Self {
        Self {
            store: store.with_heading_level(settings.default_heading_level),
            router: SelectionRouter::new(),
            inputs: InputRegistry::new(),
            caret: CaretService::new(),
            reorder: ReorderEngine::new(),
            focal: FocalPointDrag::new(),
            toolbar: ToolbarController::new(&settings),
            settings,
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn EditorObserver>) {
        self.observers.push(observer);
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn blocks(&self) -> &Blocks {
        self.store.blocks()
    }

    pub fn version(&self) -> u64 {
        self.store.version()
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn selection(&self) -> Selection {
        self.router.current()
    }

    pub fn selected_block(&self) -> Option<&Arc<Block>> {
        self.router.selected_block(&self.store)
    }

    pub fn is_format_active(&self, format: Format) -> bool {
        self.router.is_format_active(&self.store, format)
    }

    pub fn active_align(&self) -> Option<Align> {
        self.router.active_align(&self.store)
    }

    pub fn available_tools(&self) -> Vec<ToolGroup> {
        self.toolbar.available_tools(self.router.current(), &self.store)
    }

    /// Slider position matching the selected block's spacing
    pub fn spacing_value(&self) -> Option<i8> {
        self.selected_block()
            .map(|block| self.toolbar.spacing_value(block.position))
    }

    /// Serialise the current document for the host's save trigger
    pub fn save(&self) -> Result<String, IoError> {
        io::save_blocks(self.store.blocks())
    }

    // Document

    pub fn add_block(
        &mut self,
        kind: BlockKind,
        defaults: &BlockPatch,
    ) -> Result<Arc<Block>, EditorError> {
        self.edit(|editor| editor.store.insert(kind, defaults))
    }

    pub fn add_block_after(
        &mut self,
        anchor: BlockId,
        kind: BlockKind,
        defaults: &BlockPatch,
    ) -> Result<Arc<Block>, EditorError> {
        self.edit(|editor| editor.store.insert_after(anchor, kind, defaults))
    }

    pub fn update_block(&mut self, id: BlockId, patch: &BlockPatch) -> Result<(), EditorError> {
        self.edit(|editor| editor.store.update(id, patch))
    }

    /// Remove a block; ends a focal-point drag on it
    pub fn delete_block(&mut self, id: BlockId) -> bool {
        if self.focal.target() == Some(id) {
            self.focal.pointer_up();
        }
        self.edit(|editor| Ok::<_, EditorError>(editor.store.delete(id).is_some()))
            .unwrap_or(false)
    }

    pub fn move_block(&mut self, from: usize, to: usize) -> Result<(), EditorError> {
        self.edit(|editor| editor.store.reorder(from, to))
    }

    // Selection

    pub fn select_block(&mut self, id: BlockId) -> Result<bool, EditorError> {
        self.edit(|editor| editor.router.select_block(&editor.store, id))
    }

    pub fn focus_list_item(&mut self, id: BlockId, index: usize) -> Result<bool, EditorError> {
        self.edit(|editor| editor.router.focus_list_item(&editor.store, id, index))
    }

    pub fn clear_selection(&mut self) -> bool {
        self.edit(|editor| Ok::<_, EditorError>(editor.router.clear()))
            .unwrap_or(false)
    }

    // List items

    /// Insert an empty item after `after` (or at the end) and focus it
    pub fn add_list_item(&mut self, id: BlockId, after: Option<usize>) -> Result<usize, EditorError> {
        self.edit(|editor| {
            let block = editor.store.get(id).ok_or(EditorError::BlockNotFound(id))?;
            let mut items = list_items_of(block)?.to_vec();
            let index = match after {
                None => items.len(),
                Some(after) if after < items.len() => after + 1,
                Some(after) => {
                    return Err(EditorError::ListItemOutOfBounds {
                        block: id,
                        index: after,
                        len: items.len(),
                    });
                }
            };
            items.insert(index, ListItem::default());
            editor
                .store
                .update(id, &BlockPatch::new().list_items(items))?;
            editor.router.focus_list_item(&editor.store, id, index)?;
            Ok(index)
        })
    }

    /// Remove an item; a focused item after it keeps its focus
    pub fn remove_list_item(&mut self, id: BlockId, index: usize) -> Result<ListItem, EditorError> {
        self.edit(|editor| {
            let block = editor.store.get(id).ok_or(EditorError::BlockNotFound(id))?;
            let mut items = list_items_of(block)?.to_vec();
            if index >= items.len() {
                return Err(EditorError::ListItemOutOfBounds {
                    block: id,
                    index,
                    len: items.len(),
                });
            }
            let removed = items.remove(index);
            editor
                .store
                .update(id, &BlockPatch::new().list_items(items))?;

            if let Selection::ListItem { block, index: focused } = editor.router.current() {
                if block == id && focused > index {
                    editor.router.focus_list_item(&editor.store, id, focused - 1)?;
                }
            }
            Ok(removed)
        })
    }

    pub fn set_list_item_content(
        &mut self,
        id: BlockId,
        index: usize,
        content: impl Into<String>,
    ) -> Result<(), EditorError> {
        let content = content.into();
        self.edit(|editor| {
            let block = editor.store.get(id).ok_or(EditorError::BlockNotFound(id))?;
            let patch = BlockPatch::edit_list_item(block, index, |item| item.content = content)?;
            editor.store.update(id, &patch)
        })
    }

    // Toolbar

    pub fn apply_toolbar(&mut self, action: &ToolbarAction) -> Result<(), EditorError> {
        self.edit(|editor| {
            editor
                .toolbar
                .apply(action, &mut editor.router, &mut editor.store)
        })
    }

    // Text inputs and caret

    pub fn register_input(&mut self, key: TargetKey, handle: Box<dyn TextInputHandle>) {
        self.inputs.register(key, handle);
    }

    pub fn unregister_input(&mut self, key: TargetKey) -> bool {
        self.inputs.unregister(key)
    }

    pub fn report_input_focus(&mut self, key: TargetKey) {
        self.inputs.report_focus(key);
    }

    /// Insert `text` at the caret of the last focused input
    ///
    /// Returns `None` when no input has been focused yet or it is gone.
    pub fn insert_at_caret(&mut self, text: &str) -> Result<Option<CaretInsertion>, EditorError> {
        let Some(key) = self.inputs.last_focused() else {
            log::debug!("no input has had focus; dropping insertion");
            return Ok(None);
        };
        self.insert_at_caret_for(key, text)
    }

    /// Insert `text` at the caret of the input for `key` and commit the result
    ///
    /// The caret is put back by [`Editor::after_render`].
    pub fn insert_at_caret_for(
        &mut self,
        key: TargetKey,
        text: &str,
    ) -> Result<Option<CaretInsertion>, EditorError> {
        let Some(block) = self.store.get(key.block_id()).cloned() else {
            log::debug!("input {key:?} belongs to a deleted block");
            return Ok(None);
        };
        let content = match key {
            TargetKey::Block(_) => block.content().map(str::to_owned),
            TargetKey::ListItem { index, .. } => block
                .list_items()
                .and_then(|items| items.get(index))
                .map(|item| item.content.clone()),
        };
        let Some(content) = content else {
            log::debug!("input {key:?} has no text in the current document");
            return Ok(None);
        };

        let Some(insertion) = self.caret.insert_at_caret(&self.inputs, key, &content, text) else {
            return Ok(None);
        };

        let committed = match key {
            TargetKey::Block(id) => {
                let patch = BlockPatch::new().content(insertion.new_content.clone());
                self.update_block(id, &patch)
            }
            TargetKey::ListItem { block: id, index } => {
                self.set_list_item_content(id, index, insertion.new_content.clone())
            }
        };
        if let Err(err) = committed {
            self.caret.cancel();
            return Err(err);
        }
        Ok(Some(insertion))
    }

    /// Host hook for after the view has re-rendered; restores a pending caret
    pub fn after_render(&mut self) -> bool {
        self.caret.restore(&mut self.inputs)
    }

    // Block drag

    pub fn begin_drag(&mut self, index: usize) -> Result<(), EditorError> {
        let len = self.store.len();
        if index >= len {
            return Err(EditorError::OutOfBounds { index, len });
        }
        self.reorder.begin(index);
        Ok(())
    }

    pub fn hover_drag(&mut self, index: Option<usize>) {
        self.reorder.hover(index);
    }

    pub fn drop_drag(&mut self) -> Result<Option<Move>, EditorError> {
        self.edit(|editor| editor.reorder.on_drop(&mut editor.store))
    }

    pub fn cancel_drag(&mut self) {
        self.reorder.cancel();
    }

    pub fn drag_feedback(&self, index: usize) -> DragFeedback {
        self.reorder.feedback(index)
    }

    // Focal point

    /// Start a focal-point drag; only full-width images can be re-anchored
    pub fn focal_pointer_down(&mut self, id: BlockId) -> Result<(), EditorError> {
        let block = self.store.get(id).ok_or(EditorError::BlockNotFound(id))?;
        match block.image() {
            Some(image) if image.size == ImageSize::Full => {
                self.focal.pointer_down(id);
                Ok(())
            }
            _ => Err(EditorError::NotApplicable {
                field: "focalPoint",
                kind: block.kind(),
            }),
        }
    }

    pub fn focal_pointer_move(&mut self, pointer: Pointer, rect: Rect) -> Option<Scheduled> {
        self.focal.pointer_move(pointer, rect)
    }

    /// Animation frame callback: commit the latest focal point, if any
    pub fn animation_frame(&mut self) -> Result<bool, EditorError> {
        let Some((id, point)) = self.focal.animation_frame() else {
            return Ok(false);
        };
        if self.store.get(id).is_none() {
            log::debug!("image {id} removed before its focal point update");
            return Ok(false);
        }
        self.update_block(id, &BlockPatch::new().focal_point(point))?;
        Ok(true)
    }

    pub fn focal_pointer_up(&mut self) -> bool {
        self.focal.pointer_up()
    }

    pub fn focal_cursor(&self) -> Cursor {
        self.focal.cursor()
    }

    pub fn focal_overlay_visible(&self) -> bool {
        self.focal.overlay_visible()
    }

    // Upload

    /// Consume the upload collaborator's result for an image block
    ///
    /// A failed upload leaves the block as it was. Returns whether the url
    /// was written.
    pub fn apply_upload_result(
        &mut self,
        id: BlockId,
        result: Result<String, UploadError>,
    ) -> Result<bool, EditorError> {
        let url = match result {
            Ok(url) => url,
            Err(err) => {
                log::warn!("image upload for {id} failed: {err}");
                return Ok(false);
            }
        };
        if self.store.get(id).is_none() {
            log::debug!("image {id} removed before its upload finished");
            return Ok(false);
        }
        self.update_block(id, &BlockPatch::new().url(url))?;
        Ok(true)
    }

    // Commands

    pub fn apply(&mut self, cmd: Cmd) -> Result<Applied, EditorError> {
        let mut created = None;
        match cmd {
            Cmd::AddBlock {
                kind,
                after,
                defaults,
            } => {
                let block = match after {
                    Some(anchor) => self.add_block_after(anchor, kind, &defaults)?,
                    None => self.add_block(kind, &defaults)?,
                };
                created = Some(block.id);
            }
            Cmd::UpdateBlock { id, patch } => self.update_block(id, &patch)?,
            Cmd::DeleteBlock { id } => {
                self.delete_block(id);
            }
            Cmd::MoveBlock { from, to } => self.move_block(from, to)?,
            Cmd::SelectBlock { id } => {
                self.select_block(id)?;
            }
            Cmd::FocusListItem { id, index } => {
                self.focus_list_item(id, index)?;
            }
            Cmd::ClearSelection => {
                self.clear_selection();
            }
            Cmd::AddListItem { id, after } => {
                self.add_list_item(id, after)?;
            }
            Cmd::RemoveListItem { id, index } => {
                self.remove_list_item(id, index)?;
            }
            Cmd::SetListItemContent { id, index, content } => {
                self.set_list_item_content(id, index, content)?
            }
            Cmd::Toolbar { action } => self.apply_toolbar(&action)?,
            Cmd::BeginDrag { index } => self.begin_drag(index)?,
            Cmd::HoverDrag { index } => self.hover_drag(index),
            Cmd::Drop => {
                self.drop_drag()?;
            }
            Cmd::CancelDrag => self.cancel_drag(),
            Cmd::FocalPointerDown { id } => self.focal_pointer_down(id)?,
            Cmd::FocalPointerMove { pointer, rect } => {
                self.focal_pointer_move(pointer, rect);
            }
            Cmd::AnimationFrame => {
                self.animation_frame()?;
            }
            Cmd::FocalPointerUp => {
                self.focal_pointer_up();
            }
            Cmd::UploadSucceeded { id, url } => {
                self.apply_upload_result(id, Ok(url))?;
            }
            Cmd::UploadFailed { id, reason } => {
                self.apply_upload_result(id, Err(UploadError(reason)))?;
            }
        }

        Ok(Applied {
            version: self.version(),
            selection: self.selection(),
            created,
        })
    }

    /// Run `op`, reconcile the selection, then notify observers of changes
    fn edit<R, E>(&mut self, op: impl FnOnce(&mut Self) -> Result<R, E>) -> Result<R, E> {
        let version = self.store.version();
        let selection = self.router.current();
        let len = self.store.len();

        let result = op(self);
        if self.store.len() != len && self.reorder.is_dragging() {
            log::debug!("block count changed mid-drag, cancelling the drag");
            self.reorder.cancel();
        }
        self.router.reconcile(&self.store);
        self.notify(version, selection);
        result
    }

    fn notify(&mut self, version: u64, selection: Selection) {
        if self.store.version() != version {
            let blocks = Arc::clone(self.store.blocks());
            for observer in &mut self.observers {
                observer.document_changed(&blocks);
            }
        }

        let current = self.router.current();
        if current != selection {
            let block = self.router.selected_block(&self.store).cloned();
            for observer in &mut self.observers {
                observer.selection_changed(block.as_deref(), current.list_item_index());
            }
        }
    }
}

fn list_items_of(block: &Block) -> Result<&[ListItem], EditorError> {
    block.list_items().ok_or(EditorError::NotApplicable {
        field: "listItems",
        kind: block.kind(),
    })
}
