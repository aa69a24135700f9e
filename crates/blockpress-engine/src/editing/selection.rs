use std::sync::Arc;

use crate::editing::store::DocumentStore;
use crate::error::EditorError;
use crate::models::{Align, Block, BlockId, BlockKind, Format, ListItem, TextStyle};

/// What the toolbar is currently acting on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Selection {
    #[default]
    Unselected,
    Block(BlockId),
    /// A focused item inside a list block
    ListItem { block: BlockId, index: usize },
}

impl Selection {
    pub fn block_id(&self) -> Option<BlockId> {
        match self {
            Selection::Unselected => None,
            Selection::Block(id) | Selection::ListItem { block: id, .. } => Some(*id),
        }
    }

    pub fn list_item_index(&self) -> Option<usize> {
        match self {
            Selection::ListItem { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Sole owner of the selection/focus state
///
/// Formatting queries ("is bold active?") are answered here from the live
/// store rather than from any cached copy of the block.
#[derive(Debug, Default)]
pub struct SelectionRouter {
    current: Selection,
}

impl SelectionRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Selection {
        self.current
    }

    /// Select a whole block; returns whether the selection changed
    pub fn select_block(&mut self, store: &DocumentStore, id: BlockId) -> Result<bool, EditorError> {
        if store.get(id).is_none() {
            return Err(EditorError::BlockNotFound(id));
        }
        Ok(self.set(Selection::Block(id)))
    }

    /// Focus one item of a list block
    ///
    /// Moving between items of the same list goes straight from item to item.
    pub fn focus_list_item(
        &mut self,
        store: &DocumentStore,
        id: BlockId,
        index: usize,
    ) -> Result<bool, EditorError> {
        let block = store.get(id).ok_or(EditorError::BlockNotFound(id))?;
        let items = block.list_items().ok_or(EditorError::NotApplicable {
            field: "listItems",
            kind: block.kind(),
        })?;
        if index >= items.len() {
            return Err(EditorError::ListItemOutOfBounds {
                block: id,
                index,
                len: items.len(),
            });
        }
        Ok(self.set(Selection::ListItem { block: id, index }))
    }

    pub fn clear(&mut self) -> bool {
        self.set(Selection::Unselected)
    }

    /// Bring the selection back in line with the store after a mutation
    ///
    /// A deleted block drops the selection. A focused item past the end of a
    /// shrunken list clamps to the new last item, and an emptied list falls
    /// back to selecting the list block itself.
    pub fn reconcile(&mut self, store: &DocumentStore) -> bool {
        let next = match self.current {
            Selection::Unselected => Selection::Unselected,
            Selection::Block(id) => match store.get(id) {
                Some(_) => Selection::Block(id),
                None => Selection::Unselected,
            },
            Selection::ListItem { block, index } => match store.get(block) {
                None => Selection::Unselected,
                Some(found) => match found.list_items() {
                    Some(items) if items.is_empty() => Selection::Block(block),
                    Some(items) => Selection::ListItem {
                        block,
                        index: index.min(items.len() - 1),
                    },
                    None => Selection::Block(block),
                },
            },
        };
        self.set(next)
    }

    pub fn selected_block<'a>(&self, store: &'a DocumentStore) -> Option<&'a Arc<Block>> {
        self.current.block_id().and_then(|id| store.get(id))
    }

    pub fn focused_item<'a>(&self, store: &'a DocumentStore) -> Option<&'a ListItem> {
        let index = self.current.list_item_index()?;
        self.selected_block(store)?.list_items()?.get(index)
    }

    /// Style the toolbar toggles act on: the focused item's, else the block's
    ///
    /// A list block without a focused item has no style of its own to show.
    pub fn active_style(&self, store: &DocumentStore) -> Option<TextStyle> {
        if let Some(item) = self.focused_item(store) {
            return Some(item.text_style);
        }
        self.selected_block(store)
            .filter(|block| block.kind() != BlockKind::List)
            .map(|block| block.text_style)
    }

    pub fn is_format_active(&self, store: &DocumentStore, format: Format) -> bool {
        self.active_style(store)
            .is_some_and(|style| style.is_active(format))
    }

    pub fn active_align(&self, store: &DocumentStore) -> Option<Align> {
        if let Some(item) = self.focused_item(store) {
            return Some(item.align);
        }
        self.selected_block(store)
            .filter(|block| block.kind() != BlockKind::List)
            .map(|block| block.align)
    }

    fn set(&mut self, next: Selection) -> bool {
        let changed = self.current != next;
        self.current = next;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::patch::BlockPatch;
    use crate::models::ListItem;
    use pretty_assertions::assert_eq;

    fn list_store(items: &[&str]) -> (DocumentStore, BlockId) {
        let mut store = DocumentStore::new();
        let list = store
            .insert(
                BlockKind::List,
                &BlockPatch::new().list_items(items.iter().map(|s| ListItem::new(*s)).collect()),
            )
            .unwrap();
        (store, list.id)
    }

    fn shrink_to(store: &mut DocumentStore, id: BlockId, items: &[&str]) {
        store
            .update(
                id,
                &BlockPatch::new().list_items(items.iter().map(|s| ListItem::new(*s)).collect()),
            )
            .unwrap();
    }

    #[test]
    fn starts_unselected() {
        let router = SelectionRouter::new();
        assert_eq!(router.current(), Selection::Unselected);
    }

    #[test]
    fn selecting_unknown_block_fails() {
        let store = DocumentStore::new();
        let mut router = SelectionRouter::new();
        let id = BlockId::generate();
        assert_eq!(
            router.select_block(&store, id),
            Err(EditorError::BlockNotFound(id))
        );
        assert_eq!(router.current(), Selection::Unselected);
    }

    #[test]
    fn item_to_item_focus_skips_block_state() {
        let (store, list) = list_store(&["a", "b", "c"]);
        let mut router = SelectionRouter::new();

        router.focus_list_item(&store, list, 0).unwrap();
        assert!(router.focus_list_item(&store, list, 2).unwrap());
        assert_eq!(
            router.current(),
            Selection::ListItem {
                block: list,
                index: 2
            }
        );
        assert!(!router.focus_list_item(&store, list, 2).unwrap());
    }

    #[test]
    fn focus_rejects_non_list_and_bad_index() {
        let (mut store, list) = list_store(&["a"]);
        let paragraph = store
            .insert(BlockKind::Paragraph, &BlockPatch::new())
            .unwrap();
        let mut router = SelectionRouter::new();

        assert!(matches!(
            router.focus_list_item(&store, paragraph.id, 0),
            Err(EditorError::NotApplicable { .. })
        ));
        assert!(matches!(
            router.focus_list_item(&store, list, 1),
            Err(EditorError::ListItemOutOfBounds { len: 1, .. })
        ));
    }

    #[test]
    fn removing_focused_last_item_clamps_to_new_last() {
        let (mut store, list) = list_store(&["a", "b", "c"]);
        let mut router = SelectionRouter::new();
        router.focus_list_item(&store, list, 2).unwrap();

        shrink_to(&mut store, list, &["a", "b"]);
        assert!(router.reconcile(&store));
        assert_eq!(
            router.current(),
            Selection::ListItem {
                block: list,
                index: 1
            }
        );
    }

    #[test]
    fn emptied_list_reverts_to_block_selection() {
        let (mut store, list) = list_store(&["only"]);
        let mut router = SelectionRouter::new();
        router.focus_list_item(&store, list, 0).unwrap();

        shrink_to(&mut store, list, &[]);
        router.reconcile(&store);
        assert_eq!(router.current(), Selection::Block(list));
    }

    #[test]
    fn deleting_selected_block_unselects() {
        let (mut store, list) = list_store(&["a"]);
        let mut router = SelectionRouter::new();
        router.focus_list_item(&store, list, 0).unwrap();

        store.delete(list);
        router.reconcile(&store);
        assert_eq!(router.current(), Selection::Unselected);
    }

    #[test]
    fn format_queries_read_the_focused_item() {
        let (mut store, list) = list_store(&["a", "b"]);
        let mut items = store.get(list).unwrap().list_items().unwrap().to_vec();
        items[1].text_style.bold = true;
        store
            .update(list, &BlockPatch::new().list_items(items))
            .unwrap();

        let mut router = SelectionRouter::new();
        router.focus_list_item(&store, list, 0).unwrap();
        assert!(!router.is_format_active(&store, Format::Bold));

        router.focus_list_item(&store, list, 1).unwrap();
        assert!(router.is_format_active(&store, Format::Bold));

        router.select_block(&store, list).unwrap();
        assert_eq!(router.active_style(&store), None);
        assert_eq!(router.active_align(&store), None);
    }
}
