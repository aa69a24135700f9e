//! Drag-to-reorder for top-level blocks.
//!
//! The sortable-list interaction itself belongs to the host. It reports where
//! the drag started and which slot the pointer is over through [`DragSession`];
//! the store is only touched once, when the block is dropped.

use crate::editing::store::DocumentStore;
use crate::error::EditorError;

/// Move the element at `from` so it ends up at index `to`
///
/// Indices past the end leave the order unchanged.
pub fn array_move<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut next = items.to_vec();
    if from >= next.len() || to >= next.len() || from == to {
        return next;
    }
    let item = next.remove(from);
    next.insert(to, item);
    next
}

/// What a drag implementation knows about the gesture in progress
pub trait DragSession {
    fn source_index(&self) -> usize;
    /// Slot under the pointer, `None` when outside every drop target
    fn hover_index(&self) -> Option<usize>;
}

/// Drag state tracked by the editor while a block is being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortableDrag {
    pub source: usize,
    pub hover: Option<usize>,
}

impl DragSession for SortableDrag {
    fn source_index(&self) -> usize {
        self.source
    }

    fn hover_index(&self) -> Option<usize> {
        self.hover
    }
}

/// Visual state of one block while a drag is in progress
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragFeedback {
    /// This is the block being dragged
    pub dragging: bool,
    /// The drop indicator should be drawn at this block
    pub drop_target: bool,
}

impl DragFeedback {
    pub fn opacity(&self) -> f32 {
        if self.dragging { 0.5 } else { 1.0 }
    }
}

/// A committed move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Default)]
pub struct ReorderEngine {
    active: Option<SortableDrag>,
}

impl ReorderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, source: usize) {
        self.active = Some(SortableDrag {
            source,
            hover: Some(source),
        });
    }

    /// Track the slot under the pointer; never touches the store
    pub fn hover(&mut self, index: Option<usize>) {
        if let Some(drag) = &mut self.active {
            drag.hover = index;
        }
    }

    pub fn session(&self) -> Option<&SortableDrag> {
        self.active.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn feedback(&self, index: usize) -> DragFeedback {
        match &self.active {
            Some(drag) => DragFeedback {
                dragging: drag.source == index,
                drop_target: drag.hover == Some(index) && drag.source != index,
            },
            None => DragFeedback::default(),
        }
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// Finish the tracked drag and commit it
    pub fn on_drop(&mut self, store: &mut DocumentStore) -> Result<Option<Move>, EditorError> {
        match self.active.take() {
            Some(drag) => Self::commit(&drag, store),
            None => Ok(None),
        }
    }

    /// Commit a finished gesture reported by any drag implementation
    ///
    /// Dropping outside a target, or back onto the source slot, keeps the
    /// current order.
    pub fn commit(
        session: &impl DragSession,
        store: &mut DocumentStore,
    ) -> Result<Option<Move>, EditorError> {
        let from = session.source_index();
        let Some(to) = session.hover_index() else {
            log::debug!("drag from {from} ended outside any drop target");
            return Ok(None);
        };
        if from == to {
            return Ok(None);
        }

        store.reorder(from, to)?;
        Ok(Some(Move { from, to }))
    }
}
