use serde::Deserialize;

use crate::editing::scheduler::{CoalescingScheduler, Scheduled};
use crate::models::{BlockId, FocalPoint};

/// Bounding box of the image container in client coordinates
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Pointer position in client coordinates
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Grab,
    Grabbing,
}

/// Pointer position as a clamped percentage of `rect`
///
/// Pointers outside the box clamp to its edge. A collapsed box yields `None`.
pub fn focal_point_at(pointer: Pointer, rect: Rect) -> Option<FocalPoint> {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return None;
    }
    Some(FocalPoint::clamped(
        (pointer.x - rect.left) / rect.width * 100.0,
        (pointer.y - rect.top) / rect.height * 100.0,
    ))
}

/// Turns a pointer drag across an image into a focal point
///
/// Moves are throttled to one update per animation frame: every move replaces
/// the pending point and the frame callback takes whichever came last.
/// Pointer-up is expected from a document-level listener so a drag that leaves
/// the image still ends.
#[derive(Debug, Default)]
pub struct FocalPointDrag {
    target: Option<BlockId>,
    frames: CoalescingScheduler<FocalPoint>,
}

impl FocalPointDrag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_down(&mut self, block: BlockId) {
        self.frames.cancel();
        self.target = Some(block);
    }

    /// Queue the point under the pointer for the next frame
    ///
    /// Returns `None` when no drag is active or the box has no area.
    pub fn pointer_move(&mut self, pointer: Pointer, rect: Rect) -> Option<Scheduled> {
        self.target?;
        let point = focal_point_at(pointer, rect)?;
        Some(self.frames.schedule(point))
    }

    /// Frame callback: the coalesced point to commit, if any
    pub fn animation_frame(&mut self) -> Option<(BlockId, FocalPoint)> {
        let target = self.target?;
        self.frames.run().map(|point| (target, point))
    }

    /// End the drag and drop any update still waiting for a frame
    pub fn pointer_up(&mut self) -> bool {
        if self.frames.cancel().is_some() {
            log::debug!("discarding focal point update queued before pointer-up");
        }
        self.target.take().is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<BlockId> {
        self.target
    }

    pub fn cursor(&self) -> Cursor {
        if self.is_dragging() {
            Cursor::Grabbing
        } else {
            Cursor::Grab
        }
    }

    pub fn overlay_visible(&self) -> bool {
        self.is_dragging()
    }
}
