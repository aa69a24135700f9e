use crate::models::{BlockId, BlockKind};

/// Caller errors raised by editing operations
///
/// Each of these points at a bug in the calling code (a stale id, an index
/// past the end, a field the block type does not have). Conditions that are
/// just UI timing artifacts never show up here; those are silent no-ops.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditorError {
    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),
    #[error("Index {index} out of bounds for document of {len} blocks")]
    OutOfBounds { index: usize, len: usize },
    #[error("List item {index} out of bounds for block {block} with {len} items")]
    ListItemOutOfBounds {
        block: BlockId,
        index: usize,
        len: usize,
    },
    #[error("Duplicate block id: {0}")]
    DuplicateBlockId(BlockId),
    #[error("Heading level {0} is outside 1..=3")]
    InvalidHeadingLevel(u8),
    #[error("Spacing value {value} is outside -{max}..={max}")]
    SpacingOutOfRange { value: i8, max: i8 },
    #[error("`{field}` does not apply to {kind} blocks")]
    NotApplicable {
        field: &'static str,
        kind: BlockKind,
    },
}

/// Failure reported by the host's image upload collaborator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Upload failed: {0}")]
pub struct UploadError(pub String);
