pub mod block;
pub mod style;

pub use block::{Block, BlockBody, BlockId, BlockKind, ImageBlock, ListBlock, ListItem};
pub use style::{
    Align, BulletIcon, FocalPoint, Format, HeadingLevel, ImageSize, ListKind, ListStyle, Spacing,
    TextStyle,
};
