use serde::{Deserialize, Deserializer};

use crate::error::EditorError;
use crate::models::{
    Align, Block, BlockBody, BlockKind, FocalPoint, HeadingLevel, ImageSize, ListItem, ListStyle,
    Spacing, TextStyle,
};

/// Partial update of a block
///
/// Only the fields that are `Some` change. `list_items` and `position` replace
/// the whole sub-structure; there is no deep merge. `position: Some(None)`
/// clears any spacing offset.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BlockPatch {
    pub content: Option<String>,
    pub level: Option<HeadingLevel>,
    pub align: Option<Align>,
    pub text_style: Option<TextStyle>,
    pub url: Option<String>,
    pub alt: Option<String>,
    pub image_size: Option<ImageSize>,
    pub focal_point: Option<FocalPoint>,
    pub list_style: Option<ListStyle>,
    pub list_items: Option<Vec<ListItem>>,
    #[serde(default, deserialize_with = "present")]
    pub position: Option<Option<Spacing>>,
}

/// Distinguishes an explicit `null` from a missing field
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl BlockPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn level(mut self, level: HeadingLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }

    pub fn text_style(mut self, text_style: TextStyle) -> Self {
        self.text_style = Some(text_style);
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    pub fn image_size(mut self, size: ImageSize) -> Self {
        self.image_size = Some(size);
        self
    }

    pub fn focal_point(mut self, focal_point: FocalPoint) -> Self {
        self.focal_point = Some(focal_point);
        self
    }

    pub fn list_style(mut self, list_style: ListStyle) -> Self {
        self.list_style = Some(list_style);
        self
    }

    pub fn list_items(mut self, items: Vec<ListItem>) -> Self {
        self.list_items = Some(items);
        self
    }

    pub fn position(mut self, position: Option<Spacing>) -> Self {
        self.position = Some(position);
        self
    }

    /// Patch replacing the items of `block` with item `index` edited by `edit`
    ///
    /// The other items are carried over as they are.
    pub fn edit_list_item(
        block: &Block,
        index: usize,
        edit: impl FnOnce(&mut ListItem),
    ) -> Result<Self, EditorError> {
        let mut items = block
            .list_items()
            .ok_or(EditorError::NotApplicable {
                field: "listItems",
                kind: block.kind(),
            })?
            .to_vec();
        let len = items.len();
        let item = items
            .get_mut(index)
            .ok_or(EditorError::ListItemOutOfBounds {
                block: block.id,
                index,
                len,
            })?;
        edit(item);
        Ok(Self::new().list_items(items))
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Reject fields the block type does not have
    fn check_applicable(&self, kind: BlockKind) -> Result<(), EditorError> {
        let fields: [(&'static str, bool, bool); 9] = [
            ("content", self.content.is_some(), kind != BlockKind::List),
            ("level", self.level.is_some(), kind == BlockKind::Heading),
            ("url", self.url.is_some(), kind == BlockKind::Image),
            ("alt", self.alt.is_some(), kind == BlockKind::Image),
            ("imageSize", self.image_size.is_some(), kind == BlockKind::Image),
            ("focalPoint", self.focal_point.is_some(), kind == BlockKind::Image),
            ("listStyle", self.list_style.is_some(), kind == BlockKind::List),
            ("listItems", self.list_items.is_some(), kind == BlockKind::List),
            ("position", self.position.is_some(), true),
        ];

        match fields
            .iter()
            .find(|(_, supplied, applies)| *supplied && !*applies)
        {
            Some((field, _, _)) => Err(EditorError::NotApplicable {
                field: *field,
                kind,
            }),
            None => Ok(()),
        }
    }

    /// New block with this patch merged in; `block` itself is left untouched
    pub(crate) fn apply_to(&self, block: &Block) -> Result<Block, EditorError> {
        self.check_applicable(block.kind())?;

        let mut next = block.clone();
        if let Some(align) = self.align {
            next.align = align;
        }
        if let Some(text_style) = self.text_style {
            next.text_style = text_style;
        }
        if let Some(position) = self.position {
            next.position = position.and_then(Spacing::nonzero);
        }

        match &mut next.body {
            BlockBody::Heading { content, level } => {
                if let Some(text) = &self.content {
                    content.clone_from(text);
                }
                if let Some(new_level) = self.level {
                    *level = new_level;
                }
            }
            BlockBody::Paragraph { content } => {
                if let Some(text) = &self.content {
                    content.clone_from(text);
                }
            }
            BlockBody::Image(image) => {
                if let Some(text) = &self.content {
                    image.caption.clone_from(text);
                }
                if let Some(url) = &self.url {
                    image.url.clone_from(url);
                }
                if let Some(alt) = &self.alt {
                    image.alt.clone_from(alt);
                }
                if let Some(size) = self.image_size {
                    image.size = size;
                }
                if let Some(focal_point) = self.focal_point {
                    image.focal_point = focal_point.clamp();
                }
            }
            BlockBody::List(list) => {
                if let Some(style) = self.list_style {
                    list.list_style = style;
                }
                if let Some(items) = &self.list_items {
                    list.list_items.clone_from(items);
                }
            }
        }

        Ok(next)
    }
}
