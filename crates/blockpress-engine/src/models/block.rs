use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::style::{Align, FocalPoint, HeadingLevel, ImageSize, ListStyle, Spacing, TextStyle};

/// Stable block identifier
///
/// Assigned once when a block is created and never reused. Reordering moves a
/// block but keeps its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub Uuid);

impl BlockId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Heading,
    Paragraph,
    Image,
    List,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Heading => "heading",
            BlockKind::Paragraph => "paragraph",
            BlockKind::Image => "image",
            BlockKind::List => "list",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry of a list block with its own style and alignment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub text_style: TextStyle,
    #[serde(default)]
    pub align: Align,
}

impl ListItem {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBlock {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default, rename = "content")]
    pub caption: String,
    #[serde(default, rename = "imageSize")]
    pub size: ImageSize,
    #[serde(default)]
    pub focal_point: FocalPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBlock {
    #[serde(default)]
    pub list_style: ListStyle,
    /// May be empty, never absent
    #[serde(default)]
    pub list_items: Vec<ListItem>,
}

/// Type-specific part of a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockBody {
    Heading {
        #[serde(default)]
        content: String,
        level: HeadingLevel,
    },
    Paragraph {
        #[serde(default)]
        content: String,
    },
    Image(ImageBlock),
    List(ListBlock),
}

impl BlockBody {
    /// Body of a freshly added block of `kind`
    pub fn empty(kind: BlockKind, heading_level: HeadingLevel) -> Self {
        match kind {
            BlockKind::Heading => BlockBody::Heading {
                content: String::new(),
                level: heading_level,
            },
            BlockKind::Paragraph => BlockBody::Paragraph {
                content: String::new(),
            },
            BlockKind::Image => BlockBody::Image(ImageBlock {
                url: String::new(),
                alt: String::new(),
                caption: String::new(),
                size: ImageSize::default(),
                focal_point: FocalPoint::CENTER,
            }),
            BlockKind::List => BlockBody::List(ListBlock {
                list_style: ListStyle::default(),
                list_items: vec![ListItem::default()],
            }),
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            BlockBody::Heading { .. } => BlockKind::Heading,
            BlockBody::Paragraph { .. } => BlockKind::Paragraph,
            BlockBody::Image(_) => BlockKind::Image,
            BlockBody::List(_) => BlockKind::List,
        }
    }
}

/// The atomic document unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: BlockId,
    #[serde(flatten)]
    pub body: BlockBody,
    #[serde(default)]
    pub align: Align,
    #[serde(default)]
    pub text_style: TextStyle,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nonzero_position"
    )]
    pub position: Option<Spacing>,
}

fn nonzero_position<'de, D>(deserializer: D) -> Result<Option<Spacing>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Spacing>::deserialize(deserializer)?.and_then(Spacing::nonzero))
}

impl Block {
    pub fn new(body: BlockBody) -> Self {
        Self {
            id: BlockId::generate(),
            body,
            align: Align::default(),
            text_style: TextStyle::default(),
            position: None,
        }
    }

    pub fn kind(&self) -> BlockKind {
        self.body.kind()
    }

    /// Text payload: heading/paragraph text or image caption; lists have none
    pub fn content(&self) -> Option<&str> {
        match &self.body {
            BlockBody::Heading { content, .. } | BlockBody::Paragraph { content } => {
                Some(content)
            }
            BlockBody::Image(image) => Some(&image.caption),
            BlockBody::List(_) => None,
        }
    }

    pub fn list_items(&self) -> Option<&[ListItem]> {
        match &self.body {
            BlockBody::List(list) => Some(&list.list_items),
            _ => None,
        }
    }

    pub fn list(&self) -> Option<&ListBlock> {
        match &self.body {
            BlockBody::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn image(&self) -> Option<&ImageBlock> {
        match &self.body {
            BlockBody::Image(image) => Some(image),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn level(n: u8) -> HeadingLevel {
        HeadingLevel::new(n).unwrap()
    }

    #[test]
    fn empty_bodies_match_their_kind() {
        for kind in [
            BlockKind::Heading,
            BlockKind::Paragraph,
            BlockKind::Image,
            BlockKind::List,
        ] {
            assert_eq!(BlockBody::empty(kind, level(2)).kind(), kind);
        }
    }

    #[test]
    fn new_list_has_one_empty_item() {
        let block = Block::new(BlockBody::empty(BlockKind::List, level(2)));
        assert_eq!(block.list_items(), Some(&[ListItem::default()][..]));
        assert_eq!(block.content(), None);
    }

    #[test]
    fn image_caption_is_its_content() {
        let mut block = Block::new(BlockBody::empty(BlockKind::Image, level(2)));
        if let BlockBody::Image(image) = &mut block.body {
            image.caption = "Sunset".to_string();
        }
        assert_eq!(block.content(), Some("Sunset"));
        assert_eq!(block.image().map(|i| i.focal_point), Some(FocalPoint::CENTER));
    }

    #[test]
    fn block_ids_are_unique() {
        let a = Block::new(BlockBody::empty(BlockKind::Paragraph, level(2)));
        let b = Block::new(BlockBody::empty(BlockKind::Paragraph, level(2)));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn deserialises_image_with_missing_focal_point() {
        let json = r#"{
            "id": "6f1c3a52-8d9e-4c1b-9a53-2b7e0f6d4a11",
            "type": "image",
            "url": "https://example.com/a.png",
            "imageSize": "full"
        }"#;
        let block: Block = serde_json::from_str(json).unwrap();
        let image = block.image().unwrap();
        assert_eq!(image.size, ImageSize::Full);
        assert_eq!(image.focal_point, FocalPoint::CENTER);
        assert_eq!(block.align, Align::Left);
    }

    #[test]
    fn rejects_out_of_range_heading_level() {
        let json = r#"{
            "id": "6f1c3a52-8d9e-4c1b-9a53-2b7e0f6d4a11",
            "type": "heading",
            "content": "Title",
            "level": 7
        }"#;
        assert!(serde_json::from_str::<Block>(json).is_err());
    }
}
