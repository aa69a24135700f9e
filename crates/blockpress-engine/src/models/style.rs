use serde::{Deserialize, Serialize};

use crate::error::EditorError;

/// Horizontal alignment shared by blocks and list items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// One of the three inline formatting toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Bold,
    Italic,
    Underline,
}

/// Bold/italic/underline flags
///
/// Blocks carry one of these, and every list item carries its own. List items
/// never inherit from their parent block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextStyle {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
}

impl TextStyle {
    pub fn is_active(&self, format: Format) -> bool {
        match format {
            Format::Bold => self.bold,
            Format::Italic => self.italic,
            Format::Underline => self.underline,
        }
    }

    /// Copy of this style with `format` flipped
    pub fn toggled(mut self, format: Format) -> Self {
        match format {
            Format::Bold => self.bold = !self.bold,
            Format::Italic => self.italic = !self.italic,
            Format::Underline => self.underline = !self.underline,
        }
        self
    }
}

/// Heading rank, always within 1..=3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 3;
    pub const H1: HeadingLevel = HeadingLevel(1);
    pub const H2: HeadingLevel = HeadingLevel(2);
    pub const H3: HeadingLevel = HeadingLevel(3);

    pub fn new(level: u8) -> Result<Self, EditorError> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(EditorError::InvalidHeadingLevel(level))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = EditorError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.0
    }
}

/// Rendered width class of an image block
///
/// `Full` drops the side margins and is the only size where the focal point
/// is used to anchor the cropped image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    Small,
    #[default]
    Medium,
    Large,
    Full,
}

/// Crop anchor of an image as percentages of its frame
///
/// Decoding clamps both axes into 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredFocalPoint")]
pub struct FocalPoint {
    pub x: f64,
    pub y: f64,
}

impl FocalPoint {
    pub const CENTER: FocalPoint = FocalPoint { x: 50.0, y: 50.0 };

    /// Build a focal point, clamping both axes into 0..=100
    pub fn clamped(x: f64, y: f64) -> Self {
        Self {
            x: clamp_percent(x),
            y: clamp_percent(y),
        }
    }

    /// Same point with both axes clamped into 0..=100
    pub fn clamp(self) -> Self {
        Self::clamped(self.x, self.y)
    }

    /// CSS `object-position` value anchoring a cover-cropped image
    pub fn object_position(&self) -> String {
        format!("{}% {}%", self.x, self.y)
    }
}

impl Default for FocalPoint {
    fn default() -> Self {
        Self::CENTER
    }
}

#[derive(Deserialize)]
struct StoredFocalPoint {
    x: f64,
    y: f64,
}

impl From<StoredFocalPoint> for FocalPoint {
    fn from(stored: StoredFocalPoint) -> Self {
        Self::clamped(stored.x, stored.y)
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 50.0;
    }
    value.clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    #[default]
    Bulleted,
    Numbered,
}

/// Marker drawn in front of bulleted list items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulletIcon {
    Disc,
    Circle,
    Dash,
    Tick,
    None,
}

/// Style of a whole list block
///
/// `icon` only means something for bulleted lists; a numbered list never
/// carries one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListStyle {
    #[serde(rename = "type")]
    pub kind: ListKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<BulletIcon>,
}

impl ListStyle {
    pub fn bulleted(icon: BulletIcon) -> Self {
        Self {
            kind: ListKind::Bulleted,
            icon: Some(icon),
        }
    }

    pub fn numbered() -> Self {
        Self {
            kind: ListKind::Numbered,
            icon: None,
        }
    }

    /// Same list with a different kind; switching to numbered drops the icon
    pub fn with_kind(self, kind: ListKind) -> Self {
        match kind {
            ListKind::Numbered => Self::numbered(),
            ListKind::Bulleted => Self {
                kind,
                icon: self.icon.or(Some(BulletIcon::Disc)),
            },
        }
    }
}

impl Default for ListStyle {
    fn default() -> Self {
        Self::bulleted(BulletIcon::Disc)
    }
}

/// Manual spacing offset in pixels, either above or below a block
///
/// Serialises as `{"top": px}` or `{"bottom": px}`, so a block can never carry
/// both at once. Decoding also accepts both keys; a nonzero `top` wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "StoredSpacing")]
pub enum Spacing {
    Top(u32),
    Bottom(u32),
}

#[derive(Deserialize)]
struct StoredSpacing {
    #[serde(default)]
    top: u32,
    #[serde(default)]
    bottom: u32,
}

impl From<StoredSpacing> for Spacing {
    fn from(stored: StoredSpacing) -> Self {
        if stored.top == 0 && stored.bottom > 0 {
            Spacing::Bottom(stored.bottom)
        } else {
            Spacing::Top(stored.top)
        }
    }
}

impl Spacing {
    /// `None` for a zero offset, which has no effect on layout
    pub fn nonzero(self) -> Option<Self> {
        match self {
            Spacing::Top(0) | Spacing::Bottom(0) => None,
            spacing => Some(spacing),
        }
    }

    pub fn top(&self) -> u32 {
        match self {
            Spacing::Top(px) => *px,
            Spacing::Bottom(_) => 0,
        }
    }

    pub fn bottom(&self) -> u32 {
        match self {
            Spacing::Top(_) => 0,
            Spacing::Bottom(px) => *px,
        }
    }
}
