use serde::Deserialize;

use crate::editing::patch::BlockPatch;
use crate::editing::selection::{Selection, SelectionRouter};
use crate::editing::store::DocumentStore;
use crate::error::EditorError;
use crate::models::{
    Align, Block, BlockId, BlockKind, BulletIcon, Format, HeadingLevel, ImageSize, ListKind,
    ListStyle, Spacing,
};
use crate::settings::EditorSettings;

/// A user-facing editing action from the contextual toolbar
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "camelCase")]
pub enum ToolbarAction {
    ToggleFormat(Format),
    SetAlign(Align),
    SetHeadingLevel(HeadingLevel),
    SetListKind(ListKind),
    SetBulletIcon(BulletIcon),
    SetImageSize(ImageSize),
    SetImageUrl(String),
    SetAlt(String),
    SetCaption(String),
    /// Spacing slider position, negative values push the block down
    SetSpacing(i8),
    /// Leave the contextual toolbar and drop the selection
    Back,
}

/// Groups of controls the toolbar shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolGroup {
    TextFormat,
    Alignment,
    HeadingLevel,
    ListStyle,
    Image,
    Spacing,
}

/// Turns toolbar actions into store updates scoped to the selection
///
/// With a list item focused, style and alignment go to that item alone.
/// List style always applies to the whole list.
#[derive(Debug, Clone, Copy)]
pub struct ToolbarController {
    spacing_step_px: u32,
    spacing_max_steps: i8,
}

impl Default for ToolbarController {
    fn default() -> Self {
        Self::new(&EditorSettings::default())
    }
}

impl ToolbarController {
    pub fn new(settings: &EditorSettings) -> Self {
        Self {
            spacing_step_px: settings.spacing_step_px,
            spacing_max_steps: settings.spacing_max_steps,
        }
    }

    /// Control groups valid for the current selection
    pub fn available_tools(&self, selection: Selection, store: &DocumentStore) -> Vec<ToolGroup> {
        let Some(block) = selection.block_id().and_then(|id| store.get(id)) else {
            return Vec::new();
        };
        match (block.kind(), selection) {
            (BlockKind::List, Selection::ListItem { .. }) => vec![
                ToolGroup::TextFormat,
                ToolGroup::Alignment,
                ToolGroup::ListStyle,
                ToolGroup::Spacing,
            ],
            (BlockKind::List, _) => vec![ToolGroup::ListStyle, ToolGroup::Spacing],
            (BlockKind::Heading, _) => vec![
                ToolGroup::HeadingLevel,
                ToolGroup::TextFormat,
                ToolGroup::Alignment,
                ToolGroup::Spacing,
            ],
            (BlockKind::Paragraph, _) => vec![
                ToolGroup::TextFormat,
                ToolGroup::Alignment,
                ToolGroup::Spacing,
            ],
            (BlockKind::Image, _) => {
                vec![ToolGroup::Image, ToolGroup::Alignment, ToolGroup::Spacing]
            }
        }
    }

    /// Map a slider value in `-max..=max` to a spacing offset
    pub fn spacing_for(&self, value: i8) -> Result<Option<Spacing>, EditorError> {
        if value.unsigned_abs() > self.spacing_max_steps.unsigned_abs() {
            return Err(EditorError::SpacingOutOfRange {
                value,
                max: self.spacing_max_steps,
            });
        }
        let px = u32::from(value.unsigned_abs())
            .checked_mul(self.spacing_step_px)
            .ok_or(EditorError::SpacingOutOfRange {
                value,
                max: self.spacing_max_steps,
            })?;
        Ok(match value.signum() {
            1 => Some(Spacing::Top(px)),
            -1 => Some(Spacing::Bottom(px)),
            _ => None,
        })
    }

    /// Slider value that would produce `position`
    pub fn spacing_value(&self, position: Option<Spacing>) -> i8 {
        if self.spacing_step_px == 0 {
            return 0;
        }
        let max = i64::from(self.spacing_max_steps);
        let steps = |px: u32| (i64::from(px) / i64::from(self.spacing_step_px)).min(max);
        let value = match position {
            Some(Spacing::Top(px)) => steps(px),
            Some(Spacing::Bottom(px)) => -steps(px),
            None => 0,
        };
        i8::try_from(value).unwrap_or(0)
    }

    /// The store update an action amounts to, without applying it
    ///
    /// `Back` and actions taken with nothing selected produce no patch.
    pub fn patch_for(
        &self,
        action: &ToolbarAction,
        selection: Selection,
        store: &DocumentStore,
    ) -> Result<Option<(BlockId, BlockPatch)>, EditorError> {
        let Some(id) = selection.block_id() else {
            return Ok(None);
        };
        let block = store.get(id).ok_or(EditorError::BlockNotFound(id))?;

        let patch = match action {
            ToolbarAction::Back => return Ok(None),
            ToolbarAction::ToggleFormat(format) => match selection {
                Selection::ListItem { index, .. } => {
                    BlockPatch::edit_list_item(block, index, |item| {
                        item.text_style = item.text_style.toggled(*format)
                    })?
                }
                _ => {
                    require_not_list(block, "textStyle")?;
                    BlockPatch::new().text_style(block.text_style.toggled(*format))
                }
            },
            ToolbarAction::SetAlign(align) => match selection {
                Selection::ListItem { index, .. } => {
                    BlockPatch::edit_list_item(block, index, |item| item.align = *align)?
                }
                _ => {
                    require_not_list(block, "align")?;
                    BlockPatch::new().align(*align)
                }
            },
            ToolbarAction::SetHeadingLevel(level) => BlockPatch::new().level(*level),
            ToolbarAction::SetListKind(kind) => {
                let list = require_list(block)?;
                BlockPatch::new().list_style(list.with_kind(*kind))
            }
            ToolbarAction::SetBulletIcon(icon) => {
                require_list(block)?;
                BlockPatch::new().list_style(ListStyle::bulleted(*icon))
            }
            ToolbarAction::SetImageSize(size) => {
                require_image(block, "imageSize")?;
                BlockPatch::new().image_size(*size)
            }
            ToolbarAction::SetImageUrl(url) => {
                require_image(block, "url")?;
                BlockPatch::new().url(url.clone())
            }
            ToolbarAction::SetAlt(alt) => {
                require_image(block, "alt")?;
                BlockPatch::new().alt(alt.clone())
            }
            ToolbarAction::SetCaption(caption) => {
                require_image(block, "content")?;
                BlockPatch::new().content(caption.clone())
            }
            ToolbarAction::SetSpacing(value) => BlockPatch::new().position(self.spacing_for(*value)?),
        };

        Ok(Some((id, patch)))
    }

    /// Apply an action through the router and store
    pub fn apply(
        &self,
        action: &ToolbarAction,
        router: &mut SelectionRouter,
        store: &mut DocumentStore,
    ) -> Result<(), EditorError> {
        if *action == ToolbarAction::Back {
            router.clear();
            return Ok(());
        }

        match self.patch_for(action, router.current(), store)? {
            Some((id, patch)) => {
                store.update(id, &patch)?;
                router.reconcile(store);
            }
            None => log::debug!("toolbar action {action:?} with nothing selected"),
        }
        Ok(())
    }
}

fn require_list(block: &Block) -> Result<ListStyle, EditorError> {
    block
        .list()
        .map(|list| list.list_style)
        .ok_or(EditorError::NotApplicable {
            field: "listStyle",
            kind: block.kind(),
        })
}

fn require_image(block: &Block, field: &'static str) -> Result<(), EditorError> {
    match block.kind() {
        BlockKind::Image => Ok(()),
        kind => Err(EditorError::NotApplicable { field, kind }),
    }
}

fn require_not_list(block: &Block, field: &'static str) -> Result<(), EditorError> {
    match block.kind() {
        BlockKind::List => Err(EditorError::NotApplicable {
            field,
            kind: BlockKind::List,
        }),
        _ => Ok(()),
    }
}
