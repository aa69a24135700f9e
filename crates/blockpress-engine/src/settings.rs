use crate::error::EditorError;
use crate::models::HeadingLevel;

/// Tunables the host passes to the editor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorSettings {
    /// Pixels per spacing-slider step
    pub spacing_step_px: u32,
    /// The slider runs from `-spacing_max_steps` to `spacing_max_steps`
    pub spacing_max_steps: i8,
    /// Level given to newly added headings
    pub default_heading_level: HeadingLevel,
}

impl EditorSettings {
    pub fn new(
        spacing_step_px: u32,
        spacing_max_steps: i8,
        default_heading_level: u8,
    ) -> Result<Self, EditorError> {
        Ok(Self {
            spacing_step_px,
            spacing_max_steps: spacing_max_steps.max(0),
            default_heading_level: HeadingLevel::new(default_heading_level)?,
        })
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            spacing_step_px: 8,
            spacing_max_steps: 5,
            default_heading_level: HeadingLevel::H2,
        }
    }
}
