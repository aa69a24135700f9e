use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::models::{Block, BlockId};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A stored block that was left out while loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadIssue {
    Malformed { index: usize, message: String },
    DuplicateId { index: usize, id: BlockId },
}

/// Blocks recovered from a stored document
#[derive(Debug, Default)]
pub struct LoadedDocument {
    pub blocks: Vec<Block>,
    pub issues: Vec<LoadIssue>,
}

/// Decode a JSON block array, skipping elements that do not decode
///
/// Only a document that is not a JSON array at all is an error. A malformed
/// block, or a second block reusing an id, is reported and dropped so the
/// rest of the document still opens.
pub fn load_blocks(json: &str) -> Result<LoadedDocument, IoError> {
    let elements: Vec<serde_json::Value> = serde_json::from_str(json)?;

    let mut seen = HashSet::with_capacity(elements.len());
    let mut document = LoadedDocument::default();
    for (index, element) in elements.into_iter().enumerate() {
        match serde_json::from_value::<Block>(element) {
            Ok(block) if seen.insert(block.id) => document.blocks.push(block),
            Ok(block) => {
                log::warn!("skipping block {index}: id {} already used", block.id);
                document
                    .issues
                    .push(LoadIssue::DuplicateId { index, id: block.id });
            }
            Err(err) => {
                log::warn!("skipping block {index}: {err}");
                document.issues.push(LoadIssue::Malformed {
                    index,
                    message: err.to_string(),
                });
            }
        }
    }
    Ok(document)
}

/// Serialise the block array as pretty-printed JSON
pub fn save_blocks(blocks: &[Arc<Block>]) -> Result<String, IoError> {
    let blocks: Vec<&Block> = blocks.iter().map(Arc::as_ref).collect();
    Ok(serde_json::to_string_pretty(&blocks)?)
}

/// Read and leniently decode a stored document
pub fn read_document(path: &Path) -> Result<LoadedDocument, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let json = fs::read_to_string(path)?;
    load_blocks(&json)
}

/// Write a document, creating parent directories as needed
pub fn write_document(path: &Path, blocks: &[Arc<Block>]) -> Result<(), IoError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, save_blocks(blocks)?)?;
    Ok(())
}
