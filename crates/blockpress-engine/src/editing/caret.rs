//! Text insertion at the live caret of a mounted input.
//!
//! Inputs report their selection in UTF-16 code units, the way browser text
//! fields do. All offsets crossing the [`TextInputHandle`] boundary use that
//! unit; conversion to byte offsets happens only when splicing strings.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use crate::models::BlockId;

/// Capability the engine needs from a rendered text input
pub trait TextInputHandle {
    /// Current selection as `(start, end)` UTF-16 offsets
    fn selection(&self) -> (usize, usize);
    fn set_selection(&mut self, start: usize, end: usize);
    fn value(&self) -> String;
    fn focus(&mut self);
}

/// Which text input a handle belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetKey {
    /// Content input of a heading, paragraph, or image caption
    Block(BlockId),
    ListItem { block: BlockId, index: usize },
}

impl TargetKey {
    pub fn block_id(&self) -> BlockId {
        match self {
            TargetKey::Block(id) | TargetKey::ListItem { block: id, .. } => *id,
        }
    }
}

/// Live input handles keyed by target
///
/// Inputs register on mount and unregister on unmount. Registration is
/// last-write-wins: a remounted input simply replaces its stale handle.
#[derive(Default)]
pub struct InputRegistry {
    handles: HashMap<TargetKey, Box<dyn TextInputHandle>>,
    last_focused: Option<TargetKey>,
}

impl fmt::Debug for InputRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputRegistry")
            .field("keys", &self.handles.keys().collect::<Vec<_>>())
            .field("last_focused", &self.last_focused)
            .finish()
    }
}

impl InputRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, key: TargetKey, handle: Box<dyn TextInputHandle>) {
        self.handles.insert(key, handle);
    }

    pub fn unregister(&mut self, key: TargetKey) -> bool {
        self.handles.remove(&key).is_some()
    }

    /// Record that `key` was the last input to receive focus
    pub fn report_focus(&mut self, key: TargetKey) {
        self.last_focused = Some(key);
    }

    pub fn last_focused(&self) -> Option<TargetKey> {
        self.last_focused
    }

    pub fn contains(&self, key: TargetKey) -> bool {
        self.handles.contains_key(&key)
    }

    pub fn get(&self, key: TargetKey) -> Option<&dyn TextInputHandle> {
        self.handles.get(&key).map(|handle| handle.as_ref())
    }

    pub fn get_mut(&mut self, key: TargetKey) -> Option<&mut (dyn TextInputHandle + 'static)> {
        self.handles.get_mut(&key).map(|handle| handle.as_mut())
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Result of inserting text at the caret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaretInsertion {
    pub new_content: String,
    /// UTF-16 offset directly after the inserted text
    pub new_caret_offset: usize,
}

/// Caret position to put back once the new content has been rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingCaret {
    pub key: TargetKey,
    pub offset: usize,
}

/// Replace the UTF-16 range `start..end` of `content` with `text`
///
/// An empty range is a plain insertion. Offsets past the end clamp to it and a
/// reversed range is normalised.
pub fn splice_utf16(content: &str, start: usize, end: usize, text: &str) -> CaretInsertion {
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    let start_byte = utf16_to_byte_idx(content, start);
    let end_byte = utf16_to_byte_idx(content, end).max(start_byte);

    let mut new_content = String::with_capacity(content.len() + text.len());
    new_content.push_str(&content[..start_byte]);
    new_content.push_str(text);
    new_content.push_str(&content[end_byte..]);

    CaretInsertion {
        new_caret_offset: byte_idx_to_utf16(content, start_byte) + text.encode_utf16().count(),
        new_content,
    }
}

fn utf16_to_byte_idx(s: &str, pos_utf16: usize) -> usize {
    if pos_utf16 == 0 {
        return 0;
    }
    let mut acc = 0;
    for (i, ch) in s.char_indices() {
        let width = ch.len_utf16();
        if acc + width > pos_utf16 {
            return i;
        }
        acc += width;
        if acc == pos_utf16 {
            return i + ch.len_utf8();
        }
    }
    s.len()
}

fn byte_idx_to_utf16(s: &str, byte_idx: usize) -> usize {
    s[..byte_idx.min(s.len())].encode_utf16().count()
}

/// Inserts text at the caret and restores the caret after re-render
///
/// The restore has to wait for the render that applies the new content:
/// writing the selection earlier gets overwritten when the input's value is
/// replaced, which leaves the caret at the end.
#[derive(Debug, Default)]
pub struct CaretService {
    pending: Option<PendingCaret>,
}

impl CaretService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splice `text` into `content` at the selection of the input for `key`
    ///
    /// Returns `None` when no input is mounted for `key`; the insertion is
    /// dropped.
    pub fn insert_at_caret(
        &mut self,
        registry: &InputRegistry,
        key: TargetKey,
        content: &str,
        text: &str,
    ) -> Option<CaretInsertion> {
        let Some(handle) = registry.get(key) else {
            log::debug!("no live input for {key:?}; dropping insertion");
            return None;
        };

        let (start, end) = handle.selection();
        let insertion = splice_utf16(content, start, end, text);
        self.pending = Some(PendingCaret {
            key,
            offset: insertion.new_caret_offset,
        });
        Some(insertion)
    }

    pub fn pending(&self) -> Option<PendingCaret> {
        self.pending
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Apply the pending caret position; call after the re-render
    pub fn restore(&mut self, registry: &mut InputRegistry) -> bool {
        let Some(PendingCaret { key, offset }) = self.pending.take() else {
            return false;
        };
        match registry.get_mut(key) {
            Some(handle) => {
                handle.focus();
                handle.set_selection(offset, offset);
                true
            }
            None => {
                log::debug!("input for {key:?} unmounted before caret restore");
                false
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    pub(crate) struct InputState {
        pub value: String,
        pub selection: (usize, usize),
        pub focused: bool,
    }

    /// Test double sharing its state with the test body
    pub(crate) struct FakeInput(pub Rc<RefCell<InputState>>);

    impl FakeInput {
        pub(crate) fn new(value: &str, selection: (usize, usize)) -> (Self, Rc<RefCell<InputState>>) {
            let state = Rc::new(RefCell::new(InputState {
                value: value.to_string(),
                selection,
                focused: false,
            }));
            (Self(Rc::clone(&state)), state)
        }
    }

    impl TextInputHandle for FakeInput {
        fn selection(&self) -> (usize, usize) {
            self.0.borrow().selection
        }

        fn set_selection(&mut self, start: usize, end: usize) {
            self.0.borrow_mut().selection = (start, end);
        }

        fn value(&self) -> String {
            self.0.borrow().value.clone()
        }

        fn focus(&mut self) {
            self.0.borrow_mut().focused = true;
        }
    }

    #[test]
    fn emoji_at_offset_five() {
        let result = splice_utf16("hello world", 5, 5, "🙂");
        assert_eq!(result.new_content, "hello🙂 world");
        assert_eq!(result.new_caret_offset, 7);
    }

    #[rstest]
    #[case("hello world", 0, 5, "bye", "bye world", 3)]
    #[case("hello world", 6, 11, "", "hello ", 6)]
    #[case("abc", 10, 10, "!", "abc!", 4)]
    #[case("abc", 2, 1, "X", "aXc", 2)]
    #[case("", 0, 0, "🙂", "🙂", 2)]
    fn splice_cases(
        #[case] content: &str,
        #[case] start: usize,
        #[case] end: usize,
        #[case] text: &str,
        #[case] expected: &str,
        #[case] caret: usize,
    ) {
        let result = splice_utf16(content, start, end, text);
        assert_eq!(result.new_content, expected);
        assert_eq!(result.new_caret_offset, caret);
    }

    #[test]
    fn offsets_after_astral_characters_are_utf16() {
        // "🙂" occupies two UTF-16 units and four bytes
        let result = splice_utf16("🙂ab", 3, 3, "x");
        assert_eq!(result.new_content, "🙂axb");
        assert_eq!(result.new_caret_offset, 4);
    }

    #[test]
    fn insertion_uses_the_registered_selection() {
        let mut registry = InputRegistry::new();
        let key = TargetKey::Block(BlockId::generate());
        let (input, state) = FakeInput::new("hello world", (6, 11));
        registry.register(key, Box::new(input));

        let mut service = CaretService::new();
        let result = service
            .insert_at_caret(&registry, key, "hello world", "🌍")
            .unwrap();
        assert_eq!(result.new_content, "hello 🌍");
        assert_eq!(service.pending(), Some(PendingCaret { key, offset: 8 }));

        // nothing is written back until the render has happened
        assert_eq!(state.borrow().selection, (6, 11));
        assert!(service.restore(&mut registry));
        assert_eq!(state.borrow().selection, (8, 8));
        assert!(state.borrow().focused);
        assert_eq!(service.pending(), None);
    }

    #[test]
    fn missing_handle_drops_insertion() {
        let registry = InputRegistry::new();
        let mut service = CaretService::new();
        let key = TargetKey::ListItem {
            block: BlockId::generate(),
            index: 0,
        };
        assert_eq!(service.insert_at_caret(&registry, key, "abc", "x"), None);
        assert_eq!(service.pending(), None);
    }

    #[test]
    fn restore_after_unmount_is_silent() {
        let mut registry = InputRegistry::new();
        let key = TargetKey::Block(BlockId::generate());
        let (input, _state) = FakeInput::new("abc", (1, 1));
        registry.register(key, Box::new(input));

        let mut service = CaretService::new();
        service.insert_at_caret(&registry, key, "abc", "x");
        registry.unregister(key);
        assert!(!service.restore(&mut registry));
    }

    #[test]
    fn registration_is_last_write_wins() {
        let mut registry = InputRegistry::new();
        let key = TargetKey::Block(BlockId::generate());
        let (first, _) = FakeInput::new("old", (0, 0));
        let (second, _) = FakeInput::new("new", (3, 3));
        registry.register(key, Box::new(first));
        registry.register(key, Box::new(second));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(key).map(|h| h.value()), Some("new".to_string()));
    }
}
