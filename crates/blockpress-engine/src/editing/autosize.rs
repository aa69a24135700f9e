//! Text inputs whose height tracks their content.

/// Height written to an element's style
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Height {
    /// Let layout decide; lets the element report its natural height
    Auto,
    Px(f64),
}

/// A rendered multi-line input that can be measured and resized
pub trait MeasuredElement {
    fn set_value(&mut self, value: &str);
    fn set_height(&mut self, height: Height);
    /// Content height as laid out under the current height style
    fn scroll_height(&self) -> f64;
}

/// Style keeping the input free of scrollbars and resize handles
pub const AUTO_SIZE_STYLE: [(&str, &str); 2] = [("overflow", "hidden"), ("resize", "none")];

/// Keeps an element pinned to its intrinsic content height
///
/// Each fit resets the height to `Auto`, measures, then pins the measured
/// value. Measuring while a previous pixel height is still set reports that
/// height instead of the content's, so the input could grow but never shrink.
#[derive(Debug)]
pub struct AutoSizeInput<E> {
    element: E,
    content: String,
    height: f64,
}

impl<E: MeasuredElement> AutoSizeInput<E> {
    pub fn mount(element: E, content: impl Into<String>) -> Self {
        let mut input = Self {
            element,
            content: content.into(),
            height: 0.0,
        };
        input.element.set_value(&input.content);
        input.fit();
        input
    }

    /// Push new content into the element and refit; unchanged content is skipped
    pub fn set_content(&mut self, content: &str) -> bool {
        if content == self.content {
            return false;
        }
        self.content = content.to_string();
        self.element.set_value(content);
        self.fit();
        true
    }

    /// Reset, measure, pin
    pub fn fit(&mut self) -> f64 {
        self.element.set_height(Height::Auto);
        let measured = self.element.scroll_height();
        self.element.set_height(Height::Px(measured));
        self.height = measured;
        measured
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn into_inner(self) -> E {
        self.element
    }
}
