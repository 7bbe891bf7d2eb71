// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Script text with a caret.
//!
//! The caret is a character index into the text. The editor view reports
//! caret moves back here, and picks up programmatic moves through
//! [`ScriptBuffer::take_caret_request`].

#[derive(Debug, Clone, Default)]
pub struct ScriptBuffer {
    text: String,
    caret: usize,
    caret_request: Option<usize>,
}

impl ScriptBuffer {
    /// Create a buffer with the caret at the end of `text`.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let caret = text.chars().count();
        Self {
            text,
            caret,
            caret_request: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Mutable access for the editor widget.
    pub fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Record the caret position reported by the editor.
    pub fn set_caret(&mut self, caret: usize) {
        self.caret = caret.min(self.text.chars().count());
    }

    /// Replace the whole text, moving the caret to the end.
    pub fn replace(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.caret = self.text.chars().count();
        self.caret_request = Some(self.caret);
    }

    /// Caret position the editor should adopt, if one was set programmatically.
    pub fn take_caret_request(&mut self) -> Option<usize> {
        self.caret_request.take()
    }

    /// The line the caret is on, without its newline.
    pub fn current_line(&self) -> &str {
        let at = self.byte_offset(self.caret);
        let start = self.text[..at].rfind('\n').map_or(0, |i| i + 1);
        let end = self.text[at..].find('\n').map_or(self.text.len(), |i| at + i);
        &self.text[start..end]
    }

    /// Insert a snippet at the caret. A newline goes in front when the
    /// caret's line already has content. The caret ends after the snippet.
    pub fn insert_snippet(&mut self, snippet: &str) {
        let mut insert = String::with_capacity(snippet.len() + 1);
        if !self.current_line().trim().is_empty() {
            insert.push('\n');
        }
        insert.push_str(snippet);

        let at = self.byte_offset(self.caret);
        self.text.insert_str(at, &insert);
        self.caret += insert.chars().count();
        self.caret_request = Some(self.caret);
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_on_blank_line_has_no_prefix() {
        let mut buf = ScriptBuffer::new("a = 1\n");
        buf.insert_snippet("image.find(R.X)");
        assert_eq!(buf.text(), "a = 1\nimage.find(R.X)");
        assert_eq!(buf.caret(), buf.text().chars().count());
    }

    #[test]
    fn test_insert_on_filled_line_prefixes_newline() {
        let mut buf = ScriptBuffer::new("device.screenshot()");
        buf.insert_snippet("ocr.ocr(R.Y)");
        assert_eq!(buf.text(), "device.screenshot()\nocr.ocr(R.Y)");
    }

    #[test]
    fn test_whitespace_only_line_counts_as_blank() {
        let mut buf = ScriptBuffer::new("    ");
        buf.insert_snippet("x");
        assert_eq!(buf.text(), "    x");
    }

    #[test]
    fn test_insert_at_caret_in_middle() {
        let mut buf = ScriptBuffer::new("first\n\nlast");
        buf.set_caret(6);
        assert_eq!(buf.current_line(), "");
        buf.insert_snippet("mid");
        assert_eq!(buf.text(), "first\nmid\nlast");
        assert_eq!(buf.caret(), 9);
        assert_eq!(buf.take_caret_request(), Some(9));
        assert_eq!(buf.take_caret_request(), None);
    }

    #[test]
    fn test_multibyte_text() {
        let mut buf = ScriptBuffer::new("# 截图\n");
        buf.insert_snippet("image.find(R.Z)");
        assert_eq!(buf.text(), "# 截图\nimage.find(R.Z)");
    }

    #[test]
    fn test_caret_is_clamped() {
        let mut buf = ScriptBuffer::new("abc");
        buf.set_caret(100);
        assert_eq!(buf.caret(), 3);
    }
}
