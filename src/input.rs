/// Editable text region backing the practice area.
///
/// Key and paste events edit the buffer; after every change the caller
/// forwards [`InputBuffer::value`] to the session, which always sees the full
/// content rather than individual keystrokes. Line breaks never enter the
/// buffer, so every edit acts on visible text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Append a character. Returns false for line breaks, which are dropped.
    pub fn push(&mut self, c: char) -> bool {
        if is_line_break(c) {
            return false;
        }
        self.text.push(c);
        true
    }

    /// Append pasted text without its line breaks. Returns false when nothing
    /// was left to append.
    pub fn push_str(&mut self, s: &str) -> bool {
        let len = self.text.len();
        self.text.extend(s.chars().filter(|c| !is_line_break(*c)));
        self.text.len() != len
    }

    /// Remove the last character. Returns false when there was nothing to remove.
    pub fn backspace(&mut self) -> bool {
        self.text.pop().is_some()
    }

    /// Remove the previous word along with any spaces after it
    pub fn delete_word(&mut self) -> bool {
        if self.text.is_empty() {
            return false;
        }

        let trimmed_len = self.text.trim_end_matches(' ').len();
        let word_start = self.text[..trimmed_len]
            .rfind(' ')
            .map_or(0, |idx| idx + 1);
        self.text.truncate(word_start);
        true
    }
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_value() {
        let mut buffer = InputBuffer::new();
        assert!(buffer.push('h'));
        assert!(buffer.push_str("ey"));

        assert_eq!(buffer.value(), "hey");
    }

    #[test]
    fn test_line_breaks_never_enter_buffer() {
        let mut buffer = InputBuffer::new();
        assert!(buffer.push_str("the\ncat\r\n sat\n"));
        assert_eq!(buffer.value(), "thecat sat");

        assert!(!buffer.push('\n'));
        assert!(!buffer.push_str("\r\n"));
        assert_eq!(buffer.value(), "thecat sat");
    }

    #[test]
    fn test_edits_after_pasted_line_break() {
        let mut buffer = InputBuffer::new();
        buffer.push_str("ab\n");

        assert!(buffer.backspace());
        assert_eq!(buffer.value(), "a");

        buffer.push_str("b cd\n");
        assert!(buffer.delete_word());
        assert_eq!(buffer.value(), "ab ");
    }

    #[test]
    fn test_backspace() {
        let mut buffer = InputBuffer::new();
        assert!(!buffer.backspace());

        buffer.push_str("né");
        assert!(buffer.backspace());
        assert_eq!(buffer.value(), "n");
    }

    #[test]
    fn test_delete_word() {
        let mut buffer = InputBuffer::new();
        buffer.push_str("the cat sa");

        assert!(buffer.delete_word());
        assert_eq!(buffer.value(), "the cat ");

        assert!(buffer.delete_word());
        assert_eq!(buffer.value(), "the ");

        assert!(buffer.delete_word());
        assert_eq!(buffer.value(), "");

        assert!(!buffer.delete_word());
    }

    #[test]
    fn test_clear() {
        let mut buffer = InputBuffer::new();
        buffer.push_str("abc");
        buffer.clear();

        assert_eq!(buffer.value(), "");
    }
}
