/// Word-paced reveal of one result text.
///
/// Tracks the full token list, the cumulative revealed prefix and the next
/// token index. The index only moves forward; starting a new text means
/// constructing a new state, which is how an in-progress animation gets
/// replaced.
#[derive(Debug)]
pub struct RenderState {
    words: Vec<String>,
    revealed: String,
    next: usize,
}

impl RenderState {
    pub fn new(text: &str) -> Self {
        Self {
            words: text.split_whitespace().map(str::to_string).collect(),
            revealed: String::new(),
            next: 0,
        }
    }

    /// Reveals one more word and returns the cumulative prefix, or `None`
    /// when the text is exhausted
    pub fn advance(&mut self) -> Option<&str> {
        let word = self.words.get(self.next)?;
        self.revealed.push_str(word);
        self.revealed.push(' ');
        self.next += 1;
        Some(&self.revealed)
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.words.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveals_cumulative_prefixes_in_order() {
        let mut state = RenderState::new("a b c");
        assert_eq!(state.advance(), Some("a "));
        assert_eq!(state.advance(), Some("a b "));
        assert_eq!(state.advance(), Some("a b c "));
        assert_eq!(state.advance(), None);
        assert!(state.is_finished());
    }

    #[test]
    fn collapses_repeated_whitespace() {
        let mut state = RenderState::new("  hej \t d\u{e5}  ");
        assert_eq!(state.advance(), Some("hej "));
        assert_eq!(state.advance(), Some("hej d\u{e5} "));
        assert_eq!(state.advance(), None);
    }

    #[test]
    fn empty_text_is_finished_immediately() {
        let mut state = RenderState::new("");
        assert!(state.is_finished());
        assert_eq!(state.advance(), None);
    }
}
