use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Submit,
    Cancel,
}

/// Single-line text field used for the deck filter. Tab cycles through
/// the candidates that start with what was typed.
pub struct LineInput {
    text: String,
    /// Cursor position as a char index (0 = before first char).
    cursor: usize,
    candidates: Vec<String>,
    matches: Vec<String>,
    match_index: Option<usize>,
}

impl LineInput {
    pub fn new(text: &str, candidates: Vec<String>) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
            candidates,
            matches: Vec::new(),
            match_index: None,
        }
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    /// Returns (before_cursor, cursor_char, after_cursor) for styled rendering.
    pub fn render_parts(&self) -> (&str, Option<char>, &str) {
        let byte_offset = self.char_to_byte(self.cursor);
        match self.text[byte_offset..].chars().next() {
            Some(ch) => {
                let next_byte = byte_offset + ch.len_utf8();
                (&self.text[..byte_offset], Some(ch), &self.text[next_byte..])
            }
            None => (&self.text, None, ""),
        }
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if !matches!(key.code, KeyCode::Tab | KeyCode::BackTab) {
            self.reset_completion();
        }
        match key.code {
            KeyCode::Esc => return InputResult::Cancel,
            KeyCode::Enter => return InputResult::Submit,
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.len(),
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                self.remove_at(self.cursor);
            }
            KeyCode::Delete if self.cursor < self.len() => self.remove_at(self.cursor),
            KeyCode::Tab => self.complete(true),
            KeyCode::BackTab => self.complete(false),
            KeyCode::Char('a') if ctrl => self.cursor = 0,
            KeyCode::Char('e') if ctrl => self.cursor = self.len(),
            KeyCode::Char('u') if ctrl => {
                self.text.clear();
                self.cursor = 0;
            }
            KeyCode::Char(ch) if !ctrl => {
                let byte_offset = self.char_to_byte(self.cursor);
                self.text.insert(byte_offset, ch);
                self.cursor += 1;
            }
            _ => {}
        }
        InputResult::Continue
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    fn remove_at(&mut self, char_idx: usize) {
        let start = self.char_to_byte(char_idx);
        let end = self.char_to_byte(char_idx + 1);
        self.text.replace_range(start..end, "");
    }

    fn reset_completion(&mut self) {
        self.matches.clear();
        self.match_index = None;
    }

    fn complete(&mut self, forward: bool) {
        if self.match_index.is_none() {
            let seed = self.text.trim().to_lowercase();
            self.matches = self
                .candidates
                .iter()
                .filter(|c| c.starts_with(&seed))
                .cloned()
                .collect();
            self.matches.sort();
            if self.matches.is_empty() {
                return;
            }
            let first = if forward { 0 } else { self.matches.len() - 1 };
            self.apply_match(first);
            return;
        }
        let count = self.matches.len();
        let idx = self.match_index.unwrap_or(0);
        let next = if forward {
            (idx + 1) % count
        } else {
            (idx + count - 1) % count
        };
        self.apply_match(next);
    }

    fn apply_match(&mut self, idx: usize) {
        self.match_index = Some(idx);
        self.text = self.matches[idx].clone();
        self.cursor = self.len();
    }
}
