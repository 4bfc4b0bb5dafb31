//! Input and list widgets shared by the TUI screens.

use ratatui::widgets::{ListItem, ListState, ScrollbarState};

/// Single-line text input with cursor movement.
#[derive(Debug, Default, Clone)]
pub struct UserInput {
    /// Current value of the input box
    pub value: String,
    /// Cursor position in characters
    pub char_idx: usize,
}

impl UserInput {
    pub fn new() -> Self {
        Self::default()
    }

    fn byte_idx(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.char_idx)
            .map_or(self.value.len(), |(idx, _)| idx)
    }

    pub fn input(&mut self, c: char) {
        let idx = self.byte_idx();
        self.value.insert(idx, c);
        self.char_idx += 1;
    }

    pub fn backspace(&mut self) {
        if self.char_idx > 0 {
            self.char_idx -= 1;
            let idx = self.byte_idx();
            self.value.remove(idx);
        }
    }

    pub fn delete(&mut self) {
        if self.char_idx < self.value.chars().count() {
            let idx = self.byte_idx();
            self.value.remove(idx);
        }
    }

    pub fn move_left(&mut self) {
        self.char_idx = self.char_idx.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.char_idx < self.value.chars().count() {
            self.char_idx += 1;
        }
    }

    pub fn jump_to_first(&mut self) {
        self.char_idx = 0;
    }

    pub fn jump_to_last(&mut self) {
        self.char_idx = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.char_idx = 0;
    }
}

/// A labeled form field, optionally masked for password entry.
#[derive(Debug)]
pub struct FormField {
    pub label: &'static str,
    pub input: UserInput,
    pub masked: bool,
}

impl FormField {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            input: UserInput::new(),
            masked: false,
        }
    }

    pub fn masked(label: &'static str) -> Self {
        Self {
            label,
            input: UserInput::new(),
            masked: true,
        }
    }

    /// Rendered value, with masking applied.
    pub fn display_value(&self) -> String {
        if self.masked {
            "*".repeat(self.input.value.chars().count())
        } else {
            self.input.value.clone()
        }
    }
}

/// A vertical stack of form fields with one focused at a time.
#[derive(Debug)]
pub struct Form {
    pub fields: Vec<FormField>,
    pub focus: usize,
}

impl Form {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields, focus: 0 }
    }

    pub fn focused_mut(&mut self) -> &mut UserInput {
        &mut self.fields[self.focus].input
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    pub fn value(&self, idx: usize) -> &str {
        &self.fields[idx].input.value
    }

    pub fn clear(&mut self) {
        for field in &mut self.fields {
            field.input.clear();
        }
        self.focus = 0;
    }
}

/// Bounded list of rendered items with shared list/scrollbar state.
#[derive(Debug, Default)]
pub struct ScrollableList {
    pub list_items: Vec<ListItem<'static>>,
    pub list_state: ListState,
    pub scroll_state: ScrollbarState,
    max_items: usize,
}

impl ScrollableList {
    pub fn new(max_items: usize) -> Self {
        Self {
            list_items: Vec::new(),
            list_state: ListState::default(),
            scroll_state: ScrollbarState::default(),
            max_items,
        }
    }

    /// Push a new item to the front (lists render bottom-to-top, so the
    /// newest item sits at the bottom edge).
    pub fn push(&mut self, item: ListItem<'static>) {
        self.list_items.insert(0, item);
        self.list_items.truncate(self.max_items);
        self.scroll_state = self.scroll_state.content_length(self.list_items.len());
    }

    pub fn move_up(&mut self) {
        let selected = match self.list_state.selected() {
            Some(idx) => (idx + 1).min(self.list_items.len().saturating_sub(1)),
            None => 0,
        };
        self.list_state.select(Some(selected));
        self.scroll_state = self.scroll_state.position(selected);
    }

    pub fn move_down(&mut self) {
        match self.list_state.selected() {
            Some(0) | None => self.list_state.select(None),
            Some(idx) => {
                self.list_state.select(Some(idx - 1));
                self.scroll_state = self.scroll_state.position(idx - 1);
            }
        }
    }

    pub fn jump_to_first(&mut self) {
        if !self.list_items.is_empty() {
            let last = self.list_items.len() - 1;
            self.list_state.select(Some(last));
            self.scroll_state = self.scroll_state.position(last);
        }
    }

    pub fn jump_to_last(&mut self) {
        self.list_state.select(None);
        self.scroll_state = self.scroll_state.position(0);
    }
}
