use crate::document::{DocumentState, Motion};

/// Editing input, independent of the terminal backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditInput {
    Insert(char),
    Paste(String),
    Newline,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Move(Motion),
    Select(Motion),
}

impl EditInput {
    /// Next state for this input when no decorator claims it.
    pub fn apply(&self, doc: &DocumentState) -> DocumentState {
        match self {
            EditInput::Insert(c) => doc.insert_text(c.encode_utf8(&mut [0; 4])),
            EditInput::Paste(text) => doc.insert_text(text),
            EditInput::Newline => doc.insert_text("\n"),
            EditInput::Tab => doc.insert_text("\t"),
            EditInput::BackTab => doc.clone(),
            EditInput::Backspace => doc.delete_backward(),
            EditInput::Delete => doc.delete_forward(),
            EditInput::Move(motion) => doc.move_cursor(*motion),
            EditInput::Select(motion) => doc.select(*motion),
        }
    }
}
