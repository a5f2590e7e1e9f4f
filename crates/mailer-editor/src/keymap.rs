use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::document::Motion;
use crate::input::EditInput;

/// Maps a terminal key press to an editing input. Keys the editor does not
/// handle map to `None`.
pub fn to_edit_input(key: KeyEvent) -> Option<EditInput> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let control = key.modifiers.contains(KeyModifiers::CONTROL);
    let motion = |motion: Motion| {
        if shift {
            EditInput::Select(motion)
        } else {
            EditInput::Move(motion)
        }
    };

    match key.code {
        KeyCode::Char(_) if control || key.modifiers.contains(KeyModifiers::ALT) => None,
        KeyCode::Char(c) => Some(EditInput::Insert(c)),
        KeyCode::Enter => Some(EditInput::Newline),
        KeyCode::Tab => Some(EditInput::Tab),
        KeyCode::BackTab => Some(EditInput::BackTab),
        KeyCode::Backspace => Some(EditInput::Backspace),
        KeyCode::Delete => Some(EditInput::Delete),
        KeyCode::Left => Some(motion(Motion::Left)),
        KeyCode::Right => Some(motion(Motion::Right)),
        KeyCode::Up => Some(motion(Motion::Up)),
        KeyCode::Down => Some(motion(Motion::Down)),
        KeyCode::Home if control => Some(motion(Motion::DocumentStart)),
        KeyCode::End if control => Some(motion(Motion::DocumentEnd)),
        KeyCode::Home => Some(motion(Motion::LineStart)),
        KeyCode::End => Some(motion(Motion::LineEnd)),
        _ => None,
    }
}
