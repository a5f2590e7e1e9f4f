use ratatui::text::Line;

use crate::document::{DocumentState, Selection};
use crate::highlight::Highlighter;
use crate::input::EditInput;

/// Extension of the editing surface.
///
/// Decorators are applied in list order. `decorate` receives the lines
/// produced by the previous decorator and must keep the text of every
/// line intact; only styling may change. `handle_input` may claim an
/// input by returning the next state; the first decorator to claim it wins.
pub trait TextDecorator: Send + Sync {
    fn name(&self) -> &str;

    fn decorate(&self, _doc: &DocumentState, lines: Vec<Line<'static>>) -> Vec<Line<'static>> {
        lines
    }

    fn handle_input(&self, _doc: &DocumentState, _input: &EditInput) -> Option<DocumentState> {
        None
    }
}

/// Code-editing affordances: soft tabs, indentation kept on Enter, and
/// backspace through indentation one stop at a time.
pub struct CodeEditingDecorator {
    indent: String,
}

impl CodeEditingDecorator {
    pub fn new(tab_size: usize) -> Self {
        Self {
            indent: " ".repeat(tab_size.max(1)),
        }
    }

    fn indent_lines(&self, doc: &DocumentState) -> DocumentState {
        let width = self.indent.chars().count();
        let edits: Vec<LineEdit> = selected_lines(doc)
            .map(|line| LineEdit {
                at: doc.line_start(line),
                removed: 0,
                inserted: width,
            })
            .collect();
        apply_line_edits(doc, &edits, &self.indent)
    }

    fn outdent_lines(&self, doc: &DocumentState) -> DocumentState {
        let width = self.indent.chars().count();
        let edits: Vec<LineEdit> = selected_lines(doc)
            .filter_map(|line| {
                let text = doc.line(line)?;
                let removed = if text.starts_with('\t') {
                    1
                } else {
                    text.chars().take(width).take_while(|c| *c == ' ').count()
                };
                (removed > 0).then(|| LineEdit {
                    at: doc.line_start(line),
                    removed,
                    inserted: 0,
                })
            })
            .collect();
        apply_line_edits(doc, &edits, "")
    }

    fn newline_keeping_indent(&self, doc: &DocumentState) -> DocumentState {
        let (line, col) = doc.cursor_line_col();
        let text = doc.line(line).unwrap_or_default();
        let leading: String = text
            .chars()
            .take(col)
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect();
        doc.insert_text(&format!("\n{}", leading))
    }

    fn backspace_indent(&self, doc: &DocumentState) -> Option<DocumentState> {
        let (line, col) = doc.cursor_line_col();
        if col == 0 {
            return None;
        }
        let text = doc.line(line)?;
        if !text.chars().take(col).all(|c| c == ' ') {
            return None;
        }
        let width = self.indent.chars().count();
        let back = match col % width {
            0 => width,
            rest => rest,
        };
        let head = doc.cursor();
        Some(doc.replace_range(head - back..head, ""))
    }
}

impl TextDecorator for CodeEditingDecorator {
    fn name(&self) -> &str {
        "code-editing"
    }

    fn handle_input(&self, doc: &DocumentState, input: &EditInput) -> Option<DocumentState> {
        match input {
            EditInput::Tab if doc.selection().is_collapsed() => Some(doc.insert_text(&self.indent)),
            EditInput::Tab => Some(self.indent_lines(doc)),
            EditInput::BackTab => Some(self.outdent_lines(doc)),
            EditInput::Newline => Some(self.newline_keeping_indent(doc)),
            EditInput::Backspace if doc.selection().is_collapsed() => self.backspace_indent(doc),
            _ => None,
        }
    }
}

/// Syntax highlighting of MJML markup and templating placeholders.
pub struct SyntaxHighlightDecorator {
    highlighter: Highlighter,
}

impl SyntaxHighlightDecorator {
    pub fn new(theme_name: &str) -> Self {
        Self {
            highlighter: Highlighter::new(theme_name),
        }
    }
}

impl TextDecorator for SyntaxHighlightDecorator {
    fn name(&self) -> &str {
        "syntax-highlight"
    }

    fn decorate(&self, doc: &DocumentState, _lines: Vec<Line<'static>>) -> Vec<Line<'static>> {
        self.highlighter
            .highlight_lines_to_ratatui(&doc.lines(), self.highlighter.markup_syntax())
    }
}

/// Edit at the start of a line, in the coordinates of the state before
/// any edit is applied.
struct LineEdit {
    at: usize,
    removed: usize,
    inserted: usize,
}

fn selected_lines(doc: &DocumentState) -> std::ops::RangeInclusive<usize> {
    let selection = doc.selection();
    let first = doc.with_selection(Selection::collapsed(selection.start()));
    let last = doc.with_selection(Selection::collapsed(selection.end()));
    first.cursor_line_col().0..=last.cursor_line_col().0
}

/// Applies `edits` (sorted by position, on distinct lines) bottom-up so
/// earlier positions stay valid, and maps the selection through them.
fn apply_line_edits(doc: &DocumentState, edits: &[LineEdit], text: &str) -> DocumentState {
    let mut anchor = doc.selection().anchor;
    let mut head = doc.selection().head;
    let mut next = doc.clone();

    for edit in edits.iter().rev() {
        next = next.replace_range(edit.at..edit.at + edit.removed, &text[..byte_len(text, edit.inserted)]);
        anchor = shift(anchor, edit);
        head = shift(head, edit);
    }

    next.with_selection(Selection::new(anchor, head))
}

fn shift(offset: usize, edit: &LineEdit) -> usize {
    if offset < edit.at {
        offset
    } else if offset >= edit.at + edit.removed {
        offset - edit.removed + edit.inserted
    } else {
        edit.at + edit.inserted
    }
}

fn byte_len(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(idx, _)| idx)
}
