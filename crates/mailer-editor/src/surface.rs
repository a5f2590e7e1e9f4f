use ratatui::text::Line;
use serde::{Deserialize, Serialize};

use crate::decorator::{CodeEditingDecorator, SyntaxHighlightDecorator, TextDecorator};
use crate::document::{DocumentState, Selection};
use crate::input::EditInput;

/// Text of the output pane. Rendering templates is not part of the editor.
pub const OUTPUT_PLACEHOLDER: &str = "Output goes here";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Plain,
    #[default]
    Highlighted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Unmounted,
    Mounted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorPosition {
    pub line: usize,
    /// Terminal column, wide characters counted twice.
    pub column: usize,
}

/// The editable region, bound to the current document state.
#[derive(Debug, Clone, PartialEq)]
pub struct EditableRegion {
    pub text: String,
    pub lines: Vec<Line<'static>>,
    pub cursor: CursorPosition,
    pub selection: Selection,
}

/// Static output region. Never reflects the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputPlaceholder {
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub editable: EditableRegion,
    pub output: OutputPlaceholder,
}

/// Holds the document state of one editor and the decorators applied to it.
///
/// `on_content_change` is the only way the document state changes.
pub struct EditorSurface {
    state: DocumentState,
    decorators: Vec<Box<dyn TextDecorator>>,
    lifecycle: Lifecycle,
    render_pending: bool,
}

impl EditorSurface {
    pub fn new(initial_text: &str, decorators: Vec<Box<dyn TextDecorator>>) -> Self {
        Self {
            state: DocumentState::from_text(initial_text),
            decorators,
            lifecycle: Lifecycle::Unmounted,
            render_pending: true,
        }
    }

    /// Editor without decorators, seeded with a greeting.
    pub fn plain() -> Self {
        Self::new(mjmlcore::PLAIN_GREETING, Vec::new())
    }

    /// Code editor with MJML highlighting, seeded with an MJML skeleton.
    pub fn highlighted(theme_name: &str, tab_size: usize) -> Self {
        Self::new(
            mjmlcore::MJML_SKELETON,
            vec![
                Box::new(CodeEditingDecorator::new(tab_size)),
                Box::new(SyntaxHighlightDecorator::new(theme_name)),
            ],
        )
    }

    pub fn for_variant(variant: Variant, theme_name: &str, tab_size: usize) -> Self {
        match variant {
            Variant::Plain => Self::plain(),
            Variant::Highlighted => Self::highlighted(theme_name, tab_size),
        }
    }

    pub fn state(&self) -> &DocumentState {
        &self.state
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn needs_render(&self) -> bool {
        self.render_pending
    }

    pub fn decorator_names(&self) -> Vec<&str> {
        self.decorators.iter().map(|d| d.name()).collect()
    }

    /// Replaces the document state and schedules a re-render.
    pub fn on_content_change(&mut self, new_state: DocumentState) {
        self.state = new_state;
        self.render_pending = true;
    }

    /// Computes the state following `input` and commits it. Decorators get
    /// the first chance to handle the input.
    pub fn handle_input(&mut self, input: &EditInput) {
        let next = self
            .decorators
            .iter()
            .find_map(|decorator| decorator.handle_input(&self.state, input))
            .unwrap_or_else(|| input.apply(&self.state));
        self.on_content_change(next);
    }

    pub fn render(&mut self) -> View {
        if self.lifecycle == Lifecycle::Unmounted {
            log::debug!(
                "Mounting editor surface with decorators {:?}",
                self.decorator_names()
            );
            self.lifecycle = Lifecycle::Mounted;
        }
        self.render_pending = false;

        let base: Vec<Line<'static>> = self.state.lines().into_iter().map(Line::from).collect();
        let lines = self
            .decorators
            .iter()
            .fold(base, |lines, decorator| decorator.decorate(&self.state, lines));

        let (line, _) = self.state.cursor_line_col();
        View {
            editable: EditableRegion {
                text: self.state.text(),
                lines,
                cursor: CursorPosition {
                    line,
                    column: self.state.cursor_display_col(),
                },
                selection: self.state.selection(),
            },
            output: OutputPlaceholder {
                label: OUTPUT_PLACEHOLDER,
            },
        }
    }
}
