// Mailer editor library exports

pub mod app;
pub mod decorator;
pub mod document;
pub mod highlight;
pub mod input;
pub mod keymap;
pub mod settings;
pub mod surface;
pub mod ui;

pub use app::App;
pub use decorator::{CodeEditingDecorator, SyntaxHighlightDecorator, TextDecorator};
pub use document::{DocumentState, Motion, Selection};
pub use input::EditInput;
pub use settings::Settings;
pub use surface::{EditorSurface, Lifecycle, Variant, View, OUTPUT_PLACEHOLDER};
