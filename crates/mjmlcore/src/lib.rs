pub mod placeholder;
pub mod seed;

pub use placeholder::{field_names, placeholders, Placeholder};
pub use seed::{MJML_SKELETON, PLAIN_GREETING};
