use serde::{Deserialize, Serialize};
use url::Url;

use crate::highlight::DEFAULT_THEME;
use crate::surface::Variant;

pub const ORIGIN_VAR: &str = "MAILER_EDITOR_ORIGIN";
pub const THEME_VAR: &str = "MAILER_EDITOR_THEME";
pub const TAB_SIZE_VAR: &str = "MAILER_EDITOR_TAB_SIZE";
pub const VARIANT_VAR: &str = "MAILER_EDITOR_VARIANT";

const DEFAULT_ORIGIN: &str = "http://localhost:1080";
const DEFAULT_TAB_SIZE: usize = 2;

/// Local settings of the editor binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Address `/env` is fetched from.
    pub origin: String,
    pub syntax_theme: String,
    pub tab_size: usize,
    pub variant: Variant,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            origin: String::from(DEFAULT_ORIGIN),
            syntax_theme: String::from(DEFAULT_THEME),
            tab_size: DEFAULT_TAB_SIZE,
            variant: Variant::Highlighted,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from a variable lookup, then validates them.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(origin) = lookup(ORIGIN_VAR) {
            settings.origin = origin;
        }
        if let Some(theme) = lookup(THEME_VAR) {
            settings.syntax_theme = theme;
        }
        if let Some(tab_size) = lookup(TAB_SIZE_VAR) {
            match tab_size.trim().parse() {
                Ok(size) => settings.tab_size = size,
                Err(e) => log::warn!("Invalid {}: {:?} ({})", TAB_SIZE_VAR, tab_size, e),
            }
        }
        if let Some(variant) = lookup(VARIANT_VAR) {
            match parse_variant(&variant) {
                Some(variant) => settings.variant = variant,
                None => log::warn!("Invalid {}: {:?}", VARIANT_VAR, variant),
            }
        }

        settings.validate();
        settings
    }

    /// Command line flags override the environment.
    pub fn apply_args<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            match arg.as_ref() {
                "--plain" => self.variant = Variant::Plain,
                "--highlighted" => self.variant = Variant::Highlighted,
                other => log::debug!("Ignoring argument: {}", other),
            }
        }
    }

    /// Replaces invalid values with defaults. Returns whether anything was
    /// corrected.
    pub fn validate(&mut self) -> bool {
        let mut has_issues = false;

        if Url::parse(&self.origin).is_err() {
            log::warn!("Invalid origin: {}, using default", self.origin);
            self.origin = DEFAULT_ORIGIN.to_string();
            has_issues = true;
        }

        if self.tab_size == 0 || self.tab_size > 8 {
            log::warn!("Invalid tab size: {}, using default", self.tab_size);
            self.tab_size = DEFAULT_TAB_SIZE;
            has_issues = true;
        }

        if self.syntax_theme.trim().is_empty() {
            log::warn!("Empty syntax theme, using default");
            self.syntax_theme = DEFAULT_THEME.to_string();
            has_issues = true;
        }

        if has_issues {
            log::info!("Settings validation completed with corrections");
        }

        has_issues
    }
}

fn parse_variant(s: &str) -> Option<Variant> {
    match s.trim().to_ascii_lowercase().as_str() {
        "plain" => Some(Variant::Plain),
        "highlighted" => Some(Variant::Highlighted),
        _ => None,
    }
}
