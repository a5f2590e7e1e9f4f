use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use mailer_api::{ConfigStore, TemplateClient, DEFAULT_API_BASE};

use crate::input::EditInput;
use crate::keymap;
use crate::settings::Settings;
use crate::surface::{EditorSurface, View};

/// The running editor: the mounted surface plus the API handles wired for it.
pub struct App {
    pub config: ConfigStore,
    pub templates: TemplateClient,
    pub surface: EditorSurface,
    should_quit: bool,
}

impl App {
    /// Starts configuration loading in the background, then builds the
    /// editor surface without waiting for it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn bootstrap(settings: &Settings) -> Result<Self> {
        let (config, templates) = mailer_api::connect(&settings.origin)?;

        let loading = config.clone();
        tokio::spawn(async move {
            match loading.initialize().await {
                Ok(()) => log::info!("Using API base {}", loading.api_base()),
                Err(e) => log::warn!(
                    "Configuration unavailable, using {}: {:#}",
                    DEFAULT_API_BASE,
                    e
                ),
            }
        });

        let surface =
            EditorSurface::for_variant(settings.variant, &settings.syntax_theme, settings.tab_size);
        log::info!("Editor created ({:?} variant)", settings.variant);

        Ok(Self {
            config,
            templates,
            surface,
            should_quit: false,
        })
    }

    pub fn view(&mut self) -> View {
        self.surface.render()
    }

    pub fn status_line(&self) -> String {
        let state = self.surface.state();
        let (line, col) = state.cursor_line_col();
        let mut status = format!("Ln {}/{}, Col {}", line + 1, state.line_count(), col + 1);

        let fields = mjmlcore::field_names(&state.text());
        if !fields.is_empty() {
            status.push_str(&format!(" | Fields {}", fields.join(", ")));
        }

        status.push_str(&format!(" | API {} | Ctrl+Q to quit", self.config.api_base()));
        status
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        if control && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c')) {
            log::info!("Quit requested");
            self.quit();
            return;
        }

        if let Some(input) = keymap::to_edit_input(key) {
            self.surface.handle_input(&input);
        }
    }

    pub fn handle_paste(&mut self, text: String) {
        self.surface.handle_input(&EditInput::Paste(text));
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Lifecycle, Variant};
    use mailer_api::ConfigState;
    use std::time::Duration;
    use tiny_http::{Header, Response, Server};

    fn settings(origin: &str, variant: Variant) -> Settings {
        Settings {
            origin: origin.to_string(),
            variant,
            ..Settings::default()
        }
    }

    fn serve_env(body: &'static str) -> String {
        let server = Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        std::thread::spawn(move || {
            if let Ok(request) = server.recv() {
                let header =
                    Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
                let _ = request.respond(Response::from_data(body.as_bytes().to_vec()).with_header(header));
            }
        });
        format!("http://127.0.0.1:{}", port)
    }

    #[tokio::test]
    async fn test_bootstrap_mounts_without_waiting_for_config() {
        let mut app = App::bootstrap(&settings("http://127.0.0.1:1", Variant::Plain)).unwrap();
        assert_eq!(app.surface.lifecycle(), Lifecycle::Unmounted);
        assert_eq!(app.config.api_base(), DEFAULT_API_BASE);
        assert_eq!(
            app.templates.render_url(),
            "https://mailer-api.vibioh.fr/render/"
        );

        let view = app.view();
        assert_eq!(app.surface.lifecycle(), Lifecycle::Mounted);
        assert_eq!(view.editable.text, "Hello World !");
    }

    #[tokio::test]
    async fn test_bootstrap_loads_config_in_background() {
        let origin = serve_env(r#"{"API_URL": "https://custom.example"}"#);
        let app = App::bootstrap(&settings(&origin, Variant::Plain)).unwrap();

        for _ in 0..100 {
            if app.config.state() == ConfigState::Loaded {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        assert_eq!(app.config.api_base(), "https://custom.example");
        assert_eq!(app.templates.render_url(), "https://custom.example/render/");
    }

    #[tokio::test]
    async fn test_status_line_lists_template_fields() {
        let app = App::bootstrap(&settings("http://127.0.0.1:1", Variant::Highlighted)).unwrap();
        let status = app.status_line();
        assert!(status.starts_with("Ln 1/13, Col 1"), "{}", status);
        assert!(status.contains("| Fields Name |"), "{}", status);

        let plain = App::bootstrap(&settings("http://127.0.0.1:1", Variant::Plain)).unwrap();
        assert!(!plain.status_line().contains("Fields"));
    }

    #[tokio::test]
    async fn test_keys_edit_and_quit() {
        let mut app = App::bootstrap(&settings("http://127.0.0.1:1", Variant::Plain)).unwrap();
        app.view();

        app.handle_key(KeyEvent::new(KeyCode::End, KeyModifiers::NONE));
        app.handle_key(KeyEvent::new(KeyCode::Char('!'), KeyModifiers::NONE));
        app.handle_paste(" {{ .Name }}".to_string());
        assert_eq!(app.surface.state().text(), "Hello World !! {{ .Name }}");
        assert!(app.status_line().starts_with("Ln 1/1, Col 27 | Fields Name | API"));

        assert!(!app.should_quit());
        app.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }
}
