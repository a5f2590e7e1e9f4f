/// Seed text of the plain editor.
pub const PLAIN_GREETING: &str = "Hello World !";

/// Seed text of the highlighted editor: a minimal MJML email with one
/// templating placeholder. Leading and trailing newlines are part of the
/// document.
pub const MJML_SKELETON: &str = "
<mjml>
  <mj-body>
    <mj-container>
      <mj-section>
        <mj-column>
          <mj-text>Hello {{ .Name }} !</mj-text>
        </mj-column>
      </mj-section>
    </mj-container>
  </mj-body>
</mjml>
";
