use std::ops::Range;

use mjmlcore::placeholders;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style as SynStyle, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Added on top of the markup style for `{{ ... }}` actions.
const PLACEHOLDER_STYLE: Style = Style::new()
    .fg(Color::Magenta)
    .add_modifier(Modifier::BOLD);

pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    pub fn new(theme_name: &str) -> Self {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let theme_set = ThemeSet::load_defaults();

        let theme = theme_set
            .themes
            .get(theme_name)
            .or_else(|| {
                log::warn!("Unknown syntax theme {}, using {}", theme_name, DEFAULT_THEME);
                theme_set.themes.get(DEFAULT_THEME)
            })
            .or_else(|| theme_set.themes.values().next())
            .cloned()
            .unwrap_or_default();

        Self { syntax_set, theme }
    }

    /// Grammar used for MJML: it is XML-shaped markup, so the HTML
    /// definition tokenizes tags, attributes, strings and comments.
    pub fn markup_syntax(&self) -> &SyntaxReference {
        self.syntax_set
            .find_syntax_by_name("HTML")
            .or_else(|| self.syntax_set.find_syntax_by_extension("html"))
            .or_else(|| self.syntax_set.find_syntax_by_extension("xml"))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    /// Highlights `lines` (without line breaks) in order, carrying parser
    /// state from one line to the next. The text of each returned line is
    /// exactly the input line.
    pub fn highlight_lines_to_ratatui(
        &self,
        lines: &[String],
        syntax: &SyntaxReference,
    ) -> Vec<Line<'static>> {
        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        lines
            .iter()
            .map(|line| {
                let with_nl = format!("{}\n", line);
                let regions: Vec<(Style, &str)> = highlighter
                    .highlight_line(&with_nl, &self.syntax_set)
                    .unwrap_or_else(|_| vec![(SynStyle::default(), with_nl.as_str())])
                    .into_iter()
                    .map(|(style, text)| (syn_style_to_ratatui(style), text.trim_end_matches('\n')))
                    .filter(|(_, text)| !text.is_empty())
                    .collect();

                let ranges: Vec<Range<usize>> =
                    placeholders(line).into_iter().map(|p| p.range).collect();
                Line::from(split_placeholders(regions, &ranges))
            })
            .collect()
    }
}

/// Splits styled regions at placeholder boundaries and patches the
/// placeholder style onto the parts inside. `ranges` are byte ranges into
/// the concatenated region text, sorted and disjoint.
fn split_placeholders(regions: Vec<(Style, &str)>, ranges: &[Range<usize>]) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(regions.len() + ranges.len() * 2);
    let mut offset = 0;

    for (style, text) in regions {
        let end = offset + text.len();
        let mut cursor = offset;

        for range in ranges.iter().filter(|r| r.start < end && r.end > offset) {
            let start = range.start.max(offset);
            let stop = range.end.min(end);
            if cursor < start {
                spans.push(Span::styled(text[cursor - offset..start - offset].to_string(), style));
            }
            spans.push(Span::styled(
                text[start - offset..stop - offset].to_string(),
                style.patch(PLACEHOLDER_STYLE),
            ));
            cursor = stop;
        }

        if cursor < end {
            spans.push(Span::styled(text[cursor - offset..].to_string(), style));
        }
        offset = end;
    }

    spans
}

fn syn_style_to_ratatui(style: SynStyle) -> Style {
    let fg = style.foreground;
    let bg = style.background;
    let mut s = Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b));
    if !(bg.r == 0 && bg.g == 0 && bg.b == 0) {
        s = s.bg(Color::Rgb(bg.r, bg.g, bg.b));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use mjmlcore::MJML_SKELETON;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    fn skeleton_lines() -> Vec<String> {
        MJML_SKELETON.split('\n').map(str::to_string).collect()
    }

    #[test]
    fn test_highlight_preserves_text() {
        let highlighter = Highlighter::new(DEFAULT_THEME);
        let lines = skeleton_lines();
        let highlighted = highlighter.highlight_lines_to_ratatui(&lines, highlighter.markup_syntax());

        assert_eq!(highlighted.len(), lines.len());
        for (line, rendered) in lines.iter().zip(&highlighted) {
            assert_eq!(&line_text(rendered), line);
        }
    }

    #[test]
    fn test_markup_is_tokenized_into_colored_spans() {
        let highlighter = Highlighter::new(DEFAULT_THEME);
        let lines = vec!["<mjml>".to_string(), "  <mj-text>Hi</mj-text>".to_string()];
        let highlighted = highlighter.highlight_lines_to_ratatui(&lines, highlighter.markup_syntax());

        assert!(highlighted[0].spans.len() > 1, "tag should be split into tokens");
        let mut colors: Vec<_> = highlighted
            .iter()
            .flat_map(|line| line.spans.iter().filter_map(|span| span.style.fg))
            .collect();
        colors.dedup();
        assert!(colors.len() > 1, "expected more than one foreground color");
    }

    #[test]
    fn test_placeholder_gets_distinct_style() {
        let highlighter = Highlighter::new(DEFAULT_THEME);
        let lines = vec!["<mj-text>Hello {{ .Name }} !</mj-text>".to_string()];
        let highlighted = highlighter.highlight_lines_to_ratatui(&lines, highlighter.markup_syntax());

        let bold: String = highlighted[0]
            .spans
            .iter()
            .filter(|span| span.style.add_modifier.contains(Modifier::BOLD))
            .map(|span| span.content.as_ref())
            .collect();
        assert_eq!(bold, "{{ .Name }}");
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let lines = vec!["<mjml><mj-body></mj-body></mjml>".to_string()];
        let render = |theme: &str| {
            let highlighter = Highlighter::new(theme);
            highlighter.highlight_lines_to_ratatui(&lines, highlighter.markup_syntax())
        };
        assert_eq!(render("no-such-theme"), render(DEFAULT_THEME));
        assert_ne!(render("InspiredGitHub"), render(DEFAULT_THEME));
    }

    #[test]
    fn test_split_placeholders_across_regions() {
        let style = Style::default();
        let regions = vec![(style, "a{{ ."), (style, "X }}b")];
        let spans = split_placeholders(regions, &[1..9]);
        let texts: Vec<_> = spans.iter().map(|span| span.content.as_ref()).collect();
        assert_eq!(texts, vec!["a", "{{ .", "X }}", "b"]);
        assert!(spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert!(!spans[3].style.add_modifier.contains(Modifier::BOLD));
    }
}
