use ropey::Rope;
use std::cmp;
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Selection as char offsets. `head` is where the cursor is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn collapsed(offset: usize) -> Self {
        Self {
            anchor: offset,
            head: offset,
        }
    }

    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    pub fn start(&self) -> usize {
        cmp::min(self.anchor, self.head)
    }

    pub fn end(&self) -> usize {
        cmp::max(self.anchor, self.head)
    }

    pub fn range(&self) -> Range<usize> {
        self.start()..self.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    DocumentStart,
    DocumentEnd,
}

/// Immutable snapshot of the edited text and its selection.
///
/// Every edit returns a new snapshot and leaves `self` untouched. Cloning
/// is cheap: the rope shares its chunks.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentState {
    content: Rope,
    selection: Selection,
}

impl DocumentState {
    /// Snapshot of `text` with the cursor at the start of the document.
    pub fn from_text(text: &str) -> Self {
        Self {
            content: Rope::from_str(text),
            selection: Selection::default(),
        }
    }

    pub fn text(&self) -> String {
        self.content.to_string()
    }

    pub fn line_count(&self) -> usize {
        self.content.len_lines()
    }

    /// Text of line `idx` without its line break.
    pub fn line(&self, idx: usize) -> Option<String> {
        if idx >= self.content.len_lines() {
            return None;
        }
        let line = self.content.line(idx).to_string();
        Some(strip_line_break(&line).to_string())
    }

    /// All lines without their line breaks. A trailing newline yields a
    /// final empty line, where the cursor can sit.
    pub fn lines(&self) -> Vec<String> {
        self.content
            .lines()
            .map(|line| strip_line_break(&line.to_string()).to_string())
            .collect()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn cursor(&self) -> usize {
        self.selection.head
    }

    /// Line of the cursor and its char offset within that line.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let head = self.selection.head;
        let line = self.content.char_to_line(head);
        (line, head - self.content.line_to_char(line))
    }

    /// Terminal column of the cursor within its line.
    pub fn cursor_display_col(&self) -> usize {
        let (line, col) = self.cursor_line_col();
        let start = self.content.line_to_char(line);
        self.content.slice(start..start + col).to_string().width()
    }

    pub fn line_start(&self, line: usize) -> usize {
        self.content.line_to_char(cmp::min(line, self.content.len_lines()))
    }

    /// Char length of `line`, line break excluded.
    pub fn line_len(&self, line: usize) -> usize {
        self.line(line).map_or(0, |text| text.chars().count())
    }

    pub fn with_selection(&self, selection: Selection) -> Self {
        let len = self.content.len_chars();
        Self {
            content: self.content.clone(),
            selection: Selection::new(
                cmp::min(selection.anchor, len),
                cmp::min(selection.head, len),
            ),
        }
    }

    /// Replaces `range` with `text` and collapses the cursor after it.
    pub fn replace_range(&self, range: Range<usize>, text: &str) -> Self {
        let len = self.content.len_chars();
        let start = cmp::min(range.start, len);
        let end = cmp::min(cmp::max(range.end, start), len);

        let mut content = self.content.clone();
        content.remove(start..end);
        content.insert(start, text);

        Self {
            content,
            selection: Selection::collapsed(start + text.chars().count()),
        }
    }

    /// Replaces the selection with `text`.
    pub fn insert_text(&self, text: &str) -> Self {
        self.replace_range(self.selection.range(), text)
    }

    pub fn delete_backward(&self) -> Self {
        if !self.selection.is_collapsed() {
            return self.insert_text("");
        }
        let head = self.selection.head;
        if head == 0 {
            return self.clone();
        }
        self.replace_range(self.prev_boundary(head)..head, "")
    }

    pub fn delete_forward(&self) -> Self {
        if !self.selection.is_collapsed() {
            return self.insert_text("");
        }
        let head = self.selection.head;
        if head >= self.content.len_chars() {
            return self.clone();
        }
        self.replace_range(head..self.next_boundary(head), "")
    }

    /// Moves the cursor and drops the selection.
    pub fn move_cursor(&self, motion: Motion) -> Self {
        let target = match motion {
            Motion::Left if !self.selection.is_collapsed() => self.selection.start(),
            Motion::Right if !self.selection.is_collapsed() => self.selection.end(),
            _ => self.motion_target(motion),
        };
        self.with_selection(Selection::collapsed(target))
    }

    /// Moves the selection head, keeping the anchor.
    pub fn select(&self, motion: Motion) -> Self {
        let target = self.motion_target(motion);
        self.with_selection(Selection::new(self.selection.anchor, target))
    }

    fn motion_target(&self, motion: Motion) -> usize {
        let head = self.selection.head;
        let (line, col) = self.cursor_line_col();
        let last_line = self.content.len_lines().saturating_sub(1);

        match motion {
            Motion::Left => self.prev_boundary(head),
            Motion::Right => self.next_boundary(head),
            Motion::Up if line == 0 => 0,
            Motion::Up => self.line_start(line - 1) + cmp::min(col, self.line_len(line - 1)),
            Motion::Down if line >= last_line => self.content.len_chars(),
            Motion::Down => self.line_start(line + 1) + cmp::min(col, self.line_len(line + 1)),
            Motion::LineStart => self.line_start(line),
            Motion::LineEnd => self.line_start(line) + self.line_len(line),
            Motion::DocumentStart => 0,
            Motion::DocumentEnd => self.content.len_chars(),
        }
    }

    /// Start of the grapheme cluster ending at `offset`.
    fn prev_boundary(&self, offset: usize) -> usize {
        if offset == 0 {
            return 0;
        }
        let line = self.content.char_to_line(offset);
        let line_start = self.content.line_to_char(line);
        // at a line start the cluster is the previous line break
        let from = if offset == line_start && line > 0 {
            self.content.line_to_char(line - 1)
        } else {
            line_start
        };
        let prefix = self.content.slice(from..offset).to_string();
        let last = prefix
            .graphemes(true)
            .next_back()
            .map_or(1, |g| g.chars().count());
        offset - last
    }

    /// End of the grapheme cluster starting at `offset`.
    fn next_boundary(&self, offset: usize) -> usize {
        let len = self.content.len_chars();
        if offset >= len {
            return len;
        }
        let line = self.content.char_to_line(offset);
        let line_end = if line + 1 < self.content.len_lines() {
            self.content.line_to_char(line + 1)
        } else {
            len
        };
        let rest = self.content.slice(offset..line_end).to_string();
        let first = rest.graphemes(true).next().map_or(1, |g| g.chars().count());
        cmp::min(offset + first, len)
    }
}

/// Line breaks ropey splits lines on, besides `\r\n`.
const LINE_BREAKS: [char; 7] = [
    '\n', '\u{0B}', '\u{0C}', '\r', '\u{85}', '\u{2028}', '\u{2029}',
];

fn strip_line_break(line: &str) -> &str {
    if let Some(line) = line.strip_suffix("\r\n") {
        return line;
    }
    line.strip_suffix(LINE_BREAKS).unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_keeps_content() {
        let doc = DocumentState::from_text("Hello World !");
        assert_eq!(doc.text(), "Hello World !");
        assert_eq!(doc.cursor(), 0);
        assert!(doc.selection().is_collapsed());
    }

    #[test]
    fn test_lines_strip_breaks() {
        let doc = DocumentState::from_text("a\r\nb\nc\n");
        assert_eq!(doc.lines(), vec!["a", "b", "c", ""]);
        assert_eq!(doc.line_count(), 4);
        assert_eq!(doc.line(1).as_deref(), Some("b"));
        assert_eq!(doc.line(9), None);
    }

    #[test]
    fn test_unicode_line_breaks_are_stripped() {
        let doc = DocumentState::from_text("a\u{0B}b\u{0C}c\u{85}d\u{2028}e\u{2029}f\rg");
        assert_eq!(doc.lines(), vec!["a", "b", "c", "d", "e", "f", "g"]);
        assert_eq!(doc.line_len(0), 1);

        let end = doc.move_cursor(Motion::LineEnd);
        assert_eq!(end.cursor(), 1);
        assert_eq!(end.cursor_line_col(), (0, 1));
    }

    #[test]
    fn test_edits_return_new_snapshots() {
        let original = DocumentState::from_text("abc");
        let edited = original.insert_text("x");
        assert_eq!(original.text(), "abc");
        assert_eq!(edited.text(), "xabc");
        assert_eq!(edited.cursor(), 1);
    }

    #[test]
    fn test_insert_replaces_selection() {
        let doc = DocumentState::from_text("Hello World !").with_selection(Selection::new(6, 11));
        assert_eq!(&doc.text()[doc.selection().range()], "World");
        let doc = doc.insert_text("MJML");
        assert_eq!(doc.text(), "Hello MJML !");
        assert_eq!(doc.selection(), Selection::collapsed(10));
    }

    #[test]
    fn test_with_selection_clamps() {
        let doc = DocumentState::from_text("abc").with_selection(Selection::new(1, 99));
        assert_eq!(doc.selection(), Selection::new(1, 3));
    }

    #[test]
    fn test_delete_backward_removes_grapheme_cluster() {
        let doc = DocumentState::from_text("ok 👍🏽")
            .move_cursor(Motion::DocumentEnd)
            .delete_backward();
        assert_eq!(doc.text(), "ok ");
        assert_eq!(doc.cursor(), 3);
    }

    #[test]
    fn test_delete_backward_joins_crlf_lines() {
        let doc = DocumentState::from_text("a\r\nb")
            .with_selection(Selection::collapsed(3))
            .delete_backward();
        assert_eq!(doc.text(), "ab");
        assert_eq!(doc.cursor(), 1);
    }

    #[test]
    fn test_delete_backward_at_start_is_noop() {
        let doc = DocumentState::from_text("abc");
        assert_eq!(doc.delete_backward(), doc);
    }

    #[test]
    fn test_delete_forward() {
        let doc = DocumentState::from_text("a\nb").with_selection(Selection::collapsed(1));
        let doc = doc.delete_forward();
        assert_eq!(doc.text(), "ab");
        assert_eq!(doc.move_cursor(Motion::DocumentEnd).delete_forward().text(), "ab");
    }

    #[test]
    fn test_vertical_motion_clamps_column() {
        let doc = DocumentState::from_text("long line\nab\nlonger line")
            .with_selection(Selection::collapsed(7));
        let down = doc.move_cursor(Motion::Down);
        assert_eq!(down.cursor_line_col(), (1, 2));
        let down = down.move_cursor(Motion::Down);
        assert_eq!(down.cursor_line_col(), (2, 2));
        let up = down.move_cursor(Motion::Up).move_cursor(Motion::Up);
        assert_eq!(up.cursor_line_col(), (0, 2));
        assert_eq!(up.move_cursor(Motion::Up).cursor(), 0);
    }

    #[test]
    fn test_line_motions() {
        let doc = DocumentState::from_text("one\ntwo\n").with_selection(Selection::collapsed(5));
        assert_eq!(doc.move_cursor(Motion::LineStart).cursor(), 4);
        assert_eq!(doc.move_cursor(Motion::LineEnd).cursor(), 7);
        assert_eq!(doc.move_cursor(Motion::DocumentEnd).cursor(), 8);
    }

    #[test]
    fn test_select_extends_head() {
        let doc = DocumentState::from_text("abcdef")
            .select(Motion::Right)
            .select(Motion::Right);
        assert_eq!(doc.selection(), Selection::new(0, 2));
        let collapsed = doc.move_cursor(Motion::Left);
        assert_eq!(collapsed.selection(), Selection::collapsed(0));
    }

    #[test]
    fn test_cursor_display_col_counts_wide_chars() {
        let doc = DocumentState::from_text("日本a").move_cursor(Motion::LineEnd);
        assert_eq!(doc.cursor_line_col(), (0, 3));
        assert_eq!(doc.cursor_display_col(), 5);
    }
}
