use unicode_width::UnicodeWidthStr;

const MIN_LABEL_WIDTH: usize = 15;
const LABEL_GAP: usize = 2;

/// Renders tab-indented rows of `label text`, with every label padded to the same column.
#[derive(Debug)]
pub struct Printer {
    label_width: usize,
    lines: Vec<(String, String)>,
}

impl Default for Printer {
    fn default() -> Self {
        Self::with_label_width(MIN_LABEL_WIDTH)
    }
}

impl Printer {
    pub fn with_label_width(label_width: usize) -> Self {
        Self {
            label_width,
            lines: Vec::new(),
        }
    }

    /// The column width needed to list all of `labels`: the widest label plus a two-space gap,
    /// but never less than 15.
    pub fn column_width<'a>(labels: impl IntoIterator<Item = &'a str>) -> usize {
        labels
            .into_iter()
            .map(|label| label.width() + LABEL_GAP)
            .fold(MIN_LABEL_WIDTH, usize::max)
    }

    pub fn with_line(mut self, label: impl Into<String>, text: impl Into<String>) -> Self {
        self.lines.push((label.into(), text.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn print(self) -> String {
        self.lines
            .into_iter()
            .map(|(label, text)| {
                let padding = self.label_width.saturating_sub(label.width());
                format!("\t{label}{}{text}\n", " ".repeat(padding))
            })
            .collect()
    }
}
