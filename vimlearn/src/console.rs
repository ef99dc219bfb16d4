//! Presentation port.
//!
//! Screens and the session controller only talk to a [`Console`]. The
//! terminal implementation lives in `io::terminal`; tests use a scripted
//! console that records a transcript.

use anyhow::Result;

use crate::core::menu::MenuOption;

/// Semantic colour of a piece of output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Plain,
    Dim,
    Accent,
    Heading,
    Success,
    Failure,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Border {
    #[default]
    Rounded,
    /// Banners (lesson, module, course complete).
    Double,
}

/// Boxed block of text with an optional title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub title: Option<String>,
    pub body: String,
    pub tone: Tone,
    pub border: Border,
}

impl Panel {
    pub fn new(body: impl Into<String>, tone: Tone) -> Self {
        Self {
            title: None,
            body: body.into(),
            tone,
            border: Border::Rounded,
        }
    }

    pub fn titled(title: impl Into<String>, body: impl Into<String>, tone: Tone) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::new(body, tone)
        }
    }

    pub fn double(mut self) -> Self {
        self.border = Border::Double;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub header: String,
    pub tone: Tone,
    /// Fixed content width; cells wrap to it. `None` sizes to content.
    pub width: Option<usize>,
}

impl Column {
    pub fn new(header: impl Into<String>, tone: Tone, width: Option<usize>) -> Self {
        Self {
            header: header.into(),
            tone,
            width,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub show_header: bool,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>, show_header: bool) -> Self {
        Self {
            columns,
            show_header,
            rows: Vec::new(),
        }
    }

    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }
}

/// Capabilities the tutor needs from a terminal.
pub trait Console {
    fn clear(&mut self) -> Result<()>;

    fn panel(&mut self, panel: &Panel) -> Result<()>;

    fn table(&mut self, table: &Table) -> Result<()>;

    /// Show a row of `key label` options under a separator.
    fn menu(&mut self, options: &[MenuOption]) -> Result<()>;

    fn line(&mut self, text: &str, tone: Tone) -> Result<()>;

    fn blank(&mut self) -> Result<()> {
        self.line("", Tone::Plain)
    }

    /// Show `prompt` and read one line without its terminator. `None` at end
    /// of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}
