//! crossterm-backed [`Console`].
//!
//! Layout is computed by the pure `render_*` functions, which return plain
//! text lines; the console only adds colour and writes them out. Widths are
//! counted in chars, which matches the ASCII lesson content.

use std::io::{self, BufRead, IsTerminal, Stdout, Write};

use anyhow::{Context, Result};
use crossterm::{
    cursor, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, ClearType},
};

use crate::console::{Border, Console, Panel, Table, Tone};
use crate::core::menu::MenuOption;

/// Widest a panel grows, borders included.
pub const MAX_WIDTH: usize = 78;
const MIN_WIDTH: usize = 24;
const TAB_WIDTH: usize = 4;

/// Horizontal rule printed above every menu.
pub fn separator() -> String {
    "─".repeat(60)
}

struct BoxChars {
    top_left: char,
    top_right: char,
    bottom_left: char,
    bottom_right: char,
    horizontal: char,
    vertical: char,
}

const ROUNDED: BoxChars = BoxChars {
    top_left: '╭',
    top_right: '╮',
    bottom_left: '╰',
    bottom_right: '╯',
    horizontal: '─',
    vertical: '│',
};

const DOUBLE: BoxChars = BoxChars {
    top_left: '╔',
    top_right: '╗',
    bottom_left: '╚',
    bottom_right: '╝',
    horizontal: '═',
    vertical: '║',
};

fn box_chars(border: Border) -> &'static BoxChars {
    match border {
        Border::Rounded => &ROUNDED,
        Border::Double => &DOUBLE,
    }
}

fn display_width(text: &str) -> usize {
    text.chars().count()
}

fn expand_tabs(text: &str) -> String {
    text.replace('\t', &" ".repeat(TAB_WIDTH))
}

/// Hard-wrap `text` to `width` columns, keeping explicit line breaks and
/// empty lines.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for raw in expand_tabs(text).split('\n') {
        let chars: Vec<char> = raw.trim_end_matches('\r').chars().collect();
        if chars.is_empty() {
            lines.push(String::new());
            continue;
        }
        lines.extend(chars.chunks(width).map(|chunk| chunk.iter().collect()));
    }
    lines
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(text));
    format!("{text}{}", " ".repeat(fill))
}

/// Lay out a panel no wider than `max_width`.
pub fn render_panel(panel: &Panel, max_width: usize) -> Vec<String> {
    let chars = box_chars(panel.border);
    let inner_max = max_width.max(MIN_WIDTH) - 4;
    let body = wrap(&panel.body, inner_max);
    let title = panel.title.as_deref().map(|title| format!(" {title} "));
    let content_width = body
        .iter()
        .map(|line| display_width(line))
        .chain(title.iter().map(|title| display_width(title) + 1))
        .max()
        .unwrap_or(0)
        .min(inner_max);

    let horizontal = |count: usize| chars.horizontal.to_string().repeat(count);
    let mut lines = Vec::with_capacity(body.len() + 2);
    let top = match &title {
        Some(title) => {
            let rest = (content_width + 2).saturating_sub(display_width(title) + 1);
            format!(
                "{}{}{title}{}{}",
                chars.top_left,
                horizontal(1),
                horizontal(rest),
                chars.top_right
            )
        }
        None => format!(
            "{}{}{}",
            chars.top_left,
            horizontal(content_width + 2),
            chars.top_right
        ),
    };
    lines.push(top);
    for line in &body {
        lines.push(format!(
            "{} {} {}",
            chars.vertical,
            pad(line, content_width),
            chars.vertical
        ));
    }
    lines.push(format!(
        "{}{}{}",
        chars.bottom_left,
        horizontal(content_width + 2),
        chars.bottom_right
    ));
    lines
}

fn column_widths(table: &Table, max_width: usize) -> Vec<usize> {
    let count = table.columns.len().max(1);
    // Borders and padding take 3 columns per cell plus one.
    let budget = max_width.saturating_sub(3 * count + 1).max(count);
    let natural = table.columns.iter().enumerate().map(|(index, column)| {
        column.width.unwrap_or_else(|| {
            table
                .rows
                .iter()
                .filter_map(|row| row.get(index))
                .flat_map(|cell| expand_tabs(cell).split('\n').map(display_width).collect::<Vec<_>>())
                .chain(table.show_header.then(|| display_width(&column.header)))
                .max()
                .unwrap_or(0)
                .max(1)
        })
    });
    natural.map(|width| width.min(budget / count).max(1)).collect()
}

/// Lay out a table as box-drawn lines. Cells wrap within their column.
pub fn render_table(table: &Table, max_width: usize) -> Vec<String> {
    let widths = column_widths(table, max_width);
    let rule = |left: char, mid: char, right: char| {
        let segments = widths
            .iter()
            .map(|width| "─".repeat(width + 2))
            .collect::<Vec<_>>();
        format!("{left}{}{right}", segments.join(&mid.to_string()))
    };
    let render_row = |cells: &[String], lines: &mut Vec<String>| {
        let wrapped = widths
            .iter()
            .enumerate()
            .map(|(index, width)| wrap(cells.get(index).map_or("", String::as_str), *width))
            .collect::<Vec<_>>();
        let height = wrapped.iter().map(Vec::len).max().unwrap_or(1);
        for row_line in 0..height {
            let cells = wrapped
                .iter()
                .zip(&widths)
                .map(|(cell, width)| pad(cell.get(row_line).map_or("", String::as_str), *width))
                .collect::<Vec<_>>();
            lines.push(format!("│ {} │", cells.join(" │ ")));
        }
    };

    let mut lines = vec![rule('╭', '┬', '╮')];
    if table.show_header {
        let headers = table
            .columns
            .iter()
            .map(|column| column.header.clone())
            .collect::<Vec<_>>();
        render_row(&headers, &mut lines);
        lines.push(rule('├', '┼', '┤'));
    }
    for row in &table.rows {
        render_row(row, &mut lines);
    }
    lines.push(rule('╰', '┴', '╯'));
    lines
}

/// Menu options on one line: `1 Start exercise  2 Show hint ...`.
pub fn render_menu(options: &[MenuOption]) -> String {
    options
        .iter()
        .map(|opt| format!("{} {}", opt.key, opt.label))
        .collect::<Vec<_>>()
        .join("  ")
}

fn color(tone: Tone) -> Option<Color> {
    match tone {
        Tone::Plain => None,
        Tone::Dim => Some(Color::DarkGrey),
        Tone::Accent => Some(Color::Cyan),
        Tone::Heading => Some(Color::Magenta),
        Tone::Success => Some(Color::Green),
        Tone::Failure => Some(Color::Red),
        Tone::Warning => Some(Color::Yellow),
    }
}

/// Console writing to `out` and reading lines from `input`.
pub struct TerminalConsole<W, R> {
    out: W,
    input: R,
    width: usize,
    /// Whether to emit colour and clear-screen escapes.
    styled: bool,
}

impl TerminalConsole<Stdout, io::StdinLock<'static>> {
    /// Console on the process's stdio, sized to the current terminal. Styling
    /// is off when stdout is not a terminal.
    pub fn stdio() -> Self {
        let width = terminal::size()
            .map(|(cols, _)| usize::from(cols).clamp(MIN_WIDTH, MAX_WIDTH))
            .unwrap_or(MAX_WIDTH);
        let styled = io::stdout().is_terminal();
        Self::new(io::stdout(), io::stdin().lock(), width, styled)
    }
}

impl<W: Write, R: BufRead> TerminalConsole<W, R> {
    pub fn new(out: W, input: R, width: usize, styled: bool) -> Self {
        Self {
            out,
            input,
            width,
            styled,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn write_styled(&mut self, text: &str, tone: Tone, bold: bool) -> Result<()> {
        let color = if self.styled { color(tone) } else { None };
        if let Some(color) = color {
            queue!(self.out, SetForegroundColor(color))?;
        }
        if bold && self.styled {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        queue!(self.out, Print(text))?;
        if self.styled && (color.is_some() || bold) {
            queue!(self.out, SetAttribute(Attribute::Reset), ResetColor)?;
        }
        queue!(self.out, Print("\n"))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush().context("flush terminal output")
    }
}

impl<W: Write, R: BufRead> Console for TerminalConsole<W, R> {
    fn clear(&mut self) -> Result<()> {
        if self.styled {
            queue!(
                self.out,
                terminal::Clear(ClearType::All),
                terminal::Clear(ClearType::Purge),
                cursor::MoveTo(0, 0)
            )?;
        }
        self.flush()
    }

    fn panel(&mut self, panel: &Panel) -> Result<()> {
        for line in render_panel(panel, self.width) {
            self.write_styled(&line, panel.tone, false)?;
        }
        self.flush()
    }

    fn table(&mut self, table: &Table) -> Result<()> {
        // Single-tone tables colour the whole block; mixed tables stay plain.
        let tone = match table.columns.first() {
            Some(first) if table.columns.iter().all(|c| c.tone == first.tone) => first.tone,
            _ => Tone::Plain,
        };
        for line in render_table(table, self.width) {
            self.write_styled(&line, tone, false)?;
        }
        self.flush()
    }

    fn menu(&mut self, options: &[MenuOption]) -> Result<()> {
        self.write_styled("", Tone::Plain, false)?;
        self.write_styled(&separator(), Tone::Dim, false)?;
        self.write_styled(&render_menu(options), Tone::Accent, true)?;
        self.flush()
    }

    fn line(&mut self, text: &str, tone: Tone) -> Result<()> {
        let bold = matches!(tone, Tone::Heading);
        self.write_styled(text, tone, bold)?;
        self.flush()
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        if self.styled {
            queue!(
                self.out,
                SetForegroundColor(Color::Cyan),
                Print(prompt),
                ResetColor
            )?;
        } else {
            queue!(self.out, Print(prompt))?;
        }
        self.flush()?;
        let mut buf = String::new();
        let read = self.input.read_line(&mut buf).context("read from stdin")?;
        if read == 0 {
            return Ok(None);
        }
        let trimmed = buf.trim_end_matches(['\n', '\r']).len();
        buf.truncate(trimmed);
        Ok(Some(buf))
    }
}
