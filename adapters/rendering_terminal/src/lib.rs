#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Crossterm-backed terminal adapter for Rogue.
//!
//! Frames are drawn with ANSI commands into any [`Write`] sink and commands
//! are read line by line from any [`BufRead`] source, so the adapter can be
//! driven by the real terminal or by in-memory buffers.

use anyhow::{Context, Result};
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{self, Attribute, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use rogue_core::Command;
use rogue_rendering::{parse_command, Color, Glyph, Presentation, Scene};
use std::io::{self, BufRead, StdinLock, Stdout, Write};
use tracing::warn;

/// Screen row and column of the stats panel's top-left corner.
const STATS_ORIGIN: (u16, u16) = (0, 1);
/// Screen row and column of the board's top-left corner.
const BOARD_ORIGIN: (u16, u16) = (6, 2);
const PROMPT: &str = "> ";
const GAME_OVER: &str = "Game Over";

/// Presentation that draws to a terminal and reads typed commands.
#[derive(Debug)]
pub struct TerminalPresentation<R, W> {
    input: R,
    output: W,
    prompt_row: u16,
}

impl TerminalPresentation<StdinLock<'static>, Stdout> {
    /// Creates a presentation bound to the process's standard streams.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R, W> TerminalPresentation<R, W>
where
    R: BufRead,
    W: Write,
{
    /// Creates a presentation over the provided streams.
    #[must_use]
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            prompt_row: BOARD_ORIGIN.0,
        }
    }

    /// Consumes the presentation and returns its output sink.
    #[must_use]
    pub fn into_output(self) -> W {
        self.output
    }

    fn draw(&mut self, scene: &Scene) -> io::Result<()> {
        queue!(self.output, ResetColor, Clear(ClearType::All))?;

        let (stats_row, stats_column) = STATS_ORIGIN;
        for (offset, line) in (0u16..).zip(scene.stats_lines()) {
            queue!(
                self.output,
                MoveTo(stats_column, stats_row.saturating_add(offset)),
                Print(line)
            )?;
        }

        let (board_row, board_column) = BOARD_ORIGIN;
        let glyphs = scene.board_glyphs();
        for (offset, row) in (0u16..).zip(&glyphs) {
            queue!(
                self.output,
                MoveTo(board_column, board_row.saturating_add(offset))
            )?;
            for glyph in row {
                self.draw_glyph(*glyph)?;
            }
        }

        let board_height = u16::try_from(glyphs.len()).unwrap_or(u16::MAX);
        self.prompt_row = board_row.saturating_add(board_height).saturating_add(1);
        self.output.flush()
    }

    fn draw_glyph(&mut self, glyph: Glyph) -> io::Result<()> {
        if let Some(color) = terminal_color(glyph.color) {
            queue!(self.output, SetForegroundColor(color))?;
        }
        if glyph.bold {
            queue!(self.output, SetAttribute(Attribute::Bold))?;
        }
        if glyph.dim {
            queue!(self.output, SetAttribute(Attribute::Dim))?;
        }
        queue!(
            self.output,
            Print(glyph.symbol),
            SetAttribute(Attribute::Reset),
            ResetColor
        )
    }

    fn prompt(&mut self) -> io::Result<()> {
        queue!(
            self.output,
            MoveTo(0, self.prompt_row),
            Clear(ClearType::CurrentLine),
            Print(PROMPT)
        )?;
        self.output.flush()
    }

    fn explain(&mut self, message: &str) -> io::Result<()> {
        queue!(
            self.output,
            MoveTo(0, self.prompt_row.saturating_add(1)),
            Clear(ClearType::CurrentLine),
            Print(message)
        )
    }
}

impl<R, W> Presentation for TerminalPresentation<R, W>
where
    R: BufRead,
    W: Write,
{
    fn render(&mut self, scene: &Scene) -> Result<()> {
        self.draw(scene).context("failed to draw frame")
    }

    fn next_command(&mut self) -> Result<Command> {
        let mut line = String::new();
        loop {
            self.prompt().context("failed to show prompt")?;
            line.clear();
            let read = self
                .input
                .read_line(&mut line)
                .context("failed to read command")?;
            if read == 0 {
                warn!("input closed; quitting");
                return Ok(Command::Quit);
            }

            match parse_command(&line) {
                Ok(command) => return Ok(command),
                Err(rejected) => {
                    warn!(input = %rejected.input, "rejected command input");
                    self.explain(&rejected.to_string())
                        .context("failed to report rejected input")?;
                }
            }
        }
    }

    fn announce_game_over(&mut self, scene: &Scene) -> Result<()> {
        self.draw(scene).context("failed to draw final frame")?;
        queue!(
            self.output,
            MoveTo(0, self.prompt_row),
            Clear(ClearType::CurrentLine),
            Print(GAME_OVER),
            Print("\n")
        )
        .context("failed to announce game over")?;
        self.output.flush().context("failed to flush terminal")
    }
}

fn terminal_color(color: Color) -> Option<style::Color> {
    match color {
        Color::Plain => None,
        Color::Gray => Some(style::Color::Grey),
        Color::Yellow => Some(style::Color::Yellow),
        Color::Blue => Some(style::Color::Blue),
        Color::Green => Some(style::Color::Green),
    }
}
