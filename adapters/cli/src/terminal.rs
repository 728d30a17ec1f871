//! Plain-text rendering backend writing to any [`Write`] sink.

use std::{io::Write, thread, time::Duration};

use anyhow::{Context, Result};
use playground_rendering::{Frame, Notice, RenderingBackend, Tone};

/// Writes frames and notices as text, optionally pausing after every frame.
#[derive(Debug)]
pub(crate) struct TerminalBackend<W> {
    sink: W,
    frame_delay: Option<Duration>,
}

impl<W: Write> TerminalBackend<W> {
    pub(crate) fn new(sink: W, frame_delay: Option<Duration>) -> Self {
        Self { sink, frame_delay }
    }

    /// Writes a free-form line, such as an exported layout code.
    pub(crate) fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.sink, "{text}").context("failed to write to terminal")
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write> RenderingBackend for TerminalBackend<W> {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        writeln!(self.sink, "{frame}\n").context("failed to write frame")?;
        self.sink.flush().context("failed to flush frame")?;
        if let Some(delay) = self.frame_delay {
            thread::sleep(delay);
        }
        Ok(())
    }

    fn notify(&mut self, notice: &Notice) -> Result<()> {
        let marker = match notice.tone {
            Tone::Info => "[info]",
            Tone::Success => "[ok]",
            Tone::Warning => "[warn]",
        };
        writeln!(self.sink, "{marker} {}", notice.message).context("failed to write notice")
    }
}
