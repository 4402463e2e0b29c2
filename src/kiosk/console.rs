//! Line-oriented terminal I/O shared by the screens and the console decoder.

use std::{
    fmt::Display,
    io::{self, Write},
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

pub struct Console<R, W> {
    lines: Lines<R>,
    out: W,
}

impl Console<BufReader<Stdin>, io::Stdout> {
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), io::stdout())
    }
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(reader: R, out: W) -> Self {
        Self {
            lines: reader.lines(),
            out,
        }
    }

    /// Next input line without its terminator, `None` once input is closed.
    ///
    /// # Errors
    /// Returns an error if reading fails.
    pub async fn read_line(&mut self) -> io::Result<Option<String>> {
        self.lines.next_line().await
    }

    /// Print `label` without a newline and read the answer.
    ///
    /// # Errors
    /// Returns an error if writing or reading fails.
    pub async fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.out, "{label}")?;
        self.out.flush()?;
        self.read_line().await
    }

    /// # Errors
    /// Returns an error if writing fails.
    pub fn line(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    pub fn output(&self) -> &W {
        &self.out
    }
}
