use std::io::{self, IsTerminal, Write};
use tracing_subscriber::fmt::{MakeWriter, TestWriter};

use crate::ConsoleStream;

impl ConsoleStream {
    /// Whether the stream is attached to a terminal that can
    /// render ANSI colors.
    #[must_use]
    pub fn supports_color(self) -> bool {
        match self {
            Self::Stdout => io::stdout().is_terminal(),
            Self::Stderr => io::stderr().is_terminal(),
            Self::TestWriter => false,
        }
    }
}

impl<'w> MakeWriter<'w> for ConsoleStream {
    type Writer = ConsoleWriter;

    fn make_writer(&'w self) -> Self::Writer {
        // stdio stays locked for the whole event so lines from
        // different threads do not interleave
        match self {
            Self::Stdout => ConsoleWriter::Stdout(io::stdout().lock()),
            Self::Stderr => ConsoleWriter::Stderr(io::stderr().lock()),
            Self::TestWriter => ConsoleWriter::Test(TestWriter::new()),
        }
    }
}

/// Writer of a single log event for a [`ConsoleStream`].
pub enum ConsoleWriter {
    Stdout(io::StdoutLock<'static>),
    Stderr(io::StderrLock<'static>),
    Test(TestWriter),
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout(w) => w.write(buf),
            Self::Stderr(w) => w.write(buf),
            Self::Test(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::Stderr(w) => w.flush(),
            Self::Test(w) => w.flush(),
        }
    }
}
