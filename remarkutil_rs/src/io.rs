//! Input and output boundary. `-` stands for stdin / stdout.

use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Read, Write};
use std::path::Path;

use crate::error::{RemarkError, Result};

pub const STDIO: &str = "-";

fn is_stdio(path: &Path) -> bool {
    path.as_os_str().is_empty() || path == Path::new(STDIO)
}

/// Reads the whole input into memory.
pub fn read_input(path: &Path) -> Result<String> {
    let source_open = |source| RemarkError::SourceOpen {
        path: path.to_path_buf(),
        source,
    };
    if is_stdio(path) {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(source_open)?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path).map_err(source_open)
}

/// Report destination.
pub enum Output {
    Stdout(io::Stdout),
    File(BufWriter<File>),
}

impl Output {
    /// Opens (creating or truncating) the destination.
    pub fn open(path: &Path) -> Result<Self> {
        if is_stdio(path) {
            return Ok(Output::Stdout(io::stdout()));
        }
        let file = File::create(path).map_err(|source| RemarkError::DestinationOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Output::File(BufWriter::new(file)))
    }

    /// Whether colored output may reach a terminal.
    pub fn is_terminal(&self) -> bool {
        match self {
            Output::Stdout(stdout) => stdout.is_terminal(),
            Output::File(_) => false,
        }
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout(stdout) => stdout.write(buf),
            Output::File(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout(stdout) => stdout.flush(),
            Output::File(writer) => writer.flush(),
        }
    }
}
