//! Indented build log writer

use console::style;
use std::cell::RefCell;
use std::io::{self, Write};

/// Indentation level of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Top-level step, e.g. "Resolving installation process"
    Process,
    /// Detail of a step
    Subprocess,
    /// Individual action or value
    Action,
}

impl Level {
    fn indent(self) -> &'static str {
        match self {
            Self::Process => "  ",
            Self::Subprocess => "    ",
            Self::Action => "      ",
        }
    }
}

/// Build log sink with title/process/subprocess/action levels
pub struct BuildLog {
    out: RefCell<Box<dyn Write>>,
}

impl BuildLog {
    /// Create a log writing to the given sink
    pub fn new(out: impl Write + 'static) -> Self {
        Self {
            out: RefCell::new(Box::new(out)),
        }
    }

    /// Log writing to stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Log that discards everything
    pub fn sink() -> Self {
        Self::new(io::sink())
    }

    /// Buildpack name and version banner
    pub fn title(&self, title: &str) {
        self.line(&style(title).bold().to_string());
    }

    pub fn process(&self, message: &str) {
        self.emit(Level::Process, message);
    }

    pub fn subprocess(&self, message: &str) {
        self.emit(Level::Subprocess, message);
    }

    pub fn action(&self, message: &str) {
        self.emit(Level::Action, message);
    }

    /// Empty separator line
    pub fn break_line(&self) {
        self.line("");
    }

    /// Write `key -> "value"` lines sorted by key with aligned arrows
    pub fn map(&self, level: Level, entries: &[(&str, String)]) {
        let mut sorted: Vec<&(&str, String)> = entries.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let width = sorted.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (key, value) in sorted {
            self.emit(level, &format!("{:<width$} -> {:?}", key, value));
        }
    }

    fn emit(&self, level: Level, message: &str) {
        self.line(&format!("{}{}", level.indent(), message));
    }

    fn line(&self, text: &str) {
        // The build log is best effort; a closed stdout must not fail the build.
        let mut out = self.out.borrow_mut();
        writeln!(out, "{}", text).ok();
        out.flush().ok();
    }
}

/// In-memory sink whose contents stay readable after the log takes ownership
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct LogBuffer(std::rc::Rc<RefCell<Vec<u8>>>);

#[cfg(test)]
impl LogBuffer {
    pub(crate) fn log(&self) -> BuildLog {
        BuildLog::new(self.clone())
    }

    pub(crate) fn contents(&self) -> String {
        console::strip_ansi_codes(&String::from_utf8_lossy(&self.0.borrow())).into_owned()
    }
}

#[cfg(test)]
impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
