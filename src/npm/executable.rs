//! Running npm
//!
//! npm runs synchronously in the application directory. Its stdout and
//! stderr are streamed line by line into the build log as they arrive.

use crate::error::{BuildpackError, BuildpackResult};
use crate::ui::BuildLog;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Sender};
use std::thread;
use tracing::debug;

/// A single npm invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// Arguments after the executable name
    pub args: Vec<String>,
    /// Directory to run in
    pub dir: PathBuf,
}

impl Execution {
    pub fn new<I, S>(args: I, dir: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            dir: dir.into(),
        }
    }

    /// `npm <args>` as typed on a shell
    pub fn display(&self, program: &str) -> String {
        std::iter::once(program)
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Something that can run a package-manager invocation to completion
pub trait Executable {
    /// Run `execution`, blocking until the process exits.
    /// A non-zero exit is an error.
    fn execute(&self, execution: &Execution, log: &BuildLog) -> BuildpackResult<()>;
}

/// The `npm` binary found on PATH
#[derive(Debug, Clone)]
pub struct Npm {
    program: String,
}

impl Npm {
    pub fn new() -> Self {
        Self {
            program: "npm".to_string(),
        }
    }

    /// Use a different program, e.g. an absolute path to npm
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Npm {
    fn default() -> Self {
        Self::new()
    }
}

impl Executable for Npm {
    fn execute(&self, execution: &Execution, log: &BuildLog) -> BuildpackResult<()> {
        let command = execution.display(&self.program);
        debug!("Executing: {} (in {})", command, execution.dir.display());

        let mut child = Command::new(&self.program)
            .args(&execution.args)
            .current_dir(&execution.dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| BuildpackError::command_failed(command.clone(), e))?;

        let (tx, rx) = mpsc::channel();
        let mut readers = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            let tx = tx.clone();
            readers.push(thread::spawn(move || forward_lines(stdout, tx)));
        }
        if let Some(stderr) = child.stderr.take() {
            let tx = tx.clone();
            readers.push(thread::spawn(move || forward_lines(stderr, tx)));
        }
        drop(tx);

        // Ends once both pipes are closed.
        for line in rx {
            log.action(&line);
        }
        for reader in readers {
            reader.join().ok();
        }

        let status = child
            .wait()
            .map_err(|e| BuildpackError::command_failed(command.clone(), e))?;
        if status.success() {
            debug!("{} succeeded", command);
            return Ok(());
        }

        Err(BuildpackError::CommandExit {
            command,
            code: status.code().unwrap_or(-1),
        })
    }
}

/// Send every line read from `reader` to `tx`, decoding lossily
fn forward_lines(reader: impl Read, tx: Sender<String>) {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\r', '\n']).to_string();
                if tx.send(line).is_err() {
                    break;
                }
            }
        }
    }
}
