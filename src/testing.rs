//! Test doubles for the collaborator traits

use crate::build::Clock;
use crate::cache::Summer;
use crate::error::{BuildpackError, BuildpackResult};
use crate::npm::{Executable, Execution};
use crate::ui::BuildLog;
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::io;
use std::path::Path;

type Hook = Box<dyn Fn(&Execution) -> BuildpackResult<()>>;

/// Records every execution and runs an optional hook in place of npm
#[derive(Default)]
pub(crate) struct FakeExecutable {
    pub calls: RefCell<Vec<Execution>>,
    hook: Option<Hook>,
}

impl FakeExecutable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hook(hook: impl Fn(&Execution) -> BuildpackResult<()> + 'static) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            hook: Some(Box::new(hook)),
        }
    }

    /// Fails every execution with a non-zero exit
    pub fn failing() -> Self {
        Self::with_hook(|execution| {
            Err(BuildpackError::CommandExit {
                command: execution.display("npm"),
                code: 1,
            })
        })
    }

    /// First argument of every recorded call
    pub fn subcommands(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|c| c.args.first().cloned().unwrap_or_default())
            .collect()
    }
}

impl Executable for FakeExecutable {
    fn execute(&self, execution: &Execution, _log: &BuildLog) -> BuildpackResult<()> {
        self.calls.borrow_mut().push(execution.clone());
        match &self.hook {
            Some(hook) => hook(execution),
            None => Ok(()),
        }
    }
}

/// Summer whose every call fails as if the file were unreadable
pub(crate) struct FailingSummer;

impl Summer for FailingSummer {
    fn sum(&self, paths: &[&Path]) -> BuildpackResult<String> {
        Err(BuildpackError::io(
            format!("reading {}", paths[0].display()),
            io::Error::from(io::ErrorKind::PermissionDenied),
        ))
    }
}

/// Clock frozen at a fixed instant
pub(crate) struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
