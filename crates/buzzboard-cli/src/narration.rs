//! Speech through an external text-to-speech program.

use std::{
    process::{Child, Command, Stdio},
    time::Duration,
};

use buzzboard_engine::{Narration, NarrationError, Narrator};

/// Speaks by running `program [args...] <text>`, one process per clue.
///
/// The process exiting is the completion signal; a non-zero exit status is a
/// playback failure.
#[derive(Debug, Clone)]
pub struct CommandNarrator {
    program: String,
    args: Vec<String>,
}

impl CommandNarrator {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl Narrator for CommandNarrator {
    fn speak(&mut self, text: &str, _now: Duration) -> Result<Box<dyn Narration>, NarrationError> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| NarrationError::new(format!("cannot run {}: {e}", self.program)))?;
        tracing::debug!(program = %self.program, pid = child.id(), "narration started");
        Ok(Box::new(CommandNarration { child: Some(child) }))
    }
}

#[derive(Debug)]
struct CommandNarration {
    /// `None` once the process has been reaped.
    child: Option<Child>,
}

impl Narration for CommandNarration {
    fn take_signal(&mut self, _now: Duration) -> Option<Result<(), NarrationError>> {
        let child = self.child.as_mut()?;
        let result = match child.try_wait() {
            Ok(None) => return None,
            Ok(Some(status)) if status.success() => Ok(()),
            Ok(Some(status)) => Err(NarrationError::new(format!("speech program {status}"))),
            Err(e) => Err(NarrationError::new(format!("cannot poll speech program: {e}"))),
        };
        self.child = None;
        Some(result)
    }

    fn is_speaking(&mut self, _now: Duration) -> bool {
        self.child
            .as_mut()
            .is_some_and(|child| matches!(child.try_wait(), Ok(None)))
    }

    fn cancel(&mut self) {
        if let Some(mut child) = self.child.take() {
            // The process may already have exited.
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for CommandNarration {
    fn drop(&mut self) {
        self.cancel();
    }
}
