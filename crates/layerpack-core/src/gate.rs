//! Interactive confirmation gate
//!
//! When classification cannot decide whether a diagnostic is fatal, the
//! pipeline suspends on a single line of operator input. This is a
//! fail-closed design: an unattended run that hits an unclassifiable
//! diagnostic blocks on input (or resolves to Abort under a policy gate)
//! rather than silently producing a possibly-broken artifact.

use std::io::BufRead;
use tracing::{info, warn};

/// Resolution of a confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Resume the current step as if it had succeeded
    Continue,
    /// Terminate the whole run
    Abort,
}

impl Resolution {
    /// Parse one line of operator input. Any input containing the letter
    /// `y` (in any position, any case) continues; everything else aborts.
    pub fn from_reply(reply: &str) -> Resolution {
        if reply.to_lowercase().contains('y') {
            Resolution::Continue
        } else {
            Resolution::Abort
        }
    }
}

/// A synchronous suspend point in the pipeline's control flow
pub trait ConfirmGate {
    /// Block until the operator (or policy) resolves the prompt. The
    /// matching continue/abort message is logged after resolution.
    fn confirm(&mut self, prompt: &str, continue_msg: &str, abort_msg: &str) -> Resolution;
}

/// Gate that blocks on one line of stdin. No input available (EOF or a
/// read error) is an implicit Abort.
pub struct StdinGate;

impl ConfirmGate for StdinGate {
    fn confirm(&mut self, prompt: &str, continue_msg: &str, abort_msg: &str) -> Resolution {
        eprintln!("{prompt} [y/N] ");

        let mut reply = String::new();
        let resolution = match std::io::stdin().lock().read_line(&mut reply) {
            Ok(n) if n > 0 => Resolution::from_reply(&reply),
            _ => Resolution::Abort,
        };

        match resolution {
            Resolution::Continue => info!("{continue_msg}"),
            Resolution::Abort => warn!("{abort_msg}"),
        }
        resolution
    }
}

/// Gate with a fixed resolution, for unattended runs
pub struct PolicyGate(pub Resolution);

impl ConfirmGate for PolicyGate {
    fn confirm(&mut self, prompt: &str, continue_msg: &str, abort_msg: &str) -> Resolution {
        info!("non-interactive gate: {prompt}");
        match self.0 {
            Resolution::Continue => info!("{continue_msg}"),
            Resolution::Abort => warn!("{abort_msg}"),
        }
        self.0
    }
}
