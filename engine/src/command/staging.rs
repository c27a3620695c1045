use std::sync::{Arc, Mutex};

use crate::command::command::{CommandPayload, FrameCommand};

/// The thread-safe staging inbox between the network receive path and
/// the simulation thread — the single legitimate concurrency boundary
/// around the simulation.
///
/// Producers (receive threads, local input) stage commands at any time
/// through cloned handles. The simulation thread drains the inbox once
/// per tick at one well-defined point; after draining, the staged set
/// for that tick is immutable.
pub struct CommandStaging<P: CommandPayload> {
    inbox: Arc<Mutex<Vec<FrameCommand<P>>>>,
}

impl<P: CommandPayload> CommandStaging<P> {
    pub fn new() -> Self {
        Self {
            inbox: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Stage a command for the next drain. Callable from any thread.
    pub fn stage(&self, command: FrameCommand<P>) {
        self.inbox
            .lock()
            .expect("command staging mutex poisoned")
            .push(command);
    }

    /// Take everything staged so far, in arrival order. Called by the
    /// simulation thread exactly once per tick.
    pub fn drain(&self) -> Vec<FrameCommand<P>> {
        std::mem::take(
            &mut *self
                .inbox
                .lock()
                .expect("command staging mutex poisoned"),
        )
    }

    /// Number of commands currently staged.
    pub fn len(&self) -> usize {
        self.inbox
            .lock()
            .expect("command staging mutex poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// A clone is another handle onto the same inbox, not a copy of it.
impl<P: CommandPayload> Clone for CommandStaging<P> {
    fn clone(&self) -> Self {
        Self {
            inbox: Arc::clone(&self.inbox),
        }
    }
}

impl<P: CommandPayload> Default for CommandStaging<P> {
    fn default() -> Self {
        Self::new()
    }
}
