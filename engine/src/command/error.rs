use thiserror::Error;

use crate::types::{Frame, PlayerNumber};

/// Errors that can occur while queueing or applying frame commands.
///
/// Every variant is a recoverable condition: the tick loop reports and
/// continues, it never crashes on bad input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Command targets a frame the simulation has already advanced past
    #[error("Command from player {player_number} targets frame {frame} but the simulation has advanced to frame {current_frame}")]
    LateCommand {
        player_number: PlayerNumber,
        frame: Frame,
        current_frame: Frame,
    },

    /// Unverified command attempted an operation reserved for trusted
    /// input; rejected without mutating world state
    #[error("Unverified command from player {player_number} at frame {frame} attempted an operation reserved for authoritative input")]
    UnauthorizedCommand {
        player_number: PlayerNumber,
        frame: Frame,
    },

    /// A rollback target fell outside the retained snapshot window
    #[error("Cannot roll back to frame {frame}: the oldest retained snapshot is at frame {oldest_snapshot}")]
    RollbackOutOfRange {
        frame: Frame,
        oldest_snapshot: Frame,
    },
}
