use std::collections::BTreeMap;

use log::warn;

use crate::{
    command::{
        command::{CommandPayload, FrameCommand},
        error::CommandError,
    },
    types::Frame,
};

/// What to do with a command whose target frame is already behind the
/// simulation's tick cursor. The choice is explicit configuration, never
/// a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LateCommandPolicy {
    /// Drop the command and surface the discrepancy to the caller.
    Reject,
    /// Rewind to the command's frame and resimulate. The queue retains
    /// an ordered log of applied commands to replay from.
    Rollback,
}

/// Result of queueing one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueOutcome {
    /// Held in its frame bucket awaiting the tick cursor.
    Queued,
    /// Byte-identical to a command already queued (or already applied)
    /// for the same player and frame — a retransmission, dropped.
    Duplicate,
    /// The command landed behind the cursor under the Rollback policy;
    /// the caller must rewind to this frame and resimulate.
    RollbackRequired { frame: Frame },
}

/// The deterministic command queue: frame-bucketed storage between
/// command arrival and command application.
///
/// Commands are never reordered across frames; within one frame the
/// apply order is a stable sort by player number, so multiple players'
/// commands landing in the same frame produce the same result on every
/// machine. Retransmitted commands (byte-identical image, same player,
/// same frame) are deduplicated to exactly-once application.
pub struct CommandQueue<P: CommandPayload> {
    buckets: BTreeMap<Frame, Vec<FrameCommand<P>>>,
    /// First frame not yet taken.
    next_frame: Frame,
    policy: LateCommandPolicy,
    /// Ordered log of every taken command, retained only under the
    /// Rollback policy so rewound frames can be replayed.
    log: Vec<FrameCommand<P>>,
}

impl<P: CommandPayload> CommandQueue<P> {
    pub fn new(policy: LateCommandPolicy) -> Self {
        Self {
            buckets: BTreeMap::new(),
            next_frame: 0,
            policy,
            log: Vec::new(),
        }
    }

    pub fn policy(&self) -> LateCommandPolicy {
        self.policy
    }

    /// The first frame whose commands have not yet been taken.
    pub fn next_frame(&self) -> Frame {
        self.next_frame
    }

    /// Number of commands waiting in frame buckets.
    pub fn pending_count(&self) -> usize {
        self.buckets.values().map(|bucket| bucket.len()).sum()
    }

    /// Place a command into its frame bucket.
    ///
    /// A late command (target frame behind the cursor) either errors
    /// (`Reject` policy) or is bucketed anyway and reported as
    /// `RollbackRequired` (`Rollback` policy) — the caller then rewinds
    /// before taking frames again.
    pub fn queue(&mut self, command: FrameCommand<P>) -> Result<QueueOutcome, CommandError> {
        let frame = command.frame();

        if frame < self.next_frame {
            match self.policy {
                LateCommandPolicy::Reject => {
                    let error = CommandError::LateCommand {
                        player_number: command.player_number(),
                        frame,
                        current_frame: self.next_frame,
                    };
                    warn!("dropping late command: {}", error);
                    return Err(error);
                }
                LateCommandPolicy::Rollback => {
                    // Retransmission of a command we already applied is
                    // not a reason to rewind.
                    if self.is_duplicate_of_logged(&command) {
                        return Ok(QueueOutcome::Duplicate);
                    }
                    if Self::bucket_insert(self.buckets.entry(frame).or_default(), command) {
                        return Ok(QueueOutcome::RollbackRequired { frame });
                    }
                    return Ok(QueueOutcome::Duplicate);
                }
            }
        }

        if Self::bucket_insert(self.buckets.entry(frame).or_default(), command) {
            Ok(QueueOutcome::Queued)
        } else {
            Ok(QueueOutcome::Duplicate)
        }
    }

    /// Take the bucket for the cursor frame, stably sorted by player
    /// number, advancing the cursor. Under the Rollback policy the taken
    /// commands are appended to the retained log.
    pub fn take_frame(&mut self, frame: Frame) -> Vec<FrameCommand<P>> {
        debug_assert_eq!(frame, self.next_frame);

        let mut commands = self.buckets.remove(&frame).unwrap_or_default();
        commands.sort_by_key(|command| command.player_number());
        self.next_frame = frame + 1;

        if self.policy == LateCommandPolicy::Rollback {
            self.log.extend(commands.iter().cloned());
        }

        commands
    }

    /// Move the cursor back to `frame`, returning every logged command
    /// at or after it to its frame bucket so the interval can be
    /// resimulated. Only meaningful under the Rollback policy.
    pub fn rewind(&mut self, frame: Frame) {
        let keep = self
            .log
            .iter()
            .position(|command| command.frame() >= frame)
            .unwrap_or(self.log.len());
        for command in self.log.split_off(keep) {
            Self::bucket_insert(self.buckets.entry(command.frame()).or_default(), command);
        }
        self.next_frame = frame;
    }

    /// Drop any bucketed command left behind the cursor — the cleanup
    /// path when a requested rollback turned out to be unservable.
    /// Returns the number of commands discarded.
    pub fn purge_stale(&mut self) -> usize {
        let stale: Vec<Frame> = self
            .buckets
            .range(..self.next_frame)
            .map(|(frame, _)| *frame)
            .collect();
        let mut purged = 0;
        for frame in stale {
            if let Some(bucket) = self.buckets.remove(&frame) {
                purged += bucket.len();
            }
        }
        purged
    }

    /// Discard log entries for frames before `frame`; they can no longer
    /// be rewound to because no snapshot that old is retained.
    pub fn prune_log(&mut self, frame: Frame) {
        self.log.retain(|command| command.frame() >= frame);
    }

    /// Insert unless a byte-identical command from the same player is
    /// already present. Returns true if inserted.
    fn bucket_insert(bucket: &mut Vec<FrameCommand<P>>, command: FrameCommand<P>) -> bool {
        let image = command.to_bytes();
        let duplicate = bucket.iter().any(|existing| {
            existing.player_number() == command.player_number() && existing.to_bytes() == image
        });
        if duplicate {
            return false;
        }
        bucket.push(command);
        true
    }

    fn is_duplicate_of_logged(&self, command: &FrameCommand<P>) -> bool {
        let image = command.to_bytes();
        self.log.iter().any(|logged| {
            logged.frame() == command.frame()
                && logged.player_number() == command.player_number()
                && logged.to_bytes() == image
        })
    }
}
