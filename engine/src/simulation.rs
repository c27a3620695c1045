use std::collections::VecDeque;

use log::warn;

use crate::{
    command::{
        command::{CommandPayload, FrameCommand},
        error::CommandError,
        queue::{CommandQueue, LateCommandPolicy, QueueOutcome},
        staging::CommandStaging,
    },
    system::composite_system::CompositeSystem,
    types::Frame,
    world::world::World,
};

/// What to do when a frame arrives with no confirmed input — the
/// transport-boundary policy for a command that never shows up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingCommandPolicy {
    /// Absent input is a no-op; the tick advances regardless.
    Proceed,
    /// The tick does not advance past the last confirmed frame.
    Stall,
}

/// Startup configuration for a simulation instance.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub late_command_policy: LateCommandPolicy,
    pub missing_command_policy: MissingCommandPolicy,
    /// Per-tick world snapshots retained for rollback. Only consulted
    /// under the Rollback policy; a late command older than the window
    /// degrades to the reject path.
    pub snapshot_depth: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            late_command_policy: LateCommandPolicy::Reject,
            missing_command_policy: MissingCommandPolicy::Proceed,
            snapshot_depth: 32,
        }
    }
}

/// What one tick attempt did.
#[derive(Debug)]
pub enum TickOutcome {
    /// The frame was simulated and the cursor advanced.
    Advanced(TickReport),
    /// The confirmed-frame gate held the tick back (Stall policy).
    Stalled { awaiting_frame: Frame },
}

/// Accounting for one advanced frame.
#[derive(Debug)]
pub struct TickReport {
    pub frame: Frame,
    /// Commands folded into world state this frame.
    pub commands_applied: usize,
    /// Conditions reported and dropped this tick — late commands,
    /// unauthorized commands, unservable rollbacks. Never fatal.
    pub dropped: Vec<CommandError>,
    /// Set when a late command triggered a rewind-and-resimulate.
    pub resimulated_from: Option<Frame>,
}

/// A deterministic lockstep simulation instance.
///
/// Advances in discrete ticks on a single logical thread; each tick runs
/// to completion synchronously. The staging inbox is drained exactly
/// once per tick, before command application, and the drained set is
/// immutable for that tick. Given the same seeded world and the same
/// frame commands, two instances stay bit-identical.
pub struct Simulation<P: CommandPayload> {
    world: World,
    scheduler: CompositeSystem,
    queue: CommandQueue<P>,
    staging: CommandStaging<P>,
    tick: Frame,
    confirmed_frame: Option<Frame>,
    snapshots: VecDeque<(Frame, World)>,
    config: SimulationConfig,
}

impl<P: CommandPayload> Simulation<P> {
    pub fn new(world: World, scheduler: CompositeSystem, config: SimulationConfig) -> Self {
        Self {
            world,
            scheduler,
            queue: CommandQueue::new(config.late_command_policy),
            staging: CommandStaging::new(),
            tick: 0,
            confirmed_frame: None,
            snapshots: VecDeque::new(),
            config,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn scheduler(&self) -> &CompositeSystem {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut CompositeSystem {
        &mut self.scheduler
    }

    /// The next frame to simulate.
    pub fn current_frame(&self) -> Frame {
        self.tick
    }

    /// A producer handle onto the staging inbox, for the network receive
    /// path. Clones share the same inbox.
    pub fn staging(&self) -> CommandStaging<P> {
        self.staging.clone()
    }

    /// Stage a locally issued command for the next tick's drain.
    pub fn submit(&self, command: FrameCommand<P>) {
        self.staging.stage(command);
    }

    /// Mark input as confirmed through `frame` (inclusive). Gates the
    /// tick under the Stall policy; ignored under Proceed.
    pub fn set_confirmed_frame(&mut self, frame: Frame) {
        self.confirmed_frame = Some(frame);
    }

    /// Attempt to simulate the current frame.
    pub fn tick(&mut self) -> TickOutcome {
        if self.config.missing_command_policy == MissingCommandPolicy::Stall {
            let gate_open = self.confirmed_frame.map_or(false, |c| self.tick <= c);
            if !gate_open {
                return TickOutcome::Stalled {
                    awaiting_frame: self.tick,
                };
            }
        }

        let mut dropped = Vec::new();
        let mut rollback_to: Option<Frame> = None;

        // The single drain point; the staged set is now fixed for this tick.
        for command in self.staging.drain() {
            match self.queue.queue(command) {
                Ok(QueueOutcome::Queued) | Ok(QueueOutcome::Duplicate) => {}
                Ok(QueueOutcome::RollbackRequired { frame }) => {
                    rollback_to = Some(rollback_to.map_or(frame, |f| f.min(frame)));
                }
                Err(error) => dropped.push(error),
            }
        }

        let mut resimulated_from = None;
        if let Some(frame) = rollback_to {
            match self.rollback_to(frame) {
                Ok(()) => {
                    resimulated_from = Some(frame);
                    let mut resim = frame;
                    while resim < self.tick {
                        // Replayed frames were already reported when
                        // first simulated; their accounting is not
                        // repeated here.
                        self.run_frame(resim);
                        resim += 1;
                    }
                }
                Err(error) => {
                    warn!("{}", error);
                    let purged = self.queue.purge_stale();
                    if purged > 0 {
                        warn!("discarded {} stale command(s) after unservable rollback", purged);
                    }
                    dropped.push(error);
                }
            }
        }

        let frame = self.tick;
        let (commands_applied, mut rejected) = self.run_frame(frame);
        dropped.append(&mut rejected);
        self.tick += 1;

        TickOutcome::Advanced(TickReport {
            frame,
            commands_applied,
            dropped,
            resimulated_from,
        })
    }

    /// Clone for a parallel instance (confirmed vs. predicted state).
    /// World and systems are deep-copied; the queue, staging inbox and
    /// snapshot ring start fresh — pending input is never shared.
    /// Scheduler phases that shared context through their
    /// parameterizations must be re-wired by the caller afterwards.
    pub fn duplicate(&self) -> Simulation<P> {
        Simulation {
            world: self.world.duplicate(),
            scheduler: self.scheduler.duplicate(),
            queue: CommandQueue::new(self.config.late_command_policy),
            staging: CommandStaging::new(),
            tick: self.tick,
            confirmed_frame: self.confirmed_frame,
            snapshots: VecDeque::new(),
            config: self.config,
        }
    }

    /// Simulate one frame: snapshot, apply the frame's commands in
    /// deterministic order, run the scheduler.
    fn run_frame(&mut self, frame: Frame) -> (usize, Vec<CommandError>) {
        if self.config.late_command_policy == LateCommandPolicy::Rollback
            && self.config.snapshot_depth > 0
        {
            self.snapshots.push_back((frame, self.world.duplicate()));
            while self.snapshots.len() > self.config.snapshot_depth {
                self.snapshots.pop_front();
            }
            if let Some((oldest, _)) = self.snapshots.front() {
                self.queue.prune_log(*oldest);
            }
        }

        let commands = self.queue.take_frame(frame);
        let mut applied = 0;
        let mut dropped = Vec::new();
        for command in &commands {
            if command.requires_authority() && !command.is_authoritative() {
                let error = CommandError::UnauthorizedCommand {
                    player_number: command.player_number(),
                    frame,
                };
                warn!("rejecting command: {}", error);
                dropped.push(error);
            } else {
                command.apply(&mut self.world);
                applied += 1;
            }
        }

        self.scheduler.update(&mut self.world);
        (applied, dropped)
    }

    /// Restore the snapshot taken before `frame` and rewind the queue so
    /// the interval up to the current tick can be resimulated.
    fn rollback_to(&mut self, frame: Frame) -> Result<(), CommandError> {
        let Some(index) = self.snapshots.iter().position(|(f, _)| *f == frame) else {
            let oldest_snapshot = self
                .snapshots
                .front()
                .map(|(f, _)| *f)
                .unwrap_or(self.tick);
            return Err(CommandError::RollbackOutOfRange {
                frame,
                oldest_snapshot,
            });
        };

        let (_, snapshot) = &self.snapshots[index];
        self.world = snapshot.duplicate();
        // Frames at and after the target re-record as they resimulate.
        self.snapshots.truncate(index);
        self.queue.rewind(frame);
        Ok(())
    }
}
