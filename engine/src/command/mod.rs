//! Frame commands and the deterministic path they travel: constructed
//! locally or depacketized from the wire, staged across the thread
//! boundary, held in a per-frame bucket until the tick cursor reaches
//! their target frame, folded into world state exactly once, then
//! discarded (or retained in the replay log when rollback is enabled).

pub mod command;
pub mod error;
pub mod queue;
pub mod staging;
