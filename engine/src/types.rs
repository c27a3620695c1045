/// Identifies one participant in a session. Stable for the lifetime of
/// the session and identical on every machine.
pub type PlayerNumber = u32;

/// A simulation frame number. Monotonic from session start; every
/// participant applies the same commands at the same frame.
pub type Frame = u64;
