//! Long-running jobs spawned next to the HTTP listener. Each one loops on
//! an interval until its [`CancellationToken`] fires.

pub mod maintenance;
