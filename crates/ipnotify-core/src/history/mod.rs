// # History Log Implementations
//
// This module provides implementations of the HistoryLog trait.

pub mod file;
pub mod memory;

pub use file::FileHistoryLog;
pub use memory::MemoryHistoryLog;

/// Maximum entries retained in a history log (oldest evicted first)
pub const HISTORY_CAP: usize = 100;
