//! Overflow policies for the async logging queue
//!
//! When the worker pool's queue is full, the policy of the posting logger
//! decides whether the producer waits or the oldest pending envelope is dropped.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Policy for handling queue overflow in async logging
///
/// # Example
///
/// ```
/// use rust_async_logger::OverflowPolicy;
///
/// // Default behavior: wait for room, never lose records
/// assert_eq!(OverflowPolicy::default(), OverflowPolicy::Block);
///
/// let policy: OverflowPolicy = "overwrite".parse().unwrap();
/// assert_eq!(policy, OverflowPolicy::Overwrite);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Block the producer until space is available
    ///
    /// No record is lost, but a slow sink applies backpressure to every
    /// thread that logs.
    #[default]
    Block,

    /// Evict the oldest pending envelope to make room
    ///
    /// Producers never wait on a full queue. Each eviction increments the
    /// pool's overrun counter.
    Overwrite,
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::Block => write!(f, "Block"),
            OverflowPolicy::Overwrite => write!(f, "Overwrite"),
        }
    }
}

impl std::str::FromStr for OverflowPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "block" => Ok(OverflowPolicy::Block),
            "overwrite" | "overrun_oldest" => Ok(OverflowPolicy::Overwrite),
            _ => Err(format!("Invalid overflow policy: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_policy_default() {
        assert_eq!(OverflowPolicy::default(), OverflowPolicy::Block);
    }

    #[test]
    fn test_overflow_policy_display() {
        assert_eq!(format!("{}", OverflowPolicy::Block), "Block");
        assert_eq!(format!("{}", OverflowPolicy::Overwrite), "Overwrite");
    }

    #[test]
    fn test_overflow_policy_parse() {
        assert_eq!("BLOCK".parse::<OverflowPolicy>(), Ok(OverflowPolicy::Block));
        assert_eq!(
            "overrun_oldest".parse::<OverflowPolicy>(),
            Ok(OverflowPolicy::Overwrite)
        );
        assert!("drop".parse::<OverflowPolicy>().is_err());
    }

    #[test]
    fn test_overflow_policy_serde() {
        let json = serde_json::to_string(&OverflowPolicy::Overwrite).unwrap();
        assert_eq!(json, "\"overwrite\"");
        let back: OverflowPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OverflowPolicy::Overwrite);
    }
}
