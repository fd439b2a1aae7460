use serde::{Deserialize, Serialize};
use std::fmt;

/// The call type assumed when a join request does not name one.
pub const DEFAULT_CALL_TYPE: &str = "default";

/// Identifies the call an agent should join.
///
/// The `call_id` is an opaque string minted by the call provider; the control
/// plane never interprets it beyond using it as a registry key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallTarget {
    /// The kind of call (e.g. "default", "livestream").
    pub call_type: String,
    /// Opaque identifier uniquely naming the call.
    pub call_id: String,
}

impl CallTarget {
    /// Creates a target for a specific call.
    pub fn new(call_type: impl Into<String>, call_id: impl Into<String>) -> Self {
        Self {
            call_type: call_type.into(),
            call_id: call_id.into(),
        }
    }
}

impl fmt::Display for CallTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.call_type, self.call_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_type_colon_id() {
        let target = CallTarget::new("default", "call-123");
        assert_eq!(target.to_string(), "default:call-123");
    }

    #[test]
    fn round_trips_through_json() {
        let target = CallTarget::new("livestream", "abc");
        let json = serde_json::to_string(&target).unwrap();
        let back: CallTarget = serde_json::from_str(&json).unwrap();
        assert_eq!(back, target);
    }
}
