use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Backend-supplied complexity metadata. A pass-through projection: the core
/// renders these fields and computes nothing from them.
///
/// Field names follow the analyzer's snake_case output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Complexity {
    /// Big-O time estimate, e.g. "O(n²)"
    #[serde(default)]
    pub time: String,

    /// Big-O space estimate
    #[serde(default)]
    pub space: String,

    #[serde(default)]
    pub has_recursion: bool,

    #[serde(default)]
    pub has_loops: bool,

    #[serde(default)]
    pub has_dp: bool,

    #[serde(default)]
    pub loop_details: Vec<LoopInfo>,

    /// Function name -> memoization mechanism ("lru_cache", "dict", "list")
    #[serde(default)]
    pub memoization: BTreeMap<String, String>,
}

/// One loop found by the analyzer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoopInfo {
    /// "for" or "while"
    #[serde(rename = "type")]
    pub loop_type: String,

    /// Nesting level, 1-based
    pub nesting: usize,

    #[serde(rename = "lineno")]
    pub line: u32,
}

impl Complexity {
    /// Deepest loop nesting reported, 0 when there are no loops.
    pub fn max_nesting(&self) -> usize {
        self.loop_details
            .iter()
            .map(|l| l.nesting)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_analyzer_output() {
        let json = r#"{
            "time": "O(n)",
            "space": "O(n)",
            "has_recursion": false,
            "has_loops": true,
            "has_dp": true,
            "loop_details": [{"type": "for", "nesting": 1, "lineno": 7}],
            "memoization": {"fib_dp": "list"}
        }"#;

        let complexity: Complexity = serde_json::from_str(json).expect("valid complexity");
        assert_eq!(complexity.time, "O(n)");
        assert!(complexity.has_dp);
        assert_eq!(complexity.loop_details[0].loop_type, "for");
        assert_eq!(complexity.max_nesting(), 1);
        assert_eq!(complexity.memoization["fib_dp"], "list");
    }

    #[test]
    fn tolerates_missing_fields() {
        let complexity: Complexity =
            serde_json::from_str(r#"{"time": "Unknown", "space": "Unknown"}"#).expect("valid");
        assert!(!complexity.has_loops);
        assert_eq!(complexity.max_nesting(), 0);
    }
}
