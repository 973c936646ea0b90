//! Header line detection

use regex::Regex;

use crate::domain::process::ProcessName;

/// Pattern of the header line the publisher prints when a sub-run starts
pub const PUBLISHER_HEADER_PATTERN: &str = r"(daily|weekly|5min)\|(bluesky|threads|twitter)";

/// Recognizes sub-run header lines
///
/// Implementations decide whether a message opens a sub-run and, if so, which
/// one. The windowing algorithm only depends on this trait.
pub trait HeaderMatcher: Send + Sync {
    /// Returns the sub-run name when `message` is a header line
    fn sub_run_name(&self, message: &str) -> Option<ProcessName>;
}

/// Regex-backed header matcher
#[derive(Debug, Clone)]
pub struct PatternHeaderMatcher {
    pattern: Regex,
    whole_message: bool,
}

impl PatternHeaderMatcher {
    /// Matches the pattern anywhere in the message
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            whole_message: false,
        })
    }

    /// Matches only when the trimmed message is exactly one pattern match
    pub fn whole_message(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(&format!("^(?:{})$", pattern))?,
            whole_message: true,
        })
    }
}

impl Default for PatternHeaderMatcher {
    fn default() -> Self {
        Self::new(PUBLISHER_HEADER_PATTERN).expect("publisher header pattern is valid")
    }
}

impl HeaderMatcher for PatternHeaderMatcher {
    fn sub_run_name(&self, message: &str) -> Option<ProcessName> {
        let haystack = if self.whole_message {
            message.trim()
        } else {
            message
        };

        self.pattern
            .find(haystack)
            .map(|found| ProcessName::from(found.as_str()))
    }
}
