use regex::Regex;
use serde::Deserialize;
use tracing::{debug, error};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherKind {
    Eq,
    Include,
    NotInclude,
    IncludeAll,
    Regex,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MatcherValue {
    Single(String),
    Multiple(Vec<String>),
}

/// Check applied to the rendered output of a scenario.
#[derive(Debug, Deserialize)]
pub struct Matcher {
    pub kind: MatcherKind,
    pub value: MatcherValue,
}

impl Matcher {
    pub fn matches(&self, actual: &str) -> bool {
        debug!(kind = ?self.kind, "matching scenario output");
        match (&self.kind, &self.value) {
            (MatcherKind::Eq, MatcherValue::Single(s)) => actual.trim() == s.trim(),
            (MatcherKind::Eq, MatcherValue::Multiple(lines)) => {
                actual.trim().lines().eq(lines.iter().map(String::as_str))
            }
            (MatcherKind::Include, MatcherValue::Single(s)) => actual.contains(s.as_str()),
            (MatcherKind::NotInclude, MatcherValue::Single(s)) => !actual.contains(s.as_str()),
            (MatcherKind::IncludeAll, MatcherValue::Multiple(parts)) => {
                parts.iter().all(|p| actual.contains(p.as_str()))
            }
            (MatcherKind::Regex, MatcherValue::Single(pattern)) => match Regex::new(pattern) {
                Ok(re) => re.is_match(actual),
                Err(e) => {
                    error!("Invalid regex '{}': {}", pattern, e);
                    false
                }
            },
            _ => {
                error!("Invalid matcher kind/value combination");
                false
            }
        }
    }
}
