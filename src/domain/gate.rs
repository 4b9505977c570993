// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Emission gates: feature flags and application version ranges

use crate::shared::error::{Result, StencilError};
use semver::{Version, VersionReq};
use std::fmt;

/// A semantic-version range such as `<3.0.0` or `>=2.2.0, <3.0.0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionGate {
    expression: String,
    req: VersionReq,
}

impl VersionGate {
    pub fn parse(expression: &str) -> Result<Self> {
        let trimmed = expression.trim();
        if trimmed.is_empty() {
            return Err(StencilError::gate_evaluation(
                expression,
                "empty version constraint",
            ));
        }

        let req = VersionReq::parse(trimmed)
            .map_err(|e| StencilError::gate_evaluation(trimmed, e.to_string()))?;

        Ok(Self {
            expression: trimmed.to_string(),
            req,
        })
    }

    /// Matches anything.
    pub fn any() -> Self {
        Self {
            expression: "*".to_string(),
            req: VersionReq::STAR,
        }
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// A current version that cannot be read as semver never satisfies the gate.
    pub fn matches(&self, current_version: &str) -> bool {
        match parse_lenient_version(current_version) {
            Some(version) => self.req.matches(&version),
            None => {
                tracing::warn!(
                    version = %current_version,
                    constraint = %self.expression,
                    "current version is not a semantic version, gate does not hold"
                );
                false
            }
        }
    }
}

impl fmt::Display for VersionGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

impl std::str::FromStr for VersionGate {
    type Err = StencilError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Accepts `v2.9.0`, `2.9` and `2` in addition to full semver.
pub fn parse_lenient_version(raw: &str) -> Option<Version> {
    let cleaned = raw.trim();
    let cleaned = cleaned.strip_prefix('v').unwrap_or(cleaned);
    if let Ok(version) = Version::parse(cleaned) {
        return Some(version);
    }

    let (core, rest) = match cleaned.find(['-', '+']) {
        Some(idx) => cleaned.split_at(idx),
        None => (cleaned, ""),
    };
    let padded = match core.split('.').count() {
        1 => format!("{}.0.0{}", core, rest),
        2 => format!("{}.0{}", core, rest),
        _ => return None,
    };
    Version::parse(&padded).ok()
}

/// True only if every flag is set and the version gate holds.
/// Flags are `(name, value)` pairs; names are only used for logging.
pub fn should_emit(flags: &[(&str, bool)], gate: &VersionGate, current_version: &str) -> bool {
    if let Some((name, _)) = flags.iter().find(|(_, enabled)| !enabled) {
        tracing::debug!(flag = %name, "gate closed: flag disabled");
        return false;
    }

    let version_ok = gate.matches(current_version);
    tracing::debug!(
        constraint = %gate,
        version = %current_version,
        open = version_ok,
        "version gate evaluated"
    );
    version_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_emit_below_major_three() {
        let gate = VersionGate::parse("<3.0.0").unwrap();
        let flags = [("webserver.enabled", true), ("podDisruptionBudget.enabled", true)];
        assert!(should_emit(&flags, &gate, "2.9.0"));
        assert!(!should_emit(&flags, &gate, "3.0.0"));
    }

    #[test]
    fn test_any_disabled_flag_suppresses() {
        let gate = VersionGate::any();
        assert!(!should_emit(&[("a", true), ("b", false)], &gate, "2.0.0"));
        assert!(!should_emit(&[("a", false), ("b", true)], &gate, "2.0.0"));
        assert!(should_emit(&[], &gate, "2.0.0"));
    }

    #[test]
    fn test_unparseable_constraint_is_gate_error() {
        let err = VersionGate::parse("less than three").unwrap_err();
        match err {
            StencilError::GateEvaluation { expression, .. } => {
                assert_eq!(expression, "less than three")
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(VersionGate::parse("   ").is_err());
    }

    #[test]
    fn test_lenient_versions() {
        let gate = VersionGate::parse(">=2.2.0, <3.0.0").unwrap();
        assert!(gate.matches("v2.9.1"));
        assert!(gate.matches("2.4"));
        assert!(!gate.matches("3"));
        assert!(!gate.matches("not-a-version"));
        assert_eq!(
            parse_lenient_version("2.10"),
            Some(Version::new(2, 10, 0))
        );
    }
}
