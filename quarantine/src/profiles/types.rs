//! Profile data model and the two wire dialects (spec §6).

use serde::{Deserialize, Serialize};

/// Canonical, dialect-independent action. Converted to wire strings only
/// at serialization time (spec Design Note (c): pick one canonical
/// representation internally, convert at the wire edge).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Allow,
    Errno,
}

/// Which wire dialect a consumer expects. The two are not interchangeable
/// — a VMM speaking the native dialect will not recognize `"Allow"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `SCMP_ACT_ALLOW` / `SCMP_ACT_ERRNO`, used by the fixed profile
    /// library (this is the dialect [`super::library::ProfileLibrary`]
    /// serves by default).
    VmmNative,
    /// `Allow` / `Errno`, used by template-driven profile generators.
    Generator,
}

impl Action {
    pub fn as_wire_str(&self, dialect: Dialect) -> &'static str {
        match (self, dialect) {
            (Action::Allow, Dialect::VmmNative) => "SCMP_ACT_ALLOW",
            (Action::Errno, Dialect::VmmNative) => "SCMP_ACT_ERRNO",
            (Action::Allow, Dialect::Generator) => "Allow",
            (Action::Errno, Dialect::Generator) => "Errno",
        }
    }

    pub fn from_wire_str(s: &str) -> Option<(Self, Dialect)> {
        match s {
            "SCMP_ACT_ALLOW" => Some((Action::Allow, Dialect::VmmNative)),
            "SCMP_ACT_ERRNO" => Some((Action::Errno, Dialect::VmmNative)),
            "Allow" => Some((Action::Allow, Dialect::Generator)),
            "Errno" => Some((Action::Errno, Dialect::Generator)),
            _ => None,
        }
    }
}

/// A named group of syscalls sharing one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleGroup {
    pub names: Vec<String>,
    pub action: Action,
}

impl RuleGroup {
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>, action: Action) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            action,
        }
    }
}

/// A complete syscall-filter profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub default_action: Action,
    pub rule_groups: Vec<RuleGroup>,
}

impl Profile {
    pub fn new(default_action: Action, rule_groups: Vec<RuleGroup>) -> Self {
        Self {
            default_action,
            rule_groups,
        }
    }

    /// Total number of syscall names across all rule groups — used by the
    /// gradation invariant `|default| < |quarantine| < |quarantine-strict|`.
    pub fn syscall_count(&self) -> usize {
        self.rule_groups.iter().map(|g| g.names.len()).sum()
    }
}

/// Parse a profile previously produced by [`super::library::ProfileLibrary::serialize`].
///
/// Round-trips with `serialize`: `parse(serialize(p)) == p` for every
/// canonical profile (spec §8 universal invariant).
pub fn parse(json: &str) -> Result<Profile, String> {
    let wire: WireProfile = serde_json::from_str(json).map_err(|e| e.to_string())?;
    let (default_action, _) =
        Action::from_wire_str(&wire.default_action).ok_or_else(|| {
            format!("unrecognized default_action '{}'", wire.default_action)
        })?;
    let mut rule_groups = Vec::with_capacity(wire.syscalls.len());
    for group in wire.syscalls {
        let (action, _) = Action::from_wire_str(&group.action)
            .ok_or_else(|| format!("unrecognized action '{}'", group.action))?;
        rule_groups.push(RuleGroup {
            names: group.names,
            action,
        });
    }
    Ok(Profile {
        default_action,
        rule_groups,
    })
}

#[derive(Serialize, Deserialize)]
struct WireProfile {
    default_action: String,
    syscalls: Vec<WireRuleGroup>,
}

#[derive(Serialize, Deserialize)]
struct WireRuleGroup {
    names: Vec<String>,
    action: String,
}
