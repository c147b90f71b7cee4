//! C1 — resolves, caches, and serializes syscall-filter profiles.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::OnceLock;

use parking_lot::RwLock;
use quarantine_shared::errors::QuarantineResult;

use super::builtin::{default_profile, quarantine_profile, quarantine_strict_profile};
use super::class_map::class_to_profile_name;
use super::types::{Dialect, Profile};

const CANONICAL_DEFAULT: &str = "default";
const CANONICAL_QUARANTINE: &str = "quarantine";
const CANONICAL_STRICT: &str = "quarantine-strict";

/// Maps any requested name onto one of the three canonical profiles.
/// Anything not recognized aliases to `default` (spec §4.1) — the
/// public API never returns not-found for an arbitrary name, only the
/// three canonical names are guaranteed present and those never fail.
fn canonical_name(name: &str) -> &'static str {
    match name {
        CANONICAL_DEFAULT => CANONICAL_DEFAULT,
        CANONICAL_QUARANTINE => CANONICAL_QUARANTINE,
        CANONICAL_STRICT => CANONICAL_STRICT,
        _ => CANONICAL_DEFAULT,
    }
}

fn build(name: &str) -> Profile {
    match name {
        CANONICAL_QUARANTINE => quarantine_profile(),
        CANONICAL_STRICT => quarantine_strict_profile(),
        _ => default_profile(),
    }
}

/// Read-through, insertion-only profile cache. Profiles are
/// content-addressed by canonical name and never evicted during process
/// lifetime; a concurrent miss for the same name may compute the profile
/// twice, but both computations are equal, so last-writer-wins is safe.
#[derive(Default)]
struct ProfileCache {
    entries: RwLock<HashMap<&'static str, Arc<Profile>>>,
}

impl ProfileCache {
    fn get_or_build(&self, name: &'static str) -> Arc<Profile> {
        if let Some(hit) = self.entries.read().get(name) {
            return hit.clone();
        }
        let profile = Arc::new(build(name));
        self.entries.write().insert(name, profile.clone());
        profile
    }
}

/// C1: the profile library. Cheaply cloneable (the cache lives behind an
/// `Arc`), so it can be shared with the [`crate::manager`] without extra
/// synchronization on the caller's part.
#[derive(Clone)]
pub struct ProfileLibrary {
    cache: Arc<ProfileCache>,
}

impl ProfileLibrary {
    pub fn new() -> Self {
        Self {
            cache: Arc::new(ProfileCache::default()),
        }
    }

    /// A process-wide instance, initialized on first use. Use this when
    /// the host environment is fine with a process global; otherwise
    /// construct a [`ProfileLibrary`] and thread it through explicitly.
    pub fn global() -> &'static ProfileLibrary {
        static GLOBAL: OnceLock<ProfileLibrary> = OnceLock::new();
        GLOBAL.get_or_init(ProfileLibrary::new)
    }

    /// Resolve a profile by name. `default`, `quarantine`, and
    /// `quarantine-strict` always succeed; any other name aliases to
    /// `default`.
    pub fn get_by_name(&self, name: &str) -> QuarantineResult<Arc<Profile>> {
        let canonical = canonical_name(name);
        Ok(self.cache.get_or_build(canonical))
    }

    /// Resolve the default profile for a workload class (spec §3 default
    /// map). Unknown classes fail safe to `quarantine`.
    pub fn get_for_class(&self, class: &str) -> QuarantineResult<Arc<Profile>> {
        let name = class_to_profile_name(class);
        self.get_by_name(name)
    }

    /// Serialize a profile to its stable on-wire JSON form. Field order
    /// is fixed (`default_action`, then `syscalls` with `names`/`action`
    /// per group); identical profiles serialize byte-for-byte identically
    /// across runs.
    pub fn serialize(&self, profile: &Profile, dialect: Dialect) -> String {
        serialize_profile(profile, dialect)
    }

    /// Human-readable one-line summary for audit logging, mirroring the
    /// kind of description a jailer would log when it picks a filter.
    pub fn describe(&self, name: &str) -> String {
        let profile = self.get_by_name(name).expect("canonical lookups never fail");
        format!(
            "profile '{}': {} syscall rules, default_action={:?}",
            canonical_name(name),
            profile.syscall_count(),
            profile.default_action,
        )
    }
}

impl Default for ProfileLibrary {
    fn default() -> Self {
        Self::new()
    }
}

fn serialize_profile(profile: &Profile, dialect: Dialect) -> String {
    let mut out = String::new();
    out.push_str("{\n");
    out.push_str(&format!(
        "  \"default_action\": \"{}\",\n",
        profile.default_action.as_wire_str(dialect)
    ));
    out.push_str("  \"syscalls\": [\n");
    let last_group = profile.rule_groups.len().saturating_sub(1);
    for (i, group) in profile.rule_groups.iter().enumerate() {
        out.push_str("    {\n");
        out.push_str("      \"names\": [\n");
        let last_name = group.names.len().saturating_sub(1);
        for (j, name) in group.names.iter().enumerate() {
            let comma = if j == last_name { "" } else { "," };
            out.push_str(&format!("        \"{}\"{}\n", name, comma));
        }
        out.push_str("      ],\n");
        out.push_str(&format!(
            "      \"action\": \"{}\"\n",
            group.action.as_wire_str(dialect)
        ));
        out.push_str(if i == last_group { "    }\n" } else { "    },\n" });
    }
    out.push_str("  ]\n");
    out.push('}');
    out
}
