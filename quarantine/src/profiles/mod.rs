//! C1 — profile library: canonical profiles, class defaults, wire codec.

mod builtin;
mod class_map;
mod library;
mod types;

pub use library::ProfileLibrary;
pub use types::{parse, Action, Dialect, Profile, RuleGroup};
