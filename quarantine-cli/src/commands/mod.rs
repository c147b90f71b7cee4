mod classify;
mod examine;
mod list;
mod profile;
mod quarantine;
mod release;

pub use classify::run as classify;
pub use examine::run as examine;
pub use list::run as list;
pub use profile::run as profile;
pub use quarantine::run as quarantine;
pub use release::run as release;

use quarantine::manager::QuarantineManager;
use quarantine::profiles::ProfileLibrary;
use quarantine_shared::cancellation::CancellationToken;
use std::sync::Arc;

use crate::cli::{DialectArg, ReasonArg, StatusArg};

/// Everything a subcommand needs: the manager, a dedicated profile
/// handle for `profile`, and a fresh cancellation token per invocation
/// (a one-shot CLI process has no use for a shared, long-lived one).
pub struct Context {
    pub manager: Arc<dyn QuarantineManager>,
    pub profiles: ProfileLibrary,
    pub cancel: CancellationToken,
    pub json: bool,
}

pub fn reason_from_arg(arg: ReasonArg) -> quarantine::reason::QuarantineReason {
    use quarantine::reason::QuarantineReason::*;
    match arg {
        ReasonArg::SuspiciousBehavior => SuspiciousBehavior,
        ReasonArg::PolicyViolation => PolicyViolation,
        ReasonArg::NetworkAnomaly => NetworkAnomaly,
        ReasonArg::ResourceAbuse => ResourceAbuse,
        ReasonArg::UntrustedSource => UntrustedSource,
        ReasonArg::ManualFlag => ManualFlag,
        ReasonArg::SecurityScan => SecurityScan,
    }
}

pub fn status_from_arg(arg: StatusArg) -> quarantine::record::QuarantineStatus {
    use quarantine::record::QuarantineStatus::*;
    match arg {
        StatusArg::Active => Active,
        StatusArg::Examining => Examining,
        StatusArg::Released => Released,
        StatusArg::Destroyed => Destroyed,
    }
}

pub fn dialect_from_arg(arg: DialectArg) -> quarantine::profiles::Dialect {
    match arg {
        DialectArg::VmmNative => quarantine::profiles::Dialect::VmmNative,
        DialectArg::Generator => quarantine::profiles::Dialect::Generator,
    }
}
