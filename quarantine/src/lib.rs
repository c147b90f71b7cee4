//! Quarantine and isolation policy engine for the sandbox orchestrator.
//!
//! See the module docs on [`classifier`], [`profiles`], [`manager`], and
//! [`slo`] for the four cooperating subsystems (classifier, profile
//! library, quarantine manager, SLO harness).

pub mod audit;
pub mod classifier;
pub mod evidence;
pub mod facts;
pub mod manager;
pub mod metrics;
pub mod policy;
pub mod predicate;
pub mod profiles;
pub mod reason;
pub mod record;
pub mod slo;
pub mod store;
pub mod trigger;

use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initializes a daily rolling-file subscriber writing under `log_dir`,
/// honoring `RUST_LOG` when set. Idempotent: later calls are no-ops, the
/// guard from the first call is kept alive for the life of the process.
pub fn init_logging(log_dir: impl AsRef<std::path::Path>, file_prefix: &str) {
    if LOG_GUARD.get().is_some() {
        return;
    }
    let appender = tracing_appender::rolling::daily(log_dir, file_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init();
    let _ = LOG_GUARD.set(guard);
}
