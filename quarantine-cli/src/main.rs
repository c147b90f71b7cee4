mod cli;
mod commands;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use quarantine::audit::TracingAuditLogger;
use quarantine::classifier::TriggerClassifier;
use quarantine::manager::{BaseQuarantineManager, HardenedQuarantineManager, QuarantineManager};
use quarantine::metrics::TracingMetricsSink;
use quarantine::policy::QuarantinePolicy;
use quarantine::profiles::ProfileLibrary;
use quarantine::store::{MemoryQuarantineStore, QuarantineStore, SqliteQuarantineStore};
use quarantine_shared::cancellation::CancellationToken;
use quarantine_shared::errors::QuarantineError;

use cli::{Cli, Commands};
use commands::Context;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.global.log_dir {
        quarantine::init_logging(log_dir, "quarantine-cli");
    }

    let store: Arc<dyn QuarantineStore> = match &cli.global.store {
        Some(path) => match SqliteQuarantineStore::open(path) {
            Ok(store) => Arc::new(store),
            Err(err) => {
                eprintln!("error: failed to open store at '{path}': {err}");
                return ExitCode::from(4);
            }
        },
        None => Arc::new(MemoryQuarantineStore::new()),
    };

    let base = BaseQuarantineManager::new(
        store,
        Arc::new(TriggerClassifier::with_defaults()),
        QuarantinePolicy::with_defaults(),
    );
    let profiles = ProfileLibrary::new();
    let manager: Arc<dyn QuarantineManager> = Arc::new(HardenedQuarantineManager::new(
        Arc::new(base),
        Arc::new(TracingAuditLogger),
        Arc::new(TracingMetricsSink),
        profiles.clone(),
    ));

    let ctx = Context {
        manager,
        profiles,
        cancel: CancellationToken::new(),
        json: cli.global.json,
    };

    let result = match cli.command {
        Commands::Classify(args) => commands::classify(&ctx, args).await,
        Commands::Quarantine(args) => commands::quarantine(&ctx, args).await,
        Commands::Release(args) => commands::release(&ctx, args).await,
        Commands::Examine(args) => commands::examine(&ctx, args).await,
        Commands::List(args) => commands::list(&ctx, args).await,
        Commands::Profile(args) => commands::profile(&ctx, args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}

/// Maps the engine's error taxonomy (spec §7: 400/404/500/499) onto CLI
/// process exit codes. Codes 2-5 leave 1 free for argument-parsing and
/// other errors clap itself raises before we ever build a `Context`.
fn exit_code_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<QuarantineError>() {
        Some(QuarantineError::Validation(_)) => 2,
        Some(QuarantineError::NotFound(_)) => 3,
        Some(QuarantineError::Internal(_)) => 4,
        Some(QuarantineError::Cancelled) => 5,
        None => 1,
    }
}
