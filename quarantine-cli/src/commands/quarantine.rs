use anyhow::Result;
use quarantine::evidence::{Evidence, EvidenceType};
use quarantine::manager::{QuarantineManager, QuarantineRequest};

use crate::cli::QuarantineArgs;

use super::{reason_from_arg, Context};

pub async fn run(ctx: &Context, args: QuarantineArgs) -> Result<()> {
    let evidence: Vec<Evidence> = args
        .evidence
        .into_iter()
        .map(|description| Evidence::new(EvidenceType::SyscallTrace, description, Vec::new()))
        .collect();

    let reason = reason_from_arg(args.reason);
    let req = if args.auto {
        QuarantineRequest::auto(args.id, reason, evidence, args.requester)
    } else {
        QuarantineRequest::manual(args.id, reason, evidence, args.requester)
    };

    let record = ctx.manager.quarantine(req, &ctx.cancel).await?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("quarantined {} (reason={}, status={:?})", record.id, record.reason, record.status);
    }
    Ok(())
}
