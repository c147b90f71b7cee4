use anyhow::Result;
use quarantine::manager::QuarantineManager;
use quarantine::record::{NetworkOverride, ReleaseApproval, SecurityOverride};

use crate::cli::ReleaseArgs;

use super::Context;

pub async fn run(ctx: &Context, args: ReleaseArgs) -> Result<()> {
    let mut approval = ReleaseApproval::new(args.approved_by, args.reason);

    if let Some(mode) = args.network_mode {
        approval = approval.with_network_override(NetworkOverride {
            network_mode: mode,
            allowed_egress: args.allowed_egress,
            justification: args.network_justification.unwrap_or_default(),
        });
    }
    if let Some(profile) = args.seccomp_profile {
        approval = approval.with_security_override(SecurityOverride {
            seccomp_profile: profile,
            justification: args.security_justification.unwrap_or_default(),
        });
    }

    ctx.manager.release(&args.id, approval, &ctx.cancel).await?;

    if ctx.json {
        println!("{}", serde_json::json!({ "released": args.id }));
    } else {
        println!("released {}", args.id);
    }
    Ok(())
}
