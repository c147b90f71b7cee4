use anyhow::Result;
use quarantine::facts::WorkloadFacts;
use quarantine::manager::QuarantineManager;

use crate::cli::ClassifyArgs;

use super::Context;

pub async fn run(ctx: &Context, args: ClassifyArgs) -> Result<()> {
    let mut facts = WorkloadFacts::new(args.id, args.template)
        .with_cpu(args.cpu)
        .with_mem(args.mem);
    for (k, v) in args.metadata {
        facts = facts.with_metadata(k, v);
    }
    if let Some(egress) = args.network_egress {
        facts = facts.with_network_egress(egress);
    }
    if let Some(ingress) = args.network_ingress {
        facts = facts.with_network_ingress(ingress);
    }

    let (quarantine, reason, evidence) = ctx.manager.classify(&facts, &ctx.cancel).await?;

    if ctx.json {
        let out = serde_json::json!({
            "quarantine": quarantine,
            "reason": reason.map(|r| r.as_str()),
            "evidence": evidence,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if quarantine {
        println!(
            "quarantine: yes, reason={}, evidence_count={}",
            reason.map(|r| r.as_str()).unwrap_or("?"),
            evidence.len()
        );
    } else {
        println!("quarantine: no");
    }

    Ok(())
}
