use anyhow::Result;
use quarantine::manager::QuarantineManager;

use crate::cli::ExamineArgs;

use super::Context;

pub async fn run(ctx: &Context, args: ExamineArgs) -> Result<()> {
    let report = ctx.manager.examine(&args.id, &ctx.cancel).await?;

    if ctx.json {
        let out = serde_json::json!({
            "timestamp": report.timestamp,
            "findings": report.findings,
            "risk_score": report.risk_score,
            "recommendation": format!("{:?}", report.recommendation).to_lowercase(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!(
            "examination of {}: risk_score={:.2}, recommendation={:?}, findings={}",
            args.id,
            report.risk_score,
            report.recommendation,
            report.findings.len()
        );
    }
    Ok(())
}
