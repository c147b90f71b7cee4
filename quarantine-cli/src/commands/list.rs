use anyhow::Result;
use quarantine::manager::QuarantineManager;
use quarantine::store::RecordFilter;

use crate::cli::ListArgs;

use super::{status_from_arg, Context};

pub async fn run(ctx: &Context, args: ListArgs) -> Result<()> {
    let filter = RecordFilter {
        id: args.id,
        status: args.status.map(status_from_arg),
        reason: None,
        time_from: None,
        time_to: None,
    };

    let records = ctx.manager.list(&filter, &ctx.cancel).await?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else if records.is_empty() {
        println!("no matching records");
    } else {
        for record in &records {
            println!(
                "{}\t{:?}\t{}\t{}",
                record.id, record.status, record.reason, record.quarantined_at
            );
        }
    }
    Ok(())
}
