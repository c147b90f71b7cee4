use anyhow::Result;

use crate::cli::ProfileArgs;

use super::{dialect_from_arg, Context};

pub async fn run(ctx: &Context, args: ProfileArgs) -> Result<()> {
    let profile = ctx.profiles.get_by_name(&args.name)?;
    let dialect = dialect_from_arg(args.dialect);
    println!("{}", ctx.profiles.serialize(&profile, dialect));
    Ok(())
}
