use tenantctl_core::Prompt;

use crate::cli::KeysArgs;
use crate::client::{AppContext, CliResult};
use crate::output::render_keys;

pub(crate) async fn handle_keys(
    ctx: &AppContext,
    args: KeysArgs,
    prompt: &mut dyn Prompt,
) -> CliResult<()> {
    let summary = ctx.workflow.keys(prompt, args.org_id).await?;
    println!("{}", render_keys(&summary, ctx.output)?);
    Ok(())
}
