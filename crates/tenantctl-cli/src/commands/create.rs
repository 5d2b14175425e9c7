use tracing::warn;

use crate::cli::CreateArgs;
use crate::client::{AppContext, CliResult};
use crate::output::render_create;

/// Provisioning failures are reported, not raised: the organization exists
/// either way and the operator decides how to follow up.
pub(crate) async fn handle_create(ctx: &AppContext, args: CreateArgs) -> CliResult<()> {
    let report = ctx.workflow.create(&args.name, args.id).await?;
    if !report.provisioning.succeeded() {
        warn!(
            tenant = %args.name,
            org_id = %report.organization.id,
            "datasource provisioning did not succeed"
        );
    }
    println!("{}", render_create(&report, ctx.output)?);
    Ok(())
}
