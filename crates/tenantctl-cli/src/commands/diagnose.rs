use crate::cli::TestArgs;
use crate::client::{AppContext, CliResult};
use crate::output::render_switch;

pub(crate) async fn handle_diagnose(ctx: &AppContext, args: TestArgs) -> CliResult<()> {
    let scope = ctx.workflow.diagnose(args.org_id).await?;
    println!("{}", render_switch(&scope, ctx.output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::client::tests::{BASIC_AUTH, context_for};
    use anyhow::{Result, anyhow};
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn switches_to_the_main_organization() -> Result<()> {
        let server = MockServer::start_async().await;
        let switch = server.mock(|when, then| {
            when.method(POST)
                .path("/api/user/using/1")
                .header("authorization", BASIC_AUTH)
                .header_exists("x-request-id");
            then.status(200).json_body(json!({"message": "Active organization changed"}));
        });

        let ctx = context_for(&server, OutputFormat::Text)?;
        handle_diagnose(&ctx, TestArgs::default())
            .await
            .map_err(|err| anyhow!(err.display_message()))?;

        switch.assert();
        Ok(())
    }

    #[tokio::test]
    async fn bad_credentials_fail_with_exit_code_three() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/user/using/1");
            then.status(401).json_body(json!({"message": "invalid username or password"}));
        });

        let ctx = context_for(&server, OutputFormat::Text)?;
        let err = handle_diagnose(&ctx, TestArgs::default())
            .await
            .err()
            .ok_or_else(|| anyhow!("switch should fail"))?;

        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().contains("invalid username or password"));
        Ok(())
    }
}
