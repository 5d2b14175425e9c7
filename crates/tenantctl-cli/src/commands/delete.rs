use tenantctl_core::Prompt;

use crate::cli::DeleteArgs;
use crate::client::{AppContext, CliResult};
use crate::output::render_delete;

pub(crate) async fn handle_delete(
    ctx: &AppContext,
    args: DeleteArgs,
    prompt: &mut dyn Prompt,
) -> CliResult<()> {
    let outcome = ctx.workflow.delete(&args.name, prompt, args.yes).await?;
    println!("{}", render_delete(&outcome, ctx.output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::client::tests::context_for;
    use anyhow::{Result, anyhow};
    use httpmock::prelude::*;
    use serde_json::json;
    use tenantctl_test_support::mocks::ScriptedPrompt;

    fn args(yes: bool) -> DeleteArgs {
        DeleteArgs {
            name: "acme".into(),
            yes,
        }
    }

    fn lookup(server: &MockServer) {
        server.mock(|when, then| {
            when.method(GET).path("/api/orgs/name/acme");
            then.status(200).json_body(json!({"id": 9, "name": "acme"}));
        });
    }

    #[tokio::test]
    async fn confirmed_delete_calls_the_service() -> Result<()> {
        let server = MockServer::start_async().await;
        lookup(&server);
        let delete = server.mock(|when, then| {
            when.method(DELETE).path("/api/orgs/9");
            then.status(200).json_body(json!({"message": "Organization deleted"}));
        });
        let mut prompt = ScriptedPrompt::new(["y"]);

        let ctx = context_for(&server, OutputFormat::Text)?;
        handle_delete(&ctx, args(false), &mut prompt)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;

        delete.assert();
        Ok(())
    }

    #[tokio::test]
    async fn anything_but_y_keeps_the_organization() -> Result<()> {
        let server = MockServer::start_async().await;
        lookup(&server);
        let delete = server.mock(|when, then| {
            when.method(DELETE).path("/api/orgs/9");
            then.status(200).json_body(json!({}));
        });
        let mut prompt = ScriptedPrompt::new(["yes"]);

        let ctx = context_for(&server, OutputFormat::Text)?;
        handle_delete(&ctx, args(false), &mut prompt)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;

        delete.assert_calls(0);
        Ok(())
    }

    #[tokio::test]
    async fn yes_flag_skips_the_prompt() -> Result<()> {
        let server = MockServer::start_async().await;
        lookup(&server);
        let delete = server.mock(|when, then| {
            when.method(DELETE).path("/api/orgs/9");
            then.status(200).json_body(json!({"message": "Organization deleted"}));
        });
        let mut prompt = ScriptedPrompt::new(Vec::<String>::new());

        let ctx = context_for(&server, OutputFormat::Json)?;
        handle_delete(&ctx, args(true), &mut prompt)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;

        delete.assert();
        assert!(prompt.questions().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_organization_is_an_operational_failure() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/orgs/name/acme");
            then.status(404).json_body(json!({"message": "Organization not found"}));
        });
        let mut prompt = ScriptedPrompt::new(["y"]);

        let ctx = context_for(&server, OutputFormat::Text)?;
        let err = handle_delete(&ctx, args(false), &mut prompt)
            .await
            .err()
            .ok_or_else(|| anyhow!("delete should fail"))?;

        assert_eq!(err.exit_code(), 3);
        Ok(())
    }
}
