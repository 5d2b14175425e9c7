use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use tenantctl_core::{
    Confirmation, CoreError, DeleteOutcome, Method, OrgId, ProvisionOutcome, Workflow,
};
use tenantctl_test_support::fixtures::sample_config;
use tenantctl_test_support::mocks::{FakeTransport, RecordingSleeper, ScriptedPrompt};

fn workflow(transport: &Arc<FakeTransport>) -> Workflow {
    Workflow::new(
        &sample_config("grafana.test:3000"),
        transport.clone(),
        Arc::new(RecordingSleeper::new()),
    )
}

fn acme_lookup(transport: &FakeTransport) {
    transport.respond(
        Method::Get,
        "/api/orgs/name/acme",
        200,
        json!({"id": 9, "name": "acme", "address": {}}),
    );
}

#[tokio::test]
async fn create_resolves_switches_and_provisions_in_order() -> Result<()> {
    let transport = Arc::new(FakeTransport::new());
    transport.respond(
        Method::Post,
        "/api/orgs",
        200,
        json!({"orgId": 5, "message": "Organization created"}),
    );
    transport.respond(
        Method::Post,
        "/api/user/using/5",
        200,
        json!({"message": "Active organization changed"}),
    );
    transport.respond(Method::Post, "/api/datasources", 200, json!({"id": 21}));
    transport.respond(Method::Get, "/api/datasources/21", 200, json!({"id": 21}));

    let report = workflow(&transport).create("acme", None).await?;

    assert!(report.organization.created);
    assert_eq!(report.organization.id.as_str(), "5");
    assert_eq!(report.organization.message.as_deref(), Some("Organization created"));
    assert_eq!(report.scope.org_id().as_str(), "5");
    assert_eq!(report.scope.message(), Some("Active organization changed"));
    assert!(report.provisioning.succeeded());
    assert_eq!(
        transport.call_lines(),
        vec![
            "POST /api/orgs",
            "POST /api/user/using/5",
            "POST /api/datasources",
            "GET /api/datasources/21",
        ]
    );
    let calls = transport.calls();
    assert_eq!(calls[0].body, Some(json!({"name": "acme"})));
    assert_eq!(calls[1].body, None);
    Ok(())
}

#[tokio::test]
async fn org_create_without_id_stops_before_any_other_call() {
    let transport = Arc::new(FakeTransport::new());
    transport.respond(
        Method::Post,
        "/api/orgs",
        403,
        json!({"message": "quota exceeded"}),
    );

    let err = workflow(&transport)
        .create("acme", None)
        .await
        .expect_err("create must fail");

    match err {
        CoreError::OrganizationNotCreated { name, message } => {
            assert_eq!(name, "acme");
            assert_eq!(message, "quota exceeded");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(transport.count_prefix("/api/user/using"), 0);
    assert_eq!(transport.count_prefix("/api/datasources"), 0);
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn explicit_org_id_skips_creation() -> Result<()> {
    let transport = Arc::new(FakeTransport::new());
    transport.respond(Method::Post, "/api/user/using/42", 200, json!({}));
    transport.respond(Method::Post, "/api/datasources", 200, json!({"id": 3}));
    transport.respond(Method::Get, "/api/datasources/3", 200, json!({}));

    let report = workflow(&transport)
        .create("acme", OrgId::new("42"))
        .await?;

    assert!(!report.organization.created);
    assert_eq!(transport.count(Method::Post, "/api/orgs"), 0);
    let create = &transport.calls()[1];
    assert_eq!(create.body.as_ref().map(|body| &body["orgId"]), Some(&json!(42)));
    Ok(())
}

#[tokio::test]
async fn zero_padded_org_id_is_sent_verbatim() -> Result<()> {
    let transport = Arc::new(FakeTransport::new());
    transport.respond(Method::Post, "/api/user/using/007", 200, json!({}));
    transport.respond(Method::Post, "/api/datasources", 200, json!({"id": 3}));
    transport.respond(Method::Get, "/api/datasources/3", 200, json!({}));

    workflow(&transport)
        .create("acme", OrgId::new("007"))
        .await?;

    let create = &transport.calls()[1];
    assert_eq!(
        create.body.as_ref().map(|body| &body["orgId"]),
        Some(&json!("007"))
    );
    Ok(())
}

#[tokio::test]
async fn rejected_switch_is_fatal() {
    let transport = Arc::new(FakeTransport::new());
    transport.respond(
        Method::Post,
        "/api/user/using/42",
        401,
        json!({"message": "Unauthorized"}),
    );

    let err = workflow(&transport)
        .create("acme", OrgId::new("42"))
        .await
        .expect_err("switch must fail");

    assert!(matches!(
        err,
        CoreError::SwitchRejected { status: 401, ref message, .. } if message == "Unauthorized"
    ));
    assert_eq!(transport.count_prefix("/api/datasources"), 0);
}

#[tokio::test]
async fn blank_tenant_name_is_invalid_input() {
    let transport = Arc::new(FakeTransport::new());

    let err = workflow(&transport)
        .create("   ", None)
        .await
        .expect_err("blank name");

    assert!(matches!(err, CoreError::InvalidInput { .. }));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn failed_provisioning_still_returns_a_report() -> Result<()> {
    let transport = Arc::new(FakeTransport::new());
    transport.respond(Method::Post, "/api/user/using/42", 200, json!({}));
    transport.respond(
        Method::Post,
        "/api/datasources",
        400,
        json!({"message": "invalid plugin type"}),
    );

    let report = workflow(&transport)
        .create("acme", OrgId::new("42"))
        .await?;

    assert!(matches!(
        report.provisioning.outcome,
        ProvisionOutcome::Rejected { status: 400, .. }
    ));
    Ok(())
}

#[tokio::test]
async fn declined_delete_issues_no_delete() -> Result<()> {
    let transport = Arc::new(FakeTransport::new());
    acme_lookup(&transport);
    let mut prompt = ScriptedPrompt::new(["n"]);

    let outcome = workflow(&transport)
        .delete("acme", &mut prompt, false)
        .await?;

    assert!(matches!(outcome, DeleteOutcome::Declined { .. }));
    assert_eq!(
        prompt.questions(),
        ["Are you sure you want to delete acme with id 9 (y/N)"]
    );
    assert_eq!(transport.count_prefix("/api/orgs/9"), 0);
    Ok(())
}

#[tokio::test]
async fn delete_confirmation_is_case_sensitive() -> Result<()> {
    let transport = Arc::new(FakeTransport::new());
    acme_lookup(&transport);
    let mut prompt = ScriptedPrompt::new(["Y"]);

    let outcome = workflow(&transport)
        .delete("acme", &mut prompt, false)
        .await?;

    assert!(matches!(outcome, DeleteOutcome::Declined { .. }));
    assert_eq!(transport.count(Method::Delete, "/api/orgs/9"), 0);
    Ok(())
}

#[tokio::test]
async fn lenient_delete_confirmation_can_be_configured() -> Result<()> {
    let transport = Arc::new(FakeTransport::new());
    acme_lookup(&transport);
    transport.respond(
        Method::Delete,
        "/api/orgs/9",
        200,
        json!({"message": "Organization deleted"}),
    );
    let mut prompt = ScriptedPrompt::new(["Y"]);

    let outcome = workflow(&transport)
        .with_confirmations(Confirmation::CASUAL, Confirmation::CASUAL)
        .delete("acme", &mut prompt, false)
        .await?;

    assert!(matches!(outcome, DeleteOutcome::Deleted { status: 200, .. }));
    Ok(())
}

#[tokio::test]
async fn confirmed_delete_targets_the_looked_up_id() -> Result<()> {
    let transport = Arc::new(FakeTransport::new());
    acme_lookup(&transport);
    transport.respond(
        Method::Delete,
        "/api/orgs/9",
        200,
        json!({"message": "Organization deleted"}),
    );
    let mut prompt = ScriptedPrompt::new([" y "]);

    let outcome = workflow(&transport)
        .delete("acme", &mut prompt, false)
        .await?;

    match outcome {
        DeleteOutcome::Deleted {
            organization,
            status,
            response,
        } => {
            assert_eq!(organization.id.as_str(), "9");
            assert_eq!(status, 200);
            assert_eq!(response, json!({"message": "Organization deleted"}));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(transport.count(Method::Delete, "/api/orgs/9"), 1);
    Ok(())
}

#[tokio::test]
async fn assume_yes_skips_the_question() -> Result<()> {
    let transport = Arc::new(FakeTransport::new());
    acme_lookup(&transport);
    transport.respond(Method::Delete, "/api/orgs/9", 200, json!({}));
    let mut prompt = ScriptedPrompt::new(Vec::<String>::new());

    let outcome = workflow(&transport)
        .delete("acme", &mut prompt, true)
        .await?;

    assert!(matches!(outcome, DeleteOutcome::Deleted { .. }));
    assert!(prompt.questions().is_empty());
    Ok(())
}

#[tokio::test]
async fn unknown_org_is_reported_without_prompting() {
    let transport = Arc::new(FakeTransport::new());
    transport.respond(
        Method::Get,
        "/api/orgs/name/ghost",
        404,
        json!({"message": "Organization not found"}),
    );
    let mut prompt = ScriptedPrompt::new(["y"]);

    let err = workflow(&transport)
        .delete("ghost", &mut prompt, false)
        .await
        .expect_err("lookup must fail");

    assert!(matches!(err, CoreError::OrganizationNotFound { ref name } if name == "ghost"));
    assert!(prompt.questions().is_empty());
    assert_eq!(transport.count_prefix("/api/orgs/"), 1);
}

#[tokio::test]
async fn org_names_are_percent_encoded_in_lookups() -> Result<()> {
    let transport = Arc::new(FakeTransport::new());
    transport.respond(
        Method::Get,
        "/api/orgs/name/Acme%20Corp",
        200,
        json!({"id": 4, "name": "Acme Corp"}),
    );
    let mut prompt = ScriptedPrompt::new(["n"]);

    let outcome = workflow(&transport)
        .delete("Acme Corp", &mut prompt, false)
        .await?;

    assert!(matches!(outcome, DeleteOutcome::Declined { .. }));
    Ok(())
}

#[tokio::test]
async fn diagnose_defaults_to_the_main_organization() -> Result<()> {
    let transport = Arc::new(FakeTransport::new());
    transport.respond(
        Method::Post,
        "/api/user/using/1",
        200,
        json!({"message": "Active organization changed"}),
    );

    let scope = workflow(&transport).diagnose(None).await?;

    assert_eq!(scope.org_id().as_str(), "1");
    assert_eq!(transport.call_lines(), vec!["POST /api/user/using/1"]);
    Ok(())
}

#[tokio::test]
async fn diagnose_surfaces_bad_credentials() {
    let transport = Arc::new(FakeTransport::new());
    transport.respond(
        Method::Post,
        "/api/user/using/3",
        401,
        json!({"message": "invalid username or password"}),
    );

    let err = workflow(&transport)
        .diagnose(OrgId::new("3"))
        .await
        .expect_err("switch must fail");

    assert!(matches!(err, CoreError::SwitchRejected { status: 401, .. }));
}
