//! Output renderers for CLI commands.

use std::fmt::Write as _;

use anyhow::anyhow;
use serde::Serialize;
use tenantctl_core::{
    CreateReport, DeleteOutcome, KeySessionSummary, OrgScope, ProvisionOutcome, Verification,
};

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

fn to_json<T: Serialize>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

pub(crate) fn render_create(report: &CreateReport, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Text => {
            let mut out = String::new();
            let organization = &report.organization;
            if organization.created {
                let _ = writeln!(
                    out,
                    "organization: {} (created: {})",
                    organization.id,
                    organization.message.as_deref().unwrap_or("ok")
                );
            } else {
                let _ = writeln!(out, "organization: {} (existing)", organization.id);
            }
            let _ = writeln!(
                out,
                "active organization: {}",
                report.scope.message().unwrap_or("switched")
            );

            let provisioning = &report.provisioning;
            let _ = writeln!(
                out,
                "datasource: {} (database {})",
                provisioning.datasource, provisioning.database
            );
            for attempt in &provisioning.attempts {
                let id = attempt
                    .created_id
                    .as_ref()
                    .map_or_else(|| "-".to_string(), ToString::to_string);
                let _ = writeln!(
                    out,
                    "  attempt {}: id {id}, {}",
                    attempt.attempt + 1,
                    describe_verification(&attempt.verification)
                );
            }
            let verdict = match &provisioning.outcome {
                ProvisionOutcome::Succeeded { id } => format!("succeeded (id {id})"),
                ProvisionOutcome::Exhausted { attempts } => {
                    format!("failed: not verified after {attempts} attempts")
                }
                ProvisionOutcome::Rejected { status, message } => {
                    format!("failed: rejected with status {status}: {message}")
                }
            };
            let _ = write!(out, "provisioning {verdict}");
            Ok(out)
        }
    }
}

fn describe_verification(verification: &Verification) -> String {
    match verification {
        Verification::Verified => "verified".to_string(),
        Verification::Transient { message } => format!("not ready ({message})"),
        Verification::Rejected { status, message } => format!("rejected ({status}: {message})"),
    }
}

pub(crate) fn render_delete(outcome: &DeleteOutcome, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(outcome),
        OutputFormat::Text => match outcome {
            DeleteOutcome::Declined { organization } => Ok(format!(
                "kept {} (id {}); nothing deleted",
                organization.name, organization.id
            )),
            DeleteOutcome::Deleted { response, .. } => to_json(response),
        },
    }
}

pub(crate) fn render_keys(summary: &KeySessionSummary, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(summary),
        OutputFormat::Text => {
            let created = summary
                .created
                .as_ref()
                .filter(|key| key.key.is_some())
                .map_or_else(|| "none".to_string(), |key| key.name.clone());
            Ok(format!(
                "keys listed: {}, deleted: {}, created: {created}",
                summary.listed.len(),
                summary.deleted.len()
            ))
        }
    }
}

pub(crate) fn render_switch(scope: &OrgScope, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(scope),
        OutputFormat::Text => Ok(format!(
            "organization {}: {}",
            scope.org_id(),
            scope.message().unwrap_or("switched")
        )),
    }
}
