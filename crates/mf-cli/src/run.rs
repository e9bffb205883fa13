//! `mf run`: the complete workflow against a live server

use anyhow::{Context, Result};
use clap::Args;
use mf_api_contract::{has_payload, Fixtures};
use mf_rest_client::{WorkflowClient, WorkflowReport};
use tracing::info;

use crate::ConnectionArgs;

/// Arguments for the run command
#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Print the full report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Skip the end-to-end assertions on the collected responses
    #[arg(long)]
    pub no_verify: bool,
}

impl RunArgs {
    /// Run the workflow command
    pub async fn run(self) -> Result<()> {
        let mut client = WorkflowClient::from_config(&self.connection.client_config())
            .context("failed to create HTTP client")?;
        let fixtures = Fixtures::default();

        let report = client
            .execute_complete_workflow(&self.connection.credentials(), &fixtures)
            .await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print!("{}", format_summary(&report));
        }

        if !self.no_verify {
            report.verify(&fixtures)?;
            info!("end-to-end verification passed");
        }

        Ok(())
    }
}

/// One line per step, followed by the ids the run created
pub fn format_summary(report: &WorkflowReport) -> String {
    let mut summary = String::new();
    for (step, response) in report.responses() {
        let status = if has_payload(response) { "ok" } else { "empty" };
        summary.push_str(&format!("{:<26} {}\n", step.as_str(), status));
    }
    summary.push_str(&format!("patient id:  {}\n", report.patient_id));
    summary.push_str(&format!("provider id: {}\n", report.provider_id));
    summary
}
