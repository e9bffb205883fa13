//! `mf login`: credential probe

use anyhow::{Context, Result};
use clap::Args;
use mf_rest_client::WorkflowClient;

use crate::ConnectionArgs;

/// Arguments for the login command
#[derive(Args)]
pub struct LoginArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,
}

impl LoginArgs {
    /// Run the login command
    pub async fn run(self) -> Result<()> {
        let mut client = WorkflowClient::from_config(&self.connection.client_config())
            .context("failed to create HTTP client")?;

        client.login(&self.connection.credentials()).await?;

        if !client.is_authenticated() {
            anyhow::bail!(
                "login to tenant {} succeeded but no access token was issued",
                client.tenant_id()
            );
        }
        println!("Logged in to tenant {}: access token issued", client.tenant_id());

        Ok(())
    }
}
