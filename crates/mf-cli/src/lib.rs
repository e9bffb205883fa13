//! medflow CLI library

pub mod login;
pub mod run;

use mf_api_contract::Credentials;
use mf_rest_client::{parse_base_url, ClientConfig};
use tracing_subscriber::EnvFilter;
use url::Url;

// Re-export CLI types for testing
pub use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mf")]
#[command(about = "Smoke-test workflow for the medflow healthcare API")]
#[command(version, author, long_about = None)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the complete workflow: login, onboard, book, verify
    Run(run::RunArgs),
    /// Log in and report whether a token was issued
    Login(login::LoginArgs),
}

/// Where to connect and whom to log in as
#[derive(Args, Clone)]
pub struct ConnectionArgs {
    #[arg(
        long,
        env = "MF_BASE_URL",
        value_parser = parse_base_url,
        help = "Base URL of the healthcare REST API (scheme, host and port only)"
    )]
    pub base_url: Url,

    #[arg(long, env = "MF_TENANT_ID", help = "Tenant to log in to")]
    pub tenant_id: String,

    #[arg(long, env = "MF_EMAIL", help = "Login email")]
    pub email: String,

    #[arg(
        long,
        env = "MF_PASSWORD",
        hide_env_values = true,
        help = "Login password"
    )]
    pub password: String,
}

impl ConnectionArgs {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.base_url.clone(), self.tenant_id.clone())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.email.clone(), self.password.clone())
    }
}

/// Install the global tracing subscriber
///
/// Logs go to stderr so that `--json` output on stdout stays parseable.
pub fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
