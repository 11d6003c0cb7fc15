//! Shared refresh-cycle plumbing: the two collaborators that feed the
//! accounting engine.

use tracing::info;

use bundlewatch_api::{CarrierClient, UsageMonitor};
use bundlewatch_config::Settings;
use bundlewatch_core::BalanceRecord;

use crate::error::CliError;

/// The external data sources for one account: the carrier API client and
/// the local usage monitor.
pub struct Collaborators {
    client: CarrierClient,
    monitor: UsageMonitor,
    username: String,
    password: secrecy::SecretString,
    msisdn: String,
}

impl Collaborators {
    pub fn new(settings: &Settings) -> Result<Self, CliError> {
        let client =
            CarrierClient::new(settings.host.clone(), settings.generation, settings.timeout)
                .map_err(|e| CliError::from_api(&settings.host, e))?;
        let monitor = UsageMonitor::new(&settings.monitor).map_err(CliError::Api)?;

        Ok(Self {
            client,
            monitor,
            username: settings.username.clone(),
            password: settings.password.clone(),
            msisdn: settings.msisdn.clone(),
        })
    }

    /// Log in and fetch a fresh balance record.
    pub async fn fetch_balances(&self) -> Result<BalanceRecord, CliError> {
        info!("Logging in");
        self.client
            .login(&self.username, &self.password)
            .await
            .map_err(|e| CliError::from_api(self.client.base_url(), e))?;

        info!("Retrieving data balances from {}", self.client.base_url());
        self.client
            .fetch_balances(&self.username, &self.msisdn)
            .await
            .map_err(|e| CliError::from_api(self.client.base_url(), e))
    }

    /// Run the local monitor and return today's raw usage text.
    pub async fn fetch_usage(&self) -> Result<String, CliError> {
        info!("Retrieving data usage");
        self.monitor.fetch().await.map_err(CliError::Api)
    }
}
