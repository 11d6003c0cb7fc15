// Local usage-monitor collaborator
//
// Runs the configured command line (typically vnstat, often over an ssh
// tunnel to the gateway doing the metering) and hands its stdout to the
// core as raw usage text. The output format is vnstat's hourly dump;
// parsing belongs to `bundlewatch_core::usage`.

use tokio::process::Command;
use tracing::debug;

use crate::error::Error;

/// Invokes the local usage-monitoring command and captures its output.
#[derive(Debug, Clone)]
pub struct UsageMonitor {
    argv: Vec<String>,
}

impl UsageMonitor {
    /// Build a monitor from a whitespace-separated command string,
    /// e.g. `"ssh 192.168.0.1 ./get_today_hourly_usage.sh"`.
    pub fn new(command: &str) -> Result<Self, Error> {
        let argv: Vec<String> = command.split_whitespace().map(String::from).collect();
        if argv.is_empty() {
            return Err(Error::Monitor {
                message: "monitor command is empty".into(),
            });
        }
        Ok(Self { argv })
    }

    /// The command line this monitor runs.
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Run the monitor once and return its stdout as text.
    pub async fn fetch(&self) -> Result<String, Error> {
        debug!(command = ?self.argv, "running usage monitor");

        let output = Command::new(&self.argv[0])
            .args(&self.argv[1..])
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Monitor {
                message: format!(
                    "'{}' exited with {}: {}",
                    self.argv[0],
                    output.status,
                    stderr.trim()
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
