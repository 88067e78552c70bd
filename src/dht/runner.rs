use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use uuid::Uuid;

use crate::error::GatewayError;

/// Locations of the external DHT client programs.
#[derive(Debug, Clone)]
pub struct DhtPrograms {
    pub get: PathBuf,
    pub put: PathBuf,
}

/// Client for the ring's external get/put programs.
///
/// Each operation spawns one short-lived child process with the entry node's
/// address and the caller's key (and value) as argv, then relays the child's
/// stdout. The child never sees a shell.
pub struct DhtClient {
    programs: DhtPrograms,
    timeout: Duration,
}

impl DhtClient {
    pub fn new(programs: DhtPrograms, timeout: Duration) -> Self {
        Self { programs, timeout }
    }

    /// Look up `key` through the ring, entering at `entry_node`.
    pub async fn get(&self, entry_node: &str, key: &str) -> Result<String, GatewayError> {
        self.run(&self.programs.get, &[entry_node, key]).await
    }

    /// Store `key` = `value` through the ring, entering at `entry_node`.
    pub async fn put(
        &self,
        entry_node: &str,
        key: &str,
        value: &str,
    ) -> Result<String, GatewayError> {
        self.run(&self.programs.put, &[entry_node, key, value]).await
    }

    async fn run(&self, program: &Path, args: &[&str]) -> Result<String, GatewayError> {
        let op_id = Uuid::new_v4();
        let name = program_name(program);
        tracing::info!("Op {}: invoking {} with {} args", op_id, name, args.len());

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| GatewayError::Spawn {
                program: program.to_path_buf(),
                source,
            })?;

        // Dropping the wait future on timeout kills the child (kill_on_drop).
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| GatewayError::Spawn {
                program: program.to_path_buf(),
                source,
            })?,
            Err(_) => {
                tracing::warn!("Op {}: {} timed out after {:?}", op_id, name, self.timeout);
                return Err(GatewayError::Timeout {
                    program: name,
                    secs: self.timeout.as_secs(),
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::error!(
                "Op {}: {} exited with {}: {}",
                op_id,
                name,
                output.status,
                stderr
            );
            return Err(GatewayError::ProgramFailed {
                program: name,
                code: output.status.code(),
                stderr,
            });
        }

        let value = String::from_utf8_lossy(&output.stdout)
            .trim_end()
            .to_string();
        tracing::debug!("Op {}: {} returned {} bytes", op_id, name, value.len());
        Ok(value)
    }
}

fn program_name(program: &Path) -> String {
    program
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string())
}
