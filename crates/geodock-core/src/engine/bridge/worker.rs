use super::protocol::{WorkerRequest, WorkerResponse};
use crate::engine::error::ModelLoadError;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);
const SHUTDOWN_POLL: Duration = Duration::from_millis(20);

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Worker '{0}' exited unexpectedly")]
    Exited(String),
    #[error("Worker I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed worker response '{line}': {source}")]
    Malformed {
        line: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unexpected worker response: {0}")]
    Unexpected(String),
    #[error("Worker reported an error: {0}")]
    Failed(String),
    #[error("Worker handle poisoned by an earlier panic")]
    Poisoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerRole {
    Encoder,
    Predictor,
}

impl WorkerRole {
    fn as_str(self) -> &'static str {
        match self {
            WorkerRole::Encoder => "encoder",
            WorkerRole::Predictor => "predictor",
        }
    }
}

/// How to launch one model worker.
#[derive(Debug, Clone)]
pub struct WorkerSpec {
    pub program: String,
    pub args: Vec<String>,
    pub role: WorkerRole,
    pub device: String,
    pub model: Option<String>,
    pub checkpoint: Option<PathBuf>,
}

impl WorkerSpec {
    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg("--role")
            .arg(self.role.as_str())
            .arg("--device")
            .arg(&self.device);
        if let Some(model) = &self.model {
            cmd.arg("--model").arg(model);
        }
        if let Some(checkpoint) = &self.checkpoint {
            cmd.arg("--checkpoint").arg(checkpoint);
        }
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        cmd
    }

    fn label(&self) -> String {
        self.model
            .clone()
            .or_else(|| self.checkpoint.as_ref().map(|p| p.display().to_string()))
            .unwrap_or_else(|| self.role.as_str().to_string())
    }
}

/// Reply to a successful request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReply {
    pub peak_memory_bytes: Option<u64>,
}

struct WorkerIo {
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl WorkerIo {
    fn send(&mut self, request: &WorkerRequest) -> Result<(), WorkerError> {
        let line = serde_json::to_string(request).map_err(|e| WorkerError::Unexpected(e.to_string()))?;
        writeln!(self.stdin, "{}", line)?;
        self.stdin.flush()?;
        Ok(())
    }

    fn receive(&mut self) -> Result<Option<WorkerResponse>, WorkerError> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.stdout.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            return serde_json::from_str(trimmed)
                .map(Some)
                .map_err(|source| WorkerError::Malformed {
                    line: trimmed.to_string(),
                    source,
                });
        }
    }
}

/// A long-lived worker process hosting one model.
///
/// Requests are serialized through the worker's stdio. The process is shut down
/// when the handle drops.
pub struct WorkerProcess {
    label: String,
    child: Child,
    io: Mutex<WorkerIo>,
}

impl WorkerProcess {
    /// Starts the worker and waits for its readiness line.
    pub fn spawn(spec: &WorkerSpec) -> Result<Self, ModelLoadError> {
        let label = spec.label();
        let mut child = spec.command().spawn().map_err(|source| ModelLoadError::Spawn {
            program: spec.program.clone(),
            source,
        })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            return Err(ModelLoadError::Protocol("worker stdio not captured".to_string()));
        };
        let mut io = WorkerIo {
            stdin,
            stdout: BufReader::new(stdout),
        };

        let handshake = io.receive();
        let outcome = match handshake {
            Ok(Some(WorkerResponse::Ready { device })) => {
                debug!(worker = %label, device = ?device, "Model worker ready.");
                Ok(())
            }
            Ok(Some(WorkerResponse::Error { message })) => Err(ModelLoadError::Rejected {
                model: label.clone(),
                message,
            }),
            Ok(Some(other)) => Err(ModelLoadError::Protocol(format!(
                "expected readiness, got {:?}",
                other
            ))),
            Ok(None) => Err(ModelLoadError::Rejected {
                model: label.clone(),
                message: "worker exited before reporting readiness".to_string(),
            }),
            Err(e) => Err(ModelLoadError::Protocol(e.to_string())),
        };

        if let Err(e) = outcome {
            let _ = child.kill();
            let _ = child.wait();
            return Err(e);
        }

        Ok(Self {
            label,
            child,
            io: Mutex::new(io),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Sends one request and waits for its reply.
    pub fn request(&self, request: &WorkerRequest) -> Result<WorkerReply, WorkerError> {
        let mut io = self.io.lock().map_err(|_| WorkerError::Poisoned)?;
        io.send(request)?;
        match io.receive()? {
            Some(WorkerResponse::Ok { peak_memory_bytes }) => Ok(WorkerReply { peak_memory_bytes }),
            Some(WorkerResponse::Error { message }) => Err(WorkerError::Failed(message)),
            Some(other) => Err(WorkerError::Unexpected(format!("{:?}", other))),
            None => Err(WorkerError::Exited(self.label.clone())),
        }
    }
}

impl Drop for WorkerProcess {
    fn drop(&mut self) {
        if let Ok(mut io) = self.io.lock() {
            if let Err(e) = io.send(&WorkerRequest::Shutdown) {
                debug!(worker = %self.label, "Shutdown request not delivered: {}", e);
            }
        }
        let deadline = Instant::now() + SHUTDOWN_GRACE;
        loop {
            match self.child.try_wait() {
                Ok(Some(status)) => {
                    debug!(worker = %self.label, %status, "Model worker exited.");
                    return;
                }
                Ok(None) if Instant::now() < deadline => thread::sleep(SHUTDOWN_POLL),
                Ok(None) => break,
                Err(e) => {
                    warn!(worker = %self.label, "Failed to poll model worker: {}", e);
                    break;
                }
            }
        }
        warn!(worker = %self.label, "Model worker ignored shutdown, killing it.");
        if let Err(e) = self.child.kill() {
            if e.kind() != std::io::ErrorKind::InvalidInput {
                warn!(worker = %self.label, "Failed to stop model worker: {}", e);
            }
        }
        let _ = self.child.wait();
    }
}
