use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Request sent to a worker as one JSON line on its stdin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum WorkerRequest {
    /// Run the encoder on the `tokens` tensor stored in `tokens`; write `representations` to `output`.
    Encode { tokens: PathBuf, output: PathBuf },
    /// Dock the partner tensors stored in `input`; write `coords` to `output`.
    Dock {
        sequence1: String,
        sequence2: String,
        input: PathBuf,
        output: PathBuf,
    },
    Shutdown,
}

/// Line written by a worker on its stdout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WorkerResponse {
    Ready {
        #[serde(default)]
        device: Option<String>,
    },
    Ok {
        #[serde(default)]
        peak_memory_bytes: Option<u64>,
    },
    Error {
        message: String,
    },
}

/// Tensor names inside the exchanged safetensors files.
pub mod tensors {
    pub const TOKENS: &str = "tokens";
    pub const REPRESENTATIONS: &str = "representations";
    pub const COORDS: &str = "coords";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_are_tagged_by_op() {
        let request = WorkerRequest::Encode {
            tokens: PathBuf::from("/tmp/x/tokens.safetensors"),
            output: PathBuf::from("/tmp/x/out.safetensors"),
        };
        let line = serde_json::to_string(&request).unwrap();
        assert_eq!(
            line,
            r#"{"op":"encode","tokens":"/tmp/x/tokens.safetensors","output":"/tmp/x/out.safetensors"}"#
        );
        assert_eq!(
            serde_json::to_string(&WorkerRequest::Shutdown).unwrap(),
            r#"{"op":"shutdown"}"#
        );
    }

    #[test]
    fn responses_parse_with_optional_fields() {
        let ready: WorkerResponse = serde_json::from_str(r#"{"status":"ready"}"#).unwrap();
        assert_eq!(ready, WorkerResponse::Ready { device: None });

        let ok: WorkerResponse =
            serde_json::from_str(r#"{"status":"ok","peak_memory_bytes":1048576}"#).unwrap();
        assert_eq!(
            ok,
            WorkerResponse::Ok {
                peak_memory_bytes: Some(1048576)
            }
        );

        let err: WorkerResponse =
            serde_json::from_str(r#"{"status":"error","message":"CUDA OOM"}"#).unwrap();
        assert_eq!(
            err,
            WorkerResponse::Error {
                message: "CUDA OOM".to_string()
            }
        );
    }
}
