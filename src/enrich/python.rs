//! Live Python interpreter driven over a JSON-lines pipe
//!
//! The interpreter runs an embedded bridge script: one request line in, one
//! response line out. Imported modules that print are redirected to stderr by
//! the bridge so stdout carries nothing but responses.

use std::env;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::live::{ArgSpec, LiveEnvironment, LiveParameter, SymbolInfo};
use crate::error::{LiveError, Result, StubscanError};

const BRIDGE_SOURCE: &str = include_str!("bridge.py");

#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Request<'a> {
    Import { module: &'a str },
    Doc { module: &'a str, path: &'a str },
    Signature { module: &'a str, path: &'a str },
    Argspec { module: &'a str, path: &'a str },
    Describe { module: &'a str, path: &'a str },
    RenderDoc { module: &'a str, path: &'a str },
}

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    ok: Value,
    #[serde(default)]
    error: Option<Fault>,
}

#[derive(Debug, Deserialize)]
struct Fault {
    kind: String,
    message: String,
}

/// A running bridge interpreter
pub struct PythonProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl PythonProcess {
    /// Start `python` with `search_paths` prepended to `PYTHONPATH`.
    ///
    /// Failing to locate or start the interpreter is fatal; everything after
    /// that degrades per query.
    pub fn spawn(python: &str, search_paths: &[PathBuf]) -> Result<Self> {
        let executable = which::which(python).map_err(|e| StubscanError::BridgeError {
            message: format!("{}: {}", python, e),
        })?;

        let mut paths: Vec<PathBuf> = search_paths.to_vec();
        if let Some(existing) = env::var_os("PYTHONPATH") {
            paths.extend(env::split_paths(&existing));
        }
        let python_path = env::join_paths(paths).map_err(|e| StubscanError::BridgeError {
            message: format!("invalid python search path: {}", e),
        })?;

        let mut child = Command::new(&executable)
            .args(["-u", "-c", BRIDGE_SOURCE])
            .env("PYTHONPATH", python_path)
            .env("PYTHONIOENCODING", "utf-8")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| StubscanError::BridgeError {
                message: format!("failed to start {}: {}", executable.display(), e),
            })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            return Err(StubscanError::BridgeError {
                message: "interpreter pipes unavailable".to_string(),
            });
        };

        tracing::debug!("Started introspection bridge with {}", executable.display());
        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        })
    }

    fn request<T: DeserializeOwned>(
        &mut self,
        request: &Request<'_>,
    ) -> std::result::Result<T, LiveError> {
        let mut line = serde_json::to_string(request).map_err(|e| bridge_failure(e.to_string()))?;
        line.push('\n');
        self.stdin
            .write_all(line.as_bytes())
            .and_then(|_| self.stdin.flush())
            .map_err(|e| bridge_failure(format!("write failed: {}", e)))?;

        let mut reply = String::new();
        let read = self
            .stdout
            .read_line(&mut reply)
            .map_err(|e| bridge_failure(format!("read failed: {}", e)))?;
        if read == 0 {
            return Err(bridge_failure("interpreter exited".to_string()));
        }

        let response: Response = serde_json::from_str(&reply)
            .map_err(|e| bridge_failure(format!("malformed reply: {}", e)))?;
        if let Some(fault) = response.error {
            return Err(fault_to_error(fault, request));
        }
        serde_json::from_value(response.ok).map_err(|e| LiveError::Introspection {
            path: request_path(request).to_string(),
            message: format!("unexpected reply shape: {}", e),
        })
    }
}

impl Drop for PythonProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

impl LiveEnvironment for PythonProcess {
    fn import_module(&mut self, module: &str) -> std::result::Result<(), LiveError> {
        self.request::<Value>(&Request::Import { module }).map(|_| ())
    }

    fn documentation(&mut self, module: &str, path: &str) -> std::result::Result<String, LiveError> {
        self.request(&Request::Doc { module, path })
    }

    fn signature(
        &mut self,
        module: &str,
        path: &str,
    ) -> std::result::Result<Vec<LiveParameter>, LiveError> {
        self.request(&Request::Signature { module, path })
    }

    fn argspec(&mut self, module: &str, path: &str) -> std::result::Result<ArgSpec, LiveError> {
        self.request(&Request::Argspec { module, path })
    }

    fn describe(&mut self, module: &str, path: &str) -> std::result::Result<SymbolInfo, LiveError> {
        self.request(&Request::Describe { module, path })
    }

    fn render_doc(&mut self, module: &str, path: &str) -> std::result::Result<String, LiveError> {
        self.request(&Request::RenderDoc { module, path })
    }
}

fn bridge_failure(message: String) -> LiveError {
    LiveError::Bridge { message }
}

fn request_module<'a>(request: &Request<'a>) -> &'a str {
    match request {
        Request::Import { module }
        | Request::Doc { module, .. }
        | Request::Signature { module, .. }
        | Request::Argspec { module, .. }
        | Request::Describe { module, .. }
        | Request::RenderDoc { module, .. } => *module,
    }
}

fn request_path<'a>(request: &Request<'a>) -> &'a str {
    match request {
        Request::Import { module } => *module,
        Request::Doc { path, .. }
        | Request::Signature { path, .. }
        | Request::Argspec { path, .. }
        | Request::Describe { path, .. }
        | Request::RenderDoc { path, .. } => *path,
    }
}

fn fault_to_error(fault: Fault, request: &Request<'_>) -> LiveError {
    match fault.kind.as_str() {
        "module" => LiveError::ModuleNotFound {
            module: request_module(request).to_string(),
            message: fault.message,
        },
        "symbol" => LiveError::SymbolNotFound {
            path: request_path(request).to_string(),
        },
        "nodoc" => LiveError::NoDocumentation {
            path: request_path(request).to_string(),
        },
        _ => LiveError::Introspection {
            path: request_path(request).to_string(),
            message: fault.message,
        },
    }
}
