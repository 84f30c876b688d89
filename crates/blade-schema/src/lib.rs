//! Configuration document model for blade.
//!
//! Blade projects are described by a Pkl module. This crate holds the Rust
//! mirror of that document and a loader that evaluates a module through the
//! external `pkl` binary (`pkl eval -f json`) and decodes the result.
//!
//! The loader takes the evaluator path as an argument; locating (and, when
//! missing, provisioning) the binary is the caller's concern.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Top-level configuration document.
#[derive(Debug, Clone, Deserialize)]
pub struct Schema {
    /// Project description block.
    pub project: Project,
}

/// The `project` block of a blade configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    /// Human-readable project name.
    pub name: String,
}

/// Errors from evaluating and decoding a configuration module.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The evaluator process could not be spawned or awaited.
    #[error("failed to run evaluator: {0}")]
    Io(#[from] std::io::Error),

    /// The evaluator ran but rejected the module.
    #[error("evaluator exited with {status}: {stderr}")]
    Evaluator {
        /// Exit status reported by the evaluator process.
        status: std::process::ExitStatus,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// The evaluator output was not a valid document.
    #[error("malformed module output: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Evaluate the Pkl module at `module` with the evaluator binary at
/// `evaluator` and decode the JSON rendering into a [`Schema`].
///
/// # Errors
///
/// Returns [`SchemaError::Io`] if the evaluator cannot be executed,
/// [`SchemaError::Evaluator`] if it exits non-zero, and
/// [`SchemaError::Parse`] if its output does not decode.
pub async fn load_from_path(evaluator: &Path, module: &Path) -> Result<Schema, SchemaError> {
    debug!(
        evaluator = %evaluator.display(),
        module = %module.display(),
        "evaluating configuration module"
    );

    let output = tokio::process::Command::new(evaluator)
        .arg("eval")
        .args(["-f", "json"])
        .arg(module)
        .output()
        .await?;

    if !output.status.success() {
        return Err(SchemaError::Evaluator {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let schema = serde_json::from_slice(&output.stdout)?;
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_project_block() {
        let schema: Schema =
            serde_json::from_str(r#"{"project": {"name": "demo"}}"#).unwrap();
        assert_eq!(schema.project.name, "demo");
    }

    #[test]
    fn rejects_missing_project() {
        let result: Result<Schema, _> = serde_json::from_str(r#"{"other": 1}"#);
        assert!(result.is_err());
    }

    // The evaluator contract is exercised with a stub script so the tests do
    // not depend on a real pkl install.
    #[cfg(unix)]
    mod evaluator {
        use super::super::*;
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;
        use std::path::PathBuf;
        use tempfile::TempDir;

        fn stub_evaluator(dir: &TempDir, body: &str) -> PathBuf {
            let path = dir.path().join("pkl");
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(file, "#!/bin/sh").unwrap();
            writeln!(file, "{body}").unwrap();
            drop(file);
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[tokio::test]
        async fn loads_module_via_evaluator() {
            let dir = TempDir::new().unwrap();
            let pkl = stub_evaluator(&dir, r#"echo '{"project": {"name": "widgets"}}'"#);

            let schema = load_from_path(&pkl, Path::new("test.pkl")).await.unwrap();
            assert_eq!(schema.project.name, "widgets");
        }

        #[tokio::test]
        async fn surfaces_evaluator_failure_with_stderr() {
            let dir = TempDir::new().unwrap();
            let pkl = stub_evaluator(&dir, "echo 'no such module' >&2; exit 1");

            let err = load_from_path(&pkl, Path::new("test.pkl"))
                .await
                .unwrap_err();
            match err {
                SchemaError::Evaluator { status, stderr } => {
                    assert_eq!(status.code(), Some(1));
                    assert_eq!(stderr, "no such module");
                }
                other => panic!("expected evaluator error, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn surfaces_malformed_output() {
            let dir = TempDir::new().unwrap();
            let pkl = stub_evaluator(&dir, "echo 'not json'");

            let err = load_from_path(&pkl, Path::new("test.pkl"))
                .await
                .unwrap_err();
            assert!(matches!(err, SchemaError::Parse(_)));
        }

        #[tokio::test]
        async fn missing_evaluator_is_io_error() {
            let err = load_from_path(Path::new("/nonexistent/pkl"), Path::new("test.pkl"))
                .await
                .unwrap_err();
            assert!(matches!(err, SchemaError::Io(_)));
        }
    }
}
