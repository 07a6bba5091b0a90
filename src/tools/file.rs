//! File writing tool.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{required_str, Tool};

/// Write content to a file, replacing anything already there.
pub struct WriteFile;

impl WriteFile {
    fn resolve(file_path: &str, workspace: &Path) -> PathBuf {
        let path = Path::new(file_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            workspace.join(path)
        }
    }
}

#[async_trait]
impl Tool for WriteFile {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write content to a file at the specified path. Overwrites the file if it exists. Returns a confirmation message."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Path of the file to write. Relative paths are resolved against the workspace."
                },
                "content": {
                    "type": "string",
                    "description": "The content to write to the file"
                }
            },
            "required": ["file_path", "content"]
        })
    }

    async fn execute(&self, args: Value, workspace: &Path) -> anyhow::Result<String> {
        let file_path = required_str(&args, "file_path")?;
        let content = required_str(&args, "content")?;

        let target = Self::resolve(file_path, workspace);
        tokio::fs::write(&target, content)
            .await
            .map_err(|e| anyhow::anyhow!("Error writing to file {}: {}", file_path, e))?;

        tracing::info!(path = %target.display(), bytes = content.len(), "Wrote file");
        Ok(format!("Content successfully written to {}.", file_path))
    }
}
