//! Bounded file system tool
//!
//! Read/write access restricted to a workspace directory. Operations are a
//! tagged enum rather than a `read:path` / `write:path:content` string, so
//! paths and content containing delimiters parse unambiguously.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::traits::{Tool, ToolResult};
use crate::error::Result;

/// A validated file operation
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum FileOperation {
    /// Read the full content of a file
    Read { path: String },
    /// Write content to a file, creating parent directories as needed
    Write { path: String, content: String },
}

/// Built-in tool: workspace-bounded file I/O
pub struct FileSystemTool {
    workspace: PathBuf,
}

impl FileSystemTool {
    /// Create a tool rooted at the given workspace directory.
    ///
    /// The root is canonicalized up front so later containment checks
    /// compare like with like.
    pub fn new(workspace: PathBuf) -> Self {
        let workspace = workspace.canonicalize().unwrap_or(workspace);
        FileSystemTool { workspace }
    }

    /// Resolve a user-supplied path inside the workspace.
    ///
    /// `..` and `.` components are folded out lexically, then containment
    /// is checked component-wise with `Path::starts_with` - `/home/user2`
    /// does not pass for a `/home/user` workspace, unlike a string-prefix
    /// comparison.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let candidate = {
            let p = Path::new(path);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                self.workspace.join(p)
            }
        };

        let mut normalized = PathBuf::new();
        for component in candidate.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    normalized.pop();
                }
                other => normalized.push(other.as_os_str()),
            }
        }

        if !normalized.starts_with(&self.workspace) {
            return Err(crate::Error::AccessDenied(format!(
                "path outside workspace: {}",
                path
            )));
        }
        Ok(normalized)
    }

    async fn read(&self, path: &str) -> ToolResult {
        let full_path = match self.resolve(path) {
            Ok(p) => p,
            Err(e) => return ToolResult::failure(format!("{}", e)),
        };

        match tokio::fs::metadata(&full_path).await {
            Err(_) => return ToolResult::failure(format!("File does not exist: {}", path)),
            Ok(meta) if meta.is_dir() => {
                return ToolResult::failure(format!("Path is a directory, not a file: {}", path))
            }
            Ok(_) => {}
        }

        match tokio::fs::read_to_string(&full_path).await {
            Ok(content) => ToolResult::success(format!("File content of {}:\n{}", path, content)),
            Err(e) => ToolResult::failure(format!("Read error: {}", e)),
        }
    }

    async fn write(&self, path: &str, content: &str) -> ToolResult {
        let full_path = match self.resolve(path) {
            Ok(p) => p,
            Err(e) => return ToolResult::failure(format!("{}", e)),
        };

        if let Some(parent) = full_path.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                return ToolResult::failure(format!("Failed to create directories: {}", e));
            }
        }

        match tokio::fs::write(&full_path, content).await {
            Ok(()) => ToolResult::success(format!("Successfully wrote to {}", path)),
            Err(e) => ToolResult::failure(format!("Write error: {}", e)),
        }
    }
}

#[async_trait]
impl Tool for FileSystemTool {
    fn name(&self) -> &str {
        "file_system"
    }

    fn description(&self) -> &str {
        "Read or write files inside the workspace. \
         Use {\"op\": \"read\", \"path\": ...} or {\"op\": \"write\", \"path\": ..., \"content\": ...}."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "op": {
                    "type": "string",
                    "enum": ["read", "write"],
                    "description": "Operation kind"
                },
                "path": {
                    "type": "string",
                    "description": "Path relative to the workspace"
                },
                "content": {
                    "type": "string",
                    "description": "Content to write (write only)"
                }
            },
            "required": ["op", "path"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        let op: FileOperation = match serde_json::from_value(args) {
            Ok(op) => op,
            Err(e) => {
                return Ok(ToolResult::failure(format!(
                    "Invalid file operation: {}",
                    e
                )))
            }
        };

        Ok(match op {
            FileOperation::Read { path } => self.read(&path).await,
            FileOperation::Write { path, content } => self.write(&path, &content).await,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tool() -> (TempDir, FileSystemTool) {
        let dir = TempDir::new().unwrap();
        let tool = FileSystemTool::new(dir.path().to_path_buf());
        (dir, tool)
    }

    #[tokio::test]
    async fn test_write_then_read_round_trip() {
        let (_dir, tool) = tool();

        let written = tool
            .execute(serde_json::json!({
                "op": "write",
                "path": "notes/hello.txt",
                "content": "line one\nline two"
            }))
            .await
            .unwrap();
        assert!(written.success, "{:?}", written.error);

        let read = tool
            .execute(serde_json::json!({"op": "read", "path": "notes/hello.txt"}))
            .await
            .unwrap();
        assert!(read.success);
        let content = read.content.unwrap();
        assert!(content.ends_with("line one\nline two"));
    }

    #[tokio::test]
    async fn test_escape_is_denied() {
        let (_dir, tool) = tool();

        let result = tool
            .execute(serde_json::json!({
                "op": "write",
                "path": "../outside.txt",
                "content": "nope"
            }))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("Access denied"));

        let result = tool
            .execute(serde_json::json!({"op": "read", "path": "/etc/passwd"}))
            .await
            .unwrap();
        assert!(!result.success);
    }

    #[tokio::test]
    async fn test_sibling_prefix_does_not_pass() {
        let parent = TempDir::new().unwrap();
        let root = parent.path().join("work");
        let sibling = parent.path().join("work2");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::create_dir_all(&sibling).unwrap();
        std::fs::write(sibling.join("secret.txt"), "secret").unwrap();

        let tool = FileSystemTool::new(root);
        let result = tool
            .execute(serde_json::json!({
                "op": "read",
                "path": sibling.join("secret.txt").to_string_lossy()
            }))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("Access denied"));
    }

    #[tokio::test]
    async fn test_missing_file_and_directory_are_distinct() {
        let (_dir, tool) = tool();

        let missing = tool
            .execute(serde_json::json!({"op": "read", "path": "absent.txt"}))
            .await
            .unwrap();
        assert!(missing.error.unwrap().contains("does not exist"));

        tool.execute(serde_json::json!({
            "op": "write",
            "path": "sub/file.txt",
            "content": "x"
        }))
        .await
        .unwrap();
        let dir = tool
            .execute(serde_json::json!({"op": "read", "path": "sub"}))
            .await
            .unwrap();
        assert!(dir.error.unwrap().contains("directory"));
    }

    #[tokio::test]
    async fn test_colons_in_content_are_fine() {
        // The old string-encoded form broke on this input.
        let (_dir, tool) = tool();
        let result = tool
            .execute(serde_json::json!({
                "op": "write",
                "path": "urls.txt",
                "content": "https://example.com:8080/path"
            }))
            .await
            .unwrap();
        assert!(result.success);
    }
}
