//! Code analysis tool
//!
//! Summarizes a source file (line/byte counts, rough function/type/import
//! counts by extension) or a directory tree (file totals and a breakdown
//! by extension).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::traits::{Tool, ToolResult};
use crate::error::Result;

const CODE_EXTENSIONS: &[&str] = &["rs", "py", "js", "ts", "java", "cpp", "c", "h"];

#[derive(Debug, Deserialize)]
struct AnalysisArgs {
    path: String,
}

/// Built-in tool: code structure summary
#[derive(Default)]
pub struct CodeAnalysisTool;

impl CodeAnalysisTool {
    pub fn new() -> Self {
        CodeAnalysisTool
    }

    async fn analyze_file(path: &Path) -> ToolResult {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(c) => c,
            Err(e) => return ToolResult::failure(format!("File analysis error: {}", e)),
        };

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let lines = content.lines().count();
        let functions = count_matches(&content, function_markers(extension));
        let types = count_matches(&content, type_markers(extension));
        let imports = count_matches(&content, import_markers(extension));

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        ToolResult::success(format!(
            "File Analysis: {}\nLines: {}\nSize: {} bytes\nFunctions: {}\nTypes: {}\nImports: {}",
            name,
            lines,
            content.len(),
            functions,
            types,
            imports
        ))
    }

    async fn analyze_directory(path: &Path) -> ToolResult {
        let mut files = 0usize;
        let mut dirs = 0usize;
        let mut by_extension: BTreeMap<String, usize> = BTreeMap::new();

        // Manual stack walk; no recursion in async fns.
        let mut stack: Vec<PathBuf> = vec![path.to_path_buf()];
        while let Some(dir) = stack.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(e) => e,
                Err(e) => return ToolResult::failure(format!("Directory analysis error: {}", e)),
            };
            while let Ok(Some(entry)) = entries.next_entry().await {
                let entry_path = entry.path();
                if entry_path.is_dir() {
                    dirs += 1;
                    stack.push(entry_path);
                } else {
                    files += 1;
                    if let Some(ext) = entry_path.extension().and_then(|e| e.to_str()) {
                        if CODE_EXTENSIONS.contains(&ext) {
                            *by_extension.entry(format!(".{}", ext)).or_insert(0) += 1;
                        }
                    }
                }
            }
        }

        let code_files: usize = by_extension.values().sum();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mut output = format!(
            "Directory Analysis: {}\nTotal files: {}\nCode files: {}\nSubdirectories: {}",
            name, files, code_files, dirs
        );
        if !by_extension.is_empty() {
            output.push_str("\n\nCode files by type:");
            for (ext, count) in &by_extension {
                output.push_str(&format!("\n  {}: {} files", ext, count));
            }
        }
        ToolResult::success(output)
    }
}

fn function_markers(extension: &str) -> &'static [&'static str] {
    match extension {
        "rs" => &["fn "],
        "py" => &["def "],
        "js" | "ts" => &["function "],
        "java" | "cpp" | "c" | "h" => &[],
        _ => &[],
    }
}

fn type_markers(extension: &str) -> &'static [&'static str] {
    match extension {
        "rs" => &["struct ", "enum ", "trait "],
        "py" | "js" | "ts" | "java" => &["class "],
        _ => &[],
    }
}

fn import_markers(extension: &str) -> &'static [&'static str] {
    match extension {
        "rs" => &["use "],
        "py" => &["import ", "from "],
        "js" | "ts" => &["import "],
        "java" => &["import "],
        "c" | "cpp" | "h" => &["#include"],
        _ => &[],
    }
}

/// Count lines that start (after indentation) with any of the markers.
fn count_matches(content: &str, markers: &[&str]) -> usize {
    if markers.is_empty() {
        return 0;
    }
    content
        .lines()
        .filter(|line| {
            let trimmed = line.trim_start();
            markers.iter().any(|m| {
                trimmed.starts_with(m)
                    || trimmed
                        .strip_prefix("pub ")
                        .is_some_and(|rest| rest.starts_with(m))
            })
        })
        .count()
}

#[async_trait]
impl Tool for CodeAnalysisTool {
    fn name(&self) -> &str {
        "code_analysis"
    }

    fn description(&self) -> &str {
        "Analyze code files and directories: line counts, function/type/import counts, \
         and per-extension breakdowns."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "File or directory path to analyze"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        let args: AnalysisArgs = serde_json::from_value(args)
            .map_err(|e| crate::Error::InvalidInput(format!("Invalid analysis arguments: {}", e)))?;

        let path = Path::new(&args.path);
        Ok(match tokio::fs::metadata(path).await {
            Err(_) => ToolResult::failure(format!("Path does not exist: {}", args.path)),
            Ok(meta) if meta.is_file() => Self::analyze_file(path).await,
            Ok(meta) if meta.is_dir() => Self::analyze_directory(path).await,
            Ok(_) => ToolResult::failure(format!("Invalid path type: {}", args.path)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_analysis_counts() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("sample.rs");
        std::fs::write(
            &file,
            "use std::fmt;\n\npub struct Point;\n\nfn area() {}\npub fn perimeter() {}\n",
        )
        .unwrap();

        let tool = CodeAnalysisTool::new();
        let result = tool
            .execute(serde_json::json!({"path": file.to_string_lossy()}))
            .await
            .unwrap();
        assert!(result.success);
        let content = result.content.unwrap();
        assert!(content.contains("Functions: 2"), "{}", content);
        assert!(content.contains("Types: 1"), "{}", content);
        assert!(content.contains("Imports: 1"), "{}", content);
    }

    #[tokio::test]
    async fn test_directory_breakdown() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.rs"), "fn main() {}").unwrap();
        std::fs::write(dir.path().join("b.py"), "def main(): pass").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not code").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/c.rs"), "fn f() {}").unwrap();

        let tool = CodeAnalysisTool::new();
        let result = tool
            .execute(serde_json::json!({"path": dir.path().to_string_lossy()}))
            .await
            .unwrap();
        let content = result.content.unwrap();
        assert!(content.contains("Total files: 4"), "{}", content);
        assert!(content.contains("Code files: 3"), "{}", content);
        assert!(content.contains(".rs: 2 files"), "{}", content);
    }

    #[tokio::test]
    async fn test_missing_path() {
        let tool = CodeAnalysisTool::new();
        let result = tool
            .execute(serde_json::json!({"path": "/no/such/path"}))
            .await
            .unwrap();
        assert!(!result.success);
    }
}
