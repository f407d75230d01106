//! `file_operations` capability: read, write and list.

use relay_domain::{ParamMap, ProviderError};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Maximum file size to read (10 MiB)
pub const MAX_READ_SIZE: u64 = 10 * 1024 * 1024;

/// Operation used when the call does not name one
pub const DEFAULT_OPERATION: &str = "read";

/// Supported operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    Read,
    Write,
    List,
}

impl FileOperation {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "read" | "cat" | "open" => Some(Self::Read),
            "write" | "save" | "create" => Some(Self::Write),
            "list" | "ls" | "dir" => Some(Self::List),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::List => "list",
        }
    }
}

/// Execute a `file_operations` call.
///
/// Relative paths are resolved against `working_dir` when one is set.
pub async fn execute_file_operation(
    params: &ParamMap,
    working_dir: Option<&Path>,
) -> Result<Value, ProviderError> {
    let raw_path = string_param(params, "path")
        .ok_or_else(|| ProviderError::InvalidArguments("'path' is required".to_string()))?;
    let raw_op = string_param(params, "operation").unwrap_or(DEFAULT_OPERATION);
    let operation = FileOperation::parse(raw_op).ok_or_else(|| {
        ProviderError::InvalidArguments(format!(
            "Unknown file operation '{}' (expected read, write or list)",
            raw_op
        ))
    })?;

    let path = resolve(raw_path, working_dir);
    debug!(path = %path.display(), operation = operation.as_str(), "File operation");

    match operation {
        FileOperation::Read => read(&path).await,
        FileOperation::Write => {
            let content = match params.get("content") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => {
                    return Err(ProviderError::InvalidArguments(
                        "'content' is required for write".to_string(),
                    ));
                }
                Some(other) => other.to_string(),
            };
            let create_dirs = params
                .get("create_dirs")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            write(&path, &content, create_dirs).await
        }
        FileOperation::List => list(&path).await,
    }
}

fn string_param<'a>(params: &'a ParamMap, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn resolve(raw: &str, working_dir: Option<&Path>) -> PathBuf {
    let expanded = match raw.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(raw)),
        None => PathBuf::from(raw),
    };
    match working_dir {
        Some(dir) if expanded.is_relative() => dir.join(expanded),
        _ => expanded,
    }
}

async fn read(path: &Path) -> Result<Value, ProviderError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| io_failure("read", path, e))?;

    if metadata.is_dir() {
        return Err(ProviderError::ExecutionFailed(format!(
            "Path is a directory, not a file: {}",
            path.display()
        )));
    }
    if metadata.len() > MAX_READ_SIZE {
        return Err(ProviderError::ExecutionFailed(format!(
            "File too large: {} bytes (max: {} bytes)",
            metadata.len(),
            MAX_READ_SIZE
        )));
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| io_failure("read", path, e))?;
    let content = String::from_utf8_lossy(&bytes).into_owned();

    Ok(json!({
        "operation": "read",
        "path": path.display().to_string(),
        "bytes": bytes.len(),
        "content": content,
    }))
}

async fn write(path: &Path, content: &str, create_dirs: bool) -> Result<Value, ProviderError> {
    if create_dirs
        && let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| io_failure("create directories for", path, e))?;
    }

    tokio::fs::write(path, content)
        .await
        .map_err(|e| io_failure("write", path, e))?;

    Ok(json!({
        "operation": "write",
        "path": path.display().to_string(),
        "bytes_written": content.len(),
    }))
}

async fn list(path: &Path) -> Result<Value, ProviderError> {
    let mut reader = tokio::fs::read_dir(path)
        .await
        .map_err(|e| io_failure("list", path, e))?;

    let mut entries = Vec::new();
    while let Some(entry) = reader
        .next_entry()
        .await
        .map_err(|e| io_failure("list", path, e))?
    {
        let file_type = entry.file_type().await.ok();
        let is_dir = file_type.is_some_and(|t| t.is_dir());
        let size = if is_dir {
            None
        } else {
            entry.metadata().await.ok().map(|m| m.len())
        };
        entries.push((entry.file_name().to_string_lossy().into_owned(), is_dir, size));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let entries: Vec<Value> = entries
        .into_iter()
        .map(|(name, is_dir, size)| json!({ "name": name, "is_dir": is_dir, "size": size }))
        .collect();

    Ok(json!({
        "operation": "list",
        "path": path.display().to_string(),
        "count": entries.len(),
        "entries": entries,
    }))
}

fn io_failure(action: &str, path: &Path, e: std::io::Error) -> ProviderError {
    if e.kind() == std::io::ErrorKind::NotFound {
        ProviderError::ExecutionFailed(format!("No such file or directory: {}", path.display()))
    } else {
        ProviderError::ExecutionFailed(format!("Failed to {} {}: {}", action, path.display(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn params(pairs: &[(&str, Value)]) -> ParamMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_read_defaults_operation() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "hello").unwrap();

        let value = execute_file_operation(
            &params(&[("path", json!(file.display().to_string()))]),
            None,
        )
        .await
        .unwrap();
        assert_eq!(value["operation"], "read");
        assert_eq!(value["content"], "hello");
        assert_eq!(value["bytes"], 5);
    }

    #[tokio::test]
    async fn test_write_then_read_relative_to_working_dir() {
        let dir = tempdir().unwrap();

        let written = execute_file_operation(
            &params(&[
                ("path", json!("nested/out.txt")),
                ("operation", json!("write")),
                ("content", json!("данные")),
                ("create_dirs", json!(true)),
            ]),
            Some(dir.path()),
        )
        .await
        .unwrap();
        assert_eq!(written["bytes_written"], "данные".len());

        let on_disk = std::fs::read_to_string(dir.path().join("nested/out.txt")).unwrap();
        assert_eq!(on_disk, "данные");
    }

    #[tokio::test]
    async fn test_write_without_parent_fails() {
        let dir = tempdir().unwrap();
        let err = execute_file_operation(
            &params(&[
                ("path", json!("missing/out.txt")),
                ("operation", json!("write")),
                ("content", json!("x")),
            ]),
            Some(dir.path()),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ProviderError::ExecutionFailed(_)));
    }

    #[tokio::test]
    async fn test_write_requires_content() {
        let dir = tempdir().unwrap();
        let err = execute_file_operation(
            &params(&[("path", json!("a.txt")), ("operation", json!("write"))]),
            Some(dir.path()),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn test_list_is_sorted() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "bb").unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let value = execute_file_operation(
            &params(&[("path", json!(".")), ("operation", json!("ls"))]),
            Some(dir.path()),
        )
        .await
        .unwrap();
        assert_eq!(value["count"], 3);
        let names: Vec<&str> = value["entries"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "sub"]);
        assert_eq!(value["entries"][0]["size"], 1);
        assert_eq!(value["entries"][2]["is_dir"], true);
    }

    #[tokio::test]
    async fn test_missing_file_names_the_path() {
        let err = execute_file_operation(&params(&[("path", json!("/no/such/file.txt"))]), None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/no/such/file.txt"));
    }

    #[tokio::test]
    async fn test_unknown_operation() {
        let err = execute_file_operation(
            &params(&[("path", json!("x")), ("operation", json!("delete"))]),
            None,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("delete"));
    }

    #[tokio::test]
    async fn test_read_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let err = execute_file_operation(
            &params(&[("path", json!(dir.path().display().to_string()))]),
            None,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("directory"));
    }
}
