// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;

use crate::engine::Outcome;
use crate::errors::{ErrorKind, OperationError};
use crate::traits::{Continuation, Operation};

/// Reads a whole file.
///
/// Arguments are `[path, encoding?]`. With a `utf-8` encoding the value is
/// the file's text; without one (or with any other) it is the raw bytes as
/// an array of numbers. The read is spawned on the current `LocalSet`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReadFile;

impl ReadFile {
    pub const NAME: &'static str = "read_file";

    pub fn new() -> Self {
        Self
    }

    pub async fn read(args: Vec<Value>) -> Outcome {
        let path = match args.first() {
            Some(Value::String(path)) => path.clone(),
            _ => {
                return Err(OperationError::new(
                    ErrorKind::InvalidInput,
                    format!("{} expects a path string as its first argument", Self::NAME),
                ))
            }
        };

        let as_text = matches!(
            args.get(1).and_then(Value::as_str),
            Some(encoding) if is_utf8(encoding)
        );

        if as_text {
            tokio::fs::read_to_string(&path)
                .await
                .map(Value::String)
                .map_err(|e| OperationError::from_io(&e, &path))
        } else {
            tokio::fs::read(&path)
                .await
                .map(|bytes| Value::Array(bytes.into_iter().map(Value::from).collect()))
                .map_err(|e| OperationError::from_io(&e, &path))
        }
    }
}

fn is_utf8(encoding: &str) -> bool {
    encoding.eq_ignore_ascii_case("utf-8") || encoding.eq_ignore_ascii_case("utf8")
}

impl Operation for ReadFile {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn call(&self, args: Vec<Value>, done: Continuation) {
        tokio::task::spawn_local(async move {
            done.complete(Self::read(args).await);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Pipeline;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tokio::task::LocalSet;

    fn temp_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[tokio::test]
    async fn test_reads_text_with_utf8() {
        let file = temp_file(b"hello\n");
        let path = file.path().to_str().unwrap().to_string();

        let outcome = ReadFile::read(vec![json!(path), json!("utf-8")]).await;
        assert_eq!(outcome, Ok(json!("hello\n")));
    }

    #[tokio::test]
    async fn test_reads_bytes_without_encoding() {
        let file = temp_file(b"hi");
        let path = file.path().to_str().unwrap().to_string();

        let outcome = ReadFile::read(vec![json!(path)]).await;
        assert_eq!(outcome, Ok(json!([104, 105])));
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");
        let path = path.to_str().unwrap();

        let err = ReadFile::read(vec![json!(path), json!("utf-8")]).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(err.message.ends_with(&format!("'{}'", path)));
    }

    #[tokio::test]
    async fn test_non_string_path_is_invalid_input() {
        let err = ReadFile::read(vec![json!(3)]).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_pipeline_resumes_after_spawned_read() {
        let file = temp_file(b"abc");
        let path = file.path().to_str().unwrap().to_string();
        let invoker = Pipeline::builder("read")
            .operation(ReadFile::new())
            .transform("length", |input| {
                Ok(json!(input.value.as_str().map(str::len).unwrap_or_default()))
            })
            .build()
            .unwrap()
            .invoker();

        let local = LocalSet::new();
        let report = local
            .run_until(async { invoker.invoke(vec![path.into(), "utf-8".into()]).finished().await })
            .await;

        assert_eq!(report.outcome, Ok(json!(3)));
    }
}
