//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use serde_json::Value;
use tempfile::TempDir;

/// Builder for JSON Lines test fixtures on disk
pub struct JlDirBuilder {
    temp_dir: TempDir,
}

impl JlDirBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write raw bytes under the given file name
    pub fn write_plain(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, content).expect("Failed to write fixture file");
        path
    }

    /// Gzip-compress the given bytes and write them under the given file name
    pub fn write_gzip(&self, name: &str, content: &[u8]) -> PathBuf {
        self.write_plain(name, &gzip_bytes(content))
    }

    /// Rewrite a fixture file with its last `drop_bytes` bytes removed
    pub fn truncate(&self, path: &Path, drop_bytes: usize) {
        let contents = fs::read(path).expect("Failed to read fixture file");
        assert!(
            drop_bytes <= contents.len(),
            "cannot drop more bytes than the file holds"
        );
        fs::write(path, &contents[..contents.len() - drop_bytes])
            .expect("Failed to rewrite fixture file");
    }
}

/// Serialize values as JSON Lines bytes, newline-separated
pub fn jl_bytes(values: &[Value]) -> Vec<u8> {
    values
        .iter()
        .map(|v| serde_json::to_string(v).expect("Failed to serialize fixture value"))
        .collect::<Vec<_>>()
        .join("\n")
        .into_bytes()
}

/// Gzip-compress bytes in memory
pub fn gzip_bytes(content: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(content)
        .expect("Failed to gzip fixture data");
    encoder.finish().expect("Failed to finish gzip stream")
}
