// src/pipeline/archive.rs

//! Archive discovery and decoding.
//!
//! An archive is a compressed file holding one JSON post per line. The codec
//! is picked from the file extension:
//!
//! | extension       | codec |
//! |-----------------|-------|
//! | `.xz`, `.lzma`  | xz    |
//! | `.gz`           | gzip  |
//! | anything else   | none  |

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use xz2::read::XzDecoder;
use xz2::stream::{CONCATENATED, Stream};

use crate::error::{AppError, Result};
use crate::models::RawPost;

/// List regular files in `dir`, sorted by path. Symlinks are followed.
pub async fn list_archives(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if tokio::fs::metadata(entry.path()).await?.is_file() {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}

fn open(path: &Path) -> Result<Box<dyn Read + Send>> {
    let file = File::open(path)?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let reader: Box<dyn Read + Send> = match ext.as_deref() {
        Some("xz") | Some("lzma") => {
            // Auto-detects .xz and legacy .lzma containers; concatenated
            // xz streams decode as one.
            let stream = Stream::new_auto_decoder(u64::MAX, CONCATENATED)
                .map_err(std::io::Error::from)?;
            Box::new(XzDecoder::new_stream(file, stream))
        }
        Some("gz") => Box::new(MultiGzDecoder::new(file)),
        _ => Box::new(file),
    };
    Ok(reader)
}

/// Decode every non-blank line of an archive, in file order.
///
/// A line that is not a JSON object fails the whole archive.
pub fn read_posts(path: &Path) -> Result<Vec<RawPost>> {
    let reader = BufReader::new(open(path)?);
    let mut posts = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let post = serde_json::from_str(&line).map_err(|source| AppError::Decode {
            path: path.to_path_buf(),
            line: index + 1,
            source,
        })?;
        posts.push(post);
    }

    Ok(posts)
}

/// [`read_posts`] on the blocking thread pool.
pub async fn read_posts_blocking(path: PathBuf) -> Result<Vec<RawPost>> {
    tokio::task::spawn_blocking(move || read_posts(&path))
        .await
        .map_err(|e| AppError::Io(std::io::Error::other(e)))?
}
