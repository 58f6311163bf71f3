//! Plain-text context extraction from files attached to a question.

use std::fs;
use std::path::{Path, PathBuf};

/// Upper bound on attached context sent with one question (bytes).
pub const MAX_CONTEXT_BYTES: usize = 64 * 1024;

/// Extensions read as UTF-8 text.
const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "markdown", "tex", "csv", "json", "rst"];

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}: unsupported file type (only plain-text files can be attached)")]
    Unsupported(PathBuf),
    #[error("{0}: file is not valid UTF-8 text")]
    NotText(PathBuf),
}

fn is_supported(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => TEXT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => true,
    }
}

/// Read the text content of one file.
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    if !is_supported(path) {
        return Err(ExtractError::Unsupported(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| ExtractError::NotText(path.to_path_buf()))
}

/// Concatenate the text of `paths`, each under a `### <file name>` heading.
/// Returns None when no paths are given. Output is truncated to [`MAX_CONTEXT_BYTES`].
pub fn gather_context(paths: &[PathBuf]) -> Result<Option<String>, ExtractError> {
    if paths.is_empty() {
        return Ok(None);
    }
    let mut out = String::new();
    for path in paths {
        let text = extract_text(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        if !out.is_empty() {
            out.push_str("\n\n");
        }
        out.push_str("### ");
        out.push_str(&name);
        out.push('\n');
        out.push_str(text.trim());
    }
    if out.len() > MAX_CONTEXT_BYTES {
        log::warn!(
            "Attached context is {} bytes, truncating to {}",
            out.len(),
            MAX_CONTEXT_BYTES
        );
        truncate_at_char_boundary(&mut out, MAX_CONTEXT_BYTES);
    }
    Ok(Some(out))
}

fn truncate_at_char_boundary(s: &mut String, max: usize) {
    let mut end = max.min(s.len());
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
}
