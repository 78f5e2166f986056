//! PDF text extraction.

use std::any::Any;
use std::panic;
use std::path::Path;

use crate::error::ParseError;

/// Extract the plain text of every page, pages joined by newlines.
///
/// Fails when the container cannot be decoded or when it yields no text at
/// all (scanned or image-only statements). The extractor panics on some
/// malformed content streams (text shown with no font selected, undefined
/// font resources, dangling references); a panic is reported as a `Pdf`
/// error for this file only.
pub fn extract_text(path: &Path) -> Result<String, ParseError> {
    let bytes = std::fs::read(path).map_err(|e| ParseError::io(path, e))?;
    let text = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(&bytes))
        .map_err(|payload| {
            ParseError::Pdf(format!(
                "{}: extractor panicked: {}",
                path.display(),
                panic_message(payload.as_ref())
            ))
        })?
        .map_err(|e| ParseError::Pdf(format!("{}: {}", path.display(), e)))?;

    if text.trim().is_empty() {
        return Err(ParseError::Pdf(format!(
            "{}: no extractable text (scanned or image-only PDF)",
            path.display()
        )));
    }

    Ok(text)
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
