//! Text extraction from uploaded résumé and question files.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("could not read PDF text: {0}")]
    Pdf(String),

    #[error("{0} files are not supported; upload a PDF or text file")]
    Unsupported(String),

    #[error("file is not valid UTF-8 text")]
    Encoding(#[from] std::string::FromUtf8Error),
}

fn is_pdf(filename: &str, bytes: &[u8]) -> bool {
    filename.to_ascii_lowercase().ends_with(".pdf") || bytes.starts_with(b"%PDF")
}

/// Extracts plain text from a PDF or UTF-8 text upload. CPU-bound for PDFs.
pub fn extract_text(filename: &str, bytes: &[u8]) -> Result<String, ExtractError> {
    if is_pdf(filename, bytes) {
        return pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractError::Pdf(e.to_string()));
    }

    let lower = filename.to_ascii_lowercase();
    if lower.ends_with(".hwp") || lower.ends_with(".hwpx") {
        return Err(ExtractError::Unsupported("HWP".to_string()));
    }

    Ok(String::from_utf8(bytes.to_vec())?)
}
