use tracing::{debug, warn};

/// Plain text from an uploaded résumé. Unknown formats and parse failures
/// give an empty string; the upload itself still succeeds.
pub fn extract_text(bytes: &[u8], extension: &str) -> String {
    let raw = match extension {
        // pdf-extract panics on some malformed documents
        "pdf" => match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!("PDF text extraction failed: {e}");
                String::new()
            }
            Err(_) => {
                warn!("PDF text extraction panicked");
                String::new()
            }
        },
        "txt" | "md" => String::from_utf8_lossy(bytes).into_owned(),
        other => {
            debug!("No text extractor for '.{other}' uploads");
            String::new()
        }
    };
    normalize_whitespace(&raw)
}

/// Collapses runs of spaces and tabs, trims each line, and keeps at most one
/// blank line between paragraphs.
fn normalize_whitespace(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut blank_run = 0;

    for line in raw.lines() {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            blank_run += 1;
            continue;
        }
        if !out.is_empty() {
            out.push_str(if blank_run > 0 { "\n\n" } else { "\n" });
        }
        out.push_str(&line);
        blank_run = 0;
    }
    out
}
