use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::model::Document;

/// Loads the programme document from disk.
pub fn read_document(path: &Path) -> Result<Document> {
    let source = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&source)?)
}

/// Writes the programme document as pretty-printed JSON.
///
/// The document is serialised in full before the file is created, so a
/// serialisation failure never leaves a partial file behind.
pub fn write_document(path: &Path, document: &Document) -> Result<()> {
    let json = serde_json::to_string_pretty(document)?;
    fs::write(path, json)?;
    Ok(())
}
