use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Read raw deck text from a file, or from stdin when the path is `-`
pub fn read_deck(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read deck from stdin")?;
        return Ok(content);
    }

    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))
}
