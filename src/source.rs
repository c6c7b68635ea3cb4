use crate::document::SpecFormat;
use chrono::NaiveDate;
use std::fs;
use std::io;
use std::path::Path;

/// An uploaded file: its name and raw text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn read(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::new(display_name(path), content))
    }

    pub fn format(&self) -> SpecFormat {
        SpecFormat::from_file_name(&self.name)
    }
}

/// File name component of a path, falling back to the whole path
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `<product>-api.<version>.yaml`
pub fn download_file_name(product: &str, version: &str) -> String {
    format!("{}-api.{}.yaml", product, version)
}

/// `<base>-modified-<date>.yaml`, where base is the name without its extension
pub fn modified_file_name(original_name: &str, date: NaiveDate) -> String {
    let base = match original_name.rfind('.') {
        Some(idx) => &original_name[..idx],
        None => original_name,
    };
    let base = if base.is_empty() { "openapi" } else { base };
    format!("{}-modified-{}.yaml", base, date.format("%Y-%m-%d"))
}
