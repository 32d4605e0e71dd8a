//! File type detection

use crate::error::{Result, ResumeExtractorError};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Docx,
    Text,
    Markdown,
}

impl FileType {
    pub const EXTENSIONS: [&'static str; 5] = ["pdf", "docx", "txt", "md", "markdown"];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(FileType::Pdf),
            "docx" => Some(FileType::Docx),
            "txt" | "text" => Some(FileType::Text),
            "md" | "markdown" => Some(FileType::Markdown),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                ResumeExtractorError::UnsupportedFormat(format!("File has no extension: {}", path.display()))
            })?;

        Self::from_extension(extension).ok_or_else(|| {
            ResumeExtractorError::UnsupportedFormat(format!(
                "Unsupported file extension .{} for {} (supported: {})",
                extension,
                path.display(),
                Self::EXTENSIONS.join(", ")
            ))
        })
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileType::Pdf => write!(f, "PDF"),
            FileType::Docx => write!(f, "Word"),
            FileType::Text => write!(f, "plain text"),
            FileType::Markdown => write!(f, "Markdown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_detection() {
        assert_eq!(FileType::from_extension("PDF"), Some(FileType::Pdf));
        assert_eq!(FileType::from_extension("md"), Some(FileType::Markdown));
        assert_eq!(FileType::from_extension("txt"), Some(FileType::Text));
        assert_eq!(FileType::from_extension("Docx"), Some(FileType::Docx));
        assert_eq!(FileType::from_extension("doc"), None);
    }

    #[test]
    fn test_from_path_errors() {
        assert!(matches!(
            FileType::from_path(Path::new("resume.odt")),
            Err(ResumeExtractorError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            FileType::from_path(Path::new("resume")),
            Err(ResumeExtractorError::UnsupportedFormat(_))
        ));
        assert_eq!(FileType::from_path(Path::new("cv/Resume.Md")).unwrap(), FileType::Markdown);
    }
}
