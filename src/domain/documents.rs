//! Delivery paperwork attached to a load.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three kinds of paperwork a driver can attach once a load is delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocumentCategory {
    ProofOfDelivery,
    LumperReceipt,
    Accessorials,
}

impl DocumentCategory {
    pub const ALL: [DocumentCategory; 3] = [
        DocumentCategory::ProofOfDelivery,
        DocumentCategory::LumperReceipt,
        DocumentCategory::Accessorials,
    ];

    /// Name used in upload/remove URLs and as the multipart field name.
    pub fn wire_name(&self) -> &'static str {
        match self {
            DocumentCategory::ProofOfDelivery => "proofOfDelivery",
            DocumentCategory::LumperReceipt => "lumperReceipt",
            DocumentCategory::Accessorials => "accessorials",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentCategory::ProofOfDelivery => "Proof of Delivery",
            DocumentCategory::LumperReceipt => "Lumper Receipt",
            DocumentCategory::Accessorials => "Accessorials",
        }
    }

    fn index(&self) -> usize {
        match self {
            DocumentCategory::ProofOfDelivery => 0,
            DocumentCategory::LumperReceipt => 1,
            DocumentCategory::Accessorials => 2,
        }
    }
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// A stored document: the backend returns either the bare stored name/URL or
/// an object describing the file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentFile {
    Stored(String),
    Record {
        #[serde(alias = "fileName", alias = "originalName", alias = "key")]
        name: String,
        #[serde(default, alias = "location", skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
}

impl DocumentFile {
    /// Identifier the remove endpoint expects in `doc_name`.
    pub fn name(&self) -> &str {
        match self {
            DocumentFile::Stored(name) => name,
            DocumentFile::Record { name, .. } => name,
        }
    }

    /// Last path segment, for display.
    pub fn display_name(&self) -> &str {
        let name = self.name();
        name.rsplit('/').next().filter(|s| !s.is_empty()).unwrap_or(name)
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            DocumentFile::Stored(name) if name.starts_with("http") => Some(name),
            DocumentFile::Stored(_) => None,
            DocumentFile::Record { url, .. } => url.as_deref(),
        }
    }
}

/// A picked file ready to be sent to the upload endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime_type: Option<String>, bytes: Vec<u8>) -> Self {
        let mut name = name.into();
        if name.trim().is_empty() {
            name = "upload.bin".to_string();
        }
        let mime_type = mime_type
            .filter(|mime| !mime.trim().is_empty())
            .unwrap_or_else(|| guess_mime(&name).to_string());
        Self {
            name,
            mime_type,
            bytes,
        }
    }
}

fn guess_mime(name: &str) -> &'static str {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".heic") {
        "image/heic"
    } else {
        "application/octet-stream"
    }
}

/// Busy/error indicator of a single document category.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocumentOpState {
    pub busy: bool,
    pub error: Option<String>,
}

/// Independent indicators for every category, so one upload never blocks another.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocumentOps {
    states: [DocumentOpState; 3],
}

impl DocumentOps {
    pub fn get(&self, category: DocumentCategory) -> &DocumentOpState {
        &self.states[category.index()]
    }

    pub fn get_mut(&mut self, category: DocumentCategory) -> &mut DocumentOpState {
        &mut self.states[category.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_entries_accept_strings_and_objects() {
        let files: Vec<DocumentFile> = serde_json::from_value(json!([
            "https://files.example.com/pod/scan-1.jpg",
            { "fileName": "receipt.pdf", "location": "https://files.example.com/r.pdf" }
        ]))
        .unwrap();

        assert_eq!(files[0].display_name(), "scan-1.jpg");
        assert_eq!(files[0].url(), Some("https://files.example.com/pod/scan-1.jpg"));
        assert_eq!(files[1].name(), "receipt.pdf");
        assert_eq!(files[1].url(), Some("https://files.example.com/r.pdf"));
    }

    #[test]
    fn upload_file_infers_missing_details() {
        let file = UploadFile::new("BOL.PDF", None, vec![1, 2, 3]);
        assert_eq!(file.mime_type, "application/pdf");

        let unnamed = UploadFile::new("  ", Some(String::new()), Vec::new());
        assert_eq!(unnamed.name, "upload.bin");
        assert_eq!(unnamed.mime_type, "application/octet-stream");
    }

    #[test]
    fn category_states_are_independent() {
        let mut ops = DocumentOps::default();
        ops.get_mut(DocumentCategory::LumperReceipt).busy = true;

        assert!(ops.get(DocumentCategory::LumperReceipt).busy);
        assert!(!ops.get(DocumentCategory::ProofOfDelivery).busy);
    }
}
