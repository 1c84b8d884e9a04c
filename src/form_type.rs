use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// The four insurance product lines, each with its own printed form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FormType {
    Crop,
    Livestock,
    #[serde(rename = "ADSS")]
    Adss,
    Banca,
}

impl FormType {
    pub const ALL: [FormType; 4] = [
        FormType::Crop,
        FormType::Livestock,
        FormType::Adss,
        FormType::Banca,
    ];

    /// Name as it appears in records and file names.
    pub fn name(self) -> &'static str {
        match self {
            FormType::Crop => "Crop",
            FormType::Livestock => "Livestock",
            FormType::Adss => "ADSS",
            FormType::Banca => "Banca",
        }
    }

    /// Crop predates the other lines and keeps the bare key.
    pub fn layout_key(self) -> String {
        match self {
            FormType::Crop => "pdf_layout".to_string(),
            other => format!("pdf_layout_{}", other.name().to_lowercase()),
        }
    }

    pub fn template_key(self) -> String {
        match self {
            FormType::Crop => "pdf_template".to_string(),
            other => format!("pdf_template_{}", other.name().to_lowercase()),
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::FormTypeError(s.to_string()))
    }
}
