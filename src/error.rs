use thiserror::Error;

use crate::form_type::FormType;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to create PDF: {0}")]
    PdfError(String),
    #[error("Storage unavailable: {0}")]
    StoreError(String),
    #[error("Background template unusable: {0}")]
    TemplateError(String),
    #[error("Failed to decode image: {0}")]
    ImageError(String),
    #[error("Failed to import layout: {0}")]
    ImportError(String),
    #[error("Failed to read application records: {0}")]
    RecordError(String),
    #[error("Invalid date format: {0}")]
    DateError(String),
    #[error("Unknown form type: {0}")]
    FormTypeError(String),
    #[error("Unsaved layout changes for {0}; save or discard them before switching")]
    UnsavedChanges(FormType),
    #[error("Invalid calibration script: {0}")]
    ScriptError(String),
    #[error("Cannot build summary: {0}")]
    SummaryError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
