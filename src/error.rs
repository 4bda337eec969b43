use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtratoError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    #[error("This statement was already ingested for {0}")]
    DuplicateExtract(String),

    #[error("Unknown bank: {0}")]
    UnknownBank(String),

    #[error("Unknown person: {0}")]
    UnknownPerson(String),

    #[error("Unknown card: {0}")]
    UnknownCard(String),

    #[error("Unknown classification: {0}")]
    UnknownClassification(String),

    #[error("Rule not found: {0}")]
    RuleNotFound(String),

    #[error("Memory rule not found: {0}")]
    MemoryRuleNotFound(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("A principal person already exists: {0}")]
    PrincipalExists(String),

    #[error("Cannot delete a person with registered cards")]
    PersonHasCards,

    #[error("A card with this bank and final digits already exists")]
    DuplicateCard,

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Extraction timed out after {0} polling attempts; resubmit the document")]
    ExtractionTimeout(u32),

    #[error("Invalid password: the document could not be decrypted")]
    InvalidPassword,

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ExtratoError>;
