//! Error taxonomy shared by the record stores and the journal service.
//!
//! Three kinds of failure reach callers: the store being unavailable, a record
//! not being found, and a business-rule rejection. [`Error::Conflict`] is an
//! internal signal from the compare-and-swap profile write and is normally
//! retried by [`crate::journal::Journal`] before it surfaces.

use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The backing store failed or could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The profile changed between read and write.
    #[error("profile was modified concurrently")]
    Conflict,

    #[error("daily chat limit of {limit} reached, upgrade to premium for unlimited chats")]
    ChatLimitReached { limit: u32 },

    #[error("capsule is not ready to unlock until {unlock_date}")]
    CapsuleLocked { unlock_date: NaiveDate },

    #[error("invalid input: {0}")]
    Invalid(String),
}

impl Error {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Business-rule rejections, as opposed to store failures.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::ChatLimitReached { .. } | Self::CapsuleLocked { .. } | Self::Invalid(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::Unavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_are_distinguishable() {
        assert!(Error::ChatLimitReached { limit: 10 }.is_rejection());
        assert!(Error::Invalid("x".into()).is_rejection());
        assert!(!Error::Unavailable("down".into()).is_rejection());
        assert!(!Error::Conflict.is_rejection());
        assert!(Error::not_found("memory", "42").is_not_found());
    }

    #[test]
    fn sqlite_errors_map_to_unavailable() {
        let err: Error = rusqlite::Error::InvalidQuery.into();
        assert!(matches!(err, Error::Unavailable(_)));
    }

    #[test]
    fn messages_name_the_record() {
        assert_eq!(
            Error::not_found("capsule", "7").to_string(),
            "capsule not found: 7"
        );
    }
}
