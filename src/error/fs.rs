//! File system errors

use super::SkillpackError;

/// Creates a file read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> SkillpackError {
    SkillpackError::FileReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a file write failed error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> SkillpackError {
    SkillpackError::FileWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
