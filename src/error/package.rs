//! Packaging errors

use super::SkillpackError;

/// Creates a refused packaging error for a failing report
pub fn refused(errors: usize) -> SkillpackError {
    SkillpackError::PackagingRefused { errors }
}

/// Creates a packaging failed error
pub fn failed(reason: impl Into<String>) -> SkillpackError {
    SkillpackError::PackagingFailed {
        reason: reason.into(),
    }
}
