//! Error Types
//!
//! This module defines the error types used by the program cache.
//!
//! # Overview
//!
//! The main error type [`ProgramError`] covers the failure modes of program
//! acquisition:
//! - Shader compilation / link failures reported by the GPU backend
//! - Other backend failures (lost context, out of memory, ...)
//!
//! Everything else in the crate (parameter extraction, key derivation,
//! uniform provisioning) is total over well-formed inputs and does not fail.
//!
//! # Usage
//!
//! ```rust,ignore
//! use myth_programs::errors::{ProgramError, Result};
//!
//! fn compile() -> Result<()> {
//!     Err(ProgramError::Backend("context lost".into()))
//! }
//! ```

use thiserror::Error;

/// The main error type for program acquisition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgramError {
    // ========================================================================
    // Compilation Errors
    // ========================================================================
    /// The backend failed to compile or link a program variant.
    #[error("Failed to compile program '{shader}': {message}")]
    Compilation {
        /// Shader name of the material being compiled
        shader: String,
        /// Info log reported by the backend
        message: String,
    },

    // ========================================================================
    // Backend Errors
    // ========================================================================
    /// Any other failure reported by the GPU backend.
    #[error("Program backend error: {0}")]
    Backend(String),
}

/// Alias for `Result<T, ProgramError>`.
pub type Result<T> = std::result::Result<T, ProgramError>;
