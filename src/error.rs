// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// Coarse classification of [`CaimError`] values.
///
/// Callers that surface errors to a user (dialogs, logs) usually only need to know
/// whether the data was bad or a parameter was out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing, empty, non-finite or misaligned data.
    InvalidInput,
    /// A parameter (window size, history length, threshold, symbol) is out of range.
    Range,
    /// Invalid analysis configuration.
    Config,
    /// Persisted analysis data could not be encoded or decoded.
    Serialization,
}

/// Unified error type for binning, estimation and session operations.
#[derive(Error, Debug)]
pub enum CaimError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("series have different lengths ({left} != {right})")]
    LengthMismatch { left: usize, right: usize },
    #[error("{name} series is not binary: value {value} at position {index}")]
    NotBinary {
        name: &'static str,
        index: usize,
        value: u8,
    },
    #[error("out of range: {0}")]
    Range(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("serde error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CaimError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) | Self::LengthMismatch { .. } => ErrorKind::InvalidInput,
            Self::NotBinary { .. } | Self::Range(_) => ErrorKind::Range,
            Self::Config(_) => ErrorKind::Config,
            Self::Serialization(_) => ErrorKind::Serialization,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub(crate) fn range(msg: impl Into<String>) -> Self {
        Self::Range(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, CaimError>;
