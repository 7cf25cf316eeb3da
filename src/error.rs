//! Error types for the buck converter simulator.
//!
//! This module provides a unified error type [`ConverterError`] that covers
//! all error conditions that can occur during parameter-file parsing,
//! parameter validation, steady-state analysis and report output.
//!
//! The simulation loop itself never fails: every model is a total function
//! over finite inputs, so errors are raised before the loop starts or after
//! it has finished.

use thiserror::Error;

/// Result type alias using [`ConverterError`].
pub type Result<T> = std::result::Result<T, ConverterError>;

/// Unified error type for all simulator operations.
#[derive(Error, Debug)]
pub enum ConverterError {
    // ============ Parameter File Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Parameter name not recognised
    #[error("Unknown parameter '{name}' at line {line}")]
    UnknownParameter { name: String, line: usize },

    /// Parameter assigned more than once
    #[error("Parameter '{name}' assigned twice (line {line})")]
    DuplicateParameter { name: String, line: usize },

    // ============ Parameter Set Errors ============
    /// Parameter value violates the parameter set invariants
    #[error("Invalid parameter '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    // ============ Simulation Errors ============
    /// Invalid analysis or sweep setting
    #[error("Invalid simulation parameter: {message}")]
    InvalidSimulationParam { message: String },

    /// Trajectory contains non-finite values, results are unusable
    #[error("Simulation diverged: non-finite {quantity} at sample {index} (t = {time:.3e} s)")]
    DivergentSimulation {
        quantity: String,
        index: usize,
        time: f64,
    },

    // ============ I/O Errors ============
    /// Error reading parameter file
    #[error("Failed to read parameter file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing a report or trajectory
    #[error("Output error: {source}")]
    OutputError {
        #[from]
        source: std::io::Error,
    },

    /// Error serializing a JSON report
    #[error("JSON serialization error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },
}

impl ConverterError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create an invalid simulation parameter error
    pub fn invalid_simulation_param(message: impl Into<String>) -> Self {
        Self::InvalidSimulationParam {
            message: message.into(),
        }
    }
}
