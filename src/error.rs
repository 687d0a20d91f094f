//! Errors raised while reading and validating a level.

use thiserror::Error;

use crate::location::Location;

/// Malformed input; fatal to the request before any model is built.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The record is not valid JSON or lacks a required field.
    #[error("malformed level record: {0}")]
    Json(#[from] serde_json::Error),

    /// No rows, or rows with no cells.
    #[error("level map is empty")]
    Empty,

    /// A row differs in width from the first.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based row number.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of this row.
        found: usize,
    },

    /// A glyph outside the map alphabet.
    #[error("unrecognized tile {glyph:?} at {location}")]
    UnrecognizedTile {
        /// The offending character.
        glyph: char,
        /// Where it appears.
        location: Location,
    },
}

/// A level that parses but cannot be modelled.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// A builder was asked to place something off the board.
    #[error("feature at {location} lies outside the level")]
    FeatureOutOfBounds {
        /// The requested location.
        location: Location,
    },

    /// No `H` on the map.
    #[error("level has no start cell")]
    MissingStart,

    /// More than one `H` on the map.
    #[error("level has {count} start cells, expected exactly one")]
    MultipleStarts {
        /// How many were found.
        count: usize,
    },

    /// The budget is below zero.
    #[error("wall budget must be non-negative, got {0}")]
    NegativeBudget(i64),
}

/// Any failure of the parsing and configuration entry points.
#[derive(Debug, Error)]
pub enum EnclosureError {
    /// See [`ParseError`].
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// See [`ModelError`].
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A setting could not be read.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result of the crate's parsing entry points.
pub type Result<T> = std::result::Result<T, EnclosureError>;
