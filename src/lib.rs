#![warn(missing_docs)]

//! # `enclosure`
//!
//! A solver for the "enclose the horse" puzzle: place a limited number of walls on a grid so that the region
//! reachable from the horse is sealed off from the edge of the map, scoring as much as possible.
//! Begin by building a level with a [`LevelBuilder`](builder::LevelBuilder), by parsing a text map with [`str::parse`],
//! or by reading a published [`LevelRecord`](record::LevelRecord).
//! Then call [`solve()`](crate::Level::solve) with a [`SolverBackend`](solver::SolverBackend) such as [`MilpSolver`],
//! yielding an [`Enclosure`] that can be printed next to the level with [`SolvedLevel`](solution::SolvedLevel).
//!
//! # Maps
//! Maps are rows of glyphs separated by newlines:
//! `.` is grass, `~` is water, `H` is the horse, `C`, `G` and `S` are a cherry (+3), a golden apple (+10) and a skull (-5).
//! Any other letter or digit is a portal; every portal sharing a label is linked to every other.
//!
//! # Internals
//! The level is expressed as a directed graph G over its cells ([`Topology`](graph::Topology)): edges join orthogonal
//! neighbors and every pair of portals sharing a label. That graph is turned into a mixed-integer program
//! ([`EnclosureModel`](model::EnclosureModel)) which any backend can maximize:
//!
//! 1. Every cell is walled or not, and enclosed or not. Walls are limited by the budget, never placed on water,
//! fruit, portals or the horse, and never enclosed themselves.
//! 2. An enclosed cell may only be adjacent to enclosed cells, walls or water. Border cells are never enclosed.
//! 3. The horse sends one unit of flow to every other enclosed cell along edges between enclosed cells,
//! so the enclosed region is connected to the horse.
//!
//! The score is the number of enclosed cells plus the values of the fruit among them.

pub use builder::LevelBuilder;
pub use config::SolveOptions;
pub use error::{EnclosureError, ModelError, ParseError};
pub use level::Level;
pub use location::Location;
pub use record::LevelRecord;
pub use solution::{Enclosure, SolvedLevel, Violation};
pub use solver::{MilpSolver, SolveOutcome, SolveStatus, SolverBackend};

pub mod builder;
pub mod cell;
pub mod config;
pub mod error;
pub mod graph;
pub(crate) mod level;
pub mod location;
pub mod model;
pub mod program;
pub mod record;
pub mod shape;
pub mod solution;
pub mod solver;
