//! Shortest-path tracing over projected surfaces.
//!
//! This crate finds minimum-cost routes between two cells of a bounded
//! rectangular domain using A\* search. The domain is accessed only through
//! the [`Projector`] capability, which supplies:
//!
//! - the domain bounds (`height`/`width`),
//! - an admissible, consistent distance heuristic, and
//! - per-cell neighbor enumeration with per-edge costs.
//!
//! [`MatrixProjector`] is the concrete projector over a dense grid with a
//! designated blocked value. [`Pathfinder`] is the engine: bound to one
//! projector and one source cell, it answers any number of target queries,
//! reusing its per-cell search state across them.
//!
//! ```
//! use gridtrace_core::{Matrix, MatrixIndex};
//! use gridtrace_paths::{MatrixProjector, Pathfinder};
//!
//! // '.' floor, '#' wall
//! let rows = ["..#", "...", "#.."];
//! let surface = Matrix::from_fn(3, 3, |ix| rows[ix.row].as_bytes()[ix.column] == b'#');
//! let projector = MatrixProjector::new(surface, true);
//!
//! let mut finder = Pathfinder::new(projector, MatrixIndex::new(0, 0)).unwrap();
//! let path = finder.trace(MatrixIndex::new(2, 2)).unwrap();
//! assert_eq!(path.len(), 5);
//! ```

mod error;
mod matrix_projector;
mod pathfinder;
mod projector;

pub use error::TraceError;
pub use matrix_projector::MatrixProjector;
pub use pathfinder::Pathfinder;
pub use projector::{Cost, CostPair, Projector};
