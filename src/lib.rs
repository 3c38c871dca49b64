//! Riemann solvers and interface flux assembly for compressible
//! astrophysical hydrodynamics.
//!
//! The library provides the approximate solvers (iterative Colella-Glaz,
//! the non-iterative Colella-Glaz-Ferguson two-shock solver, HLL and HLLC),
//! the direction-permuted flux assembler, and a parallel sweep driver with
//! host-side failure reporting.

pub use config::{Capabilities, CgBlend, PpmTempFix, RiemannConfig, RiemannSolverKind};
pub use errors::{ConfigError, RiemannError};
pub use geometry::{Coord, DirIndices, Direction};
pub use riemann::{CgStatus, RiemannAux, RiemannState};
pub use sweep::{FluxSweep, InterfaceInput, SweepOutcome, Tube1d};

pub mod config;
pub mod eos;
pub mod errors;
pub mod geometry;
pub mod hybrid;
pub mod layout;
pub mod radiation;
pub mod riemann;
pub mod sweep;
