use std::{error::Error, fmt::Display};

use crate::riemann::{RiemannAux, RiemannState};

#[derive(Debug)]
pub enum ConfigError<'a> {
    MissingParameter(&'a str),
    UnknownRiemannSolver(i64),
    UnknownCgBlend(i64),
    UnknownCoord(i64),
    InvalidParameter(String),
}

impl<'a> Display for ConfigError<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingParameter(name) => {
                write!(f, "Missing required parameter in configuration: {}", name)
            }
            ConfigError::UnknownRiemannSolver(value) => {
                write!(f, "Unknown riemann_solver value configured: {}", value)
            }
            ConfigError::UnknownCgBlend(value) => {
                write!(f, "Unknown cg_blend value configured: {}", value)
            }
            ConfigError::UnknownCoord(value) => {
                write!(f, "Unknown coordinate system configured: {}", value)
            }
            ConfigError::InvalidParameter(msg) => {
                write!(f, "Invalid parameter in configuration: {}", msg)
            }
        }
    }
}

impl<'a> Error for ConfigError<'a> {}

/// Diagnostic payload assembled on the host after a solve failed to converge.
#[derive(Debug, Clone)]
pub struct NonConvergence {
    pub interface: usize,
    pub left: RiemannState,
    pub right: RiemannState,
    pub aux: RiemannAux,
    pub pstar_history: Vec<f64>,
}

#[derive(Debug)]
pub enum RiemannError {
    NonConvergence(Box<NonConvergence>),
}

impl Display for RiemannError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiemannError::NonConvergence(info) => {
                writeln!(
                    f,
                    "non-convergence in the Riemann solver at interface {}",
                    info.interface
                )?;
                writeln!(f, "pstar history:")?;
                for (iter, pstar) in info.pstar_history.iter().enumerate() {
                    writeln!(f, "{} {}", iter, pstar)?;
                }
                writeln!(f, "left state:\n{}", info.left)?;
                writeln!(f, "right state:\n{}", info.right)?;
                write!(f, "aux information:\n{}", info.aux)
            }
        }
    }
}

impl Error for RiemannError {}
