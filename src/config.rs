//! Process-wide solver configuration, immutable during a solve.

use yaml_rust::Yaml;

use crate::errors::ConfigError;
use crate::radiation::{FspaceAdvection, RadConfig};

/// Which approximate Riemann solver computes the interface state/flux.
#[derive(Clone, Copy, PartialEq, Eq, Debug, num_enum::IntoPrimitive, num_enum::TryFromPrimitive)]
#[repr(i64)]
pub enum RiemannSolverKind {
    /// Colella-Glaz-Ferguson: single-pass two-shock estimate.
    Cgf = 0,
    /// Colella-Glaz: iterative two-shock solve.
    Cg = 1,
    /// HLLC: three-wave direct-flux solver.
    Hllc = 2,
}

/// Policy when the CG secant iteration fails to converge.
#[derive(Clone, Copy, PartialEq, Eq, Debug, num_enum::IntoPrimitive, num_enum::TryFromPrimitive)]
#[repr(i64)]
pub enum CgBlend {
    /// Fatal on the host, with a full diagnostic dump.
    Abort = 0,
    /// Fall back to the initial two-shock estimate.
    TwoShock = 1,
    /// Bisection refinement over the last secant iterates.
    Bisection = 2,
}

/// Optional thermodynamic-consistency recompute of the interface states.
#[derive(Clone, Copy, PartialEq, Eq, Debug, num_enum::IntoPrimitive, num_enum::TryFromPrimitive)]
#[repr(i64)]
pub enum PpmTempFix {
    Off = 0,
    Edges = 1,
    /// Re-derive interface pressure and energy from rho/e/X via the EOS.
    Interfaces = 2,
}

/// Physics capabilities resolved once at startup. These replace
/// compile-time variants: each solver queries the flags it cares about.
#[derive(Clone, Copy, Debug, Default)]
pub struct Capabilities {
    pub radiation: Option<RadConfig>,
    pub hybrid_momentum: bool,
    pub shock_var: bool,
    pub nse_net: bool,
}

impl Capabilities {
    pub fn from_yaml(config: &Yaml) -> Result<Self, ConfigError<'static>> {
        let radiation = match config["physics"]["radiation_groups"].as_i64() {
            Some(n) if n > 0 => {
                let advect = config["physics"]["fspace_advection_type"].as_i64().unwrap_or(1);
                let advect = FspaceAdvection::try_from(advect)
                    .map_err(|_| ConfigError::InvalidParameter(format!(
                        "fspace_advection_type must be 1 or 2, got {}", advect
                    )))?;
                Some(RadConfig::new(n as usize, advect))
            }
            _ => None,
        };
        Ok(Self {
            radiation,
            hybrid_momentum: config["physics"]["hybrid_momentum"].as_bool().unwrap_or(false),
            shock_var: config["physics"]["shock_var"].as_bool().unwrap_or(false),
            nse_net: config["physics"]["nse_net"].as_bool().unwrap_or(false),
        })
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RiemannConfig {
    pub solver: RiemannSolverKind,
    pub cg_maxiter: usize,
    pub cg_tol: f64,
    pub cg_blend: CgBlend,
    pub small_dens: f64,
    pub small_pres: f64,
    pub ppm_temp_fix: PpmTempFix,
    pub store_full_state: bool,
}

impl Default for RiemannConfig {
    fn default() -> Self {
        Self {
            solver: RiemannSolverKind::Cgf,
            cg_maxiter: 12,
            cg_tol: 1.0e-5,
            cg_blend: CgBlend::TwoShock,
            small_dens: 1.0e-100,
            small_pres: 1.0e-100,
            ppm_temp_fix: PpmTempFix::Off,
            store_full_state: false,
        }
    }
}

impl RiemannConfig {
    pub fn from_yaml(config: &Yaml) -> Result<Self, ConfigError<'static>> {
        let defaults = Self::default();

        let solver = config["riemann"]["solver"].as_i64().unwrap_or(0);
        let solver = RiemannSolverKind::try_from(solver)
            .map_err(|_| ConfigError::UnknownRiemannSolver(solver))?;

        let cg_blend = config["riemann"]["cg_blend"].as_i64().unwrap_or(1);
        let cg_blend =
            CgBlend::try_from(cg_blend).map_err(|_| ConfigError::UnknownCgBlend(cg_blend))?;

        let ppm_temp_fix = config["riemann"]["ppm_temp_fix"].as_i64().unwrap_or(0);
        let ppm_temp_fix = PpmTempFix::try_from(ppm_temp_fix).map_err(|_| {
            ConfigError::InvalidParameter(format!(
                "ppm_temp_fix must be 0, 1 or 2, got {}", ppm_temp_fix
            ))
        })?;

        let cg_maxiter = config["riemann"]["cg_maxiter"].as_i64().unwrap_or(12);
        if cg_maxiter < 2 {
            return Err(ConfigError::InvalidParameter(format!(
                "cg_maxiter must be at least 2, got {}", cg_maxiter
            )));
        }

        let cfg = Self {
            solver,
            cg_maxiter: cg_maxiter as usize,
            cg_tol: config["riemann"]["cg_tol"].as_f64().unwrap_or(defaults.cg_tol),
            cg_blend,
            small_dens: config["riemann"]["small_dens"].as_f64().unwrap_or(defaults.small_dens),
            small_pres: config["riemann"]["small_pres"].as_f64().unwrap_or(defaults.small_pres),
            ppm_temp_fix,
            store_full_state: config["riemann"]["store_full_state"].as_bool().unwrap_or(false),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError<'static>> {
        if self.small_dens <= 0.0 || self.small_pres <= 0.0 {
            return Err(ConfigError::InvalidParameter(
                "small_dens and small_pres must be positive".to_string(),
            ));
        }
        if self.cg_tol <= 0.0 {
            return Err(ConfigError::InvalidParameter(
                "cg_tol must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// The CG solver has no radiation variant; reject the combination up
    /// front rather than inside a kernel.
    pub fn check_capabilities(&self, caps: &Capabilities) -> Result<(), ConfigError<'static>> {
        if self.solver == RiemannSolverKind::Cg && caps.radiation.is_some() {
            return Err(ConfigError::InvalidParameter(
                "the CG solver does not support radiation".to_string(),
            ));
        }
        Ok(())
    }
}
