//! The approximate Riemann solver suite.
//!
//! Every solve is a pure function of one interface's left/right states and
//! an auxiliary record; nothing here prints, panics or touches shared
//! mutable state. Non-convergence in the iterative solver is reported
//! through [`CgStatus`] and escalated by the host-side sweep.

use std::fmt::Display;

use crate::config::{PpmTempFix, RiemannConfig, RiemannSolverKind};
use crate::eos::{EosMode, EosState, GammaLaw};
use crate::geometry::Direction;
use crate::layout::PrimLayout;

pub mod cg;
pub mod cgf;
pub mod flux;
pub mod hll;
pub mod hllc;

pub use cg::{riemanncg, wsqge, PstarHistory};
pub use cgf::riemannus;
pub use flux::compute_flux_q;
pub use hll::hll;
pub use hllc::{hllc, hllc_with_state};

/// Numerical constants shared by the solvers.
pub(crate) mod tol {
    /// Generic relative floor for wave-speed spreads.
    pub const SMALL: f64 = 1.0e-8;
    /// Velocities below this fraction of the input speeds are snapped to
    /// zero so a mirrored problem yields an exactly stationary contact.
    pub const SMALLU: f64 = 1.0e-12;
    /// Relative pressure jump below which a wave is treated as acoustic.
    pub const SMLP1: f64 = 1.0e-10;
    /// Threshold for a weak wave in the CG secant update.
    pub const WEAKWV: f64 = 1.0e-3;
    /// Relative spread below which the HLL bounds are degenerate.
    pub const HLL_SPREAD: f64 = 1.0e-10;
    /// Bisection runs this many times the secant iteration budget.
    pub const PSTAR_BISECT_FACTOR: usize = 5;
}

/// Radiation extension of an interface state.
#[derive(Clone, Debug, Default)]
pub struct RadRiemannState {
    /// Gas-only pressure.
    pub p_g: f64,
    /// Gas-only internal energy density.
    pub rhoe_g: f64,
    /// Gas-only sound-speed gamma.
    pub gamcg: f64,
    /// Per-group flux limiters.
    pub lam: Vec<f64>,
    /// Per-group radiation energies.
    pub er: Vec<f64>,
}

/// Primitive state on one side of an interface, or the sampled Godunov
/// state a solver hands back. Velocities are stored in solve-local roles
/// (normal, two transverse); the flux assembler undoes the permutation.
#[derive(Clone, Debug, Default)]
pub struct RiemannState {
    pub rho: f64,
    pub un: f64,
    pub ut: f64,
    pub utt: f64,
    pub p: f64,
    /// Internal energy density (rho e).
    pub rhoe: f64,
    /// Sound-speed gamma.
    pub gamc: f64,
    pub rad: Option<RadRiemannState>,
}

impl RiemannState {
    pub fn new(rho: f64, un: f64, ut: f64, utt: f64, p: f64, rhoe: f64, gamc: f64) -> Self {
        Self { rho, un, ut, utt, p, rhoe, gamc, rad: None }
    }

    pub fn with_radiation(mut self, rad: RadRiemannState) -> Self {
        self.rad = Some(rad);
        self
    }
}

impl Display for RiemannState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "rho: {}\nun: {}\nut: {}\nutt: {}\np: {}\nrhoe: {}\ngamc: {}",
            self.rho, self.un, self.ut, self.utt, self.p, self.rhoe, self.gamc
        )
    }
}

/// Derived per-interface scalars, computed once before solver dispatch and
/// read-only to the solvers.
#[derive(Clone, Copy, Debug)]
pub struct RiemannAux {
    /// Floor sound speed.
    pub csmall: f64,
    /// Average sound speed of the two zones.
    pub cavg: f64,
    /// 0 on a hard wall or symmetry plane, 1 elsewhere; multiplies the
    /// interface normal velocity so wall fluxes are exactly zero.
    pub bnd_fac: f64,
}

impl RiemannAux {
    pub fn new(cl: f64, cr: f64, bnd_fac: f64) -> Self {
        Self {
            csmall: tol::SMALL.max(tol::SMALL * cl.max(cr)),
            cavg: 0.5 * (cl + cr),
            bnd_fac,
        }
    }
}

impl Display for RiemannAux {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "csmall: {}\ncavg: {}\nbnd_fac: {}",
            self.csmall, self.cavg, self.bnd_fac
        )
    }
}

/// Outcome of one iterative solve. Pure kernels return this instead of
/// printing or aborting; the host aggregates after the sweep.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CgStatus {
    Converged,
    /// The secant iteration did not converge but a fallback produced a
    /// usable star pressure.
    FellBack,
    /// No usable star pressure; fatal once control returns to the host.
    Failed,
}

/// Build the left/right solver inputs from two zone primitive states,
/// permuting velocities into normal/transverse roles and applying the
/// density and pressure floors.
#[allow(clippy::too_many_arguments)]
pub fn load_input_states(
    ql: &[f64],
    qr: &[f64],
    gamcl: f64,
    gamcr: f64,
    cl: f64,
    cr: f64,
    bnd_fac: f64,
    dir: Direction,
    prim: &PrimLayout,
    cfg: &RiemannConfig,
) -> (RiemannState, RiemannState, RiemannAux) {
    let ax = dir.axes();
    let left = RiemannState::new(
        ql[prim.qrho].max(cfg.small_dens),
        ql[prim.vel(ax.normal)],
        ql[prim.vel(ax.t1)],
        ql[prim.vel(ax.t2)],
        ql[prim.qpres].max(cfg.small_pres),
        ql[prim.qreint],
        gamcl,
    );
    let right = RiemannState::new(
        qr[prim.qrho].max(cfg.small_dens),
        qr[prim.vel(ax.normal)],
        qr[prim.vel(ax.t1)],
        qr[prim.vel(ax.t2)],
        qr[prim.qpres].max(cfg.small_pres),
        qr[prim.qreint],
        gamcr,
    );
    (left, right, RiemannAux::new(cl, cr, bnd_fac))
}

/// Re-derive interface pressure and internal energy from density, specific
/// energy and composition so the reconstructed edge state is
/// thermodynamically consistent. Active for `ppm_temp_fix == Interfaces`.
pub fn apply_temp_fix(cfg: &RiemannConfig, eos: &GammaLaw, prim: &PrimLayout, q: &mut [f64]) {
    if cfg.ppm_temp_fix != PpmTempFix::Interfaces {
        return;
    }
    let mut state = EosState {
        rho: q[prim.qrho],
        e: q[prim.qreint] / q[prim.qrho],
        // initial guess only; interfaces carry no trustworthy temperature
        t: q[prim.qtemp].max(1.0),
        xn: q[prim.qfs..prim.qfs + prim.n_species].to_vec(),
        ..Default::default()
    };
    eos.eos(EosMode::RhoE, &mut state);
    q[prim.qreint] = state.e * state.rho;
    q[prim.qpres] = state.p;
}

/// Solve for the Godunov state on an interface with the configured
/// state-producing solver.
///
/// The HLLC path computes its flux directly; the state it shares with the
/// rest of the code (pressure-work terms, diagnostics) is the CGF
/// estimate, so that is what an `Hllc` configuration returns here.
pub fn riemann_state(
    cfg: &RiemannConfig,
    ql: &RiemannState,
    qr: &RiemannState,
    raux: &RiemannAux,
    history: Option<&mut PstarHistory>,
) -> (RiemannState, CgStatus) {
    match cfg.solver {
        RiemannSolverKind::Cgf | RiemannSolverKind::Hllc => {
            (cgf::riemannus(ql, qr, raux, cfg), CgStatus::Converged)
        }
        RiemannSolverKind::Cg => cg::riemanncg(ql, qr, raux, cfg, history),
    }
}
