//! Multigroup radiation coupling parameters.
//!
//! Only the pieces the Riemann solvers and the flux assembler touch live
//! here: the group count, the frequency-space advection variant and the
//! Eddington-factor closure applied to the per-group flux limiters.

/// How the radiation group energies are advected in frequency space.
#[derive(Clone, Copy, PartialEq, Eq, Debug, num_enum::IntoPrimitive, num_enum::TryFromPrimitive)]
#[repr(i64)]
pub enum FspaceAdvection {
    /// Advection with the Eddington-factor correction applied per group.
    EddingtonCorrected = 1,
    /// Plain advection of the group energies.
    Plain = 2,
}

#[derive(Clone, Copy, Debug)]
pub struct RadConfig {
    pub ngroups: usize,
    pub fspace_advection: FspaceAdvection,
}

impl RadConfig {
    pub fn new(ngroups: usize, fspace_advection: FspaceAdvection) -> Self {
        Self { ngroups, fspace_advection }
    }
}

/// Eddington factor from the flux limiter.
///
/// Kinetic-theory interpolation between the diffusion limit
/// (`lam = 1/3`, `f = 1/3`) and free streaming (`lam -> 0`, `f -> 1`).
pub fn eddington_factor(lam: f64) -> f64 {
    1.0 - 2.0 * lam
}
