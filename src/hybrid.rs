//! Cylindrical momentum fluxes.
//!
//! Rotating-star problems track radial, angular and vertical momentum as
//! extra conserved quantities so angular momentum is conserved to machine
//! precision. The solvers know nothing about these slots; the correction is
//! applied to the assembled flux from the reduced Godunov state and the
//! interface position.

use glam::DVec3;

use crate::geometry::Direction;
use crate::layout::{GdLayout, VarLayout};

/// Geometry data for the hybrid-momentum frame.
#[derive(Clone, Copy, Debug)]
pub struct HybridGeom {
    /// Rotation axis origin. Interfaces must not sit on the axis itself.
    pub center: DVec3,
}

impl HybridGeom {
    pub fn new(center: DVec3) -> Self {
        Self { center }
    }
}

/// Decompose a linear momentum vector at `loc` (relative to the rotation
/// center) into (radial momentum, angular momentum, vertical momentum).
pub fn linear_to_hybrid(loc: DVec3, mom: DVec3) -> DVec3 {
    let r = loc.truncate().length();
    DVec3::new(
        (loc.x * mom.x + loc.y * mom.y) / r,
        loc.x * mom.y - loc.y * mom.x,
        mom.z,
    )
}

/// Fill the hybrid momentum slots of an interface flux from the reduced
/// Godunov state. A no-op when the layout carries no hybrid slots.
pub fn add_hybrid_momentum_flux(
    gd: &[f64],
    gd_layout: &GdLayout,
    pos: DVec3,
    geom: &HybridGeom,
    dir: Direction,
    vars: &VarLayout,
    flux: &mut [f64],
) {
    let (Some(umr), Some(uml), Some(ump)) = (vars.umr, vars.uml, vars.ump) else {
        return;
    };
    let Some(gdrho) = gd_layout.gdrho else {
        return;
    };

    let loc = pos - geom.center;
    let r_inv = 1.0 / loc.truncate().length();

    let rho = gd[gdrho];
    let vel = DVec3::new(
        gd[gd_layout.vel(0)],
        gd[gd_layout.vel(1)],
        gd[gd_layout.vel(2)],
    );
    let pres = gd[gd_layout.gdpres];

    let hybrid_mom = linear_to_hybrid(loc, rho * vel);

    // advective part, carried by the normal velocity
    let vel_n = gd[gd_layout.vel(dir as usize)];
    flux[umr] = hybrid_mom.x * vel_n;
    flux[uml] = hybrid_mom.y * vel_n;
    flux[ump] = hybrid_mom.z * vel_n;

    // pressure part, projected onto the cylindrical frame
    match dir {
        Direction::X => {
            flux[umr] += loc.x * r_inv * pres;
            flux[uml] -= loc.y * pres;
        }
        Direction::Y => {
            flux[umr] += loc.y * r_inv * pres;
            flux[uml] += loc.x * pres;
        }
        Direction::Z => {
            flux[ump] += pres;
        }
    }
}
