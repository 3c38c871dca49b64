//! Interface flux assembly from a sampled Godunov state.

use glam::DVec3;

use crate::config::Capabilities;
use crate::geometry::{mom_flux_has_p, Coord, Direction};
use crate::hybrid::{add_hybrid_momentum_flux, HybridGeom};
use crate::layout::{GdLayout, PrimLayout, VarLayout};
use crate::radiation::{eddington_factor, FspaceAdvection};

use super::RiemannState;

/// Assemble the conserved-variable flux in direction `dir` from the
/// interface state, and store the interface state itself (full primitive
/// or reduced Godunov subset, per `store_full_state`).
///
/// Under radiation the gas-only pressure and energy drive the hydro flux;
/// the group energy fluxes land in `rad_flux`. Passive scalars are handled
/// separately by the caller.
#[allow(clippy::too_many_arguments)]
pub fn compute_flux_q(
    qint: &RiemannState,
    dir: Direction,
    coord: Coord,
    caps: &Capabilities,
    vars: &VarLayout,
    prim: &PrimLayout,
    gd: &GdLayout,
    hybrid: Option<(&HybridGeom, DVec3)>,
    flux: &mut [f64],
    rad_flux: Option<&mut [f64]>,
    qgdnv: &mut [f64],
    store_full_state: bool,
) {
    let ax = dir.axes();
    let im1 = vars.mom(ax.normal);
    let im2 = vars.mom(ax.t1);
    let im3 = vars.mom(ax.t2);

    // fluxes ordered as the conserved state, not the primitive one
    flux[vars.urho] = qint.rho * qint.un;

    flux[im1] = flux[vars.urho] * qint.un;
    flux[im2] = flux[vars.urho] * qint.ut;
    flux[im3] = flux[vars.urho] * qint.utt;

    // under radiation only the gas pressure and energy enter the hydro flux
    let (p_flux, rhoe_flux) = match &qint.rad {
        Some(rad) => (rad.p_g, rad.rhoe_g),
        None => (qint.p, qint.rhoe),
    };

    if mom_flux_has_p(dir, dir, coord) {
        flux[im1] += p_flux;
    }

    let rhoetot = rhoe_flux
        + 0.5 * qint.rho * (qint.un * qint.un + qint.ut * qint.ut + qint.utt * qint.utt);

    flux[vars.ueden] = qint.un * (rhoetot + p_flux);
    flux[vars.ueint] = qint.un * rhoe_flux;

    flux[vars.utemp] = 0.0;
    if let Some(ushk) = vars.ushk {
        flux[ushk] = 0.0;
    }
    if let (Some(umup), Some(umun)) = (vars.umup, vars.umun) {
        flux[umup] = 0.0;
        flux[umun] = 0.0;
    }

    if let (Some(rad_cfg), Some(rad), Some(rf)) = (&caps.radiation, &qint.rad, rad_flux) {
        match rad_cfg.fspace_advection {
            FspaceAdvection::EddingtonCorrected => {
                for g in 0..rad_cfg.ngroups {
                    let eddf = eddington_factor(rad.lam[g]);
                    let f1 = 0.5 * (1.0 - eddf);
                    rf[g] = (1.0 + f1) * rad.er[g] * qint.un;
                }
            }
            FspaceAdvection::Plain => {
                for g in 0..rad_cfg.ngroups {
                    rf[g] = rad.er[g] * qint.un;
                }
            }
        }
    }

    if let Some((geom, pos)) = hybrid {
        let mut gd_zone = store_reduced(qint, dir, gd);
        // the momentum correction acts on the total pressure, gas plus
        // radiation; the reduced store keeps the gas part
        gd_zone[gd.gdpres] = qint.p;
        add_hybrid_momentum_flux(&gd_zone, gd, pos, geom, dir, vars, flux);
    }

    store_state(qint, dir, prim, gd, qgdnv, store_full_state);
}

/// Store the interface state into `qgdnv` (full primitive layout or the
/// reduced Godunov subset), undoing the direction permutation.
pub fn store_state(
    qint: &RiemannState,
    dir: Direction,
    prim: &PrimLayout,
    gd: &GdLayout,
    qgdnv: &mut [f64],
    store_full_state: bool,
) {
    if store_full_state {
        let ax = dir.axes();
        qgdnv[prim.qrho] = qint.rho;
        qgdnv[prim.vel(ax.normal)] = qint.un;
        qgdnv[prim.vel(ax.t1)] = qint.ut;
        qgdnv[prim.vel(ax.t2)] = qint.utt;
        qgdnv[prim.qtemp] = 0.0;
        match &qint.rad {
            Some(rad) => {
                qgdnv[prim.qpres] = rad.p_g;
                qgdnv[prim.qreint] = rad.rhoe_g;
            }
            None => {
                qgdnv[prim.qpres] = qint.p;
                qgdnv[prim.qreint] = qint.rhoe;
            }
        }
    } else {
        let gd_zone = store_reduced(qint, dir, gd);
        qgdnv[..gd.n].copy_from_slice(&gd_zone);
    }
}

/// Pack the interface state into the reduced Godunov layout, undoing the
/// direction permutation of the velocities.
fn store_reduced(qint: &RiemannState, dir: Direction, gd: &GdLayout) -> Vec<f64> {
    let ax = dir.axes();
    let mut zone = vec![0.0; gd.n];
    if let Some(gdrho) = gd.gdrho {
        zone[gdrho] = qint.rho;
    }
    zone[gd.vel(ax.normal)] = qint.un;
    zone[gd.vel(ax.t1)] = qint.ut;
    zone[gd.vel(ax.t2)] = qint.utt;
    match &qint.rad {
        Some(rad) => {
            zone[gd.gdpres] = rad.p_g;
            if let (Some(gdlams), Some(gderads)) = (gd.gdlams, gd.gderads) {
                for g in 0..rad.lam.len() {
                    zone[gdlams + g] = rad.lam[g];
                    zone[gderads + g] = rad.er[g];
                }
            }
        }
        None => {
            zone[gd.gdpres] = qint.p;
        }
    }
    zone
}
