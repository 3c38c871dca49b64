//! The HLL (Einfeldt) solver.

use crate::geometry::{mom_flux_has_p, Coord, Direction};
use crate::layout::{PrimLayout, VarLayout};

use super::tol;

/// HLLE flux from two zone-average primitive states.
///
/// Apply to zone averages (not reconstructed states) at an interface in the
/// presence of shocks to avoid odd-even decoupling and the carbuncle
/// phenomenon. See Einfeldt et al. 1991, JCP 92, 273.
///
/// When the signal-speed spread is degenerate the passed-in flux is left
/// untouched.
#[allow(clippy::too_many_arguments)]
pub fn hll(
    ql: &[f64],
    qr: &[f64],
    cl: f64,
    cr: f64,
    dir: Direction,
    coord: Coord,
    prim: &PrimLayout,
    vars: &VarLayout,
    flux_hll: &mut [f64],
) {
    let ax = dir.axes();
    let ivel = prim.vel(ax.normal);
    let ivelt = prim.vel(ax.t1);
    let iveltt = prim.vel(ax.t2);

    let imom = vars.mom(ax.normal);
    let imomt = vars.mom(ax.t1);
    let imomtt = vars.mom(ax.t2);

    let rhol_sqrt = ql[prim.qrho].sqrt();
    let rhor_sqrt = qr[prim.qrho].sqrt();

    let rhod = 1.0 / (rhol_sqrt + rhor_sqrt);

    // Roe-averaged sound speed, Einfeldt 1988 Eq. 5.6/5.7; assumes gamma
    // between 1 and 5/3
    let du = qr[ivel] - ql[ivel];
    let cavg = ((rhol_sqrt * cl * cl + rhor_sqrt * cr * cr) * rhod
        + 0.5 * rhol_sqrt * rhor_sqrt * rhod * rhod * du * du)
        .sqrt();

    // Roe eigenvalues, Einfeldt 1991 Eq. 5.3b
    let uavg = (rhol_sqrt * ql[ivel] + rhor_sqrt * qr[ivel]) * rhod;

    let a1 = uavg - cavg;
    let a4 = uavg + cavg;

    // signal speeds, Einfeldt 1991 Eq. 4.5
    let bl = a1.min(ql[ivel] - cl);
    let br = a4.max(qr[ivel] + cr);

    let bm = bl.min(0.0);
    let bp = br.max(0.0);

    let bd = bp - bm;

    if bd == 0.0 || bd.abs() < tol::HLL_SPREAD * bm.abs().max(bp.abs()) {
        return;
    }

    let bd = 1.0 / bd;

    // fluxes per Einfeldt 1991 Eq. 4.4b; the min/max above already picks
    // the pure left or right flux outside the star region
    let hll_flux =
        |fl: f64, fr: f64, sl: f64, sr: f64| (bp * fl - bm * fr) * bd + bp * bm * bd * (sr - sl);

    flux_hll[vars.urho] = hll_flux(
        ql[prim.qrho] * ql[ivel],
        qr[prim.qrho] * qr[ivel],
        ql[prim.qrho],
        qr[prim.qrho],
    );

    // for the radial direction of non-Cartesian geometries the pressure is
    // handled as a geometric source in the update, not in the flux
    let mut fl_tmp = ql[prim.qrho] * ql[ivel] * ql[ivel];
    let mut fr_tmp = qr[prim.qrho] * qr[ivel] * qr[ivel];
    if mom_flux_has_p(dir, dir, coord) {
        fl_tmp += ql[prim.qpres];
        fr_tmp += qr[prim.qpres];
    }
    flux_hll[imom] = hll_flux(
        fl_tmp,
        fr_tmp,
        ql[prim.qrho] * ql[ivel],
        qr[prim.qrho] * qr[ivel],
    );

    flux_hll[imomt] = hll_flux(
        ql[prim.qrho] * ql[ivel] * ql[ivelt],
        qr[prim.qrho] * qr[ivel] * qr[ivelt],
        ql[prim.qrho] * ql[ivelt],
        qr[prim.qrho] * qr[ivelt],
    );

    flux_hll[imomtt] = hll_flux(
        ql[prim.qrho] * ql[ivel] * ql[iveltt],
        qr[prim.qrho] * qr[ivel] * qr[iveltt],
        ql[prim.qrho] * ql[iveltt],
        qr[prim.qrho] * qr[iveltt],
    );

    let rho_el = ql[prim.qreint]
        + 0.5
            * ql[prim.qrho]
            * (ql[ivel] * ql[ivel] + ql[ivelt] * ql[ivelt] + ql[iveltt] * ql[iveltt]);
    let rho_er = qr[prim.qreint]
        + 0.5
            * qr[prim.qrho]
            * (qr[ivel] * qr[ivel] + qr[ivelt] * qr[ivelt] + qr[iveltt] * qr[iveltt]);

    flux_hll[vars.ueden] = hll_flux(
        ql[ivel] * (rho_el + ql[prim.qpres]),
        qr[ivel] * (rho_er + qr[prim.qpres]),
        rho_el,
        rho_er,
    );

    flux_hll[vars.ueint] = hll_flux(
        ql[prim.qreint] * ql[ivel],
        qr[prim.qreint] * qr[ivel],
        ql[prim.qreint],
        qr[prim.qreint],
    );

    for (n, nqs) in prim.passive_map(vars) {
        flux_hll[n] = hll_flux(
            ql[prim.qrho] * ql[nqs] * ql[ivel],
            qr[prim.qrho] * qr[nqs] * qr[ivel],
            ql[prim.qrho] * ql[nqs],
            qr[prim.qrho] * qr[nqs],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Capabilities;
    use crate::eos::GammaLaw;
    use float_cmp::assert_approx_eq;

    const GAMMA: f64 = 1.4;

    fn layouts() -> (PrimLayout, VarLayout) {
        let caps = Capabilities::default();
        (PrimLayout::new(1), VarLayout::new(&caps, 1))
    }

    fn zone(prim: &PrimLayout, rho: f64, u: f64, p: f64) -> Vec<f64> {
        let eos = GammaLaw::new(GAMMA);
        let mut q = vec![0.0; prim.n];
        q[prim.qrho] = rho;
        q[prim.vel(0)] = u;
        q[prim.qpres] = p;
        q[prim.qreint] = eos.rhoe_from_pressure(p);
        q[prim.qfs] = 1.0;
        q
    }

    #[test]
    fn test_supersonic_flow_gives_upwind_flux() {
        let (prim, vars) = layouts();
        let eos = GammaLaw::new(GAMMA);
        let q = zone(&prim, 1.0, 3.0, 1.0);
        let c = eos.sound_speed(1.0, 1.0);
        let mut f = vec![0.0; vars.n];
        hll(&q, &q, c, c, Direction::X, Coord::Cartesian, &prim, &vars, &mut f);
        // u > c on both sides: the HLL flux degenerates to the left flux
        assert_approx_eq!(f64, f[vars.urho], 3.0, ulps = 8);
        assert_approx_eq!(f64, f[vars.mom(0)], 1.0 * 3.0 * 3.0 + 1.0, ulps = 8);
        let rho_e = eos.rhoe_from_pressure(1.0) + 0.5 * 9.0;
        assert_approx_eq!(f64, f[vars.ueden], 3.0 * (rho_e + 1.0), ulps = 8);
        assert_approx_eq!(f64, f[vars.ufs], 3.0, ulps = 8);
    }

    #[test]
    fn test_mirrored_input_gives_zero_mass_flux() {
        let (prim, vars) = layouts();
        let eos = GammaLaw::new(GAMMA);
        let ql = zone(&prim, 1.0, 0.5, 1.0);
        let qr = zone(&prim, 1.0, -0.5, 1.0);
        let c = eos.sound_speed(1.0, 1.0);
        let mut f = vec![0.0; vars.n];
        hll(&ql, &qr, c, c, Direction::X, Coord::Cartesian, &prim, &vars, &mut f);
        assert_approx_eq!(f64, f[vars.urho], 0.0);
        assert_approx_eq!(f64, f[vars.ueden], 0.0);
        assert_approx_eq!(f64, f[vars.ufs], 0.0);
    }

    #[test]
    fn test_degenerate_spread_leaves_flux_untouched() {
        let (prim, vars) = layouts();
        // both zones at rest with no pressure: the signal speeds collapse
        // to bm == bp == 0 and the spread inverse would be 1/0
        let ql = zone(&prim, 1.0, 0.0, 0.0);
        let qr = ql.clone();
        let mut f = vec![42.0; vars.n];
        hll(&ql, &qr, 0.0, 0.0, Direction::X, Coord::Cartesian, &prim, &vars, &mut f);
        assert!(f.iter().all(|&x| x == 42.0));

        // pressureless advection has a nonzero spread; the guard must not
        // swallow it
        let q = zone(&prim, 1.0, 2.0, 0.0);
        let mut f = vec![7.0; vars.n];
        hll(&q, &q, 0.0, 0.0, Direction::X, Coord::Cartesian, &prim, &vars, &mut f);
        assert_approx_eq!(f64, f[vars.urho], 2.0, ulps = 8);
    }

    #[test]
    fn test_radial_momentum_flux_drops_pressure() {
        let (prim, vars) = layouts();
        let eos = GammaLaw::new(GAMMA);
        let q = zone(&prim, 1.0, 3.0, 1.0);
        let c = eos.sound_speed(1.0, 1.0);
        let mut f_cart = vec![0.0; vars.n];
        let mut f_sph = vec![0.0; vars.n];
        hll(&q, &q, c, c, Direction::X, Coord::Cartesian, &prim, &vars, &mut f_cart);
        hll(&q, &q, c, c, Direction::X, Coord::Spherical, &prim, &vars, &mut f_sph);
        assert_approx_eq!(f64, f_cart[vars.mom(0)] - f_sph[vars.mom(0)], 1.0, ulps = 8);
    }

    #[test]
    fn test_direction_permutes_momentum_slots() {
        let (prim, vars) = layouts();
        let eos = GammaLaw::new(GAMMA);
        let mut q = zone(&prim, 1.0, 0.0, 1.0);
        q[prim.vel(1)] = 3.0; // supersonic along y
        let c = eos.sound_speed(1.0, 1.0);
        let mut f = vec![0.0; vars.n];
        hll(&q, &q, c, c, Direction::Y, Coord::Cartesian, &prim, &vars, &mut f);
        assert_approx_eq!(f64, f[vars.urho], 3.0, ulps = 8);
        assert_approx_eq!(f64, f[vars.mom(1)], 9.0 + 1.0, ulps = 8);
        assert_approx_eq!(f64, f[vars.mom(0)], 0.0);
    }
}
