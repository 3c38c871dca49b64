//! The HLLC solver, after Toro.

use crate::config::RiemannConfig;
use crate::geometry::{mom_flux_has_p, Coord, Direction};
use crate::layout::{GdLayout, PrimLayout, VarLayout};

use super::flux::store_state;
use super::{load_input_states, riemannus, tol, RiemannAux, RiemannState};

/// The four regions of the HLLC wave fan.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Region {
    Left,
    LeftStar,
    RightStar,
    Right,
}

/// Pick the region the interface sits in from the three wave speeds.
pub fn classify(s_l: f64, s_r: f64, s_c: f64) -> Region {
    if s_r <= 0.0 {
        Region::Right
    } else if s_c <= 0.0 {
        Region::RightStar
    } else if s_l < 0.0 {
        Region::LeftStar
    } else {
        Region::Left
    }
}

/// Conserved state of one zone from its primitive state.
pub fn cons_state(q: &[f64], prim: &PrimLayout, vars: &VarLayout, u_state: &mut [f64]) {
    u_state[vars.urho] = q[prim.qrho];
    for axis in 0..3 {
        u_state[vars.mom(axis)] = q[prim.qrho] * q[prim.vel(axis)];
    }
    let ke = 0.5
        * q[prim.qrho]
        * (q[prim.vel(0)] * q[prim.vel(0)]
            + q[prim.vel(1)] * q[prim.vel(1)]
            + q[prim.vel(2)] * q[prim.vel(2)]);
    u_state[vars.ueden] = q[prim.qreint] + ke;
    u_state[vars.ueint] = q[prim.qreint];
    u_state[vars.utemp] = 0.0;
    if let (Some(umr), Some(uml), Some(ump)) = (vars.umr, vars.uml, vars.ump) {
        u_state[umr] = 0.0;
        u_state[uml] = 0.0;
        u_state[ump] = 0.0;
    }
    if let Some(ushk) = vars.ushk {
        u_state[ushk] = 0.0;
    }
    if let (Some(umup), Some(umun)) = (vars.umup, vars.umun) {
        u_state[umup] = 0.0;
        u_state[umun] = 0.0;
    }
    for (n, nqs) in prim.passive_map(vars) {
        u_state[n] = q[prim.qrho] * q[nqs];
    }
}

/// Star-region conserved state behind the wave moving at `s_k`, Toro
/// Eq. 10.39.
pub fn hllc_state(
    dir: Direction,
    s_k: f64,
    s_c: f64,
    q: &[f64],
    prim: &PrimLayout,
    vars: &VarLayout,
    u_hllc: &mut [f64],
) {
    let ax = dir.axes();
    let u_k = q[prim.vel(ax.normal)];

    let hllc_factor = q[prim.qrho] * (s_k - u_k) / (s_k - s_c);

    u_hllc[vars.urho] = hllc_factor;
    u_hllc[vars.mom(ax.normal)] = hllc_factor * s_c;
    u_hllc[vars.mom(ax.t1)] = hllc_factor * q[prim.vel(ax.t1)];
    u_hllc[vars.mom(ax.t2)] = hllc_factor * q[prim.vel(ax.t2)];

    let ke = 0.5
        * (q[prim.vel(0)] * q[prim.vel(0)]
            + q[prim.vel(1)] * q[prim.vel(1)]
            + q[prim.vel(2)] * q[prim.vel(2)]);
    u_hllc[vars.ueden] = hllc_factor
        * (ke
            + q[prim.qreint] / q[prim.qrho]
            + (s_c - u_k) * (s_c + q[prim.qpres] / (q[prim.qrho] * (s_k - u_k))));
    u_hllc[vars.ueint] = hllc_factor * q[prim.qreint] / q[prim.qrho];
    u_hllc[vars.utemp] = 0.0;
    if let (Some(umr), Some(uml), Some(ump)) = (vars.umr, vars.uml, vars.ump) {
        u_hllc[umr] = 0.0;
        u_hllc[uml] = 0.0;
        u_hllc[ump] = 0.0;
    }
    if let Some(ushk) = vars.ushk {
        u_hllc[ushk] = 0.0;
    }
    if let (Some(umup), Some(umun)) = (vars.umup, vars.umun) {
        u_hllc[umup] = 0.0;
        u_hllc[umun] = 0.0;
    }
    for (n, nqs) in prim.passive_map(vars) {
        u_hllc[n] = hllc_factor * q[nqs];
    }
}

/// Physical flux of a conserved state with interface pressure `p`.
///
/// `bnd_fac == 0` zeroes the advective part so walls stay hard.
pub fn compute_flux(
    dir: Direction,
    bnd_fac: f64,
    coord: Coord,
    u_state: &[f64],
    p: f64,
    vars: &VarLayout,
    f_state: &mut [f64],
) {
    let ax = dir.axes();
    let u_flx = u_state[vars.mom(ax.normal)] / u_state[vars.urho] * bnd_fac;

    f_state[vars.urho] = u_state[vars.urho] * u_flx;

    f_state[vars.mom(ax.normal)] = u_state[vars.mom(ax.normal)] * u_flx;
    if mom_flux_has_p(dir, dir, coord) {
        f_state[vars.mom(ax.normal)] += p;
    }
    f_state[vars.mom(ax.t1)] = u_state[vars.mom(ax.t1)] * u_flx;
    f_state[vars.mom(ax.t2)] = u_state[vars.mom(ax.t2)] * u_flx;

    f_state[vars.ueden] = (u_state[vars.ueden] + p) * u_flx;
    f_state[vars.ueint] = u_state[vars.ueint] * u_flx;
    f_state[vars.utemp] = 0.0;
    if let (Some(umr), Some(uml), Some(ump)) = (vars.umr, vars.uml, vars.ump) {
        f_state[umr] = 0.0;
        f_state[uml] = 0.0;
        f_state[ump] = 0.0;
    }
    if let Some(ushk) = vars.ushk {
        f_state[ushk] = 0.0;
    }
    if let (Some(umup), Some(umun)) = (vars.umup, vars.umun) {
        f_state[umup] = 0.0;
        f_state[umun] = 0.0;
    }
    for s in 0..vars.n_species {
        f_state[vars.ufs + s] = u_state[vars.ufs + s] * u_flx;
    }
}

/// HLLC solve from two primitive zone states, writing the interface flux.
///
/// Uses the simplest wave-speed estimates, which hold for a general
/// equation of state; the contact speed is Toro Eq. 10.8.
#[allow(clippy::too_many_arguments)]
pub fn hllc(
    ql: &[f64],
    qr: &[f64],
    gamcl: f64,
    gamcr: f64,
    raux: &RiemannAux,
    dir: Direction,
    coord: Coord,
    prim: &PrimLayout,
    vars: &VarLayout,
    cfg: &RiemannConfig,
    uflx: &mut [f64],
) {
    let ax = dir.axes();
    let iu = prim.vel(ax.normal);

    let rl = ql[prim.qrho].max(cfg.small_dens);
    let ul = ql[iu];
    let pl = ql[prim.qpres].max(cfg.small_pres);

    let rr = qr[prim.qrho].max(cfg.small_dens);
    let ur = qr[iu];
    let pr = qr[prim.qpres].max(cfg.small_pres);

    let cl = (gamcl * pl / rl).sqrt();
    let cr = (gamcr * pr / rr).sqrt();

    // simplest wave-speed estimates
    let s_l = (ul - cl).min(ur - cr);
    let s_r = (ul + cl).max(ur + cr);

    // contact speed, Toro Eq. 10.8
    let mut s_c = (pr - pl + rl * ul * (s_l - ul) - rr * ur * (s_r - ur))
        / (rl * (s_l - ul) - rr * (s_r - ur));

    // symmetry preservation: snap a tiny contact speed to zero
    if s_c.abs() < tol::SMALLU * 0.5 * (ul.abs() + ur.abs()) {
        s_c = 0.0;
    }

    let mut u_state = vec![0.0; vars.n];
    let mut u_hllc_state = vec![0.0; vars.n];

    match classify(s_l, s_r, s_c) {
        Region::Right => {
            cons_state(qr, prim, vars, &mut u_state);
            compute_flux(dir, raux.bnd_fac, coord, &u_state, pr, vars, uflx);
        }
        Region::RightStar => {
            cons_state(qr, prim, vars, &mut u_state);
            compute_flux(dir, raux.bnd_fac, coord, &u_state, pr, vars, uflx);
            hllc_state(dir, s_r, s_c, qr, prim, vars, &mut u_hllc_state);
            for n in 0..vars.n {
                uflx[n] += s_r * (u_hllc_state[n] - u_state[n]);
            }
        }
        Region::LeftStar => {
            cons_state(ql, prim, vars, &mut u_state);
            compute_flux(dir, raux.bnd_fac, coord, &u_state, pl, vars, uflx);
            hllc_state(dir, s_l, s_c, ql, prim, vars, &mut u_hllc_state);
            for n in 0..vars.n {
                uflx[n] += s_l * (u_hllc_state[n] - u_state[n]);
            }
        }
        Region::Left => {
            cons_state(ql, prim, vars, &mut u_state);
            compute_flux(dir, raux.bnd_fac, coord, &u_state, pl, vars, uflx);
        }
    }
}

/// HLLC flux together with the stored interface state, in one call.
///
/// The flux comes from the HLLC fan; the stored state is the two-shock
/// estimate of [`riemannus`], which is what pressure-work terms and
/// diagnostics downstream consume. The estimate is also returned.
#[allow(clippy::too_many_arguments)]
pub fn hllc_with_state(
    ql: &[f64],
    qr: &[f64],
    gamcl: f64,
    gamcr: f64,
    cl: f64,
    cr: f64,
    bnd_fac: f64,
    dir: Direction,
    coord: Coord,
    prim: &PrimLayout,
    vars: &VarLayout,
    gd: &GdLayout,
    cfg: &RiemannConfig,
    uflx: &mut [f64],
    qgdnv: &mut [f64],
) -> RiemannState {
    let (l, r, raux) = load_input_states(ql, qr, gamcl, gamcr, cl, cr, bnd_fac, dir, prim, cfg);
    hllc(ql, qr, gamcl, gamcr, &raux, dir, coord, prim, vars, cfg, uflx);
    let qint = riemannus(&l, &r, &raux, cfg);
    store_state(&qint, dir, prim, gd, qgdnv, cfg.store_full_state);
    qint
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

    fn aux() -> RiemannAux {
        RiemannAux::new(1.0, 1.0, 1.0)
    }

    #[test]
    fn test_region_classification_is_exhaustive() {
        assert_eq!(classify(-1.0, -0.5, -0.7), Region::Right);
        assert_eq!(classify(-1.0, 1.0, -0.5), Region::RightStar);
        assert_eq!(classify(-1.0, 1.0, 0.0), Region::RightStar);
        assert_eq!(classify(-1.0, 1.0, 0.5), Region::LeftStar);
        assert_eq!(classify(0.5, 1.0, 0.7), Region::Left);
    }

    #[test]
    fn test_uniform_supersonic_gives_upwind_flux() {
        let (prim, vars) = layouts();
        let cfg = RiemannConfig::default();
        let q = zone(&prim, 1.0, 3.0, 1.0);
        let mut f = vec![0.0; vars.n];
        hllc(&q, &q, GAMMA, GAMMA, &aux(), Direction::X, Coord::Cartesian, &prim, &vars, &cfg, &mut f);
        let eos = GammaLaw::new(GAMMA);
        assert_approx_eq!(f64, f[vars.urho], 3.0, ulps = 8);
        assert_approx_eq!(f64, f[vars.mom(0)], 9.0 + 1.0, ulps = 8);
        let rho_e = eos.rhoe_from_pressure(1.0) + 0.5 * 9.0;
        assert_approx_eq!(f64, f[vars.ueden], 3.0 * (rho_e + 1.0), ulps = 8);
        assert_approx_eq!(f64, f[vars.ufs], 3.0, ulps = 8);
    }

    #[test]
    fn test_stationary_contact_has_pressure_flux_only() {
        let (prim, vars) = layouts();
        let cfg = RiemannConfig::default();
        // a contact discontinuity at rest: no advection, only pressure
        let ql = zone(&prim, 1.0, 0.0, 1.0);
        let qr = zone(&prim, 0.5, 0.0, 1.0);
        let mut f = vec![0.0; vars.n];
        hllc(&ql, &qr, GAMMA, GAMMA, &aux(), Direction::X, Coord::Cartesian, &prim, &vars, &cfg, &mut f);
        assert_approx_eq!(f64, f[vars.urho], 0.0);
        assert_approx_eq!(f64, f[vars.mom(0)], 1.0, ulps = 8);
        assert_approx_eq!(f64, f[vars.ueden], 0.0);
        assert_approx_eq!(f64, f[vars.ufs], 0.0);
    }

    #[test]
    fn test_mirrored_input_gives_zero_mass_flux() {
        let (prim, vars) = layouts();
        let cfg = RiemannConfig::default();
        let ql = zone(&prim, 1.0, 0.5, 1.0);
        let qr = zone(&prim, 1.0, -0.5, 1.0);
        let mut f = vec![0.0; vars.n];
        hllc(&ql, &qr, GAMMA, GAMMA, &aux(), Direction::X, Coord::Cartesian, &prim, &vars, &cfg, &mut f);
        assert_approx_eq!(f64, f[vars.urho], 0.0);
        assert_approx_eq!(f64, f[vars.ufs], 0.0);
    }

    #[test]
    fn test_wall_factor_leaves_pressure_only() {
        let (prim, vars) = layouts();
        let cfg = RiemannConfig::default();
        let q = zone(&prim, 1.0, 3.0, 1.0);
        let raux = RiemannAux::new(1.0, 1.0, 0.0);
        let mut f = vec![0.0; vars.n];
        hllc(&q, &q, GAMMA, GAMMA, &raux, Direction::X, Coord::Cartesian, &prim, &vars, &cfg, &mut f);
        assert_approx_eq!(f64, f[vars.urho], 0.0);
        assert_approx_eq!(f64, f[vars.mom(0)], 1.0, ulps = 8);
        assert_approx_eq!(f64, f[vars.ueden], 0.0);
    }

    #[test]
    fn test_hllc_state_conserves_across_the_fan() {
        // Rankine-Hugoniot consistency: F_l + S_l (U*_l - U_l) and
        // F_r + S_r (U*_r - U_r) must agree in the mass slot
        let (prim, vars) = layouts();
        let ql = zone(&prim, 1.0, 0.0, 1.0);
        let qr = zone(&prim, 0.125, 0.0, 0.1);

        let eos = GammaLaw::new(GAMMA);
        let cl = eos.sound_speed(1.0, 1.0);
        let cr = eos.sound_speed(0.1, 8.0);
        let s_l = (0.0 - cl).min(0.0 - cr);
        let s_r = (0.0 + cl).max(0.0 + cr);
        let s_c = (0.1 - 1.0 + 1.0 * 0.0 - 0.125 * 0.0) / (1.0 * s_l - 0.125 * s_r);

        let mut u_l = vec![0.0; vars.n];
        let mut u_r = vec![0.0; vars.n];
        let mut us_l = vec![0.0; vars.n];
        let mut us_r = vec![0.0; vars.n];
        cons_state(&ql, &prim, &vars, &mut u_l);
        cons_state(&qr, &prim, &vars, &mut u_r);
        hllc_state(Direction::X, s_l, s_c, &ql, &prim, &vars, &mut us_l);
        hllc_state(Direction::X, s_r, s_c, &qr, &prim, &vars, &mut us_r);

        let mut f_l = vec![0.0; vars.n];
        let mut f_r = vec![0.0; vars.n];
        compute_flux(Direction::X, 1.0, Coord::Cartesian, &u_l, 1.0, &vars, &mut f_l);
        compute_flux(Direction::X, 1.0, Coord::Cartesian, &u_r, 0.1, &vars, &mut f_r);

        // both star fluxes evaluate the same contact mass flux rho* S_c
        let f_star_from_l = f_l[vars.urho] + s_l * (us_l[vars.urho] - u_l[vars.urho]);
        let f_star_from_r = f_r[vars.urho] + s_r * (us_r[vars.urho] - u_r[vars.urho]);
        assert_approx_eq!(
            f64,
            f_star_from_l / us_l[vars.urho],
            f_star_from_r / us_r[vars.urho],
            epsilon = 1.0e-12
        );
    }

    #[test]
    fn test_with_state_matches_flux_and_stores_estimate() {
        let (prim, vars) = layouts();
        let gd = GdLayout::new(&Capabilities::default());
        let cfg = RiemannConfig::default();
        let eos = GammaLaw::new(GAMMA);
        let q = zone(&prim, 1.0, 3.0, 1.0);
        let c = eos.sound_speed(1.0, 1.0);

        let mut f_direct = vec![0.0; vars.n];
        hllc(&q, &q, GAMMA, GAMMA, &aux(), Direction::X, Coord::Cartesian, &prim, &vars, &cfg, &mut f_direct);

        let mut f = vec![0.0; vars.n];
        let mut qgdnv = vec![0.0; gd.n];
        let qint = hllc_with_state(
            &q, &q, GAMMA, GAMMA, c, c, 1.0, Direction::X, Coord::Cartesian,
            &prim, &vars, &gd, &cfg, &mut f, &mut qgdnv,
        );
        for n in 0..vars.n {
            assert_eq!(f[n].to_bits(), f_direct[n].to_bits());
        }
        // uniform supersonic flow: the stored two-shock estimate reproduces
        // the upwind inputs
        assert_approx_eq!(f64, qint.un, 3.0, ulps = 8);
        assert_approx_eq!(f64, qgdnv[gd.vel(0)], 3.0, ulps = 8);
        assert_approx_eq!(f64, qgdnv[gd.gdpres], 1.0, ulps = 8);
    }
}
