//! The Colella & Glaz (1985) iterative two-shock solver.

use crate::config::{CgBlend, RiemannConfig};

use super::{tol, CgStatus, RiemannAux, RiemannState};

/// Bounded record of the trial star pressures, kept by the host wrapper
/// purely for diagnostic reporting on convergence failure. The kernel
/// variant used in a massively-parallel sweep runs without one.
#[derive(Clone, Debug)]
pub struct PstarHistory {
    buf: Vec<f64>,
    cap: usize,
}

impl PstarHistory {
    /// Sized to hold the secant iterates plus the bisection refinement.
    pub fn for_config(cfg: &RiemannConfig) -> Self {
        Self::new((1 + tol::PSTAR_BISECT_FACTOR) * cfg.cg_maxiter)
    }

    pub fn new(cap: usize) -> Self {
        Self { buf: Vec::with_capacity(cap), cap }
    }

    fn record(&mut self, pstar: f64) {
        if self.buf.len() == self.cap {
            self.buf.remove(0);
        }
        self.buf.push(pstar);
    }

    pub fn values(&self) -> &[f64] {
        &self.buf
    }
}

/// Lagrangian wave-speed estimate for a general equation of state.
///
/// Predicts the effective gamma across the wave (CG Eq. 31), clamped to
/// `[gmin, gmax]`, then evaluates the squared mass flux from the
/// Rankine-Hugoniot conditions (CG Eq. 34). `csq` is the Lagrangian
/// sound speed squared of the undisturbed state, used both for the
/// weak-jump limit and as a lower bound.
pub fn wsqge(
    p: f64,
    tau: f64,
    game: f64,
    gdot: f64,
    gmin: f64,
    gmax: f64,
    csq: f64,
    pstar: f64,
) -> (f64, f64) {
    let gamstar = ((pstar - p) * gdot / (pstar + p) + game).clamp(gmin, gmax);

    let mut alpha = pstar - (gamstar - 1.0) * p / (game - 1.0);
    if alpha == 0.0 {
        alpha = tol::SMLP1 * (pstar + p);
    }

    let mut wsq = (0.5 * (gamstar - 1.0) * (pstar + p) + pstar) * (pstar - p) / (tau * alpha);
    if (pstar / p - 1.0).abs() < tol::SMLP1 {
        wsq = csq;
    }
    wsq = wsq.max(0.5 * (game - 1.0) / game * csq);

    (gamstar, wsq)
}

/// One side's scalars for the star-pressure root find.
#[derive(Clone, Copy)]
struct SideScalars {
    u: f64,
    p: f64,
    tau: f64,
    game: f64,
    clsq: f64,
}

/// Bisection refinement of the star pressure over `[lo, hi]`, used as the
/// `CgBlend::Bisection` fallback. Solves `u*_l(p*) = u*_r(p*)`; fails when
/// the bracket does not straddle the root or the budget runs out.
#[allow(clippy::too_many_arguments)]
fn pstar_bisection(
    mut lo: f64,
    mut hi: f64,
    l: &SideScalars,
    r: &SideScalars,
    gdot: f64,
    gmin: f64,
    gmax: f64,
    cfg: &RiemannConfig,
    mut history: Option<&mut PstarHistory>,
) -> (f64, bool) {
    let f_at = |pstar: f64| -> f64 {
        let (_, wlsq) = wsqge(l.p, l.tau, l.game, gdot, gmin, gmax, l.clsq, pstar);
        let (_, wrsq) = wsqge(r.p, r.tau, r.game, gdot, gmin, gmax, r.clsq, pstar);
        let wl = 1.0 / wlsq.sqrt();
        let wr = 1.0 / wrsq.sqrt();
        let ustar_l = l.u - (pstar - l.p) * wl;
        let ustar_r = r.u + (pstar - r.p) * wr;
        ustar_l - ustar_r
    };

    let mut f_lo = f_at(lo);
    let f_hi = f_at(hi);
    let mut pstar = 0.5 * (lo + hi);
    if f_lo * f_hi > 0.0 {
        // the recent iterates never bracketed the root
        return (pstar, false);
    }

    for _ in 0..tol::PSTAR_BISECT_FACTOR * cfg.cg_maxiter {
        pstar = 0.5 * (lo + hi);
        if let Some(h) = history.as_deref_mut() {
            h.record(pstar);
        }
        let f = f_at(pstar);
        if 0.5 * (hi - lo) < cfg.cg_tol * pstar {
            return (pstar, true);
        }
        if f_lo * f <= 0.0 {
            hi = pstar;
        } else {
            lo = pstar;
            f_lo = f;
        }
    }

    (pstar, false)
}

/// Approximate Riemann solve after Colella & Glaz: a secant iteration for
/// the star pressure using the two-shock wave speeds of [`wsqge`], followed
/// by sampling of the state at the interface.
///
/// Returns the sampled Godunov state together with the iteration status;
/// the caller decides whether a `Failed` status is fatal.
pub fn riemanncg(
    ql: &RiemannState,
    qr: &RiemannState,
    raux: &RiemannAux,
    cfg: &RiemannConfig,
    mut history: Option<&mut PstarHistory>,
) -> (RiemannState, CgStatus) {
    let taul = 1.0 / ql.rho;
    let taur = 1.0 / qr.rho;

    // Lagrangian sound speeds
    let clsql = ql.gamc * ql.p * ql.rho;
    let clsqr = qr.gamc * qr.p * qr.rho;

    // The full CG scheme predicts gamma_e to the interfaces with its own
    // evolution equation; we instead carry (rho e) to the edges and
    // reconstruct gamma_e from it here.
    let gamel = ql.p / ql.rhoe + 1.0;
    let gamer = qr.p / qr.rhoe + 1.0;

    let gmin = gamel.min(gamer).min(1.0);
    let gmax = gamel.max(gamer).max(2.0);

    let game_bar = 0.5 * (gamel + gamer);
    let gamc_bar = 0.5 * (ql.gamc + qr.gamc);
    let gdot = 2.0 * (1.0 - game_bar / gamc_bar) * (game_bar - 1.0);

    let wsmall = cfg.small_dens * raux.csmall;
    let mut wl = wsmall.max(clsql.abs().sqrt());
    let mut wr = wsmall.max(clsqr.abs().sqrt());

    // two-shock guess from the acoustic impedances
    let mut pstar = (ql.p + ((qr.p - ql.p) - wr * (qr.un - ql.un)) * wl / (wl + wr))
        .max(cfg.small_pres);

    let (_, mut wlsq) = wsqge(ql.p, taul, gamel, gdot, gmin, gmax, clsql, pstar);
    let (_, mut wrsq) = wsqge(qr.p, taur, gamer, gdot, gmin, gmax, clsqr, pstar);

    let mut pstar_old = pstar;

    wl = wlsq.sqrt();
    wr = wrsq.sqrt();

    // R-H jump conditions give ustar across each wave; the two agree once
    // the iteration is done.
    let mut ustar_l = ql.un - (pstar - ql.p) / wl;
    let mut ustar_r = qr.un + (pstar - qr.p) / wr;

    // revised two-shock estimate, also the `CgBlend::TwoShock` fallback
    let pstar_two_shock = (ql.p + ((qr.p - ql.p) - wr * (qr.un - ql.un)) * wl / (wl + wr))
        .max(cfg.small_pres);
    pstar = pstar_two_shock;

    // last few iterates, kept for the bisection bracket
    let mut recent = [0.0_f64; 6];
    let mut n_recent = 0_usize;

    let mut converged = false;
    let mut iter = 0;
    while (iter < cfg.cg_maxiter && !converged) || iter < 2 {
        let (_, wlsq_i) = wsqge(ql.p, taul, gamel, gdot, gmin, gmax, clsql, pstar);
        let (_, wrsq_i) = wsqge(qr.p, taur, gamer, gdot, gmin, gmax, clsqr, pstar);
        wlsq = wlsq_i;
        wrsq = wrsq_i;

        // NOTE: from here on these are the inverses of the wave speeds
        wl = 1.0 / wlsq.sqrt();
        wr = 1.0 / wrsq.sqrt();

        let ustar_r_old = ustar_r;
        let ustar_l_old = ustar_l;

        ustar_r = qr.un - (qr.p - pstar) * wr;
        ustar_l = ql.un + (ql.p - pstar) * wl;

        let dpditer = (pstar_old - pstar).abs();

        // secant slopes; for weak waves fall back to dp scaled by the
        // inverse wave speed
        let mut zp = (ustar_l - ustar_l_old).abs();
        if zp - tol::WEAKWV * raux.cavg <= 0.0 {
            zp = dpditer * wl;
        }
        let mut zm = (ustar_r - ustar_r_old).abs();
        if zm - tol::WEAKWV * raux.cavg <= 0.0 {
            zm = dpditer * wr;
        }

        // CG Eq. 18
        let denom = dpditer / (zp + zm).max(tol::SMALL * raux.cavg);
        pstar_old = pstar;
        pstar = (pstar - denom * (ustar_r - ustar_l)).max(cfg.small_pres);

        if (pstar - pstar_old).abs() < cfg.cg_tol * pstar {
            converged = true;
        }

        recent[iter % recent.len()] = pstar;
        n_recent = (n_recent + 1).min(recent.len());
        if let Some(h) = history.as_deref_mut() {
            h.record(pstar);
        }

        iter += 1;
    }

    let mut status = CgStatus::Converged;
    if !converged {
        match cfg.cg_blend {
            CgBlend::Abort => {
                status = CgStatus::Failed;
            }
            CgBlend::TwoShock => {
                pstar = pstar_two_shock;
                status = CgStatus::FellBack;
            }
            CgBlend::Bisection => {
                let mut lo = f64::MAX;
                let mut hi = f64::MIN;
                for &p in &recent[..n_recent] {
                    lo = lo.min(p);
                    hi = hi.max(p);
                }
                lo = lo.max(cfg.small_pres);
                hi = hi.max(cfg.small_pres);

                let left = SideScalars { u: ql.un, p: ql.p, tau: taul, game: gamel, clsq: clsql };
                let right = SideScalars { u: qr.un, p: qr.p, tau: taur, game: gamer, clsq: clsqr };
                let (pstar_b, ok) = pstar_bisection(
                    lo, hi, &left, &right, gdot, gmin, gmax, cfg, history.as_deref_mut(),
                );
                if ok {
                    pstar = pstar_b;
                    status = CgStatus::FellBack;
                } else {
                    status = CgStatus::Failed;
                }
            }
        }
    }

    // single ustar between the two waves, from the updated (inverse)
    // wave speeds
    ustar_r = qr.un - (qr.p - pstar) * wr;
    ustar_l = ql.un + (ql.p - pstar) * wl;
    let mut ustar = 0.5 * (ustar_l + ustar_r);

    // symmetry preservation: snap a tiny contact velocity to zero
    if ustar.abs() < tol::SMALLU * 0.5 * (ql.un.abs() + qr.un.abs()) {
        ustar = 0.0;
    }

    // sample the solution; the sign of the contact velocity picks which
    // side's wave we need to look at
    let (uo, po, mut tauo, gamco, gameo) = if ustar > 0.0 {
        (ql.un, ql.p, taul, ql.gamc, gamel)
    } else if ustar < 0.0 {
        (qr.un, qr.p, taur, qr.gamc, gamer)
    } else {
        (
            0.5 * (ql.un + qr.un),
            0.5 * (ql.p + qr.p),
            0.5 * (taul + taur),
            0.5 * (ql.gamc + qr.gamc),
            0.5 * (gamel + gamer),
        )
    };

    let ro = cfg.small_dens.max(1.0 / tauo);
    tauo = 1.0 / ro;

    let co = raux.csmall.max((gamco * po * tauo).abs().sqrt());
    let clsq = (co * ro) * (co * ro);

    let (gamstar, wosq) = wsqge(po, tauo, gameo, gdot, gmin, gmax, clsq, pstar);

    let sgnm = 1.0_f64.copysign(ustar);

    let wo = wosq.sqrt();
    let dpjmp = pstar - po;

    let mut rstar = 1.0 - ro * dpjmp / wosq;
    rstar = ro / rstar;
    rstar = cfg.small_dens.max(rstar);

    let cstar = raux.csmall.max((gamco * pstar / rstar).abs().sqrt());

    let mut spout = co - sgnm * uo;
    let mut spin = cstar - sgnm * ustar;

    let ushock = wo * tauo - sgnm * uo;

    if pstar - po >= 0.0 {
        spin = ushock;
        spout = ushock;
    }

    let frac = 0.5
        * (1.0
            + (spin + spout)
                / (spout - spin).max(spin + spout).max(tol::SMALL * raux.cavg));

    // the transverse velocities only jump across the contact
    let (ut, utt) = if ustar > 0.0 {
        (ql.ut, ql.utt)
    } else if ustar < 0.0 {
        (qr.ut, qr.utt)
    } else {
        (0.5 * (ql.ut + qr.ut), 0.5 * (ql.utt + qr.utt))
    };

    // interpolate between the star and outer states; this covers the case
    // where the interface sits inside the rarefaction fan
    let mut rho_int = frac * rstar + (1.0 - frac) * ro;
    let mut un_int = frac * ustar + (1.0 - frac) * uo;
    let mut p_int = frac * pstar + (1.0 - frac) * po;
    let mut game_int = frac * gamstar + (1.0 - frac) * gameo;

    // fully outside the star region
    if spout < 0.0 {
        rho_int = ro;
        un_int = uo;
        p_int = po;
        game_int = gameo;
    }

    // fully inside the star region
    if spin >= 0.0 {
        rho_int = rstar;
        un_int = ustar;
        p_int = pstar;
        game_int = gamstar;
    }

    rho_int = rho_int.max(cfg.small_dens);
    p_int = p_int.max(cfg.small_pres);

    // hard-wall suppression
    un_int *= raux.bnd_fac;

    let rhoe_int = p_int / (game_int - 1.0);

    (
        RiemannState::new(rho_int, un_int, ut, utt, p_int, rhoe_int, gamco),
        status,
    )
}
