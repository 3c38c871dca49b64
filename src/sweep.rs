//! Interface-parallel solve driver and a minimal shock-tube stepper.
//!
//! Every interface solve is pure and independent, so a sweep is a plain
//! `par_iter` over the inputs. Failures are collected as statuses during
//! the sweep and escalated on the host afterwards, where the failing solve
//! is redone with diagnostics attached.

use rayon::prelude::*;

use crate::config::{Capabilities, RiemannConfig, RiemannSolverKind};
use crate::eos::{EosMode, EosState, GammaLaw};
use crate::errors::{NonConvergence, RiemannError};
use crate::geometry::{Coord, Direction};
use crate::layout::{GdLayout, PrimLayout, VarLayout};
use crate::riemann::{
    compute_flux_q, hllc, riemann_state, CgStatus, PstarHistory, RiemannAux, RiemannState,
};

/// Solver input for one interface.
#[derive(Clone, Debug)]
pub struct InterfaceInput {
    pub ql: RiemannState,
    pub qr: RiemannState,
    pub raux: RiemannAux,
}

/// Sampled state and status for one interface.
#[derive(Clone, Debug)]
pub struct InterfaceSolution {
    pub qint: RiemannState,
    pub status: CgStatus,
}

/// Runs the configured state-producing solver over a batch of interfaces.
pub struct FluxSweep<'a> {
    cfg: &'a RiemannConfig,
}

impl<'a> FluxSweep<'a> {
    pub fn new(cfg: &'a RiemannConfig) -> Self {
        Self { cfg }
    }

    pub fn run(&self, interfaces: &[InterfaceInput]) -> SweepOutcome {
        let solutions = interfaces
            .par_iter()
            .map(|iface| {
                let (qint, status) =
                    riemann_state(self.cfg, &iface.ql, &iface.qr, &iface.raux, None);
                InterfaceSolution { qint, status }
            })
            .collect();
        SweepOutcome { solutions }
    }
}

/// Per-interface results of one sweep.
pub struct SweepOutcome {
    pub solutions: Vec<InterfaceSolution>,
}

impl SweepOutcome {
    /// Escalate the first failed solve, if any. The failing interface is
    /// solved again with an iteration history attached so the error can
    /// carry the full diagnostic dump.
    pub fn check(
        &self,
        cfg: &RiemannConfig,
        interfaces: &[InterfaceInput],
    ) -> Result<(), RiemannError> {
        for (i, sol) in self.solutions.iter().enumerate() {
            if sol.status != CgStatus::Failed {
                continue;
            }
            let iface = &interfaces[i];
            let mut history = PstarHistory::for_config(cfg);
            let _ = riemann_state(cfg, &iface.ql, &iface.qr, &iface.raux, Some(&mut history));
            return Err(RiemannError::NonConvergence(Box::new(NonConvergence {
                interface: i,
                left: iface.ql.clone(),
                right: iface.qr.clone(),
                aux: iface.raux,
                pstar_history: history.values().to_vec(),
            })));
        }
        Ok(())
    }
}

/// First-order Godunov stepper for a 1D tube with zero-gradient boundaries.
///
/// This exists to exercise the load / solve / flux-assembly chain end to
/// end; it is not a production integrator.
pub struct Tube1d {
    cfg: RiemannConfig,
    caps: Capabilities,
    eos: GammaLaw,
    prim: PrimLayout,
    vars: VarLayout,
    gd: GdLayout,
    dx: f64,
    n_zones: usize,
    /// Primitive zone states, `n_zones * prim.n` flat.
    q: Vec<f64>,
}

impl Tube1d {
    /// The standard Sod problem on [0, 1] with the jump at 0.5.
    pub fn sod(n_zones: usize, gamma: f64, cfg: RiemannConfig) -> Self {
        let caps = Capabilities::default();
        let prim = PrimLayout::new(1);
        let vars = VarLayout::new(&caps, 1);
        let gd = GdLayout::new(&caps);
        let eos = GammaLaw::new(gamma);
        let dx = 1.0 / n_zones as f64;

        let mut q = vec![0.0; n_zones * prim.n];
        for i in 0..n_zones {
            let x = (i as f64 + 0.5) * dx;
            let (rho, p) = if x < 0.5 { (1.0, 1.0) } else { (0.125, 0.1) };
            let zone = &mut q[i * prim.n..(i + 1) * prim.n];
            zone[prim.qrho] = rho;
            zone[prim.qpres] = p;
            zone[prim.qreint] = eos.rhoe_from_pressure(p);
            zone[prim.qtemp] = zone[prim.qreint] / rho;
            zone[prim.qfs] = 1.0;
        }

        Self { cfg, caps, eos, prim, vars, gd, dx, n_zones, q }
    }

    pub fn n_zones(&self) -> usize {
        self.n_zones
    }

    pub fn primitive_layout(&self) -> PrimLayout {
        self.prim
    }

    pub fn zone(&self, i: usize) -> &[f64] {
        &self.q[i * self.prim.n..(i + 1) * self.prim.n]
    }

    fn conserved(&self, i: usize) -> Vec<f64> {
        let mut u = vec![0.0; self.vars.n];
        crate::riemann::hllc::cons_state(self.zone(i), &self.prim, &self.vars, &mut u);
        u
    }

    /// Volume-integrated conserved state, for conservation checks.
    pub fn total_conserved(&self) -> Vec<f64> {
        let mut total = vec![0.0; self.vars.n];
        for i in 0..self.n_zones {
            let u = self.conserved(i);
            for n in 0..self.vars.n {
                total[n] += u[n] * self.dx;
            }
        }
        total
    }

    fn sound_speed(&self, i: usize) -> f64 {
        let z = self.zone(i);
        self.eos.sound_speed(z[self.prim.qpres], 1.0 / z[self.prim.qrho])
    }

    pub fn max_wave_speed(&self) -> f64 {
        (0..self.n_zones)
            .map(|i| self.zone(i)[self.prim.vel(0)].abs() + self.sound_speed(i))
            .fold(0.0, f64::max)
    }

    /// Zone index for interface `i` on the given side, clamped for the
    /// zero-gradient boundaries.
    fn neighbor(&self, i: usize, left: bool) -> usize {
        if left {
            i.saturating_sub(1)
        } else {
            i.min(self.n_zones - 1)
        }
    }

    fn interface_fluxes(&self) -> Result<Vec<Vec<f64>>, RiemannError> {
        let n_ifaces = self.n_zones + 1;

        if self.cfg.solver == RiemannSolverKind::Hllc {
            let fluxes = (0..n_ifaces)
                .into_par_iter()
                .map(|i| {
                    let ql = self.zone(self.neighbor(i, true));
                    let qr = self.zone(self.neighbor(i, false));
                    let raux = RiemannAux::new(
                        self.sound_speed(self.neighbor(i, true)),
                        self.sound_speed(self.neighbor(i, false)),
                        1.0,
                    );
                    let mut flux = vec![0.0; self.vars.n];
                    hllc(
                        ql,
                        qr,
                        self.eos.gamma(),
                        self.eos.gamma(),
                        &raux,
                        Direction::X,
                        Coord::Cartesian,
                        &self.prim,
                        &self.vars,
                        &self.cfg,
                        &mut flux,
                    );
                    flux
                })
                .collect();
            return Ok(fluxes);
        }

        let interfaces: Vec<InterfaceInput> = (0..n_ifaces)
            .map(|i| {
                let il = self.neighbor(i, true);
                let ir = self.neighbor(i, false);
                let (ql, qr, raux) = crate::riemann::load_input_states(
                    self.zone(il),
                    self.zone(ir),
                    self.eos.gamma(),
                    self.eos.gamma(),
                    self.sound_speed(il),
                    self.sound_speed(ir),
                    1.0,
                    Direction::X,
                    &self.prim,
                    &self.cfg,
                );
                InterfaceInput { ql, qr, raux }
            })
            .collect();

        let outcome = FluxSweep::new(&self.cfg).run(&interfaces);
        outcome.check(&self.cfg, &interfaces)?;

        let fluxes = outcome
            .solutions
            .iter()
            .enumerate()
            .map(|(i, sol)| {
                let mut flux = vec![0.0; self.vars.n];
                let mut qgdnv = vec![0.0; self.gd.n];
                compute_flux_q(
                    &sol.qint,
                    Direction::X,
                    Coord::Cartesian,
                    &self.caps,
                    &self.vars,
                    &self.prim,
                    &self.gd,
                    None,
                    &mut flux,
                    None,
                    &mut qgdnv,
                    false,
                );
                // passive scalars: upwind on the contact velocity
                let donor = if sol.qint.un >= 0.0 {
                    self.neighbor(i, true)
                } else {
                    self.neighbor(i, false)
                };
                for (n, nqs) in self.prim.passive_map(&self.vars) {
                    flux[n] = flux[self.vars.urho] * self.zone(donor)[nqs];
                }
                flux
            })
            .collect();
        Ok(fluxes)
    }

    /// One conservative update with time step `dt`.
    pub fn step(&mut self, dt: f64) -> Result<(), RiemannError> {
        let fluxes = self.interface_fluxes()?;
        let dtdx = dt / self.dx;

        for i in 0..self.n_zones {
            let mut u = self.conserved(i);
            for n in 0..self.vars.n {
                u[n] -= dtdx * (fluxes[i + 1][n] - fluxes[i][n]);
            }

            let rho = u[self.vars.urho].max(self.cfg.small_dens);
            let vel = u[self.vars.mom(0)] / rho;
            let ke = 0.5 * rho * vel * vel;
            let rhoe = u[self.vars.ueden] - ke;

            let mut state = EosState {
                rho,
                e: rhoe / rho,
                xn: vec![u[self.vars.ufs] / rho],
                ..Default::default()
            };
            self.eos.eos(EosMode::RhoE, &mut state);

            let zone = &mut self.q[i * self.prim.n..(i + 1) * self.prim.n];
            zone[self.prim.qrho] = rho;
            zone[self.prim.vel(0)] = vel;
            zone[self.prim.vel(1)] = u[self.vars.mom(1)] / rho;
            zone[self.prim.vel(2)] = u[self.vars.mom(2)] / rho;
            zone[self.prim.qpres] = state.p.max(self.cfg.small_pres);
            zone[self.prim.qreint] = state.e * state.rho;
            zone[self.prim.qtemp] = state.t;
            zone[self.prim.qfs] = state.xn[0];
        }
        Ok(())
    }

    /// Advance to `t_end` under the given CFL number. Returns the number of
    /// steps taken.
    pub fn run_to(&mut self, t_end: f64, cfl: f64) -> Result<usize, RiemannError> {
        let mut t = 0.0;
        let mut steps = 0;
        while t < t_end {
            let dt = (cfl * self.dx / self.max_wave_speed()).min(t_end - t);
            self.step(dt)?;
            t += dt;
            steps += 1;
        }
        Ok(steps)
    }

    /// Primitive state of the zone containing `x`.
    pub fn sample(&self, x: f64) -> &[f64] {
        let i = ((x / self.dx) as usize).min(self.n_zones - 1);
        self.zone(i)
    }
}
