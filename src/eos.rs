//! Equation-of-state call contract.
//!
//! The solvers themselves never call the EOS; it is consumed only by the
//! optional interface consistency fixup (`ppm_temp_fix`), which re-derives
//! pressure and energy from density, specific energy and composition.

/// Input mode for an EOS call: which pair of thermodynamic variables is
/// taken as given.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EosMode {
    /// Density and temperature given.
    RhoT,
    /// Density and specific internal energy given.
    RhoE,
}

/// Thermodynamic state exchanged with the EOS. Fields not covered by the
/// input mode are outputs.
#[derive(Clone, Debug, Default)]
pub struct EosState {
    pub rho: f64,
    pub t: f64,
    /// Specific internal energy.
    pub e: f64,
    pub p: f64,
    /// First adiabatic exponent (sound-speed gamma).
    pub gam1: f64,
    /// Species mass fractions.
    pub xn: Vec<f64>,
}

/// Ideal gamma-law gas.
#[derive(Clone, Copy, Debug)]
pub struct GammaLaw {
    gamma: f64,
    /// Specific heat at constant volume, in code units.
    cv: f64,
}

impl GammaLaw {
    pub fn new(gamma: f64) -> Self {
        Self { gamma, cv: 1.0 }
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn eos(&self, mode: EosMode, state: &mut EosState) {
        match mode {
            EosMode::RhoT => {
                state.e = self.cv * state.t;
                state.p = (self.gamma - 1.0) * state.rho * state.e;
            }
            EosMode::RhoE => {
                state.t = state.e / self.cv;
                state.p = (self.gamma - 1.0) * state.rho * state.e;
            }
        }
        state.gam1 = self.gamma;
    }

    pub fn sound_speed(&self, pressure: f64, density_inv: f64) -> f64 {
        (self.gamma * pressure * density_inv).sqrt()
    }

    /// Internal energy density from pressure.
    pub fn rhoe_from_pressure(&self, pressure: f64) -> f64 {
        pressure / (self.gamma - 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_rho_e_mode() {
        let eos = GammaLaw::new(1.4);
        let mut state = EosState {
            rho: 1.0,
            e: 2.5,
            xn: vec![1.0],
            ..Default::default()
        };
        eos.eos(EosMode::RhoE, &mut state);
        assert_approx_eq!(f64, state.p, 1.0);
        assert_approx_eq!(f64, state.gam1, 1.4);
        // consistency with the pressure helpers
        assert_approx_eq!(f64, eos.rhoe_from_pressure(state.p), state.rho * state.e);
        assert_approx_eq!(f64, eos.sound_speed(state.p, 1.0), 1.4f64.sqrt());
    }
}
