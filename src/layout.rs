//! Variable slot layouts.
//!
//! The rest of the hydrodynamics solver addresses conserved and primitive
//! quantities by flat array index; these layouts are the single source of
//! that mapping and must match on both sides of every array handed across
//! a module boundary.

use crate::config::Capabilities;

/// Slot layout of the conserved state / flux vector.
#[derive(Clone, Copy, Debug)]
pub struct VarLayout {
    pub urho: usize,
    /// First of three momentum slots, ordered x/y/z.
    pub umx: usize,
    pub ueden: usize,
    pub ueint: usize,
    pub utemp: usize,
    /// Cylindrical (radial, angular, vertical) momentum slots, present only
    /// under the hybrid-momentum capability.
    pub umr: Option<usize>,
    pub uml: Option<usize>,
    pub ump: Option<usize>,
    pub ushk: Option<usize>,
    /// NSE chemical potentials (proton, neutron).
    pub umup: Option<usize>,
    pub umun: Option<usize>,
    /// First species slot.
    pub ufs: usize,
    pub n_species: usize,
    /// Total number of conserved slots.
    pub n: usize,
}

impl VarLayout {
    pub fn new(caps: &Capabilities, n_species: usize) -> Self {
        let mut next = 7;
        let (umr, uml, ump) = if caps.hybrid_momentum {
            next += 3;
            (Some(next - 3), Some(next - 2), Some(next - 1))
        } else {
            (None, None, None)
        };
        let ushk = if caps.shock_var {
            next += 1;
            Some(next - 1)
        } else {
            None
        };
        let (umup, umun) = if caps.nse_net {
            next += 2;
            (Some(next - 2), Some(next - 1))
        } else {
            (None, None)
        };
        let ufs = next;
        next += n_species;
        Self {
            urho: 0,
            umx: 1,
            ueden: 4,
            ueint: 5,
            utemp: 6,
            umr,
            uml,
            ump,
            ushk,
            umup,
            umun,
            ufs,
            n_species,
            n: next,
        }
    }

    /// Momentum slot for a canonical axis offset (0/1/2).
    pub fn mom(&self, axis: usize) -> usize {
        self.umx + axis
    }
}

/// Slot layout of the primitive zone state.
#[derive(Clone, Copy, Debug)]
pub struct PrimLayout {
    pub qrho: usize,
    /// First of three velocity slots, ordered x/y/z.
    pub qu: usize,
    pub qpres: usize,
    pub qreint: usize,
    pub qtemp: usize,
    pub qfs: usize,
    pub n_species: usize,
    pub n: usize,
}

impl PrimLayout {
    pub fn new(n_species: usize) -> Self {
        Self {
            qrho: 0,
            qu: 1,
            qpres: 4,
            qreint: 5,
            qtemp: 6,
            qfs: 7,
            n_species,
            n: 7 + n_species,
        }
    }

    /// Velocity slot for a canonical axis offset (0/1/2).
    pub fn vel(&self, axis: usize) -> usize {
        self.qu + axis
    }

    /// Paired (conserved, primitive) slots of the passively-advected scalars.
    pub fn passive_map<'a>(
        &'a self,
        vars: &'a VarLayout,
    ) -> impl Iterator<Item = (usize, usize)> + 'a {
        (0..self.n_species).map(move |s| (vars.ufs + s, self.qfs + s))
    }
}

/// Slot layout of the reduced Godunov interface state.
#[derive(Clone, Copy, Debug)]
pub struct GdLayout {
    /// Density is carried only when the hybrid-momentum correction needs it.
    pub gdrho: Option<usize>,
    /// First of three velocity slots, ordered x/y/z.
    pub gdu: usize,
    pub gdpres: usize,
    /// First flux-limiter slot, one per radiation group.
    pub gdlams: Option<usize>,
    /// First group-energy slot, one per radiation group.
    pub gderads: Option<usize>,
    pub n: usize,
}

impl GdLayout {
    pub fn new(caps: &Capabilities) -> Self {
        let mut next = 0;
        let gdrho = if caps.hybrid_momentum {
            next += 1;
            Some(next - 1)
        } else {
            None
        };
        let gdu = next;
        next += 3;
        let gdpres = next;
        next += 1;
        let (gdlams, gderads) = match caps.radiation {
            Some(rad) => {
                let lams = next;
                next += rad.ngroups;
                let erads = next;
                next += rad.ngroups;
                (Some(lams), Some(erads))
            }
            None => (None, None),
        };
        Self { gdrho, gdu, gdpres, gdlams, gderads, n: next }
    }

    pub fn vel(&self, axis: usize) -> usize {
        self.gdu + axis
    }
}
