//! Coordinate-system metadata and direction permutation tables.

/// Coordinate system of the underlying grid.
#[derive(Clone, Copy, PartialEq, Eq, Debug, num_enum::IntoPrimitive, num_enum::TryFromPrimitive)]
#[repr(i64)]
pub enum Coord {
    Cartesian = 0,
    Axisymmetric = 1,
    Spherical = 2,
}

/// Normal direction of an interface.
#[derive(Clone, Copy, PartialEq, Eq, Debug, num_enum::IntoPrimitive, num_enum::TryFromPrimitive)]
#[repr(usize)]
pub enum Direction {
    X = 0,
    Y = 1,
    Z = 2,
}

/// Mapping from the normal/transverse roles of a solve to canonical x/y/z
/// slot offsets. Computed once per direction and passed by value; the solvers
/// never re-derive the permutation.
#[derive(Clone, Copy, Debug)]
pub struct DirIndices {
    /// Axis offset of the normal velocity/momentum.
    pub normal: usize,
    /// Axis offset of the first transverse component.
    pub t1: usize,
    /// Axis offset of the second transverse component.
    pub t2: usize,
}

const DIR_TABLE: [DirIndices; 3] = [
    DirIndices { normal: 0, t1: 1, t2: 2 },
    DirIndices { normal: 1, t1: 0, t2: 2 },
    DirIndices { normal: 2, t1: 0, t2: 1 },
];

impl Direction {
    pub fn axes(self) -> DirIndices {
        DIR_TABLE[self as usize]
    }
}

/// Whether the pressure term belongs in the normal-momentum flux.
///
/// For the radial direction of non-Cartesian geometries the pressure is
/// handled as a geometric source term in the update instead, so it must be
/// left out of the flux here.
pub fn mom_flux_has_p(idir: Direction, normal_dir: Direction, coord: Coord) -> bool {
    match coord {
        Coord::Cartesian => true,
        Coord::Axisymmetric | Coord::Spherical => {
            !(idir == Direction::X && normal_dir == Direction::X)
        }
    }
}
