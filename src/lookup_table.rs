//! The neighbor-pattern lookup table that drives the thinning loop.
//!
//! Every foreground pixel is classified by the configuration of its
//! eight neighbors, packed into one byte clockwise from north-west:
//!
//! ```text
//!   1   2   4
//! 128   *   8
//!  64  32  16
//! ```
//!
//! The byte indexes [`DELETION_TABLE`], which says whether the center pixel
//! may be removed without breaking connectivity, and in which subpass.

/// Whether a pixel may be deleted, and in which subpass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DeletionClass {
    Keep = 0,
    DeleteOrthogonalPass = 1,
    DeleteDiagonalPass = 2,
    DeleteEitherPass = 3,
}

/// One of the two alternating subpasses of an outer thinning iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Subpass {
    /// Removes pixels on the north, east, south and west borders of the shape.
    Orthogonal,

    /// Removes pixels on the diagonal borders of the shape.
    Diagonal,
}

/// The deletion class of every neighbor pattern, as the raw `u8` of [`DeletionClass`].
/// Entries must stay in sync with the bit order of [`neighbor_pattern`].
pub static DELETION_TABLE: [u8; 256] = [
    0, 0, 0, 1, 0, 0, 1, 3, 0, 0, 3, 1, 1, 0, 1, 3,
    0, 0, 0, 0, 0, 0, 0, 0, 2, 0, 2, 0, 3, 0, 3, 3,
    0, 0, 0, 0, 0, 0, 0, 0, 3, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, 3, 0, 2, 2,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    2, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, 2, 0, 0, 0,
    3, 0, 0, 0, 0, 0, 0, 0, 3, 0, 0, 0, 3, 0, 2, 0,
    0, 0, 3, 1, 0, 0, 1, 3, 0, 0, 0, 0, 0, 0, 0, 1,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
    3, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    2, 3, 1, 3, 0, 0, 1, 3, 0, 0, 0, 0, 0, 0, 0, 1,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    2, 3, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0,
    3, 3, 0, 1, 0, 0, 0, 0, 2, 2, 0, 0, 2, 0, 0, 0,
];

impl DeletionClass {
    /// Look up the class of a neighbor pattern.
    #[inline(always)]
    pub fn of(pattern: u8) -> Self {
        Self::from_u8(DELETION_TABLE[pattern as usize])
    }

    /// Convert a raw table entry. Only the lowest two bits are considered.
    #[inline]
    pub fn from_u8(value: u8) -> Self {
        match value & 0b11 {
            0 => DeletionClass::Keep,
            1 => DeletionClass::DeleteOrthogonalPass,
            2 => DeletionClass::DeleteDiagonalPass,
            _ => DeletionClass::DeleteEitherPass,
        }
    }
}

impl Subpass {
    /// Both subpasses, in the order they run within one outer iteration.
    pub const ALL: [Subpass; 2] = [Subpass::Orthogonal, Subpass::Diagonal];

    /// Whether a pixel of the specified class is removed in this subpass.
    #[inline(always)]
    pub fn deletes(self, class: DeletionClass) -> bool {
        match (self, class) {
            (_, DeletionClass::DeleteEitherPass) => true,
            (Subpass::Orthogonal, DeletionClass::DeleteOrthogonalPass) => true,
            (Subpass::Diagonal, DeletionClass::DeleteDiagonalPass) => true,
            _ => false,
        }
    }
}

/// Pack the eight neighbors of a pixel into a pattern.
/// `above`, `center` and `below` are the three-cell windows of a 0/1 grid
/// around the pixel, one per row. Windows of any other width have no neighbors.
#[inline(always)]
pub fn neighbor_pattern(above: &[u8], center: &[u8], below: &[u8]) -> u8 {
    match (above, center, below) {
        (&[north_west, north, north_east], &[west, _, east], &[south_west, south, south_east]) => {
            north_west
                | north << 1
                | north_east << 2
                | east << 3
                | south_east << 4
                | south << 5
                | south_west << 6
                | west << 7
        }

        _ => 0,
    }
}
