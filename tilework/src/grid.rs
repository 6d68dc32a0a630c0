//! Patch grid geometry and patch file naming.

use serde::{Deserialize, Serialize};

/// Grid position of a patch. Ordering is row-major.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PatchCoord {
    pub row: u32,
    pub col: u32,
}

impl PatchCoord {
    pub const ORIGIN: PatchCoord = PatchCoord { row: 0, col: 0 };

    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for PatchCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: u32,
    pub cols: u32,
}

impl GridShape {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// Full patches that fit into a `width`×`height` image. Remainder strips are dropped.
    pub fn for_image(width: u32, height: u32, patch_size: u32) -> Self {
        debug_assert!(patch_size > 0);

        Self {
            rows: height / patch_size,
            cols: width / patch_size,
        }
    }

    pub fn len(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, coord: PatchCoord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    /// Coordinate of the `index`-th cell in row-major order.
    pub fn coord_at(&self, index: usize) -> PatchCoord {
        debug_assert!(index < self.len());

        let cols = self.cols as usize;
        PatchCoord::new((index / cols) as u32, (index % cols) as u32)
    }

    /// All cells in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = PatchCoord> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| PatchCoord::new(row, col)))
    }
}

impl std::fmt::Display for GridShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Patch file naming convention.
///
/// `Canonical` is what the patcher writes. `Legacy` (`{row}_{col}-NNNN.png`) is
/// produced by some upscaling pipelines and is only accepted as reassembly input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchNaming {
    #[default]
    Canonical,
    Legacy,
}

const PATCH_EXTENSION: &str = ".png";
const LEGACY_SUFFIX: &str = "-0000";

impl PatchNaming {
    pub fn file_name(&self, coord: PatchCoord) -> String {
        match self {
            PatchNaming::Canonical => format!("{}_{}{}", coord.row, coord.col, PATCH_EXTENSION),
            PatchNaming::Legacy => format!(
                "{}_{}{}{}",
                coord.row, coord.col, LEGACY_SUFFIX, PATCH_EXTENSION
            ),
        }
    }
}

/// Recovers the grid coordinate from a patch file name.
///
/// The row is the last character of the text before the first `_`, the column the
/// first character after it. Only single-digit indices are recoverable: `12_3.png`
/// parses as row 2, column 3. Grids with ten or more rows or columns need a manifest.
///
/// Anything after the column digit must be `.png` (canonical) or `-<digits>.png`
/// (legacy), otherwise the name is rejected.
pub fn parse_patch_file_name(name: &str) -> Option<(PatchCoord, PatchNaming)> {
    let (head, tail) = name.split_once('_')?;

    let row = head.chars().last()?.to_digit(10)?;
    let mut tail_chars = tail.chars();
    let col = tail_chars.next()?.to_digit(10)?;
    let rest = tail_chars.as_str();

    let naming = if rest == PATCH_EXTENSION {
        PatchNaming::Canonical
    } else {
        let digits = rest.strip_prefix('-')?.strip_suffix(PATCH_EXTENSION)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        PatchNaming::Legacy
    };

    Some((PatchCoord::new(row, col), naming))
}
