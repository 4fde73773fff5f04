use serde::{Deserialize, Serialize};

/// Sentinel color value for an unpainted cell
pub const TRANSPARENT: &str = "transparent";

/// A single canvas cell: a color string (e.g. "#ff0000") or the transparent sentinel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pixel {
    pub color: String,
}

impl Pixel {
    pub fn transparent() -> Self {
        Self {
            color: TRANSPARENT.to_string(),
        }
    }

    pub fn solid(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.color == TRANSPARENT
    }
}

impl Default for Pixel {
    fn default() -> Self {
        Self::transparent()
    }
}

/// Rectangular pixel canvas. Rows are stored outer-first so the serialized form
/// is the 2-D array of `{color}` objects that saved projects carry.
///
/// All edits are copy-on-write: no operation mutates a grid that has already
/// been handed to the history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PixelGrid {
    rows: Vec<Vec<Pixel>>,
}

// Persisted canvases come from a host-writable store, so well-formed JSON may
// still carry a jagged or empty array. Deserialization enforces the
// rectangularity invariant the accessors index by; violations surface as a
// serde error and the caller discards the entry like any other corruption.
impl<'de> Deserialize<'de> for PixelGrid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rows = Vec::<Vec<Pixel>>::deserialize(deserializer)?;
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(serde::de::Error::custom("canvas must not be empty"));
        }
        if rows.iter().any(|row| row.len() != width) {
            return Err(serde::de::Error::custom(
                "canvas rows must all have the same length",
            ));
        }
        Ok(Self { rows })
    }
}

impl PixelGrid {
    /// Create a grid filled with transparent pixels. Dimensions below 1 are
    /// clamped so the row/column invariants always hold.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1) as usize;
        let height = height.max(1) as usize;
        Self {
            rows: vec![vec![Pixel::transparent(); width]; height],
        }
    }

    pub fn width(&self) -> u32 {
        self.rows.first().map_or(0, |row| row.len() as u32)
    }

    pub fn height(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height()
    }

    /// Pixel at (x, y), or None when out of bounds. Never panics; edge events
    /// from the host routinely land outside the canvas.
    pub fn get(&self, x: i32, y: i32) -> Option<&Pixel> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(&self.rows[y as usize][x as usize])
    }

    /// New grid equal to this one except cell (x, y). Out of bounds returns an
    /// unchanged copy.
    pub fn with_pixel(&self, x: i32, y: i32, pixel: Pixel) -> Self {
        let mut next = self.clone();
        next.set(x, y, pixel);
        next
    }

    /// In-place write, bounds-checked no-op. Only for grids that are not yet
    /// visible to the history log (fresh copies being built up).
    pub(crate) fn set(&mut self, x: i32, y: i32, pixel: Pixel) {
        if self.in_bounds(x, y) {
            self.rows[y as usize][x as usize] = pixel;
        }
    }

    /// Iterate cells row-major as (x, y, pixel)
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, &Pixel)> {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, pixel)| (x as u32, y as u32, pixel))
        })
    }
}

/// Drawing tool selected in the toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Pen,
    Eraser,
    Fill,
    Eyedropper,
}

/// Sort order for the saved project list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Most recently updated first
    #[default]
    Latest,
    /// Least recently updated first
    Oldest,
    /// Lexicographic by name
    Name,
}

/// A named canvas snapshot in the project store. Owns its grid copy; loading a
/// project copies the grid into the editor rather than aliasing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedProject {
    pub id: String,
    pub name: String,
    pub canvas: PixelGrid,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Data-URI-encoded PNG preview
    pub thumbnail: String,
    /// Epoch milliseconds
    pub created_at: u64,
    pub updated_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_colors: Option<Vec<String>>,
}
