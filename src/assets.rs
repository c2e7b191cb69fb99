//! Sprite frames, opacity masks and the shared asset table
//!
//! Decoding image files is the provider's job. The table only keeps what the
//! simulation needs: per-frame dimensions and a per-pixel opacity mask. It is
//! loaded once at startup and entities refer into it by `ClipId`/`FrameRef`.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::settings::{SheetRole, SheetSpec};

/// Alpha values strictly above this count as opaque
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 127;

/// Number of glyphs in the digit sheet
pub const DIGIT_GLYPHS: usize = 10;

/// Errors raised while building the asset table (fatal at startup)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// No sheet in the manifest provides this role
    MissingSheet(SheetRole),
    /// Provider returned a different number of frames than configured
    FrameCount {
        sheet: String,
        expected: u32,
        found: usize,
    },
    /// A frame with zero width or height
    EmptyFrame { sheet: String, index: usize },
    /// Pixel buffer length does not match the stated dimensions
    MaskSize { expected: usize, found: usize },
    /// The manifest lists no obstacle sheets
    NoObstacles,
    /// Provider-specific failure (missing file, decode error, ...)
    Provider(String),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::MissingSheet(role) => write!(f, "no sprite sheet for role {:?}", role),
            AssetError::FrameCount {
                sheet,
                expected,
                found,
            } => write!(
                f,
                "sheet '{}' has {} frames, expected {}",
                sheet, found, expected
            ),
            AssetError::EmptyFrame { sheet, index } => {
                write!(f, "sheet '{}' frame {} is empty", sheet, index)
            }
            AssetError::MaskSize { expected, found } => {
                write!(f, "pixel buffer has {} entries, expected {}", found, expected)
            }
            AssetError::NoObstacles => write!(f, "no obstacle sheets configured"),
            AssetError::Provider(msg) => write!(f, "asset provider failed: {}", msg),
        }
    }
}

impl std::error::Error for AssetError {}

/// Per-pixel opacity, stored as a row-major bitset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpacityMask {
    width: u32,
    height: u32,
    words_per_row: usize,
    bits: Vec<u64>,
}

impl OpacityMask {
    /// Fully transparent mask
    pub fn new(width: u32, height: u32) -> Self {
        let words_per_row = (width as usize).div_ceil(64);
        Self {
            width,
            height,
            words_per_row,
            bits: vec![0; words_per_row * height as usize],
        }
    }

    /// Fully opaque mask
    pub fn filled(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_, _| true)
    }

    /// Build a mask from a predicate over pixel coordinates
    pub fn from_fn(width: u32, height: u32, mut opaque: impl FnMut(u32, u32) -> bool) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if opaque(x, y) {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    /// Build a mask from one alpha byte per pixel
    pub fn from_alpha(
        width: u32,
        height: u32,
        alpha: &[u8],
        threshold: u8,
    ) -> Result<Self, AssetError> {
        let expected = width as usize * height as usize;
        if alpha.len() != expected {
            return Err(AssetError::MaskSize {
                expected,
                found: alpha.len(),
            });
        }
        Ok(Self::from_fn(width, height, |x, y| {
            alpha[y as usize * width as usize + x as usize] > threshold
        }))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn word_index(&self, x: u32, y: u32) -> (usize, u64) {
        let idx = y as usize * self.words_per_row + (x as usize >> 6);
        (idx, 1u64 << (x & 63))
    }

    pub fn set(&mut self, x: u32, y: u32, opaque: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let (idx, bit) = self.word_index(x, y);
        if opaque {
            self.bits[idx] |= bit;
        } else {
            self.bits[idx] &= !bit;
        }
    }

    /// Opacity at (x, y); out-of-bounds pixels are transparent
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let (idx, bit) = self.word_index(x, y);
        self.bits[idx] & bit != 0
    }

    /// Number of opaque pixels
    pub fn count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// First pixel (in this mask's coordinates) where both masks are opaque.
    ///
    /// `offset` is the other mask's origin relative to this mask's origin.
    /// The rectangle intersection only narrows the search; the answer comes
    /// from the pixels themselves.
    pub fn overlap(&self, other: &OpacityMask, offset: (i32, i32)) -> Option<(u32, u32)> {
        let (ox, oy) = (offset.0 as i64, offset.1 as i64);
        let x0 = ox.max(0);
        let y0 = oy.max(0);
        let x1 = (self.width as i64).min(ox + other.width as i64);
        let y1 = (self.height as i64).min(oy + other.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }

        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x as u32, y as u32) && other.get((x - ox) as u32, (y - oy) as u32) {
                    return Some((x as u32, y as u32));
                }
            }
        }
        None
    }
}

/// One animation frame: dimensions plus opacity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub mask: OpacityMask,
}

impl Frame {
    pub fn new(mask: OpacityMask) -> Self {
        Self { mask }
    }

    /// Frame from tightly packed RGBA8 pixels (opacity from the alpha channel)
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self, AssetError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(AssetError::MaskSize {
                expected,
                found: rgba.len(),
            });
        }
        let alpha: Vec<u8> = rgba.chunks_exact(4).map(|px| px[3]).collect();
        let mask = OpacityMask::from_alpha(width, height, &alpha, DEFAULT_ALPHA_THRESHOLD)?;
        Ok(Self { mask })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.mask.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.mask.height()
    }
}

/// Index of a clip in the asset table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClipId(pub usize);

/// Lightweight handle to one frame of a clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRef {
    pub clip: ClipId,
    pub index: usize,
}

/// An ordered, circular sequence of frames
#[derive(Debug, Clone)]
pub struct Clip {
    pub name: String,
    pub frames: Vec<Frame>,
}

impl Clip {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame at `index`, wrapping around the clip
    pub fn frame(&self, index: usize) -> &Frame {
        &self.frames[index % self.frames.len()]
    }
}

/// An obstacle sprite variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstacleVariant {
    pub clip: ClipId,
    pub flying: bool,
}

/// Source of decoded, pre-sliced sprite sheets
pub trait AssetProvider {
    /// Return the frames of `sheet`, in order
    fn load_sheet(&mut self, sheet: &SheetSpec) -> Result<Vec<Frame>, AssetError>;
}

/// All clips used by a session, loaded once
#[derive(Debug, Clone)]
pub struct AssetTable {
    clips: Vec<Clip>,
    pub player_run: ClipId,
    pub player_duck: ClipId,
    pub player_jump: ClipId,
    pub ground: ClipId,
    pub cloud: ClipId,
    pub digits: ClipId,
    pub high_label: ClipId,
    pub obstacles: Vec<ObstacleVariant>,
}

impl AssetTable {
    /// Load every sheet in the manifest through `provider` and index clips by role
    pub fn load(
        provider: &mut dyn AssetProvider,
        sheets: &[SheetSpec],
    ) -> Result<Self, AssetError> {
        let mut clips = Vec::with_capacity(sheets.len());
        let mut roles: HashMap<SheetRole, ClipId> = HashMap::new();
        let mut obstacles = Vec::new();

        for spec in sheets {
            let frames = provider.load_sheet(spec)?;
            if frames.len() != spec.frames as usize || frames.is_empty() {
                return Err(AssetError::FrameCount {
                    sheet: spec.name.clone(),
                    expected: spec.frames,
                    found: frames.len(),
                });
            }
            if spec.role == SheetRole::Digits && frames.len() != DIGIT_GLYPHS {
                return Err(AssetError::FrameCount {
                    sheet: spec.name.clone(),
                    expected: DIGIT_GLYPHS as u32,
                    found: frames.len(),
                });
            }
            if let Some(index) = frames.iter().position(|f| f.width() == 0 || f.height() == 0) {
                return Err(AssetError::EmptyFrame {
                    sheet: spec.name.clone(),
                    index,
                });
            }

            let id = ClipId(clips.len());
            clips.push(Clip {
                name: spec.name.clone(),
                frames,
            });

            if spec.role.is_obstacle() {
                obstacles.push(ObstacleVariant {
                    clip: id,
                    flying: spec.role == SheetRole::FlyingObstacle,
                });
            } else if roles.insert(spec.role, id).is_some() {
                log::warn!("Sheet '{}' replaces an earlier {:?} sheet", spec.name, spec.role);
            }
        }

        let missing: Vec<SheetRole> = SheetRole::REQUIRED
            .into_iter()
            .filter(|r| !roles.contains_key(r))
            .collect();
        if let Some(&first) = missing.first() {
            log::error!("Sprite manifest lacks sheets for {:?}", missing);
            return Err(AssetError::MissingSheet(first));
        }
        if obstacles.is_empty() {
            return Err(AssetError::NoObstacles);
        }
        let role = |r: SheetRole| roles.get(&r).copied().ok_or(AssetError::MissingSheet(r));

        let table = Self {
            player_run: role(SheetRole::PlayerRun)?,
            player_duck: role(SheetRole::PlayerDuck)?,
            player_jump: role(SheetRole::PlayerJump)?,
            ground: role(SheetRole::Ground)?,
            cloud: role(SheetRole::Cloud)?,
            digits: role(SheetRole::Digits)?,
            high_label: role(SheetRole::HighLabel)?,
            obstacles,
            clips,
        };
        log::info!(
            "Loaded {} clips ({} obstacle variants)",
            table.clips.len(),
            table.obstacles.len()
        );
        Ok(table)
    }

    #[inline]
    pub fn clip(&self, id: ClipId) -> &Clip {
        &self.clips[id.0]
    }

    #[inline]
    pub fn frame(&self, frame: FrameRef) -> &Frame {
        self.clip(frame.clip).frame(frame.index)
    }

    /// First frame of a clip (used for sizing)
    #[inline]
    pub fn first_frame(&self, id: ClipId) -> &Frame {
        self.clip(id).frame(0)
    }

    /// Glyph frame for a decimal digit
    pub fn digit(&self, digit: u8) -> FrameRef {
        FrameRef {
            clip: self.digits,
            index: digit as usize % DIGIT_GLYPHS,
        }
    }

    pub fn high_label_frame(&self) -> FrameRef {
        FrameRef {
            clip: self.high_label,
            index: 0,
        }
    }
}

/// Provider that synthesises simple shapes instead of decoding files.
///
/// Used by the headless runner and tests; sizes follow the classic sprites.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProceduralSprites;

impl ProceduralSprites {
    pub fn new() -> Self {
        Self
    }

    fn default_size(sheet: &SheetSpec) -> (u32, u32) {
        match sheet.role {
            SheetRole::PlayerRun | SheetRole::PlayerJump => (88, 94),
            SheetRole::PlayerDuck => (118, 60),
            SheetRole::Ground => (2400, 24),
            SheetRole::Cloud => (92, 27),
            SheetRole::Digits => (20, 21),
            SheetRole::HighLabel => (38, 21),
            SheetRole::GroundObstacle => match sheet.name.as_str() {
                "cactus_large" => (50, 100),
                "cactus_cluster" => (102, 70),
                _ => (34, 70),
            },
            SheetRole::FlyingObstacle => (92, 80),
        }
    }

    fn shape(role: SheetRole, index: usize, w: u32, h: u32) -> OpacityMask {
        match role {
            // Body with two alternating legs along the bottom quarter
            SheetRole::PlayerRun | SheetRole::PlayerDuck | SheetRole::PlayerJump => {
                let leg_top = h - h / 4;
                OpacityMask::from_fn(w, h, |x, y| {
                    if y < leg_top {
                        x >= w / 8
                    } else {
                        let left = x >= w / 4 && x < w / 4 + w / 8;
                        let right = x >= w / 2 && x < w / 2 + w / 8;
                        if index % 2 == 0 { left } else { right }
                    }
                })
            }
            // Ellipse; transparent corners
            SheetRole::Cloud | SheetRole::FlyingObstacle => {
                let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);
                let flap = if index % 2 == 0 { 1.0 } else { 0.8 };
                OpacityMask::from_fn(w, h, |x, y| {
                    let dx = (x as f32 + 0.5 - cx) / cx;
                    let dy = (y as f32 + 0.5 - cy) / (cy * flap);
                    dx * dx + dy * dy <= 1.0
                })
            }
            // Trunk with arms
            SheetRole::GroundObstacle => OpacityMask::from_fn(w, h, |x, y| {
                let trunk = x >= w / 3 && x < w - w / 3;
                let arms = y > h / 4 && y < h / 2;
                trunk || arms
            }),
            _ => OpacityMask::filled(w, h),
        }
    }
}

impl AssetProvider for ProceduralSprites {
    fn load_sheet(&mut self, sheet: &SheetSpec) -> Result<Vec<Frame>, AssetError> {
        let (w, h) = Self::default_size(sheet);
        Ok((0..sheet.frames as usize)
            .map(|i| Frame::new(Self::shape(sheet.role, i, w, h)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameConfig;

    #[test]
    fn test_mask_from_alpha_threshold() {
        let alpha = [0, 127, 128, 255];
        let mask = OpacityMask::from_alpha(2, 2, &alpha, DEFAULT_ALPHA_THRESHOLD).unwrap();
        assert!(!mask.get(0, 0));
        assert!(!mask.get(1, 0));
        assert!(mask.get(0, 1));
        assert!(mask.get(1, 1));
        assert_eq!(mask.count(), 2);
    }

    #[test]
    fn test_mask_size_mismatch() {
        let err = OpacityMask::from_alpha(3, 3, &[255; 4], 127).unwrap_err();
        assert_eq!(err, AssetError::MaskSize { expected: 9, found: 4 });
    }

    #[test]
    fn test_wide_mask_bit_addressing() {
        let mut mask = OpacityMask::new(130, 2);
        mask.set(129, 1, true);
        mask.set(64, 0, true);
        assert!(mask.get(129, 1));
        assert!(mask.get(64, 0));
        assert!(!mask.get(63, 0));
        assert!(!mask.get(500, 0));
        assert_eq!(mask.count(), 2);
    }

    #[test]
    fn test_overlap_solid_boxes() {
        let a = OpacityMask::filled(10, 10);
        let b = OpacityMask::filled(10, 10);
        assert_eq!(a.overlap(&b, (5, 5)), Some((5, 5)));
        assert_eq!(a.overlap(&b, (-9, -9)), Some((0, 0)));
        assert_eq!(a.overlap(&b, (10, 0)), None);
        assert_eq!(a.overlap(&b, (0, -10)), None);
    }

    #[test]
    fn test_overlap_ignores_transparent_corners() {
        // Two diagonal halves whose bounding boxes overlap fully
        let upper = OpacityMask::from_fn(8, 8, |x, y| x > y);
        let lower = OpacityMask::from_fn(8, 8, |x, y| x < y);
        assert_eq!(upper.overlap(&lower, (0, 0)), None);
        assert!(upper.overlap(&upper, (0, 0)).is_some());
    }

    #[test]
    fn test_frame_from_rgba() {
        let rgba = [0, 0, 0, 255, 9, 9, 9, 0];
        let frame = Frame::from_rgba(2, 1, &rgba).unwrap();
        assert_eq!(frame.width(), 2);
        assert!(frame.mask.get(0, 0));
        assert!(!frame.mask.get(1, 0));
        assert!(Frame::from_rgba(2, 2, &rgba).is_err());
    }

    #[test]
    fn test_load_default_manifest() {
        let config = GameConfig::default();
        let table = AssetTable::load(&mut ProceduralSprites::new(), &config.sheets).unwrap();
        assert_eq!(table.clip(table.player_run).len(), 2);
        assert_eq!(table.clip(table.player_jump).len(), 1);
        assert_eq!(table.clip(table.digits).len(), 10);
        assert_eq!(table.obstacles.len(), 4);
        assert_eq!(table.obstacles.iter().filter(|v| v.flying).count(), 1);
        assert_eq!(table.frame(table.digit(7)).width(), 20);
    }

    #[test]
    fn test_missing_role_is_fatal() {
        let mut config = GameConfig::default();
        config.sheets.retain(|s| s.role != SheetRole::Cloud);
        let err = AssetTable::load(&mut ProceduralSprites::new(), &config.sheets).unwrap_err();
        assert_eq!(err, AssetError::MissingSheet(SheetRole::Cloud));
    }

    #[test]
    fn test_first_missing_role_reported() {
        let mut config = GameConfig::default();
        config
            .sheets
            .retain(|s| !matches!(s.role, SheetRole::HighLabel | SheetRole::PlayerDuck));
        let err = AssetTable::load(&mut ProceduralSprites::new(), &config.sheets).unwrap_err();
        assert_eq!(err, AssetError::MissingSheet(SheetRole::PlayerDuck));
    }

    #[test]
    fn test_no_obstacles_is_fatal() {
        let mut config = GameConfig::default();
        config.sheets.retain(|s| !s.role.is_obstacle());
        let err = AssetTable::load(&mut ProceduralSprites::new(), &config.sheets).unwrap_err();
        assert_eq!(err, AssetError::NoObstacles);
    }

    struct ShortProvider;

    impl AssetProvider for ShortProvider {
        fn load_sheet(&mut self, _sheet: &SheetSpec) -> Result<Vec<Frame>, AssetError> {
            Ok(vec![Frame::new(OpacityMask::filled(4, 4))])
        }
    }

    #[test]
    fn test_frame_count_mismatch() {
        let config = GameConfig::default();
        let err = AssetTable::load(&mut ShortProvider, &config.sheets).unwrap_err();
        assert!(matches!(err, AssetError::FrameCount { expected: 2, found: 1, .. }));
    }
}
