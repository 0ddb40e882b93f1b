#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for space shooter adapters.
//!
//! Backends receive a [`Scene`] built purely from core snapshots and draw it
//! using the pixel geometry described by [`FrameLayout`] and the colours of a
//! [`Palette`]. Both can be tuned through a TOML [`Theme`].

use anyhow::Result as AnyResult;
use glam::Vec2;
use serde::Deserialize;
use space_shooter_core::{EnemyView, GridCoord, GridDimensions, ShipSnapshot};
use thiserror::Error;

/// Opaque RGB color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    /// Red channel intensity.
    pub red: u8,
    /// Green channel intensity.
    pub green: u8,
    /// Blue channel intensity.
    pub blue: u8,
}

impl Color {
    /// Creates a new color from byte RGB values.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses a `#rrggbb` hexadecimal color; the leading `#` is optional.
    pub fn from_hex(value: &str) -> Result<Self, RenderingError> {
        let invalid = || RenderingError::InvalidColor {
            value: value.to_owned(),
        };
        let digits = value.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|digit| digit.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };

        Ok(Self::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Channels as an `[r, g, b]` byte triple.
    #[must_use]
    pub const fn to_array(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }
}

impl TryFrom<String> for Color {
    type Error = RenderingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

/// Number of enemy intensity tiers distinguished by the palette.
pub const ENEMY_TIERS: usize = 4;

/// Colors used to draw every element of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Fill behind the grid.
    pub background: Color,
    /// Fill of grid cells without a living enemy.
    pub empty_cell: Color,
    /// Fill of the ship.
    pub ship: Color,
    /// Fill of bullets.
    pub bullet: Color,
    /// Enemy fills indexed by current health, weakest first.
    pub enemy: [Color; ENEMY_TIERS],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgb(13, 17, 23),
            empty_cell: Color::from_rgb(22, 27, 34),
            ship: Color::from_rgb(88, 166, 255),
            bullet: Color::from_rgb(255, 223, 0),
            enemy: [
                Color::from_rgb(0, 109, 50),
                Color::from_rgb(38, 166, 65),
                Color::from_rgb(57, 211, 83),
                Color::from_rgb(87, 242, 135),
            ],
        }
    }
}

impl Palette {
    /// Fill for an enemy with the provided current health.
    ///
    /// Health outside `1..=4` has no tier of its own and uses the weakest tier.
    #[must_use]
    pub fn enemy_color(&self, health: u32) -> Color {
        let tier = usize::try_from(health)
            .ok()
            .filter(|tier| (1..=ENEMY_TIERS).contains(tier))
            .unwrap_or(1);
        self.enemy[tier - 1]
    }
}

/// Pixel metrics of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutMetrics {
    /// Side length of a cell in pixels.
    pub cell_size: u32,
    /// Gap between neighbouring cells in pixels.
    pub cell_spacing: u32,
    /// Margin around the grid reserved for the ship.
    pub padding: u32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            cell_size: 12,
            cell_spacing: 2,
            padding: 40,
        }
    }
}

/// Horizontal distance between the padding edge and the ship while it enters.
pub const SHIP_ENTRY_OFFSET: f32 = 20.0;

/// Radius of a bullet in pixels.
pub const BULLET_RADIUS: f32 = 3.0;

/// Largest frame width or height, in pixels, a layout may describe.
pub const MAX_FRAME_SIDE: u32 = 16_384;

/// Pixel geometry of a frame for a grid of known dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameLayout {
    dimensions: GridDimensions,
    metrics: LayoutMetrics,
    pitch: u32,
    width: u32,
    height: u32,
}

impl FrameLayout {
    /// Creates a layout for the grid.
    ///
    /// Rejects a zero cell size and metrics whose frame would exceed
    /// [`MAX_FRAME_SIDE`] on either side.
    pub fn new(dimensions: GridDimensions, metrics: LayoutMetrics) -> Result<Self, RenderingError> {
        if metrics.cell_size == 0 {
            return Err(RenderingError::InvalidCellSize);
        }

        let too_large = || RenderingError::FrameTooLarge {
            limit: MAX_FRAME_SIDE,
        };
        let pitch = metrics
            .cell_size
            .checked_add(metrics.cell_spacing)
            .ok_or_else(too_large)?;
        let side = |cells: u32| {
            cells
                .checked_mul(pitch)
                .and_then(|grid| metrics.padding.checked_mul(2)?.checked_add(grid))
                .filter(|side| *side <= MAX_FRAME_SIDE)
                .ok_or_else(too_large)
        };
        let width = side(dimensions.weeks())?;
        let height = side(dimensions.days())?;

        Ok(Self {
            dimensions,
            metrics,
            pitch,
            width,
            height,
        })
    }

    /// Grid dimensions the layout was built for.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Pixel metrics used by the layout.
    #[must_use]
    pub const fn metrics(&self) -> LayoutMetrics {
        self.metrics
    }

    /// Distance between the origins of neighbouring cells.
    #[must_use]
    pub const fn pitch(&self) -> u32 {
        self.pitch
    }

    /// Width of the frame in pixels, padding included.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the frame in pixels, padding included.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Upper-left pixel of the cell. Cells outside the grid extrapolate.
    #[must_use]
    pub fn cell_origin(&self, cell: GridCoord) -> Vec2 {
        let pitch = self.pitch() as f32;
        let padding = self.metrics.padding as f32;
        Vec2::new(
            padding + cell.week() as f32 * pitch,
            padding + cell.day() as f32 * pitch,
        )
    }

    /// Point the ship's nose is anchored to.
    ///
    /// An entering ship is parked in the left margin at its day's row.
    #[must_use]
    pub fn ship_anchor(&self, ship: &ShipPresentation) -> Vec2 {
        if ship.entering {
            let padding = self.metrics.padding as f32;
            Vec2::new(
                padding - SHIP_ENTRY_OFFSET,
                padding + ship.cell.day() as f32 * self.pitch() as f32,
            )
        } else {
            self.cell_origin(ship.cell)
        }
    }

    /// Right-pointing triangle drawn for the ship: back top, back bottom, nose.
    #[must_use]
    pub fn ship_triangle(&self, ship: &ShipPresentation) -> [Vec2; 3] {
        let anchor = self.ship_anchor(ship);
        let size = self.metrics.cell_size as f32;
        [
            Vec2::new(anchor.x - size, anchor.y),
            Vec2::new(anchor.x - size, anchor.y + size),
            Vec2::new(anchor.x, anchor.y + (self.metrics.cell_size / 2) as f32),
        ]
    }

    /// Center of the bullet drawn for a shot at the cell.
    #[must_use]
    pub fn bullet_center(&self, cell: GridCoord) -> Vec2 {
        let half = (self.metrics.cell_size / 2) as f32;
        self.cell_origin(cell) + Vec2::splat(half)
    }
}

/// Ship as presented in a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShipPresentation {
    /// Cell the ship occupies.
    pub cell: GridCoord,
    /// Whether the ship is still left of the grid.
    pub entering: bool,
}

impl From<ShipSnapshot> for ShipPresentation {
    fn from(snapshot: ShipSnapshot) -> Self {
        Self {
            cell: snapshot.cell,
            entering: snapshot.is_entering(),
        }
    }
}

/// Living enemy as presented in a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemyPresentation {
    /// Cell the enemy occupies.
    pub cell: GridCoord,
    /// Health left, selects the intensity tier.
    pub health: u32,
    /// Health the enemy started with.
    pub max_health: u32,
}

/// Scene description combining the grid, its inhabitants and bullets.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Grid drawn as empty cells beneath everything else.
    pub dimensions: GridDimensions,
    /// Ship drawn on top of everything else.
    pub ship: ShipPresentation,
    /// Living enemies in creation order.
    pub enemies: Vec<EnemyPresentation>,
    /// Cells targeted by the bullets on screen.
    pub bullets: Vec<GridCoord>,
}

impl Scene {
    /// Creates a scene from world snapshots. Destroyed enemies are skipped.
    #[must_use]
    pub fn new<B>(dimensions: GridDimensions, ship: ShipSnapshot, enemies: &EnemyView, bullets: B) -> Self
    where
        B: IntoIterator<Item = GridCoord>,
    {
        Self {
            dimensions,
            ship: ship.into(),
            enemies: enemies
                .iter()
                .filter(|enemy| enemy.is_alive())
                .map(|enemy| EnemyPresentation {
                    cell: enemy.cell,
                    health: enemy.health,
                    max_health: enemy.max_health,
                })
                .collect(),
            bullets: bullets.into_iter().collect(),
        }
    }
}

/// Visual tuning loaded from a TOML document. Every key is optional.
///
/// ```toml
/// [palette]
/// background = "#0d1117"
/// enemy = ["#0e4429", "#006d32", "#26a641", "#39d353"]
///
/// [layout]
/// cell_size = 10
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Theme {
    palette: PaletteOverrides,
    layout: LayoutOverrides,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PaletteOverrides {
    background: Option<Color>,
    empty_cell: Option<Color>,
    ship: Option<Color>,
    bullet: Option<Color>,
    enemy: Option<[Color; ENEMY_TIERS]>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LayoutOverrides {
    cell_size: Option<u32>,
    cell_spacing: Option<u32>,
    padding: Option<u32>,
}

impl Theme {
    /// Parses a theme from TOML source.
    pub fn from_toml_str(source: &str) -> Result<Self, RenderingError> {
        let theme: Self = toml::from_str(source).map_err(RenderingError::InvalidTheme)?;
        if theme.layout.cell_size == Some(0) {
            return Err(RenderingError::InvalidCellSize);
        }
        Ok(theme)
    }

    /// Default palette with the theme's overrides applied.
    #[must_use]
    pub fn palette(&self) -> Palette {
        let defaults = Palette::default();
        let overrides = &self.palette;
        Palette {
            background: overrides.background.unwrap_or(defaults.background),
            empty_cell: overrides.empty_cell.unwrap_or(defaults.empty_cell),
            ship: overrides.ship.unwrap_or(defaults.ship),
            bullet: overrides.bullet.unwrap_or(defaults.bullet),
            enemy: overrides.enemy.unwrap_or(defaults.enemy),
        }
    }

    /// Default layout metrics with the theme's overrides applied.
    #[must_use]
    pub fn metrics(&self) -> LayoutMetrics {
        let defaults = LayoutMetrics::default();
        let overrides = &self.layout;
        LayoutMetrics {
            cell_size: overrides.cell_size.unwrap_or(defaults.cell_size),
            cell_spacing: overrides.cell_spacing.unwrap_or(defaults.cell_spacing),
            padding: overrides.padding.unwrap_or(defaults.padding),
        }
    }
}

/// Rendering backend capable of turning scenes into frames.
pub trait RenderingBackend {
    /// Frame representation produced by the backend.
    type Frame;

    /// Draws the scene into a new frame.
    fn render(&mut self, scene: &Scene) -> AnyResult<Self::Frame>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Error)]
pub enum RenderingError {
    /// A color string was not of the form `#rrggbb`.
    #[error("'{value}' is not a #rrggbb color")]
    InvalidColor {
        /// Text that failed to parse.
        value: String,
    },
    /// Cells must be at least one pixel wide.
    #[error("cell_size must be positive")]
    InvalidCellSize,
    /// The frame described by the metrics would be wider or taller than allowed.
    #[error("frame would exceed {limit} pixels per side")]
    FrameTooLarge {
        /// Largest permitted width or height.
        limit: u32,
    },
    /// The theme document could not be parsed.
    #[error("could not parse theme: {0}")]
    InvalidTheme(#[source] toml::de::Error),
}
