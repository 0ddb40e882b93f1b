#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Software rendering backend that rasterises scenes into RGB frames.
//!
//! Frames are drawn back to front: background, empty grid, living enemies,
//! bullets and finally the ship. [`FrameWriter`] stores each frame as a
//! binary PPM image in an output directory.

mod canvas;

pub use self::canvas::Canvas;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::debug;
use space_shooter_core::GridCoord;
use space_shooter_rendering::{
    FrameLayout, Palette, RenderingBackend, Scene, BULLET_RADIUS,
};

/// Rendering backend drawing scenes onto in-memory canvases.
#[derive(Clone, Debug)]
pub struct RasterBackend {
    layout: FrameLayout,
    palette: Palette,
}

impl RasterBackend {
    /// Creates a backend drawing with the provided geometry and colors.
    #[must_use]
    pub const fn new(layout: FrameLayout, palette: Palette) -> Self {
        Self { layout, palette }
    }

    /// Geometry used for every frame.
    #[must_use]
    pub const fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    fn draw_grid(&self, canvas: &mut Canvas, scene: &Scene) {
        let size = self.layout.metrics().cell_size as f32;
        for week in 0..scene.dimensions.weeks() {
            for day in 0..scene.dimensions.days() {
                let cell = GridCoord::from_indices(week as usize, day as usize);
                canvas.fill_square(self.layout.cell_origin(cell), size, self.palette.empty_cell);
            }
        }
    }

    fn draw_enemies(&self, canvas: &mut Canvas, scene: &Scene) {
        let size = self.layout.metrics().cell_size as f32;
        for enemy in &scene.enemies {
            let color = self.palette.enemy_color(enemy.health);
            canvas.fill_square(self.layout.cell_origin(enemy.cell), size, color);
        }
    }

    fn draw_bullets(&self, canvas: &mut Canvas, scene: &Scene) {
        for bullet in &scene.bullets {
            let center = self.layout.bullet_center(*bullet);
            canvas.fill_circle(center, BULLET_RADIUS, self.palette.bullet);
        }
    }

    fn draw_ship(&self, canvas: &mut Canvas, scene: &Scene) {
        let corners = self.layout.ship_triangle(&scene.ship);
        canvas.fill_triangle(corners, self.palette.ship);
    }
}

impl RenderingBackend for RasterBackend {
    type Frame = Canvas;

    fn render(&mut self, scene: &Scene) -> Result<Canvas> {
        if scene.dimensions != self.layout.dimensions() {
            anyhow::bail!(
                "scene spans {} weeks but the layout was built for {}",
                scene.dimensions.weeks(),
                self.layout.dimensions().weeks()
            );
        }

        let mut canvas = Canvas::new(
            self.layout.width(),
            self.layout.height(),
            self.palette.background,
        )?;
        self.draw_grid(&mut canvas, scene);
        self.draw_enemies(&mut canvas, scene);
        self.draw_bullets(&mut canvas, scene);
        self.draw_ship(&mut canvas, scene);
        Ok(canvas)
    }
}

/// Encodes the canvas as a binary (P6) portable pixmap.
#[must_use]
pub fn encode_ppm(canvas: &Canvas) -> Vec<u8> {
    let header = format!("P6\n{} {}\n255\n", canvas.width(), canvas.height());
    let mut bytes = Vec::with_capacity(header.len() + canvas.as_bytes().len());
    bytes.extend_from_slice(header.as_bytes());
    bytes.extend_from_slice(canvas.as_bytes());
    bytes
}

/// Writes numbered frames into a directory.
#[derive(Clone, Debug)]
pub struct FrameWriter {
    directory: PathBuf,
    written: usize,
}

impl FrameWriter {
    /// Creates the output directory if needed and prepares to write into it.
    pub fn create<P>(directory: P) -> Result<Self>
    where
        P: Into<PathBuf>,
    {
        let directory = directory.into();
        fs::create_dir_all(&directory).with_context(|| {
            format!("failed to create frame directory {}", directory.display())
        })?;
        Ok(Self {
            directory,
            written: 0,
        })
    }

    /// Directory frames are written into.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Number of frames written so far.
    #[must_use]
    pub const fn written(&self) -> usize {
        self.written
    }

    /// Path used for the frame with the provided index.
    #[must_use]
    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.directory.join(format!("frame_{index:05}.ppm"))
    }

    /// Writes the canvas as the frame with the provided index.
    pub fn write(&mut self, index: usize, canvas: &Canvas) -> Result<PathBuf> {
        let path = self.frame_path(index);
        fs::write(&path, encode_ppm(canvas))
            .with_context(|| format!("failed to write frame {}", path.display()))?;
        self.written += 1;
        debug!("wrote {}", path.display());
        Ok(path)
    }
}
