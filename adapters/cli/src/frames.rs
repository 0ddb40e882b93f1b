use anyhow::Result;
use space_shooter_rendering::{RenderingBackend, Scene};
use space_shooter_rendering_raster::{FrameWriter, RasterBackend};
use space_shooter_system_replay::{FrameIndex, FrameSink};
use space_shooter_world::{query, World};

/// Builds the rendering scene for the world's current state.
pub(crate) fn scene_from_world(world: &World) -> Scene {
    Scene::new(
        query::grid_dimensions(world),
        query::ship(world),
        &query::alive_enemies(world),
        query::bullets(world),
    )
}

/// Frame sink that rasterises every captured world and writes it to disk.
#[derive(Debug)]
pub(crate) struct FrameRecorder {
    backend: RasterBackend,
    writer: FrameWriter,
}

impl FrameRecorder {
    pub(crate) fn new(backend: RasterBackend, writer: FrameWriter) -> Self {
        Self { backend, writer }
    }

    pub(crate) fn writer(&self) -> &FrameWriter {
        &self.writer
    }
}

impl FrameSink for FrameRecorder {
    fn capture(&mut self, frame: FrameIndex, world: &World) -> Result<()> {
        let canvas = self.backend.render(&scene_from_world(world))?;
        let _ = self.writer.write(frame.get(), &canvas)?;
        Ok(())
    }
}
