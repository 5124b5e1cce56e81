use std::sync::Arc;

use pixels::{Pixels, SurfaceTexture};
use thiserror::Error;
use winit::window::Window;

use crate::app::SceneContext;

use super::raster::{draw_scene, Canvas};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Pixels(#[from] pixels::Error),
    #[error("failed to resize surface: {0}")]
    Surface(#[from] pixels::TextureError),
}

pub struct Renderer {
    pixels: Pixels<'static>,
    canvas_width: u32,
    canvas_height: u32,
}

impl Renderer {
    pub fn new(
        window: Arc<Window>,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Result<Self, RenderError> {
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width.max(1), size.height.max(1), window);
        let pixels = Pixels::new(canvas_width, canvas_height, surface)?;
        Ok(Self {
            pixels,
            canvas_width,
            canvas_height,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels.resize_surface(width, height)?;
        Ok(())
    }

    pub fn render(&mut self, ctx: &SceneContext) -> Result<(), RenderError> {
        let mut canvas = Canvas {
            frame: self.pixels.frame_mut(),
            width: self.canvas_width,
            height: self.canvas_height,
        };
        draw_scene(&mut canvas, ctx);
        self.pixels.render()?;
        Ok(())
    }
}
