mod draw;
mod renderer;

pub use renderer::Renderer;

/// Window-sized pixel surface dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}
