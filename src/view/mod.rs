// VIEW: Projection, painting, and presentation
pub mod render;
pub mod gpu_init;
pub mod painter;

pub use render::{Frame, IsoRenderer, RenderScene};
pub use gpu_init::GpuContext;
pub use painter::FramePainter;
