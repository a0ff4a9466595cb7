pub mod animation;
pub mod event_loop;
pub mod text_surface;

pub use animation::RenderState;
pub use event_loop::{run_ui, RenderCommand};
pub use text_surface::{ConsoleSurface, RecordingSurface, TextSurface};
