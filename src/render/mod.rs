pub mod renderer;

pub use renderer::{RenderView, Renderer};
