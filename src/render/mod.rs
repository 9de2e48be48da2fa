pub mod animator;
pub mod renderer;

pub use animator::{Sprite, TileAnimator};
pub use renderer::Renderer;
