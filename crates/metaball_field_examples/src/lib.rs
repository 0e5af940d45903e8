#![forbid(unsafe_code)]

mod rendering;
mod walkers;

pub use rendering::{init_tracing, save_surface_png, RenderConfig};
pub use walkers::{Walker, Walkers};
