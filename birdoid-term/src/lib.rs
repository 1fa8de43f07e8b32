pub mod app;
pub mod cli;
pub mod render;

pub use app::{build_flock, run_frames, run_headless, run_interactive};
pub use cli::Args;
pub use render::{FrameBuffer, Renderer, TerminalRenderer};
