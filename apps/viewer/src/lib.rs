//! Model Viewer Application
//!
//! Host-side frame orchestrator: streams a mesh from disk through the
//! asset pump a chunk per frame, renders it with the software rasterizer
//! into a double-buffered screen, and can dump the final frame as PPM.

pub mod config;
pub mod fs_storage;
pub mod frame;
pub mod game_loop;
pub mod ppm;

pub use config::ViewerConfig;
pub use frame::{FrameClock, SwapChain};
pub use fs_storage::FsStorage;
pub use game_loop::{TickStatus, Viewer, ViewerError};
