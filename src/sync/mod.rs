pub mod threadsafe_queue;
pub mod frame_windows;

pub use threadsafe_queue::ThreadsafeQueue;
pub use frame_windows::{FrameWindowSummary,preintegrate_between_frames};
