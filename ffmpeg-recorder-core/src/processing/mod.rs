pub mod pacing;
pub mod sample_queue;
