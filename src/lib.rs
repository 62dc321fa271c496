pub mod cli;
pub mod core;
pub mod playback;
pub mod plot;
