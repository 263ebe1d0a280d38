//! Floating Dots library - drifting 3D points joined by lightning, with a noise drone

pub mod audio;
pub mod cli;
pub mod engine;
pub mod lightning;
pub mod params;
pub mod projection;
pub mod rendering;
pub mod scene;
pub mod sculpture;
