pub mod config;
pub mod dpx;
pub mod overlay;
pub mod rect;
pub mod render;
pub mod sequence;
