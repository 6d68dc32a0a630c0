//! Square patch tiling of raster images and reassembly of patch grids.

mod common;
mod image;

pub mod config;
pub mod encoding;
pub mod grid;
pub mod manifest;
pub mod patcher;
pub mod reassembler;
pub mod storage;

pub mod prelude;

pub use prelude::*;
