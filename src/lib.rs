//! Mesh gradient rasterization
//!
//! Paints PDF-type-7 style cubic Bezier patches (the primitive behind SVG
//! mesh gradients) directly into a row-major RGBA byte buffer using
//! integer forward differences.
//!
//! How does this work
//!
//!   draw_patch
//!     patch_bounds / visibility   -- skip, split or walk
//!     split                       -- de Casteljau halves, v axis only
//!     rasterize_patch             -- FD over v, one curve per step
//!       draw_curve
//!         curve_bounds / visibility
//!         rasterize_curve         -- fixed point FD over u
//!           draw_pixel            -- bounds checked overwrite
//!
//! Geometry is f64 down to the walk loops; the walks themselves are
//! integer adds and shifts only. Sampling steps are chosen so adjacent
//! samples are at most 1/sqrt(2) apart, so no covered pixel is skipped.

pub mod bezier;
pub mod buffer;
pub mod clip;
pub mod color;
pub mod coons;
pub mod error;
pub mod fd;
pub mod fixed;
pub mod ppm;
pub mod raster;

pub use crate::bezier::*;
pub use crate::buffer::*;
pub use crate::clip::*;
pub use crate::color::*;
pub use crate::coons::*;
pub use crate::error::*;
pub use crate::fd::*;
pub use crate::fixed::*;
pub use crate::raster::*;
