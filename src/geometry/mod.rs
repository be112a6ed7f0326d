//! Model geometry: binary STL parsing and the analysis record it produces.
//!
//! # Module structure
//!
//! ```text
//! geometry/
//! ├── analysis.rs : ModelAnalysis, BoundingBox, Complexity (plain data)
//! └── stl.rs      : binary STL analyze / encode (pure functions)
//! ```
//!
//! Nothing here touches the filesystem. Reading uploads from disk is the job
//! of [`crate::intake`].

pub mod analysis;
pub mod stl;

pub use analysis::{BoundingBox, Complexity, ModelAnalysis, Vec3};
pub use stl::{
    analyze, analyze_with, box_triangles, encode_binary, GeometryError, Triangle, VolumeMethod,
};
