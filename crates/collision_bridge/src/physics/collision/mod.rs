//! Collision shape conversion
//!
//! # Architecture
//!
//! - **Asset side**: shape parameters in Havok units, stored per variant
//! - **Scene side**: plain meshes with a world matrix, freely editable
//! - **Analysis**: pure solvers recovering parameters from edited meshes
//!
//! # Module Organization
//!
//! - [`mesh`] - Vertex/face geometry of scene objects
//! - [`primitives`] - Box, capsule, sphere and hull mesh generation
//! - [`analysis`] - Inverse solvers (box info, capsule ends, hull planes)
//! - [`shape`] - Per-variant encode/decode
//!
//! # Key Types
//!
//! - [`ShapeCodec`] - Converts shape trees in both directions
//! - [`MeshGeometry`] - Editable geometry

pub mod analysis;
pub mod mesh;
pub mod primitives;
pub mod shape;

pub use analysis::{box_info, capsule_ends, BoxInfo, CapsuleInfo};
pub use mesh::MeshGeometry;
pub use shape::{ShapeCodec, DEFAULT_CONVEX_RADIUS};
