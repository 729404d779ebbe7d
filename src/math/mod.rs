pub mod color;
pub mod engine;
pub mod heightmap;
pub mod mesh;
pub mod transform;

pub use color::Gradient;
pub use engine::{LoaderEngine, LoaderResult, Scene, SceneOptions};
pub use mesh::Topology;
pub use transform::{Projection, rotate};
