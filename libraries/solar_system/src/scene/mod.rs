pub mod components;
pub mod error;
pub mod manifest;

pub use error::SceneLoadError;
pub use manifest::{BodyDescriptor, CameraConfig, SystemManifest};
