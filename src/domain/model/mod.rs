//! Model lifecycle - capability traits, loaders, slots and the registry

mod capability;
mod loader;
mod registry;
mod slot;
mod status;

pub use capability::{CropModel, DiseaseModel, YieldModel};
#[cfg(test)]
pub use capability::{MockCropModel, MockDiseaseModel, MockYieldModel};
pub use loader::ModelLoader;
#[cfg(test)]
pub use loader::mock;
pub use registry::ModelRegistry;
pub use slot::ModelSlot;
pub use status::{ModelKind, ModelState, ModelStatus, RegistryStatus};
