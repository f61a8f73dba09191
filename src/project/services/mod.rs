//! Service layer for project registration.

pub mod probe;
pub mod registry;

pub use probe::ProjectActivityProbe;
pub use registry::{
    CreateProjectRequest, ProjectRegistryError, ProjectRegistryResult, ProjectRegistryService,
    RegisteredProject,
};
