use std::sync::Arc;

use crate::database::{BaselineWriter, ListStore};
use crate::handlers::baselines;
use crate::list::{ListOptions, RegistryError};

/// Listing configuration of every resource, built once at start-up.
#[derive(Debug)]
pub struct Resources {
    pub baselines: ListOptions,
    pub baseline_systems: ListOptions,
}

impl Resources {
    pub fn build() -> Result<Self, RegistryError> {
        Ok(Self {
            baselines: baselines::list::options()?,
            baseline_systems: baselines::systems::options()?,
        })
    }
}

/// Shared handler state. Everything in it is read-only after start-up.
#[derive(Clone)]
pub struct AppState {
    pub lists: Arc<dyn ListStore>,
    pub baselines: Arc<dyn BaselineWriter>,
    pub resources: Arc<Resources>,
}

impl AppState {
    pub fn new<S>(store: Arc<S>, resources: Resources) -> Self
    where
        S: ListStore + BaselineWriter + 'static,
    {
        Self {
            lists: store.clone(),
            baselines: store,
            resources: Arc::new(resources),
        }
    }
}
