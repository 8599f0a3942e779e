//! In-process service registry.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;
use tracing::info;

use crate::handle::RemoteHandle;
use crate::transport::Transport;

/// Maps service names to endpoints.
///
/// The manager owns its endpoints. Callers receive weak `RemoteHandle`s, so
/// removing a service kills every handle to it.
#[derive(Default)]
pub struct ServiceManager {
    services: DashMap<String, Arc<dyn Transport>>,
}

impl ServiceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `transport` under `name`, replacing any previous endpoint.
    pub fn add_service(&self, name: impl Into<String>, transport: Arc<dyn Transport>) {
        let name = name.into();
        info!("registering service {name}");
        self.services.insert(name, transport);
    }

    /// Returns a handle to `name`, or an unbound handle if nothing is registered.
    pub fn get_service(&self, name: &str) -> RemoteHandle {
        match self.services.get(name) {
            Some(entry) => RemoteHandle::new(entry.value()),
            None => {
                debug!("service {name} not found");
                RemoteHandle::unbound()
            }
        }
    }

    /// Drops the endpoint for `name`. Returns true if it was registered.
    pub fn remove_service(&self, name: &str) -> bool {
        self.services.remove(name).is_some()
    }

    /// Registered names, sorted.
    pub fn list_services(&self) -> Vec<String> {
        let mut names: Vec<String> = self.services.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}
