//! Open clients and the version controlling each

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use url::Url;
use uuid::Uuid;

/// An open application window or tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub id: Uuid,
    pub url: Url,
    /// Version controlling this client, if any
    pub controller: Option<String>,
}

/// Registry of open clients
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: RwLock<HashMap<Uuid, Client>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Uuid, Client>> {
        self.clients.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Uuid, Client>> {
        self.clients.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a client, optionally already controlled by a version
    pub fn register(&self, url: Url, controller: Option<&str>) -> Uuid {
        let id = Uuid::new_v4();
        self.write().insert(
            id,
            Client {
                id,
                url,
                controller: controller.map(str::to_string),
            },
        );
        id
    }

    pub fn unregister(&self, id: &Uuid) -> bool {
        self.write().remove(id).is_some()
    }

    pub fn get(&self, id: &Uuid) -> Option<Client> {
        self.read().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Clients controlled by some version other than `version`
    pub fn controlled_by_other(&self, version: &str) -> usize {
        self.read()
            .values()
            .filter(|c| c.controller.as_deref().is_some_and(|v| v != version))
            .count()
    }

    /// Make `version` the controller of every client. Returns how many
    /// clients changed controller.
    pub fn claim(&self, version: &str) -> usize {
        let mut clients = self.write();
        let mut claimed = 0;
        for client in clients.values_mut() {
            if client.controller.as_deref() != Some(version) {
                client.controller = Some(version.to_string());
                claimed += 1;
            }
        }
        claimed
    }
}
