//! Project library backed by a key-value store.

use std::collections::HashMap;

use tracing::{debug, info};
use uuid::Uuid;

use super::ProjectRecord;
use crate::error::{GraphError, Result};
use crate::graph_store::GraphStore;
use crate::listen::{Listener, ListenerId, Notifier};
use crate::notification::Notification;
use crate::rng::generate_seed;

/// Key under which the JSON array of projects is stored.
pub const PROJECTS_KEY: &str = "projects";

/// String key-value persistence, e.g. browser local storage or a settings file.
pub trait KeyValueStore {
    /// Read a value. `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, key: &str, value: String) -> Result<()>;
}

/// In-memory [`KeyValueStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// All saved projects plus the one currently loaded into the graph store.
#[derive(Debug)]
pub struct ProjectLibrary<S: KeyValueStore> {
    storage: S,
    projects: Vec<ProjectRecord>,
    current: Uuid,
    notifications: Notifier<Notification>,
}

impl<S: KeyValueStore> ProjectLibrary<S> {
    /// Read the saved projects and load the most recent one into `store`.
    ///
    /// With nothing saved yet, a new default project is created (but not written until the
    /// first [`save`](Self::save)).
    pub fn open(storage: S, store: &mut GraphStore) -> Result<Self> {
        let projects: Vec<ProjectRecord> = match storage.get(PROJECTS_KEY)? {
            Some(json) => serde_json::from_str(&json)?,
            None => Vec::new(),
        };
        info!(count = projects.len(), "opened project library");

        let mut library = Self {
            storage,
            projects,
            current: Uuid::nil(),
            notifications: Notifier::new(),
        };
        match library.projects.last().map(|project| project.id) {
            Some(id) => library.load(id, store)?,
            None => {
                library.create_new_project(store)?;
            }
        }
        Ok(library)
    }

    /// Subscribe to save notifications.
    pub fn listen<L: Listener<Notification> + 'static>(&self, listener: L) -> ListenerId {
        self.notifications.listen(listener)
    }

    pub fn projects(&self) -> &[ProjectRecord] {
        &self.projects
    }

    pub fn current_project(&self) -> Option<&ProjectRecord> {
        self.projects.iter().find(|project| project.id == self.current)
    }

    fn current_project_mut(&mut self) -> Option<&mut ProjectRecord> {
        let current = self.current;
        self.projects.iter_mut().find(|project| project.id == current)
    }

    /// Append a default project and make it current.
    pub fn create_new_project(&mut self, store: &mut GraphStore) -> Result<Uuid> {
        let project = ProjectRecord::default();
        let id = project.id;
        self.projects.push(project);
        self.load(id, store)?;
        Ok(id)
    }

    /// Load project `id` into `store` and make it current.
    pub fn load(&mut self, id: Uuid, store: &mut GraphStore) -> Result<()> {
        let project = self
            .projects
            .iter()
            .find(|project| project.id == id)
            .ok_or_else(|| GraphError::Storage(format!("no project with id {id}")))?;
        project.restore(store)?;
        debug!(project = %id, name = %project.name, "loaded project");
        self.current = id;
        Ok(())
    }

    /// Capture `store` into the current project and write every project back to storage.
    pub fn save(&mut self, store: &GraphStore) -> Result<()> {
        match self.write_current(store) {
            Ok(()) => {
                self.notifications
                    .notify(&Notification::success("Project saved!"));
                Ok(())
            }
            Err(err) => {
                self.notifications
                    .notify(&Notification::error("Could not save Project"));
                Err(err)
            }
        }
    }

    fn write_current(&mut self, store: &GraphStore) -> Result<()> {
        let project = self
            .current_project_mut()
            .ok_or_else(|| GraphError::Storage("no project is loaded".to_string()))?;
        project.capture(store);
        let json = serde_json::to_string(&self.projects)?;
        self.storage.set(PROJECTS_KEY, json)?;
        info!(project = %self.current, "saved project");
        Ok(())
    }

    /// Give the current project a fresh dungeon seed and return it. Not saved automatically.
    pub fn apply_new_seed(&mut self) -> Option<&str> {
        let project = self.current_project_mut()?;
        project.seed = generate_seed();
        Some(&project.seed)
    }

    /// The backing storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{NodeKind, Room};
    use crate::geometry::Position;
    use crate::listen::Sink;
    use crate::notification::Severity;

    /// Storage that refuses writes.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: String) -> Result<()> {
            Err(GraphError::Storage("read only".to_string()))
        }
    }

    #[test]
    fn test_open_empty_creates_default_project() {
        let mut store = GraphStore::new();
        let library = ProjectLibrary::open(MemoryStore::new(), &mut store).unwrap();

        assert_eq!(library.projects().len(), 1);
        let current = library.current_project().unwrap();
        assert_eq!(current.name, "New Project");
        assert!(!current.seed.is_empty());
        assert!(library.storage().get(PROJECTS_KEY).unwrap().is_none());
    }

    #[test]
    fn test_save_then_reopen() {
        let mut store = GraphStore::new();
        let mut library = ProjectLibrary::open(MemoryStore::new(), &mut store).unwrap();
        let sink = Sink::new();
        library.listen(sink.listener());

        let node = store.add_node(Room::new(NodeKind::Entry, Position::default()));
        library.save(&store).unwrap();
        assert_eq!(sink.drain(), vec![Notification::success("Project saved!")]);

        let saved = library.storage().clone();
        let seed = library.current_project().unwrap().seed.clone();

        let mut reopened_store = GraphStore::new();
        let reopened = ProjectLibrary::open(saved, &mut reopened_store).unwrap();
        assert_eq!(reopened.current_project().unwrap().seed, seed);
        assert_eq!(reopened_store.nodes().len(), 1);
        assert_eq!(reopened_store.nodes()[0].id, node);
    }

    #[test]
    fn test_open_loads_most_recent_project() {
        let mut store = GraphStore::new();
        let mut library = ProjectLibrary::open(MemoryStore::new(), &mut store).unwrap();
        library.save(&store).unwrap();
        let second = library.create_new_project(&mut store).unwrap();
        store.add_node(Room::new(NodeKind::Boss, Position::default()));
        library.save(&store).unwrap();

        let mut reopened_store = GraphStore::new();
        let reopened = ProjectLibrary::open(library.storage().clone(), &mut reopened_store).unwrap();
        assert_eq!(reopened.projects().len(), 2);
        assert_eq!(reopened.current_project().unwrap().id, second);
        assert_eq!(reopened_store.nodes().len(), 1);
    }

    #[test]
    fn test_create_new_project_clears_graph() {
        let mut store = GraphStore::new();
        let mut library = ProjectLibrary::open(MemoryStore::new(), &mut store).unwrap();
        store.add_node(Room::new(NodeKind::Room, Position::default()));

        library.create_new_project(&mut store).unwrap();
        assert!(store.nodes().is_empty());
        assert_eq!(library.projects().len(), 2);
    }

    #[test]
    fn test_failed_save_notifies_error() {
        let mut store = GraphStore::new();
        let mut library = ProjectLibrary::open(ReadOnlyStore, &mut store).unwrap();
        let sink = Sink::new();
        library.listen(sink.listener());

        assert!(library.save(&store).is_err());
        let messages = sink.drain();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].severity, Severity::Error);
    }

    #[test]
    fn test_malformed_storage_is_an_error() {
        let mut storage = MemoryStore::new();
        storage.set(PROJECTS_KEY, "{not json".to_string()).unwrap();
        let mut store = GraphStore::new();
        assert!(matches!(
            ProjectLibrary::open(storage, &mut store),
            Err(GraphError::Persistence(_))
        ));
    }

    #[test]
    fn test_apply_new_seed() {
        let mut store = GraphStore::new();
        let mut library = ProjectLibrary::open(MemoryStore::new(), &mut store).unwrap();
        let before = library.current_project().unwrap().seed.clone();
        let after = library.apply_new_seed().unwrap().to_string();
        assert_ne!(before, after);
        assert_eq!(library.current_project().unwrap().seed, after);
    }

    #[test]
    fn test_load_unknown_project() {
        let mut store = GraphStore::new();
        let mut library = ProjectLibrary::open(MemoryStore::new(), &mut store).unwrap();
        assert!(matches!(
            library.load(Uuid::new_v4(), &mut store),
            Err(GraphError::Storage(_))
        ));
    }
}
