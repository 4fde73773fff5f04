use log::warn;
use uuid::Uuid;

use crate::history::epoch_ms;
use crate::model::{PixelGrid, SavedProject, SortOrder};
use crate::store::{keys, KeyValueStore};

/// Maximum number of saved projects
pub const MAX_PROJECTS: usize = 10;

/// Bounded collection of named canvas snapshots, independent of any live
/// editing session. Mutations do not touch storage; the host persists after
/// each one via `persist_to`.
#[derive(Debug, Clone, Default)]
pub struct ProjectStore {
    projects: Vec<SavedProject>,
    current_id: Option<String>,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the store from the persisted key-value entry. A corrupt entry
    /// is logged and treated as empty rather than failing startup.
    pub fn load_from(store: &dyn KeyValueStore) -> Self {
        let projects: Vec<SavedProject> = store
            .get(keys::PROJECTS)
            .and_then(|json| match serde_json::from_str(&json) {
                Ok(projects) => Some(projects),
                Err(err) => {
                    warn!("discarding corrupt saved projects: {err}");
                    None
                }
            })
            .unwrap_or_default();

        Self {
            projects,
            current_id: None,
        }
    }

    pub fn persist_to(&self, store: &mut dyn KeyValueStore) -> Result<(), String> {
        let json = serde_json::to_string(&self.projects)
            .map_err(|e| format!("failed to serialize projects: {}", e))?;
        store.set(keys::PROJECTS, json);
        Ok(())
    }

    pub fn can_save_new(&self) -> bool {
        self.projects.len() < MAX_PROJECTS
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    /// Save a new project. Fails when the store is full or the name is blank;
    /// both are surfaced as messages for the host UI, never panics.
    pub fn save(
        &mut self,
        name: &str,
        grid: &PixelGrid,
        thumbnail: String,
        saved_colors: Option<Vec<String>>,
    ) -> Result<SavedProject, String> {
        let name = name.trim();
        if name.is_empty() {
            return Err("project name must not be empty".to_string());
        }
        if !self.can_save_new() {
            return Err(format!(
                "storage is full, at most {} projects can be saved; delete one first",
                MAX_PROJECTS
            ));
        }

        let now = epoch_ms();
        let project = SavedProject {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            canvas: grid.clone(),
            canvas_width: grid.width(),
            canvas_height: grid.height(),
            thumbnail,
            created_at: now,
            updated_at: now,
            saved_colors,
        };

        self.current_id = Some(project.id.clone());
        self.projects.push(project.clone());
        Ok(project)
    }

    /// Overwrite an existing project's contents, refreshing only updated_at
    pub fn update(
        &mut self,
        id: &str,
        name: &str,
        grid: &PixelGrid,
        thumbnail: String,
        saved_colors: Option<Vec<String>>,
    ) -> Result<SavedProject, String> {
        let name = name.trim();
        if name.is_empty() {
            return Err("project name must not be empty".to_string());
        }
        let project = self
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| format!("no saved project with id {}", id))?;

        project.name = name.to_string();
        project.canvas = grid.clone();
        project.canvas_width = grid.width();
        project.canvas_height = grid.height();
        project.thumbnail = thumbnail;
        project.saved_colors = saved_colors;
        project.updated_at = epoch_ms();
        Ok(project.clone())
    }

    /// Look up a project and mark it as the current one. Does not mutate the
    /// stored projects.
    pub fn load(&mut self, id: &str) -> Option<&SavedProject> {
        let project = self.projects.iter().find(|p| p.id == id)?;
        self.current_id = Some(project.id.clone());
        Some(project)
    }

    pub fn get(&self, id: &str) -> Option<&SavedProject> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Remove by id; absent ids are ignored
    pub fn delete(&mut self, id: &str) {
        self.projects.retain(|p| p.id != id);
        if self.current_id.as_deref() == Some(id) {
            self.current_id = None;
        }
    }

    /// Projects in the requested order; stored order is left untouched
    pub fn list(&self, sort: SortOrder) -> Vec<&SavedProject> {
        let mut projects: Vec<&SavedProject> = self.projects.iter().collect();
        match sort {
            SortOrder::Latest => projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
            SortOrder::Oldest => projects.sort_by(|a, b| a.updated_at.cmp(&b.updated_at)),
            SortOrder::Name => projects.sort_by(|a, b| a.name.cmp(&b.name)),
        }
        projects
    }
}
