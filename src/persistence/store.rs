use super::files::atomic_write;
use crate::domain::{sort_by_deadline, BlockedApp, Goal, User};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// Failures reported by a goal store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: Uuid },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// Create/read/update/delete for goals, users and blocked apps
pub trait GoalStore {
    fn create_goal(&mut self, goal: &Goal) -> Result<(), StoreError>;
    /// Goals owned by `user_id`, nearest deadline first
    fn list_goals(&self, user_id: Uuid) -> Result<Vec<Goal>, StoreError>;
    fn update_goal(&mut self, goal: &Goal) -> Result<(), StoreError>;
    fn delete_goal(&mut self, id: Uuid) -> Result<(), StoreError>;

    fn create_user(&mut self, user: &User) -> Result<(), StoreError>;
    fn get_user_by_apple_id(&self, apple_id: &str) -> Result<Option<User>, StoreError>;
    fn update_user(&mut self, user: &User) -> Result<(), StoreError>;

    fn create_blocked_app(&mut self, app: &BlockedApp) -> Result<(), StoreError>;
    fn list_blocked_apps(&self, user_id: Uuid) -> Result<Vec<BlockedApp>, StoreError>;
    fn update_blocked_app(&mut self, app: &BlockedApp) -> Result<(), StoreError>;
    fn delete_blocked_app(&mut self, id: Uuid) -> Result<(), StoreError>;
}

const GOALS_TABLE: &str = "goals";
const USERS_TABLE: &str = "users";
const BLOCKED_APPS_TABLE: &str = "blocked_apps";

/// Store keeping one JSON array per table inside the data directory
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{}.json", table))
    }

    fn load_table<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>, StoreError> {
        let path = self.table_path(table);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn save_table<T: Serialize>(&self, table: &str, rows: &[T]) -> Result<(), StoreError> {
        let path = self.table_path(table);
        let json = serde_json::to_string_pretty(rows)?;
        atomic_write(&path, &json).map_err(|e| StoreError::Write {
            path: path.clone(),
            message: format!("{:#}", e),
        })?;
        log::debug!("Saved {} {} to {}", rows.len(), table, path.display());
        Ok(())
    }

    /// Replace the row matching `id`, or report it missing
    fn replace_row<T, F>(
        &self,
        table: &str,
        kind: &'static str,
        id: Uuid,
        row: &T,
        id_of: F,
    ) -> Result<(), StoreError>
    where
        T: Serialize + DeserializeOwned + Clone,
        F: Fn(&T) -> Uuid,
    {
        let mut rows: Vec<T> = self.load_table(table)?;
        let slot = rows
            .iter_mut()
            .find(|r| id_of(r) == id)
            .ok_or(StoreError::NotFound { kind, id })?;
        *slot = row.clone();
        self.save_table(table, &rows)
    }

    fn remove_row<T, F>(&self, table: &str, kind: &'static str, id: Uuid, id_of: F) -> Result<(), StoreError>
    where
        T: Serialize + DeserializeOwned,
        F: Fn(&T) -> Uuid,
    {
        let mut rows: Vec<T> = self.load_table(table)?;
        let before = rows.len();
        rows.retain(|r| id_of(r) != id);
        if rows.len() == before {
            return Err(StoreError::NotFound { kind, id });
        }
        self.save_table(table, &rows)
    }
}

impl GoalStore for JsonStore {
    fn create_goal(&mut self, goal: &Goal) -> Result<(), StoreError> {
        goal.validate()
            .map_err(|e| StoreError::InvalidRecord(e.to_string()))?;
        let mut goals: Vec<Goal> = self.load_table(GOALS_TABLE)?;
        goals.push(goal.clone());
        self.save_table(GOALS_TABLE, &goals)
    }

    fn list_goals(&self, user_id: Uuid) -> Result<Vec<Goal>, StoreError> {
        let mut goals: Vec<Goal> = self
            .load_table::<Goal>(GOALS_TABLE)?
            .into_iter()
            .filter(|g| g.user_id == user_id)
            .collect();
        sort_by_deadline(&mut goals);
        Ok(goals)
    }

    fn update_goal(&mut self, goal: &Goal) -> Result<(), StoreError> {
        goal.validate()
            .map_err(|e| StoreError::InvalidRecord(e.to_string()))?;
        self.replace_row(GOALS_TABLE, "Goal", goal.id, goal, |g: &Goal| g.id)
    }

    fn delete_goal(&mut self, id: Uuid) -> Result<(), StoreError> {
        self.remove_row(GOALS_TABLE, "Goal", id, |g: &Goal| g.id)
    }

    fn create_user(&mut self, user: &User) -> Result<(), StoreError> {
        let mut users: Vec<User> = self.load_table(USERS_TABLE)?;
        users.push(user.clone());
        self.save_table(USERS_TABLE, &users)
    }

    fn get_user_by_apple_id(&self, apple_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .load_table::<User>(USERS_TABLE)?
            .into_iter()
            .find(|u| u.apple_id == apple_id))
    }

    fn update_user(&mut self, user: &User) -> Result<(), StoreError> {
        self.replace_row(USERS_TABLE, "User", user.id, user, |u: &User| u.id)
    }

    fn create_blocked_app(&mut self, app: &BlockedApp) -> Result<(), StoreError> {
        let mut apps: Vec<BlockedApp> = self.load_table(BLOCKED_APPS_TABLE)?;
        apps.push(app.clone());
        self.save_table(BLOCKED_APPS_TABLE, &apps)
    }

    fn list_blocked_apps(&self, user_id: Uuid) -> Result<Vec<BlockedApp>, StoreError> {
        Ok(self
            .load_table::<BlockedApp>(BLOCKED_APPS_TABLE)?
            .into_iter()
            .filter(|a| a.user_id == user_id)
            .collect())
    }

    fn update_blocked_app(&mut self, app: &BlockedApp) -> Result<(), StoreError> {
        self.replace_row(BLOCKED_APPS_TABLE, "Blocked app", app.id, app, |a: &BlockedApp| a.id)
    }

    fn delete_blocked_app(&mut self, id: Uuid) -> Result<(), StoreError> {
        self.remove_row(BLOCKED_APPS_TABLE, "Blocked app", id, |a: &BlockedApp| a.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn goal(user_id: Uuid, name: &str, month: u32) -> Goal {
        Goal::new(
            user_id,
            name.to_string(),
            Utc.with_ymd_and_hms(2024, month, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_list_goals_empty_store() {
        let temp_dir = tempdir().unwrap();
        let store = JsonStore::new(temp_dir.path());

        assert!(store.list_goals(Uuid::new_v4()).unwrap().is_empty());
    }

    #[test]
    fn test_goals_listed_by_deadline_for_owner_only() {
        let temp_dir = tempdir().unwrap();
        let mut store = JsonStore::new(temp_dir.path());
        let me = Uuid::new_v4();
        let someone_else = Uuid::new_v4();

        store.create_goal(&goal(me, "Autumn", 9)).unwrap();
        store.create_goal(&goal(someone_else, "Not mine", 2)).unwrap();
        store.create_goal(&goal(me, "Spring", 3)).unwrap();

        let names: Vec<String> = store
            .list_goals(me)
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["Spring".to_string(), "Autumn".to_string()]);
    }

    #[test]
    fn test_update_and_delete_goal() {
        let temp_dir = tempdir().unwrap();
        let mut store = JsonStore::new(temp_dir.path());
        let me = Uuid::new_v4();
        let mut g = goal(me, "Draft", 5);
        store.create_goal(&g).unwrap();

        g.rename("Final".to_string()).unwrap();
        store.update_goal(&g).unwrap();
        assert_eq!(store.list_goals(me).unwrap()[0].name, "Final");

        store.delete_goal(g.id).unwrap();
        assert!(store.list_goals(me).unwrap().is_empty());
    }

    #[test]
    fn test_missing_goal_is_not_found() {
        let temp_dir = tempdir().unwrap();
        let mut store = JsonStore::new(temp_dir.path());
        let g = goal(Uuid::new_v4(), "Ghost", 5);

        assert!(matches!(store.update_goal(&g), Err(StoreError::NotFound { .. })));
        assert!(matches!(store.delete_goal(g.id), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let temp_dir = tempdir().unwrap();
        let mut store = JsonStore::new(temp_dir.path());

        let result = store.create_goal(&goal(Uuid::new_v4(), "  ", 5));
        assert!(matches!(result, Err(StoreError::InvalidRecord(_))));
    }

    #[test]
    fn test_corrupt_table_is_json_error() {
        let temp_dir = tempdir().unwrap();
        let store = JsonStore::new(temp_dir.path());
        std::fs::write(store.table_path("goals"), "not json").unwrap();

        assert!(matches!(store.list_goals(Uuid::new_v4()), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_user_round_trip() {
        let temp_dir = tempdir().unwrap();
        let mut store = JsonStore::new(temp_dir.path());
        let mut user = User::new("local-me".to_string(), 30);

        store.create_user(&user).unwrap();
        assert_eq!(store.get_user_by_apple_id("local-me").unwrap(), Some(user.clone()));
        assert_eq!(store.get_user_by_apple_id("nobody").unwrap(), None);

        user.productive_years_remaining = 25;
        store.update_user(&user).unwrap();
        let loaded = store.get_user_by_apple_id("local-me").unwrap().unwrap();
        assert_eq!(loaded.productive_years_remaining, 25);
    }

    #[test]
    fn test_blocked_apps_crud() {
        let temp_dir = tempdir().unwrap();
        let mut store = JsonStore::new(temp_dir.path());
        let me = Uuid::new_v4();
        let mut app = BlockedApp::new(me, "tv.twitch".to_string(), "Twitch".to_string());

        store.create_blocked_app(&app).unwrap();
        assert_eq!(store.list_blocked_apps(me).unwrap(), vec![app.clone()]);

        app.toggle();
        store.update_blocked_app(&app).unwrap();
        assert!(!store.list_blocked_apps(me).unwrap()[0].is_enabled);

        store.delete_blocked_app(app.id).unwrap();
        assert!(store.list_blocked_apps(me).unwrap().is_empty());
    }
}
