//! Durable user preferences
//!
//! Preferences are process-wide configuration (dark mode, notifications,
//! visual theme) that survive restarts. Stores are constructed explicitly and
//! injected into whoever needs them; there is no global instance.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::error::{PreferencesError, Result};

/// Visual theme of the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppTheme {
    #[default]
    Default,
    Forest,
    Ocean,
}

impl AppTheme {
    pub const ALL: [AppTheme; 3] = [AppTheme::Default, AppTheme::Forest, AppTheme::Ocean];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppTheme::Default => "DEFAULT",
            AppTheme::Forest => "FOREST",
            AppTheme::Ocean => "OCEAN",
        }
    }
}

impl FromStr for AppTheme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEFAULT" => Ok(AppTheme::Default),
            "FOREST" => Ok(AppTheme::Forest),
            "OCEAN" => Ok(AppTheme::Ocean),
            _ => Err(format!(
                "Invalid theme: '{}'. Valid options: default, forest, ocean",
                s
            )),
        }
    }
}

impl std::fmt::Display for AppTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub dark_mode: bool,
    pub notifications_enabled: bool,
    pub app_theme: AppTheme,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            dark_mode: false,
            notifications_enabled: true,
            app_theme: AppTheme::Default,
        }
    }
}

/// Observable single-value preference store
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Receiver holding the current preferences and every later change
    fn observe(&self) -> watch::Receiver<UserPreferences>;

    async fn update_dark_mode(&self, enabled: bool) -> Result<()>;

    async fn update_theme(&self, theme: AppTheme) -> Result<()>;

    async fn update_notifications(&self, enabled: bool) -> Result<()>;

    /// Current value
    fn current(&self) -> UserPreferences {
        *self.observe().borrow()
    }
}

/// Non-durable store, for tests and previews
pub struct InMemoryPreferenceStore {
    state: watch::Sender<UserPreferences>,
}

impl InMemoryPreferenceStore {
    pub fn new(initial: UserPreferences) -> Self {
        Self {
            state: watch::Sender::new(initial),
        }
    }
}

impl Default for InMemoryPreferenceStore {
    fn default() -> Self {
        Self::new(UserPreferences::default())
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    fn observe(&self) -> watch::Receiver<UserPreferences> {
        self.state.subscribe()
    }

    async fn update_dark_mode(&self, enabled: bool) -> Result<()> {
        self.state.send_modify(|p| p.dark_mode = enabled);
        Ok(())
    }

    async fn update_theme(&self, theme: AppTheme) -> Result<()> {
        self.state.send_modify(|p| p.app_theme = theme);
        Ok(())
    }

    async fn update_notifications(&self, enabled: bool) -> Result<()> {
        self.state.send_modify(|p| p.notifications_enabled = enabled);
        Ok(())
    }
}

/// Store persisted as a small TOML file
///
/// Every update rewrites the file before the new value is published, so an
/// observer never sees a value that was not persisted. A missing file reads
/// as the defaults.
pub struct FilePreferenceStore {
    path: PathBuf,
    state: watch::Sender<UserPreferences>,
    // Serialises read-modify-write cycles against the file
    write_lock: tokio::sync::Mutex<()>,
}

impl FilePreferenceStore {
    /// Open (or lazily create) the store at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let initial = Self::load(&path).await?;
        info!(path = %path.display(), "Opened preference store");

        Ok(Self {
            path,
            state: watch::Sender::new(initial),
            write_lock: tokio::sync::Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(path: &Path) -> Result<UserPreferences> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => {
                let preferences = toml::from_str(&content).map_err(PreferencesError::Parse)?;
                Ok(preferences)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(UserPreferences::default()),
            Err(e) => Err(PreferencesError::Read(e).into()),
        }
    }

    async fn persist(&self, preferences: &UserPreferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(PreferencesError::Write)?;
        }

        let content = toml::to_string(preferences).map_err(PreferencesError::Serialize)?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(PreferencesError::Write)?;
        Ok(())
    }

    async fn edit<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut UserPreferences) + Send,
    {
        let _guard = self.write_lock.lock().await;

        let mut next = *self.state.borrow();
        change(&mut next);
        self.persist(&next).await?;
        self.state.send_replace(next);

        debug!(path = %self.path.display(), "Persisted preferences");
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for FilePreferenceStore {
    fn observe(&self) -> watch::Receiver<UserPreferences> {
        self.state.subscribe()
    }

    async fn update_dark_mode(&self, enabled: bool) -> Result<()> {
        self.edit(|p| p.dark_mode = enabled).await
    }

    async fn update_theme(&self, theme: AppTheme) -> Result<()> {
        self.edit(|p| p.app_theme = theme).await
    }

    async fn update_notifications(&self, enabled: bool) -> Result<()> {
        self.edit(|p| p.notifications_enabled = enabled).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_theme_from_str() {
        assert_eq!("forest".parse::<AppTheme>().unwrap(), AppTheme::Forest);
        assert_eq!("OCEAN".parse::<AppTheme>().unwrap(), AppTheme::Ocean);
        assert!("neon".parse::<AppTheme>().unwrap_err().contains("neon"));
    }

    #[test]
    fn test_preferences_defaults() {
        let prefs = UserPreferences::default();
        assert!(!prefs.dark_mode);
        assert!(prefs.notifications_enabled);
        assert_eq!(prefs.app_theme, AppTheme::Default);
    }

    #[tokio::test]
    async fn test_in_memory_store_notifies_observers() {
        let store = InMemoryPreferenceStore::default();
        let mut rx = store.observe();

        store.update_theme(AppTheme::Ocean).await.unwrap();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().app_theme, AppTheme::Ocean);
    }

    #[tokio::test]
    async fn test_file_store_missing_file_reads_defaults() {
        let dir = TempDir::new().unwrap();
        let store = FilePreferenceStore::open(dir.path().join("prefs.toml"))
            .await
            .unwrap();
        assert_eq!(store.current(), UserPreferences::default());
    }

    #[tokio::test]
    async fn test_file_store_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("prefs.toml");

        {
            let store = FilePreferenceStore::open(&path).await.unwrap();
            store.update_dark_mode(true).await.unwrap();
            store.update_theme(AppTheme::Forest).await.unwrap();
            store.update_notifications(false).await.unwrap();
        }

        let reopened = FilePreferenceStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.current(),
            UserPreferences {
                dark_mode: true,
                notifications_enabled: false,
                app_theme: AppTheme::Forest,
            }
        );
    }

    #[tokio::test]
    async fn test_file_store_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.toml");
        std::fs::write(&path, "dark_mode = true\n").unwrap();

        let store = FilePreferenceStore::open(&path).await.unwrap();
        let prefs = store.current();
        assert!(prefs.dark_mode);
        assert!(prefs.notifications_enabled);
        assert_eq!(prefs.app_theme, AppTheme::Default);
    }

    #[tokio::test]
    async fn test_file_store_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.toml");
        std::fs::write(&path, "dark_mode = \"perhaps\"").unwrap();

        let result = FilePreferenceStore::open(&path).await;
        assert!(matches!(
            result,
            Err(crate::GymlogError::Preferences(PreferencesError::Parse(_)))
        ));
    }
}
