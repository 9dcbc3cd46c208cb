//! JSON-file user directory.
//!
//! The file holds an array of accounts. When it is missing the directory
//! starts from three seeded accounts and writes the file on the first
//! registration. An unreadable or malformed file also yields the seeds but
//! stays read-only.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::Role;
use crate::domain::ports::{UserAccount, UserDirectory, UserDirectoryError};
use crate::outbound::cap_fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredUser {
    username: String,
    password: String,
    name: String,
    role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
}

impl From<StoredUser> for UserAccount {
    fn from(value: StoredUser) -> Self {
        Self {
            username: value.username,
            password: Zeroizing::new(value.password),
            display_name: value.name,
            role: value.role,
            created_at: value.created_at,
        }
    }
}

impl From<&UserAccount> for StoredUser {
    fn from(value: &UserAccount) -> Self {
        Self {
            username: value.username.clone(),
            password: value.password.as_str().to_owned(),
            name: value.display_name.clone(),
            role: value.role,
            created_at: value.created_at,
        }
    }
}

/// Accounts available before anyone registers.
fn seeded_users() -> Vec<UserAccount> {
    [
        ("admin", "admin123", "Admin", Role::Admin),
        ("ana", "ana123", "Ana Silva", Role::Editor),
        ("carlos", "carlos123", "Carlos Souza", Role::Viewer),
    ]
    .into_iter()
    .map(|(username, password, name, role)| UserAccount {
        username: username.to_owned(),
        password: Zeroizing::new(password.to_owned()),
        display_name: name.to_owned(),
        role,
        created_at: None,
    })
    .collect()
}

/// Directory contents read at startup.
struct LoadedUsers {
    users: Vec<UserAccount>,
    /// Entries kept verbatim because they are not usable accounts.
    retained: Vec<Value>,
    /// Whether rewriting the file keeps everything it held.
    writable: bool,
}

impl LoadedUsers {
    fn seeded(writable: bool) -> Self {
        Self {
            users: seeded_users(),
            retained: Vec::new(),
            writable,
        }
    }
}

fn load_users(path: &Path) -> LoadedUsers {
    let raw = match cap_fs::read_optional(path) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            info!(path = %path.display(), "users file absent; using seeded accounts");
            return LoadedUsers::seeded(true);
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "users file unreadable; using seeded accounts");
            return LoadedUsers::seeded(false);
        }
    };
    let entries = match serde_json::from_str::<Vec<Value>>(&raw) {
        Ok(entries) => entries,
        Err(error) => {
            warn!(path = %path.display(), %error, "users file malformed; using seeded accounts");
            return LoadedUsers::seeded(false);
        }
    };
    let mut users = Vec::with_capacity(entries.len());
    let mut retained = Vec::new();
    for (position, entry) in entries.into_iter().enumerate() {
        match StoredUser::deserialize(&entry) {
            Ok(user) => users.push(UserAccount::from(user)),
            Err(error) => {
                warn!(path = %path.display(), position, %error, "skipping unusable user entry");
                retained.push(entry);
            }
        }
    }
    LoadedUsers {
        users,
        retained,
        writable: true,
    }
}

/// [`UserDirectory`] persisted to a JSON file.
///
/// Entries that do not parse as accounts are kept and written back on every
/// save. A file that could not be read or parsed is never overwritten.
pub struct JsonUserDirectory {
    path: PathBuf,
    retained: Vec<Value>,
    writable: bool,
    users: Mutex<Vec<UserAccount>>,
}

impl JsonUserDirectory {
    /// Load the directory from `path`.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let LoadedUsers {
            users,
            retained,
            writable,
        } = load_users(&path);
        Self {
            path,
            retained,
            writable,
            users: Mutex::new(users),
        }
    }

    fn persist(&self, users: &[UserAccount]) -> Result<(), serde_json::Error> {
        let mut stored = users
            .iter()
            .map(|user| serde_json::to_value(StoredUser::from(user)))
            .collect::<Result<Vec<_>, _>>()?;
        stored.extend(self.retained.iter().cloned());
        let json = serde_json::to_vec_pretty(&stored)?;
        if let Err(error) = cap_fs::write_file(&self.path, &json) {
            warn!(path = %self.path.display(), %error, "failed to save users file");
        }
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for JsonUserDirectory {
    async fn find(&self, username: &str) -> Result<Option<UserAccount>, UserDirectoryError> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|user| user.username == username).cloned())
    }

    async fn insert(&self, account: UserAccount) -> Result<(), UserDirectoryError> {
        let mut users = self.users.lock().await;
        let wanted = account.username.to_lowercase();
        let retained_names = self
            .retained
            .iter()
            .filter_map(|entry| entry.get("username").and_then(Value::as_str));
        if users
            .iter()
            .map(|user| user.username.as_str())
            .chain(retained_names)
            .any(|username| username.to_lowercase() == wanted)
        {
            return Err(UserDirectoryError::already_exists(account.username));
        }
        if !self.writable {
            return Err(UserDirectoryError::unavailable(format!(
                "{} could not be loaded; refusing to overwrite it",
                self.path.display()
            )));
        }
        users.push(account);
        self.persist(&users)
            .map_err(|error| UserDirectoryError::unavailable(error.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! File-backed directory behaviour.
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn workdir() -> TempDir {
        tempfile::tempdir().expect("temp dir")
    }

    fn account(username: &str) -> UserAccount {
        UserAccount {
            username: username.to_owned(),
            password: Zeroizing::new("s3cret".to_owned()),
            display_name: "Maria Lima".to_owned(),
            role: Role::Viewer,
            created_at: Some(DateTime::UNIX_EPOCH),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn missing_file_starts_with_seeded_accounts(workdir: TempDir) {
        let directory = JsonUserDirectory::load(workdir.path().join("users.json"));
        let ana = directory
            .find("ana")
            .await
            .expect("lookup")
            .expect("seeded");
        assert_eq!(ana.display_name, "Ana Silva");
        assert_eq!(ana.role, Role::Editor);
        assert_eq!(ana.password.as_str(), "ana123");
    }

    #[rstest]
    #[tokio::test]
    async fn lookups_are_case_sensitive(workdir: TempDir) {
        let directory = JsonUserDirectory::load(workdir.path().join("users.json"));
        assert_eq!(directory.find("Admin").await.expect("lookup"), None);
    }

    #[rstest]
    #[tokio::test]
    async fn inserts_reject_names_differing_only_in_case(workdir: TempDir) {
        let directory = JsonUserDirectory::load(workdir.path().join("users.json"));
        let err = directory
            .insert(account("CARLOS"))
            .await
            .expect_err("duplicate");
        assert_eq!(err, UserDirectoryError::already_exists("CARLOS"));
    }

    #[rstest]
    #[tokio::test]
    async fn inserts_survive_a_reload(workdir: TempDir) {
        let path = workdir.path().join("config").join("users.json");
        JsonUserDirectory::load(&path)
            .insert(account("maria"))
            .await
            .expect("inserted");

        let reloaded = JsonUserDirectory::load(&path);
        let maria = reloaded
            .find("maria")
            .await
            .expect("lookup")
            .expect("persisted");
        assert_eq!(maria.created_at, Some(DateTime::UNIX_EPOCH));
        assert!(reloaded.find("admin").await.expect("lookup").is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_files_fall_back_to_seeds_and_stay_untouched(workdir: TempDir) {
        let path = workdir.path().join("users.json");
        cap_fs::write_file(&path, b"{ nope").expect("fixture written");
        let directory = JsonUserDirectory::load(&path);
        assert!(directory.find("carlos").await.expect("lookup").is_some());

        let err = directory
            .insert(account("maria"))
            .await
            .expect_err("read-only");
        assert!(matches!(err, UserDirectoryError::Unavailable { .. }));
        assert_eq!(directory.find("maria").await.expect("lookup"), None);
        let raw = cap_fs::read_optional(&path)
            .expect("readable")
            .expect("present");
        assert_eq!(raw, "{ nope");
    }

    #[rstest]
    #[tokio::test]
    async fn unusable_entries_are_skipped_and_kept_on_save(workdir: TempDir) {
        let path = workdir.path().join("users.json");
        let fixture = serde_json::json!([
            {"username": "boss", "password": "b0ss", "name": "Boss", "role": "admin"},
            {"username": "aud", "password": "aud1t", "name": "Auditor", "role": "auditor"}
        ]);
        cap_fs::write_file(&path, fixture.to_string().as_bytes()).expect("fixture written");

        let directory = JsonUserDirectory::load(&path);
        let boss = directory.find("boss").await.expect("lookup").expect("kept");
        assert_eq!(boss.role, Role::Admin);
        assert_eq!(directory.find("aud").await.expect("lookup"), None);
        assert_eq!(directory.find("admin").await.expect("lookup"), None);

        directory.insert(account("maria")).await.expect("inserted");

        let raw = cap_fs::read_optional(&path)
            .expect("readable")
            .expect("written");
        let saved: Vec<serde_json::Value> = serde_json::from_str(&raw).expect("json");
        let names: Vec<&str> = saved
            .iter()
            .filter_map(|entry| entry["username"].as_str())
            .collect();
        assert_eq!(names, ["boss", "maria", "aud"]);
        assert_eq!(saved[2]["role"], "auditor");
        assert!(!raw.contains("admin123"));

        let err = directory.insert(account("AUD")).await.expect_err("taken");
        assert_eq!(err, UserDirectoryError::already_exists("AUD"));
    }

    #[rstest]
    #[tokio::test]
    async fn stored_layout_uses_camel_case(workdir: TempDir) {
        let path = workdir.path().join("users.json");
        JsonUserDirectory::load(&path)
            .insert(account("maria"))
            .await
            .expect("inserted");

        let raw = cap_fs::read_optional(&path)
            .expect("readable")
            .expect("written");
        let json: serde_json::Value = serde_json::from_str(&raw).expect("json");
        let maria = &json[3];
        assert_eq!(maria["name"], "Maria Lima");
        assert_eq!(maria["role"], "viewer");
        assert_eq!(maria["createdAt"], "1970-01-01T00:00:00Z");
        assert!(json[0].get("createdAt").is_none());
    }
}
