//! User Storage
//! Mission: Store admin accounts in SQLite and verify their credentials

use crate::auth::models::{User, UserRole};
use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::{info, warn};

/// User storage with SQLite backend.
///
/// Accounts are created only out-of-band (schema seed or operator task),
/// never through the HTTP API.
pub struct UserStore {
    db_path: String,
}

impl UserStore {
    /// Create a new user store and initialize the schema.
    pub fn new(db_path: &str, default_admin_password: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db(default_admin_password)?;
        Ok(store)
    }

    fn init_db(&self, default_admin_password: &str) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'admin',
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        self.seed_default_admin(&conn, default_admin_password)?;

        Ok(())
    }

    /// Seed the default admin account for initial panel access.
    fn seed_default_admin(&self, conn: &Connection, password: &str) -> Result<()> {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM users WHERE role = 'admin'",
                [],
                |row| row.get(0),
            )
            .context("Failed to check for admin users")?;

        if count == 0 {
            let password_hash = hash(password, DEFAULT_COST).context("Failed to hash password")?;

            conn.execute(
                "INSERT INTO users (username, password_hash, role, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    "admin",
                    password_hash,
                    UserRole::Admin.as_str(),
                    Utc::now().to_rfc3339(),
                ],
            )
            .context("Failed to insert default admin")?;

            info!("🔐 Default admin account created (username: admin)");
            warn!("⚠️  CHANGE THE DEFAULT ADMIN PASSWORD IN PRODUCTION!");
        }

        Ok(())
    }

    /// Get a user by exact, case-sensitive username.
    pub fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, username, password_hash, role, created_at
             FROM users WHERE username = ?1",
        )?;

        let user_result = stmt.query_row(params![username], |row| {
            let role_str: String = row.get(3)?;
            Ok(User {
                id: row.get(0)?,
                username: row.get(1)?,
                password_hash: row.get(2)?,
                role: UserRole::from_str(&role_str).unwrap_or(UserRole::Editor),
                created_at: row.get(4)?,
            })
        });

        match user_result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Verify a username/password pair.
    ///
    /// Returns `None` uniformly for an unknown username and a wrong
    /// password, so callers cannot leak which usernames exist. The bcrypt
    /// comparison is CPU-bound; run this on the blocking pool from async
    /// contexts.
    pub fn verify_credentials(&self, username: &str, password: &str) -> Result<Option<User>> {
        let Some(user) = self.get_by_username(username)? else {
            return Ok(None);
        };

        let valid =
            verify(password, &user.password_hash).context("Failed to verify password hash")?;

        Ok(valid.then_some(user))
    }

    /// Create a user (seed/migration path only; not exposed over HTTP).
    pub fn create_user(&self, username: &str, password: &str, role: UserRole) -> Result<User> {
        let password_hash = hash(password, DEFAULT_COST).context("Failed to hash password")?;
        let created_at = Utc::now().to_rfc3339();

        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "INSERT INTO users (username, password_hash, role, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![username, password_hash, role.as_str(), created_at],
        )
        .context("Failed to insert user")?;

        let user = User {
            id: conn.last_insert_rowid(),
            username: username.to_string(),
            password_hash,
            role,
            created_at,
        };

        info!("✅ Created user: {} ({})", user.username, user.role.as_str());

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_test_store() -> (UserStore, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let db_path = temp_file.path().to_str().unwrap();
        let store = UserStore::new(db_path, "admin123").unwrap();
        (store, temp_file)
    }

    #[test]
    fn test_default_admin_seeded() {
        let (store, _temp) = create_test_store();

        let admin = store.get_by_username("admin").unwrap();
        assert!(admin.is_some());

        let admin = admin.unwrap();
        assert_eq!(admin.username, "admin");
        assert_eq!(admin.role, UserRole::Admin);
    }

    #[test]
    fn test_verify_credentials() {
        let (store, _temp) = create_test_store();

        let user = store.verify_credentials("admin", "admin123").unwrap();
        assert!(user.is_some());
        assert_eq!(user.unwrap().username, "admin");

        // Wrong password and unknown username are indistinguishable
        assert!(store
            .verify_credentials("admin", "wrongpassword")
            .unwrap()
            .is_none());
        assert!(store
            .verify_credentials("nonexistent", "admin123")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_username_lookup_is_case_sensitive() {
        let (store, _temp) = create_test_store();

        assert!(store.get_by_username("admin").unwrap().is_some());
        assert!(store.get_by_username("Admin").unwrap().is_none());
    }

    #[test]
    fn test_create_and_retrieve_user() {
        let (store, _temp) = create_test_store();

        let created = store
            .create_user("alaa", "alzughabi1", UserRole::Admin)
            .unwrap();
        assert_eq!(created.username, "alaa");
        assert!(created.id > 0);

        let fetched = store.get_by_username("alaa").unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.role, UserRole::Admin);

        assert!(store
            .verify_credentials("alaa", "alzughabi1")
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let (store, _temp) = create_test_store();

        store
            .create_user("editor1", "password1", UserRole::Editor)
            .unwrap();
        assert!(store
            .create_user("editor1", "password2", UserRole::Editor)
            .is_err());
    }
}
