//! Credential store
//!
//! Flat CSV file `username,password_hash`, read once at startup and appended
//! on registration. Candidates are always hashed before comparison: new
//! entries are argon2 PHC strings, older entries are bare SHA-256 hex digests.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use thiserror::Error;

const USERNAME_COLUMN: &str = "username";
const HASH_COLUMNS: &[&str] = &["password_hash", "password"];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential file IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed credential file: {0}")]
    Csv(#[from] csv::Error),

    #[error("credential file lacks column '{0}'")]
    MissingColumn(&'static str),

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("username '{0}' is already registered")]
    AlreadyExists(String),

    #[error("username must not be blank")]
    InvalidUsername,
}

/// Outcome of a login attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Verified,
    WrongPassword,
    UnknownUser,
}

#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
    users: Mutex<HashMap<String, String>>,
}

impl CredentialStore {
    /// Load the file at `path`; a missing file is an empty store
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let users = if path.exists() {
            read_credentials(path)?
        } else {
            HashMap::new()
        };

        tracing::info!("Credential store {} loaded ({} users)", path.display(), users.len());
        Ok(Self {
            path: path.to_path_buf(),
            users: Mutex::new(users),
        })
    }

    pub fn len(&self) -> usize {
        self.users.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.lock().is_empty()
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.lock().contains_key(username.trim())
    }

    /// Hash `password` and append the new account
    pub fn register(&self, username: &str, password: &str) -> Result<(), StoreError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(StoreError::InvalidUsername);
        }
        if self.contains(username) {
            return Err(StoreError::AlreadyExists(username.to_string()));
        }

        let hash = hash_password(password)?;

        let mut users = self.users.lock();
        if users.contains_key(username) {
            return Err(StoreError::AlreadyExists(username.to_string()));
        }
        self.append(username, &hash)?;
        users.insert(username.to_string(), hash);

        tracing::info!("Registered user '{}'", username);
        Ok(())
    }

    pub fn verify(&self, username: &str, password: &str) -> Verification {
        let stored = self.users.lock().get(username.trim()).cloned();

        match stored {
            None => Verification::UnknownUser,
            Some(hash) if check_password(password, &hash) => Verification::Verified,
            Some(_) => Verification::WrongPassword,
        }
    }

    fn append(&self, username: &str, hash: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let needs_header = fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);

        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        if needs_header {
            writer.write_record([USERNAME_COLUMN, HASH_COLUMNS[0]])?;
        }
        writer.write_record([username, hash])?;
        writer.flush()?;
        Ok(())
    }
}

fn read_credentials(path: &Path) -> Result<HashMap<String, String>, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

    let user_idx = position(USERNAME_COLUMN).ok_or(StoreError::MissingColumn(USERNAME_COLUMN))?;
    let hash_idx = HASH_COLUMNS
        .iter()
        .find_map(|c| position(c))
        .ok_or(StoreError::MissingColumn(HASH_COLUMNS[0]))?;

    let mut users = HashMap::new();
    for row in reader.records() {
        let row = row?;
        let (Some(username), Some(hash)) = (row.get(user_idx), row.get(hash_idx)) else {
            continue;
        };
        if username.is_empty() || hash.is_empty() {
            continue;
        }
        users.entry(username.to_string()).or_insert_with(|| hash.to_string());
    }
    Ok(users)
}

/// Argon2 PHC string for a new account
pub fn hash_password(password: &str) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| StoreError::Hash(e.to_string()))
}

/// Hex SHA-256, the format of entries written before argon2
pub fn legacy_digest(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn check_password(candidate: &str, stored: &str) -> bool {
    if stored.starts_with("$argon2") {
        return PasswordHash::new(stored)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(candidate.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false);
    }

    let digest = legacy_digest(candidate);
    constant_time_eq(digest.as_bytes(), stored.to_ascii_lowercase().as_bytes())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::open(&dir.path().join("users.csv")).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.verify("alice", "secret"), Verification::UnknownUser);
    }

    #[test]
    fn test_register_then_verify_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.csv");

        let store = CredentialStore::open(&path).unwrap();
        store.register("alice", "s3cret!").unwrap();
        assert_eq!(store.verify("alice", "s3cret!"), Verification::Verified);
        assert_eq!(store.verify("alice", "wrong"), Verification::WrongPassword);

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("username,password_hash\n"));
        assert!(!content.contains("s3cret!"));

        let reloaded = CredentialStore::open(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.verify("alice", "s3cret!"), Verification::Verified);
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::open(&dir.path().join("users.csv")).unwrap();
        store.register("bob", "password1").unwrap();

        let err = store.register(" bob ", "password2").unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(name) if name == "bob"));
        assert_eq!(store.verify("bob", "password1"), Verification::Verified);
    }

    #[test]
    fn test_blank_username_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.csv");
        let store = CredentialStore::open(&path).unwrap();

        assert!(matches!(store.register("   ", "password1"), Err(StoreError::InvalidUsername)));
        assert!(store.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_legacy_sha256_entries_verify() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.csv");
        fs::write(&path, format!("username,password\nhadil,{}\n", legacy_digest("motdepasse"))).unwrap();

        let store = CredentialStore::open(&path).unwrap();
        assert_eq!(store.verify("hadil", "motdepasse"), Verification::Verified);
        assert_eq!(store.verify("hadil", "autre"), Verification::WrongPassword);
    }

    #[test]
    fn test_stored_hash_is_never_accepted_as_password() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.csv");
        let digest = legacy_digest("motdepasse");
        fs::write(&path, format!("username,password\nhadil,{}\n", digest)).unwrap();

        let store = CredentialStore::open(&path).unwrap();
        assert_eq!(store.verify("hadil", &digest), Verification::WrongPassword);
    }

    #[test]
    fn test_new_entries_appended_to_legacy_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.csv");
        fs::write(&path, format!("username,password\nhadil,{}\n", legacy_digest("motdepasse"))).unwrap();

        let store = CredentialStore::open(&path).unwrap();
        store.register("sami", "nouveau1").unwrap();

        let reloaded = CredentialStore::open(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.verify("sami", "nouveau1"), Verification::Verified);
        assert_eq!(reloaded.verify("hadil", "motdepasse"), Verification::Verified);
    }

    #[test]
    fn test_missing_columns_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.csv");
        fs::write(&path, "login,secret\na,b\n").unwrap();
        assert!(matches!(
            CredentialStore::open(&path),
            Err(StoreError::MissingColumn("username"))
        ));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
    }
}
