//! Authentication and authorization.
//!
//! One admin account is created at startup. Logging in issues a session token
//! kept in memory until it expires or the user logs out. HTTP Basic
//! credentials are accepted as well and never create a session.

use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use parking_lot::RwLock;
use sha2::{Digest, Sha256};

use crate::error::{Result, ServerError};

/// What an account may do
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Create, edit and delete chefs and dishes
    Admin,
    /// Browse only
    Viewer,
}

/// A user account
#[derive(Clone, Debug)]
pub struct User {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

impl User {
    pub fn new(username: &str, password: &str, role: Role) -> Self {
        Self {
            username: username.to_string(),
            password_hash: hash_password(password),
            role,
        }
    }

    pub fn verify_password(&self, password: &str) -> bool {
        hash_password(password) == self.password_hash
    }
}

/// Who a request acts as
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub role: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Hash a password with salt
fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"kitchen-server-salt:");
    hasher.update(password.as_bytes());
    let result = hasher.finalize();
    result.iter().map(|b| format!("{:02x}", b)).collect()
}

/// A logged-in session
#[derive(Clone, Debug)]
pub struct Session {
    pub token: String,
    pub principal: Principal,
    pub expires_at: SystemTime,
}

impl Session {
    fn new(principal: Principal, ttl: Duration) -> Self {
        Self {
            token: uuid::Uuid::new_v4().simple().to_string(),
            principal,
            expires_at: SystemTime::now() + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        SystemTime::now() > self.expires_at
    }
}

/// Authentication manager
pub struct AuthManager {
    users: RwLock<HashMap<String, User>>,
    sessions: RwLock<HashMap<String, Session>>,
    session_ttl: Duration,
}

impl AuthManager {
    pub fn new(session_ttl: Duration) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
            session_ttl,
        }
    }

    /// Add or replace a user
    pub fn add_user(&self, user: User) {
        let mut users = self.users.write();
        users.insert(user.username.clone(), user);
    }

    /// Install the built-in admin account
    pub fn ensure_admin_user(&self, username: &str, password: &str) {
        self.add_user(User::new(username, password, Role::Admin));
        tracing::info!("Admin account '{}' ready", username);
    }

    /// Add a read-only account
    pub fn add_viewer(&self, username: &str, password: &str) {
        self.add_user(User::new(username, password, Role::Viewer));
        tracing::info!("Viewer account '{}' ready", username);
    }

    /// Check a username/password pair without creating a session
    pub fn verify(&self, username: &str, password: &str) -> Result<Principal> {
        let users = self.users.read();
        let user = users.get(username).ok_or(ServerError::AuthFailed)?;

        if !user.verify_password(password) {
            return Err(ServerError::AuthFailed);
        }

        Ok(Principal {
            username: user.username.clone(),
            role: user.role,
        })
    }

    /// Authenticate with username/password, returns a new session
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Session> {
        let principal = self.verify(username, password)?;
        let session = Session::new(principal, self.session_ttl);

        let mut sessions = self.sessions.write();
        sessions.retain(|_, s| !s.is_expired());
        sessions.insert(session.token.clone(), session.clone());
        tracing::debug!("Session opened for {} ({} active)", username, sessions.len());

        Ok(session)
    }

    /// Validate a session token
    pub fn validate_token(&self, token: &str) -> Result<Principal> {
        {
            let sessions = self.sessions.read();
            let session = sessions.get(token).ok_or(ServerError::AuthFailed)?;
            if !session.is_expired() {
                return Ok(session.principal.clone());
            }
        }

        self.sessions.write().remove(token);
        Err(ServerError::AuthFailed)
    }

    /// Parse a Basic auth header and verify it
    pub fn authenticate_basic(&self, auth_header: &str) -> Result<Principal> {
        let encoded = auth_header
            .strip_prefix("Basic ")
            .ok_or(ServerError::AuthFailed)?;
        let decoded = BASE64
            .decode(encoded.trim())
            .map_err(|_| ServerError::AuthFailed)?;
        let credentials = String::from_utf8(decoded).map_err(|_| ServerError::AuthFailed)?;

        let (username, password) = credentials
            .split_once(':')
            .ok_or(ServerError::AuthFailed)?;

        self.verify(username, password)
    }

    /// End a session
    pub fn revoke_token(&self, token: &str) {
        let mut sessions = self.sessions.write();
        sessions.remove(token);
    }

    /// Drop expired sessions
    pub fn cleanup_expired_sessions(&self) {
        let mut sessions = self.sessions.write();
        sessions.retain(|_, s| !s.is_expired());
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }
}

impl Default for AuthManager {
    fn default() -> Self {
        Self::new(Duration::from_secs(24 * 60 * 60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash() {
        let hash1 = hash_password("test123");
        let hash2 = hash_password("test123");
        let hash3 = hash_password("different");

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, hash3);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_user_authentication() {
        let user = User::new("testuser", "password123", Role::Viewer);
        assert!(user.verify_password("password123"));
        assert!(!user.verify_password("wrongpassword"));
    }

    #[test]
    fn test_auth_manager() {
        let auth = AuthManager::default();
        auth.ensure_admin_user("admin", "admin");

        // Successful auth
        let session = auth.authenticate("admin", "admin").unwrap();
        assert!(!session.is_expired());
        assert!(session.principal.is_admin());

        // Token validation
        let principal = auth.validate_token(&session.token).unwrap();
        assert_eq!(principal.username, "admin");

        // Failed auth
        assert!(auth.authenticate("admin", "wrong").is_err());
        assert!(auth.authenticate("nonexistent", "pass").is_err());
        assert!(auth.validate_token("made-up").is_err());
    }

    #[test]
    fn test_revoke_and_expiry() {
        let auth = AuthManager::new(Duration::from_secs(3600));
        auth.ensure_admin_user("admin", "admin");

        let session = auth.authenticate("admin", "admin").unwrap();
        auth.revoke_token(&session.token);
        assert!(auth.validate_token(&session.token).is_err());

        let short = AuthManager::new(Duration::ZERO);
        short.ensure_admin_user("admin", "admin");
        let session = short.authenticate("admin", "admin").unwrap();
        std::thread::sleep(Duration::from_millis(5));
        assert!(short.validate_token(&session.token).is_err());
        assert_eq!(short.session_count(), 0);

        short.authenticate("admin", "admin").unwrap();
        std::thread::sleep(Duration::from_millis(2));
        short.cleanup_expired_sessions();
        assert_eq!(short.session_count(), 0);
    }

    #[test]
    fn test_repeated_logins_do_not_pile_up_expired_sessions() {
        let auth = AuthManager::new(Duration::ZERO);
        auth.ensure_admin_user("admin", "admin");

        for _ in 0..1000 {
            auth.authenticate("admin", "admin").unwrap();
            std::thread::sleep(Duration::from_micros(10));
        }

        // Only the newest session can still be in the map
        assert!(auth.session_count() <= 1);
    }

    #[test]
    fn test_basic_auth() {
        let auth = AuthManager::default();
        auth.add_user(User::new("cook", "pass", Role::Viewer));

        let header = format!("Basic {}", BASE64.encode(b"cook:pass"));
        let principal = auth.authenticate_basic(&header).unwrap();
        assert_eq!(principal.username, "cook");
        assert!(!principal.is_admin());
        assert_eq!(auth.session_count(), 0);

        let bad_header = format!("Basic {}", BASE64.encode(b"cook:wrong"));
        assert!(auth.authenticate_basic(&bad_header).is_err());
        assert!(auth.authenticate_basic("Bearer abc").is_err());
        assert!(auth.authenticate_basic("Basic !!!").is_err());
    }
}
