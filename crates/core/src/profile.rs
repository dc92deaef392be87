//! Profile management
//!
//! Profiles are named references to a COS bucket, including its endpoint
//! or region and the credentials used to reach it.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigManager, CosConfig, Credentials};
use crate::error::{Error, Result};

/// A profile represents one configured bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique name for this profile
    pub name: String,

    /// Bucket name, e.g. `demo-1250000000`
    pub bucket: String,

    /// Endpoint URL or host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// COS region, used when no endpoint is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// SecretId
    pub secret_id: String,

    /// SecretKey
    pub secret_key: String,
}

impl Profile {
    /// Create a new profile with required fields
    pub fn new(name: impl Into<String>, bucket: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            name: name.into(),
            bucket: bucket.into(),
            endpoint: None,
            region: None,
            secret_id: credentials.secret_id,
            secret_key: credentials.secret_key,
        }
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.secret_id, &self.secret_key)
    }

    /// Client construction input for this profile
    pub fn cos_config(&self) -> CosConfig {
        CosConfig {
            bucket: self.bucket.clone(),
            endpoint: self.endpoint.clone().unwrap_or_default(),
            region: self.region.clone().unwrap_or_default(),
            credentials: self.credentials(),
        }
    }
}

/// Manager for profile operations
pub struct ProfileManager {
    config_manager: ConfigManager,
}

impl ProfileManager {
    /// Create a new ProfileManager with a specific ConfigManager
    pub fn with_config_manager(config_manager: ConfigManager) -> Self {
        Self { config_manager }
    }

    /// Create a new ProfileManager using the default config location
    pub fn new() -> Result<Self> {
        let config_manager = ConfigManager::new()?;
        Ok(Self { config_manager })
    }

    /// List all configured profiles
    pub fn list(&self) -> Result<Vec<Profile>> {
        let config = self.config_manager.load()?;
        Ok(config.profiles)
    }

    /// Get a profile by name
    pub fn get(&self, name: &str) -> Result<Profile> {
        let config = self.config_manager.load()?;
        config
            .profiles
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::ProfileNotFound(name.to_string()))
    }

    /// Add or update a profile
    pub fn set(&self, profile: Profile) -> Result<()> {
        let mut config = self.config_manager.load()?;

        config.profiles.retain(|p| p.name != profile.name);
        config.profiles.push(profile);

        self.config_manager.save(&config)
    }

    /// Remove a profile
    pub fn remove(&self, name: &str) -> Result<()> {
        let mut config = self.config_manager.load()?;
        let original_len = config.profiles.len();

        config.profiles.retain(|p| p.name != name);

        if config.profiles.len() == original_len {
            return Err(Error::ProfileNotFound(name.to_string()));
        }

        self.config_manager.save(&config)
    }

    /// Check if a profile exists
    pub fn exists(&self, name: &str) -> Result<bool> {
        let config = self.config_manager.load()?;
        Ok(config.profiles.iter().any(|p| p.name == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_profile_manager() -> (ProfileManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_manager = ConfigManager::with_path(config_path);
        (ProfileManager::with_config_manager(config_manager), temp_dir)
    }

    fn profile(name: &str, bucket: &str) -> Profile {
        Profile::new(name, bucket, Credentials::new("AKID", "secret")).region("ap-guangzhou")
    }

    #[test]
    fn test_profile_cos_config() {
        let config = profile("prod", "demo-1250000000").cos_config();
        assert_eq!(config.bucket, "demo-1250000000");
        assert_eq!(config.region, "ap-guangzhou");
        assert!(config.endpoint.is_empty());
        assert_eq!(config.credentials.secret_id, "AKID");
    }

    #[test]
    fn test_profile_manager_set_and_get() {
        let (manager, _temp_dir) = temp_profile_manager();

        manager
            .set(profile("prod", "demo").endpoint("cos.ap-beijing.myqcloud.com"))
            .unwrap();

        let retrieved = manager.get("prod").unwrap();
        assert_eq!(retrieved.bucket, "demo");
        assert_eq!(retrieved.endpoint.as_deref(), Some("cos.ap-beijing.myqcloud.com"));
    }

    #[test]
    fn test_profile_manager_list() {
        let (manager, _temp_dir) = temp_profile_manager();

        manager.set(profile("a", "bucket-a")).unwrap();
        manager.set(profile("b", "bucket-b")).unwrap();

        assert_eq!(manager.list().unwrap().len(), 2);
    }

    #[test]
    fn test_profile_manager_remove() {
        let (manager, _temp_dir) = temp_profile_manager();

        manager.set(profile("test", "bucket")).unwrap();
        assert!(manager.exists("test").unwrap());

        manager.remove("test").unwrap();
        assert!(!manager.exists("test").unwrap());
    }

    #[test]
    fn test_profile_manager_remove_not_found() {
        let (manager, _temp_dir) = temp_profile_manager();

        let result = manager.remove("nonexistent");
        assert!(matches!(result.unwrap_err(), Error::ProfileNotFound(_)));
    }

    #[test]
    fn test_profile_manager_get_not_found() {
        let (manager, _temp_dir) = temp_profile_manager();

        let result = manager.get("nonexistent");
        assert!(matches!(result.unwrap_err(), Error::ProfileNotFound(_)));
    }

    #[test]
    fn test_profile_update_existing() {
        let (manager, _temp_dir) = temp_profile_manager();

        manager.set(profile("test", "old-bucket")).unwrap();
        manager.set(profile("test", "new-bucket")).unwrap();

        let profiles = manager.list().unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].bucket, "new-bucket");
    }
}
