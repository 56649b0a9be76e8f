use crate::ryzenadj::library::DEFAULT_LIBRARY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const SYSTEM_CONFIG: &str = "/etc/ryzen-set/config.toml";
const PROFILES_ENV: &str = "RYZEN_SET_PROFILES";
const LIBRARY_ENV: &str = "RYZENADJ_LIB";

/// Top-level ryzen-set configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RyzenSetConfig {
    /// Path to libryzenadj.
    pub library: PathBuf,
    /// Profile store location. Defaults to ~/.local/share/ryzen-set/profiles.ini.
    pub profiles: Option<PathBuf>,
}

impl Default for RyzenSetConfig {
    fn default() -> Self {
        Self {
            library: PathBuf::from(DEFAULT_LIBRARY),
            profiles: None,
        }
    }
}

impl RyzenSetConfig {
    /// Resolved path of the profile store.
    pub fn profiles_path(&self) -> PathBuf {
        self.profiles.clone().unwrap_or_else(default_profiles_path)
    }

    fn apply_env(mut self, profiles: Option<PathBuf>, library: Option<PathBuf>) -> Self {
        if let Some(p) = profiles {
            self.profiles = Some(p);
        }
        if let Some(l) = library {
            self.library = l;
        }
        self
    }
}

const STORE_SUBDIR: &str = ".local/share/ryzen-set/profiles.ini";

/// ~/.local/share/ryzen-set/profiles.ini of the invoking user.
///
/// `set` and `get` run under sudo, where $HOME is root's, so the user named
/// by SUDO_USER wins over the data dir of the current environment.
pub fn default_profiles_path() -> PathBuf {
    sudo_user()
        .and_then(|name| user_profiles_path(&name))
        .unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_default()
                .join("ryzen-set")
                .join("profiles.ini")
        })
}

fn sudo_user() -> Option<String> {
    std::env::var("SUDO_USER").ok().filter(|u| !u.is_empty())
}

/// Store path inside the home directory of `name`, if that user exists.
pub fn user_profiles_path(name: &str) -> Option<PathBuf> {
    match nix::unistd::User::from_name(name) {
        Ok(Some(user)) => Some(user.dir.join(STORE_SUBDIR)),
        Ok(None) => {
            tracing::warn!("SUDO_USER {} has no passwd entry", name);
            None
        }
        Err(e) => {
            tracing::warn!("failed to look up user {}: {}", name, e);
            None
        }
    }
}

fn load_system() -> Option<toml::Value> {
    let content = std::fs::read_to_string(SYSTEM_CONFIG).ok()?;
    parse_value(&content, Path::new(SYSTEM_CONFIG))
}

/// Load the user config file (~/.config/ryzen-set/config.toml) if it exists.
fn load_user() -> Option<toml::Value> {
    let path = dirs::config_dir()?.join("ryzen-set").join("config.toml");
    let content = std::fs::read_to_string(&path).ok()?;
    parse_value(&content, &path)
}

fn parse_value(content: &str, path: &Path) -> Option<toml::Value> {
    match toml::from_str(content) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!("failed to parse config at {}: {}", path.display(), e);
            None
        }
    }
}

/// Recursively merge two TOML values. Tables are merged key-by-key;
/// all other types in `overlay` replace `base`.
fn merge_values(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_values(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

fn load_from_path(path: &Path) -> RyzenSetConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("failed to parse config at {}: {}", path.display(), e);
            RyzenSetConfig::default()
        }),
        Err(e) => {
            tracing::warn!("failed to read config at {}: {}", path.display(), e);
            RyzenSetConfig::default()
        }
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Load the merged config: system defaults, then user overrides, then
/// environment. If `override_path` is provided, it replaces the system and
/// user files.
pub fn load(override_path: Option<&Path>) -> RyzenSetConfig {
    let config = match override_path {
        Some(path) => load_from_path(path),
        None => {
            let merged = match (load_system(), load_user()) {
                (Some(s), Some(u)) => Some(merge_values(s, u)),
                (Some(v), None) | (None, Some(v)) => Some(v),
                (None, None) => None,
            };
            match merged {
                Some(value) => value.try_into().unwrap_or_else(|e| {
                    tracing::warn!("failed to deserialize config: {}", e);
                    RyzenSetConfig::default()
                }),
                None => RyzenSetConfig::default(),
            }
        }
    };

    config.apply_env(env_path(PROFILES_ENV), env_path(LIBRARY_ENV))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RyzenSetConfig::default();
        assert_eq!(config.library, PathBuf::from("/usr/lib64/libryzenadj.so"));
        assert!(config.profiles.is_none());
        assert!(config.profiles_path().ends_with("ryzen-set/profiles.ini"));
    }

    #[test]
    fn test_merge_values_tables() {
        let base: toml::Value = toml::from_str(
            r#"
            library = "/usr/lib/libryzenadj.so"
            profiles = "/etc/ryzen-set/profiles.ini"
        "#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(r#"profiles = "/home/u/p.ini""#).unwrap();

        let merged: RyzenSetConfig = merge_values(base, overlay).try_into().unwrap();
        assert_eq!(merged.library, PathBuf::from("/usr/lib/libryzenadj.so"));
        assert_eq!(merged.profiles, Some(PathBuf::from("/home/u/p.ini")));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: RyzenSetConfig = toml::from_str(r#"profiles = "/tmp/p.ini""#).unwrap();
        assert_eq!(config.profiles_path(), PathBuf::from("/tmp/p.ini"));
        assert_eq!(config.library, PathBuf::from(DEFAULT_LIBRARY));
    }

    #[test]
    fn test_load_from_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "library = \"/opt/ryzenadj/libryzenadj.so\"\n").unwrap();
        let config = load_from_path(&path);
        assert_eq!(
            config.library,
            PathBuf::from("/opt/ryzenadj/libryzenadj.so")
        );
    }

    #[test]
    fn test_load_from_invalid_path_falls_back() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "library = [").unwrap();
        assert_eq!(load_from_path(&path).library, PathBuf::from(DEFAULT_LIBRARY));
        assert!(load_from_path(Path::new("/nonexistent/config.toml"))
            .profiles
            .is_none());
    }

    #[test]
    fn test_user_profiles_path_uses_passwd_home() {
        let root = nix::unistd::User::from_name("root").unwrap().unwrap();
        assert_eq!(
            user_profiles_path("root"),
            Some(root.dir.join(".local/share/ryzen-set/profiles.ini"))
        );
        assert_eq!(user_profiles_path("no-such-user-ryzen-set"), None);
    }

    #[test]
    fn test_default_path_follows_sudo_user() {
        let me = nix::unistd::User::from_uid(nix::unistd::getuid())
            .unwrap()
            .unwrap();
        // SAFETY: the only other reader, test_default_config, accepts either path.
        unsafe { std::env::set_var("SUDO_USER", &me.name) };
        let path = default_profiles_path();
        unsafe { std::env::remove_var("SUDO_USER") };
        assert_eq!(path, me.dir.join(".local/share/ryzen-set/profiles.ini"));
    }

    #[test]
    fn test_env_overrides() {
        let config = RyzenSetConfig::default().apply_env(
            Some(PathBuf::from("/srv/profiles.ini")),
            Some(PathBuf::from("/lib/libryzenadj.so")),
        );
        assert_eq!(config.profiles_path(), PathBuf::from("/srv/profiles.ini"));
        assert_eq!(config.library, PathBuf::from("/lib/libryzenadj.so"));

        let untouched = RyzenSetConfig::default().apply_env(None, None);
        assert!(untouched.profiles.is_none());
    }
}
