use crate::error::{Error, Result};
use crate::ryzenadj::Field;
use std::collections::BTreeMap;
use std::path::Path;

pub const CATEGORY_KEY: &str = "category";
pub const MAX_PERFORMANCE_KEY: &str = "max-performance";

/// Section whose keys every profile inherits unless it sets them itself.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// A named section of the profile store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    entries: BTreeMap<String, String>,
}

/// The values a profile pushes to the SMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileValues {
    limits: [u32; 7],
    pub max_performance: bool,
}

impl ProfileValues {
    pub fn new(limits: [u32; 7], max_performance: bool) -> Self {
        Self {
            limits,
            max_performance,
        }
    }

    pub fn limit(&self, field: Field) -> u32 {
        self.limits[field as usize]
    }

    /// Whether live readings match these limits. Mode and category are not compared.
    pub fn matches(&self, live: &[i64; 7]) -> bool {
        Field::ALL
            .into_iter()
            .all(|f| i64::from(self.limit(f)) == live[f as usize])
    }
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.entries.insert(key.to_lowercase(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn category(&self) -> Option<&str> {
        self.get(CATEGORY_KEY)
    }

    /// Parse the seven limits and the performance mode.
    pub fn values(&self) -> Result<ProfileValues> {
        let mut limits = [0u32; 7];
        for field in Field::ALL {
            let raw = self.require(field.key())?;
            limits[field as usize] = raw.parse().map_err(|e| {
                self.field_error(
                    field.key(),
                    format!("'{}' is not an unsigned integer: {}", raw, e),
                )
            })?;
        }

        let raw = self.require(MAX_PERFORMANCE_KEY)?;
        let max_performance = parse_bool(raw).ok_or_else(|| {
            self.field_error(MAX_PERFORMANCE_KEY, format!("'{}' is not a boolean", raw))
        })?;

        Ok(ProfileValues::new(limits, max_performance))
    }

    fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| self.field_error(key, "is missing".to_string()))
    }

    fn field_error(&self, key: &str, detail: String) -> Error {
        Error::ProfileField {
            profile: self.name.clone(),
            key: key.to_string(),
            detail,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}

/// All profiles from the store file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileStore {
    profiles: Vec<Profile>,
}

impl ProfileStore {
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self { profiles }
    }

    /// Load the store from `path`. Returns `None` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::Io {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };
        Self::parse(&content, path).map(Some)
    }

    /// Parse INI-style content: `[name]` headers followed by `key = value` lines.
    /// `[DEFAULT]` is not a profile; its entries fill gaps in every other section.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let mut profiles: Vec<Profile> = Vec::new();
        let parse_err = |line: usize, detail: String| Error::StoreParse {
            path: path.to_path_buf(),
            line,
            detail,
        };

        for (idx, line) in content.lines().enumerate() {
            let lineno = idx + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let name = header
                    .strip_suffix(']')
                    .ok_or_else(|| parse_err(lineno, format!("unterminated section header '{}'", line)))?
                    .trim();
                if name.is_empty() {
                    return Err(parse_err(lineno, "empty section name".to_string()));
                }
                if profiles.iter().any(|p| p.name == name) {
                    return Err(parse_err(lineno, format!("duplicate profile '{}'", name)));
                }
                profiles.push(Profile::new(name));
                continue;
            }

            let (key, value) = match (line.find('='), line.find(':')) {
                (Some(a), Some(b)) => line.split_at(a.min(b)),
                (Some(i), None) | (None, Some(i)) => line.split_at(i),
                (None, None) => {
                    return Err(parse_err(lineno, format!("expected 'key = value', got '{}'", line)));
                }
            };
            let key = key.trim();
            let value = value[1..].trim();
            if key.is_empty() {
                return Err(parse_err(lineno, "empty key".to_string()));
            }

            let profile = profiles
                .last_mut()
                .ok_or_else(|| parse_err(lineno, format!("'{}' appears before any profile", key)))?;
            let key = key.to_lowercase();
            if profile.entries.contains_key(&key) {
                return Err(parse_err(
                    lineno,
                    format!("duplicate key '{}' in profile '{}'", key, profile.name),
                ));
            }
            profile.entries.insert(key, value.to_string());
        }

        if let Some(pos) = profiles.iter().position(|p| p.name == DEFAULT_SECTION) {
            let defaults = profiles.remove(pos);
            for profile in &mut profiles {
                for (key, value) in &defaults.entries {
                    profile
                        .entries
                        .entry(key.clone())
                        .or_insert_with(|| value.clone());
                }
            }
        }

        Ok(Self { profiles })
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
