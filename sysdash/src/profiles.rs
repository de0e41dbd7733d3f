//! Connection profiles: JSON mapping of profile name -> { url, tls_ca, interval_secs }
//! Stored under $XDG_CONFIG_HOME/sysdash/profiles.json (fallback: platform config dir).

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, io, path::PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProfileEntry {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_ca: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProfilesFile {
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileEntry>,
    #[serde(default)]
    pub version: u32,
}

pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("sysdash")
    } else {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sysdash")
    }
}

pub fn profiles_path() -> PathBuf {
    config_dir().join("profiles.json")
}

pub fn load_profiles() -> ProfilesFile {
    let path = profiles_path();
    match fs::read_to_string(&path) {
        Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), "ignoring unreadable profiles file: {e}");
            ProfilesFile::default()
        }),
        Err(_) => ProfilesFile::default(),
    }
}

pub fn save_profiles(p: &ProfilesFile) -> io::Result<()> {
    let path = profiles_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_vec_pretty(p).map_err(io::Error::other)?;
    fs::write(path, data)
}

#[derive(Debug, PartialEq, Eq)]
pub enum ResolveProfile {
    /// Use the runtime inputs as given (the caller may persist them).
    Direct(ProfileEntry),
    /// Taken from an existing profile entry
    Loaded(ProfileEntry),
    /// Prompt the user to pick one of these profile names
    PromptSelect(Vec<String>),
    /// Prompt the user to create the named profile
    PromptCreate(String),
    /// Nothing to connect to
    None,
}

pub struct ProfileRequest {
    pub profile_name: Option<String>,
    pub url: Option<String>,
    pub tls_ca: Option<String>,
    pub interval_secs: Option<u64>,
}

impl ProfileRequest {
    pub fn resolve(self, pf: &ProfilesFile) -> ResolveProfile {
        match (self.profile_name, self.url) {
            // Only a profile name: load it, or offer to create it
            (Some(name), None) => match pf.profiles.get(&name) {
                Some(entry) => {
                    let mut entry = entry.clone();
                    // A CLI interval overrides the stored one for this run
                    if self.interval_secs.is_some() {
                        entry.interval_secs = self.interval_secs;
                    }
                    ResolveProfile::Loaded(entry)
                }
                None => ResolveProfile::PromptCreate(name),
            },
            (_, Some(url)) => ResolveProfile::Direct(ProfileEntry {
                url,
                tls_ca: self.tls_ca,
                interval_secs: self.interval_secs,
            }),
            (None, None) if pf.profiles.is_empty() => ResolveProfile::None,
            (None, None) => ResolveProfile::PromptSelect(pf.profiles.keys().cloned().collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_with(name: &str, url: &str) -> ProfilesFile {
        let mut pf = ProfilesFile::default();
        pf.profiles.insert(
            name.into(),
            ProfileEntry {
                url: url.into(),
                tls_ca: None,
                interval_secs: Some(10),
            },
        );
        pf
    }

    fn req(name: Option<&str>, url: Option<&str>) -> ProfileRequest {
        ProfileRequest {
            profile_name: name.map(Into::into),
            url: url.map(Into::into),
            tls_ca: None,
            interval_secs: None,
        }
    }

    #[test]
    fn name_only_loads_existing() {
        let pf = file_with("lab", "http://lab:5000");
        match req(Some("lab"), None).resolve(&pf) {
            ResolveProfile::Loaded(e) => {
                assert_eq!(e.url, "http://lab:5000");
                assert_eq!(e.interval_secs, Some(10));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_name_prompts_create() {
        let pf = ProfilesFile::default();
        assert_eq!(
            req(Some("new"), None).resolve(&pf),
            ResolveProfile::PromptCreate("new".into())
        );
    }

    #[test]
    fn url_wins_over_profile() {
        let pf = file_with("lab", "http://lab:5000");
        match req(Some("lab"), Some("http://other:1")).resolve(&pf) {
            ResolveProfile::Direct(e) => assert_eq!(e.url, "http://other:1"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn nothing_given() {
        assert_eq!(req(None, None).resolve(&ProfilesFile::default()), ResolveProfile::None);
        let pf = file_with("lab", "http://lab:5000");
        assert_eq!(
            req(None, None).resolve(&pf),
            ResolveProfile::PromptSelect(vec!["lab".into()])
        );
    }

    #[test]
    fn cli_interval_overrides_stored() {
        let pf = file_with("lab", "http://lab:5000");
        let mut r = req(Some("lab"), None);
        r.interval_secs = Some(3);
        match r.resolve(&pf) {
            ResolveProfile::Loaded(e) => assert_eq!(e.interval_secs, Some(3)),
            other => panic!("unexpected {other:?}"),
        }
    }
}
