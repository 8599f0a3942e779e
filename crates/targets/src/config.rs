//! Parsers for the policy configuration files.
//!
//! All three formats are line oriented. Blank lines and lines starting with
//! `#` are ignored, and surrounding whitespace is trimmed.

use std::collections::HashMap;

/// How attestation is handled for a target package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Patch when the TEE works, generate when it is broken.
    Auto,
    /// Always patch the leaf certificate.
    LeafHack,
    /// Always generate a fresh chain.
    Generate,
}

/// Packages that generate unless the target file says otherwise.
pub const DEFAULT_GENERATE: &[&str] = &["com.google.android.gsf", "com.google.android.gms", "com.android.vending"];

fn content_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty() && !l.starts_with('#'))
}

/// The parsed `target.txt`: one package per line, with an optional suffix.
///
/// ```
/// use targets::{Mode, TargetConfig};
///
/// let config = TargetConfig::parse("com.a!\ncom.b?\n# note\ncom.c\n");
/// assert_eq!(config.mode("com.a"), Some(Mode::Generate));
/// assert_eq!(config.mode("com.b"), Some(Mode::LeafHack));
/// assert_eq!(config.mode("com.c"), Some(Mode::Auto));
/// assert_eq!(config.mode("com.d"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetConfig {
    modes: HashMap<String, Mode>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        let modes = DEFAULT_GENERATE.iter().map(|p| (p.to_string(), Mode::Generate)).collect();
        Self { modes }
    }
}

impl TargetConfig {
    pub fn parse(text: &str) -> Self {
        let mut config = Self::default();
        for line in content_lines(text) {
            let (name, mode) = if let Some(name) = line.strip_suffix('!') {
                (name.trim(), Mode::Generate)
            } else if let Some(name) = line.strip_suffix('?') {
                (name.trim(), Mode::LeafHack)
            } else {
                (line, Mode::Auto)
            };
            config.modes.insert(name.to_string(), mode);
        }
        config
    }

    pub fn mode(&self, package: &str) -> Option<Mode> {
        self.modes.get(package).copied()
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}

/// Security patch level overrides from `security_patch.txt`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchLevel {
    pub system: Option<String>,
    pub vendor: Option<String>,
    pub boot: Option<String>,
    pub all: Option<String>,
}

impl PatchLevel {
    /// Parses either a single bare value for every partition, or `key=value`
    /// lines for `system`, `vendor`, `boot` and `all`. Keys are
    /// case-insensitive and missing partitions fall back to `all`.
    ///
    /// Returns `None` when the file has no content lines.
    pub fn parse(text: &str) -> Option<Self> {
        let lines: Vec<&str> = content_lines(text).collect();
        match lines.as_slice() {
            [] => return None,
            [single] if !single.contains('=') => {
                let all = Some(single.to_string());
                return Some(Self { system: all.clone(), vendor: all.clone(), boot: all.clone(), all });
            }
            _ => {}
        }

        let mut map = HashMap::new();
        for line in lines {
            // a line starting with '=' has no key
            if let Some((key, value)) = line.split_once('=').filter(|(k, _)| !k.is_empty()) {
                map.insert(key.trim().to_lowercase(), value.trim().to_string());
            }
        }
        let all = map.remove("all");
        let mut pick = |key: &str| map.remove(key).or_else(|| all.clone());
        let system = pick("system");
        let vendor = pick("vendor");
        let boot = pick("boot");
        Some(Self { system, vendor, boot, all })
    }
}

/// Result of the TEE self-check, as recorded in `tee_status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TeeStatus {
    Working,
    Broken,
    #[default]
    Unknown,
}

impl TeeStatus {
    /// Parses the contents of an existing status file. Only
    /// `teeBroken=true` marks the TEE as broken.
    pub fn parse(text: &str) -> Self {
        match text.trim() {
            "teeBroken=true" => Self::Broken,
            _ => Self::Working,
        }
    }

    /// The line `parse` reads back.
    pub fn to_line(self) -> Option<&'static str> {
        match self {
            Self::Working => Some("teeBroken=false"),
            Self::Broken => Some("teeBroken=true"),
            Self::Unknown => None,
        }
    }
}
