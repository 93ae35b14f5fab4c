//! Strongly typed option values

use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use url::Url;

/// PDF compatibility level requested from the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AcrobatVersion {
    Acrobat7_0_5,
    Acrobat8,
    Acrobat8_1,
    Acrobat9,
    Acrobat10,
    Acrobat10_1,
    /// Engine default
    #[default]
    Acrobat11,
}

impl AcrobatVersion {
    pub const ALL: [AcrobatVersion; 7] = [
        AcrobatVersion::Acrobat7_0_5,
        AcrobatVersion::Acrobat8,
        AcrobatVersion::Acrobat8_1,
        AcrobatVersion::Acrobat9,
        AcrobatVersion::Acrobat10,
        AcrobatVersion::Acrobat10_1,
        AcrobatVersion::Acrobat11,
    ];

    /// Wire name, e.g. `Acrobat_10`
    pub const fn as_str(self) -> &'static str {
        match self {
            AcrobatVersion::Acrobat7_0_5 => "Acrobat_7_0_5",
            AcrobatVersion::Acrobat8 => "Acrobat_8",
            AcrobatVersion::Acrobat8_1 => "Acrobat_8_1",
            AcrobatVersion::Acrobat9 => "Acrobat_9",
            AcrobatVersion::Acrobat10 => "Acrobat_10",
            AcrobatVersion::Acrobat10_1 => "Acrobat_10_1",
            AcrobatVersion::Acrobat11 => "Acrobat_11",
        }
    }
}

impl FromStr for AcrobatVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("expected one of {}", names(Self::ALL.map(Self::as_str))))
    }
}

/// How aggressively the renderer may cache template artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CacheStrategy {
    /// Engine default
    #[default]
    Aggressive,
    Conservative,
}

impl CacheStrategy {
    pub const ALL: [CacheStrategy; 2] = [CacheStrategy::Aggressive, CacheStrategy::Conservative];

    pub const fn as_str(self) -> &'static str {
        match self {
            CacheStrategy::Aggressive => "AGGRESSIVE",
            CacheStrategy::Conservative => "CONSERVATIVE",
        }
    }
}

impl FromStr for CacheStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("expected one of {}", names(Self::ALL.map(Self::as_str))))
    }
}

fn names<const N: usize>(all: [&str; N]) -> String {
    all.join(", ")
}

macro_rules! wire_name_impls {
    ($($ty:ty),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    )*};
}

wire_name_impls!(AcrobatVersion, CacheStrategy);

/// A filesystem path or a URL; never both
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOrUrl {
    Path(PathBuf),
    Url(Url),
}

impl PathOrUrl {
    /// The containing directory (or URL "directory").
    pub fn parent(&self) -> Option<PathOrUrl> {
        match self {
            PathOrUrl::Path(path) => path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| PathOrUrl::Path(p.to_path_buf())),
            PathOrUrl::Url(url) => {
                if url.cannot_be_a_base() {
                    return None;
                }
                url.join("./").ok().map(PathOrUrl::Url)
            }
        }
    }

    /// The last path segment, when there is a non-empty one.
    pub fn file_name(&self) -> Option<String> {
        match self {
            PathOrUrl::Path(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            PathOrUrl::Url(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|segment| !segment.is_empty())
                .map(str::to_string),
        }
    }

    /// Resolve `reference` against this location. Absolute references win.
    pub fn join(&self, reference: &str) -> String {
        match self {
            PathOrUrl::Path(root) => root.join(Path::new(reference)).display().to_string(),
            PathOrUrl::Url(root) => root
                .join(reference)
                .map(String::from)
                .unwrap_or_else(|_| reference.to_string()),
        }
    }
}

impl fmt::Display for PathOrUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathOrUrl::Path(path) => write!(f, "{}", path.display()),
            PathOrUrl::Url(url) => f.write_str(url.as_str()),
        }
    }
}

impl Serialize for PathOrUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A form submission target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbsoluteOrRelativeUrl {
    Absolute(Url),
    Relative(String),
}

impl AbsoluteOrRelativeUrl {
    pub fn as_str(&self) -> &str {
        match self {
            AbsoluteOrRelativeUrl::Absolute(url) => url.as_str(),
            AbsoluteOrRelativeUrl::Relative(reference) => reference,
        }
    }
}

impl fmt::Display for AbsoluteOrRelativeUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AbsoluteOrRelativeUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A locale tag such as `en` or `en-CA`, kept exactly as sent
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// `en`
impl Default for Locale {
    fn default() -> Self {
        Locale("en".to_string())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let plausible = !s.is_empty()
            && s.split(['-', '_']).all(|subtag| {
                (1..=8).contains(&subtag.len())
                    && subtag.bytes().all(|b| b.is_ascii_alphanumeric())
            });
        if plausible {
            Ok(Locale(s.to_string()))
        } else {
            Err("expected a locale tag such as 'en' or 'en-CA'".to_string())
        }
    }
}
