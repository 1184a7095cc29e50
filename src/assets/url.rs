//! Resource URL helpers. Pure string handling, no I/O.

/// A model location split at its last path separator.
///
/// `root_url + filename` always reconstructs the original string, and
/// `root_url` is either empty or ends with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceUrl {
    pub root_url: String,
    pub filename: String,
}

impl ResourceUrl {
    #[must_use]
    pub fn new(root_url: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            root_url: root_url.into(),
            filename: filename.into(),
        }
    }

    /// `root_url + filename`.
    #[must_use]
    pub fn full_url(&self) -> String {
        format!("{}{}", self.root_url, self.filename)
    }
}

impl std::fmt::Display for ResourceUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.root_url, self.filename)
    }
}

/// Splits `url` after its last `/`.
///
/// ```
/// use avatar_loader::assets::split_url;
///
/// let parts = split_url("a/b/c.glb");
/// assert_eq!(parts.root_url, "a/b/");
/// assert_eq!(parts.filename, "c.glb");
/// ```
#[must_use]
pub fn split_url(url: &str) -> ResourceUrl {
    let split = url.rfind('/').map_or(0, |i| i + 1);
    let (root_url, filename) = url.split_at(split);
    ResourceUrl::new(root_url, filename)
}
