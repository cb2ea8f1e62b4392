use std::fmt;

/// Hierarchical cache key such as `["projects", "detail", "42"]`.
///
/// Invalidation works on prefixes, so `["projects"]` covers every list,
/// detail and search entry below it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

impl From<&[&str]> for QueryKey {
    fn from(segments: &[&str]) -> Self {
        Self::new(segments.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_matching() {
        let projects = QueryKey::new(["projects"]);
        let detail = projects.child("detail").child("42");
        assert!(detail.starts_with(&projects));
        assert!(detail.starts_with(&detail));
        assert!(!projects.starts_with(&detail));
        assert!(!QueryKey::new(["projectsX"]).starts_with(&projects));
    }

    #[test]
    fn display_lists_segments() {
        assert_eq!(QueryKey::new(["projects", "detail", "7"]).to_string(), "[projects, detail, 7]");
    }
}
