//! File eligibility with glob pattern support.
//!
//! A file is counted when its name is not hidden, its final `.`-delimited
//! suffix equals the configured source extension, and its full path passes
//! the optional include/exclude glob patterns.

use std::path::Path;

use glob::Pattern;

use crate::error::ClscError;
use crate::Result;

/// Extension counted when none is configured.
pub const DEFAULT_EXTENSION: &str = "c";

/// Configuration for file filtering.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Source extension without the leading dot
    extension: String,
    /// Glob patterns to include (if empty, include all eligible files)
    pub include: Vec<Pattern>,
    /// Glob patterns to exclude
    pub exclude: Vec<Pattern>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

impl FilterConfig {
    /// Create a new filter config (counts `.c` files).
    pub fn new() -> Self {
        Self::default()
    }

    /// Count files with this extension instead. A leading dot is ignored.
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// The configured extension, without the dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Add an include pattern.
    pub fn include(mut self, pattern: &str) -> Result<Self> {
        self.include.push(compile(pattern)?);
        Ok(self)
    }

    /// Add an exclude pattern.
    pub fn exclude(mut self, pattern: &str) -> Result<Self> {
        self.exclude.push(compile(pattern)?);
        Ok(self)
    }

    /// Add multiple include patterns.
    pub fn include_many(mut self, patterns: &[&str]) -> Result<Self> {
        for pattern in patterns {
            self = self.include(pattern)?;
        }
        Ok(self)
    }

    /// Add multiple exclude patterns.
    pub fn exclude_many(mut self, patterns: &[&str]) -> Result<Self> {
        for pattern in patterns {
            self = self.exclude(pattern)?;
        }
        Ok(self)
    }

    /// Check a bare file name: not hidden, and its last suffix is the
    /// configured extension.
    pub fn is_eligible(&self, name: &str) -> bool {
        if name.starts_with('.') {
            return false;
        }

        match name.rsplit_once('.') {
            Some((_, suffix)) => suffix == self.extension,
            None => false,
        }
    }

    /// Check if a path matches the filter criteria.
    ///
    /// A path matches if:
    /// 1. Its file name is eligible
    /// 2. It doesn't match any exclude pattern
    /// 3. It matches at least one include pattern (or include is empty)
    pub fn matches(&self, path: &Path) -> bool {
        let eligible = path
            .file_name()
            .is_some_and(|name| self.is_eligible(&name.to_string_lossy()));
        if !eligible {
            return false;
        }

        let path_str = path.to_string_lossy();

        if self.exclude.iter().any(|p| p.matches(&path_str)) {
            return false;
        }

        self.include.is_empty() || self.include.iter().any(|p| p.matches(&path_str))
    }
}

fn compile(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(|e| ClscError::InvalidGlob {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eligible_c_files() {
        let filter = FilterConfig::new();

        assert!(filter.is_eligible("main.c"));
        assert!(filter.is_eligible("archive.tar.c"));
        assert!(!filter.is_eligible("main.h"));
        assert!(!filter.is_eligible("main.cc"));
        assert!(!filter.is_eligible("main.C"));
        assert!(!filter.is_eligible("Makefile"));
        assert!(!filter.is_eligible("main."));
    }

    #[test]
    fn test_hidden_files_rejected() {
        let filter = FilterConfig::new();

        assert!(!filter.is_eligible(".hidden.c"));
        assert!(!filter.is_eligible(".c"));
    }

    #[test]
    fn test_custom_extension() {
        let filter = FilterConfig::new().with_extension(".h");

        assert_eq!(filter.extension(), "h");
        assert!(filter.is_eligible("stdio.h"));
        assert!(!filter.is_eligible("main.c"));
    }

    #[test]
    fn test_matches_uses_file_name_only_for_eligibility() {
        let filter = FilterConfig::new();

        // Hidden directories do not make a file hidden.
        assert!(filter.matches(Path::new(".git/hooks/tool.c")));
        assert!(!filter.matches(Path::new("src/.scratch.c")));
        assert!(!filter.matches(Path::new("src/notes.txt")));
    }

    #[test]
    fn test_filter_with_include_pattern() {
        let filter = FilterConfig::new().include("**/net/*.c").unwrap();

        assert!(filter.matches(Path::new("src/net/socket.c")));
        assert!(!filter.matches(Path::new("src/main.c")));
    }

    #[test]
    fn test_filter_with_exclude_pattern() {
        let filter = FilterConfig::new().exclude("**/vendor/**").unwrap();

        assert!(filter.matches(Path::new("src/main.c")));
        assert!(!filter.matches(Path::new("vendor/zlib/inflate.c")));
    }

    #[test]
    fn test_filter_with_multiple_patterns() {
        let filter = FilterConfig::new()
            .include_many(&["**/src/**", "**/tests/**"])
            .unwrap()
            .exclude_many(&["**/generated/**"])
            .unwrap();

        assert!(filter.matches(Path::new("project/src/main.c")));
        assert!(filter.matches(Path::new("project/tests/check.c")));
        assert!(!filter.matches(Path::new("project/src/generated/tables.c")));
        assert!(!filter.matches(Path::new("project/tools/gen.c")));
    }

    #[test]
    fn test_invalid_glob_pattern() {
        let result = FilterConfig::new().include("[invalid");

        assert!(result.is_err());
        if let Err(ClscError::InvalidGlob { pattern, .. }) = result {
            assert_eq!(pattern, "[invalid");
        } else {
            panic!("Expected InvalidGlob error");
        }
    }
}
