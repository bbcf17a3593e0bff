//! Path pattern compilation and matching.
//!
//! A pattern is written in one of two forms:
//!
//! - literal/parametric: `/users/:id/posts`, where segments beginning
//!   with `:` capture one path segment each and literal segments must
//!   match verbatim; the assembled regex is anchored at both ends
//! - regex: any pattern whose first character is `^` is compiled as
//!   written, so the author controls the end anchor; named captures become
//!   parameters
//!
//! An empty pattern matches any path and captures nothing.

use std::collections::HashMap;

use regex::Regex;
use thiserror::Error;

/// Errors raised while compiling a path pattern.
///
/// These surface at registration time and are fatal to the registration
/// call that triggered them.
#[derive(Debug, Error)]
pub enum PatternError {
    /// The assembled or user-supplied regex failed to compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A parameter name occurs more than once within one pattern.
    #[error("duplicate parameter ':{name}' in pattern '{pattern}'")]
    DuplicateParameter { name: String, pattern: String },
}

/// A compiled path matcher with its ordered parameter names.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    matcher: Matcher,
    // parameter name plus its capture group index, in declaration order
    groups: Vec<(String, usize)>,
}

#[derive(Debug, Clone)]
enum Matcher {
    /// The empty pattern: matches every path.
    Any,
    Regex(Regex),
}

impl PathPattern {
    /// Compiles `source` into a matcher.
    pub fn compile(source: &str) -> Result<Self, PatternError> {
        if source.is_empty() {
            return Ok(Self::match_all());
        }

        if source.starts_with('^') {
            Self::compile_regex(source)
        } else {
            Self::compile_segments(source)
        }
    }

    /// The pattern that matches any path, as produced by an empty source.
    pub fn match_all() -> Self {
        Self { source: String::new(), matcher: Matcher::Any, groups: Vec::new() }
    }

    fn compile_regex(source: &str) -> Result<Self, PatternError> {
        // compiled as written; the regex engine itself rejects duplicate
        // named captures
        let regex = Regex::new(source)
            .map_err(|e| PatternError::invalid_regex(source, e))?;

        let groups = regex
            .capture_names()
            .enumerate()
            .filter_map(|(idx, name)| name.map(|n| (n.to_string(), idx)))
            .collect();

        Ok(Self { source: source.to_string(), matcher: Matcher::Regex(regex), groups })
    }

    fn compile_segments(source: &str) -> Result<Self, PatternError> {
        let mut pattern = String::from("^");
        let mut groups: Vec<(String, usize)> = Vec::new();

        for (i, segment) in source.split('/').enumerate() {
            if i > 0 {
                pattern.push('/');
            }
            if let Some(name) = segment.strip_prefix(':') {
                if groups.iter().any(|(existing, _)| existing == name) {
                    return Err(PatternError::DuplicateParameter {
                        name: name.to_string(),
                        pattern: source.to_string(),
                    });
                }
                groups.push((name.to_string(), groups.len() + 1));
                pattern.push_str("([^/]+)");
            } else {
                pattern.push_str(&regex::escape(segment));
            }
        }
        pattern.push('$');

        let regex = Regex::new(&pattern)
            .map_err(|e| PatternError::invalid_regex(source, e))?;

        Ok(Self { source: source.to_string(), matcher: Matcher::Regex(regex), groups })
    }

    /// Tests `path` against the pattern.
    ///
    /// On a match, returns the captured parameters keyed by name; the map
    /// key set equals the pattern's parameter name list.
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let regex = match &self.matcher {
            Matcher::Any => return Some(HashMap::new()),
            Matcher::Regex(regex) => regex,
        };

        let captures = regex.captures(path)?;
        let mut params = HashMap::with_capacity(self.groups.len());
        for (name, idx) in &self.groups {
            if let Some(capture) = captures.get(*idx) {
                params.insert(name.clone(), capture.as_str().to_string());
            }
        }
        Some(params)
    }

    /// The pattern text this matcher was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parameter names in declaration order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(name, _)| name.as_str())
    }
}

impl PatternError {
    fn invalid_regex(pattern: &str, source: regex::Error) -> Self {
        Self::InvalidRegex { pattern: pattern.to_string(), source }
    }
}
