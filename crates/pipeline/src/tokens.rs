//! Tag tokens: the unit of the model's vocabulary.
//!
//! A token is a raw problem tag reduced to lowercase ASCII letters and
//! suffixed with the problem's difficulty rating, e.g. `"dp"` on an 1800
//! problem becomes `dp1800`, and `"2-sat"` on a 2400 problem becomes
//! `sat2400`. Uppercase letters are dropped, not folded; the vocabulary was
//! built with exactly this rule.

use std::fmt;

/// A normalized tag plus the rating of the problem it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagToken {
    basename: String,
    rating: u32,
}

impl TagToken {
    /// Normalize a raw tag. Returns `None` if nothing survives normalization.
    pub fn from_raw_tag(tag: &str, rating: u32) -> Option<Self> {
        let basename: String = tag.chars().filter(|c| c.is_ascii_lowercase()).collect();
        if basename.is_empty() {
            return None;
        }
        Some(Self { basename, rating })
    }

    /// Split a rendered token back into basename and rating.
    ///
    /// ```ignore
    /// let token = TagToken::parse("dp1800").unwrap();
    /// assert_eq!(token.basename(), "dp");
    /// assert_eq!(token.rating(), 1800);
    /// ```
    pub fn parse(token: &str) -> Option<Self> {
        let split = token.find(|c: char| !c.is_ascii_lowercase())?;
        let (basename, rating) = token.split_at(split);
        if basename.is_empty() || !rating.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self {
            basename: basename.to_string(),
            rating: rating.parse().ok()?,
        })
    }

    pub fn basename(&self) -> &str {
        &self.basename
    }

    pub fn rating(&self) -> u32 {
        self.rating
    }
}

impl fmt::Display for TagToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.basename, self.rating)
    }
}

/// Ordered tag tokens for one user, after filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserTagStream {
    tokens: Vec<TagToken>,
}

impl UserTagStream {
    pub fn new(tokens: Vec<TagToken>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[TagToken] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Rendered token strings in stream order
    pub fn to_strings(&self) -> Vec<String> {
        self.tokens.iter().map(ToString::to_string).collect()
    }
}

impl FromIterator<TagToken> for UserTagStream {
    fn from_iter<I: IntoIterator<Item = TagToken>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
