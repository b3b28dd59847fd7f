//! Token identification types.
//!
//! A token is identified by an opaque string (a mint address on Solana).
//! The identifier doubles as a directory and file-name component, so it is
//! validated once when the list is built.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Opaque token identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(String);

impl TokenId {
    /// Create a validated token id.
    ///
    /// Rejects empty ids and anything that could escape the data directory
    /// when used as a path component.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CoreError::InvalidTokenId("empty identifier".to_string()));
        }
        if id.contains('/') || id.contains('\\') || id == "." || id == ".." {
            return Err(CoreError::InvalidTokenId(format!(
                "'{id}' is not usable as a directory name"
            )));
        }
        if id.contains(',') {
            return Err(CoreError::InvalidTokenId(format!(
                "'{id}' contains a comma, which is the query separator"
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TokenId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Fixed, ordered set of tracked tokens.
///
/// The order is the column order of the aggregate table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenList {
    tokens: Vec<TokenId>,
}

impl TokenList {
    /// Build a list from raw identifiers.
    ///
    /// The list must be non-empty and free of duplicates.
    pub fn new<I, S>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut tokens = Vec::new();
        for raw in ids {
            let id = TokenId::new(raw)?;
            if !seen.insert(id.clone()) {
                return Err(CoreError::InvalidTokenList(format!("duplicate token id '{id}'")));
            }
            tokens.push(id);
        }
        if tokens.is_empty() {
            return Err(CoreError::InvalidTokenList("no tokens configured".to_string()));
        }
        Ok(Self { tokens })
    }

    pub fn iter(&self) -> impl Iterator<Item = &TokenId> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tokens.iter().any(|t| t.as_str() == id)
    }

    /// Comma-joined identifiers, as sent in the `ids` query parameter.
    pub fn joined(&self) -> String {
        self.tokens
            .iter()
            .map(TokenId::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a TokenId;
    type IntoIter = std::slice::Iter<'a, TokenId>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_id_rejects_path_components() {
        assert!(TokenId::new("").is_err());
        assert!(TokenId::new("   ").is_err());
        assert!(TokenId::new("..").is_err());
        assert!(TokenId::new("a/b").is_err());
        assert!(TokenId::new("a\\b").is_err());
        assert!(TokenId::new("a,b").is_err());
        assert!(TokenId::new("JUPyiwrYJFskUPiHa7hkeR8VUtAeFoSYbKedZNsDvCN").is_ok());
    }

    #[test]
    fn test_token_list_preserves_order() {
        let list = TokenList::new(["B", "A", "C"]).unwrap();
        let ids: Vec<_> = list.iter().map(TokenId::as_str).collect();
        assert_eq!(ids, vec!["B", "A", "C"]);
        assert_eq!(list.joined(), "B,A,C");
        assert!(list.contains("A"));
        assert!(!list.contains("D"));
    }

    #[test]
    fn test_token_list_rejects_duplicates() {
        let err = TokenList::new(["A", "B", "A"]).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_token_list_rejects_empty() {
        let empty: Vec<String> = Vec::new();
        assert!(TokenList::new(empty).is_err());
    }
}
