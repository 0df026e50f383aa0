//! The tag-token vocabulary shared by every request.
//!
//! Loaded once at process start and read-only afterwards, so it is shared
//! behind an `Arc` without any locking. Both directions of the mapping are
//! materialised at load time:
//! - `token -> id` through a HashMap
//! - `id -> token` through a Vec indexed by id, so the decoder never has to
//!   scan the forward map to resolve a prediction

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::TokenId;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Id reserved for left padding; never assigned to a token.
pub const PADDING_ID: TokenId = 0;

/// Largest id an artifact may assign. The reverse index holds one slot per
/// id up to the maximum, so this bounds its allocation.
pub const MAX_TOKEN_ID: TokenId = 1 << 20;

/// Bidirectional token <-> id mapping.
#[derive(Debug, Clone)]
pub struct TagVocabulary {
    token_to_id: HashMap<String, TokenId>,
    /// Slot `i` holds the token with id `i`; slot 0 is always `None`
    id_to_token: Vec<Option<String>>,
}

impl TagVocabulary {
    /// Load and validate a vocabulary artifact from disk.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let entries = parser::parse_vocabulary(path)?;
        let vocab = Self::from_entries(entries)?;
        info!(
            path = %path.display(),
            tokens = vocab.token_count(),
            size = vocab.len(),
            "Loaded tag vocabulary"
        );
        Ok(vocab)
    }

    /// Build a vocabulary from `(token, id)` pairs.
    ///
    /// Rejects the padding id, ids above [`MAX_TOKEN_ID`], empty tokens,
    /// duplicate tokens and duplicate ids, so that the two directions are
    /// exact inverses of each other.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, TokenId)>,
        S: Into<String>,
    {
        let mut token_to_id = HashMap::new();
        let mut id_to_token: Vec<Option<String>> = vec![None];

        for (token, id) in entries {
            let token = token.into();
            if token.is_empty() {
                return Err(DataLoadError::InvalidValue {
                    field: "token".to_string(),
                    value: format!("<empty> (id {})", id),
                });
            }
            if id == PADDING_ID {
                return Err(DataLoadError::InvalidValue {
                    field: "id".to_string(),
                    value: format!("{} is reserved for padding (token {})", id, token),
                });
            }
            if id > MAX_TOKEN_ID {
                return Err(DataLoadError::InvalidValue {
                    field: "id".to_string(),
                    value: format!("{} exceeds the maximum of {} (token {})", id, MAX_TOKEN_ID, token),
                });
            }

            let slot = id as usize;
            if slot >= id_to_token.len() {
                id_to_token.resize(slot + 1, None);
            }
            if let Some(existing) = &id_to_token[slot] {
                return Err(DataLoadError::DuplicateId {
                    id,
                    first: existing.clone(),
                    second: token,
                });
            }
            if token_to_id.contains_key(&token) {
                return Err(DataLoadError::DuplicateToken { token });
            }

            id_to_token[slot] = Some(token.clone());
            token_to_id.insert(token, id);
        }

        if token_to_id.is_empty() {
            return Err(DataLoadError::ValidationError(
                "vocabulary contains no tokens".to_string(),
            ));
        }

        Ok(Self {
            token_to_id,
            id_to_token,
        })
    }

    /// Look up the id of a token
    pub fn get_id(&self, token: &str) -> Option<TokenId> {
        self.token_to_id.get(token).copied()
    }

    /// Resolve an id back to its token
    pub fn get_token(&self, id: TokenId) -> Option<&str> {
        self.id_to_token
            .get(id as usize)
            .and_then(|slot| slot.as_deref())
    }

    /// Map tokens to ids, silently dropping tokens the vocabulary doesn't know
    pub fn encode<'a, I>(&self, tokens: I) -> Vec<TokenId>
    where
        I: IntoIterator<Item = &'a str>,
    {
        tokens
            .into_iter()
            .filter_map(|token| self.get_id(token))
            .collect()
    }

    /// Size V of the id space, including the padding slot
    pub fn len(&self) -> usize {
        self.id_to_token.len()
    }

    /// Number of actual tokens (excludes padding and unused ids)
    pub fn token_count(&self) -> usize {
        self.token_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.token_to_id.is_empty()
    }
}
