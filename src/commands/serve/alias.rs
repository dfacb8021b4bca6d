//! Bidirectional chat handle <-> GitHub username mapping.

use std::collections::HashMap;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AliasError {
    #[error("@{chat} is already registered as github user {github:?}")]
    ChatHandleTaken { chat: String, github: String },

    #[error("github user {github:?} is already registered to @{chat}")]
    GitHubUserTaken { github: String, chat: String },
}

/// Chat handle to GitHub username aliases.
///
/// Invariant: `by_chat` and `by_github` are exact inverses. An entry exists
/// in both maps or in neither.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AliasTable {
    by_chat: HashMap<String, String>,
    by_github: HashMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `chat` as `github`. Never overwrites: fails if either side
    /// already has a mapping, leaving the table unchanged.
    pub fn insert(&mut self, chat: &str, github: &str) -> Result<(), AliasError> {
        if let Some(existing) = self.by_chat.get(chat) {
            return Err(AliasError::ChatHandleTaken {
                chat: chat.to_string(),
                github: existing.clone(),
            });
        }
        if let Some(existing) = self.by_github.get(github) {
            return Err(AliasError::GitHubUserTaken {
                github: github.to_string(),
                chat: existing.clone(),
            });
        }
        self.by_chat.insert(chat.to_string(), github.to_string());
        self.by_github.insert(github.to_string(), chat.to_string());
        Ok(())
    }

    /// Remove the mapping of `chat`, returning the GitHub username it had.
    pub fn remove_by_chat(&mut self, chat: &str) -> Option<String> {
        let github = self.by_chat.remove(chat)?;
        self.by_github.remove(&github);
        Some(github)
    }

    pub fn github_for(&self, chat: &str) -> Option<&str> {
        self.by_chat.get(chat).map(String::as_str)
    }

    pub fn chat_for(&self, github: &str) -> Option<&str> {
        self.by_github.get(github).map(String::as_str)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.by_chat.len()
    }

    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        self.by_chat.len() == self.by_github.len()
            && self
                .by_chat
                .iter()
                .all(|(chat, github)| self.by_github.get(github) == Some(chat))
    }
}
