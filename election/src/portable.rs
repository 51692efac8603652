//! Portable election file.
//!
//! A single `[VOTE]` table for distributing a poll definition out of band,
//! before anyone has joined its channel. Reading trusts the stored hash and
//! channel address; use [`Election::to_params`] and [`Election::derive`] to
//! verify them again.
//!
//! Files are written as TOML. Reading also accepts the older INI layout with
//! bare `key = value` (or `key: value`) lines and unquoted values.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chanvote_types::{Address, ContentHash};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::election::{Election, ElectionParams};
use crate::error::ElectionError;

#[derive(Serialize, Deserialize)]
struct ElectionFile {
    #[serde(rename = "VOTE")]
    vote: VoteSection,
}

#[derive(Serialize, Deserialize)]
struct VoteSection {
    question: String,
    answers: String,
    voters: String,
    hash: String,
    #[serde(rename = "chanAddress")]
    chan_address: String,
}

const SECTION: &str = "VOTE";

fn file_error(e: impl std::fmt::Display) -> ElectionError {
    ElectionError::File(e.to_string())
}

/// Read the `[VOTE]` section of an INI document. Keys keep their case.
fn parse_ini_section(contents: &str) -> Result<VoteSection, ElectionError> {
    let mut entries = BTreeMap::new();
    let mut in_section = false;
    let mut seen = false;
    for (n, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            in_section = name.trim() == SECTION;
            seen |= in_section;
            continue;
        }
        if !in_section {
            continue;
        }
        let split = match (line.find('='), line.find(':')) {
            (Some(eq), Some(colon)) => eq.min(colon),
            (Some(at), None) | (None, Some(at)) => at,
            (None, None) => return Err(file_error(format!("line {}: expected key = value", n + 1))),
        };
        let (key, value) = line.split_at(split);
        entries.insert(key.trim().to_string(), value[1..].trim().to_string());
    }
    if !seen {
        return Err(file_error(format!("missing [{SECTION}] section")));
    }
    let mut take = |key: &str| {
        entries
            .remove(key)
            .ok_or_else(|| file_error(format!("missing key `{key}` in [{SECTION}]")))
    };
    Ok(VoteSection {
        question: take("question")?,
        answers: take("answers")?,
        voters: take("voters")?,
        hash: take("hash")?,
        chan_address: take("chanAddress")?,
    })
}

impl Election {
    /// Parameters that re-derive this election with its identity as the
    /// expected outcome.
    pub fn to_params(&self) -> ElectionParams {
        ElectionParams::new(self.question(), self.answers().to_vec(), self.voters().to_vec())
            .with_expected_hash(self.content_hash())
            .with_expected_address(self.chan_address().clone())
    }

    pub fn to_file_string(&self) -> Result<String, ElectionError> {
        let file = ElectionFile {
            vote: VoteSection {
                question: self.question().to_string(),
                answers: serde_json::to_string(self.answers()).map_err(file_error)?,
                voters: serde_json::to_string(self.voters()).map_err(file_error)?,
                hash: self.content_hash().to_hex(),
                chan_address: self.chan_address().to_string(),
            },
        };
        toml::to_string(&file).map_err(file_error)
    }

    pub fn from_file_str(contents: &str) -> Result<Self, ElectionError> {
        let v = match toml::from_str::<ElectionFile>(contents) {
            Ok(file) => file.vote,
            Err(toml_err) => parse_ini_section(contents).map_err(|ini_err| {
                debug!(error = %toml_err, "election file is not TOML");
                ini_err
            })?,
        };
        let answers: Vec<String> = serde_json::from_str(&v.answers).map_err(file_error)?;
        let voters: Vec<Address> = serde_json::from_str(&v.voters).map_err(file_error)?;
        let hash: ContentHash = v.hash.parse().map_err(file_error)?;
        Ok(Election::from_trusted(
            v.question,
            answers,
            voters,
            Some(hash),
            Address::new(v.chan_address),
        )?)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ElectionError> {
        let path = path.as_ref();
        fs::write(path, self.to_file_string()?)?;
        debug!(path = %path.display(), chan = %self.chan_address(), "saved election file");
        Ok(())
    }

    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, ElectionError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading election file");
        Self::from_file_str(&fs::read_to_string(path)?)
    }
}
