//! Per-case resource naming
//!
//! Every network and container a case creates is named
//! `<prefix>.<run>.<case>`, with `.<role>` appended when a case owns several
//! resources of one kind. The run token separates concurrent runs sharing
//! one platform; the case id separates cases within a run. Names are a pure
//! function of those parts, so setup and cleanup of the same case always
//! agree. Parts may contain `-` but never `.`, so different parts can never
//! join into the same name.

use harness_config::parser::{NAME_FRAGMENT_RULE, NAME_SEPARATOR, is_name_fragment};
use serde::Serialize;
use std::fmt;

use crate::{Error, Result};

/// Longest name the harness will hand to the platform
pub const MAX_NAME_LEN: usize = 63;

/// Identity of a test case, supplied explicitly by whoever builds the suite
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CaseId(String);

impl CaseId {
    /// Create a case id; it must already be a valid name fragment
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        validate_fragment("case id", &id)?;
        Ok(Self(id))
    }

    /// The id as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Token identifying one invocation of the harness
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Use a fixed run token, e.g. a CI build number
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        validate_fragment("run id", &id)?;
        Ok(Self(id))
    }

    /// Generate a fresh 8-character token
    pub fn generate() -> Self {
        let mut token = uuid::Uuid::new_v4().simple().to_string();
        token.truncate(8);
        Self(token)
    }

    /// The token as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives platform resource names from case identities
#[derive(Debug, Clone)]
pub struct ResourceNamer {
    prefix: String,
    run: RunId,
}

impl ResourceNamer {
    /// Create a namer for one run
    pub fn new(prefix: impl Into<String>, run: RunId) -> Result<Self> {
        let prefix = prefix.into();
        validate_fragment("name prefix", &prefix)?;
        Ok(Self { prefix, run })
    }

    /// The run this namer belongs to
    pub fn run(&self) -> &RunId {
        &self.run
    }

    /// Name for resources owned by `case`.
    ///
    /// Distinct case ids always yield distinct names. A name that would
    /// exceed [`MAX_NAME_LEN`] is an error rather than a truncation, since
    /// truncating could make two cases share a name.
    pub fn name_for(&self, case: &CaseId) -> Result<String> {
        self.join(case, &[self.prefix.as_str(), self.run.as_str(), case.as_str()])
    }

    /// Name for a secondary resource of `case`, e.g. one of several containers
    pub fn name_with(&self, case: &CaseId, role: &str) -> Result<String> {
        validate_fragment("role", role)?;
        self.join(
            case,
            &[self.prefix.as_str(), self.run.as_str(), case.as_str(), role],
        )
    }

    fn join(&self, case: &CaseId, parts: &[&str]) -> Result<String> {
        let name = parts.join(&NAME_SEPARATOR.to_string());
        if name.len() > MAX_NAME_LEN {
            return Err(Error::naming(format!(
                "name '{}' for case '{}' is longer than {} characters",
                name, case, MAX_NAME_LEN
            )));
        }
        Ok(name)
    }
}

fn validate_fragment(what: &str, s: &str) -> Result<()> {
    if s.is_empty() {
        return Err(Error::naming(format!("{} is empty", what)));
    }
    if !is_name_fragment(s) {
        return Err(Error::naming(format!("{} '{}' {}", what, s, NAME_FRAGMENT_RULE)));
    }
    Ok(())
}
