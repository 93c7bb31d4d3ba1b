//! Deep links.
//!
//! A deep link addresses one entry, optionally at one fork:
//! `#<field>/<name>[@<FORK>]`, e.g. `#preset_vars/SLOTS_PER_EPOCH@ALTAIR`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use specview_types::{FieldKind, RevisionLabel};

use crate::error::{Result, ViewError};

/// A parsed deep link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeepLink {
    /// Field the entry lives in.
    pub field: FieldKind,
    /// Entry (base) name.
    pub name: String,
    /// Fork to resolve the entry at; `None` means its whole history.
    pub fork: Option<RevisionLabel>,
}

impl DeepLink {
    pub fn new(field: FieldKind, name: impl Into<String>) -> Self {
        Self {
            field,
            name: name.into(),
            fork: None,
        }
    }

    pub fn at_fork(mut self, fork: impl Into<RevisionLabel>) -> Self {
        self.fork = Some(fork.into());
        self
    }

    /// The collapse/expand id for the linked entry (`field/name`).
    pub fn entry_id(&self) -> String {
        format!("{}/{}", self.field, self.name)
    }

    /// Parse a fragment, with or without the leading `#`.
    pub fn parse(fragment: &str) -> Result<Self> {
        let invalid = |reason: &str| ViewError::InvalidLink {
            link: fragment.to_string(),
            reason: reason.to_string(),
        };

        let body = fragment.strip_prefix('#').unwrap_or(fragment);
        let (field, rest) = body
            .split_once('/')
            .ok_or_else(|| invalid("expected <field>/<name>"))?;
        let field: FieldKind = field.parse()?;

        let (name, fork) = match rest.split_once('@') {
            Some((name, fork)) if fork.is_empty() => {
                return Err(invalid(&format!("empty fork after '@' in {name:?}")))
            }
            Some((name, fork)) => (name, Some(RevisionLabel::new(fork))),
            None => (rest, None),
        };
        if name.is_empty() {
            return Err(invalid("empty entry name"));
        }

        Ok(Self {
            field,
            name: name.to_string(),
            fork,
        })
    }
}

impl FromStr for DeepLink {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DeepLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}/{}", self.field, self.name)?;
        if let Some(fork) = &self.fork {
            write!(f, "@{fork}")?;
        }
        Ok(())
    }
}
