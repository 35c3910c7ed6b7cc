//! Deterministic resource naming.
//!
//! Every resource is named `{project}-{region}-{kind}-{environment}-{functionality}`.
//! Stacks agree on each other's resources (secrets, ECR repositories, ECS
//! services) by recomputing the same name instead of looking it up.
//!
//! Inputs are not validated or escaped. Segments may themselves contain
//! hyphens (the region always does), so a name cannot be split back into
//! its parts.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::trace;

use crate::core::environment::EnvironmentConfig;
use crate::error::{NamingError, Result};

/// Name generator closed over one environment record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namer {
    project: String,
    region: String,
    environment: String,
}

impl Namer {
    pub fn new(env: &EnvironmentConfig) -> Self {
        Self {
            project: env.project.clone(),
            region: env.region.clone(),
            environment: env.environment.clone(),
        }
    }

    /// Generate the name of a resource of `kind` serving `functionality`.
    pub fn name(&self, kind: &str, functionality: &str) -> String {
        format!(
            "{}-{}-{}-{}-{}",
            self.project, self.region, kind, self.environment, functionality
        )
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }
}

/// Records every name issued while assembling one stack.
///
/// The owner of each issued name is its `kind/functionality` pair, so the
/// ledger can later tell two different inputs that produced the same string
/// apart from one input used twice.
#[derive(Debug, Clone)]
pub struct NameBook {
    namer: Namer,
    issued: Vec<NameClaim>,
}

impl NameBook {
    pub fn new(namer: Namer) -> Self {
        Self {
            namer,
            issued: Vec::new(),
        }
    }

    /// Generate a name and record it.
    pub fn name(&mut self, kind: &str, functionality: &str) -> String {
        let name = self.namer.name(kind, functionality);
        self.issued.push(NameClaim {
            name: name.clone(),
            owner: format!("{}/{}", kind, functionality),
        });
        name
    }

    pub fn namer(&self) -> &Namer {
        &self.namer
    }

    /// Every issued name in issue order, duplicates included.
    pub fn issued(&self) -> &[NameClaim] {
        &self.issued
    }

    pub fn into_issued(self) -> Vec<NameClaim> {
        self.issued
    }
}

/// A name claimed by a logical resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameClaim {
    pub name: String,
    pub owner: String,
}

/// Records every generated name and the logical resource that owns it.
///
/// Two distinct owners producing the same name is a collision. The same
/// owner claiming its own name again is fine, which is how one stack refers
/// to a resource declared elsewhere.
#[derive(Debug, Default, Clone)]
pub struct NameLedger {
    claims: BTreeMap<String, String>,
}

impl NameLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `name` for `owner`.
    ///
    /// # Errors
    ///
    /// Returns `NamingError::Collision` if another owner already holds it.
    pub fn claim(&mut self, owner: &str, name: &str) -> Result<()> {
        match self.claims.get(name) {
            Some(existing) if existing != owner => Err(NamingError::Collision {
                name: name.to_string(),
                first: existing.clone(),
                second: owner.to_string(),
            }
            .into()),
            Some(_) => Ok(()),
            None => {
                trace!(owner, name, "claimed name");
                self.claims.insert(name.to_string(), owner.to_string());
                Ok(())
            }
        }
    }

    /// Merge every claim of `other` into this ledger.
    pub fn absorb(&mut self, other: &NameLedger) -> Result<()> {
        for (name, owner) in &other.claims {
            self.claim(owner, name)?;
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.claims.contains_key(name)
    }

    /// Claims sorted by name.
    pub fn claims(&self) -> Vec<NameClaim> {
        self.claims
            .iter()
            .map(|(name, owner)| NameClaim {
                name: name.clone(),
                owner: owner.clone(),
            })
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.claims.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}
