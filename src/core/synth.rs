//! Stack-set synthesis.
//!
//! Builds the requested stacks for one environment, checks that no two
//! logical resources share a generated name, and writes the rendered
//! templates plus a manifest to an output directory.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::core::constants;
use crate::core::environment::{EnvironmentConfig, Registry};
use crate::core::naming::NameLedger;
use crate::core::pipeline::Variant;
use crate::core::stack::Stack;
use crate::core::template::{self, Format};
use crate::error::{NamingError, RenderError, Result};

/// The stacks generated for one environment.
#[derive(Debug, Clone)]
pub struct Synthesis {
    environment: String,
    stacks: Vec<Stack>,
    ledger: NameLedger,
}

/// One stack entry of `manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    pub stack: String,
    pub variant: Variant,
    pub file: String,
    pub pipeline: String,
    pub sha256: String,
}

/// Written next to the templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub environment: String,
    pub format: String,
    pub stacks: Vec<ManifestEntry>,
}

/// Build every stack in `variants` for `env`.
///
/// Variants are deduplicated and keep their first-seen order.
///
/// # Errors
///
/// Fails on an invalid pipeline topology, on two logical resources sharing
/// one name, or when two stacks would both create the same resource.
pub fn synthesize(env: &EnvironmentConfig, variants: &[Variant]) -> Result<Synthesis> {
    let mut ledger = NameLedger::new();
    let mut declared: BTreeMap<String, String> = BTreeMap::new();
    let mut stacks: Vec<Stack> = Vec::new();

    for &variant in variants {
        if stacks.iter().any(|s| s.variant == variant) {
            continue;
        }
        let stack = Stack::build(env, variant)?;

        for claim in &stack.names {
            ledger.claim(&claim.owner, &claim.name)?;
        }
        for name in stack.declared_names() {
            if let Some(first) = declared.get(name) {
                return Err(NamingError::Collision {
                    name: name.to_string(),
                    first: first.clone(),
                    second: stack.name.clone(),
                }
                .into());
            }
            declared.insert(name.to_string(), stack.name.clone());
        }

        stacks.push(stack);
    }

    debug!(
        environment = %env.environment,
        stacks = stacks.len(),
        names = ledger.len(),
        "synthesized"
    );

    Ok(Synthesis {
        environment: env.environment.clone(),
        stacks,
        ledger,
    })
}

/// Check that no two environments of `registry` generate the same name.
///
/// Every variant is built for every environment. Returns the number of
/// distinct names checked.
///
/// # Errors
///
/// Returns `NamingError::Collision` naming both environments' owners.
pub fn check_disjoint(registry: &Registry) -> Result<usize> {
    let mut ledger = NameLedger::new();
    for (key, env) in registry.iter() {
        for claim in names(env)?.claims() {
            ledger.claim(&format!("{}:{}", key, claim.owner), &claim.name)?;
        }
    }
    Ok(ledger.len())
}

/// Every name any variant generates for `env`.
///
/// Unlike [`synthesize`], both application variants are included; they
/// issue the same names for the same owners.
pub fn names(env: &EnvironmentConfig) -> Result<NameLedger> {
    let mut ledger = NameLedger::new();
    for variant in Variant::ALL {
        for claim in Stack::build(env, variant)?.names {
            ledger.claim(&claim.owner, &claim.name)?;
        }
    }
    Ok(ledger)
}

impl Synthesis {
    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn stacks(&self) -> &[Stack] {
        &self.stacks
    }

    /// Every name generated across the stack set, sorted by name.
    pub fn ledger(&self) -> &NameLedger {
        &self.ledger
    }

    /// Render every stack, in synthesis order.
    pub fn render(&self) -> Result<Vec<(&Stack, Value)>> {
        self.stacks
            .iter()
            .map(|stack| Ok((stack, template::render(stack)?)))
            .collect()
    }

    /// Write `<stack>.template.<ext>` per stack and `manifest.json` into `dir`.
    ///
    /// Every document is encoded before the directory is touched. A manifest
    /// from an earlier run is removed first and the new one is written last,
    /// so a manifest on disk always lists the templates next to it. If a
    /// write fails, the templates written by this call are removed again.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Write` if the directory or a file can't be written.
    pub fn write_to(&self, dir: &Path, format: Format) -> Result<Manifest> {
        let mut files = Vec::with_capacity(self.stacks.len());
        let mut entries = Vec::with_capacity(self.stacks.len());
        for (stack, document) in self.render()? {
            let file = format!("{}.template.{}", stack.name, format.extension());
            let contents = format.encode(&document)?;

            entries.push(ManifestEntry {
                stack: stack.name.clone(),
                variant: stack.variant,
                file: file.clone(),
                pipeline: stack.pipeline.name.clone(),
                sha256: format!("{:x}", Sha256::digest(contents.as_bytes())),
            });
            files.push((file, contents));
        }

        let manifest = Manifest {
            environment: self.environment.clone(),
            format: format.to_string(),
            stacks: entries,
        };
        let json = serde_json::to_string_pretty(&manifest).map_err(RenderError::Json)?;
        files.push((constants::MANIFEST_FILE.to_string(), json));

        fs::create_dir_all(dir).map_err(|source| RenderError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
        remove_stale(&dir.join(constants::MANIFEST_FILE))?;

        let mut written = Vec::with_capacity(files.len());
        for (file, contents) in &files {
            let path = dir.join(file);
            if let Err(e) = write_file(&path, contents.as_bytes()) {
                warn!(written = written.len(), "write failed, removing partial output");
                for path in &written {
                    let _ = fs::remove_file(path);
                }
                return Err(e);
            }
            written.push(path);
        }

        info!(dir = %dir.display(), stacks = manifest.stacks.len(), "wrote templates");
        Ok(manifest)
    }
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

fn remove_stale(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(RenderError::Write {
            path: path.to_path_buf(),
            source,
        }
        .into()),
    }
}
