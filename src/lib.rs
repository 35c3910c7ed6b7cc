//! Pipegen - CodePipeline topologies for an application, its infrastructure
//! and the pipelines themselves, generated from one environment record.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── synth         # Render templates to stdout or a directory
//! │   ├── names         # List every generated name
//! │   ├── stages        # Ordered stages of one variant
//! │   ├── envs          # Registry listing
//! │   ├── check         # Collision and disjointness checks
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── environment   # Environment records and the registry
//!     ├── naming        # Name generator and collision ledger
//!     ├── buildspec     # Buildspec documents
//!     ├── project       # Build projects
//!     ├── action        # Source, build and approval actions
//!     ├── pipeline      # Variants, stages, topology validation
//!     ├── blueprint/    # One blueprint per variant
//!     ├── stack         # A validated stack for one environment
//!     ├── template      # CloudFormation-style rendering
//!     └── synth         # Stack sets, output directory, manifest
//! ```
//!
//! # Example
//!
//! ```no_run
//! use pipegen::core::environment::Registry;
//! use pipegen::core::pipeline::Variant;
//! use pipegen::core::synth;
//!
//! let registry = Registry::builtin();
//! let env = registry.select("dev")?;
//! let synthesis = synth::synthesize(env, &Variant::DEFAULT_SET)?;
//! for stack in synthesis.stacks() {
//!     println!("{}", stack.name);
//! }
//! # Ok::<(), pipegen::error::Error>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;
