//! Fabrix - deployment descriptor compiler and change-impact analyzer.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── validate      # Schema validation
//! │   ├── split, merge  # Descriptor <-> artifacts
//! │   ├── key           # Deployment keys
//! │   ├── secure        # keygen / seal / open
//! │   ├── diff          # Change-impact report
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── schema/       # Embedded JSON Schemas, bundling, validation
//!     ├── domain/       # Descriptor, configuration items, RBAC, images
//!     ├── codec/        # env.template, variables.yaml, rbac.yaml, README
//!     ├── deployment_key
//!     ├── vault         # secure:// AES-256-GCM values
//!     ├── keystore      # Secret key resolution
//!     ├── rules/        # Trigger / overridable rule table
//!     ├── diff          # Structural diff + classification
//!     ├── report        # Functional areas, exit signaling
//!     └── config        # .fabrix.toml
//! ```

pub mod cli;
pub mod core;
pub mod error;
