//! asmgen - table-driven x86 encoder-surface generation.
//!
//! `asmgen` reads two NASM-style definition tables (instructions and
//! registers) and emits the typed front end of a native-code encoder: a
//! capability trait listing every distinct instruction signature, a
//! skeleton implementation with fluent stubs, and one generated operand
//! type per distinct argument kind.
//!
//! The pipeline is a batch text-to-text transform: parse and expand the
//! tables into an immutable snapshot, derive signatures, run three
//! independent emission passes. Re-running on unchanged tables produces
//! byte-identical output.
//!
//! # Architecture
//!
//! - [`tables`] - table parsing, combinatorial/range expansion, signatures
//! - [`emit`] - the three code-emission passes
//! - [`generator`] - orchestrator tying parsing and emission together
//! - [`section`], [`bundle`] - boundary collaborators for the eventual encoder

pub mod bundle;
pub mod emit;
pub mod error;
pub mod generator;
pub mod section;
pub mod tables;

pub use bundle::{ArtifactBundle, BundleMember};
pub use error::{GenError, GenResult};
pub use generator::Generator;
pub use section::DataSection;
pub use tables::{InstructionDirective, RegisterDirective};
