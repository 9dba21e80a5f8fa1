//! Skeleton-implementation pass.
//!
//! Renders a concrete encoder satisfying the contract trait. Every method
//! is a fluent stub that returns the encoder and carries the directive's
//! raw encoding text as a trace comment; no byte encoding is emitted.
//!
//! Directives collapsing to the same signature keep the first one seen in
//! input order; the later duplicates are dropped on purpose (they differ
//! only in encoding text).

use std::collections::BTreeMap;

use log::info;

use crate::emit::contract::TRAIT_NAME;
use crate::emit::{method_decl, GENERATED_HEADER};
use crate::tables::{signature, InstructionDirective};

/// Name of the generated skeleton struct.
pub const STRUCT_NAME: &str = "X86CodeGenerator";

/// Render the skeleton source file.
pub fn render(directives: &[InstructionDirective]) -> String {
    let mut picked: BTreeMap<String, &InstructionDirective> = BTreeMap::new();
    for directive in directives {
        picked.entry(signature::derive(directive)).or_insert(directive);
    }
    info!("skeleton pass: {} method stubs", picked.len());

    let mut out = String::new();
    out.push_str(GENERATED_HEADER);
    out.push_str("\n\n#![allow(unused_imports, unused_variables)]\n\n");
    out.push_str(&format!("use super::instruction_set::{TRAIT_NAME};\n"));
    out.push_str("use super::regs::*;\n\n");
    out.push_str(&format!("pub struct {STRUCT_NAME};\n\n"));
    out.push_str(&format!("impl {TRAIT_NAME} for {STRUCT_NAME} {{\n"));
    for (signature, directive) in &picked {
        out.push_str("    ");
        out.push_str(&method_decl(signature));
        out.push_str(" {\n");
        out.push_str(&format!("        // {}\n", directive.encoding()));
        out.push_str("        self\n    }\n\n");
    }
    out.push_str("}\n");
    out
}
