//! Capability-contract pass.
//!
//! Renders the trait every concrete encoder has to satisfy: one
//! declaration per distinct signature across all directives, in
//! lexicographic order.

use std::collections::BTreeSet;

use log::info;

use crate::emit::{method_decl, GENERATED_HEADER};
use crate::tables::{signature, InstructionDirective};

/// Name of the generated contract trait.
pub const TRAIT_NAME: &str = "X86InstructionSet";

/// Render the contract source file.
pub fn render(directives: &[InstructionDirective]) -> String {
    let signatures: BTreeSet<String> = directives.iter().map(signature::derive).collect();
    info!("contract pass: {} distinct signatures", signatures.len());

    let mut out = String::new();
    out.push_str(GENERATED_HEADER);
    out.push_str("\n\n#![allow(unused_imports)]\n\nuse super::regs::*;\n\n");
    out.push_str(&format!("pub trait {TRAIT_NAME} {{\n"));
    for signature in &signatures {
        out.push_str("    ");
        out.push_str(&method_decl(signature));
        out.push_str(";\n");
    }
    out.push_str("}\n");
    out
}
