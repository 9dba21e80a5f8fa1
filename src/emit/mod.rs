//! Code-emission back end.
//!
//! Each pass renders one complete Rust source file as a string from the
//! immutable table snapshot; the orchestrator owns every file-system
//! write. All derived sets are iterated in sorted order so that reruns on
//! unchanged tables produce byte-identical artifacts.

pub mod contract;
pub mod operands;
pub mod skeleton;

/// Fixed banner at the top of every generated file. No timestamps.
pub(crate) const GENERATED_HEADER: &str = "//! Generated by asmgen. Do not edit.";

/// Splice the fluent receiver into a derived signature fragment:
/// `add(reg32a: Reg32)` becomes `fn add(&mut self, reg32a: Reg32) -> &mut Self`.
pub(crate) fn method_decl(signature: &str) -> String {
    match signature.split_once('(') {
        Some((name, ")")) => format!("fn {name}(&mut self) -> &mut Self"),
        Some((name, params)) => format!("fn {name}(&mut self, {params} -> &mut Self"),
        None => format!("fn {signature}(&mut self) -> &mut Self"),
    }
}

/// Snake-case a canonical identifier for use as a module/file name:
/// `RegAl` becomes `reg_al`, `Reg32` becomes `reg32`.
pub(crate) fn snake_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, ch) in ident.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
