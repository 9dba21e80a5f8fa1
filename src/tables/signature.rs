//! Signature derivation.
//!
//! The signature is simultaneously the deduplication key for directives
//! and the literal declaration fragment emitted into the generated trait
//! and skeleton, so it has to read as valid Rust. Identical
//! `(name, args)` pairs always derive the identical string.

use std::collections::HashMap;

use crate::tables::InstructionDirective;

/// Method names that would collide with a strict Rust keyword are emitted
/// as raw identifiers (`r#in`, `r#loop`).
const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while",
];

/// Derive the canonical signature for one concrete directive, e.g.
/// `add(reg32a: Reg32, reg32b: Reg32)`.
///
/// Argument types occurring more than once in the same directive get
/// ordinal suffixes `a`, `b`, ... in first-to-last order, tracked
/// independently per repeated type, so parameter names stay unique within
/// one declaration.
pub fn derive(directive: &InstructionDirective) -> String {
    let method = method_name(directive.name());

    let mut repeats: HashMap<&str, u32> = HashMap::new();
    for arg in directive.args() {
        *repeats.entry(arg.as_str()).or_insert(0) += 1;
    }

    let mut ordinals: HashMap<&str, u8> = HashMap::new();
    let params: Vec<String> = directive
        .args()
        .iter()
        .map(|arg| {
            let mut param = arg.to_ascii_lowercase();
            if repeats[arg.as_str()] >= 2 {
                let ordinal = ordinals.entry(arg.as_str()).or_insert(0);
                param.push((b'a' + *ordinal) as char);
                *ordinal += 1;
            }
            format!("{param}: {arg}")
        })
        .collect();

    format!("{method}({})", params.join(", "))
}

fn method_name(mnemonic: &str) -> String {
    let name = mnemonic.to_ascii_lowercase().replace('_', "");
    if RUST_KEYWORDS.contains(&name.as_str()) {
        format!("r#{name}")
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directive(line: &str) -> InstructionDirective {
        InstructionDirective::parse(line).unwrap()
    }

    #[test]
    fn renders_the_lowercased_mnemonic_and_typed_parameters() {
        let sig = derive(&directive("MOV\treg32,imm32\tB8+r id\tfalse"));
        assert_eq!(sig, "mov(reg32: Reg32, imm32: Imm32)");
    }

    #[test]
    fn no_operand_directives_render_empty_parens() {
        assert_eq!(derive(&directive("RET\tvoid\tC3\tfalse")), "ret()");
    }

    #[test]
    fn repeated_types_get_ordinal_suffixes_in_occurrence_order() {
        let sig = derive(&directive("ADD\treg32,reg32\t00 /r\tfalse"));
        assert_eq!(sig, "add(reg32a: Reg32, reg32b: Reg32)");
    }

    #[test]
    fn ordinals_are_tracked_per_repeated_type() {
        let raw = directive("IMUL reg32,mem32|reg32,reg32 [69 /r id] false");
        let expanded = raw.expand();
        let triple = expanded
            .iter()
            .find(|d| d.args() == ["Reg32", "Reg32", "Reg32"])
            .unwrap();
        assert_eq!(derive(triple), "imul(reg32a: Reg32, reg32b: Reg32, reg32c: Reg32)");

        let mixed = expanded
            .iter()
            .find(|d| d.args() == ["Reg32", "Mem32", "Reg32"])
            .unwrap();
        assert_eq!(derive(mixed), "imul(reg32a: Reg32, mem32: Mem32, reg32b: Reg32)");
    }

    #[test]
    fn mnemonic_underscores_are_removed() {
        let sig = derive(&directive("REP_MOVSB\tvoid\tF3 A4\tfalse"));
        assert_eq!(sig, "repmovsb()");
    }

    #[test]
    fn keyword_mnemonics_become_raw_identifiers() {
        assert_eq!(derive(&directive("IN\treg_al,imm8\tE4 ib\tfalse")), "r#in(regal: RegAl, imm8: Imm8)");
        assert_eq!(derive(&directive("LOOP\timm\tE2 rb\tfalse")), "r#loop(imm: Imm)");
    }

    #[test]
    fn derivation_is_pure() {
        let d = directive("CMP\treg8,reg8\t38 /r\tfalse");
        assert_eq!(derive(&d), derive(&d));
        assert_eq!(derive(&d), "cmp(reg8a: Reg8, reg8b: Reg8)");
    }
}
