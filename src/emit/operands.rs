//! Operand type-universe pass.
//!
//! Every distinct argument identifier appearing in the instruction table
//! becomes exactly one generated Rust type. The vocabulary is wider than
//! the true register classes; memory and immediate kinds land here too and
//! come out as placeholders.
//!
//! Classification is a closed sum type so emission is a total match: no
//! identifier shape falls through. The original hierarchy (width root,
//! fixed-width subtypes, named-register subtypes) is rendered as newtype
//! wrapping plus `Deref` to the parent.

use std::collections::{BTreeMap, BTreeSet};

use log::info;

use crate::emit::{snake_case, GENERATED_HEADER};
use crate::error::{GenError, GenResult};
use crate::tables::{InstructionDirective, RegisterDirective};

/// Root type of the generated register hierarchy.
pub const BASE: &str = "Reg";

/// Reserved identifiers that stay unmodeled even when the register table
/// defines members for them.
const EXCLUDED: &[&str] = &["RegDreg"];

/// Shape of one generated operand type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperandKind {
    /// The root register value type: byte width plus encoding value.
    Baseline,
    /// Fixed-width subtype of the root, e.g. `Reg32`.
    FixedWidth { nbytes: u32 },
    /// Named register kind with exactly one concrete member; the encoding
    /// value is baked into a no-argument constructor.
    NamedFixedValue {
        parent_suffix: &'static str,
        nbytes: u32,
        value: u32,
    },
    /// Named register kind selecting among several same-class members via
    /// a caller-supplied value.
    NamedParametricValue {
        parent_suffix: &'static str,
        nbytes: u32,
    },
    /// Non-register or unknown operand kind; empty placeholder reserved
    /// for future specialization.
    Unspecified,
}

/// The operand vocabulary: every distinct argument identifier across all
/// directives, in sorted order.
pub fn vocabulary(directives: &[InstructionDirective]) -> BTreeSet<String> {
    directives
        .iter()
        .flat_map(|directive| directive.args().iter().cloned())
        .collect()
}

/// Classify one operand identifier against the register-type index.
///
/// Priority order: the literal base identifier, base plus digits (a bit
/// width), base plus letters (a semantic register name, resolved through
/// the index), then the placeholder fallback. Flags classification of a
/// looked-up register can fail, which aborts the run.
pub fn classify(
    ident: &str,
    registers: &BTreeMap<String, Vec<RegisterDirective>>,
) -> GenResult<OperandKind> {
    if ident == BASE {
        return Ok(OperandKind::Baseline);
    }
    if let Some(rest) = ident.strip_prefix(BASE) {
        if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
            let bits: u32 = rest.parse().map_err(|_| GenError::Operand {
                ident: ident.to_string(),
                reason: "bit width out of range",
            })?;
            return Ok(OperandKind::FixedWidth { nbytes: bits / 8 });
        }
        if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_alphabetic()) {
            if EXCLUDED.contains(&ident) {
                return Ok(OperandKind::Unspecified);
            }
            return match registers.get(ident).map(Vec::as_slice) {
                None | Some([]) => Ok(OperandKind::Unspecified),
                Some([only]) => Ok(OperandKind::NamedFixedValue {
                    parent_suffix: only.parent_suffix()?,
                    nbytes: only.nbytes()?,
                    value: only.value(),
                }),
                // Members of one type share a flags class; the first one
                // stands for all of them.
                Some([first, ..]) => Ok(OperandKind::NamedParametricValue {
                    parent_suffix: first.parent_suffix()?,
                    nbytes: first.nbytes()?,
                }),
            };
        }
    }
    Ok(OperandKind::Unspecified)
}

/// Render the generated source file for one operand identifier.
pub fn render_type(ident: &str, kind: &OperandKind) -> String {
    let mut out = String::new();
    out.push_str(GENERATED_HEADER);
    out.push_str("\n\n");
    match kind {
        OperandKind::Baseline => {
            out.push_str("/// Root register operand: byte width plus hardware encoding value.\n");
            out.push_str(&format!("pub struct {BASE} {{\n    nbytes: u32,\n    value: u32,\n}}\n\n"));
            out.push_str(&format!("impl {BASE} {{\n"));
            out.push_str("    pub fn new(nbytes: u32, value: u32) -> Self {\n");
            out.push_str("        Self { nbytes, value }\n    }\n\n");
            out.push_str("    pub fn nbytes(&self) -> u32 {\n        self.nbytes\n    }\n\n");
            out.push_str("    pub fn value(&self) -> u32 {\n        self.value\n    }\n}\n");
        }
        OperandKind::FixedWidth { nbytes } => {
            out.push_str(&format!("use super::reg::{BASE};\n\n"));
            out.push_str(&format!("pub struct {ident}({BASE});\n\n"));
            out.push_str(&format!("impl {ident} {{\n    pub fn new(value: u32) -> Self {{\n"));
            out.push_str(&format!("        Self({BASE}::new({nbytes}, value))\n    }}\n}}\n\n"));
            out.push_str(&deref_impl(ident, BASE));
        }
        OperandKind::NamedFixedValue {
            parent_suffix,
            nbytes,
            value,
        } => {
            let parent = format!("{BASE}{parent_suffix}");
            let construct = if parent_suffix.is_empty() {
                format!("{parent}::new({nbytes}, {value})")
            } else {
                format!("{parent}::new({value})")
            };
            out.push_str(&format!("use super::{}::{parent};\n\n", snake_case(&parent)));
            out.push_str(&format!("pub struct {ident}({parent});\n\n"));
            out.push_str(&format!("impl {ident} {{\n    pub fn new() -> Self {{\n"));
            out.push_str(&format!("        Self({construct})\n    }}\n}}\n\n"));
            out.push_str(&format!(
                "impl Default for {ident} {{\n    fn default() -> Self {{\n        Self::new()\n    }}\n}}\n\n"
            ));
            out.push_str(&deref_impl(ident, &parent));
        }
        OperandKind::NamedParametricValue {
            parent_suffix,
            nbytes,
        } => {
            let parent = format!("{BASE}{parent_suffix}");
            let construct = if parent_suffix.is_empty() {
                format!("{parent}::new({nbytes}, value)")
            } else {
                format!("{parent}::new(value)")
            };
            out.push_str(&format!("use super::{}::{parent};\n\n", snake_case(&parent)));
            out.push_str(&format!("pub struct {ident}({parent});\n\n"));
            out.push_str(&format!("impl {ident} {{\n    pub fn new(value: u32) -> Self {{\n"));
            out.push_str(&format!("        Self({construct})\n    }}\n}}\n\n"));
            out.push_str(&deref_impl(ident, &parent));
        }
        OperandKind::Unspecified => {
            out.push_str("/// Placeholder operand kind; not yet modeled.\n");
            out.push_str(&format!("pub struct {ident};\n"));
        }
    }
    out
}

/// Render the module index for the generated operand types.
pub fn render_index(idents: &BTreeSet<String>) -> String {
    info!("type-universe pass: {} operand kinds", idents.len());
    let mut out = String::new();
    out.push_str(GENERATED_HEADER);
    out.push_str("\n\n");
    for ident in idents {
        let module = snake_case(ident);
        out.push_str(&format!("pub mod {module};\npub use {module}::{ident};\n"));
    }
    out
}

fn deref_impl(ident: &str, parent: &str) -> String {
    format!(
        "impl std::ops::Deref for {ident} {{\n    type Target = {parent};\n\n    fn deref(&self) -> &{parent} {{\n        &self.0\n    }}\n}}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(lines: &[&str]) -> BTreeMap<String, Vec<RegisterDirective>> {
        let mut registers: BTreeMap<String, Vec<RegisterDirective>> = BTreeMap::new();
        for line in lines {
            for reg in RegisterDirective::parse(line).unwrap().expand().unwrap() {
                registers.entry(reg.reg_type().to_string()).or_default().push(reg);
            }
        }
        registers
    }

    #[test]
    fn classifies_the_base_identifier() {
        let registers = index(&[]);
        assert_eq!(classify("Reg", &registers).unwrap(), OperandKind::Baseline);
    }

    #[test]
    fn classifies_bit_width_identifiers() {
        let registers = index(&[]);
        assert_eq!(
            classify("Reg32", &registers).unwrap(),
            OperandKind::FixedWidth { nbytes: 4 }
        );
        assert_eq!(
            classify("Reg8", &registers).unwrap(),
            OperandKind::FixedWidth { nbytes: 1 }
        );
    }

    #[test]
    fn single_member_types_bake_in_the_encoding_value() {
        let registers = index(&["al reg_al reg8 0", "cs reg_cs sreg 1"]);
        assert_eq!(
            classify("RegAl", &registers).unwrap(),
            OperandKind::NamedFixedValue {
                parent_suffix: "8",
                nbytes: 1,
                value: 0,
            }
        );
        assert_eq!(
            classify("RegCs", &registers).unwrap(),
            OperandKind::NamedFixedValue {
                parent_suffix: "",
                nbytes: 2,
                value: 1,
            }
        );
    }

    #[test]
    fn multi_member_types_take_a_caller_value() {
        let registers = index(&["r8-15 reg_numeric reg64 8"]);
        assert_eq!(
            classify("RegNumeric", &registers).unwrap(),
            OperandKind::NamedParametricValue {
                parent_suffix: "64",
                nbytes: 8,
            }
        );
    }

    #[test]
    fn unknown_and_excluded_names_are_placeholders() {
        let registers = index(&["dr0-7 reg_dreg dreg 0"]);
        assert_eq!(classify("RegXyz", &registers).unwrap(), OperandKind::Unspecified);
        assert_eq!(classify("RegDreg", &registers).unwrap(), OperandKind::Unspecified);
        assert_eq!(classify("Mem32", &registers).unwrap(), OperandKind::Unspecified);
        assert_eq!(classify("Imm", &registers).unwrap(), OperandKind::Unspecified);
    }

    #[test]
    fn classification_failure_propagates_bad_flags() {
        let registers = index(&["mm0 reg_mmx mmxreg 0"]);
        assert!(matches!(
            classify("RegMmx", &registers),
            Err(GenError::UnknownFlags { .. })
        ));
    }

    #[test]
    fn baseline_renders_width_and_value_accessors() {
        let rendered = render_type("Reg", &OperandKind::Baseline);
        assert!(rendered.contains("pub struct Reg {"));
        assert!(rendered.contains("pub fn new(nbytes: u32, value: u32) -> Self"));
    }

    #[test]
    fn fixed_width_renders_a_width_baking_constructor() {
        let rendered = render_type("Reg32", &OperandKind::FixedWidth { nbytes: 4 });
        assert!(rendered.contains("pub struct Reg32(Reg);"));
        assert!(rendered.contains("Self(Reg::new(4, value))"));
        assert!(rendered.contains("impl std::ops::Deref for Reg32"));
    }

    #[test]
    fn named_fixed_value_renders_a_no_argument_constructor() {
        let kind = OperandKind::NamedFixedValue {
            parent_suffix: "8",
            nbytes: 1,
            value: 0,
        };
        let rendered = render_type("RegAl", &kind);
        assert!(rendered.contains("use super::reg8::Reg8;"));
        assert!(rendered.contains("pub struct RegAl(Reg8);"));
        assert!(rendered.contains("Self(Reg8::new(0))"));
    }

    #[test]
    fn empty_parent_suffix_parents_directly_on_the_root() {
        let kind = OperandKind::NamedFixedValue {
            parent_suffix: "",
            nbytes: 2,
            value: 1,
        };
        let rendered = render_type("RegCs", &kind);
        assert!(rendered.contains("use super::reg::Reg;"));
        assert!(rendered.contains("Self(Reg::new(2, 1))"));
    }

    #[test]
    fn parametric_types_forward_the_caller_value() {
        let kind = OperandKind::NamedParametricValue {
            parent_suffix: "64",
            nbytes: 8,
        };
        let rendered = render_type("RegNumeric", &kind);
        assert!(rendered.contains("pub fn new(value: u32) -> Self"));
        assert!(rendered.contains("Self(Reg64::new(value))"));
    }

    #[test]
    fn placeholders_are_empty_unit_structs() {
        let rendered = render_type("Mem32", &OperandKind::Unspecified);
        assert!(rendered.contains("pub struct Mem32;"));
    }

    #[test]
    fn vocabulary_is_the_sorted_distinct_argument_set() {
        let directives: Vec<InstructionDirective> = [
            "ADD\treg32,reg32\t00 /r\tfalse",
            "MOV\treg32,imm32\tB8+r id\tfalse",
        ]
        .iter()
        .flat_map(|line| InstructionDirective::parse(line).unwrap().expand())
        .collect();
        let vocabulary: Vec<String> = vocabulary(&directives).into_iter().collect();
        assert_eq!(vocabulary, ["Imm32", "Reg32"]);
    }
}
