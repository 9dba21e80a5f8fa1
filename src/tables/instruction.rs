//! Instruction-table directives.
//!
//! One raw table line describes a family of instruction variants: each
//! argument position may carry `|`-separated alternatives, and the line is
//! expanded into one concrete directive per combination. Two line shapes
//! exist, a four-field tab-delimited form and a bracketed form with the
//! encoding text between `[` and `]`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{GenError, GenResult};
use crate::tables::canonical_ident;

/// `value|qualifier` operand forms are reordered to `qualifier_value`
/// before canonicalization, so `imm|near` ends up as `NearImm`.
static QUALIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.+)\|(far|near|short|to)").unwrap());

/// Mnemonic substring that would collide with a reserved word once the
/// method name is derived. Matched in any case since table mnemonics are
/// conventionally upper-case.
static RESERVED_MNEMONIC: Lazy<Regex> = Lazy::new(|| Regex::new("(?i)int").unwrap());

/// One instruction variant from the instruction table.
///
/// After [`expand`](Self::expand) the argument list is fully concrete;
/// until then individual positions may still hold alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionDirective {
    name: String,
    args: Vec<String>,
    encoding: String,
    attributes: Vec<String>,
}

impl InstructionDirective {
    /// Parse one comment-stripped, non-empty table line.
    pub fn parse(line: &str) -> GenResult<Self> {
        let line = line.trim();
        let parts: Vec<&str> = line.split(['[', ']']).collect();
        if parts.len() == 1 {
            Self::parse_simple(line)
        } else {
            Self::parse_bracketed(line, &parts)
        }
    }

    /// Tab-delimited form: `MNEMONIC  ARGSPEC  ENCODING  ATTR`.
    fn parse_simple(line: &str) -> GenResult<Self> {
        let fields: Vec<&str> = line.split('\t').filter(|f| !f.is_empty()).collect();
        if fields.len() < 4 {
            return Err(GenError::InstructionLine {
                line: line.to_string(),
                reason: "expected four tab-separated fields",
            });
        }
        Ok(Self {
            name: normalize_mnemonic(fields[0].trim()),
            args: normalize_args(fields[1].trim()),
            encoding: fields[2].trim().to_string(),
            attributes: vec![fields[3].trim().to_string()],
        })
    }

    /// Bracketed form: `MNEMONIC<sep>argspec [ENCODING] attr1,attr2,...`
    /// where `<sep>` is the first tab, else the first space.
    fn parse_bracketed(line: &str, parts: &[&str]) -> GenResult<Self> {
        if parts.len() < 3 {
            return Err(GenError::InstructionLine {
                line: line.to_string(),
                reason: "unterminated [encoding] field",
            });
        }
        let head = parts[0];
        let sep = head.find('\t').or_else(|| head.find(' ')).ok_or_else(|| {
            GenError::InstructionLine {
                line: line.to_string(),
                reason: "missing separator between mnemonic and arguments",
            }
        })?;
        let (mnemonic, argspec) = head.split_at(sep);
        Ok(Self {
            name: normalize_mnemonic(mnemonic.trim()),
            args: normalize_args(argspec.trim()),
            encoding: parts[1].trim().to_string(),
            attributes: parts[2].trim().split(',').map(|a| a.trim().to_string()).collect(),
        })
    }

    /// Expand `|`-alternatives into concrete directives.
    ///
    /// Cartesian product across argument positions, position 0 outermost,
    /// built iteratively so the ordering is stable and pathological inputs
    /// cannot exhaust the stack. `name`, `encoding`, and `attributes` are
    /// shared by every combination.
    pub fn expand(&self) -> Vec<InstructionDirective> {
        let mut combos: Vec<Vec<String>> = vec![Vec::new()];
        for arg in &self.args {
            let mut next = Vec::with_capacity(combos.len());
            for combo in &combos {
                for alt in arg.split('|') {
                    let mut grown = combo.clone();
                    grown.push(alt.to_string());
                    next.push(grown);
                }
            }
            combos = next;
        }
        combos
            .into_iter()
            .map(|args| InstructionDirective {
                name: self.name.clone(),
                args,
                encoding: self.encoding.clone(),
                attributes: self.attributes.clone(),
            })
            .collect()
    }

    /// Hardware lock elision is not supported; directives carrying the
    /// marker in their encoding text are dropped by the loader.
    pub fn uses_lock_elision(&self) -> bool {
        self.encoding.contains("hle")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }
}

fn normalize_mnemonic(raw: &str) -> String {
    RESERVED_MNEMONIC.replace_all(raw, "interrupt").into_owned()
}

/// Split an argument spec on commas and canonicalize each token: drop the
/// `void` sentinel, strip pointer markers, reorder trailing qualifiers,
/// then camel-case every remaining `|`-alternative independently.
fn normalize_args(spec: &str) -> Vec<String> {
    spec.split(',')
        .map(str::trim)
        .filter(|tok| !tok.is_empty() && *tok != "void")
        .map(normalize_token)
        .collect()
}

fn normalize_token(token: &str) -> String {
    let token = token.replace('*', "");
    let token = QUALIFIER.replace_all(&token, "${2}_${1}");
    token
        .split('|')
        .map(canonical_ident)
        .collect::<Vec<_>>()
        .join("|")
}
