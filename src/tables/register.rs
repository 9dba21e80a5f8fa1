//! Register-table directives.
//!
//! Each line defines a register (or a numeric range of them) with a
//! semantic type, a flags descriptor, and a hardware encoding value. The
//! flags descriptor drives both the byte width and where the generated
//! type sits in the operand hierarchy.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{GenError, GenResult};
use crate::tables::canonical_ident;

/// Register names may embed a closed numeric range, e.g. `st0-7`.
static REG_RANGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.+)(\d+)-(\d+)(.*)$").unwrap());

/// Flags classes that sit directly under the root register type instead of
/// a fixed-width intermediate: segment, control, debug, test, and FPU.
static UNSIZED_CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([scdt]|fpu)reg$").unwrap());

/// One register definition from the register table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterDirective {
    name: String,
    reg_type: String,
    flags: String,
    value: u32,
}

impl RegisterDirective {
    /// Parse one comment-stripped, non-empty table line of the shape
    /// `NAME TYPE FLAGS VALUE`.
    pub fn parse(line: &str) -> GenResult<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(GenError::RegisterLine {
                line: line.to_string(),
                reason: "expected four whitespace-separated fields",
            });
        }
        let value = fields[3].parse::<u32>().map_err(|_| GenError::RegisterValue {
            value: fields[3].to_string(),
            context: line.to_string(),
        })?;
        Ok(Self {
            name: fields[0].to_string(),
            reg_type: canonical_ident(fields[1]),
            flags: fields[2].to_string(),
            value,
        })
    }

    /// Expand an embedded numeric range into one directive per index.
    ///
    /// A name matching `prefix<from>-<to>suffix` yields `to - from + 1`
    /// directives named `prefix<i>suffix` with `value` overridden to `i`;
    /// any other name passes through unchanged.
    pub fn expand(&self) -> GenResult<Vec<RegisterDirective>> {
        let Some(caps) = REG_RANGE.captures(&self.name) else {
            return Ok(vec![self.clone()]);
        };
        let prefix = &caps[1];
        let suffix = &caps[4];
        let from = parse_bound(&caps[2], &self.name)?;
        let to = parse_bound(&caps[3], &self.name)?;
        Ok((from..=to)
            .map(|i| RegisterDirective {
                name: format!("{prefix}{i}{suffix}"),
                reg_type: self.reg_type.clone(),
                flags: self.flags.clone(),
                value: i,
            })
            .collect())
    }

    /// Operand byte width for this register's flags class.
    ///
    /// Unrecognized flags are a fatal classification error; no width is
    /// ever guessed.
    pub fn nbytes(&self) -> GenResult<u32> {
        if self.flags.contains("reg8") {
            Ok(1)
        } else if self.flags.contains("reg16") {
            Ok(2)
        } else if self.flags.contains("reg32") {
            Ok(4)
        } else if self.flags.contains("reg64") {
            Ok(8)
        } else if UNSIZED_CLASS.is_match(&self.flags) {
            Ok(2)
        } else {
            Err(GenError::UnknownFlags {
                what: "size",
                flags: self.flags.clone(),
            })
        }
    }

    /// Width suffix of the generated parent type: `"8"` through `"64"`,
    /// or empty for the classes that parent directly on the root type.
    pub fn parent_suffix(&self) -> GenResult<&'static str> {
        if self.flags.contains("reg8") {
            Ok("8")
        } else if self.flags.contains("reg16") {
            Ok("16")
        } else if self.flags.contains("reg32") {
            Ok("32")
        } else if self.flags.contains("reg64") {
            Ok("64")
        } else if UNSIZED_CLASS.is_match(&self.flags) {
            Ok("")
        } else {
            Err(GenError::UnknownFlags {
                what: "parent type",
                flags: self.flags.clone(),
            })
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reg_type(&self) -> &str {
        &self.reg_type
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    pub fn value(&self) -> u32 {
        self.value
    }
}

fn parse_bound(digits: &str, name: &str) -> GenResult<u32> {
    digits.parse::<u32>().map_err(|_| GenError::RegisterValue {
        value: digits.to_string(),
        context: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fields_and_canonicalizes_the_type() {
        let reg = RegisterDirective::parse("al\treg_al\treg8\t0").unwrap();
        assert_eq!(reg.name(), "al");
        assert_eq!(reg.reg_type(), "RegAl");
        assert_eq!(reg.flags(), "reg8");
        assert_eq!(reg.value(), 0);
    }

    #[test]
    fn expands_a_numeric_range_with_index_values() {
        let reg = RegisterDirective::parse("st0-7 fpu_st fpureg 0").unwrap();
        let expanded = reg.expand().unwrap();
        assert_eq!(expanded.len(), 8);
        assert_eq!(expanded[0].name(), "st0");
        assert_eq!(expanded[7].name(), "st7");
        for (i, concrete) in expanded.iter().enumerate() {
            assert_eq!(concrete.value(), i as u32);
            assert_eq!(concrete.reg_type(), "FpuSt");
            assert_eq!(concrete.flags(), "fpureg");
        }
    }

    #[test]
    fn range_expansion_keeps_a_suffix_after_the_bounds() {
        let reg = RegisterDirective::parse("mm0-7b mmx_b mmxreg 0");
        // `mmxreg` is not a known flags class; parsing still succeeds, the
        // classification functions are where it becomes fatal.
        let expanded = reg.unwrap().expand().unwrap();
        assert_eq!(expanded.len(), 8);
        assert_eq!(expanded[0].name(), "mm0b");
        assert_eq!(expanded[7].name(), "mm7b");
    }

    #[test]
    fn plain_names_pass_through_unchanged() {
        let reg = RegisterDirective::parse("eax reg_eax reg32 0").unwrap();
        let expanded = reg.expand().unwrap();
        assert_eq!(expanded.len(), 1);
        assert_eq!(expanded[0], reg);
    }

    #[test]
    fn byte_widths_follow_the_flags_vocabulary() {
        let widths = [
            ("reg8", 1),
            ("reg16", 2),
            ("reg32", 4),
            ("reg64", 8),
            ("sreg", 2),
            ("creg", 2),
            ("dreg", 2),
            ("treg", 2),
            ("fpureg", 2),
        ];
        for (flags, expected) in widths {
            let reg = RegisterDirective::parse(&format!("x y {flags} 0")).unwrap();
            assert_eq!(reg.nbytes().unwrap(), expected, "flags {flags}");
        }
    }

    #[test]
    fn parent_suffixes_follow_the_flags_vocabulary() {
        let suffixes = [
            ("reg8", "8"),
            ("reg16", "16"),
            ("reg32", "32"),
            ("reg64", "64"),
            ("sreg", ""),
            ("fpureg", ""),
        ];
        for (flags, expected) in suffixes {
            let reg = RegisterDirective::parse(&format!("x y {flags} 0")).unwrap();
            assert_eq!(reg.parent_suffix().unwrap(), expected, "flags {flags}");
        }
    }

    #[test]
    fn unknown_flags_are_fatal_not_defaulted() {
        let reg = RegisterDirective::parse("x y mmxreg 0").unwrap();
        assert!(matches!(reg.nbytes(), Err(GenError::UnknownFlags { .. })));
        assert!(matches!(reg.parent_suffix(), Err(GenError::UnknownFlags { .. })));
    }

    #[test]
    fn short_line_is_a_parse_error() {
        let err = RegisterDirective::parse("al reg_al reg8").unwrap_err();
        assert!(matches!(err, GenError::RegisterLine { .. }));
    }

    #[test]
    fn non_numeric_value_is_a_parse_error() {
        let err = RegisterDirective::parse("al reg_al reg8 zero").unwrap_err();
        assert!(matches!(err, GenError::RegisterValue { .. }));
    }
}
