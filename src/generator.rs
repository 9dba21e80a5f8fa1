//! Generator orchestrator.
//!
//! Both tables are parsed once into an immutable snapshot; the three
//! emission passes only ever read it. Input malformation is fatal and
//! aborts the run, while output-path failures are logged and the affected
//! artifact is skipped.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{debug, error, info};

use crate::emit::{contract, operands, skeleton, snake_case, GENERATED_HEADER};
use crate::error::{GenError, GenResult};
use crate::tables::{InstructionDirective, RegisterDirective};

/// Directory under the output root holding the generated module tree.
pub const GENERATED_DIR: &str = "generated";
/// Subdirectory holding the operand-type universe.
pub const REGS_DIR: &str = "regs";

/// One generation run: the parsed snapshot plus the emission passes.
pub struct Generator {
    directives: Vec<InstructionDirective>,
    registers: BTreeMap<String, Vec<RegisterDirective>>,
}

impl Generator {
    /// Parse both tables from files.
    pub fn load(insns: &Path, regs: &Path) -> GenResult<Self> {
        let insns_text = fs::read_to_string(insns).map_err(|source| GenError::Io {
            path: insns.display().to_string(),
            source,
        })?;
        let regs_text = fs::read_to_string(regs).map_err(|source| GenError::Io {
            path: regs.display().to_string(),
            source,
        })?;
        Self::from_tables(&insns_text, &regs_text)
    }

    /// Parse both tables from in-memory text.
    pub fn from_tables(insns: &str, regs: &str) -> GenResult<Self> {
        let mut directives = Vec::new();
        for line in table_lines(insns) {
            let parsed = InstructionDirective::parse(line)?;
            if parsed.uses_lock_elision() {
                debug!("dropping lock-elision directive {}", parsed.name());
                continue;
            }
            let expanded = parsed.expand();
            debug!("{} expands to {} directive(s)", parsed.name(), expanded.len());
            directives.extend(expanded);
        }

        let mut registers: BTreeMap<String, Vec<RegisterDirective>> = BTreeMap::new();
        for line in table_lines(regs) {
            for reg in RegisterDirective::parse(line)?.expand()? {
                registers
                    .entry(reg.reg_type().to_string())
                    .or_default()
                    .push(reg);
            }
        }

        info!(
            "parsed {} instruction directives, {} register types",
            directives.len(),
            registers.len()
        );
        Ok(Self {
            directives,
            registers,
        })
    }

    /// The fully-expanded instruction directives, in input order.
    pub fn directives(&self) -> &[InstructionDirective] {
        &self.directives
    }

    /// The register-type index: canonical type to its concrete members.
    pub fn registers(&self) -> &BTreeMap<String, Vec<RegisterDirective>> {
        &self.registers
    }

    /// Run all three emission passes plus the module index under `out`.
    pub fn emit_all(&self, out: &Path) -> GenResult<()> {
        self.emit_contract(out);
        self.emit_skeleton(out);
        self.emit_register_types(out)?;
        self.emit_module_index(out);
        Ok(())
    }

    /// Capability-contract pass.
    pub fn emit_contract(&self, out: &Path) {
        let content = contract::render(&self.directives);
        write_artifact(&out.join(GENERATED_DIR).join("instruction_set.rs"), &content);
    }

    /// Skeleton-implementation pass.
    pub fn emit_skeleton(&self, out: &Path) {
        let content = skeleton::render(&self.directives);
        write_artifact(&out.join(GENERATED_DIR).join("code_generator.rs"), &content);
    }

    /// Operand type-universe pass: one file per distinct argument kind,
    /// plus the sorted module index.
    pub fn emit_register_types(&self, out: &Path) -> GenResult<()> {
        let vocabulary = operands::vocabulary(&self.directives);
        let regs_dir = out.join(GENERATED_DIR).join(REGS_DIR);
        for ident in &vocabulary {
            let kind = operands::classify(ident, &self.registers)?;
            let content = operands::render_type(ident, &kind);
            write_artifact(&regs_dir.join(format!("{}.rs", snake_case(ident))), &content);
        }
        write_artifact(&regs_dir.join("mod.rs"), &operands::render_index(&vocabulary));
        Ok(())
    }

    fn emit_module_index(&self, out: &Path) {
        let content = format!(
            "{GENERATED_HEADER}\n\npub mod code_generator;\npub mod instruction_set;\npub mod regs;\n"
        );
        write_artifact(&out.join(GENERATED_DIR).join("mod.rs"), &content);
    }
}

/// Comment-stripped, non-empty lines of a table file.
fn table_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(strip_comment)
        .map(str::trim)
        .filter(|line| !line.is_empty())
}

/// Remove everything from a `;` or `#` marker to end of line.
fn strip_comment(line: &str) -> &str {
    match line.find([';', '#']) {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Write one artifact, logging and skipping on failure. Output-path
/// trouble never aborts the run.
fn write_artifact(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            error!("cannot create {}: {err}", parent.display());
            return;
        }
    }
    match fs::write(path, content) {
        Ok(()) => debug!("wrote {}", path.display()),
        Err(err) => error!("cannot write {}: {err}", path.display()),
    }
}
