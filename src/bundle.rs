//! Compiled-artifact bundle inspection.
//!
//! Boundary collaborator for the compiler driver: given an archive of
//! compiled object files, list the member names and each member's
//! defined-symbol count. The generator pipeline does not use this.

use std::fs;
use std::path::Path;

use object::read::archive::ArchiveFile;
use object::{Object, ObjectSymbol};

use crate::error::{GenError, GenResult};

/// One member of an inspected bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleMember {
    pub name: String,
    pub symbol_count: usize,
}

/// A packaged collection of compiled units.
#[derive(Debug)]
pub struct ArtifactBundle {
    members: Vec<BundleMember>,
}

impl ArtifactBundle {
    /// Read an `ar` archive and tally each member's defined symbols.
    ///
    /// A member that does not parse as an object file is listed with a
    /// zero count rather than failing the whole bundle.
    pub fn open(path: &Path) -> GenResult<Self> {
        let data = fs::read(path).map_err(|source| GenError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let archive = ArchiveFile::parse(&*data).map_err(|err| GenError::Bundle {
            reason: err.to_string(),
        })?;

        let mut members = Vec::new();
        for entry in archive.members() {
            let entry = entry.map_err(|err| GenError::Bundle {
                reason: err.to_string(),
            })?;
            let name = String::from_utf8_lossy(entry.name()).into_owned();
            let member_data = entry.data(&*data).map_err(|err| GenError::Bundle {
                reason: err.to_string(),
            })?;
            let symbol_count = match object::File::parse(member_data) {
                Ok(obj) => obj.symbols().filter(|sym| sym.is_definition()).count(),
                Err(_) => 0,
            };
            members.push(BundleMember { name, symbol_count });
        }
        Ok(Self { members })
    }

    pub fn members(&self) -> &[BundleMember] {
        &self.members
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_bundle_is_an_io_error() {
        let err = ArtifactBundle::open(Path::new("/nonexistent/bundle.a")).unwrap_err();
        assert!(matches!(err, GenError::Io { .. }));
    }
}
