//! Read access to mod archives.
//!
//! The scanner only needs member names and member contents, so it works
//! against [`ArchiveReader`]. Zip archives implement it directly and
//! [`MemoryArchive`] serves already-extracted content.

use crate::{Error, Result};
use std::io::{Read, Seek};

/// Member listing and reading for one archive
pub trait ArchiveReader {
    /// File member paths in archive order, directories excluded
    fn member_names(&mut self) -> Result<Vec<String>>;

    /// Full contents of the named member
    fn read_member(&mut self, name: &str) -> Result<Vec<u8>>;
}

impl<R: Read + Seek> ArchiveReader for zip::ZipArchive<R> {
    fn member_names(&mut self) -> Result<Vec<String>> {
        let mut names = Vec::with_capacity(self.len());
        for i in 0..self.len() {
            let entry = self.by_index_raw(i)?;
            if !entry.is_dir() {
                names.push(entry.name().to_string());
            }
        }
        Ok(names)
    }

    fn read_member(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut entry = match self.by_name(name) {
            Ok(entry) => entry,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(Error::MissingMember(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        // Header sizes are untrusted, so the buffer grows as data arrives
        let mut data = Vec::new();
        entry.read_to_end(&mut data)?;
        Ok(data)
    }
}

/// Archive held in memory as an ordered list of members
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    members: Vec<(String, Vec<u8>)>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a member, keeping insertion order as archive order
    pub fn add(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> &mut Self {
        self.members.push((path.into(), content.into()));
        self
    }

    /// Builder-style variant of [`MemoryArchive::add`]
    pub fn with(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.add(path, content);
        self
    }
}

impl ArchiveReader for MemoryArchive {
    fn member_names(&mut self) -> Result<Vec<String>> {
        Ok(self.members.iter().map(|(path, _)| path.clone()).collect())
    }

    fn read_member(&mut self, name: &str) -> Result<Vec<u8>> {
        self.members
            .iter()
            .find(|(path, _)| path == name)
            .map(|(_, content)| content.clone())
            .ok_or_else(|| Error::MissingMember(name.to_string()))
    }
}
