//! Listing data types
//!
//! An [`Entry`] is one descendant found during a walk; a [`Listing`] is the
//! JSON body sent for a directory, in one of three shapes.

use crate::config::ListingFormat;
use crate::error::ListingError;
use serde::Serialize;

/// Kind of filesystem item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
}

/// One file or folder below the listed directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Path relative to the listed directory, `/`-separated
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Lowercase hex SHA-1, files only
    #[serde(rename = "sha1", skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl Entry {
    pub const fn is_folder(&self) -> bool {
        matches!(self.kind, EntryKind::Folder)
    }
}

/// Entry reduced to its name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedEntry {
    pub name: String,
}

impl From<Entry> for NamedEntry {
    fn from(entry: Entry) -> Self {
        Self { name: entry.name }
    }
}

/// Response payload for a directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Listing {
    Detailed(Vec<Entry>),
    Names(Vec<NamedEntry>),
    Split {
        folders: Vec<NamedEntry>,
        files: Vec<NamedEntry>,
    },
}

impl Listing {
    /// Collect walked entries into the requested shape, keeping walk order
    pub fn collect<I>(format: ListingFormat, entries: I) -> Self
    where
        I: IntoIterator<Item = Entry>,
    {
        match format {
            ListingFormat::Detailed => Self::Detailed(entries.into_iter().collect()),
            ListingFormat::Names => Self::Names(entries.into_iter().map(NamedEntry::from).collect()),
            ListingFormat::Split => {
                let (folders, files): (Vec<Entry>, Vec<Entry>) =
                    entries.into_iter().partition(Entry::is_folder);
                Self::Split {
                    folders: folders.into_iter().map(NamedEntry::from).collect(),
                    files: files.into_iter().map(NamedEntry::from).collect(),
                }
            }
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>, ListingError> {
        Ok(serde_json::to_vec(self)?)
    }
}
