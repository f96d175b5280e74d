use std::cmp::Ordering;
use std::collections::BTreeMap;

use bstr::{BStr, BString, ByteSlice};
use git_hash::{ObjectId, SHA1_LEN};

use crate::ObjectError;

const S_IFMT: u32 = 0o170000;
const S_IFDIR: u32 = 0o040000;

/// File mode for tree entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileMode {
    /// Regular file (100644)
    Regular,
    /// Executable file (100755)
    Executable,
    /// Symbolic link (120000)
    Symlink,
    /// Git submodule link (160000)
    Gitlink,
    /// Subdirectory (040000)
    Tree,
    /// Any other mode; parses, but fails structural checks.
    Unknown(u32),
}

impl FileMode {
    /// Parse from octal ASCII bytes (e.g., `b"100644"`).
    ///
    /// Leading zeros are accepted here; [`crate::check`] rejects them.
    pub fn from_bytes(s: &[u8]) -> Result<Self, ObjectError> {
        let raw = parse_octal(s).ok_or_else(|| ObjectError::malformed_raw("invalid file mode", s))?;
        Ok(Self::from_raw(raw))
    }

    /// Create from the raw numeric value.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0o100644 => Self::Regular,
            0o100755 => Self::Executable,
            0o120000 => Self::Symlink,
            0o160000 => Self::Gitlink,
            0o040000 => Self::Tree,
            other => Self::Unknown(other),
        }
    }

    /// Serialize to octal ASCII bytes (git's canonical format, no leading zeros).
    pub fn as_bytes(&self) -> BString {
        BString::from(format!("{:o}", self.raw()))
    }

    /// Get the raw numeric value.
    pub fn raw(&self) -> u32 {
        match self {
            Self::Regular => 0o100644,
            Self::Executable => 0o100755,
            Self::Symlink => 0o120000,
            Self::Gitlink => 0o160000,
            Self::Tree => 0o40000,
            Self::Unknown(v) => *v,
        }
    }

    /// Does this mode denote a directory? Decided by the file-type bits, so
    /// unusual directory modes sort like directories too.
    pub fn is_tree(&self) -> bool {
        self.raw() & S_IFMT == S_IFDIR
    }

    /// Is this a blob (file) entry?
    pub fn is_blob(&self) -> bool {
        matches!(self, Self::Regular | Self::Executable)
    }

    pub fn is_symlink(&self) -> bool {
        matches!(self, Self::Symlink)
    }

    /// Is this a gitlink (submodule)?
    pub fn is_gitlink(&self) -> bool {
        matches!(self, Self::Gitlink)
    }

    /// One of the five modes git writes.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

/// Parse an octal ASCII string to u32.
fn parse_octal(s: &[u8]) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    let mut val: u32 = 0;
    for &b in s {
        if !(b'0'..=b'7').contains(&b) {
            return None;
        }
        val = val.checked_mul(8)?.checked_add(u32::from(b - b'0'))?;
    }
    Some(val)
}

/// A single entry in a git tree object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: FileMode,
    pub name: BString,
    pub oid: ObjectId,
}

impl TreeEntry {
    pub fn new(name: impl Into<BString>, mode: FileMode, oid: ObjectId) -> Self {
        Self {
            mode,
            name: name.into(),
            oid,
        }
    }

    /// Compare entries using git's tree sorting rules.
    ///
    /// Directories sort as if they had a trailing '/'. This means
    /// "foo" (dir) sorts after "foo.c" but before "foo0".
    pub fn cmp_entries(a: &TreeEntry, b: &TreeEntry) -> Ordering {
        tree_order_cmp(&a.name, a.mode.is_tree(), &b.name, b.mode.is_tree())
    }
}

/// Git's tree entry name comparison.
///
/// Each name is compared as if a directory name carried its trailing '/':
/// plain unsigned byte-wise comparison of `name` or `name + "/"`.
pub fn tree_order_cmp(name1: &[u8], is_dir1: bool, name2: &[u8], is_dir2: bool) -> Ordering {
    let key1 = name1.iter().chain(is_dir1.then_some(&b'/'));
    let key2 = name2.iter().chain(is_dir2.then_some(&b'/'));
    key1.cmp(key2)
}

/// Stable sort into canonical tree order.
pub fn sort_entries(entries: &mut [TreeEntry]) {
    entries.sort_by(TreeEntry::cmp_entries);
}

/// One entry as it appears in a raw tree payload, before any validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTreeEntry<'a> {
    /// Byte offset of the entry in the payload.
    pub offset: usize,
    /// The mode exactly as written.
    pub mode_text: &'a [u8],
    pub mode: FileMode,
    pub name: &'a BStr,
    pub oid: ObjectId,
}

impl RawTreeEntry<'_> {
    /// Whether the mode was written without leading zeros.
    pub fn has_canonical_mode(&self) -> bool {
        self.mode_text.first() != Some(&b'0')
    }
}

/// Lazily split a tree payload into its entries.
///
/// Each entry is `<octal-mode> <name>\0<20-byte-oid>`. Iteration stops at
/// the first framing error.
pub fn parse_tree(content: &[u8]) -> RawTreeEntries<'_> {
    RawTreeEntries {
        content,
        pos: 0,
        failed: false,
    }
}

/// Iterator returned by [`parse_tree`].
pub struct RawTreeEntries<'a> {
    content: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> RawTreeEntries<'a> {
    fn entry_at(&self, pos: usize) -> Result<(RawTreeEntry<'a>, usize), ObjectError> {
        let content = self.content;
        let space_pos = content[pos..]
            .find_byte(b' ')
            .ok_or_else(|| ObjectError::InvalidTreeEntry {
                offset: pos,
                reason: "missing space after mode".into(),
            })?
            + pos;

        let mode_text = &content[pos..space_pos];
        let mode = FileMode::from_bytes(mode_text).map_err(|_| ObjectError::InvalidTreeEntry {
            offset: pos,
            reason: format!("invalid mode {:?}", mode_text.as_bstr()),
        })?;

        let name_start = space_pos + 1;
        let null_pos = content[name_start..]
            .find_byte(0)
            .ok_or_else(|| ObjectError::InvalidTreeEntry {
                offset: name_start,
                reason: "missing null after name".into(),
            })?
            + name_start;

        let oid_start = null_pos + 1;
        let oid_end = oid_start + SHA1_LEN;
        if oid_end > content.len() {
            return Err(ObjectError::InvalidTreeEntry {
                offset: oid_start,
                reason: "truncated object id".into(),
            });
        }
        let oid = ObjectId::from_bytes(&content[oid_start..oid_end])?;

        let entry = RawTreeEntry {
            offset: pos,
            mode_text,
            mode,
            name: content[name_start..null_pos].as_bstr(),
            oid,
        };
        Ok((entry, oid_end))
    }
}

impl<'a> Iterator for RawTreeEntries<'a> {
    type Item = Result<RawTreeEntry<'a>, ObjectError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.content.len() {
            return None;
        }
        match self.entry_at(self.pos) {
            Ok((entry, next)) => {
                self.pos = next;
                Some(Ok(entry))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// A git tree object: a mapping from entry name to mode and target.
///
/// Names are unique; inserting an existing name replaces its entry.
/// Iteration and serialization use tree order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tree {
    entries: BTreeMap<BString, (FileMode, ObjectId)>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse tree content from binary format.
    ///
    /// A stream that repeats a name keeps the last occurrence; use
    /// [`crate::check`] to reject such streams.
    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        let mut tree = Self::new();
        for entry in parse_tree(content) {
            let entry = entry?;
            tree.insert(entry.name, entry.mode, entry.oid);
        }
        Ok(tree)
    }

    /// Serialize tree content to binary format, in tree order.
    pub fn serialize_content(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for entry in self.iter() {
            out.extend_from_slice(&entry.mode.as_bytes());
            out.push(b' ');
            out.extend_from_slice(&entry.name);
            out.push(0);
            out.extend_from_slice(entry.oid.as_bytes());
        }
        out
    }

    /// Add or replace an entry. Returns the previous mode and target.
    pub fn insert(
        &mut self,
        name: impl Into<BString>,
        mode: FileMode,
        oid: ObjectId,
    ) -> Option<(FileMode, ObjectId)> {
        self.entries.insert(name.into(), (mode, oid))
    }

    pub fn remove(&mut self, name: &[u8]) -> Option<(FileMode, ObjectId)> {
        self.entries.remove(name.as_bstr())
    }

    /// Lookup an entry by name.
    pub fn get(&self, name: &[u8]) -> Option<(FileMode, ObjectId)> {
        self.entries.get(name.as_bstr()).copied()
    }

    pub fn contains(&self, name: &[u8]) -> bool {
        self.entries.contains_key(name.as_bstr())
    }

    /// Entries in tree order.
    pub fn iter(&self) -> impl Iterator<Item = TreeEntry> {
        let mut sorted: Vec<TreeEntry> = self.iter_name_order().collect();
        sort_entries(&mut sorted);
        sorted.into_iter()
    }

    /// Entries in plain byte-wise name order.
    pub fn iter_name_order(&self) -> impl Iterator<Item = TreeEntry> + '_ {
        self.entries
            .iter()
            .map(|(name, &(mode, oid))| TreeEntry::new(name.clone(), mode, oid))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<TreeEntry> for Tree {
    fn from_iter<I: IntoIterator<Item = TreeEntry>>(iter: I) -> Self {
        let mut tree = Self::new();
        for entry in iter {
            tree.insert(entry.name, entry.mode, entry.oid);
        }
        tree
    }
}
