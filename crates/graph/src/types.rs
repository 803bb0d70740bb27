use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

fn is_false(b: &bool) -> bool {
    !*b
}

/// Identity of a definition.
///
/// `(repo, commit_id, unit_type, unit, path)` identifies one definition
/// instance; dropping `commit_id` identifies its lineage across commits.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DefKey {
    #[serde(rename = "Repo", default, skip_serializing_if = "String::is_empty")]
    pub repo: String,

    /// Empty for an abstract key (spans commits)
    #[serde(rename = "CommitID", default, skip_serializing_if = "String::is_empty")]
    pub commit_id: String,

    #[serde(rename = "UnitType", default, skip_serializing_if = "String::is_empty")]
    pub unit_type: String,

    #[serde(rename = "Unit", default, skip_serializing_if = "String::is_empty")]
    pub unit: String,

    /// Opaque identifier within the unit, stable across commits. Not a tree path.
    #[serde(rename = "Path", default)]
    pub path: String,
}

impl DefKey {
    pub fn new(
        repo: impl Into<String>,
        unit_type: impl Into<String>,
        unit: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            repo: repo.into(),
            commit_id: String::new(),
            unit_type: unit_type.into(),
            unit: unit.into(),
            path: path.into(),
        }
    }

    /// Builder: pin the key to a commit
    #[must_use]
    pub fn at_commit(mut self, commit_id: impl Into<String>) -> Self {
        self.commit_id = commit_id.into();
        self
    }

    /// True when the key is not pinned to a commit
    pub fn is_abstract(&self) -> bool {
        self.commit_id.is_empty()
    }

    /// Key of the definition lineage (commit dropped)
    #[must_use]
    pub fn lineage(&self) -> Self {
        Self {
            commit_id: String::new(),
            ..self.clone()
        }
    }
}

impl fmt::Display for DefKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.repo)?;
        if !self.commit_id.is_empty() {
            write!(f, "@{}", self.commit_id)?;
        }
        write!(f, "/{}/{}/-/{}", self.unit_type, self.unit, self.path)
    }
}

/// Documentation attached to a definition
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DefDoc {
    /// MIME type, e.g. "text/plain" or "text/x-markdown"
    #[serde(rename = "Format")]
    pub format: String,

    #[serde(rename = "Data")]
    pub data: String,
}

/// A definition in code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Def {
    #[serde(flatten)]
    pub key: DefKey,

    #[serde(rename = "Name", default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Language-specific tag ("func", "type", ...)
    #[serde(rename = "Kind", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    /// Path relative to the repository/unit root
    #[serde(rename = "File", default)]
    pub file: String,

    #[serde(rename = "DefStart", default)]
    pub def_start: usize,

    #[serde(rename = "DefEnd", default)]
    pub def_end: usize,

    #[serde(rename = "Exported", default, skip_serializing_if = "is_false")]
    pub exported: bool,

    #[serde(rename = "Local", default, skip_serializing_if = "is_false")]
    pub local: bool,

    #[serde(rename = "Test", default, skip_serializing_if = "is_false")]
    pub test: bool,

    /// Opaque language-specific payload
    #[serde(rename = "Data", default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Always empty on grapher output (docs travel through `Output::docs`)
    #[serde(rename = "Docs", default, skip_serializing_if = "Vec::is_empty")]
    pub docs: Vec<DefDoc>,

    /// `/`-delimited hierarchy path; `-`-prefixed components are ghosts
    #[serde(rename = "TreePath", default, skip_serializing_if = "String::is_empty")]
    pub tree_path: String,
}

impl Def {
    pub fn new(key: DefKey, name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            key,
            name: name.into(),
            file: file.into(),
            ..Default::default()
        }
    }

    /// Builder: set the position range
    #[must_use]
    pub const fn span(mut self, start: usize, end: usize) -> Self {
        self.def_start = start;
        self.def_end = end;
        self
    }

    /// Builder: set the kind tag
    #[must_use]
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Builder: set the tree path
    #[must_use]
    pub fn tree_path(mut self, tree_path: impl Into<String>) -> Self {
        self.tree_path = tree_path.into();
        self
    }
}

/// Identity of a reference
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefKey {
    pub def_repo: String,
    pub def_unit_type: String,
    pub def_unit: String,
    pub def_path: String,
    pub repo: String,
    pub commit_id: String,
    pub unit_type: String,
    pub unit: String,
    pub file: String,
    pub start: usize,
    pub end: usize,
}

impl fmt::Display for RefKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{} -> {}/{}/{}/-/{}",
            self.file, self.start, self.end, self.def_repo, self.def_unit_type, self.def_unit, self.def_path
        )
    }
}

/// A reference from a source position to a definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ref {
    /// Repository of the target def; empty means the same repository
    #[serde(rename = "DefRepo", default, skip_serializing_if = "String::is_empty")]
    pub def_repo: String,

    #[serde(rename = "DefUnitType", default, skip_serializing_if = "String::is_empty")]
    pub def_unit_type: String,

    #[serde(rename = "DefUnit", default, skip_serializing_if = "String::is_empty")]
    pub def_unit: String,

    #[serde(rename = "DefPath", default)]
    pub def_path: String,

    /// This ref is the definition site itself
    #[serde(rename = "Def", default, skip_serializing_if = "is_false")]
    pub def: bool,

    #[serde(rename = "Repo", default, skip_serializing_if = "String::is_empty")]
    pub repo: String,

    #[serde(rename = "CommitID", default, skip_serializing_if = "String::is_empty")]
    pub commit_id: String,

    #[serde(rename = "UnitType", default, skip_serializing_if = "String::is_empty")]
    pub unit_type: String,

    #[serde(rename = "Unit", default, skip_serializing_if = "String::is_empty")]
    pub unit: String,

    #[serde(rename = "File", default)]
    pub file: String,

    #[serde(rename = "Start", default)]
    pub start: usize,

    #[serde(rename = "End", default)]
    pub end: usize,
}

impl Ref {
    /// Key of the def this ref points to
    pub fn def_key(&self) -> DefKey {
        DefKey {
            repo: self.def_repo.clone(),
            commit_id: String::new(),
            unit_type: self.def_unit_type.clone(),
            unit: self.def_unit.clone(),
            path: self.def_path.clone(),
        }
    }

    pub fn ref_key(&self) -> RefKey {
        RefKey {
            def_repo: self.def_repo.clone(),
            def_unit_type: self.def_unit_type.clone(),
            def_unit: self.def_unit.clone(),
            def_path: self.def_path.clone(),
            repo: self.repo.clone(),
            commit_id: self.commit_id.clone(),
            unit_type: self.unit_type.clone(),
            unit: self.unit.clone(),
            file: self.file.clone(),
            start: self.start,
            end: self.end,
        }
    }
}

/// Identity of a documentation block
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocKey {
    pub unit_type: String,
    pub unit: String,
    pub path: String,
    pub format: String,
    pub file: String,
}

impl fmt::Display for DocKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/-/{} ({}) in {}",
            self.unit_type, self.unit, self.path, self.format, self.file
        )
    }
}

/// Documentation for a definition, anchored to a source range
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doc {
    #[serde(rename = "UnitType", default, skip_serializing_if = "String::is_empty")]
    pub unit_type: String,

    #[serde(rename = "Unit", default, skip_serializing_if = "String::is_empty")]
    pub unit: String,

    #[serde(rename = "Path", default)]
    pub path: String,

    #[serde(rename = "Format", default, skip_serializing_if = "String::is_empty")]
    pub format: String,

    #[serde(rename = "Data", default, skip_serializing_if = "String::is_empty")]
    pub data: String,

    #[serde(rename = "File", default)]
    pub file: String,

    #[serde(rename = "Start", default)]
    pub start: usize,

    #[serde(rename = "End", default)]
    pub end: usize,
}

impl Doc {
    pub fn doc_key(&self) -> DocKey {
        DocKey {
            unit_type: self.unit_type.clone(),
            unit: self.unit.clone(),
            path: self.path.clone(),
            format: self.format.clone(),
            file: self.file.clone(),
        }
    }
}

/// Annotation on a source range (links, syntax classes, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ann {
    #[serde(rename = "Repo", default, skip_serializing_if = "String::is_empty")]
    pub repo: String,

    #[serde(rename = "CommitID", default, skip_serializing_if = "String::is_empty")]
    pub commit_id: String,

    #[serde(rename = "UnitType", default, skip_serializing_if = "String::is_empty")]
    pub unit_type: String,

    #[serde(rename = "Unit", default, skip_serializing_if = "String::is_empty")]
    pub unit: String,

    #[serde(rename = "File", default)]
    pub file: String,

    #[serde(rename = "Start", default)]
    pub start: usize,

    #[serde(rename = "End", default)]
    pub end: usize,

    #[serde(rename = "Type", default, skip_serializing_if = "String::is_empty")]
    pub ann_type: String,

    #[serde(rename = "Data", default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Records anchored to a file range.
///
/// Gives offset rewriting one way to reach the file name and the
/// `[start, end]` pair of any graph entity.
pub trait Positioned {
    /// Entity name used in logs
    const KIND: &'static str;

    /// File name together with mutable `[start, end]` offsets
    fn position_mut(&mut self) -> (&str, [&mut usize; 2]);
}

impl Positioned for Def {
    const KIND: &'static str = "def";

    fn position_mut(&mut self) -> (&str, [&mut usize; 2]) {
        (&self.file, [&mut self.def_start, &mut self.def_end])
    }
}

impl Positioned for Ref {
    const KIND: &'static str = "ref";

    fn position_mut(&mut self) -> (&str, [&mut usize; 2]) {
        (&self.file, [&mut self.start, &mut self.end])
    }
}

impl Positioned for Doc {
    const KIND: &'static str = "doc";

    fn position_mut(&mut self) -> (&str, [&mut usize; 2]) {
        (&self.file, [&mut self.start, &mut self.end])
    }
}

impl Positioned for Ann {
    const KIND: &'static str = "ann";

    fn position_mut(&mut self) -> (&str, [&mut usize; 2]) {
        (&self.file, [&mut self.start, &mut self.end])
    }
}

/// Unit of exchange produced by graphers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    #[serde(rename = "Defs", default, skip_serializing_if = "Vec::is_empty")]
    pub defs: Vec<Def>,

    #[serde(rename = "Refs", default, skip_serializing_if = "Vec::is_empty")]
    pub refs: Vec<Ref>,

    #[serde(rename = "Docs", default, skip_serializing_if = "Vec::is_empty")]
    pub docs: Vec<Doc>,

    #[serde(rename = "Anns", default, skip_serializing_if = "Vec::is_empty")]
    pub anns: Vec<Ann>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode grapher output (JSON)
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty() && self.refs.is_empty() && self.docs.is_empty() && self.anns.is_empty()
    }

    /// Total number of records across all four collections
    pub fn len(&self) -> usize {
        self.defs.len() + self.refs.len() + self.docs.len() + self.anns.len()
    }
}

/// Unit of the positions in grapher output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetType {
    /// Not declared by the grapher; decided per unit type
    #[default]
    Unspecified,

    /// Unicode code point offsets, converted to bytes
    Char,

    /// Already byte offsets
    Byte,
}

impl OffsetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OffsetType::Unspecified => "unspecified",
            OffsetType::Char => "char",
            OffsetType::Byte => "byte",
        }
    }
}
