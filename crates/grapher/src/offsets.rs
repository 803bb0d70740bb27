//! Rune-to-byte offset conversion.
//!
//! Some graphers count positions in unicode code points. The graph stores
//! byte offsets into the file on disk, so those positions are rewritten
//! here, one record at a time. A record whose offsets cannot be converted
//! keeps its original offsets and the pass moves on.

use crate::error::OffsetError;
use code_graph::{Output, Positioned};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Maps rune offsets to byte offsets for one file's content
#[derive(Debug, Clone)]
pub struct PositionIndex {
    /// Byte offset at which each rune starts
    rune_starts: Vec<usize>,
    len: usize,
}

impl PositionIndex {
    /// Index raw content. Each byte of an invalid UTF-8 sequence counts as one rune.
    pub fn new(content: &[u8]) -> Self {
        let mut rune_starts = Vec::with_capacity(content.len());
        let mut offset = 0;

        for chunk in content.utf8_chunks() {
            let valid = chunk.valid();
            rune_starts.extend(valid.char_indices().map(|(i, _)| offset + i));
            offset += valid.len();

            for _ in chunk.invalid() {
                rune_starts.push(offset);
                offset += 1;
            }
        }

        Self {
            rune_starts,
            len: content.len(),
        }
    }

    pub fn rune_count(&self) -> usize {
        self.rune_starts.len()
    }

    /// Content length in bytes
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte offset of the `rune`th code point. `rune == rune_count()` is the
    /// end of the content; anything past it is an error.
    pub fn byte_offset_of_rune(&self, rune: usize) -> Result<usize, OffsetError> {
        match rune.cmp(&self.rune_starts.len()) {
            std::cmp::Ordering::Less => Ok(self.rune_starts[rune]),
            std::cmp::Ordering::Equal => Ok(self.len),
            std::cmp::Ordering::Greater => Err(OffsetError::RuneOutOfRange {
                rune,
                rune_count: self.rune_starts.len(),
            }),
        }
    }
}

/// Position indexes keyed by absolute path, built on first use.
///
/// Lives for one normalization pass; file content is not re-checked.
#[derive(Debug, Default)]
pub struct FileContentCache {
    files: HashMap<PathBuf, PositionIndex>,
}

impl FileContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index for `path`, reading the file only the first time
    pub fn get_or_build(&mut self, path: &Path) -> std::io::Result<&PositionIndex> {
        match self.files.entry(path.to_path_buf()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let data = fs::read(path)?;
                let index = PositionIndex::new(&data);
                log::debug!(
                    "Indexed {} ({} bytes, {} runes)",
                    path.display(),
                    index.len(),
                    index.rune_count()
                );
                Ok(entry.insert(index))
            }
        }
    }

    /// Number of files indexed so far
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Why a record was left alone without trying to convert it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Record has no file
    NoFile,
    /// Path does not exist or is not a regular file
    NotARegularFile,
}

/// Result of converting one record's offsets
#[derive(Debug)]
pub enum ConvertOutcome {
    Skipped(SkipReason),
    /// Offsets rewritten; `changed` counts the values that actually moved
    Converted { changed: usize },
    /// Offsets left untouched
    Failed(OffsetError),
}

/// An isolated conversion failure
#[derive(Debug)]
pub struct ConversionWarning {
    pub kind: &'static str,
    pub file: String,
    pub error: OffsetError,
}

/// Tally of one conversion pass
#[derive(Debug, Default)]
pub struct ConversionReport {
    pub converted: usize,
    pub skipped: usize,
    pub changed_offsets: usize,
    pub files_indexed: usize,
    pub warnings: Vec<ConversionWarning>,
}

impl ConversionReport {
    fn record(&mut self, kind: &'static str, file: &str, outcome: ConvertOutcome) {
        match outcome {
            ConvertOutcome::Skipped(_) => self.skipped += 1,
            ConvertOutcome::Converted { changed } => {
                self.converted += 1;
                self.changed_offsets += changed;
            }
            ConvertOutcome::Failed(error) => {
                log::warn!(
                    "Failed to convert unicode offset to byte offset for {kind} in {file} \
                     (did the grapher emit a nonexistent offset?), continuing: {error}"
                );
                self.warnings.push(ConversionWarning {
                    kind,
                    file: file.to_string(),
                    error,
                });
            }
        }
    }

    pub fn failed(&self) -> usize {
        self.warnings.len()
    }
}

/// Converts record offsets relative to one root directory
#[derive(Debug)]
pub struct OffsetConverter {
    dir: PathBuf,
    cache: FileContentCache,
}

impl OffsetConverter {
    /// Create a converter with a fresh cache
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: FileContentCache::new(),
        }
    }

    /// Convert the non-zero `offsets` of a record located in `file`.
    ///
    /// Zero means "no position" and is never touched. Offsets are applied
    /// together: if one fails, none change.
    pub fn convert(&mut self, file: &str, offsets: &mut [&mut usize]) -> ConvertOutcome {
        if file.is_empty() {
            return ConvertOutcome::Skipped(SkipReason::NoFile);
        }

        let path = self.resolve(file);
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => {}
            _ => return ConvertOutcome::Skipped(SkipReason::NotARegularFile),
        }

        let index = match self.cache.get_or_build(&path) {
            Ok(index) => index,
            Err(source) => return ConvertOutcome::Failed(OffsetError::Read { path, source }),
        };

        let mut converted = Vec::with_capacity(offsets.len());
        for offset in offsets.iter() {
            let rune = **offset;
            if rune == 0 {
                converted.push(0);
                continue;
            }
            match index.byte_offset_of_rune(rune) {
                Ok(byte) => converted.push(byte),
                Err(err) => return ConvertOutcome::Failed(err),
            }
        }

        let mut changed = 0;
        for (offset, byte) in offsets.iter_mut().zip(converted) {
            if **offset != byte {
                log::debug!("Changed pos {} to {} in {}", **offset, byte, path.display());
                **offset = byte;
                changed += 1;
            }
        }
        ConvertOutcome::Converted { changed }
    }

    /// Join `file` under the root. Root and prefix components are dropped,
    /// so an absolute `file` never escapes `dir`.
    fn resolve(&self, file: &str) -> PathBuf {
        let mut path = self.dir.clone();
        path.extend(Path::new(file).components().filter(|c| {
            matches!(c, Component::Normal(_) | Component::CurDir | Component::ParentDir)
        }));
        path
    }

    /// Convert every record of one collection
    pub fn convert_records<T: Positioned>(&mut self, records: &mut [T], report: &mut ConversionReport) {
        for record in records {
            let (file, [start, end]) = record.position_mut();
            let outcome = self.convert(file, &mut [start, end]);
            report.record(T::KIND, file, outcome);
        }
    }

    /// Convert defs, refs, docs and anns, in that order
    pub fn convert_output(&mut self, output: &mut Output) -> ConversionReport {
        let mut report = ConversionReport::default();
        self.convert_records(&mut output.defs, &mut report);
        self.convert_records(&mut output.refs, &mut report);
        self.convert_records(&mut output.docs, &mut report);
        self.convert_records(&mut output.anns, &mut report);
        report.files_indexed = self.cache.len();
        report
    }

    pub fn cache(&self) -> &FileContentCache {
        &self.cache
    }
}
