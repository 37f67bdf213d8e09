//! Debug-symbol store: per-method sequence points for a compiled module.
//!
//! The store is laid out like a trimmed Portable PDB: a document table, one debug row per
//! method (document index + sequence-point blob index) and a blob heap. The heap is the
//! part that comes from outside. It is either embedded with the module ([`crate::file::Memory`])
//! or memory-mapped from a side-loaded file ([`crate::file::Physical`]), and it is never trusted.
//!
//! Every read goes through [`DebugSymbolStore::read_method`], which returns a `Result` so
//! callers decide how a corrupt store degrades. The resolver turns every error into
//! "no location".
//!
//! # Examples
//!
//! ```rust
//! use dotpatch::metadata::{
//!     sequencepoints::SequencePoint,
//!     symbols::DebugSymbolStoreBuilder,
//!     token::TableId,
//! };
//!
//! let method = TableId::MethodDef.token(1);
//! let mut builder = DebugSymbolStoreBuilder::new();
//! let document = builder.add_document("Game.cs");
//! builder.add_method(method, document, &[SequencePoint::new(0, 12, 5, 12, 30)])?;
//! let store = builder.build();
//!
//! let info = store.read_method(method)?.unwrap();
//! assert_eq!(info.location_at(0).unwrap().to_string(), "Game.cs(12,5,12,30)");
//! # Ok::<(), dotpatch::Error>(())
//! ```

use std::{collections::HashMap, path::Path};

use crate::{
    file::{write_compressed_uint, Backend, Memory, Parser, Physical},
    metadata::{
        sequencepoints::{
            encode_sequence_points, parse_sequence_points, SequencePoint, SequencePoints,
            SourceLocation,
        },
        token::Token,
    },
    Error::OutOfBounds,
    Result,
};

/// Debug row of one method: 1-based document index and blob heap offset of its sequence points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodDebugRow {
    /// 1-based index into the document table, 0 is invalid
    pub document: u32,
    /// Offset of the sequence-point blob in the heap, 0 means no sequence points
    pub sequence_points: u32,
}

/// Decoded debug information of one method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDebugInformation {
    /// Document the sequence points refer to
    pub document: String,
    /// Decoded sequence points, in IL order
    pub points: SequencePoints,
}

impl MethodDebugInformation {
    /// Returns the location of the visible sequence point at `il_offset`.
    #[must_use]
    pub fn location_at(&self, il_offset: u32) -> Option<SourceLocation> {
        self.points
            .find_visible(il_offset)
            .map(|point| point.to_location(&self.document))
    }
}

/// Lookup from method tokens to their sequence points.
#[derive(Debug)]
pub struct DebugSymbolStore {
    documents: Vec<String>,
    methods: HashMap<Token, MethodDebugRow>,
    heap: Box<dyn Backend>,
}

impl DebugSymbolStore {
    /// Create an empty store over `heap`.
    pub fn new(heap: impl Backend + 'static) -> Self {
        DebugSymbolStore {
            documents: Vec::new(),
            methods: HashMap::new(),
            heap: Box::new(heap),
        }
    }

    /// Create an empty store over an in-memory blob heap.
    #[must_use]
    pub fn from_bytes(heap: Vec<u8>) -> Self {
        Self::new(Memory::new(heap))
    }

    /// Create an empty store over a side-loaded blob heap file.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened or mapped.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Physical::new(path)?))
    }

    /// Appends a document and returns its 1-based index.
    pub fn add_document(&mut self, name: impl Into<String>) -> u32 {
        self.documents.push(name.into());
        u32::try_from(self.documents.len()).unwrap_or(u32::MAX)
    }

    /// Registers the debug row of `method`, replacing any previous row.
    pub fn add_method(&mut self, method: Token, row: MethodDebugRow) {
        self.methods.insert(method, row);
    }

    /// Number of methods with a debug row.
    #[must_use]
    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    /// Returns `true` if `method` has a debug row.
    #[must_use]
    pub fn contains(&self, method: Token) -> bool {
        self.methods.contains_key(&method)
    }

    /// Returns the document at the 1-based `index`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for index 0 or an index past the document table.
    pub fn document(&self, index: u32) -> Result<&str> {
        index
            .checked_sub(1)
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| self.documents.get(index))
            .map(String::as_str)
            .ok_or_else(|| malformed_error!("Invalid document index - {}", index))
    }

    /// Returns the blob stored at heap offset `index`, without its length prefix.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the offset or the blob length leaves the heap,
    /// and [`crate::Error::Malformed`] for an invalid length prefix.
    pub fn blob(&self, index: u32) -> Result<&[u8]> {
        let data = self.heap.data();
        let index = usize::try_from(index).map_err(|_| OutOfBounds)?;
        if index >= data.len() {
            return Err(OutOfBounds);
        }

        let mut parser = Parser::new(&data[index..]);
        let len = parser.read_compressed_uint()? as usize;
        let Some(data_start) = index.checked_add(parser.pos()) else {
            return Err(OutOfBounds);
        };

        self.heap.data_slice(data_start, len)
    }

    /// Reads and decodes the debug information of `method`.
    ///
    /// Returns `Ok(None)` when the method has no debug row or no sequence points.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] or [`crate::Error::OutOfBounds`] when the row
    /// points outside the store or the sequence-point blob is corrupt.
    pub fn read_method(&self, method: Token) -> Result<Option<MethodDebugInformation>> {
        let Some(row) = self.methods.get(&method) else {
            return Ok(None);
        };

        if row.sequence_points == 0 {
            return Ok(None);
        }

        let document = self.document(row.document)?.to_string();
        let points = parse_sequence_points(self.blob(row.sequence_points)?)?;

        Ok(Some(MethodDebugInformation { document, points }))
    }
}

/// Builds a [`DebugSymbolStore`] with an in-memory heap.
///
/// Loaders that decode embedded symbols and tests both author stores through this.
#[derive(Debug)]
pub struct DebugSymbolStoreBuilder {
    documents: Vec<String>,
    methods: HashMap<Token, MethodDebugRow>,
    heap: Vec<u8>,
}

impl Default for DebugSymbolStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugSymbolStoreBuilder {
    /// Create a builder; the heap starts with the reserved empty blob at offset 0.
    #[must_use]
    pub fn new() -> Self {
        DebugSymbolStoreBuilder {
            documents: Vec::new(),
            methods: HashMap::new(),
            heap: vec![0],
        }
    }

    /// Appends a document and returns its 1-based index.
    pub fn add_document(&mut self, name: impl Into<String>) -> u32 {
        self.documents.push(name.into());
        u32::try_from(self.documents.len()).unwrap_or(u32::MAX)
    }

    /// Encodes `points` into the heap and registers them for `method`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the points cannot be encoded.
    pub fn add_method(
        &mut self,
        method: Token,
        document: u32,
        points: &[SequencePoint],
    ) -> Result<&mut Self> {
        let blob = encode_sequence_points(points)?;
        self.add_raw_method(method, document, &blob)
    }

    /// Stores `blob` verbatim as the sequence-point blob of `method`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the blob is too large for the heap.
    pub fn add_raw_method(
        &mut self,
        method: Token,
        document: u32,
        blob: &[u8],
    ) -> Result<&mut Self> {
        let offset = u32::try_from(self.heap.len())
            .map_err(|_| malformed_error!("Blob heap exceeds 4GB"))?;
        let len = u32::try_from(blob.len())
            .map_err(|_| malformed_error!("Blob too large - {} bytes", blob.len()))?;

        write_compressed_uint(len, &mut self.heap)?;
        self.heap.extend_from_slice(blob);
        self.methods.insert(
            method,
            MethodDebugRow {
                document,
                sequence_points: offset,
            },
        );
        Ok(self)
    }

    /// Registers an explicit debug row for `method` without touching the heap.
    pub fn add_row(&mut self, method: Token, row: MethodDebugRow) -> &mut Self {
        self.methods.insert(method, row);
        self
    }

    /// Finishes the store.
    #[must_use]
    pub fn build(self) -> DebugSymbolStore {
        DebugSymbolStore {
            documents: self.documents,
            methods: self.methods,
            heap: Box::new(Memory::new(self.heap)),
        }
    }

    /// Returns the heap bytes written so far.
    #[must_use]
    pub fn heap(&self) -> &[u8] {
        &self.heap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{metadata::token::TableId, Error};

    fn method(row: u32) -> Token {
        TableId::MethodDef.token(row)
    }

    #[test]
    fn read_encoded_method() {
        let mut builder = DebugSymbolStoreBuilder::new();
        let doc = builder.add_document("Game.cs");
        builder
            .add_method(
                method(1),
                doc,
                &[
                    SequencePoint::new(0, 12, 5, 12, 30),
                    SequencePoint::hidden(4),
                    SequencePoint::new(9, 13, 9, 13, 20),
                ],
            )
            .unwrap();
        let store = builder.build();

        let info = store.read_method(method(1)).unwrap().unwrap();
        assert_eq!(info.document, "Game.cs");
        assert_eq!(info.points.len(), 3);
        assert_eq!(
            info.location_at(9),
            Some(SourceLocation::new("Game.cs", 13, 9, 13, 20))
        );
        assert_eq!(info.location_at(4), None);
        assert_eq!(info.location_at(5), None);
    }

    #[test]
    fn unknown_and_empty_methods() {
        let mut builder = DebugSymbolStoreBuilder::new();
        let doc = builder.add_document("a.cs");
        builder.add_row(
            method(2),
            MethodDebugRow {
                document: doc,
                sequence_points: 0,
            },
        );
        let store = builder.build();

        assert!(store.read_method(method(1)).unwrap().is_none());
        assert!(store.read_method(method(2)).unwrap().is_none());
        assert!(store.contains(method(2)));
    }

    #[test]
    fn blob_reads_length_prefix() {
        let store = DebugSymbolStore::from_bytes(vec![0x00, 0x03, 0x41, 0x42, 0x43, 0x02, 0x44]);
        assert_eq!(store.blob(1).unwrap(), &[0x41, 0x42, 0x43]);
        assert!(matches!(store.blob(5), Err(Error::OutOfBounds)));
        assert!(matches!(store.blob(7), Err(Error::OutOfBounds)));
        assert!(matches!(store.blob(u32::MAX), Err(Error::OutOfBounds)));
    }

    #[test]
    fn document_indices() {
        let mut store = DebugSymbolStore::from_bytes(vec![0]);
        let index = store.add_document("Program.cs");
        assert_eq!(index, 1);
        assert_eq!(store.document(1).unwrap(), "Program.cs");
        assert!(matches!(store.document(0), Err(Error::Malformed { .. })));
        assert!(matches!(store.document(2), Err(Error::Malformed { .. })));
    }

    #[test]
    fn corrupt_rows_are_errors() {
        let mut builder = DebugSymbolStoreBuilder::new();
        let doc = builder.add_document("a.cs");
        builder.add_raw_method(method(1), doc, &[1, 10]).unwrap();
        builder
            .add_raw_method(method(2), 9, &[1, 10, 2, 0, 5])
            .unwrap();
        builder.add_row(
            method(3),
            MethodDebugRow {
                document: doc,
                sequence_points: 0x1000,
            },
        );
        let store = builder.build();

        assert!(store.read_method(method(1)).is_err());
        assert!(store.read_method(method(2)).is_err());
        assert!(store.read_method(method(3)).is_err());
    }

    #[test]
    fn side_loaded_heap() {
        let mut builder = DebugSymbolStoreBuilder::new();
        builder
            .add_method(method(1), 1, &[SequencePoint::new(2, 7, 1, 7, 4)])
            .unwrap();

        let file_name = format!("dotpatch-symbols-{}.bin", std::process::id());
        let path = std::env::temp_dir().join(file_name);
        std::fs::write(&path, builder.heap()).unwrap();

        let mut store = DebugSymbolStore::from_path(&path).unwrap();
        let doc = store.add_document("Side.cs");
        store.add_method(
            method(1),
            MethodDebugRow {
                document: doc,
                sequence_points: 1,
            },
        );
        let info = store.read_method(method(1)).unwrap().unwrap();
        assert_eq!(info.location_at(2).unwrap().to_string(), "Side.cs(7,1,7,4)");
        assert_eq!(store.method_count(), 1);

        drop(store);
        std::fs::remove_file(&path).unwrap();
    }
}
