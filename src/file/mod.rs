//! Byte sources and binary readers for debug-symbol data.
//!
//! Symbol data either arrives with the module (embedded, already in memory) or is side-loaded
//! from a file next to it. Both cases are served through the [`Backend`] trait so that the
//! readers in [`crate::metadata::symbols`] never care where the bytes live.
//!
//! # Key Components
//!
//! - [`Backend`] - Trait for different data sources (disk files, memory buffers)
//! - [`memory::Memory`] - Owned in-memory buffer
//! - [`physical::Physical`] - Read-only memory-mapped file
//! - [`parser::Parser`] - Bounds-checked cursor with ECMA-335 compressed integer decoding
//! - [`encoder`] - The matching compressed integer encoders
//!
//! # Examples
//!
//! ```rust
//! use dotpatch::file::{Backend, Memory, Parser};
//!
//! let memory = Memory::new(vec![0x03, 0x81, 0x00]);
//! let mut parser = Parser::new(memory.data_slice(1, 2)?);
//! assert_eq!(parser.read_compressed_uint()?, 0x100);
//! # Ok::<(), dotpatch::Error>(())
//! ```

pub mod encoder;
pub mod memory;
pub mod parser;
pub mod physical;

pub use encoder::{write_compressed_int, write_compressed_uint};
pub use memory::Memory;
pub use parser::Parser;
pub use physical::Physical;

use crate::Result;

/// Backend trait for file data sources.
///
/// All implementations must be thread-safe.
pub trait Backend: Send + Sync + std::fmt::Debug {
    /// Returns a slice of the data at the given offset and length.
    ///
    /// # Arguments
    ///
    /// * `offset` - The starting offset within the data.
    /// * `len` - The length of the slice in bytes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if the requested range is out of bounds.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// Returns the entire data buffer.
    fn data(&self) -> &[u8];

    /// Returns the total length of the data buffer.
    fn len(&self) -> usize;

    /// Returns `true` if the backend holds no data.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
