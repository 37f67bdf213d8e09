//! In-memory backend for symbol data that was embedded in the module or built by a loader.

use super::Backend;
use crate::{Error::OutOfBounds, Result};

/// Owned byte buffer implementing [`Backend`].
#[derive(Debug, Default)]
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    /// Create a new memory backend
    ///
    /// ## Arguments
    /// * 'data' - The data buffer to consume
    #[must_use]
    pub fn new(data: Vec<u8>) -> Memory {
        Memory { data }
    }
}

impl From<Vec<u8>> for Memory {
    fn from(data: Vec<u8>) -> Self {
        Memory::new(data)
    }
}

impl Backend for Memory {
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let Some(offset_end) = offset.checked_add(len) else {
            return Err(OutOfBounds);
        };

        if offset_end > self.data.len() {
            return Err(OutOfBounds);
        }

        Ok(&self.data[offset..offset_end])
    }

    fn data(&self) -> &[u8] {
        self.data.as_slice()
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory() {
        let mut data = vec![0xCC_u8; 64];
        data[10..15].fill(0xBB);

        let memory = Memory::new(data);

        assert_eq!(memory.len(), 64);
        assert!(!memory.is_empty());
        assert_eq!(memory.data()[0], 0xCC);
        assert_eq!(memory.data_slice(10, 5).unwrap(), &[0xBB; 5]);
    }

    #[test]
    fn memory_out_of_bounds() {
        let memory = Memory::new(vec![0u8; 8]);

        assert!(memory.data_slice(4, 4).is_ok());
        assert!(matches!(memory.data_slice(4, 5), Err(OutOfBounds)));
        assert!(matches!(memory.data_slice(usize::MAX, 2), Err(OutOfBounds)));
    }

    #[test]
    fn memory_empty() {
        let memory = Memory::default();
        assert!(memory.is_empty());
        assert!(memory.data_slice(0, 0).unwrap().is_empty());
    }
}
