//! Stable identifiers for records in a [`crate::metadata::module::CompiledModule`].
//!
//! Records are stored in per-table arenas and addressed by ECMA-335 style tokens: the high
//! byte names the table, the low 24 bits hold the 1-based row. Tokens stay valid for the
//! lifetime of a module because arenas only ever grow.

use std::fmt;

use strum::{Display, FromRepr};

/// Metadata tables a [`Token`] can point into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromRepr)]
#[repr(u8)]
pub enum TableId {
    /// Type definitions owned by the module
    TypeDef = 0x02,
    /// Method definitions owned by the module
    MethodDef = 0x06,
    /// Member references imported from other assemblies
    MemberRef = 0x0A,
    /// Attribute records attached to the module
    CustomAttribute = 0x0C,
    /// References to other assemblies
    AssemblyRef = 0x23,
}

impl TableId {
    /// Builds the token for `row` (1-based) in this table.
    #[must_use]
    pub fn token(self, row: u32) -> Token {
        Token((u32::from(self as u8) << 24) | (row & 0x00FF_FFFF))
    }
}

/// A metadata token representing a reference to a metadata table entry.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(pub u32);

impl Token {
    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table byte from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Returns the table this token points into, if it is one the module model knows.
    #[must_use]
    pub fn kind(&self) -> Option<TableId> {
        TableId::from_repr(self.table())
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Returns the 0-based arena index if this token points into `table`.
    #[must_use]
    pub fn index_in(&self, table: TableId) -> Option<usize> {
        if self.kind() != Some(table) || self.row() == 0 {
            return None;
        }

        usize::try_from(self.row() - 1).ok()
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_token_layout() {
        let token = TableId::MethodDef.token(1);
        assert_eq!(token.value(), 0x0600_0001);
        assert_eq!(token.table(), 0x06);
        assert_eq!(token.row(), 1);
        assert_eq!(token.kind(), Some(TableId::MethodDef));

        let token = TableId::AssemblyRef.token(0x00FF_FFFF);
        assert_eq!(token.value(), 0x23FF_FFFF);
    }

    #[test]
    fn index_in_table() {
        let token = TableId::TypeDef.token(3);
        assert_eq!(token.index_in(TableId::TypeDef), Some(2));
        assert_eq!(token.index_in(TableId::MethodDef), None);
        assert_eq!(TableId::TypeDef.token(0).index_in(TableId::TypeDef), None);
    }

    #[test]
    fn unknown_table() {
        let token = Token::new(0x1B00_0001);
        assert_eq!(token.kind(), None);
        assert!(!token.is_null());
        assert!(Token::new(0).is_null());
    }

    #[test]
    fn display_and_debug() {
        let token = Token(0x0600_0001);
        assert_eq!(format!("{token}"), "0x06000001");

        let debug_str = format!("{token:?}");
        assert!(debug_str.contains("Token(0x06000001"));
        assert!(debug_str.contains("table: 0x06"));
        assert!(debug_str.contains("row: 1"));
        assert_eq!(TableId::MemberRef.to_string(), "MemberRef");
    }

    #[test]
    fn conversions() {
        let token: Token = 0x0A00_0002u32.into();
        assert_eq!(token.kind(), Some(TableId::MemberRef));
        let raw: u32 = token.into();
        assert_eq!(raw, 0x0A00_0002);
    }
}
