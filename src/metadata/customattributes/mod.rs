//! Module-level metadata attribute records.
//!
//! A module carries an ordered list of [`AttributeRecord`]s. Well-known attributes such as
//! `AssemblyFileVersionAttribute` are canonical: there is at most one record of such a type
//! per module, so updates go through [`AttributeList::replace_or_add`] (or an explicit
//! find-then-add) and never append a second copy.

mod types;

pub use types::*;

/// Ordered collection of the attribute records attached to one module.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeList(Vec<AttributeRecord>);

impl AttributeList {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        AttributeList(Vec::new())
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no records are attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the records in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, AttributeRecord> {
        self.0.iter()
    }

    /// Returns the first record of `attribute_type`.
    #[must_use]
    pub fn find(&self, attribute_type: &str) -> Option<&AttributeRecord> {
        self.0.iter().find(|record| record.is(attribute_type))
    }

    /// Returns the first record of `attribute_type` for in-place editing.
    pub fn find_mut(&mut self, attribute_type: &str) -> Option<&mut AttributeRecord> {
        self.0.iter_mut().find(|record| record.is(attribute_type))
    }

    /// Number of records of `attribute_type`.
    #[must_use]
    pub fn count(&self, attribute_type: &str) -> usize {
        self.0
            .iter()
            .filter(|record| record.is(attribute_type))
            .count()
    }

    /// Appends a record.
    pub fn push(&mut self, record: AttributeRecord) {
        self.0.push(record);
    }

    /// Replaces the canonical record of the same type, or appends `record` if there is none.
    ///
    /// Returns the record that was replaced.
    pub fn replace_or_add(&mut self, record: AttributeRecord) -> Option<AttributeRecord> {
        match self.find_mut(&record.attribute_type) {
            Some(existing) => Some(std::mem::replace(existing, record)),
            None => {
                self.0.push(record);
                None
            }
        }
    }
}

impl<'a> IntoIterator for &'a AttributeList {
    type Item = &'a AttributeRecord;
    type IntoIter = std::slice::Iter<'a, AttributeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::token::{TableId, Token};

    const FILE_VERSION: &str = "System.Reflection.AssemblyFileVersionAttribute";

    fn record(value: &str) -> AttributeRecord {
        AttributeRecord::new(
            FILE_VERSION,
            TableId::MemberRef.token(1),
            vec![value.into()],
        )
    }

    #[test]
    fn replace_or_add_appends_once() {
        let mut list = AttributeList::new();

        assert!(list.replace_or_add(record("1.0.0.0")).is_none());
        let previous = list.replace_or_add(record("1.0.1.0")).unwrap();

        assert_eq!(previous.fixed_args[0].as_str(), Some("1.0.0.0"));
        assert_eq!(list.count(FILE_VERSION), 1);
        assert_eq!(
            list.find(FILE_VERSION).unwrap().fixed_args[0].as_str(),
            Some("1.0.1.0")
        );
    }

    #[test]
    fn replace_keeps_position() {
        let mut list = AttributeList::new();
        list.push(AttributeRecord::new(
            "System.Runtime.CompilerServices.CompilationRelaxationsAttribute",
            Token::new(0x0A00_0002),
            vec![AttributeArgument::I4(8)],
        ));
        list.push(record("1.0.0.0"));
        list.push(AttributeRecord::new(
            "System.Reflection.AssemblyTitleAttribute",
            Token::new(0x0A00_0003),
            vec!["Game".into()],
        ));

        list.replace_or_add(record("2.0.0.0"));

        let types: Vec<_> = list.iter().map(|r| r.attribute_type.as_str()).collect();
        assert_eq!(types[1], FILE_VERSION);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn short_names() {
        assert_eq!(
            record("1").short_name(),
            "System.Reflection.AssemblyFileVersion"
        );
        assert_eq!(attribute_short_name("Attribute"), "Attribute");
        assert_eq!(attribute_short_name("System.Attribute"), "System.Attribute");
        assert_eq!(attribute_short_name("Obsolete"), "Obsolete");
    }

    #[test]
    fn argument_display() {
        assert_eq!(AttributeArgument::Null.to_string(), "");
        assert_eq!(AttributeArgument::I4(-3).to_string(), "-3");
        let array = AttributeArgument::Array(vec![AttributeArgument::Bool(true), "x".into()]);
        assert_eq!(array.to_string(), "[true, x]");
    }
}
