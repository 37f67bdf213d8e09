//! Maps instruction positions back to source locations.
//!
//! Resolution never fails: a missing store, an unknown method or a corrupt symbol blob all
//! come back as `None`, and only the precision of a diagnostic suffers.

use crate::metadata::{
    module::CompiledModule,
    sequencepoints::SourceLocation,
    symbols::{DebugSymbolStore, MethodDebugInformation},
    token::Token,
};

/// Finds the best available [`SourceLocation`] for an instruction of a method.
///
/// # Examples
///
/// ```rust
/// use dotpatch::metadata::{
///     identity::AssemblyVersion, module::CompiledModule, resolver::SourceLocationResolver,
///     token::TableId,
/// };
///
/// let module = CompiledModule::new("Game", AssemblyVersion::UNKNOWN);
/// let resolver = SourceLocationResolver::new(&module);
/// assert!(resolver.resolve(TableId::MethodDef.token(1), Some(0), true).is_none());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SourceLocationResolver<'a> {
    module: &'a CompiledModule,
}

impl<'a> SourceLocationResolver<'a> {
    /// Create a resolver over `module` and its attached symbols.
    #[must_use]
    pub fn new(module: &'a CompiledModule) -> Self {
        SourceLocationResolver { module }
    }

    /// Resolves `position` (an IL offset) inside `method`.
    ///
    /// An exact sequence point at `position` wins. Otherwise, with `allow_nearest`, the
    /// method body is scanned in order up to and including `position` (the whole body when
    /// `position` is `None`) and the location of the last instruction that has one is
    /// returned.
    #[must_use]
    pub fn resolve(
        &self,
        method: Token,
        position: Option<u32>,
        allow_nearest: bool,
    ) -> Option<SourceLocation> {
        let store = self.module.symbols()?;
        let definition = self.module.resolve_method(method)?;
        let info = Self::try_read(store, definition.token)?;

        if let Some(location) = position.and_then(|offset| info.location_at(offset)) {
            return Some(location);
        }

        if !allow_nearest {
            return None;
        }

        let body = definition.body.as_ref()?;
        let mut nearest = None;
        for instruction in &body.instructions {
            if position.is_some_and(|offset| instruction.offset > offset) {
                break;
            }

            if let Some(point) = info.points.find_visible(instruction.offset) {
                nearest = Some(point);
            }
        }

        nearest.map(|point| point.to_location(&info.document))
    }

    fn try_read(store: &DebugSymbolStore, method: Token) -> Option<MethodDebugInformation> {
        match store.read_method(method) {
            Ok(info) => info,
            Err(error) => {
                log::debug!("Ignoring debug information of method {method}: {error}");
                None
            }
        }
    }
}
