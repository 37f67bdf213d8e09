//! Per-module edit state shared by processors.
//!
//! [`ModuleEditContext`] pairs the module being edited with its diagnostic reporter and
//! resolves types and constructors across the libraries the module references.

use std::{collections::HashSet, io::Write, sync::Arc};

use crate::{
    diagnostics::{Diagnostic, DiagnosticReporter, PatchReport},
    metadata::{
        method::CONSTRUCTOR_NAME,
        module::CompiledModule,
        token::Token,
        typesystem::{TypeDefinition, ROOT_OBJECT_TYPE},
    },
    Error, Result,
};

/// A type found in one of the loaded libraries a module references.
#[derive(Debug, Clone)]
pub struct ResolvedType {
    /// The library defining the type
    pub library: Arc<CompiledModule>,
    /// Token of the type inside `library`
    pub token: Token,
}

impl ResolvedType {
    /// The type definition inside its library.
    #[must_use]
    pub fn definition(&self) -> Option<&TypeDefinition> {
        self.library.type_def(self.token)
    }
}

/// One module plus the diagnostic sink of its processing run.
///
/// Every processor receives the same context in turn. Resolution helpers only read; the
/// only side effect of [`ModuleEditContext::import_constructor`] is appending a member
/// reference to the edited module.
#[derive(Debug)]
pub struct ModuleEditContext<'a> {
    module: &'a mut CompiledModule,
    reporter: DiagnosticReporter<'a>,
}

impl<'a> ModuleEditContext<'a> {
    /// Create a context editing `module` and reporting to `sink`.
    pub fn new(module: &'a mut CompiledModule, sink: &'a mut dyn Write) -> Self {
        ModuleEditContext {
            module,
            reporter: DiagnosticReporter::new(sink),
        }
    }

    /// The edited module.
    #[must_use]
    pub fn module(&self) -> &CompiledModule {
        &*self.module
    }

    /// The edited module, for mutation.
    pub fn module_mut(&mut self) -> &mut CompiledModule {
        &mut *self.module
    }

    /// Writes a diagnostic to the run's sink.
    pub fn report(&mut self, diagnostic: &Diagnostic) {
        self.reporter.report(diagnostic);
    }

    /// Reports that a processor patched a method of the edited module.
    pub fn patched(&mut self, report: &PatchReport) {
        self.reporter.patched(&*self.module, report);
    }

    /// Number of diagnostics written during this run.
    #[must_use]
    pub fn diagnostics_emitted(&self) -> usize {
        self.reporter.emitted()
    }

    /// Finds the directly referenced library that defines the root object type.
    ///
    /// # Errors
    /// Returns [`Error::MissingFoundationLibrary`] if no loaded direct reference defines it.
    pub fn resolve_foundation_library(&self) -> Result<Arc<CompiledModule>> {
        self.module
            .references()
            .iter()
            .filter_map(|reference| reference.module())
            .find(|library| library.defines_type(ROOT_OBJECT_TYPE))
            .cloned()
            .ok_or_else(|| Error::MissingFoundationLibrary(self.module.name().to_string()))
    }

    /// Resolves `full_name` in the transitive closure of loaded references.
    ///
    /// The foundation library is searched first, then the remaining references breadth-first
    /// in declaration order.
    ///
    /// # Errors
    /// Returns [`Error::MissingFoundationLibrary`] if there is no foundation library and
    /// [`Error::TypeNotFound`] if no loaded library defines the type.
    pub fn resolve_type(&self, full_name: &str) -> Result<ResolvedType> {
        let foundation = self.resolve_foundation_library()?;
        if let Some(ty) = foundation.find_type(full_name) {
            return Ok(ResolvedType {
                token: ty.token,
                library: foundation,
            });
        }

        let mut visited = HashSet::new();
        visited.insert(self.module.name().to_string());
        visited.insert(foundation.name().to_string());
        let mut queue: Vec<Arc<CompiledModule>> = self
            .module
            .references()
            .iter()
            .filter_map(|reference| reference.module().cloned())
            .collect();
        queue.extend(
            foundation
                .references()
                .iter()
                .filter_map(|reference| reference.module().cloned()),
        );

        let mut index = 0;
        while let Some(library) = queue.get(index).cloned() {
            index += 1;
            if !visited.insert(library.name().to_string()) {
                continue;
            }

            if let Some(ty) = library.find_type(full_name) {
                return Ok(ResolvedType {
                    token: ty.token,
                    library,
                });
            }

            queue.extend(
                library
                    .references()
                    .iter()
                    .filter_map(|reference| reference.module().cloned()),
            );
        }

        Err(Error::TypeNotFound(full_name.to_string()))
    }

    /// Imports the constructor of `type_name` with exactly `parameter_count` parameters from
    /// the foundation library and returns the member reference token.
    ///
    /// An identical earlier import is reused.
    ///
    /// # Errors
    /// Returns [`Error::MissingFoundationLibrary`], [`Error::TypeNotFound`] if the foundation
    /// library does not define the type, or [`Error::ConstructorNotFound`] if no instance
    /// constructor has that many parameters.
    pub fn import_constructor(&mut self, type_name: &str, parameter_count: usize) -> Result<Token> {
        let library = self.resolve_foundation_library()?;
        let ty = library
            .find_type(type_name)
            .ok_or_else(|| Error::TypeNotFound(type_name.to_string()))?;
        let constructor = library
            .methods_of(ty)
            .find(|method| method.is_constructor() && method.params.len() == parameter_count)
            .ok_or_else(|| Error::ConstructorNotFound {
                type_name: type_name.to_string(),
                parameter_count,
            })?;

        let parameter_types = constructor
            .params
            .iter()
            .map(|param| param.type_name.clone())
            .collect();

        self.module.import_member(
            library.name(),
            &ty.full_name(),
            CONSTRUCTOR_NAME,
            parameter_types,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        diagnostics::Severity,
        metadata::{identity::AssemblyVersion, token::TableId},
        test::{
            factories::{foundation_library, game_module, isolated_module, FOUNDATION_NAME},
            lines,
        },
    };

    #[test]
    fn foundation_library_skips_facades_and_unresolved() {
        let mut module = game_module("Game", AssemblyVersion::new(1, 0, 0, 0));
        let mut sink = Vec::new();
        let context = ModuleEditContext::new(&mut module, &mut sink);

        let library = context.resolve_foundation_library().unwrap();
        assert_eq!(library.name(), FOUNDATION_NAME);
    }

    #[test]
    fn missing_foundation_library() {
        let mut module = isolated_module("Lonely");
        let mut sink = Vec::new();
        let mut context = ModuleEditContext::new(&mut module, &mut sink);

        let error = context.resolve_foundation_library().unwrap_err();
        assert!(matches!(&error, Error::MissingFoundationLibrary(name) if name == "Lonely"));
        assert!(error.is_fatal_precondition());
        let import = context.import_constructor("System.ObsoleteAttribute", 0);
        assert!(import.is_err());
        assert!(context.module().member_refs().is_empty());
    }

    #[test]
    fn import_constructor_by_parameter_count() {
        let mut module = game_module("Game", AssemblyVersion::new(1, 0, 0, 0));
        let mut sink = Vec::new();
        let mut context = ModuleEditContext::new(&mut module, &mut sink);
        let obsolete = "System.ObsoleteAttribute";

        let two = context.import_constructor(obsolete, 2).unwrap();
        let one = context.import_constructor(obsolete, 1).unwrap();
        let again = context.import_constructor(obsolete, 1).unwrap();

        assert_eq!(two, TableId::MemberRef.token(1));
        assert_eq!(one, again);
        let module = context.module();
        assert_eq!(module.member_refs().len(), 2);
        let expected = concat!(
            "[System.Private.CoreLib]System.ObsoleteAttribute",
            "::.ctor(System.String, System.Boolean)"
        );
        assert_eq!(module.method_full_name(two).as_deref(), Some(expected));
    }

    #[test]
    fn import_constructor_failures() {
        let mut module = game_module("Game", AssemblyVersion::new(1, 0, 0, 0));
        let mut sink = Vec::new();
        let mut context = ModuleEditContext::new(&mut module, &mut sink);

        // the three-parameter .ctor in the fixture is static
        assert!(matches!(
            context.import_constructor("System.ObsoleteAttribute", 3),
            Err(Error::ConstructorNotFound { parameter_count, .. }) if parameter_count == 3
        ));
        assert!(matches!(
            context.import_constructor("System.Missing", 0),
            Err(Error::TypeNotFound(name)) if name == "System.Missing"
        ));
        assert!(context.module().member_refs().is_empty());
    }

    #[test]
    fn resolve_type_transitively() {
        let version = AssemblyVersion::new(2, 0, 0, 0);
        let mut plugin_dependency = CompiledModule::new("Plugin.Core", version);
        plugin_dependency.add_type("Plugin", "Widget").unwrap();

        let mut plugin = CompiledModule::new("Plugin", version);
        plugin
            .add_reference("Plugin.Core", version, Some(Arc::new(plugin_dependency)))
            .unwrap();

        let mut module = game_module("Game", AssemblyVersion::new(1, 0, 0, 0));
        module
            .add_reference("Plugin", version, Some(Arc::new(plugin)))
            .unwrap();

        let mut sink = Vec::new();
        let context = ModuleEditContext::new(&mut module, &mut sink);

        let object = context.resolve_type("System.Object").unwrap();
        assert_eq!(object.library.name(), FOUNDATION_NAME);

        let widget = context.resolve_type("Plugin.Widget").unwrap();
        assert_eq!(widget.library.name(), "Plugin.Core");
        assert_eq!(widget.definition().unwrap().full_name(), "Plugin.Widget");

        assert!(matches!(
            context.resolve_type("Plugin.Gadget"),
            Err(Error::TypeNotFound(_))
        ));
    }

    #[test]
    fn reports_go_to_sink() {
        let mut module = CompiledModule::new("Game", AssemblyVersion::UNKNOWN);
        let runtime = AssemblyVersion::new(8, 0, 0, 0);
        module
            .add_reference(FOUNDATION_NAME, runtime, Some(foundation_library()))
            .unwrap();
        let mut sink = Vec::new();
        {
            let mut context = ModuleEditContext::new(&mut module, &mut sink);
            context.report(&Diagnostic::new(Severity::Error, "broken"));
            context.module_mut().rename("Other", "Other.dll");
            assert_eq!(context.diagnostics_emitted(), 1);
        }

        assert_eq!(module.name(), "Other");
        assert_eq!(lines(&sink), ["error STRIDE000: broken."]);
    }
}
