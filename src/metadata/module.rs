//! The editable in-memory representation of one compiled module.
//!
//! [`CompiledModule`] is what the external loader hands to a processing run and what the
//! external writer serializes afterwards. Records live in per-table arenas addressed by
//! [`Token`]s; arenas only grow, so a token handed out once stays valid for the whole run.
//!
//! # Examples
//!
//! ```rust
//! use dotpatch::metadata::{
//!     identity::AssemblyVersion,
//!     method::{MethodAttributes, MethodParameter},
//!     module::CompiledModule,
//! };
//!
//! let mut module = CompiledModule::new("Game", AssemblyVersion::new(1, 4, 0, 0));
//! let player = module.add_type("Game", "Player")?;
//! let update = module.add_method(
//!     player,
//!     "Update",
//!     MethodAttributes::PUBLIC,
//!     vec![MethodParameter::new("delta", "System.Single")],
//!     None,
//! )?;
//!
//! assert_eq!(module.container_name(), "Game.dll");
//! assert_eq!(module.method_full_name(update).as_deref(), Some("Game.Player::Update(System.Single)"));
//! # Ok::<(), dotpatch::Error>(())
//! ```

use std::sync::Arc;

use crate::{
    metadata::{
        customattributes::AttributeList,
        identity::{AssemblyReference, AssemblyVersion},
        method::{
            MemberReference, MethodAttributes, MethodBody, MethodDefinition, MethodParameter,
        },
        symbols::DebugSymbolStore,
        token::{TableId, Token},
        typesystem::TypeDefinition,
    },
    Error, Result,
};

/// Default extension of a module's primary container file.
pub const DEFAULT_CONTAINER_EXTENSION: &str = ".dll";

/// Largest row number a token can address.
const MAX_ROW: usize = 0x00FF_FFFF;

fn next_token(table: TableId, len: usize) -> Result<Token> {
    let row = len + 1;
    if row > MAX_ROW {
        return Err(malformed_error!("{} table is full", table));
    }

    Ok(table.token(row as u32))
}

/// One loaded binary unit: identity, module-level attributes, types, methods, imports,
/// references and optional debug symbols.
#[derive(Debug)]
pub struct CompiledModule {
    name: String,
    version: AssemblyVersion,
    container_name: String,
    attributes: AttributeList,
    types: Vec<TypeDefinition>,
    methods: Vec<MethodDefinition>,
    member_refs: Vec<MemberReference>,
    references: Vec<AssemblyReference>,
    symbols: Option<DebugSymbolStore>,
}

impl CompiledModule {
    /// Create an empty module whose container is `{name}.dll`.
    pub fn new(name: impl Into<String>, version: AssemblyVersion) -> Self {
        let name = name.into();
        let container_name = format!("{name}{DEFAULT_CONTAINER_EXTENSION}");

        CompiledModule {
            name,
            version,
            container_name,
            attributes: AttributeList::new(),
            types: Vec::new(),
            methods: Vec::new(),
            member_refs: Vec::new(),
            references: Vec::new(),
            symbols: None,
        }
    }

    /// Overrides the container file name.
    #[must_use]
    pub fn with_container_name(mut self, container_name: impl Into<String>) -> Self {
        self.container_name = container_name.into();
        self
    }

    /// Logical assembly name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Semantic assembly version.
    #[must_use]
    pub fn version(&self) -> AssemblyVersion {
        self.version
    }

    /// File name of the primary container.
    #[must_use]
    pub fn container_name(&self) -> &str {
        &self.container_name
    }

    /// Sets the logical name and the container file name together and returns the old pair.
    pub fn rename(
        &mut self,
        name: impl Into<String>,
        container_name: impl Into<String>,
    ) -> (String, String) {
        let old_name = std::mem::replace(&mut self.name, name.into());
        let old_container = std::mem::replace(&mut self.container_name, container_name.into());
        (old_name, old_container)
    }

    /// Module-level attribute records.
    #[must_use]
    pub fn attributes(&self) -> &AttributeList {
        &self.attributes
    }

    /// Module-level attribute records, for editing.
    pub fn attributes_mut(&mut self) -> &mut AttributeList {
        &mut self.attributes
    }

    /// Adds a type definition and returns its token.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the type table is full.
    pub fn add_type(
        &mut self,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Token> {
        let token = next_token(TableId::TypeDef, self.types.len())?;
        self.types.push(TypeDefinition {
            token,
            namespace: namespace.into(),
            name: name.into(),
            methods: Vec::new(),
        });
        Ok(token)
    }

    /// Adds a method to the type `declaring_type` and returns the method's token.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidToken`] if `declaring_type` is not a type of this module.
    pub fn add_method(
        &mut self,
        declaring_type: Token,
        name: impl Into<String>,
        flags: MethodAttributes,
        params: Vec<MethodParameter>,
        body: Option<MethodBody>,
    ) -> Result<Token> {
        let type_index = declaring_type
            .index_in(TableId::TypeDef)
            .filter(|index| *index < self.types.len())
            .ok_or(Error::InvalidToken(declaring_type))?;

        let token = next_token(TableId::MethodDef, self.methods.len())?;
        self.methods.push(MethodDefinition {
            token,
            name: name.into(),
            declaring_type,
            flags,
            params,
            body,
        });
        self.types[type_index].methods.push(token);
        Ok(token)
    }

    /// Adds a reference to another assembly, optionally with the loaded module behind it.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the reference table is full.
    pub fn add_reference(
        &mut self,
        name: impl Into<String>,
        version: AssemblyVersion,
        resolved: Option<Arc<CompiledModule>>,
    ) -> Result<Token> {
        let token = next_token(TableId::AssemblyRef, self.references.len())?;
        self.references.push(AssemblyReference {
            token,
            name: name.into(),
            version,
            resolved,
        });
        Ok(token)
    }

    /// Direct assembly references, in declaration order.
    #[must_use]
    pub fn references(&self) -> &[AssemblyReference] {
        &self.references
    }

    /// Attaches a debug-symbol store, replacing any previous one.
    pub fn attach_symbols(&mut self, symbols: DebugSymbolStore) {
        self.symbols = Some(symbols);
    }

    /// The attached debug-symbol store, if debug data was emitted with the module.
    #[must_use]
    pub fn symbols(&self) -> Option<&DebugSymbolStore> {
        self.symbols.as_ref()
    }

    /// All type definitions.
    #[must_use]
    pub fn types(&self) -> &[TypeDefinition] {
        &self.types
    }

    /// Returns the type definition behind `token`.
    #[must_use]
    pub fn type_def(&self, token: Token) -> Option<&TypeDefinition> {
        token
            .index_in(TableId::TypeDef)
            .and_then(|index| self.types.get(index))
    }

    /// Returns the method definition behind `token`.
    #[must_use]
    pub fn method(&self, token: Token) -> Option<&MethodDefinition> {
        token
            .index_in(TableId::MethodDef)
            .and_then(|index| self.methods.get(index))
    }

    /// Returns the imported member reference behind `token`.
    #[must_use]
    pub fn member_ref(&self, token: Token) -> Option<&MemberReference> {
        token
            .index_in(TableId::MemberRef)
            .and_then(|index| self.member_refs.get(index))
    }

    /// Imported member references.
    #[must_use]
    pub fn member_refs(&self) -> &[MemberReference] {
        &self.member_refs
    }

    /// Looks up a type by `Namespace.Name`.
    #[must_use]
    pub fn find_type(&self, full_name: &str) -> Option<&TypeDefinition> {
        self.types.iter().find(|ty| ty.is(full_name))
    }

    /// Returns `true` if this module defines `full_name`.
    #[must_use]
    pub fn defines_type(&self, full_name: &str) -> bool {
        self.find_type(full_name).is_some()
    }

    /// Methods declared by `ty`, in declaration order.
    pub fn methods_of<'a>(
        &'a self,
        ty: &'a TypeDefinition,
    ) -> impl Iterator<Item = &'a MethodDefinition> + 'a {
        ty.methods.iter().filter_map(|token| self.method(*token))
    }

    /// Imports a member defined in `scope`, reusing an identical existing import.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the member reference table is full.
    pub fn import_member(
        &mut self,
        scope: &str,
        declaring_type: &str,
        name: &str,
        parameter_types: Vec<String>,
    ) -> Result<Token> {
        if let Some(existing) = self
            .member_refs
            .iter()
            .find(|member| member.matches(scope, declaring_type, name, &parameter_types))
        {
            return Ok(existing.token);
        }

        let token = next_token(TableId::MemberRef, self.member_refs.len())?;
        self.member_refs.push(MemberReference {
            token,
            scope: scope.to_string(),
            declaring_type: declaring_type.to_string(),
            name: name.to_string(),
            parameter_types,
        });
        Ok(token)
    }

    /// Resolves a method token to a definition in this module.
    ///
    /// `MethodDef` tokens resolve directly. `MemberRef` tokens resolve when they point back
    /// into this module by name and parameter types.
    #[must_use]
    pub fn resolve_method(&self, token: Token) -> Option<&MethodDefinition> {
        match token.kind()? {
            TableId::MethodDef => self.method(token),
            TableId::MemberRef => {
                let member = self.member_ref(token)?;
                if member.scope != self.name {
                    return None;
                }

                let ty = self.find_type(&member.declaring_type)?;
                self.methods_of(ty).find(|method| {
                    method.name == member.name
                        && method.params.len() == member.parameter_types.len()
                        && method
                            .params
                            .iter()
                            .zip(&member.parameter_types)
                            .all(|(param, ty)| &param.type_name == ty)
                })
            }
            _ => None,
        }
    }

    /// Renders a method token as `Namespace.Type::Name(ParamType, ...)`.
    ///
    /// Imported members render with their `[Scope]` prefix.
    #[must_use]
    pub fn method_full_name(&self, token: Token) -> Option<String> {
        match token.kind()? {
            TableId::MethodDef => {
                let method = self.method(token)?;
                let owner = self.type_def(method.declaring_type)?;
                Some(format!("{}::{}", owner.full_name(), method.signature()))
            }
            TableId::MemberRef => self.member_ref(token).map(MemberReference::full_name),
            _ => None,
        }
    }
}
