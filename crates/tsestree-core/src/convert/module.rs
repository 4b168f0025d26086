use swc_ecma_ast::{
    Decl, DefaultDecl, ExportSpecifier, ImportSpecifier, ModuleDecl, ModuleExportName, ObjectLit,
    Prop, PropName, PropOrSpread, Str, TsImportEqualsDecl, TsModuleRef,
};

use super::{Converter, Ctx};
use crate::ast::{AstNodeType, Node};
use crate::error::TsResult;
use crate::location::Range;
use crate::modifiers::after_export_keywords;
use crate::native::NativeKind;

fn import_kind(type_only: bool) -> &'static str {
    if type_only { "type" } else { "value" }
}

impl Converter<'_, '_> {
    pub(crate) fn convert_module_decl(&mut self, decl: &ModuleDecl, ctx: Ctx) -> TsResult<Node> {
        match decl {
            ModuleDecl::Import(import) => {
                let source = self.convert_str(&import.src);
                let specifiers = import
                    .specifiers
                    .iter()
                    .map(|specifier| self.convert_import_specifier(specifier))
                    .collect::<Vec<_>>();
                let attributes = self.convert_import_attributes(import.with.as_deref())?;
                Ok(self
                    .node(NativeKind::ImportDecl, import.span, AstNodeType::ImportDeclaration)
                    .with("attributes", attributes)
                    .with("importKind", import_kind(import.type_only))
                    .with("source", source)
                    .with("specifiers", specifiers))
            }
            ModuleDecl::ExportDecl(export) => {
                let range = self.range(export.span);
                let inner_start = after_export_keywords(self.text(), range.0, &[]);
                let declaration = self.convert_decl(&export.decl, ctx, Some(inner_start))?;
                let kind = match &export.decl {
                    Decl::TsInterface(_) | Decl::TsTypeAlias(_) => "type",
                    _ => "value",
                };
                Ok(self
                    .node_at(NativeKind::ExportDecl, range, AstNodeType::ExportNamedDeclaration)
                    .with("attributes", Vec::<Node>::new())
                    .with("declaration", declaration)
                    .with("exportKind", kind)
                    .with("source", None::<Node>)
                    .with("specifiers", Vec::<Node>::new()))
            }
            ModuleDecl::ExportNamed(export) => {
                let source = export.src.as_deref().map(|s| self.convert_str(s));
                let attributes = self.convert_import_attributes(export.with.as_deref())?;
                if let [ExportSpecifier::Namespace(namespace)] = export.specifiers.as_slice() {
                    let exported = self.convert_module_export_name(&namespace.name);
                    return Ok(self
                        .node(NativeKind::NamedExport, export.span, AstNodeType::ExportAllDeclaration)
                        .with("attributes", attributes)
                        .with("exported", exported)
                        .with("exportKind", import_kind(export.type_only))
                        .with("source", source));
                }
                let specifiers = export
                    .specifiers
                    .iter()
                    .map(|specifier| self.convert_export_specifier(specifier))
                    .collect::<TsResult<Vec<_>>>()?;
                Ok(self
                    .node(NativeKind::NamedExport, export.span, AstNodeType::ExportNamedDeclaration)
                    .with("attributes", attributes)
                    .with("declaration", None::<Node>)
                    .with("exportKind", import_kind(export.type_only))
                    .with("source", source)
                    .with("specifiers", specifiers))
            }
            ModuleDecl::ExportDefaultDecl(export) => {
                let range = self.range(export.span);
                let inner_start = after_export_keywords(self.text(), range.0, &[]);
                let inner_range = Range(inner_start, range.1);
                let declaration = match &export.decl {
                    DefaultDecl::Class(class) => self.convert_class(
                        &class.class,
                        class.ident.as_ref(),
                        true,
                        ctx,
                        inner_range,
                    )?,
                    DefaultDecl::Fn(function) => self.convert_function_declaration(
                        &function.function,
                        function.ident.as_ref(),
                        false,
                        ctx,
                        inner_range,
                    )?,
                    DefaultDecl::TsInterfaceDecl(interface) => {
                        self.convert_interface(interface, ctx, Some(inner_start))?
                    }
                };
                Ok(self
                    .node_at(NativeKind::ExportDefaultDecl, range, AstNodeType::ExportDefaultDeclaration)
                    .with("declaration", declaration)
                    .with("exportKind", "value"))
            }
            ModuleDecl::ExportDefaultExpr(export) => {
                let declaration = self.convert_expr(&export.expr, ctx)?;
                Ok(self
                    .node(NativeKind::ExportDefaultExpr, export.span, AstNodeType::ExportDefaultDeclaration)
                    .with("declaration", declaration)
                    .with("exportKind", "value"))
            }
            ModuleDecl::ExportAll(export) => {
                let source = self.convert_str(&export.src);
                let attributes = self.convert_import_attributes(export.with.as_deref())?;
                Ok(self
                    .node(NativeKind::ExportAll, export.span, AstNodeType::ExportAllDeclaration)
                    .with("attributes", attributes)
                    .with("exported", None::<Node>)
                    .with("exportKind", import_kind(export.type_only))
                    .with("source", source))
            }
            ModuleDecl::TsImportEquals(decl) => self.convert_import_equals(decl),
            ModuleDecl::TsExportAssignment(assignment) => {
                let expression = self.convert_expr(&assignment.expr, ctx)?;
                Ok(self
                    .node(NativeKind::TsExportAssignment, assignment.span, AstNodeType::TSExportAssignment)
                    .with("expression", expression))
            }
            ModuleDecl::TsNamespaceExport(decl) => {
                let id = self.convert_ident(&decl.id);
                Ok(self
                    .node(
                        NativeKind::TsNamespaceExportDecl,
                        decl.span,
                        AstNodeType::TSNamespaceExportDeclaration,
                    )
                    .with("id", id))
            }
        }
    }

    fn convert_import_specifier(&mut self, specifier: &ImportSpecifier) -> Node {
        match specifier {
            ImportSpecifier::Named(named) => {
                let local = self.convert_ident(&named.local);
                let imported = match &named.imported {
                    Some(name) => self.convert_module_export_name(name),
                    None => self.convert_ident(&named.local),
                };
                self.node(NativeKind::ImportNamedSpecifier, named.span, AstNodeType::ImportSpecifier)
                    .with("imported", imported)
                    .with("importKind", import_kind(named.is_type_only))
                    .with("local", local)
            }
            ImportSpecifier::Default(default) => {
                let local = self.convert_ident(&default.local);
                self.node(
                    NativeKind::ImportDefaultSpecifier,
                    default.span,
                    AstNodeType::ImportDefaultSpecifier,
                )
                .with("local", local)
            }
            ImportSpecifier::Namespace(namespace) => {
                let local = self.convert_ident(&namespace.local);
                self.node(
                    NativeKind::ImportStarAsSpecifier,
                    namespace.span,
                    AstNodeType::ImportNamespaceSpecifier,
                )
                .with("local", local)
            }
        }
    }

    fn convert_export_specifier(&mut self, specifier: &ExportSpecifier) -> TsResult<Node> {
        match specifier {
            ExportSpecifier::Named(named) => {
                let local = self.convert_module_export_name(&named.orig);
                let exported = match &named.exported {
                    Some(name) => self.convert_module_export_name(name),
                    None => self.convert_module_export_name(&named.orig),
                };
                Ok(self
                    .node(NativeKind::ExportNamedSpecifier, named.span, AstNodeType::ExportSpecifier)
                    .with("exported", exported)
                    .with("exportKind", import_kind(named.is_type_only))
                    .with("local", local))
            }
            ExportSpecifier::Namespace(namespace) => {
                let name = self.convert_module_export_name(&namespace.name);
                let range = self.range(namespace.span);
                self.deep_copy(NativeKind::ExportNamespaceSpecifier, range, vec![("name", name.into())])
            }
            ExportSpecifier::Default(default) => {
                let exported = self.convert_ident(&default.exported);
                let range = exported.range;
                self.deep_copy(NativeKind::ExportDefaultSpecifier, range, vec![("exported", exported.into())])
            }
        }
    }

    pub(crate) fn convert_module_export_name(&mut self, name: &ModuleExportName) -> Node {
        match name {
            ModuleExportName::Ident(ident) => self.convert_ident(ident),
            ModuleExportName::Str(s) => self.convert_str(s),
        }
    }

    /// `with { type: "json" }` entries.
    fn convert_import_attributes(&mut self, with: Option<&ObjectLit>) -> TsResult<Vec<Node>> {
        let Some(with) = with else {
            return Ok(Vec::new());
        };
        let mut attributes = Vec::with_capacity(with.props.len());
        for prop in &with.props {
            let PropOrSpread::Prop(prop) = prop else {
                continue;
            };
            let Prop::KeyValue(kv) = prop.as_ref() else {
                continue;
            };
            let key = match &kv.key {
                PropName::Str(s) => self.convert_str(s),
                other => self.convert_prop_name(other, Ctx::root())?,
            };
            let value = self.convert_expr(&kv.value, Ctx::root())?;
            let range = Range(key.range.0, value.range.1);
            attributes.push(
                self.node_at(NativeKind::ImportAttribute, range, AstNodeType::ImportAttribute)
                    .with("key", key)
                    .with("value", value),
            );
        }
        Ok(attributes)
    }

    fn convert_import_equals(&mut self, decl: &TsImportEqualsDecl) -> TsResult<Node> {
        let outer = self.range(decl.span);
        let inner_range = if decl.is_export {
            Range(after_export_keywords(self.text(), outer.0, &[]), outer.1)
        } else {
            outer
        };
        let id = self.convert_ident(&decl.id);
        let module_reference = match &decl.module_ref {
            TsModuleRef::TsEntityName(name) => self.convert_entity_name(name),
            TsModuleRef::TsExternalModuleRef(external) => {
                let expression = self.convert_str(&external.expr);
                self.node(
                    NativeKind::TsExternalModuleRef,
                    external.span,
                    AstNodeType::TSExternalModuleReference,
                )
                .with("expression", expression)
            }
        };
        let declaration = self
            .node_at(NativeKind::TsImportEqualsDecl, inner_range, AstNodeType::TSImportEqualsDeclaration)
            .with("id", id)
            .with("importKind", import_kind(decl.is_type_only))
            .with("moduleReference", module_reference);
        if !decl.is_export {
            return Ok(declaration);
        }
        Ok(self
            .node_at(NativeKind::TsImportEqualsDecl, outer, AstNodeType::ExportNamedDeclaration)
            .with("attributes", Vec::<Node>::new())
            .with("declaration", declaration)
            .with("exportKind", "value")
            .with("source", None::<Node>)
            .with("specifiers", Vec::<Node>::new()))
    }

    /// String literal, with the value decoded from its raw text.
    pub(crate) fn convert_str(&mut self, s: &Str) -> Node {
        let range = self.range(s.span);
        let raw = self.slice(range);
        self.node_at(NativeKind::Str, range, AstNodeType::Literal)
            .with("raw", raw)
            .with("value", super::text::string_value(raw))
    }
}
