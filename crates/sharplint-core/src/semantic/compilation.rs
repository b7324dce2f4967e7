//! Solution-wide index of declared types and their members.

use super::model::SemanticModel;
use super::symbol::{Accessibility, Symbol, SymbolDeclaration, SymbolKind};
use super::types::{PredefinedType, Type};
use crate::document::{DocumentId, Solution};
use sharplint_syntax::ast::{self, EnumDeclaration, TypeDeclaration};
use sharplint_syntax::{SyntaxKind, SyntaxNode, TextRange};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Names in effect at a point in a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Scope {
    /// Enclosing namespace, dotted, empty for the global namespace.
    pub namespace: String,
    /// Full names of the enclosing types, outermost first.
    pub types: Vec<String>,
    /// Namespaces imported with `using`.
    pub usings: Vec<String>,
    /// Type parameters of the enclosing types.
    pub type_parameters: Vec<String>,
}

impl Scope {
    /// Scope in effect at `node`. A type declaration is part of its own scope.
    pub(crate) fn of(node: &SyntaxNode) -> Self {
        let mut namespaces = Vec::new();
        let mut type_names = Vec::new();
        let mut usings = Vec::new();
        let mut type_parameters = Vec::new();
        for ancestor in node.ancestors() {
            match ancestor.kind() {
                SyntaxKind::NamespaceDeclaration | SyntaxKind::FileScopedNamespaceDeclaration => {
                    if let Some(name) = ancestor.children().next() {
                        namespaces.push(name_path(&name));
                    }
                    collect_usings(&ancestor, &mut usings);
                }
                SyntaxKind::CompilationUnit => collect_usings(&ancestor, &mut usings),
                kind if kind.is_type_declaration() => {
                    if let Some(name) = declaration_name(&ancestor) {
                        type_names.push(name);
                    }
                    type_parameters.extend(declared_type_parameters(&ancestor));
                }
                _ => {}
            }
        }
        namespaces.reverse();
        type_names.reverse();

        let namespace = namespaces.join(".");
        let mut types = Vec::with_capacity(type_names.len());
        for name in type_names {
            let outer = types.last().map_or(namespace.as_str(), String::as_str);
            types.push(qualify(outer, &name));
        }
        Self {
            namespace,
            types,
            usings,
            type_parameters,
        }
    }
}

fn collect_usings(node: &SyntaxNode, out: &mut Vec<String>) {
    for using in node.children().filter(|n| n.kind() == SyntaxKind::UsingDirective) {
        let is_alias_or_static = using
            .child_tokens()
            .any(|t| matches!(t.kind(), SyntaxKind::Equals | SyntaxKind::StaticKeyword));
        if is_alias_or_static {
            continue;
        }
        if let Some(name) = using.children().last() {
            out.push(name_path(&name));
        }
    }
}

fn declaration_name(node: &SyntaxNode) -> Option<String> {
    let token = match node.kind() {
        SyntaxKind::EnumDeclaration => EnumDeclaration::cast(node.clone())?.identifier(),
        _ => TypeDeclaration::cast(node.clone())?.identifier(),
    }?;
    Some(token.text().to_string())
}

fn declared_type_parameters(node: &SyntaxNode) -> Vec<String> {
    TypeDeclaration::cast(node.clone())
        .map(|decl| {
            decl.type_parameters()
                .iter()
                .map(|t| t.text().to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Dotted name of a name node, ignoring generic arguments.
pub(crate) fn name_path(node: &SyntaxNode) -> String {
    match node.kind() {
        SyntaxKind::QualifiedName => node
            .children()
            .map(|part| name_path(&part))
            .collect::<Vec<_>>()
            .join("."),
        _ => node
            .child_token(SyntaxKind::Identifier)
            .map(|t| t.text().to_string())
            .unwrap_or_default(),
    }
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

/// A type declared in the solution.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    /// Simple name.
    pub name: String,
    /// Fully qualified name.
    pub full_name: String,
    /// Declaration node kind (class, struct, interface or enum).
    pub kind: SyntaxKind,
    /// Declared accessibility.
    pub accessibility: Accessibility,
    /// First declaration of the type.
    pub declaration: SymbolDeclaration,
    /// Type parameter names of a generic type, in declaration order.
    pub type_parameters: Vec<String>,
    /// Resolved base class and interfaces.
    pub base_types: Vec<Type>,
    /// Fields, properties, methods and enum members, in declaration order.
    pub members: Vec<Symbol>,
}

impl TypeInfo {
    /// The type as a [`Type`].
    #[must_use]
    pub fn ty(&self) -> Type {
        Type::Named {
            name: self.full_name.clone(),
            args: Vec::new(),
        }
    }

    /// The type as a [`Symbol`].
    #[must_use]
    pub fn symbol(&self) -> Symbol {
        let container = self
            .full_name
            .rsplit_once('.')
            .map(|(outer, _)| outer.to_string());
        Symbol {
            name: self.name.clone(),
            kind: SymbolKind::Type,
            ty: self.ty(),
            parameters: Vec::new(),
            declaration: Some(self.declaration),
            accessibility: self.accessibility,
            is_static: false,
            container,
        }
    }
}

/// Semantic index over every document of a [`Solution`].
///
/// A compilation is built for one solution snapshot and never updated; after
/// an edit, build a new one.
#[derive(Debug, Clone)]
pub struct Compilation {
    solution: Solution,
    types: Vec<TypeInfo>,
    by_full_name: HashMap<String, usize>,
    by_declaration: HashMap<(DocumentId, TextRange), usize>,
}

struct PendingType {
    index: usize,
    document: DocumentId,
    node: SyntaxNode,
}

impl Compilation {
    /// Indexes all type declarations in `solution`.
    #[must_use]
    pub fn new(solution: &Solution) -> Self {
        let mut compilation = Self {
            solution: solution.clone(),
            types: Vec::new(),
            by_full_name: HashMap::new(),
            by_declaration: HashMap::new(),
        };

        let mut pending = Vec::new();
        for document in solution.documents() {
            for node in document.tree().root().descendants() {
                if node.kind().is_type_declaration() {
                    if let Some(p) = compilation.declare_type(document.id(), node) {
                        pending.push(p);
                    }
                }
            }
        }

        // Members are resolved once every type name is known.
        let resolved: Vec<_> = pending
            .iter()
            .map(|p| {
                (
                    p.index,
                    compilation.resolve_bases(p),
                    compilation.collect_members(p),
                )
            })
            .collect();
        for (index, bases, members) in resolved {
            if let Some(info) = compilation.types.get_mut(index) {
                for base in bases {
                    if !info.base_types.contains(&base) {
                        info.base_types.push(base);
                    }
                }
                info.members.extend(members);
            }
        }

        debug!(
            documents = solution.len(),
            types = compilation.types.len(),
            "built compilation"
        );
        compilation
    }

    fn declare_type(&mut self, document: DocumentId, node: SyntaxNode) -> Option<PendingType> {
        let name = declaration_name(&node)?;
        let outer = node.parent().map(|p| Scope::of(&p)).unwrap_or_default();
        let prefix = outer.types.last().unwrap_or(&outer.namespace).clone();
        let full_name = qualify(&prefix, &name);

        let index = if let Some(&existing) = self.by_full_name.get(&full_name) {
            // Another part of a partial type.
            existing
        } else {
            let default = if outer.types.is_empty() {
                Accessibility::Internal
            } else {
                Accessibility::Private
            };
            self.types.push(TypeInfo {
                name,
                kind: node.kind(),
                accessibility: Accessibility::from_modifiers(&ast::modifiers(&node), default),
                declaration: SymbolDeclaration::of(document, &node),
                full_name: full_name.clone(),
                type_parameters: declared_type_parameters(&node),
                base_types: Vec::new(),
                members: Vec::new(),
            });
            let index = self.types.len() - 1;
            self.by_full_name.insert(full_name, index);
            index
        };
        self.by_declaration
            .insert((document, node.full_range()), index);
        Some(PendingType {
            index,
            document,
            node,
        })
    }

    fn resolve_bases(&self, pending: &PendingType) -> Vec<Type> {
        let scope = Scope::of(&pending.node);
        let bases = match TypeDeclaration::cast(pending.node.clone()) {
            Some(decl) => decl.base_types(),
            None => return Vec::new(),
        };
        bases
            .iter()
            .map(|base| self.resolve_syntax(base, &scope))
            .collect()
    }

    fn collect_members(&self, pending: &PendingType) -> Vec<Symbol> {
        let Some(info) = self.types.get(pending.index) else {
            return Vec::new();
        };
        let scope = Scope::of(&pending.node);
        let container = Some(info.full_name.clone());
        let default_access = if pending.node.kind() == SyntaxKind::InterfaceDeclaration {
            Accessibility::Public
        } else {
            Accessibility::Private
        };
        let mut members = Vec::new();

        for child in pending.node.children() {
            let modifiers = ast::modifiers(&child);
            let accessibility = Accessibility::from_modifiers(&modifiers, default_access);
            let is_static = modifiers
                .iter()
                .any(|t| matches!(t.kind(), SyntaxKind::StaticKeyword | SyntaxKind::ConstKeyword));
            let symbol = |name: String, kind, ty, parameters, node: &SyntaxNode| Symbol {
                name,
                kind,
                ty,
                parameters,
                declaration: Some(SymbolDeclaration::of(pending.document, node)),
                accessibility,
                is_static,
                container: container.clone(),
            };

            match child.kind() {
                SyntaxKind::FieldDeclaration => {
                    let Some(declaration) =
                        ast::FieldDeclaration::cast(child.clone()).and_then(|f| f.declaration())
                    else {
                        continue;
                    };
                    let ty = declaration
                        .ty()
                        .map_or(Type::Unknown, |t| self.resolve_syntax(&t, &scope));
                    for declarator in declaration.declarators() {
                        if let Some(name) = declarator.identifier() {
                            members.push(symbol(
                                name.text().to_string(),
                                SymbolKind::Field,
                                ty.clone(),
                                Vec::new(),
                                declarator.syntax(),
                            ));
                        }
                    }
                }
                SyntaxKind::PropertyDeclaration => {
                    let Some(property) = ast::PropertyDeclaration::cast(child.clone()) else {
                        continue;
                    };
                    let (Some(name), Some(ty)) = (property.identifier(), property.ty()) else {
                        continue;
                    };
                    members.push(symbol(
                        name.text().to_string(),
                        SymbolKind::Property,
                        self.resolve_syntax(&ty, &scope),
                        Vec::new(),
                        &child,
                    ));
                }
                SyntaxKind::MethodDeclaration => {
                    let Some(method) = ast::MethodDeclaration::cast(child.clone()) else {
                        continue;
                    };
                    let Some(name) = method.identifier() else {
                        continue;
                    };
                    let ty = method
                        .return_type()
                        .map_or(Type::Unknown, |t| self.resolve_syntax(&t, &scope));
                    let parameters = method
                        .parameters()
                        .iter()
                        .map(|p| {
                            p.ty()
                                .map_or(Type::Unknown, |t| self.resolve_syntax(&t, &scope))
                        })
                        .collect();
                    members.push(symbol(
                        name.text().to_string(),
                        SymbolKind::Method,
                        ty,
                        parameters,
                        &child,
                    ));
                }
                SyntaxKind::EnumMemberDeclaration => {
                    let Some(name) = child.child_token(SyntaxKind::Identifier) else {
                        continue;
                    };
                    members.push(Symbol {
                        name: name.text().to_string(),
                        kind: SymbolKind::EnumMember,
                        ty: info.ty(),
                        parameters: Vec::new(),
                        declaration: Some(SymbolDeclaration::of(pending.document, &child)),
                        accessibility: Accessibility::Public,
                        is_static: true,
                        container: container.clone(),
                    });
                }
                _ => {}
            }
        }
        members
    }

    /// The solution this compilation was built from.
    #[must_use]
    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    /// Semantic model for one document.
    #[must_use]
    pub fn model(&self, document: DocumentId) -> Option<SemanticModel<'_>> {
        self.solution
            .document(document)
            .map(|doc| SemanticModel::new(self, doc))
    }

    /// All declared types.
    pub fn types(&self) -> impl Iterator<Item = &TypeInfo> {
        self.types.iter()
    }

    /// Looks up a declared type by full name.
    #[must_use]
    pub fn type_info(&self, full_name: &str) -> Option<&TypeInfo> {
        self.by_full_name
            .get(full_name)
            .and_then(|&i| self.types.get(i))
    }

    /// The type declared by the node at `range` in `document`.
    #[must_use]
    pub fn type_declared_at(&self, document: DocumentId, range: TextRange) -> Option<&TypeInfo> {
        self.by_declaration
            .get(&(document, range))
            .and_then(|&i| self.types.get(i))
    }

    /// The member symbol declared by `declaration`.
    #[must_use]
    pub fn member_declared_at(&self, declaration: &SymbolDeclaration) -> Option<&Symbol> {
        self.types
            .iter()
            .flat_map(|t| t.members.iter())
            .find(|m| m.declaration.as_ref() == Some(declaration))
    }

    /// Node declaring `symbol`, in the tree of this compilation's solution.
    #[must_use]
    pub fn declaring_node(&self, symbol: &Symbol) -> Option<SyntaxNode> {
        let declaration = symbol.declaration?;
        let document = self.solution.document(declaration.document)?;
        document
            .tree()
            .root()
            .find_node(declaration.kind, declaration.range)
    }

    /// Members of `ty` followed by inherited members, most derived first.
    ///
    /// Member types are instantiated with the type arguments of `ty`, so a
    /// `T Value` field of `Box<int>` comes back as an `int`. Base types are
    /// instantiated the same way.
    #[must_use]
    pub fn members_of(&self, ty: &Type) -> Vec<Symbol> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = vec![ty.clone()];
        while let Some(current) = queue.pop() {
            let current = match current {
                Type::Nullable(inner) => *inner,
                other => other,
            };
            let Type::Named { name, args } = &current else {
                continue;
            };
            let Some(info) = self.type_info(name) else {
                continue;
            };
            if !seen.insert(info.full_name.as_str()) {
                continue;
            }
            let params = &info.type_parameters;
            out.extend(info.members.iter().map(|member| Symbol {
                ty: member.ty.substitute(params, args),
                parameters: member
                    .parameters
                    .iter()
                    .map(|p| p.substitute(params, args))
                    .collect(),
                ..member.clone()
            }));
            queue.extend(
                info.base_types
                    .iter()
                    .rev()
                    .map(|base| base.substitute(params, args)),
            );
        }
        out
    }

    /// Returns true if `derived` is `base` or inherits from it.
    #[must_use]
    pub fn derives_from(&self, derived: &str, base: &str) -> bool {
        let mut seen = HashSet::new();
        let mut queue = vec![derived.to_string()];
        while let Some(current) = queue.pop() {
            if current == base {
                return true;
            }
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(info) = self.type_info(&current) {
                queue.extend(
                    info.base_types
                        .iter()
                        .filter_map(|b| b.declared_name().map(str::to_string)),
                );
            }
        }
        false
    }

    /// Returns true if `symbol` can be referenced from code inside the
    /// types named in `from` (full names, outermost first).
    #[must_use]
    pub fn is_accessible(&self, symbol: &Symbol, from: &[String]) -> bool {
        let Some(container) = &symbol.container else {
            return true;
        };
        match symbol.accessibility {
            Accessibility::Public | Accessibility::Internal | Accessibility::ProtectedInternal => {
                true
            }
            Accessibility::Private => from.iter().any(|t| t == container),
            Accessibility::Protected | Accessibility::PrivateProtected => from
                .iter()
                .any(|t| t == container || self.derives_from(t, container)),
        }
    }

    /// Resolves type syntax in `scope`.
    pub(crate) fn resolve_syntax(&self, ty: &SyntaxNode, scope: &Scope) -> Type {
        match ty.kind() {
            SyntaxKind::PredefinedType => ty
                .first_token()
                .and_then(|t| PredefinedType::from_keyword(t.kind()))
                .map_or(Type::Unknown, Type::Predefined),
            SyntaxKind::IdentifierName => self.resolve_name(&name_path(ty), Vec::new(), scope),
            SyntaxKind::GenericName => {
                let args = self.type_arguments(ty, scope);
                self.resolve_name(&name_path(ty), args, scope)
            }
            SyntaxKind::QualifiedName => {
                let args = ty
                    .children()
                    .last()
                    .map(|right| self.type_arguments(&right, scope))
                    .unwrap_or_default();
                self.resolve_name(&name_path(ty), args, scope)
            }
            SyntaxKind::ArrayType => {
                let mut parts = ty.children();
                let element = parts
                    .next()
                    .map_or(Type::Unknown, |e| self.resolve_syntax(&e, scope));
                let rank = parts.next().map_or(1, |spec| {
                    spec.child_tokens()
                        .filter(|t| t.kind() == SyntaxKind::Comma)
                        .count()
                        + 1
                });
                Type::Array {
                    element: Box::new(element),
                    rank,
                }
            }
            SyntaxKind::NullableType => {
                let inner = ty
                    .children()
                    .next()
                    .map_or(Type::Unknown, |e| self.resolve_syntax(&e, scope));
                Type::Nullable(Box::new(inner))
            }
            _ => Type::Unknown,
        }
    }

    fn type_arguments(&self, name: &SyntaxNode, scope: &Scope) -> Vec<Type> {
        name.children()
            .find(|n| n.kind() == SyntaxKind::TypeArgumentList)
            .map(|list| {
                list.children()
                    .map(|arg| self.resolve_syntax(&arg, scope))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Resolves a dotted name written in `scope`.
    pub(crate) fn resolve_name(&self, path: &str, args: Vec<Type>, scope: &Scope) -> Type {
        if args.is_empty() && scope.type_parameters.iter().any(|p| p == path) {
            return Type::Parameter(path.to_string());
        }
        if let Some(full_name) = self.find_type(path, scope) {
            return Type::Named {
                name: full_name,
                args,
            };
        }
        if args.is_empty() {
            if let Some(predefined) = PredefinedType::from_framework_name(path) {
                return Type::Predefined(predefined);
            }
        }
        Type::Unresolved {
            name: path.to_string(),
            args,
        }
    }

    /// Spells `ty` so that it denotes the same type when written in `scope`.
    ///
    /// Declared types get the shortest trailing part of their full name that
    /// still resolves to them. Returns `None` for types that cannot be
    /// written, such as a type parameter out of scope.
    pub(crate) fn type_name_in(&self, ty: &Type, scope: &Scope) -> Option<String> {
        let with_args = |name: String, args: &[Type]| -> Option<String> {
            if args.is_empty() {
                return Some(name);
            }
            let args = args
                .iter()
                .map(|a| self.type_name_in(a, scope))
                .collect::<Option<Vec<_>>>()?;
            Some(format!("{name}<{}>", args.join(", ")))
        };
        match ty {
            Type::Predefined(p) => Some(p.keyword().to_string()),
            Type::Named { name, args } => {
                let parts: Vec<&str> = name.split('.').collect();
                let shortest = (0..parts.len())
                    .rev()
                    .map(|i| parts[i..].join("."))
                    .find(|candidate| {
                        self.find_type(candidate, scope).as_deref() == Some(name.as_str())
                    })
                    .unwrap_or_else(|| name.clone());
                with_args(shortest, args)
            }
            Type::Unresolved { name, args } => with_args(name.clone(), args),
            Type::Array { element, rank } => Some(format!(
                "{}[{}]",
                self.type_name_in(element, scope)?,
                ",".repeat(rank.saturating_sub(1))
            )),
            Type::Nullable(inner) => Some(format!("{}?", self.type_name_in(inner, scope)?)),
            Type::Parameter(name) => scope
                .type_parameters
                .contains(name)
                .then(|| name.clone()),
            Type::Null | Type::Unknown => None,
        }
    }

    /// Finds the full name a dotted type name refers to from `scope`.
    pub(crate) fn find_type(&self, path: &str, scope: &Scope) -> Option<String> {
        let known = |candidate: String| self.by_full_name.contains_key(&candidate).then_some(candidate);

        for outer in scope.types.iter().rev() {
            if let Some(found) = known(qualify(outer, path)) {
                return Some(found);
            }
        }
        let mut namespace = scope.namespace.as_str();
        loop {
            if let Some(found) = known(qualify(namespace, path)) {
                return Some(found);
            }
            if namespace.is_empty() {
                break;
            }
            namespace = namespace.rsplit_once('.').map_or("", |(head, _)| head);
        }
        scope
            .usings
            .iter()
            .find_map(|using| known(qualify(using, path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(sources: &[&str]) -> Compilation {
        let mut solution = Solution::new();
        for (i, source) in sources.iter().enumerate() {
            solution
                .add_source(format!("f{i}.cs"), source)
                .expect("parses");
        }
        Compilation::new(&solution)
    }

    #[test]
    fn indexes_nested_and_namespaced_types() {
        let c = compile(&["namespace A.B { class Outer { class Inner { } } enum E { X } }"]);
        assert!(c.type_info("A.B.Outer").is_some());
        assert!(c.type_info("A.B.Outer.Inner").is_some());
        let e = c.type_info("A.B.E").expect("enum");
        assert_eq!(e.members.len(), 1);
        assert_eq!(e.members[0].kind, SymbolKind::EnumMember);
    }

    #[test]
    fn resolves_across_documents_through_usings() {
        let c = compile(&[
            "namespace Models { public class Point { public int X; public Int32 Y { get; set; } } }",
            "using Models; namespace App { class Use { Point p; } }",
        ]);
        let use_type = c.type_info("App.Use").expect("Use");
        assert_eq!(
            use_type.members[0].ty,
            Type::Named {
                name: "Models.Point".into(),
                args: vec![]
            }
        );
        let point = c.type_info("Models.Point").expect("Point");
        assert_eq!(point.members[0].ty, point.members[1].ty);
    }

    #[test]
    fn inherited_members_follow_own_members() {
        let c = compile(&[
            "class Base { protected int A; } class Derived : Base { int B; }",
        ]);
        let derived = c.type_info("Derived").expect("Derived").ty();
        let members = c.members_of(&derived);
        let names: Vec<_> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert!(c.derives_from("Derived", "Base"));
    }

    #[test]
    fn members_of_generic_types_are_instantiated() {
        let c = compile(&[
            "class Box<T> { public T Value; public T[] History; } class IntBox : Box<int> { public Box<string> Label; }",
        ]);
        let boxed = c.type_info("Box").expect("Box");
        assert_eq!(boxed.type_parameters, vec!["T"]);
        assert_eq!(boxed.members[0].ty, Type::Parameter("T".into()));

        let members = c.members_of(&c.type_info("IntBox").expect("IntBox").ty());
        let shown: Vec<_> = members
            .iter()
            .map(|m| format!("{} {}", m.ty, m.name))
            .collect();
        insta::assert_snapshot!(shown.join("\n"), @r"
        Box<string> Label
        int Value
        int[] History
        ");
    }

    #[test]
    fn type_names_qualify_only_when_needed() {
        let c = compile(&[
            "namespace A { public class Inner { } public class P { } }",
            "namespace B { class Inner { } class Use { } }",
        ]);
        let inner = c.type_info("A.Inner").expect("Inner").ty();
        let in_a = Scope {
            namespace: "A".into(),
            ..Scope::default()
        };
        let in_b = Scope {
            namespace: "B".into(),
            types: vec!["B.Use".into()],
            ..Scope::default()
        };
        assert_eq!(c.type_name_in(&inner, &in_a).as_deref(), Some("Inner"));
        assert_eq!(c.type_name_in(&inner, &in_b).as_deref(), Some("A.Inner"));
        let list = Type::Array {
            element: Box::new(Type::Nullable(Box::new(Type::Predefined(PredefinedType::Int)))),
            rank: 2,
        };
        assert_eq!(c.type_name_in(&list, &in_b).as_deref(), Some("int?[,]"));
        assert_eq!(c.type_name_in(&Type::Parameter("T".into()), &in_b), None);
    }

    #[test]
    fn accessibility_checks() {
        let c = compile(&[
            "class Base { private int Hidden; protected int Shared; } class Derived : Base { } class Other { }",
        ]);
        let base = c.type_info("Base").expect("Base");
        let hidden = &base.members[0];
        let shared = &base.members[1];
        assert!(c.is_accessible(hidden, &["Base".into()]));
        assert!(!c.is_accessible(hidden, &["Derived".into()]));
        assert!(c.is_accessible(shared, &["Derived".into()]));
        assert!(!c.is_accessible(shared, &["Other".into()]));
    }

    #[test]
    fn unknown_names_stay_unresolved() {
        let c = compile(&["class C { List<int> items; }"]);
        let c_type = c.type_info("C").expect("C");
        assert_eq!(
            c_type.members[0].ty,
            Type::Unresolved {
                name: "List".into(),
                args: vec![Type::Predefined(PredefinedType::Int)]
            }
        );
    }
}
