//! Per-document semantic queries.

use super::compilation::{name_path, Compilation, Scope};
use super::symbol::{Accessibility, Symbol, SymbolDeclaration, SymbolKind};
use super::types::{binary_numeric_promotion, unary_numeric_promotion, PredefinedType, Type};
use crate::document::Document;
use sharplint_syntax::ast::{self, ForEachStatement, InvocationExpression, VariableDeclaration};
use sharplint_syntax::{SyntaxKind, SyntaxNode, SyntaxToken, TreeVersion};
use std::collections::HashSet;

/// Semantic view of one document within a [`Compilation`].
///
/// Queries are answered against the tree the compilation was built from;
/// nodes passed in must come from [`SemanticModel::root`].
#[derive(Debug, Clone)]
pub struct SemanticModel<'a> {
    compilation: &'a Compilation,
    document: &'a Document,
}

/// What an expression denotes.
#[derive(Debug, Clone)]
enum Binding {
    Value(Type),
    Type(Type),
    Namespace(String),
    Unknown,
}

/// A local or parameter in scope, typed on demand.
#[derive(Debug, Clone)]
struct LocalDecl {
    name: String,
    kind: SymbolKind,
    node: SyntaxNode,
    ty: LocalType,
}

#[derive(Debug, Clone)]
enum LocalType {
    Declared(SyntaxNode),
    Inferred(Option<SyntaxNode>),
    IterationOf(Option<SyntaxNode>),
    Known(Type),
}

impl<'a> SemanticModel<'a> {
    pub(crate) fn new(compilation: &'a Compilation, document: &'a Document) -> Self {
        Self {
            compilation,
            document,
        }
    }

    /// The compilation this model belongs to.
    #[must_use]
    pub fn compilation(&self) -> &'a Compilation {
        self.compilation
    }

    /// The analyzed document.
    #[must_use]
    pub fn document(&self) -> &'a Document {
        self.document
    }

    /// Root of the analyzed tree.
    #[must_use]
    pub fn root(&self) -> SyntaxNode {
        self.document.tree().root()
    }

    /// Tree version the model answers for.
    #[must_use]
    pub fn version(&self) -> TreeVersion {
        self.document.version()
    }

    /// Type of an expression, or [`Type::Unknown`].
    #[must_use]
    pub fn type_of_expression(&self, expr: &SyntaxNode) -> Type {
        match self.bind(expr) {
            Binding::Value(ty) => ty,
            _ => Type::Unknown,
        }
    }

    /// Resolves type syntax such as `List<int>` or `Person`.
    #[must_use]
    pub fn resolve_type(&self, ty: &SyntaxNode) -> Type {
        self.compilation.resolve_syntax(ty, &Scope::of(ty))
    }

    /// Members of `ty` of the given kinds that code at `position` may access.
    ///
    /// Own members come first, in declaration order, then inherited ones; a
    /// member hidden by a derived member of the same name is skipped.
    #[must_use]
    pub fn lookup_members(&self, ty: &Type, position: usize, kinds: &[SymbolKind]) -> Vec<Symbol> {
        let from = self.enclosing_types(position);
        let mut seen = HashSet::new();
        self.compilation
            .members_of(ty)
            .into_iter()
            .filter(|m| seen.insert((m.name.clone(), m.parameters.clone())))
            .filter(|m| kinds.contains(&m.kind))
            .filter(|m| self.compilation.is_accessible(m, &from))
            .collect()
    }

    /// Spells `ty` the way code at `position` has to write it, qualifying
    /// declared types only as far as needed to resolve there.
    #[must_use]
    pub fn type_name_at(&self, ty: &Type, position: usize) -> Option<String> {
        self.compilation
            .type_name_in(ty, &Scope::of(&self.node_at(position)))
    }

    /// Symbols of the given kinds visible by simple name at `position`:
    /// locals and parameters, then members of the enclosing types.
    #[must_use]
    pub fn lookup_symbols(&self, position: usize, kinds: &[SymbolKind]) -> Vec<Symbol> {
        let at = self.node_at(position);
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for local in self.locals_in_scope(&at, position) {
            if kinds.contains(&local.kind) && seen.insert((local.name.clone(), Vec::new())) {
                out.push(self.local_symbol(&local));
            }
        }
        let from = Scope::of(&at).types;
        for outer in from.iter().rev() {
            let ty = Type::Named {
                name: outer.clone(),
                args: Vec::new(),
            };
            for member in self.compilation.members_of(&ty) {
                if kinds.contains(&member.kind)
                    && self.compilation.is_accessible(&member, &from)
                    && seen.insert((member.name.clone(), member.parameters.clone()))
                {
                    out.push(member);
                }
            }
        }
        out
    }

    /// Symbol declared by a declaration node: a type, member, local
    /// declarator or parameter.
    #[must_use]
    pub fn declared_symbol(&self, node: &SyntaxNode) -> Option<Symbol> {
        let id = self.document.id();
        let kind = node.kind();
        if kind.is_type_declaration() {
            return self
                .compilation
                .type_declared_at(id, node.full_range())
                .map(super::TypeInfo::symbol);
        }
        let in_field = node
            .parent()
            .and_then(|p| p.parent())
            .is_some_and(|gp| gp.kind() == SyntaxKind::FieldDeclaration);
        match kind {
            SyntaxKind::VariableDeclarator if !in_field => {
                let position = node.span().end;
                self.locals_in_scope(node, position)
                    .into_iter()
                    .find(|l| &l.node == node)
                    .map(|l| self.local_symbol(&l))
            }
            SyntaxKind::Parameter => {
                let position = node.span().start;
                self.locals_in_scope(node, position)
                    .into_iter()
                    .find(|l| &l.node == node)
                    .map(|l| self.local_symbol(&l))
            }
            _ => self
                .compilation
                .member_declared_at(&SymbolDeclaration::of(id, node))
                .cloned(),
        }
    }

    /// Node declaring `symbol`, possibly in another document.
    #[must_use]
    pub fn declaring_node(&self, symbol: &Symbol) -> Option<SyntaxNode> {
        self.compilation.declaring_node(symbol)
    }

    /// Method an invocation calls, preferring an overload whose parameter
    /// count matches the argument count.
    #[must_use]
    pub fn symbol_for_invocation(&self, invocation: &SyntaxNode) -> Option<Symbol> {
        let invocation = InvocationExpression::cast(invocation.clone())?;
        let target = invocation.expression()?;
        let name = invocation.name_token()?.text().to_string();
        let arity = invocation.arguments().len();

        let candidates: Vec<Symbol> = match target.kind() {
            SyntaxKind::IdentifierName | SyntaxKind::GenericName => {
                self.lookup_symbols(target.span().start, &[SymbolKind::Method])
                    .into_iter()
                    .filter(|m| m.name == name)
                    .collect()
            }
            SyntaxKind::MemberAccessExpression => {
                let receiver = target.children().next()?;
                let (ty, want_static) = match self.bind(&receiver) {
                    Binding::Value(ty) => (ty, false),
                    Binding::Type(ty) => (ty, true),
                    _ => return None,
                };
                let from = self.enclosing_types(target.span().start);
                self.compilation
                    .members_of(&ty)
                    .into_iter()
                    .filter(|m| m.kind == SymbolKind::Method && m.name == name)
                    .filter(|m| m.is_static == want_static)
                    .filter(|m| self.compilation.is_accessible(m, &from))
                    .collect()
            }
            _ => return None,
        };
        candidates
            .iter()
            .find(|m| m.parameters.len() == arity)
            .or_else(|| candidates.first())
            .cloned()
    }

    fn node_at(&self, position: usize) -> SyntaxNode {
        let root = self.root();
        root.token_at_offset(position)
            .map_or(root, |token| token.parent())
    }

    fn enclosing_types(&self, position: usize) -> Vec<String> {
        Scope::of(&self.node_at(position)).types
    }

    fn bind(&self, expr: &SyntaxNode) -> Binding {
        let value = |ty| Binding::Value(ty);
        match expr.kind() {
            SyntaxKind::LiteralExpression => expr
                .first_token()
                .map_or(Binding::Unknown, |t| value(literal_type(&t))),
            SyntaxKind::IdentifierName => self.bind_name(&name_path(expr), expr),
            SyntaxKind::GenericName | SyntaxKind::PredefinedType | SyntaxKind::ArrayType => {
                Binding::Type(self.resolve_type(expr))
            }
            SyntaxKind::MemberAccessExpression => self.bind_member(expr),
            SyntaxKind::InvocationExpression => {
                let is_nameof = expr
                    .children()
                    .next()
                    .is_some_and(|t| t.kind() == SyntaxKind::IdentifierName && t.text() == "nameof");
                if is_nameof {
                    return value(Type::Predefined(PredefinedType::String));
                }
                self.symbol_for_invocation(expr)
                    .map_or(Binding::Unknown, |m| value(m.ty))
            }
            SyntaxKind::ObjectCreationExpression => value(
                ast::ObjectCreationExpression::cast(expr.clone())
                    .and_then(|c| c.ty())
                    .map_or(Type::Unknown, |t| self.resolve_type(&t)),
            ),
            SyntaxKind::DefaultExpression | SyntaxKind::CastExpression => value(
                expr.children()
                    .next()
                    .map_or(Type::Unknown, |t| self.resolve_type(&t)),
            ),
            SyntaxKind::ThisExpression => self
                .enclosing_types(expr.span().start)
                .pop()
                .map_or(Binding::Unknown, |name| {
                    value(Type::Named {
                        name,
                        args: Vec::new(),
                    })
                }),
            SyntaxKind::BaseExpression => self
                .enclosing_types(expr.span().start)
                .pop()
                .and_then(|name| self.compilation.type_info(&name))
                .and_then(|info| info.base_types.first().cloned())
                .map_or(Binding::Unknown, value),
            SyntaxKind::ParenthesizedExpression => expr
                .children()
                .next()
                .map_or(Binding::Unknown, |inner| self.bind(&inner)),
            SyntaxKind::ElementAccessExpression => {
                let target = expr
                    .children()
                    .next()
                    .map_or(Type::Unknown, |t| self.type_of_expression(&t));
                match target {
                    Type::Array { element, .. } => value(*element),
                    Type::Predefined(PredefinedType::String) => {
                        value(Type::Predefined(PredefinedType::Char))
                    }
                    _ => Binding::Unknown,
                }
            }
            SyntaxKind::PrefixUnaryExpression => self.bind_prefix(expr),
            SyntaxKind::PostfixUnaryExpression | SyntaxKind::AssignmentExpression => expr
                .children()
                .next()
                .map_or(Binding::Unknown, |operand| value(self.type_of_expression(&operand))),
            SyntaxKind::BinaryExpression => value(self.binary_type(expr)),
            SyntaxKind::ConditionalExpression => {
                let branches: Vec<Type> = expr
                    .children()
                    .skip(1)
                    .map(|b| self.type_of_expression(&b))
                    .collect();
                match branches.as_slice() {
                    [Type::Null, other] | [other, Type::Null] => value(other.clone()),
                    [a, b] if a == b => value(a.clone()),
                    [a, b] => match (a.as_predefined(), b.as_predefined()) {
                        (Some(x), Some(y)) => binary_numeric_promotion(x, y)
                            .map_or(Binding::Unknown, |p| value(Type::Predefined(p))),
                        _ => Binding::Unknown,
                    },
                    _ => Binding::Unknown,
                }
            }
            _ => Binding::Unknown,
        }
    }

    fn bind_name(&self, name: &str, at: &SyntaxNode) -> Binding {
        let position = at.span().start;
        if let Some(local) = self
            .locals_in_scope(at, position)
            .into_iter()
            .find(|l| l.name == name)
        {
            return Binding::Value(self.local_type(&local));
        }
        let from = Scope::of(at).types;
        for outer in from.iter().rev() {
            let ty = Type::Named {
                name: outer.clone(),
                args: Vec::new(),
            };
            let found = self.compilation.members_of(&ty).into_iter().find(|m| {
                m.name == name && matches!(m.kind, SymbolKind::Field | SymbolKind::Property)
            });
            if let Some(member) = found {
                return Binding::Value(member.ty);
            }
        }
        match self
            .compilation
            .resolve_name(name, Vec::new(), &Scope::of(at))
        {
            Type::Unresolved { name, .. } => Binding::Namespace(name),
            ty => Binding::Type(ty),
        }
    }

    fn bind_member(&self, expr: &SyntaxNode) -> Binding {
        let Some(access) = ast::MemberAccessExpression::cast(expr.clone()) else {
            return Binding::Unknown;
        };
        let (Some(receiver), Some(name)) = (access.expression(), access.name()) else {
            return Binding::Unknown;
        };
        let name = name_path(&name);
        let from = self.enclosing_types(expr.span().start);
        let member = |ty: &Type, want_static: bool| {
            self.compilation
                .members_of(ty)
                .into_iter()
                .find(|m| {
                    m.name == name
                        && m.kind != SymbolKind::Method
                        && m.is_static == want_static
                        && self.compilation.is_accessible(m, &from)
                })
                .map(|m| m.ty)
        };

        match self.bind(&receiver) {
            Binding::Value(ty) => {
                if let Some(found) = member(&ty, false) {
                    return Binding::Value(found);
                }
                let has_length = matches!(ty, Type::Array { .. })
                    || ty == Type::Predefined(PredefinedType::String);
                if has_length && name == "Length" {
                    return Binding::Value(Type::Predefined(PredefinedType::Int));
                }
                Binding::Unknown
            }
            Binding::Type(ty) => {
                if let Some(found) = member(&ty, true) {
                    return Binding::Value(found);
                }
                let nested = ty
                    .declared_name()
                    .map(|outer| format!("{outer}.{name}"))
                    .filter(|full| self.compilation.type_info(full).is_some());
                nested.map_or(Binding::Unknown, |full| {
                    Binding::Type(Type::Named {
                        name: full,
                        args: Vec::new(),
                    })
                })
            }
            Binding::Namespace(prefix) => {
                let path = format!("{prefix}.{name}");
                match self
                    .compilation
                    .resolve_name(&path, Vec::new(), &Scope::of(expr))
                {
                    Type::Unresolved { .. } => Binding::Namespace(path),
                    ty => Binding::Type(ty),
                }
            }
            Binding::Unknown => Binding::Unknown,
        }
    }

    fn bind_prefix(&self, expr: &SyntaxNode) -> Binding {
        let operator = expr.first_token().map(|t| t.kind());
        let operand = expr
            .children()
            .next()
            .map_or(Type::Unknown, |o| self.type_of_expression(&o));
        match operator {
            Some(SyntaxKind::Exclamation) => Binding::Value(Type::Predefined(PredefinedType::Bool)),
            Some(SyntaxKind::PlusPlus | SyntaxKind::MinusMinus) => Binding::Value(operand),
            Some(SyntaxKind::Minus | SyntaxKind::Plus | SyntaxKind::Tilde) => operand
                .as_predefined()
                .and_then(unary_numeric_promotion)
                .map_or(Binding::Unknown, |p| Binding::Value(Type::Predefined(p))),
            _ => Binding::Unknown,
        }
    }

    fn binary_type(&self, expr: &SyntaxNode) -> Type {
        let mut children = expr.children();
        let (Some(left), Some(right)) = (children.next(), children.next()) else {
            return Type::Unknown;
        };
        let Some(operator) = expr.child_tokens().next() else {
            return Type::Unknown;
        };
        let bool_type = Type::Predefined(PredefinedType::Bool);
        match operator.kind() {
            SyntaxKind::EqualsEquals
            | SyntaxKind::ExclamationEquals
            | SyntaxKind::Less
            | SyntaxKind::LessEquals
            | SyntaxKind::Greater
            | SyntaxKind::GreaterEquals
            | SyntaxKind::AmpersandAmpersand
            | SyntaxKind::BarBar => return bool_type,
            SyntaxKind::Identifier if operator.text() == "is" => return bool_type,
            SyntaxKind::Identifier if operator.text() == "as" => return self.resolve_type(&right),
            _ => {}
        }

        let lhs = self.type_of_expression(&left);
        let rhs = self.type_of_expression(&right);
        match operator.kind() {
            SyntaxKind::QuestionQuestion => match lhs {
                Type::Nullable(inner) if *inner == rhs => rhs,
                Type::Null => rhs,
                _ if lhs == rhs => lhs,
                _ => Type::Unknown,
            },
            SyntaxKind::Plus
                if lhs == Type::Predefined(PredefinedType::String)
                    || rhs == Type::Predefined(PredefinedType::String) =>
            {
                Type::Predefined(PredefinedType::String)
            }
            SyntaxKind::Ampersand | SyntaxKind::Bar | SyntaxKind::Caret
                if lhs == bool_type && rhs == bool_type =>
            {
                bool_type
            }
            _ => match (lhs.as_predefined(), rhs.as_predefined()) {
                (Some(a), Some(b)) => {
                    binary_numeric_promotion(a, b).map_or(Type::Unknown, Type::Predefined)
                }
                _ => Type::Unknown,
            },
        }
    }

    /// Locals and parameters visible at `position` inside `at`, innermost
    /// scope first.
    fn locals_in_scope(&self, at: &SyntaxNode, position: usize) -> Vec<LocalDecl> {
        let mut out = Vec::new();
        for scope in at.ancestors() {
            match scope.kind() {
                SyntaxKind::Block => {
                    let mut block = Vec::new();
                    for statement in scope.children() {
                        if statement.span().start >= position {
                            break;
                        }
                        if let Some(declaration) = ast::LocalDeclarationStatement::cast(statement)
                            .and_then(|s| s.declaration())
                        {
                            block.extend(declarators(&declaration, position));
                        }
                    }
                    block.reverse();
                    out.extend(block);
                }
                SyntaxKind::ForStatement => {
                    if let Some(declaration) =
                        ast::ForStatement::cast(scope.clone()).and_then(|f| f.declaration())
                    {
                        out.extend(declarators(&declaration, position));
                    }
                }
                SyntaxKind::ForEachStatement => {
                    let Some(foreach) = ForEachStatement::cast(scope.clone()) else {
                        continue;
                    };
                    let in_body = foreach
                        .syntax()
                        .child_token(SyntaxKind::CloseParen)
                        .is_some_and(|close| position >= close.span().end);
                    if let (true, Some(name)) = (in_body, foreach.identifier()) {
                        let ty = match foreach.ty() {
                            Some(ty) if !is_var(&ty) => LocalType::Declared(ty),
                            _ => LocalType::IterationOf(foreach.expression()),
                        };
                        out.push(LocalDecl {
                            name: name.text().to_string(),
                            kind: SymbolKind::Local,
                            node: scope.clone(),
                            ty,
                        });
                    }
                }
                SyntaxKind::LambdaExpression
                | SyntaxKind::MethodDeclaration
                | SyntaxKind::ConstructorDeclaration => {
                    out.extend(parameters(&scope));
                }
                SyntaxKind::AccessorDeclaration => {
                    let is_setter = ast::AccessorDeclaration::cast(scope.clone())
                        .and_then(|a| a.keyword())
                        .is_some_and(|k| matches!(k.text(), "set" | "init"));
                    let property_type = scope
                        .ancestors()
                        .find_map(ast::PropertyDeclaration::cast)
                        .and_then(|p| p.ty());
                    if let (true, Some(ty)) = (is_setter, property_type) {
                        out.push(LocalDecl {
                            name: "value".to_string(),
                            kind: SymbolKind::Parameter,
                            node: scope.clone(),
                            ty: LocalType::Known(self.resolve_type(&ty)),
                        });
                    }
                }
                _ => {}
            }
        }
        out
    }

    fn local_type(&self, local: &LocalDecl) -> Type {
        match &local.ty {
            LocalType::Declared(ty) => self.resolve_type(ty),
            LocalType::Inferred(value) => value
                .as_ref()
                .map_or(Type::Unknown, |v| self.type_of_expression(v)),
            LocalType::IterationOf(collection) => {
                match collection.as_ref().map(|c| self.type_of_expression(c)) {
                    Some(Type::Array { element, .. }) => *element,
                    Some(Type::Predefined(PredefinedType::String)) => {
                        Type::Predefined(PredefinedType::Char)
                    }
                    _ => Type::Unknown,
                }
            }
            LocalType::Known(ty) => ty.clone(),
        }
    }

    fn local_symbol(&self, local: &LocalDecl) -> Symbol {
        Symbol {
            name: local.name.clone(),
            kind: local.kind,
            ty: self.local_type(local),
            parameters: Vec::new(),
            declaration: Some(SymbolDeclaration::of(self.document.id(), &local.node)),
            accessibility: Accessibility::Private,
            is_static: false,
            container: None,
        }
    }
}

fn is_var(ty: &SyntaxNode) -> bool {
    ty.kind() == SyntaxKind::IdentifierName && ty.text() == "var"
}

fn declarators(declaration: &VariableDeclaration, position: usize) -> Vec<LocalDecl> {
    let declared = declaration.ty();
    let mut out = Vec::new();
    for declarator in declaration.declarators() {
        if declarator.syntax().span().end > position {
            break;
        }
        let Some(name) = declarator.identifier() else {
            continue;
        };
        let ty = match &declared {
            Some(ty) if !is_var(ty) => LocalType::Declared(ty.clone()),
            _ => LocalType::Inferred(declarator.initializer().and_then(|i| i.value())),
        };
        out.push(LocalDecl {
            name: name.text().to_string(),
            kind: SymbolKind::Local,
            node: declarator.syntax().clone(),
            ty,
        });
    }
    out.reverse();
    out
}

fn parameters(owner: &SyntaxNode) -> Vec<LocalDecl> {
    let direct = owner.children().filter(|n| n.kind() == SyntaxKind::Parameter);
    let listed = owner
        .children()
        .filter(|n| n.kind() == SyntaxKind::ParameterList)
        .flat_map(|list| list.children().collect::<Vec<_>>());
    direct
        .chain(listed)
        .filter_map(ast::Parameter::cast)
        .filter_map(|p| {
            let name = p.identifier()?.text().to_string();
            let ty = p.ty().map_or(LocalType::Known(Type::Unknown), LocalType::Declared);
            Some(LocalDecl {
                name,
                kind: SymbolKind::Parameter,
                node: p.syntax().clone(),
                ty,
            })
        })
        .collect()
}

fn literal_type(token: &SyntaxToken) -> Type {
    match token.kind() {
        SyntaxKind::NumericLiteral => Type::Predefined(numeric_literal_type(token.text())),
        SyntaxKind::StringLiteral => Type::Predefined(PredefinedType::String),
        SyntaxKind::CharacterLiteral => Type::Predefined(PredefinedType::Char),
        SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => {
            Type::Predefined(PredefinedType::Bool)
        }
        SyntaxKind::NullKeyword => Type::Null,
        _ => Type::Unknown,
    }
}

/// Type of a numeric literal from its suffix and magnitude.
fn numeric_literal_type(text: &str) -> PredefinedType {
    let lower = text.to_ascii_lowercase().replace('_', "");
    let (radix, body) = if let Some(hex) = lower.strip_prefix("0x") {
        (16, hex)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        (2, bin)
    } else {
        (10, lower.as_str())
    };

    if radix == 10 {
        if body.ends_with('f') {
            return PredefinedType::Float;
        }
        if body.ends_with('d') {
            return PredefinedType::Double;
        }
        if body.ends_with('m') {
            return PredefinedType::Decimal;
        }
        if body.contains('.') || body.contains('e') {
            return PredefinedType::Double;
        }
    }

    let digits = body.trim_end_matches(['u', 'l']);
    let suffix = &body[digits.len()..];
    let value = u64::from_str_radix(digits, radix).unwrap_or(u64::MAX);
    let fits_int = i32::try_from(value).is_ok();
    let fits_uint = u32::try_from(value).is_ok();
    let fits_long = i64::try_from(value).is_ok();
    match suffix {
        "ul" | "lu" => PredefinedType::ULong,
        "l" if fits_long => PredefinedType::Long,
        "u" if fits_uint => PredefinedType::UInt,
        "" if fits_int => PredefinedType::Int,
        "" if fits_uint => PredefinedType::UInt,
        "" if fits_long => PredefinedType::Long,
        _ => PredefinedType::ULong,
    }
}
