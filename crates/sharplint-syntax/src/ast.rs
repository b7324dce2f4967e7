//! Typed views over [`SyntaxNode`]s.
//!
//! Each view wraps a node of one kind and exposes its parts by role. Views
//! are obtained with `cast` and never own anything beyond the node itself.

use crate::kind::SyntaxKind;
use crate::node::{SyntaxElement, SyntaxNode, SyntaxToken};

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident, $($kind:ident)|+) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(SyntaxNode);

        impl $name {
            /// Wraps `node` if it has the matching kind.
            #[must_use]
            pub fn cast(node: SyntaxNode) -> Option<Self> {
                matches!(node.kind(), $(SyntaxKind::$kind)|+).then(|| Self(node))
            }

            /// The underlying node.
            #[must_use]
            pub fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ast_node!(
    /// `class`, `struct` or `interface` declaration.
    TypeDeclaration,
    ClassDeclaration | StructDeclaration | InterfaceDeclaration
);
ast_node!(EnumDeclaration, EnumDeclaration);
ast_node!(EnumMemberDeclaration, EnumMemberDeclaration);
ast_node!(EqualsValueClause, EqualsValueClause);
ast_node!(FieldDeclaration, FieldDeclaration);
ast_node!(PropertyDeclaration, PropertyDeclaration);
ast_node!(AccessorList, AccessorList);
ast_node!(AccessorDeclaration, AccessorDeclaration);
ast_node!(MethodDeclaration, MethodDeclaration);
ast_node!(ConstructorDeclaration, ConstructorDeclaration);
ast_node!(Parameter, Parameter);
ast_node!(LocalDeclarationStatement, LocalDeclarationStatement);
ast_node!(ForStatement, ForStatement);
ast_node!(ForEachStatement, ForEachStatement);
ast_node!(VariableDeclaration, VariableDeclaration);
ast_node!(VariableDeclarator, VariableDeclarator);
ast_node!(ObjectCreationExpression, ObjectCreationExpression);
ast_node!(
    /// Braced initializer, either the object or the collection form.
    InitializerExpression,
    ObjectInitializerExpression | CollectionInitializerExpression
);
ast_node!(AssignmentExpression, AssignmentExpression);
ast_node!(InvocationExpression, InvocationExpression);
ast_node!(MemberAccessExpression, MemberAccessExpression);

/// Modifier tokens at the start of a declaration, after its attributes.
///
/// The contextual words `partial` and `async` count as modifiers only when
/// another word follows them.
#[must_use]
pub fn modifiers(node: &SyntaxNode) -> Vec<SyntaxToken> {
    let elements = node.children_with_tokens();
    let mut out = Vec::new();
    let mut iter = elements.iter().peekable();
    while let Some(element) = iter.next() {
        match element {
            SyntaxElement::Node(n) if n.kind() == SyntaxKind::AttributeList => {}
            SyntaxElement::Token(t) if t.kind().is_modifier() => out.push(t.clone()),
            SyntaxElement::Token(t)
                if matches!(t.text(), "partial" | "async")
                    && t.kind() == SyntaxKind::Identifier
                    && iter.peek().is_some_and(|next| {
                        next.kind() == SyntaxKind::Identifier
                            || next.kind().is_keyword()
                            || next.kind().is_type_syntax()
                    }) =>
            {
                out.push(t.clone());
            }
            _ => break,
        }
    }
    out
}

/// Returns true when `node` carries a modifier of `kind`.
#[must_use]
pub fn has_modifier(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    modifiers(node).iter().any(|t| t.kind() == kind)
}

/// The declared name: the first identifier token after the modifiers.
fn name_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    let skip = modifiers(node).len();
    node.children_with_tokens()
        .into_iter()
        .filter(|e| e.kind() != SyntaxKind::AttributeList)
        .skip(skip)
        .find_map(|e| e.into_token().filter(|t| t.kind() == SyntaxKind::Identifier))
}

fn type_child(node: &SyntaxNode) -> Option<SyntaxNode> {
    node.children().find(|n| n.kind().is_type_syntax())
}

fn child<T>(node: &SyntaxNode, cast: fn(SyntaxNode) -> Option<T>) -> Option<T> {
    node.children().find_map(cast)
}

fn children<T>(node: &SyntaxNode, cast: fn(SyntaxNode) -> Option<T>) -> Vec<T> {
    node.children().filter_map(cast).collect()
}

impl TypeDeclaration {
    /// Type name.
    #[must_use]
    pub fn identifier(&self) -> Option<SyntaxToken> {
        name_token(&self.0)
    }

    /// Types listed after `:`.
    #[must_use]
    pub fn base_types(&self) -> Vec<SyntaxNode> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::BaseList)
            .map(|list| list.children().collect())
            .unwrap_or_default()
    }

    /// Names of the type parameters, `T` and `U` in `class Pair<T, U>`.
    #[must_use]
    pub fn type_parameters(&self) -> Vec<SyntaxToken> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::TypeArgumentList)
            .map(|list| {
                list.children()
                    .filter_map(|p| p.child_token(SyntaxKind::Identifier))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Member declarations in source order.
    #[must_use]
    pub fn members(&self) -> Vec<SyntaxNode> {
        self.0
            .children()
            .filter(|n| {
                !matches!(
                    n.kind(),
                    SyntaxKind::AttributeList | SyntaxKind::BaseList | SyntaxKind::TypeArgumentList
                )
            })
            .collect()
    }
}

impl EnumDeclaration {
    /// Enum name.
    #[must_use]
    pub fn identifier(&self) -> Option<SyntaxToken> {
        name_token(&self.0)
    }

    /// Members in source order.
    #[must_use]
    pub fn members(&self) -> Vec<EnumMemberDeclaration> {
        children(&self.0, EnumMemberDeclaration::cast)
    }
}

impl EnumMemberDeclaration {
    /// Member name.
    #[must_use]
    pub fn identifier(&self) -> Option<SyntaxToken> {
        self.0.child_token(SyntaxKind::Identifier)
    }

    /// Explicit `= value`, if present.
    #[must_use]
    pub fn equals_value(&self) -> Option<EqualsValueClause> {
        child(&self.0, EqualsValueClause::cast)
    }

    /// The explicit value expression, if present.
    #[must_use]
    pub fn value(&self) -> Option<SyntaxNode> {
        self.equals_value().and_then(|clause| clause.value())
    }
}

impl EqualsValueClause {
    /// Expression after `=`.
    #[must_use]
    pub fn value(&self) -> Option<SyntaxNode> {
        self.0.children().next()
    }
}

impl FieldDeclaration {
    /// The declared type and declarators.
    #[must_use]
    pub fn declaration(&self) -> Option<VariableDeclaration> {
        child(&self.0, VariableDeclaration::cast)
    }
}

impl PropertyDeclaration {
    /// Property type.
    #[must_use]
    pub fn ty(&self) -> Option<SyntaxNode> {
        type_child(&self.0)
    }

    /// Property name.
    #[must_use]
    pub fn identifier(&self) -> Option<SyntaxToken> {
        name_token(&self.0)
    }

    /// `{ get; set; }`; absent for expression-bodied properties.
    #[must_use]
    pub fn accessor_list(&self) -> Option<AccessorList> {
        child(&self.0, AccessorList::cast)
    }

    /// `=> expr` body.
    #[must_use]
    pub fn expression_body(&self) -> Option<SyntaxNode> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::ArrowExpressionClause)
    }
}

impl AccessorList {
    /// Accessors in source order.
    #[must_use]
    pub fn accessors(&self) -> Vec<AccessorDeclaration> {
        children(&self.0, AccessorDeclaration::cast)
    }
}

impl AccessorDeclaration {
    /// `get`, `set` or `init`.
    #[must_use]
    pub fn keyword(&self) -> Option<SyntaxToken> {
        name_token(&self.0)
    }

    /// Modifier tokens such as `private`.
    #[must_use]
    pub fn modifiers(&self) -> Vec<SyntaxToken> {
        modifiers(&self.0)
    }
}

impl MethodDeclaration {
    /// Return type.
    #[must_use]
    pub fn return_type(&self) -> Option<SyntaxNode> {
        type_child(&self.0)
    }

    /// Method name.
    #[must_use]
    pub fn identifier(&self) -> Option<SyntaxToken> {
        name_token(&self.0)
    }

    /// Parameters in order.
    #[must_use]
    pub fn parameters(&self) -> Vec<Parameter> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::ParameterList)
            .map(|list| children(&list, Parameter::cast))
            .unwrap_or_default()
    }

    /// Block body, if the method has one.
    #[must_use]
    pub fn body(&self) -> Option<SyntaxNode> {
        self.0.children().find(|n| n.kind() == SyntaxKind::Block)
    }
}

impl ConstructorDeclaration {
    /// Parameters in order.
    #[must_use]
    pub fn parameters(&self) -> Vec<Parameter> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::ParameterList)
            .map(|list| children(&list, Parameter::cast))
            .unwrap_or_default()
    }
}

impl Parameter {
    /// Declared type; absent for implicitly typed lambda parameters.
    #[must_use]
    pub fn ty(&self) -> Option<SyntaxNode> {
        type_child(&self.0)
    }

    /// Parameter name.
    #[must_use]
    pub fn identifier(&self) -> Option<SyntaxToken> {
        self.0
            .child_tokens()
            .filter(|t| t.kind() == SyntaxKind::Identifier)
            .last()
    }
}

impl LocalDeclarationStatement {
    /// True for `const` locals.
    #[must_use]
    pub fn is_const(&self) -> bool {
        self.0.child_token(SyntaxKind::ConstKeyword).is_some()
    }

    /// The declared type and declarators.
    #[must_use]
    pub fn declaration(&self) -> Option<VariableDeclaration> {
        child(&self.0, VariableDeclaration::cast)
    }
}

impl ForStatement {
    /// Declaration in the initializer slot, if any.
    #[must_use]
    pub fn declaration(&self) -> Option<VariableDeclaration> {
        child(&self.0, VariableDeclaration::cast)
    }
}

impl ForEachStatement {
    /// Iteration variable type.
    #[must_use]
    pub fn ty(&self) -> Option<SyntaxNode> {
        type_child(&self.0)
    }

    /// Iteration variable name.
    #[must_use]
    pub fn identifier(&self) -> Option<SyntaxToken> {
        self.0.child_token(SyntaxKind::Identifier)
    }

    /// The collection being iterated.
    #[must_use]
    pub fn expression(&self) -> Option<SyntaxNode> {
        self.0.children().nth(1)
    }
}

impl VariableDeclaration {
    /// Declared type.
    #[must_use]
    pub fn ty(&self) -> Option<SyntaxNode> {
        self.0.children().next()
    }

    /// Declarators in order.
    #[must_use]
    pub fn declarators(&self) -> Vec<VariableDeclarator> {
        children(&self.0, VariableDeclarator::cast)
    }
}

impl VariableDeclarator {
    /// Variable name.
    #[must_use]
    pub fn identifier(&self) -> Option<SyntaxToken> {
        self.0.child_token(SyntaxKind::Identifier)
    }

    /// `= value`, if present.
    #[must_use]
    pub fn initializer(&self) -> Option<EqualsValueClause> {
        child(&self.0, EqualsValueClause::cast)
    }
}

impl ObjectCreationExpression {
    /// The created type; absent for target-typed `new()`.
    #[must_use]
    pub fn ty(&self) -> Option<SyntaxNode> {
        type_child(&self.0)
    }

    /// Braced initializer, if present.
    #[must_use]
    pub fn initializer(&self) -> Option<InitializerExpression> {
        child(&self.0, InitializerExpression::cast)
    }
}

impl InitializerExpression {
    /// True for `{ Name = value }` initializers.
    #[must_use]
    pub fn is_object_initializer(&self) -> bool {
        self.0.kind() == SyntaxKind::ObjectInitializerExpression
    }

    /// Element expressions in order.
    #[must_use]
    pub fn expressions(&self) -> Vec<SyntaxNode> {
        self.0.children().collect()
    }

    /// Comma tokens between elements, including a trailing one.
    #[must_use]
    pub fn separators(&self) -> Vec<SyntaxToken> {
        self.0
            .child_tokens()
            .filter(|t| t.kind() == SyntaxKind::Comma)
            .collect()
    }

    /// Closing brace.
    #[must_use]
    pub fn close_brace(&self) -> Option<SyntaxToken> {
        self.0.child_token(SyntaxKind::CloseBrace)
    }
}

impl AssignmentExpression {
    /// Assigned target.
    #[must_use]
    pub fn left(&self) -> Option<SyntaxNode> {
        self.0.children().next()
    }

    /// Operator token, `=` or a compound form.
    #[must_use]
    pub fn operator(&self) -> Option<SyntaxToken> {
        self.0.child_tokens().next()
    }

    /// Assigned value.
    #[must_use]
    pub fn right(&self) -> Option<SyntaxNode> {
        self.0.children().nth(1)
    }
}

impl InvocationExpression {
    /// The invoked expression.
    #[must_use]
    pub fn expression(&self) -> Option<SyntaxNode> {
        self.0.children().next()
    }

    /// Argument expressions in order.
    #[must_use]
    pub fn arguments(&self) -> Vec<SyntaxNode> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::ArgumentList)
            .map(|list| {
                list.children()
                    .filter_map(|argument| argument.children().last())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Token naming the called method, e.g. `Run` in `a.Run()`.
    #[must_use]
    pub fn name_token(&self) -> Option<SyntaxToken> {
        let target = self.expression()?;
        let name = match target.kind() {
            SyntaxKind::MemberAccessExpression => target.children().nth(1)?,
            SyntaxKind::IdentifierName | SyntaxKind::GenericName => target,
            _ => return None,
        };
        name.child_token(SyntaxKind::Identifier)
    }
}

impl MemberAccessExpression {
    /// Expression left of the dot.
    #[must_use]
    pub fn expression(&self) -> Option<SyntaxNode> {
        self.0.children().next()
    }

    /// Simple name right of the dot.
    #[must_use]
    pub fn name(&self) -> Option<SyntaxNode> {
        self.0.children().nth(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::SyntaxTree;

    fn find<T>(tree: &SyntaxTree, cast: fn(SyntaxNode) -> Option<T>) -> T {
        tree.root()
            .descendants()
            .into_iter()
            .find_map(cast)
            .expect("node present")
    }

    #[test]
    fn method_parts() {
        let tree = SyntaxTree::parse(
            "class C { [Obsolete] private static async Task<int> Load(int a, string b) { } }",
        )
        .expect("parses");
        let method = find(&tree, MethodDeclaration::cast);
        let mods: Vec<_> = modifiers(method.syntax())
            .iter()
            .map(|t| t.text().to_string())
            .collect();
        assert_eq!(mods, vec!["private", "static", "async"]);
        assert_eq!(method.identifier().expect("name").text(), "Load");
        assert_eq!(method.return_type().expect("type").text(), "Task<int>");
        assert_eq!(method.parameters().len(), 2);
        assert!(has_modifier(method.syntax(), SyntaxKind::StaticKeyword));
    }

    #[test]
    fn type_parameter_names() {
        let tree = SyntaxTree::parse("class Pair<TKey, TValue> : Base<TKey> { }").expect("parses");
        let pair = find(&tree, TypeDeclaration::cast);
        let names: Vec<_> = pair
            .type_parameters()
            .iter()
            .map(|t| t.text().to_string())
            .collect();
        assert_eq!(names, vec!["TKey", "TValue"]);
        assert_eq!(pair.base_types().len(), 1);
    }

    #[test]
    fn property_parts() {
        let tree = SyntaxTree::parse("class C { public int X { get; private set; } }")
            .expect("parses");
        let property = find(&tree, PropertyDeclaration::cast);
        assert_eq!(property.identifier().expect("name").text(), "X");
        let accessors = property.accessor_list().expect("accessors").accessors();
        assert_eq!(accessors.len(), 2);
        assert_eq!(accessors[1].keyword().expect("keyword").text(), "set");
        assert_eq!(accessors[1].modifiers().len(), 1);
        assert!(property.expression_body().is_none());
    }

    #[test]
    fn enum_members() {
        let tree = SyntaxTree::parse("enum E { A, B = 1, C = 0 }").expect("parses");
        let decl = find(&tree, EnumDeclaration::cast);
        let members = decl.members();
        assert_eq!(members.len(), 3);
        assert!(members[0].value().is_none());
        assert_eq!(members[2].value().expect("value").text(), "0");
    }

    #[test]
    fn initializer_parts() {
        let tree = SyntaxTree::parse("class C { void M() { var p = new P { X = 1, Y = 2, }; } }")
            .expect("parses");
        let creation = find(&tree, ObjectCreationExpression::cast);
        assert_eq!(creation.ty().expect("type").text(), "P");
        let init = creation.initializer().expect("initializer");
        assert!(init.is_object_initializer());
        assert_eq!(init.expressions().len(), 2);
        assert_eq!(init.separators().len(), 2);
        let first = AssignmentExpression::cast(init.expressions()[0].clone()).expect("assignment");
        assert_eq!(first.left().expect("left").text(), "X");
    }

    #[test]
    fn invocation_name() {
        let tree = SyntaxTree::parse("class C { void M() { a.run(1); } }").expect("parses");
        let call = find(&tree, InvocationExpression::cast);
        assert_eq!(call.name_token().expect("name").text(), "run");
        assert_eq!(call.arguments().len(), 1);
    }
}
