//! Node, token and trivia kinds.

use serde::{Deserialize, Serialize};

/// Kind tag of every node and token in the tree.
///
/// Token kinds come first, followed by node kinds. Keywords are distinct
/// token kinds; contextual words (`get`, `set`, `var`, `partial`, ...) lex as
/// [`SyntaxKind::Identifier`] and are recognised by text.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SyntaxKind {
    // Literals and names
    Identifier,
    NumericLiteral,
    StringLiteral,
    CharacterLiteral,

    // Punctuation
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Semicolon,
    Comma,
    Dot,
    Colon,
    Question,
    QuestionQuestion,
    Equals,
    EqualsEquals,
    ExclamationEquals,
    EqualsGreater,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    Plus,
    PlusPlus,
    PlusEquals,
    Minus,
    MinusMinus,
    MinusEquals,
    Asterisk,
    AsteriskEquals,
    Slash,
    SlashEquals,
    Percent,
    Ampersand,
    AmpersandAmpersand,
    Bar,
    BarBar,
    Caret,
    Tilde,
    Exclamation,

    // Keywords
    AbstractKeyword,
    BaseKeyword,
    BoolKeyword,
    BreakKeyword,
    ByteKeyword,
    CharKeyword,
    ClassKeyword,
    ConstKeyword,
    ContinueKeyword,
    DecimalKeyword,
    DefaultKeyword,
    DoubleKeyword,
    ElseKeyword,
    EnumKeyword,
    ExternKeyword,
    FalseKeyword,
    FloatKeyword,
    ForKeyword,
    ForEachKeyword,
    IfKeyword,
    InKeyword,
    IntKeyword,
    InterfaceKeyword,
    InternalKeyword,
    LongKeyword,
    NamespaceKeyword,
    NewKeyword,
    NullKeyword,
    ObjectKeyword,
    OverrideKeyword,
    PrivateKeyword,
    ProtectedKeyword,
    PublicKeyword,
    ReadOnlyKeyword,
    ReturnKeyword,
    SByteKeyword,
    SealedKeyword,
    ShortKeyword,
    StaticKeyword,
    StringKeyword,
    StructKeyword,
    ThisKeyword,
    TrueKeyword,
    TypeOfKeyword,
    UIntKeyword,
    ULongKeyword,
    UShortKeyword,
    UsingKeyword,
    VirtualKeyword,
    VoidKeyword,
    VolatileKeyword,
    WhileKeyword,

    /// Zero-width token closing a compilation unit; carries end-of-file trivia.
    EndOfFile,

    // Declarations
    CompilationUnit,
    UsingDirective,
    NamespaceDeclaration,
    FileScopedNamespaceDeclaration,
    AttributeList,
    ClassDeclaration,
    StructDeclaration,
    InterfaceDeclaration,
    EnumDeclaration,
    EnumMemberDeclaration,
    EqualsValueClause,
    BaseList,
    FieldDeclaration,
    PropertyDeclaration,
    AccessorList,
    AccessorDeclaration,
    ArrowExpressionClause,
    MethodDeclaration,
    ConstructorDeclaration,
    ParameterList,
    Parameter,

    // Statements
    Block,
    LocalDeclarationStatement,
    VariableDeclaration,
    VariableDeclarator,
    ExpressionStatement,
    ReturnStatement,
    IfStatement,
    ElseClause,
    ForStatement,
    ForEachStatement,
    WhileStatement,
    BreakStatement,
    ContinueStatement,
    EmptyStatement,

    // Types
    PredefinedType,
    QualifiedName,
    GenericName,
    TypeArgumentList,
    ArrayType,
    ArrayRankSpecifier,
    NullableType,

    // Expressions
    IdentifierName,
    LiteralExpression,
    MemberAccessExpression,
    InvocationExpression,
    ElementAccessExpression,
    ArgumentList,
    BracketedArgumentList,
    Argument,
    ObjectCreationExpression,
    ObjectInitializerExpression,
    CollectionInitializerExpression,
    DefaultExpression,
    TypeOfExpression,
    AssignmentExpression,
    ConditionalExpression,
    BinaryExpression,
    PrefixUnaryExpression,
    PostfixUnaryExpression,
    ParenthesizedExpression,
    CastExpression,
    LambdaExpression,
    ThisExpression,
    BaseExpression,
}

impl SyntaxKind {
    /// Returns true for token kinds (including keywords and end-of-file).
    #[must_use]
    pub fn is_token(self) -> bool {
        self <= Self::EndOfFile
    }

    /// Returns true for reserved keyword kinds.
    #[must_use]
    pub fn is_keyword(self) -> bool {
        (Self::AbstractKeyword..=Self::WhileKeyword).contains(&self)
    }

    /// Returns true for declaration modifier keywords.
    #[must_use]
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Self::PublicKeyword
                | Self::PrivateKeyword
                | Self::ProtectedKeyword
                | Self::InternalKeyword
                | Self::StaticKeyword
                | Self::ReadOnlyKeyword
                | Self::ConstKeyword
                | Self::VirtualKeyword
                | Self::OverrideKeyword
                | Self::AbstractKeyword
                | Self::SealedKeyword
                | Self::ExternKeyword
                | Self::VolatileKeyword
                | Self::NewKeyword
        )
    }

    /// Returns true for accessibility modifier keywords.
    #[must_use]
    pub fn is_accessibility_modifier(self) -> bool {
        matches!(
            self,
            Self::PublicKeyword
                | Self::PrivateKeyword
                | Self::ProtectedKeyword
                | Self::InternalKeyword
        )
    }

    /// Returns true for keywords naming a predefined type.
    #[must_use]
    pub fn is_predefined_type(self) -> bool {
        matches!(
            self,
            Self::BoolKeyword
                | Self::ByteKeyword
                | Self::SByteKeyword
                | Self::CharKeyword
                | Self::DecimalKeyword
                | Self::DoubleKeyword
                | Self::FloatKeyword
                | Self::IntKeyword
                | Self::UIntKeyword
                | Self::LongKeyword
                | Self::ULongKeyword
                | Self::ShortKeyword
                | Self::UShortKeyword
                | Self::ObjectKeyword
                | Self::StringKeyword
                | Self::VoidKeyword
        )
    }

    /// Returns true for type declaration node kinds.
    #[must_use]
    pub fn is_type_declaration(self) -> bool {
        matches!(
            self,
            Self::ClassDeclaration
                | Self::StructDeclaration
                | Self::InterfaceDeclaration
                | Self::EnumDeclaration
        )
    }

    /// Returns true for node kinds that can appear in a type position.
    #[must_use]
    pub fn is_type_syntax(self) -> bool {
        matches!(
            self,
            Self::PredefinedType
                | Self::IdentifierName
                | Self::QualifiedName
                | Self::GenericName
                | Self::ArrayType
                | Self::NullableType
        )
    }

    /// Returns true for assignment operator tokens.
    #[must_use]
    pub fn is_assignment_operator(self) -> bool {
        matches!(
            self,
            Self::Equals
                | Self::PlusEquals
                | Self::MinusEquals
                | Self::AsteriskEquals
                | Self::SlashEquals
        )
    }
}

/// Kind of a trivia piece attached to a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TriviaKind {
    /// Spaces and tabs.
    Whitespace,
    /// A line terminator (`\n` or `\r\n`).
    EndOfLine,
    /// A `//` comment, excluding the line terminator.
    SingleLineComment,
    /// One or more consecutive `///` lines, including the indentation between them.
    SingleLineDocComment,
    /// A `/* ... */` comment.
    MultiLineComment,
    /// A `#...` preprocessor line such as `#region` or `#nullable`.
    PreprocessorDirective,
}

impl TriviaKind {
    /// Returns true for comment trivia of any flavour.
    #[must_use]
    pub fn is_comment(self) -> bool {
        matches!(
            self,
            Self::SingleLineComment | Self::SingleLineDocComment | Self::MultiLineComment
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_tokens_and_nodes() {
        assert!(SyntaxKind::Identifier.is_token());
        assert!(SyntaxKind::EndOfFile.is_token());
        assert!(!SyntaxKind::CompilationUnit.is_token());
        assert!(SyntaxKind::ClassKeyword.is_keyword());
        assert!(!SyntaxKind::Identifier.is_keyword());
    }

    #[test]
    fn modifiers() {
        assert!(SyntaxKind::PublicKeyword.is_modifier());
        assert!(SyntaxKind::PublicKeyword.is_accessibility_modifier());
        assert!(SyntaxKind::StaticKeyword.is_modifier());
        assert!(!SyntaxKind::StaticKeyword.is_accessibility_modifier());
        assert!(!SyntaxKind::IntKeyword.is_modifier());
    }
}
