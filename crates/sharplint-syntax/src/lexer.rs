//! Lexer producing tokens with attached trivia.
//!
//! Raw lexing is done by `logos`. A second pass attaches trivia to tokens:
//! trivia up to and including the first line break after a token is trailing
//! trivia of that token, everything else is leading trivia of the next token.
//! Consecutive `///` lines are merged into one doc-comment trivia.

use crate::green::{GreenToken, Trivia};
use crate::kind::{SyntaxKind, TriviaKind};
use crate::ParseError;
use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    #[regex(r"[ \t\f]+")]
    Whitespace,
    #[regex(r"\r?\n")]
    Newline,
    #[regex(r"//[^\r\n]*")]
    LineComment,
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,
    #[regex(r"#[^\r\n]*")]
    Directive,

    #[regex(r"@?[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,
    #[regex(r"[0-9][0-9_]*([uU][lL]?|[lL][uU]?)?")]
    #[regex(r"0[xX][0-9a-fA-F_]+([uU][lL]?|[lL][uU]?)?")]
    #[regex(r"0[bB][01_]+([uU][lL]?|[lL][uU]?)?")]
    Integer,
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?[fFdDmM]?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+[fFdDmM]?")]
    #[regex(r"[0-9][0-9_]*[fFdDmM]")]
    Real,
    #[regex(r#""([^"\\\r\n]|\\[^\r\n])*""#)]
    #[regex(r#"@"([^"]|"")*""#)]
    #[regex(r#"\$"([^"\\\r\n]|\\[^\r\n])*""#)]
    String,
    #[regex(r"'([^'\\\r\n]|\\[^\r\n][0-9a-fA-F]*)'")]
    Char,

    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token("?")]
    Question,
    #[token("??")]
    QuestionQuestion,
    #[token("=")]
    Equals,
    #[token("==")]
    EqualsEquals,
    #[token("!=")]
    ExclamationEquals,
    #[token("=>")]
    EqualsGreater,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEquals,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEquals,
    #[token("+")]
    Plus,
    #[token("++")]
    PlusPlus,
    #[token("+=")]
    PlusEquals,
    #[token("-")]
    Minus,
    #[token("--")]
    MinusMinus,
    #[token("-=")]
    MinusEquals,
    #[token("*")]
    Asterisk,
    #[token("*=")]
    AsteriskEquals,
    #[token("/")]
    Slash,
    #[token("/=")]
    SlashEquals,
    #[token("%")]
    Percent,
    #[token("&")]
    Ampersand,
    #[token("&&")]
    AmpersandAmpersand,
    #[token("|")]
    Bar,
    #[token("||")]
    BarBar,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("!")]
    Exclamation,
}

impl RawToken {
    fn trivia_kind(self, text: &str) -> Option<TriviaKind> {
        Some(match self {
            Self::Whitespace => TriviaKind::Whitespace,
            Self::Newline => TriviaKind::EndOfLine,
            Self::LineComment if is_doc_comment(text) => TriviaKind::SingleLineDocComment,
            Self::LineComment => TriviaKind::SingleLineComment,
            Self::BlockComment => TriviaKind::MultiLineComment,
            Self::Directive => TriviaKind::PreprocessorDirective,
            _ => return None,
        })
    }

    fn syntax_kind(self, text: &str) -> SyntaxKind {
        match self {
            Self::Identifier => keyword_kind(text).unwrap_or(SyntaxKind::Identifier),
            Self::Integer | Self::Real => SyntaxKind::NumericLiteral,
            Self::String => SyntaxKind::StringLiteral,
            Self::Char => SyntaxKind::CharacterLiteral,
            Self::OpenBrace => SyntaxKind::OpenBrace,
            Self::CloseBrace => SyntaxKind::CloseBrace,
            Self::OpenParen => SyntaxKind::OpenParen,
            Self::CloseParen => SyntaxKind::CloseParen,
            Self::OpenBracket => SyntaxKind::OpenBracket,
            Self::CloseBracket => SyntaxKind::CloseBracket,
            Self::Semicolon => SyntaxKind::Semicolon,
            Self::Comma => SyntaxKind::Comma,
            Self::Dot => SyntaxKind::Dot,
            Self::Colon => SyntaxKind::Colon,
            Self::Question => SyntaxKind::Question,
            Self::QuestionQuestion => SyntaxKind::QuestionQuestion,
            Self::Equals => SyntaxKind::Equals,
            Self::EqualsEquals => SyntaxKind::EqualsEquals,
            Self::ExclamationEquals => SyntaxKind::ExclamationEquals,
            Self::EqualsGreater => SyntaxKind::EqualsGreater,
            Self::Less => SyntaxKind::Less,
            Self::LessEquals => SyntaxKind::LessEquals,
            Self::Greater => SyntaxKind::Greater,
            Self::GreaterEquals => SyntaxKind::GreaterEquals,
            Self::Plus => SyntaxKind::Plus,
            Self::PlusPlus => SyntaxKind::PlusPlus,
            Self::PlusEquals => SyntaxKind::PlusEquals,
            Self::Minus => SyntaxKind::Minus,
            Self::MinusMinus => SyntaxKind::MinusMinus,
            Self::MinusEquals => SyntaxKind::MinusEquals,
            Self::Asterisk => SyntaxKind::Asterisk,
            Self::AsteriskEquals => SyntaxKind::AsteriskEquals,
            Self::Slash => SyntaxKind::Slash,
            Self::SlashEquals => SyntaxKind::SlashEquals,
            Self::Percent => SyntaxKind::Percent,
            Self::Ampersand => SyntaxKind::Ampersand,
            Self::AmpersandAmpersand => SyntaxKind::AmpersandAmpersand,
            Self::Bar => SyntaxKind::Bar,
            Self::BarBar => SyntaxKind::BarBar,
            Self::Caret => SyntaxKind::Caret,
            Self::Tilde => SyntaxKind::Tilde,
            Self::Exclamation => SyntaxKind::Exclamation,
            // Trivia never reaches this point.
            Self::Whitespace
            | Self::Newline
            | Self::LineComment
            | Self::BlockComment
            | Self::Directive => SyntaxKind::EndOfFile,
        }
    }
}

/// `///` starts a doc comment, `////` does not.
fn is_doc_comment(text: &str) -> bool {
    text.starts_with("///") && !text.starts_with("////")
}

/// Maps reserved words to keyword kinds.
#[must_use]
pub fn keyword_kind(text: &str) -> Option<SyntaxKind> {
    use SyntaxKind as K;
    Some(match text {
        "abstract" => K::AbstractKeyword,
        "base" => K::BaseKeyword,
        "bool" => K::BoolKeyword,
        "break" => K::BreakKeyword,
        "byte" => K::ByteKeyword,
        "char" => K::CharKeyword,
        "class" => K::ClassKeyword,
        "const" => K::ConstKeyword,
        "continue" => K::ContinueKeyword,
        "decimal" => K::DecimalKeyword,
        "default" => K::DefaultKeyword,
        "double" => K::DoubleKeyword,
        "else" => K::ElseKeyword,
        "enum" => K::EnumKeyword,
        "extern" => K::ExternKeyword,
        "false" => K::FalseKeyword,
        "float" => K::FloatKeyword,
        "for" => K::ForKeyword,
        "foreach" => K::ForEachKeyword,
        "if" => K::IfKeyword,
        "in" => K::InKeyword,
        "int" => K::IntKeyword,
        "interface" => K::InterfaceKeyword,
        "internal" => K::InternalKeyword,
        "long" => K::LongKeyword,
        "namespace" => K::NamespaceKeyword,
        "new" => K::NewKeyword,
        "null" => K::NullKeyword,
        "object" => K::ObjectKeyword,
        "override" => K::OverrideKeyword,
        "private" => K::PrivateKeyword,
        "protected" => K::ProtectedKeyword,
        "public" => K::PublicKeyword,
        "readonly" => K::ReadOnlyKeyword,
        "return" => K::ReturnKeyword,
        "sbyte" => K::SByteKeyword,
        "sealed" => K::SealedKeyword,
        "short" => K::ShortKeyword,
        "static" => K::StaticKeyword,
        "string" => K::StringKeyword,
        "struct" => K::StructKeyword,
        "this" => K::ThisKeyword,
        "true" => K::TrueKeyword,
        "typeof" => K::TypeOfKeyword,
        "uint" => K::UIntKeyword,
        "ulong" => K::ULongKeyword,
        "ushort" => K::UShortKeyword,
        "using" => K::UsingKeyword,
        "virtual" => K::VirtualKeyword,
        "void" => K::VoidKeyword,
        "volatile" => K::VolatileKeyword,
        "while" => K::WhileKeyword,
        _ => return None,
    })
}

enum Piece<'a> {
    Trivia(TriviaKind, &'a str),
    Token(SyntaxKind, &'a str),
}

/// Splits `source` into tokens with trivia attached.
///
/// The returned list always ends with an [`SyntaxKind::EndOfFile`] token that
/// holds any trivia after the last real token.
///
/// # Errors
///
/// Returns [`ParseError::UnexpectedCharacter`] for input that is not part of
/// the language.
pub fn tokenize(source: &str) -> Result<Vec<GreenToken>, ParseError> {
    let pieces = raw_pieces(source)?;
    let pieces = merge_doc_comments(pieces);
    Ok(attach_trivia(pieces))
}

fn raw_pieces(source: &str) -> Result<Vec<Piece<'_>>, ParseError> {
    let mut lexer = RawToken::lexer(source);
    let mut pieces = Vec::new();
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        let Ok(raw) = result else {
            return Err(ParseError::UnexpectedCharacter {
                offset: span.start,
                found: text.chars().next().unwrap_or('\0'),
            });
        };
        pieces.push(match raw.trivia_kind(text) {
            Some(kind) => Piece::Trivia(kind, text),
            None => Piece::Token(raw.syntax_kind(text), text),
        });
    }
    Ok(pieces)
}

/// Joins `///` lines separated only by a line break and indentation.
fn merge_doc_comments(pieces: Vec<Piece<'_>>) -> Vec<(Option<SyntaxKind>, TriviaKind, String)> {
    let mut out: Vec<(Option<SyntaxKind>, TriviaKind, String)> = Vec::new();
    let mut i = 0;
    while i < pieces.len() {
        match &pieces[i] {
            Piece::Token(kind, text) => {
                out.push((Some(*kind), TriviaKind::Whitespace, (*text).to_string()));
                i += 1;
            }
            Piece::Trivia(TriviaKind::SingleLineDocComment, text) => {
                let mut merged = (*text).to_string();
                let mut j = i + 1;
                loop {
                    let mut k = j;
                    let mut gap = String::new();
                    if let Some(Piece::Trivia(TriviaKind::EndOfLine, nl)) = pieces.get(k) {
                        gap.push_str(nl);
                        k += 1;
                    } else {
                        break;
                    }
                    if let Some(Piece::Trivia(TriviaKind::Whitespace, ws)) = pieces.get(k) {
                        gap.push_str(ws);
                        k += 1;
                    }
                    if let Some(Piece::Trivia(TriviaKind::SingleLineDocComment, next)) =
                        pieces.get(k)
                    {
                        merged.push_str(&gap);
                        merged.push_str(next);
                        j = k + 1;
                    } else {
                        break;
                    }
                }
                out.push((None, TriviaKind::SingleLineDocComment, merged));
                i = j;
            }
            Piece::Trivia(kind, text) => {
                out.push((None, *kind, (*text).to_string()));
                i += 1;
            }
        }
    }
    out
}

fn attach_trivia(pieces: Vec<(Option<SyntaxKind>, TriviaKind, String)>) -> Vec<GreenToken> {
    let mut tokens = Vec::new();
    let mut pending: Vec<Trivia> = Vec::new();
    let mut iter = pieces.into_iter().peekable();

    while let Some((kind, trivia_kind, text)) = iter.next() {
        let Some(kind) = kind else {
            pending.push(Trivia::new(trivia_kind, text));
            continue;
        };
        let leading = std::mem::take(&mut pending);
        let mut trailing = Vec::new();
        while let Some((None, next_kind, _)) = iter.peek() {
            let next_kind = *next_kind;
            // A doc comment always documents what follows it.
            if next_kind == TriviaKind::SingleLineDocComment {
                break;
            }
            if let Some((_, k, t)) = iter.next() {
                trailing.push(Trivia::new(k, t));
            }
            if next_kind == TriviaKind::EndOfLine {
                break;
            }
        }
        tokens.push(GreenToken::with_trivia(kind, text, leading, trailing));
    }

    tokens.push(GreenToken::with_trivia(
        SyntaxKind::EndOfFile,
        "",
        pending,
        Vec::new(),
    ));
    tokens
}
