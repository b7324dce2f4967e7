//! Static types.

use sharplint_syntax::SyntaxKind;
use std::fmt;

/// Built-in types spelled with a keyword.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PredefinedType {
    Bool,
    Byte,
    SByte,
    Char,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Float,
    Double,
    Decimal,
    Object,
    String,
    Void,
}

impl PredefinedType {
    /// Maps a keyword token kind to its type.
    #[must_use]
    pub fn from_keyword(kind: SyntaxKind) -> Option<Self> {
        Some(match kind {
            SyntaxKind::BoolKeyword => Self::Bool,
            SyntaxKind::ByteKeyword => Self::Byte,
            SyntaxKind::SByteKeyword => Self::SByte,
            SyntaxKind::CharKeyword => Self::Char,
            SyntaxKind::ShortKeyword => Self::Short,
            SyntaxKind::UShortKeyword => Self::UShort,
            SyntaxKind::IntKeyword => Self::Int,
            SyntaxKind::UIntKeyword => Self::UInt,
            SyntaxKind::LongKeyword => Self::Long,
            SyntaxKind::ULongKeyword => Self::ULong,
            SyntaxKind::FloatKeyword => Self::Float,
            SyntaxKind::DoubleKeyword => Self::Double,
            SyntaxKind::DecimalKeyword => Self::Decimal,
            SyntaxKind::ObjectKeyword => Self::Object,
            SyntaxKind::StringKeyword => Self::String,
            SyntaxKind::VoidKeyword => Self::Void,
            _ => return None,
        })
    }

    /// Maps framework names such as `Int32` or `System.String` to the
    /// keyword type they alias.
    #[must_use]
    pub fn from_framework_name(name: &str) -> Option<Self> {
        let name = name.strip_prefix("System.").unwrap_or(name);
        Some(match name {
            "Boolean" => Self::Bool,
            "Byte" => Self::Byte,
            "SByte" => Self::SByte,
            "Char" => Self::Char,
            "Int16" => Self::Short,
            "UInt16" => Self::UShort,
            "Int32" => Self::Int,
            "UInt32" => Self::UInt,
            "Int64" => Self::Long,
            "UInt64" => Self::ULong,
            "Single" => Self::Float,
            "Double" => Self::Double,
            "Decimal" => Self::Decimal,
            "Object" => Self::Object,
            "String" => Self::String,
            "Void" => Self::Void,
            _ => return None,
        })
    }

    /// The C# keyword.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::SByte => "sbyte",
            Self::Char => "char",
            Self::Short => "short",
            Self::UShort => "ushort",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Long => "long",
            Self::ULong => "ulong",
            Self::Float => "float",
            Self::Double => "double",
            Self::Decimal => "decimal",
            Self::Object => "object",
            Self::String => "string",
            Self::Void => "void",
        }
    }

    /// Returns true for integral and floating point types, `char` included.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        !matches!(self, Self::Bool | Self::Object | Self::String | Self::Void)
    }
}

/// A static type.
///
/// Equality is structural: two `Type`s are equal when they denote the same
/// type, however it was spelled in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// A keyword type such as `int`.
    Predefined(PredefinedType),
    /// A type declared somewhere in the solution, by full name.
    Named {
        /// Fully qualified name, e.g. `Demo.Person`.
        name: String,
        /// Generic arguments.
        args: Vec<Type>,
    },
    /// `T[]`, `T[,]`, ...
    Array {
        /// Element type.
        element: Box<Type>,
        /// Number of dimensions.
        rank: usize,
    },
    /// `T?`.
    Nullable(Box<Type>),
    /// Type of the `null` literal.
    Null,
    /// A type parameter of the enclosing generic type, such as `T` in
    /// `class Box<T>`.
    Parameter(String),
    /// A name that does not resolve to a declaration in the solution, such as
    /// a framework type. Compared by its written name.
    Unresolved {
        /// Name as written.
        name: String,
        /// Generic arguments.
        args: Vec<Type>,
    },
    /// An expression whose type cannot be determined.
    Unknown,
}

impl Type {
    /// Shorthand for a predefined type.
    #[must_use]
    pub fn predefined(ty: PredefinedType) -> Self {
        Self::Predefined(ty)
    }

    /// Returns the predefined type, if this is one.
    #[must_use]
    pub fn as_predefined(&self) -> Option<PredefinedType> {
        match self {
            Self::Predefined(p) => Some(*p),
            _ => None,
        }
    }

    /// Returns true when nothing is known about the type.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Returns true when the type was resolved against the solution or is
    /// built in.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        match self {
            Self::Predefined(_) | Self::Null | Self::Parameter(_) => true,
            Self::Named { args, .. } => args.iter().all(Self::is_resolved),
            Self::Array { element, .. } => element.is_resolved(),
            Self::Nullable(inner) => inner.is_resolved(),
            Self::Unresolved { .. } | Self::Unknown => false,
        }
    }

    /// Full name of a declared type.
    #[must_use]
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            Self::Named { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Replaces each type parameter named in `parameters` with the argument
    /// at the same position. Parameters without an argument are kept.
    #[must_use]
    pub fn substitute(&self, parameters: &[String], args: &[Type]) -> Type {
        let all = |types: &[Type]| -> Vec<Type> {
            types
                .iter()
                .map(|t| t.substitute(parameters, args))
                .collect()
        };
        match self {
            Self::Parameter(name) => parameters
                .iter()
                .position(|p| p == name)
                .and_then(|i| args.get(i))
                .cloned()
                .unwrap_or_else(|| self.clone()),
            Self::Named { name, args: own } => Self::Named {
                name: name.clone(),
                args: all(own),
            },
            Self::Unresolved { name, args: own } => Self::Unresolved {
                name: name.clone(),
                args: all(own),
            },
            Self::Array { element, rank } => Self::Array {
                element: Box::new(element.substitute(parameters, args)),
                rank: *rank,
            },
            Self::Nullable(inner) => Self::Nullable(Box::new(inner.substitute(parameters, args))),
            Self::Predefined(_) | Self::Null | Self::Unknown => self.clone(),
        }
    }
}

/// Type of `a op b` for arithmetic operators, following C# numeric promotion.
#[must_use]
pub fn binary_numeric_promotion(left: PredefinedType, right: PredefinedType) -> Option<PredefinedType> {
    use PredefinedType as P;
    if !left.is_numeric() || !right.is_numeric() {
        return None;
    }
    let either = |t: P| left == t || right == t;
    let signed_small = |t: P| matches!(t, P::SByte | P::Short | P::Int);
    Some(if either(P::Decimal) {
        P::Decimal
    } else if either(P::Double) {
        P::Double
    } else if either(P::Float) {
        P::Float
    } else if either(P::ULong) {
        P::ULong
    } else if either(P::Long) {
        P::Long
    } else if either(P::UInt) {
        if signed_small(left) || signed_small(right) {
            P::Long
        } else {
            P::UInt
        }
    } else {
        P::Int
    })
}

/// Type of `op a` for unary `+`, `-` and `~`.
#[must_use]
pub fn unary_numeric_promotion(operand: PredefinedType) -> Option<PredefinedType> {
    use PredefinedType as P;
    match operand {
        P::Byte | P::SByte | P::Short | P::UShort | P::Char => Some(P::Int),
        other if other.is_numeric() => Some(other),
        _ => None,
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_args(f: &mut fmt::Formatter<'_>, args: &[Type]) -> fmt::Result {
            if args.is_empty() {
                return Ok(());
            }
            f.write_str("<")?;
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")
        }

        match self {
            Self::Predefined(p) => f.write_str(p.keyword()),
            Self::Named { name, args } | Self::Unresolved { name, args } => {
                f.write_str(name)?;
                write_args(f, args)
            }
            Self::Array { element, rank } => {
                write!(f, "{element}[")?;
                for _ in 1..*rank {
                    f.write_str(",")?;
                }
                f.write_str("]")
            }
            Self::Nullable(inner) => write!(f, "{inner}?"),
            Self::Null => f.write_str("null"),
            Self::Parameter(name) => f.write_str(name),
            Self::Unknown => f.write_str("?"),
        }
    }
}
