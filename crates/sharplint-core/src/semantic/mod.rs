//! Semantic queries over a solution: symbols, types and name lookup.
//!
//! A [`Compilation`] indexes the declarations of every document once; a
//! [`SemanticModel`] answers questions about one document against it.
//!
//! Resolution is shallow: names resolve against types declared
//! in the solution and the built-in keyword types. Anything else, such as a
//! framework type, is kept as [`Type::Unresolved`] under its written name.
//! Type parameters of generic types become [`Type::Parameter`] and are
//! replaced by the type arguments when members are looked up.

mod compilation;
mod model;
mod symbol;
mod types;

pub use compilation::{Compilation, TypeInfo};
pub use model::SemanticModel;
pub use symbol::{Accessibility, Symbol, SymbolDeclaration, SymbolKind};
pub use types::{binary_numeric_promotion, unary_numeric_promotion, PredefinedType, Type};
