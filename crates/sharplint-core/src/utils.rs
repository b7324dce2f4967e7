//! Utility functions for rule and fix implementations.

pub mod text;

#[doc(inline)]
pub use text::{
    first_char_to_lower, first_char_to_upper, replace_first, starts_with_lowercase,
    starts_with_uppercase,
};
