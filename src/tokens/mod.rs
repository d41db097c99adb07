//! Token definitions consumed by the grammar parser

pub mod token;

pub use token::{OwnedToken, Token, TokenClass};
