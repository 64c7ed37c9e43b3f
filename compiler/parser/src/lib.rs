pub use crate::parser::{ParseError, Parser};

mod parser;
