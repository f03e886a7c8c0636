pub use crate::ast::{Node, NodeKind};
pub use crate::errors::ParseError;
pub use crate::parser::{parse, Document};

pub mod ast;
pub mod cli;
pub mod emitter;
pub mod environment;
pub mod errors;
pub mod matcher;
pub mod parser;
