pub mod ast;
pub mod codegen;
pub mod driver;
pub mod error;
pub mod lex;
pub mod parse;

pub use ast::{Attr, AttrKind, BindingForm, Node, NodeClass};
pub use codegen::{GenResult, StaticPart, StaticParts, TempAlloc, generate, generate_nodes, generate_root};
pub use driver::compile_source;
pub use error::{CompileError, GenerateError, LexError, ParseError, SourceError, format_source_error};
pub use lex::{Delim, Token, TokenAttr, TokenKind, lex};
pub use parse::parse;
