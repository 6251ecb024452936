pub mod lexer;
pub mod parser;
pub mod term;

pub use lexer::{tokenize, Lexer, Token};
pub use parser::{parse, Parser, MAX_DEPTH};
pub use term::{classify_term, TermShape};
