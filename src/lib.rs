pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod reporter;
pub mod session;
pub mod token;
pub mod value;
