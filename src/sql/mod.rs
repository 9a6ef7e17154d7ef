pub mod ast;
pub mod keywords;
pub mod parser;
pub mod scanner;
pub mod token;
