pub(crate) mod lexer;
pub(crate) mod model;
pub(crate) mod parser;
pub(crate) mod segment;
