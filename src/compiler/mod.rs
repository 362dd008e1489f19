// Each step in the pipeline turns one datatype into another:
// ~> Source (string)
// -> Tokens              : lex.rs
// -> Tree (surface forms): parse.rs
// -> Tree (standardized)  : standardize.rs
// -> Control structures   : flatten.rs
// ~> Run (result)         : vm::machine

pub mod flatten;
pub mod lex;
pub mod parse;
pub mod standardize;
pub mod syntax;
pub mod token;
