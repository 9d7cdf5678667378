//! janus_scanner: lexers for both source languages and the token stream
//! the parsers consume.
//!
//! Scanning is line-oriented: each token records its 1-based line and
//! column plus the byte range it covers within its line. Block-comment
//! state is the only thing carried across lines. Unknown bytes become
//! `Unknown` tokens; the lexer itself never emits a diagnostic.

mod lexicon;
mod scanner;
mod stream;
mod token;

pub use lexicon::Lexicon;
pub use scanner::tokenize;
pub use stream::TokenStream;
pub use token::Token;
