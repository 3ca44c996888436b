pub mod token;
pub mod lexer;

// Re-export all public types from modules
pub use token::{parse_number, Token, TokenKind};
pub use lexer::Lexer;

use protoclass_ast::Comment;

/// Tokenizes a whole unit, returning its tokens and comments.
pub fn lex(source: &str, file_id: usize) -> (Vec<Token>, Vec<Comment>) {
    let mut lexer = Lexer::with_file_id(source, file_id);
    let tokens = lexer.tokenize();
    let comments = lexer.take_comments();
    (tokens, comments)
}
