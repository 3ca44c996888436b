//! Core Parser struct and main parsing methods

use super::*;

/// Recursive descent parser for ECMAScript source units.
///
/// Builds a [`SyntaxTree`] arena: every statement becomes a slot carrying its
/// leading trivia, its attached comments and the end of any same-line
/// trailing comment, so unchanged regions can be printed back verbatim.
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) current: usize,
    pub(crate) tree: SyntaxTree,
    pub(crate) comments: Vec<Comment>,
    pub(crate) errors: Vec<ParseError>,
    /// Leading trivia never starts before this offset
    pub(crate) trivia_floor: usize,
    /// `in` is not a binary operator while parsing a for-loop head
    pub(crate) no_in: bool,
}

impl Parser {
    /// Creates a new parser from a token stream and the comments the lexer
    /// collected, both produced from `source`.
    pub fn new(source: impl Into<String>, tokens: Vec<Token>, comments: Vec<Comment>) -> Self {
        let source = source.into();
        let mut tokens = tokens;
        if tokens.last().map_or(true, |token| token.kind != TokenKind::Eof) {
            let end = source.len();
            let file_id = tokens.first().map_or(0, |token| token.span.file_id);
            tokens.push(Token {
                kind: TokenKind::Eof,
                span: Span::new(end, end, file_id),
                value: String::new(),
                newline_before: false,
            });
        }
        let file_id = tokens[0].span.file_id;

        Self {
            tokens,
            current: 0,
            tree: SyntaxTree::new(source, file_id),
            comments,
            errors: Vec::new(),
            trivia_floor: 0,
            no_in: false,
        }
    }

    /// Parses a complete program
    pub fn parse_program(mut self) -> Result<SyntaxTree, Vec<ParseError>> {
        let stmts = self.parse_statement_list(|_| false);
        let trailing_start = self.list_trailing_start(&stmts, 0);
        self.tree.set_root_stmts(stmts, trailing_start);

        if !self.errors.is_empty() {
            return Err(self.errors);
        }

        let comments = std::mem::take(&mut self.comments);
        self.tree.set_comments(comments);
        self.tree.link_parents();
        Ok(self.tree)
    }

    // =========================================================================
    // Statement slots and trivia
    // =========================================================================

    /// Parses statements until `is_end` accepts the current token or input runs
    /// out, recovering from errors at statement boundaries.
    pub(crate) fn parse_statement_list(&mut self, is_end: fn(TokenKind) -> bool) -> Vec<StmtId> {
        let mut stmts = Vec::new();

        while !self.is_at_end() && !is_end(self.current_token().kind) {
            match self.parse_statement() {
                Ok(id) => stmts.push(id),
                Err(err) => {
                    self.errors.push(err);
                    self.synchronize();
                }
            }
        }

        stmts
    }

    pub(crate) fn list_trailing_start(&self, stmts: &[StmtId], open_end: usize) -> usize {
        stmts
            .last()
            .map_or(open_end, |id| self.tree.slot(*id).trailing_end.max(open_end))
    }

    /// Start of the current statement's leading trivia.
    pub(crate) fn leading_start(&self) -> usize {
        let previous_end = if self.current == 0 {
            0
        } else {
            self.previous_token().span.end
        };
        previous_end.max(self.trivia_floor)
    }

    /// Allocates the slot for a statement that spans `span`.
    pub(crate) fn finish_statement(&mut self, stmt: Stmt, leading_start: usize, span: Span) -> StmtId {
        let trailing_end = self.trailing_comment_end(span.end);
        self.trivia_floor = self.trivia_floor.max(trailing_end);

        let leading_start = leading_start.min(span.start);
        let comments = self.comments_between(leading_start, span.start);
        let leading = Span::new(leading_start, span.start, self.tree.file_id);

        self.tree
            .alloc_stmt(Node::new(stmt, span), leading, trailing_end, comments)
    }

    /// End of the comments that follow `end` on the same line, before the next token.
    fn trailing_comment_end(&self, end: usize) -> usize {
        let next_start = self.current_token().span.start;
        let first = self.comments.partition_point(|c| c.span.start < end);
        let mut trailing = end;

        for comment in &self.comments[first..] {
            if comment.span.start >= next_start {
                break;
            }
            let gap = &self.tree.source[trailing..comment.span.start];
            if gap.contains(|c| c == '\n' || c == '\r') {
                break;
            }
            trailing = comment.span.end;
            if comment.kind == CommentKind::Line {
                break;
            }
        }

        trailing
    }

    fn comments_between(&self, start: usize, end: usize) -> Vec<Comment> {
        let first = self.comments.partition_point(|c| c.span.start < start);
        self.comments[first..]
            .iter()
            .take_while(|c| c.span.end <= end)
            .cloned()
            .collect()
    }

    // =========================================================================
    // Import/Export
    // =========================================================================

    pub(crate) fn parse_import_decl(&mut self) -> ParseResult<ImportDecl> {
        self.consume(TokenKind::Import)?;

        let mut specifiers = Vec::new();

        // import "module"
        if self.check(&TokenKind::StringLiteral) {
            let source = self.advance().value.clone();
            self.consume_semicolon()?;
            return Ok(ImportDecl { specifiers, source });
        }

        // import defaultName from "module"
        if self.current_token().kind.is_identifier_like() {
            let name = self.parse_identifier()?;
            specifiers.push(ImportSpecifier::Default(name));

            if self.check(&TokenKind::Comma) {
                self.advance();
            } else {
                self.consume(TokenKind::From)?;
                let source = self.consume(TokenKind::StringLiteral)?.value.clone();
                self.consume_semicolon()?;
                return Ok(ImportDecl { specifiers, source });
            }
        }

        // import * as name from "module"
        if self.check(&TokenKind::Star) {
            self.advance();
            self.consume(TokenKind::As)?;
            let name = self.parse_identifier()?;
            specifiers.push(ImportSpecifier::Namespace(name));
        }
        // import { a, b as c } from "module"
        else if self.check(&TokenKind::LBrace) {
            self.advance();

            while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
                let imported = self.parse_module_export_name()?;
                let local = if self.check(&TokenKind::As) {
                    self.advance();
                    Some(self.parse_identifier()?)
                } else {
                    None
                };

                specifiers.push(ImportSpecifier::Named { imported, local });

                if !self.check(&TokenKind::RBrace) {
                    self.consume(TokenKind::Comma)?;
                }
            }

            self.consume(TokenKind::RBrace)?;
        }

        self.consume(TokenKind::From)?;
        let source = self.consume(TokenKind::StringLiteral)?.value.clone();
        self.consume_semicolon()?;

        Ok(ImportDecl { specifiers, source })
    }

    pub(crate) fn parse_export_decl(&mut self) -> ParseResult<ExportDecl> {
        self.consume(TokenKind::Export)?;

        // export default
        if self.check(&TokenKind::Default) {
            self.advance();

            if self.is_named_declaration_ahead() {
                let decl = self.parse_statement()?;
                return Ok(ExportDecl::DefaultDecl(decl));
            }

            let expr = self.parse_assignment_expression()?;
            self.consume_semicolon()?;
            return Ok(ExportDecl::Default(expr));
        }

        // export * from "module"
        if self.check(&TokenKind::Star) {
            self.advance();

            let as_name = if self.check(&TokenKind::As) {
                self.advance();
                Some(self.parse_module_export_name()?)
            } else {
                None
            };

            self.consume(TokenKind::From)?;
            let source = self.consume(TokenKind::StringLiteral)?.value.clone();
            self.consume_semicolon()?;

            return Ok(ExportDecl::All { source, as_name });
        }

        // export { ... }
        if self.check(&TokenKind::LBrace) {
            self.advance();
            let mut specifiers = Vec::new();

            while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
                let local = self.parse_module_export_name()?;
                let exported = if self.check(&TokenKind::As) {
                    self.advance();
                    Some(self.parse_module_export_name()?)
                } else {
                    None
                };

                specifiers.push(ExportSpecifier { local, exported });

                if !self.check(&TokenKind::RBrace) {
                    self.consume(TokenKind::Comma)?;
                }
            }

            self.consume(TokenKind::RBrace)?;

            let source = if self.check(&TokenKind::From) {
                self.advance();
                Some(self.consume(TokenKind::StringLiteral)?.value.clone())
            } else {
                None
            };

            self.consume_semicolon()?;

            return Ok(ExportDecl::Named { specifiers, source });
        }

        // export declaration
        match self.current_token().kind {
            TokenKind::Var
            | TokenKind::Let
            | TokenKind::Const
            | TokenKind::Function
            | TokenKind::Class
            | TokenKind::Async => {
                let decl = self.parse_statement()?;
                Ok(ExportDecl::Decl(decl))
            }
            kind => Err(self.error(format!("Unexpected token after export: {:?}", kind))),
        }
    }

    /// `function name`, `async function name` or `class name`
    fn is_named_declaration_ahead(&self) -> bool {
        let offset = match self.current_token().kind {
            TokenKind::Class => 1,
            TokenKind::Function => {
                if self.peek_kind(1) == Some(&TokenKind::Star) {
                    2
                } else {
                    1
                }
            }
            TokenKind::Async if self.peek_kind(1) == Some(&TokenKind::Function) => {
                if self.peek_kind(2) == Some(&TokenKind::Star) {
                    3
                } else {
                    2
                }
            }
            _ => return false,
        };
        self.peek_kind(offset).map_or(false, |kind| kind.is_identifier_like())
    }

    /// Names in import/export lists may be keywords (`default`) or strings.
    fn parse_module_export_name(&mut self) -> ParseResult<Node<Ident>> {
        if self.check(&TokenKind::StringLiteral) {
            let token = self.advance();
            return Ok(Node::new(Ident::new(token.value.clone()), token.span));
        }
        self.parse_member_name()
    }
}
