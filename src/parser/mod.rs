mod error;
pub mod expression;
pub mod formatter;
pub mod statement;

use compact_str::CompactString;
pub use error::{ParserError, ParserErrorKind};
use expression::{Expression, LiteralValue};
use statement::{Program, Statement};

use crate::token::{Literal, Span, SpanIndex, Token, TokenKind};

type ParseRule = fn(&mut Parser) -> Result<Expression, ParserError>;

/// Deepest allowed nesting of groupings, unary operators, assignments and blocks.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Recursive descent parser over a scanned token sequence.
///
/// Precedence, loosest first: comma, assignment, ternary, equality, comparison, term,
/// factor, unary, primary.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    depth: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let (span, line) = match tokens.last() {
                Some(last) => (Span::new(last.span.end(), last.span.end()), last.line),
                None => (Span::new(SpanIndex::new(0), SpanIndex::new(0)), 1),
            };
            tokens.push(Token {
                kind: TokenKind::Eof,
                lexeme: CompactString::default(),
                literal: None,
                span,
                line,
            });
        }
        Self {
            tokens,
            current: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> &Token {
        // The constructor guarantees a trailing `Eof` and `advance` never steps past it.
        &self.tokens[self.current]
    }

    fn previous_kind(&self) -> Option<TokenKind> {
        let index = self.current.checked_sub(1)?;
        self.tokens.get(index).map(|token| token.kind)
    }

    fn is_at_end(&self) -> bool {
        self.peek().is_eof()
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !token.is_eof() {
            self.current += 1;
        }
        token
    }

    fn eat_if(&mut self, kinds: &[TokenKind]) -> Option<Token> {
        if kinds.contains(&self.peek().kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn expect(
        &mut self,
        expected: TokenKind,
        kind: ParserErrorKind,
    ) -> Result<Token, ParserError> {
        if self.check(expected) {
            Ok(self.advance())
        } else {
            Err(self.error(kind))
        }
    }

    fn error(&self, kind: ParserErrorKind) -> ParserError {
        ParserError {
            kind,
            token: self.peek().clone(),
        }
    }

    /// Runs `rule` one nesting level deeper, failing once the nesting limit is reached.
    fn nested<T>(
        &mut self,
        rule: impl FnOnce(&mut Self) -> Result<T, ParserError>,
    ) -> Result<T, ParserError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error(ParserErrorKind::ExcessiveNesting));
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    /// Skips tokens until just past a `;` or just before a keyword that starts a statement.
    pub fn synchronize(&mut self) {
        let _ = self.advance();
        while !self.is_at_end() {
            if self.previous_kind() == Some(TokenKind::Semicolon) {
                return;
            }
            if self.peek().kind.starts_statement() {
                return;
            }
            let _ = self.advance();
        }
    }
}

// Expressions
impl Parser {
    pub fn parse_expression(&mut self) -> Result<Expression, ParserError> {
        log::trace!("Parsing expression starting at token {}", self.current);
        self.nested(Self::parse_comma)
    }

    fn parse_comma(&mut self) -> Result<Expression, ParserError> {
        let mut lhs = self.parse_assignment()?;
        while let Some(operator) = self.eat_if(&[TokenKind::Comma]) {
            let rhs = self.parse_assignment()?;
            lhs = Expression::binary(lhs, operator, rhs);
        }
        Ok(lhs)
    }

    fn parse_assignment(&mut self) -> Result<Expression, ParserError> {
        let target = self.parse_ternary()?;
        let Some(equals) = self.eat_if(&[TokenKind::Equal]) else {
            return Ok(target);
        };
        let value = self.nested(Self::parse_assignment)?;
        match target {
            Expression::Variable(name) => Ok(Expression::Assign {
                name,
                value: Box::new(value),
            }),
            _ => Err(ParserError {
                kind: ParserErrorKind::InvalidLValue,
                token: equals,
            }),
        }
    }

    fn parse_ternary(&mut self) -> Result<Expression, ParserError> {
        let condition = self.parse_equality()?;
        let Some(question) = self.eat_if(&[TokenKind::Question]) else {
            return Ok(condition);
        };
        let success = self.parse_expression()?;
        let colon = self.expect(TokenKind::Colon, ParserErrorKind::MissingColon)?;
        let failure = self.parse_equality()?;
        Ok(Expression::Ternary {
            condition: Box::new(condition),
            question,
            success: Box::new(success),
            colon,
            failure: Box::new(failure),
        })
    }

    fn parse_equality(&mut self) -> Result<Expression, ParserError> {
        const OPERATORS: &[TokenKind] = &[TokenKind::BangEqual, TokenKind::EqualEqual];
        self.parse_left_associative(OPERATORS, OPERATORS, Self::parse_comparison)
    }

    fn parse_comparison(&mut self) -> Result<Expression, ParserError> {
        const OPERATORS: &[TokenKind] = &[
            TokenKind::GreaterThan,
            TokenKind::GreaterThanEqual,
            TokenKind::LessThan,
            TokenKind::LessThanEqual,
        ];
        self.parse_left_associative(OPERATORS, OPERATORS, Self::parse_term)
    }

    fn parse_term(&mut self) -> Result<Expression, ParserError> {
        // A leading `-` is a negation, only a leading `+` is missing its left operand.
        self.parse_left_associative(
            &[TokenKind::Plus, TokenKind::Minus],
            &[TokenKind::Plus],
            Self::parse_factor,
        )
    }

    fn parse_factor(&mut self) -> Result<Expression, ParserError> {
        const OPERATORS: &[TokenKind] = &[TokenKind::Slash, TokenKind::Star];
        self.parse_left_associative(OPERATORS, OPERATORS, Self::parse_unary)
    }

    fn parse_left_associative(
        &mut self,
        operators: &[TokenKind],
        leading: &[TokenKind],
        operand: ParseRule,
    ) -> Result<Expression, ParserError> {
        if let Some(operator) = self.eat_if(leading) {
            // Consume the right operand anyway so the stream stays in step for diagnostics.
            let _ = operand(self)?;
            return Err(ParserError {
                kind: ParserErrorKind::MissingLeftOperand,
                token: operator,
            });
        }

        let mut lhs = operand(self)?;
        while let Some(operator) = self.eat_if(operators) {
            let rhs = operand(self)?;
            lhs = Expression::binary(lhs, operator, rhs);
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expression, ParserError> {
        if let Some(operator) = self.eat_if(&[TokenKind::Bang, TokenKind::Minus]) {
            let rhs = self.nested(Self::parse_unary)?;
            return Ok(Expression::unary(operator, rhs));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expression, ParserError> {
        let expression = match self.peek().kind {
            TokenKind::KeywordFalse => Expression::Literal(LiteralValue::Bool(false)),
            TokenKind::KeywordTrue => Expression::Literal(LiteralValue::Bool(true)),
            TokenKind::KeywordNil => Expression::Literal(LiteralValue::Nil),
            TokenKind::NumericLiteral | TokenKind::StringLiteral => {
                let value = match self.peek().literal {
                    Some(Literal::Number(v)) => LiteralValue::Number(v),
                    Some(Literal::String(ref v)) => LiteralValue::String(v.clone()),
                    None => unreachable!("Literal tokens always carry their decoded value."),
                };
                Expression::Literal(value)
            }
            TokenKind::Ident => Expression::Variable(self.peek().clone()),
            TokenKind::LeftParenthesis => {
                let _ = self.advance();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RightParenthesis, ParserErrorKind::UnclosedGroup)?;
                return Ok(Expression::Grouping(Box::new(inner)));
            }
            _ => return Err(self.error(ParserErrorKind::NonExpression)),
        };
        let _ = self.advance();
        Ok(expression)
    }
}

// Statements
impl Parser {
    /// Parses a whole program, recovering after each error so that every error is found.
    pub fn parse(&mut self) -> Result<Program, Vec<ParserError>> {
        let mut statements = Vec::new();
        let mut errors = Vec::new();

        while !self.is_at_end() {
            match self.parse_declaration() {
                Ok(statement) => statements.push(statement),
                Err(error) => {
                    log::trace!("Recovering from parse error on line {}", error.line());
                    errors.push(error);
                    self.synchronize();
                }
            }
        }

        log::debug!(
            "Parsed {} statements with {} parse errors",
            statements.len(),
            errors.len()
        );
        if errors.is_empty() {
            Ok(Program::new(statements))
        } else {
            Err(errors)
        }
    }

    fn parse_declaration(&mut self) -> Result<Statement, ParserError> {
        if self.eat_if(&[TokenKind::KeywordVar]).is_some() {
            self.parse_variable_declaration()
        } else {
            self.parse_statement()
        }
    }

    fn parse_variable_declaration(&mut self) -> Result<Statement, ParserError> {
        let name = self.expect(TokenKind::Ident, ParserErrorKind::MissingVariableName)?;
        let initial = match self.eat_if(&[TokenKind::Equal]) {
            Some(_) => Some(self.parse_expression()?),
            None => None,
        };
        self.expect(
            TokenKind::Semicolon,
            ParserErrorKind::MissingSemicolon("variable declaration"),
        )?;
        Ok(Statement::Var { name, initial })
    }

    fn parse_statement(&mut self) -> Result<Statement, ParserError> {
        match self.peek().kind {
            TokenKind::KeywordPrint => {
                let _ = self.advance();
                let value = self.parse_expression()?;
                self.expect(TokenKind::Semicolon, ParserErrorKind::MissingSemicolon("value"))?;
                Ok(Statement::Print(value))
            }
            TokenKind::LeftBrace => {
                let _ = self.advance();
                self.nested(Self::parse_block)
            }
            _ => {
                let expression = self.parse_expression()?;
                self.expect(
                    TokenKind::Semicolon,
                    ParserErrorKind::MissingSemicolon("expression"),
                )?;
                Ok(Statement::Expression(expression))
            }
        }
    }

    fn parse_block(&mut self) -> Result<Statement, ParserError> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            statements.push(self.parse_declaration()?);
        }
        self.expect(TokenKind::RightBrace, ParserErrorKind::UnclosedBlock)?;
        Ok(Statement::Block(statements))
    }
}
