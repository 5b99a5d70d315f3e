// SQL parser - converts tokens to a SELECT statement or a bare condition

use super::ast::*;
use super::lexer::Lexer;
use super::token::Token;
use crate::expression::{BinaryOperator, Expression};
use crate::value::Value;
use anyhow::{anyhow, bail, Result};

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(sql: &str) -> Self {
        let tokens = Lexer::new(sql).tokenize();
        Parser {
            tokens,
            position: 0,
        }
    }

    /// Parse `SELECT <projection> FROM <table> [WHERE <condition>] [;]`.
    ///
    /// Everything beyond a single-table select with an optional WHERE clause
    /// is rejected.
    pub fn parse_select(&mut self) -> Result<SelectStatement> {
        match self.current_token() {
            Token::Select => self.advance(),
            Token::Eof => bail!("empty query"),
            Token::Identifier(word) => bail!("unsupported statement: {}", word.to_uppercase()),
            token @ (Token::UnterminatedString | Token::UnterminatedIdentifier) => {
                return Err(unexpected(token))
            }
            other => bail!("unsupported statement: {:?}", other),
        }

        if self.match_token(&Token::Distinct) {
            bail!("SELECT DISTINCT is unsupported");
        }

        let projection = self.parse_projection()?;

        self.expect_token(Token::From)?;
        let table = self.expect_identifier()?;

        if self.match_token(&Token::Comma) {
            let mut tables = 1;
            while self.match_token(&Token::Comma) {
                self.advance();
                self.expect_identifier()?;
                tables += 1;
            }
            bail!("multiple from clauses are unsupported: {}", tables);
        }

        let where_clause = if self.match_token(&Token::Where) {
            self.advance();
            Some(self.parse_expression()?)
        } else {
            None
        };

        self.expect_end()?;

        Ok(SelectStatement {
            projection,
            table,
            where_clause,
        })
    }

    /// Parse a bare condition, i.e. the text after `WHERE`
    pub fn parse_condition(&mut self) -> Result<Expression> {
        if self.match_token(&Token::Eof) {
            bail!("empty condition");
        }
        let expr = self.parse_expression()?;
        self.expect_end()?;
        Ok(expr)
    }

    /// Parse `*` or a list of column names
    fn parse_projection(&mut self) -> Result<Projection> {
        if self.match_token(&Token::Star) {
            self.advance();
            return Ok(Projection::AllColumns);
        }

        let mut columns = vec![self.expect_identifier()?];
        while self.match_token(&Token::Comma) {
            self.advance();
            columns.push(self.expect_identifier()?);
        }
        Ok(Projection::Columns(columns))
    }

    /// Optional `;` followed by end of input
    fn expect_end(&mut self) -> Result<()> {
        if self.match_token(&Token::Semicolon) {
            self.advance();
        }

        match self.current_token() {
            Token::Eof => Ok(()),
            Token::Identifier(word) => match word.to_uppercase().as_str() {
                "JOIN" | "INNER" | "LEFT" | "RIGHT" | "FULL" | "CROSS" => {
                    bail!("joins are unsupported")
                }
                "GROUP" => bail!("GROUP BY is unsupported"),
                "HAVING" => bail!("HAVING is unsupported"),
                "ORDER" => bail!("ORDER BY is unsupported"),
                "LIMIT" | "OFFSET" => bail!("LIMIT and OFFSET are unsupported"),
                "UNION" => bail!("UNION is unsupported"),
                _ => Err(unexpected(Token::Identifier(word))),
            },
            other => Err(unexpected(other)),
        }
    }

    /// Parse expression
    fn parse_expression(&mut self) -> Result<Expression> {
        self.parse_or()
    }

    /// Parse OR expression
    fn parse_or(&mut self) -> Result<Expression> {
        let mut left = self.parse_and()?;

        while self.match_token(&Token::Or) {
            self.advance();
            let right = self.parse_and()?;
            left = Expression::or(left, right);
        }

        Ok(left)
    }

    /// Parse AND expression
    fn parse_and(&mut self) -> Result<Expression> {
        let mut left = self.parse_not()?;

        while self.match_token(&Token::And) {
            self.advance();
            let right = self.parse_not()?;
            left = Expression::and(left, right);
        }

        Ok(left)
    }

    /// Parse NOT expression
    fn parse_not(&mut self) -> Result<Expression> {
        if self.match_token(&Token::Not) {
            self.advance();
            let operand = self.parse_not()?;
            Ok(Expression::not_expr(operand))
        } else {
            self.parse_comparison()
        }
    }

    /// Parse comparison expression
    fn parse_comparison(&mut self) -> Result<Expression> {
        let left = self.parse_operand()?;
        self.reject_arithmetic()?;

        // NOT IN / NOT LIKE negate the whole test
        let negated = match (self.current_token(), self.peek_token()) {
            (Token::Not, Token::In) | (Token::Not, Token::Like) => {
                self.advance();
                true
            }
            _ => false,
        };

        let expr = match self.current_token() {
            Token::In => {
                self.advance();
                self.expect_token(Token::LeftParen)?;
                let list = self.parse_operand_list()?;
                self.expect_token(Token::RightParen)?;
                Expression::InList {
                    expression: Box::new(left),
                    list,
                }
            }
            Token::Like => {
                self.advance();
                let pattern = self.parse_operand()?;
                Expression::binary_op(left, BinaryOperator::Like, pattern)
            }
            Token::Is => bail!("IS [NOT] NULL is unsupported"),
            Token::Between => bail!("BETWEEN is unsupported"),
            token => {
                let op = match token {
                    Token::Equal => BinaryOperator::Eq,
                    Token::NotEqual => BinaryOperator::NotEq,
                    Token::Less => BinaryOperator::Lt,
                    Token::LessEqual => BinaryOperator::LtEq,
                    Token::Greater => BinaryOperator::Gt,
                    Token::GreaterEqual => BinaryOperator::GtEq,
                    _ => return Ok(left),
                };
                self.advance();
                let right = self.parse_operand()?;
                Expression::binary_op(left, op, right)
            }
        };
        self.reject_arithmetic()?;

        Ok(if negated {
            Expression::not_expr(expr)
        } else {
            expr
        })
    }

    /// Parse a column, literal or parenthesized expression
    fn parse_operand(&mut self) -> Result<Expression> {
        match self.current_token() {
            Token::Number(n) => {
                self.advance();
                Ok(Expression::Literal(parse_number(&n)?))
            }
            Token::Minus => {
                self.advance();
                match self.current_token() {
                    Token::Number(n) => {
                        self.advance();
                        Ok(Expression::Literal(parse_number(&format!("-{}", n))?))
                    }
                    _ => bail!("arithmetic expressions are unsupported"),
                }
            }
            Token::String(s) => {
                self.advance();
                Ok(Expression::Literal(Value::Text(s)))
            }
            Token::True => {
                self.advance();
                Ok(Expression::Literal(Value::Boolean(true)))
            }
            Token::False => {
                self.advance();
                Ok(Expression::Literal(Value::Boolean(false)))
            }
            Token::Null => bail!("NULL literals are unsupported"),
            Token::Identifier(name) => {
                self.advance();
                match self.current_token() {
                    Token::Dot => bail!("qualified column names are unsupported: {}.", name),
                    Token::LeftParen => bail!("function calls are unsupported: {}()", name),
                    _ => Ok(Expression::Column(name)),
                }
            }
            Token::LeftParen => {
                self.advance();
                if self.match_token(&Token::Select) {
                    bail!("subqueries are unsupported");
                }
                let expr = self.parse_expression()?;
                self.expect_token(Token::RightParen)?;
                Ok(Expression::nested(expr))
            }
            other => Err(unexpected(other)),
        }
    }

    /// Parse the items of an IN list, which may be empty
    fn parse_operand_list(&mut self) -> Result<Vec<Expression>> {
        let mut items = vec![];
        match self.current_token() {
            Token::RightParen => return Ok(items),
            Token::Select => bail!("subqueries are unsupported"),
            _ => {}
        }

        loop {
            items.push(self.parse_operand()?);
            if !self.match_token(&Token::Comma) {
                break;
            }
            self.advance();
        }

        Ok(items)
    }

    fn reject_arithmetic(&self) -> Result<()> {
        match self.current_token() {
            Token::Plus | Token::Minus | Token::Star | Token::Slash | Token::Percent => {
                bail!("arithmetic expressions are unsupported")
            }
            _ => Ok(()),
        }
    }

    // Helper methods

    /// Get current token
    fn current_token(&self) -> Token {
        self.tokens
            .get(self.position)
            .cloned()
            .unwrap_or(Token::Eof)
    }

    /// Get the token after the current one
    fn peek_token(&self) -> Token {
        self.tokens
            .get(self.position + 1)
            .cloned()
            .unwrap_or(Token::Eof)
    }

    /// Advance to next token
    fn advance(&mut self) {
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
    }

    /// Check if current token matches
    fn match_token(&self, token: &Token) -> bool {
        self.current_token() == *token
    }

    /// Expect a specific token
    fn expect_token(&mut self, token: Token) -> Result<()> {
        if self.current_token() == token {
            self.advance();
            Ok(())
        } else {
            match self.current_token() {
                found @ (Token::UnterminatedString | Token::UnterminatedIdentifier) => {
                    Err(unexpected(found))
                }
                found => bail!("Expected {:?}, found {:?}", token, found),
            }
        }
    }

    /// Expect an identifier
    fn expect_identifier(&mut self) -> Result<String> {
        match self.current_token() {
            Token::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            token if token.is_keyword() => bail!(
                "Expected identifier, found reserved keyword {:?}; quote it as `{}` to use it as a name",
                token,
                format!("{:?}", token).to_lowercase()
            ),
            token @ (Token::UnterminatedString | Token::UnterminatedIdentifier) => {
                Err(unexpected(token))
            }
            token => bail!("Expected identifier, found {:?}", token),
        }
    }
}

/// Error for a token that cannot appear where it was found
fn unexpected(token: Token) -> anyhow::Error {
    match token {
        Token::UnterminatedString => anyhow!("unterminated string literal"),
        Token::UnterminatedIdentifier => anyhow!("unterminated quoted identifier"),
        token if token.is_keyword() => anyhow!(
            "Unexpected token: {:?} (reserved keyword; quote column names with backticks)",
            token
        ),
        token => anyhow!("Unexpected token: {:?}", token),
    }
}

/// Integers become `i64`, anything with a decimal point `f64`
fn parse_number(text: &str) -> Result<Value> {
    if text.contains('.') {
        text.parse::<f64>()
            .map(Value::Float)
            .map_err(|e| anyhow!("Invalid number {}: {}", text, e))
    } else {
        text.parse::<i64>()
            .map(Value::Integer)
            .map_err(|e| anyhow!("Invalid integer {}: {}", text, e))
    }
}
