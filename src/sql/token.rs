// SQL tokens for lexical analysis

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Identifier(String),
    Number(String),
    String(String),

    // Keywords
    Select,
    From,
    Where,
    And,
    Or,
    Not,
    In,
    Like,
    True,
    False,
    Null,
    Is,
    Between,
    Distinct,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,

    // Delimiters
    LeftParen,
    RightParen,
    Comma,
    Semicolon,
    Dot,

    // Special
    Illegal(char),
    UnterminatedString,
    UnterminatedIdentifier,
    Eof,
}

impl Token {
    /// Check if the token is a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            Token::Select
                | Token::From
                | Token::Where
                | Token::And
                | Token::Or
                | Token::Not
                | Token::In
                | Token::Like
                | Token::True
                | Token::False
                | Token::Null
                | Token::Is
                | Token::Between
                | Token::Distinct
        )
    }

    /// Convert a string to a keyword token if it matches.
    ///
    /// Only words the condition grammar itself needs are reserved; clause
    /// words such as `ORDER` or `LIMIT` stay usable as column names.
    pub fn keyword_from_str(s: &str) -> Option<Token> {
        match s.to_uppercase().as_str() {
            "SELECT" => Some(Token::Select),
            "FROM" => Some(Token::From),
            "WHERE" => Some(Token::Where),
            "AND" => Some(Token::And),
            "OR" => Some(Token::Or),
            "NOT" => Some(Token::Not),
            "IN" => Some(Token::In),
            "LIKE" => Some(Token::Like),
            "TRUE" => Some(Token::True),
            "FALSE" => Some(Token::False),
            "NULL" => Some(Token::Null),
            "IS" => Some(Token::Is),
            "BETWEEN" => Some(Token::Between),
            "DISTINCT" => Some(Token::Distinct),
            _ => None,
        }
    }
}
