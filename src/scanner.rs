use crate::error::Error;
use crate::token::{LineNumber, Token, TokenType};

pub struct Scanner {
  pub chars: Vec<char>,

  start: usize,
  current: usize,
  line: LineNumber,
}

impl Scanner {
  pub fn new(source: &str) -> Self {
    Self {
      chars: source.chars().collect(),
      start: 0,
      current: 0,
      line: 1,
    }
  }

  pub fn get_token(&mut self) -> Token {
    self.skip_whitespace();
    self.start = self.current;

    if self.at_end() {
      return self.make_token(TokenType::EndOfFile);
    }

    let character = self.advance();
    match character {
      '0'..='9' => self.number_token(),
      '_' | 'a'..='z' | 'A'..='Z' => self.identifier_token(),
      '"' => self.string_token(),
      '(' => self.make_token(TokenType::LeftParen),
      ')' => self.make_token(TokenType::RightParen),
      '{' => self.make_token(TokenType::LeftBrace),
      '}' => self.make_token(TokenType::RightBrace),
      ',' => self.make_token(TokenType::Comma),
      ';' => self.make_token(TokenType::Semicolon),
      '-' => self.make_token(TokenType::Minus),
      '+' => self.make_token(TokenType::Plus),
      '/' => self.make_token(TokenType::Slash),
      '*' => self.make_token(TokenType::Star),
      '!' => self.two_character_token('=', TokenType::BangEqual, TokenType::Bang),
      '=' => self.two_character_token('=', TokenType::EqualEqual, TokenType::Equal),
      '<' => self.two_character_token('=', TokenType::LessEqual, TokenType::Less),
      '>' => self.two_character_token('=', TokenType::GreaterEqual, TokenType::Greater),
      _ => self.error_token(Error::UnknownCharacter),
    }
  }

  fn at_end(&self) -> bool {
    self.current >= self.chars.len()
  }

  fn advance(&mut self) -> char {
    self.current += 1;
    self.chars[self.current - 1]
  }

  fn peek(&self) -> Option<&char> {
    self.chars.get(self.current)
  }

  fn peek_next(&self) -> Option<&char> {
    self.chars.get(self.current + 1)
  }

  fn peek_equals(&self, expected: char) -> bool {
    match self.peek() {
      Some(c) => *c == expected,
      _ => false,
    }
  }

  fn two_character_token(
    &mut self,
    expected: char,
    double: TokenType,
    single: TokenType,
  ) -> Token {
    if self.peek_equals(expected) {
      self.advance();
      self.make_token(double)
    } else {
      self.make_token(single)
    }
  }

  fn make_token(&self, token_type: TokenType) -> Token {
    Token {
      token_type,
      line: self.line,
      start: self.start,
      end: self.current,
      error_value: None,
    }
  }

  fn error_token(&self, error: Error) -> Token {
    Token {
      token_type: TokenType::Error,
      line: self.line,
      start: self.start,
      end: self.current,
      error_value: Some(error),
    }
  }

  fn skip_whitespace(&mut self) {
    loop {
      match self.peek() {
        Some(' ' | '\t' | '\r') => {
          self.advance();
        }
        Some('\n') => {
          self.advance();
          self.line += 1;
        }
        // Skip comments
        Some('/') => match self.peek_next() {
          Some('/') => {
            while !self.peek_equals('\n') && !self.at_end() {
              self.advance();
            }
          }
          _ => break,
        },
        _ => break,
      };
    }
  }

  fn string_token(&mut self) -> Token {
    while !self.peek_equals('"') && !self.at_end() {
      if self.peek_equals('\n') {
        self.line += 1;
      }
      self.advance();
    }

    if self.at_end() {
      self.error_token(Error::UnterminatedString)
    } else {
      self.advance(); // closing quote
      self.make_token(TokenType::String)
    }
  }

  fn number_token(&mut self) -> Token {
    while is_digit(self.peek()) {
      self.advance();
    }

    if self.peek_equals('.') && is_digit(self.peek_next()) {
      self.advance();
      while is_digit(self.peek()) {
        self.advance();
      }
    }

    self.make_token(TokenType::Number)
  }

  fn identifier_token(&mut self) -> Token {
    while is_alpha(self.peek()) || is_digit(self.peek()) {
      self.advance();
    }

    self.make_token(self.identifier_type())
  }

  fn identifier_type(&self) -> TokenType {
    match self.chars.get(self.start) {
      Some('a') => self.check_keyword("and", TokenType::And),
      Some('e') => self.check_keyword("else", TokenType::Else),
      Some('f') => match self.chars.get(self.start + 1) {
        Some('a') => self.check_keyword("false", TokenType::False),
        Some('o') => self.check_keyword("for", TokenType::For),
        Some('u') => self.check_keyword("fun", TokenType::Fun),
        _ => TokenType::Identifier,
      },
      Some('i') => self.check_keyword("if", TokenType::If),
      Some('n') => self.check_keyword("nil", TokenType::Nil),
      Some('o') => self.check_keyword("or", TokenType::Or),
      Some('p') => self.check_keyword("print", TokenType::Print),
      Some('r') => self.check_keyword("return", TokenType::Return),
      Some('t') => self.check_keyword("true", TokenType::True),
      Some('v') => self.check_keyword("var", TokenType::Var),
      Some('w') => self.check_keyword("while", TokenType::While),
      _ => TokenType::Identifier,
    }
  }

  fn check_keyword(&self, keyword: &str, token_type: TokenType) -> TokenType {
    let lexeme: String = self.chars[self.start..self.current].iter().collect();

    if lexeme == *keyword {
      token_type
    } else {
      TokenType::Identifier
    }
  }
}

fn is_digit(c: Option<&char>) -> bool {
  matches!(c, Some('0'..='9'))
}

fn is_alpha(c: Option<&char>) -> bool {
  matches!(c, Some('a'..='z' | 'A'..='Z' | '_'))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn token_types(source: &str) -> Vec<TokenType> {
    let mut scanner = Scanner::new(source);
    let mut types = Vec::new();
    loop {
      let token = scanner.get_token();
      types.push(token.token_type);
      if token.token_type == TokenType::EndOfFile {
        break;
      }
    }
    types
  }

  #[test]
  fn scans_operators_and_literals() {
    assert_eq!(
      token_types("1 + 2.5 * \"hi\";"),
      vec![
        TokenType::Number,
        TokenType::Plus,
        TokenType::Number,
        TokenType::Star,
        TokenType::String,
        TokenType::Semicolon,
        TokenType::EndOfFile,
      ]
    );
  }

  #[test]
  fn scans_keywords_by_first_character() {
    assert_eq!(
      token_types("var fun for false if nil while"),
      vec![
        TokenType::Var,
        TokenType::Fun,
        TokenType::For,
        TokenType::False,
        TokenType::If,
        TokenType::Nil,
        TokenType::While,
        TokenType::EndOfFile,
      ]
    );
  }

  #[test]
  fn keyword_prefixes_are_identifiers() {
    assert_eq!(
      token_types("variable fund nile"),
      vec![
        TokenType::Identifier,
        TokenType::Identifier,
        TokenType::Identifier,
        TokenType::EndOfFile,
      ]
    );
  }

  #[test]
  fn unterminated_string_is_error_token() {
    let mut scanner = Scanner::new("\"unfinished");
    let token = scanner.get_token();
    assert_eq!(token.token_type, TokenType::Error);
    assert_eq!(token.error_value, Some(Error::UnterminatedString));
  }

  #[test]
  fn unknown_character_is_error_token() {
    let mut scanner = Scanner::new("@");
    let token = scanner.get_token();
    assert_eq!(token.token_type, TokenType::Error);
    assert_eq!(token.error_value, Some(Error::UnknownCharacter));
  }

  #[test]
  fn tracks_line_numbers_through_comments() {
    let mut scanner = Scanner::new("1\n// comment\n2");
    assert_eq!(scanner.get_token().line, 1);
    assert_eq!(scanner.get_token().line, 3);
  }
}
