use crate::chunk::{ChunkBuilder, OpCode};
use crate::error::{CompileError, Error};
use crate::scanner::Scanner;
use crate::token::{Token, TokenType};
use crate::value::{Function, Interner, ObjString, Value};

use std::rc::Rc;

// One byte of slot operand
const MAX_LOCALS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
  None,
  Assignment, // =
  Or,         // or
  And,        // and
  Equality,   // == !=
  Comparison, // < > <= >=
  Term,       // + -
  Factor,     // * /
  Unary,      // ! -
  Call,       // ()
  Primary,
}

impl Precedence {
  fn next(self) -> Self {
    match self {
      Precedence::None => Precedence::Assignment,
      Precedence::Assignment => Precedence::Or,
      Precedence::Or => Precedence::And,
      Precedence::And => Precedence::Equality,
      Precedence::Equality => Precedence::Comparison,
      Precedence::Comparison => Precedence::Term,
      Precedence::Term => Precedence::Factor,
      Precedence::Factor => Precedence::Unary,
      Precedence::Unary => Precedence::Call,
      Precedence::Call | Precedence::Primary => Precedence::Primary,
    }
  }
}

#[derive(Clone, Copy)]
enum Prefix {
  Grouping,
  Unary,
  Number,
  String,
  Literal,
  Variable,
}

#[derive(Clone, Copy)]
enum Infix {
  Binary,
  And,
  Or,
  Call,
}

struct ParseRule {
  prefix: Option<Prefix>,
  infix: Option<Infix>,
  precedence: Precedence,
}

fn get_rule(token_type: TokenType) -> ParseRule {
  let (prefix, infix, precedence) = match token_type {
    TokenType::LeftParen => (
      Some(Prefix::Grouping),
      Some(Infix::Call),
      Precedence::Call,
    ),
    TokenType::Minus => (Some(Prefix::Unary), Some(Infix::Binary), Precedence::Term),
    TokenType::Plus => (None, Some(Infix::Binary), Precedence::Term),
    TokenType::Slash | TokenType::Star => (None, Some(Infix::Binary), Precedence::Factor),
    TokenType::Bang => (Some(Prefix::Unary), None, Precedence::None),
    TokenType::BangEqual | TokenType::EqualEqual => {
      (None, Some(Infix::Binary), Precedence::Equality)
    }
    TokenType::Greater | TokenType::GreaterEqual | TokenType::Less | TokenType::LessEqual => {
      (None, Some(Infix::Binary), Precedence::Comparison)
    }
    TokenType::Identifier => (Some(Prefix::Variable), None, Precedence::None),
    TokenType::String => (Some(Prefix::String), None, Precedence::None),
    TokenType::Number => (Some(Prefix::Number), None, Precedence::None),
    TokenType::And => (None, Some(Infix::And), Precedence::And),
    TokenType::Or => (None, Some(Infix::Or), Precedence::Or),
    TokenType::True | TokenType::False | TokenType::Nil => {
      (Some(Prefix::Literal), None, Precedence::None)
    }
    _ => (None, None, Precedence::None),
  };

  ParseRule {
    prefix,
    infix,
    precedence,
  }
}

struct Local {
  name: String,
  // None between declaration and the end of its initializer
  depth: Option<u8>,
}

enum FunctionKind {
  Script,
  Function,
}

struct FunctionContext {
  chunk: ChunkBuilder,
  locals: Vec<Local>,
  scope_depth: u8,
  arity: u8,
  name: Option<Rc<ObjString>>,
  kind: FunctionKind,
}

impl FunctionContext {
  fn new(name: Option<Rc<ObjString>>, kind: FunctionKind) -> Self {
    // Slot zero holds the function being called
    let callee_slot = Local {
      name: String::new(),
      depth: Some(0),
    };

    Self {
      chunk: ChunkBuilder::new(),
      locals: vec![callee_slot],
      scope_depth: 0,
      arity: 0,
      name,
      kind,
    }
  }
}

struct Compiler<'s> {
  scanner: Scanner,

  current: Token,
  previous: Token,

  errors: Vec<CompileError>,
  panic_mode: bool,

  contexts: Vec<FunctionContext>,
  strings: &'s mut Interner,
}

// Token handling
impl<'s> Compiler<'s> {
  fn new(source: &str, strings: &'s mut Interner) -> Self {
    Self {
      scanner: Scanner::new(source),
      current: Token::blank(),
      previous: Token::blank(),
      errors: Vec::new(),
      panic_mode: false,
      contexts: vec![FunctionContext::new(None, FunctionKind::Script)],
      strings,
    }
  }

  fn advance(&mut self) {
    self.previous = self.current;
    loop {
      self.current = self.scanner.get_token();
      match self.current.error_value {
        Some(error) => self.error_at_current(error),
        None => break,
      }
    }
  }

  fn check(&self, token_type: TokenType) -> bool {
    self.current.token_type == token_type
  }

  fn matches(&mut self, token_type: TokenType) -> bool {
    if self.check(token_type) {
      self.advance();
      true
    } else {
      false
    }
  }

  fn consume(&mut self, token_type: TokenType, error: Error) {
    if self.check(token_type) {
      self.advance();
    } else {
      self.error_at_current(error);
    }
  }

  fn token_value(&self, token: &Token) -> String {
    token.get_value(&self.scanner.chars)
  }

  fn error(&mut self, error: Error) {
    self.error_at(self.previous, error);
  }

  fn error_at_current(&mut self, error: Error) {
    self.error_at(self.current, error);
  }

  fn error_at(&mut self, token: Token, error: Error) {
    if self.panic_mode {
      return;
    }
    self.panic_mode = true;
    self.errors.push(CompileError { error, token });
  }

  fn synchronize(&mut self) {
    self.panic_mode = false;

    while !self.check(TokenType::EndOfFile) {
      if self.previous.token_type == TokenType::Semicolon {
        return;
      }

      match self.current.token_type {
        TokenType::Fun
        | TokenType::Var
        | TokenType::For
        | TokenType::If
        | TokenType::While
        | TokenType::Print
        | TokenType::Return => return,
        _ => self.advance(),
      }
    }
  }
}

// Emit bytecode
impl Compiler<'_> {
  fn context(&self) -> &FunctionContext {
    self.contexts.last().unwrap()
  }

  fn context_mut(&mut self) -> &mut FunctionContext {
    self.contexts.last_mut().unwrap()
  }

  fn emit_opcode(&mut self, code: OpCode) {
    let line = self.previous.line;
    self.context_mut().chunk.write_opcode(code, line);
  }

  fn emit_byte(&mut self, value: u8) {
    let line = self.previous.line;
    self.context_mut().chunk.write_byte(value, line);
  }

  fn emit_long(&mut self, value: u16) {
    let line = self.previous.line;
    self.context_mut().chunk.write_long(value, line);
  }

  fn make_constant(&mut self, value: Value) -> u8 {
    let index = self.context_mut().chunk.add_constant(value);

    match u8::try_from(index) {
      Ok(index) => index,
      Err(_) => {
        self.error(Error::TooManyConstants);
        0
      }
    }
  }

  fn emit_constant(&mut self, value: Value) {
    let index = self.make_constant(value);
    self.emit_opcode(OpCode::Constant);
    self.emit_byte(index);
  }

  fn identifier_constant(&mut self, token: Token) -> u8 {
    let name = self.token_value(&token);
    let string = self.strings.intern(&name);
    self.make_constant(Value::String(string))
  }

  fn emit_jump(&mut self, instruction: OpCode) -> usize {
    self.emit_opcode(instruction);
    self.emit_long(u16::MAX);
    self.context().chunk.len() - 2
  }

  fn patch_jump(&mut self, offset: usize) {
    let jump = self.context().chunk.len() - offset - 2;

    if jump > u16::MAX as usize {
      self.error(Error::TooBigJump);
    }

    self.context_mut().chunk.patch_long(offset, jump as u16);
  }

  fn emit_loop(&mut self, loop_start: usize) {
    self.emit_opcode(OpCode::Loop);

    let offset = self.context().chunk.len() - loop_start + 2;
    if offset > u16::MAX as usize {
      self.error(Error::TooBigJump);
    }

    self.emit_long(offset as u16);
  }

  fn finish_context(&mut self) -> Function {
    self.emit_opcode(OpCode::Nil);
    self.emit_opcode(OpCode::Return);

    let context = self.contexts.pop().unwrap();

    Function {
      arity: context.arity,
      chunk: context.chunk.finalize(),
      name: context.name,
    }
  }
}

// Scopes and variables
impl Compiler<'_> {
  fn begin_scope(&mut self) {
    self.context_mut().scope_depth += 1;
  }

  fn end_scope(&mut self) {
    let context = self.context_mut();
    context.scope_depth -= 1;
    let depth = context.scope_depth;

    let mut pops = 0;
    while matches!(context.locals.last(), Some(local) if local.depth.unwrap_or(u8::MAX) > depth) {
      context.locals.pop();
      pops += 1;
    }

    for _ in 0..pops {
      self.emit_opcode(OpCode::Pop);
    }
  }

  fn parse_variable(&mut self, error: Error) -> u8 {
    self.consume(TokenType::Identifier, error);

    self.declare_variable();
    if self.context().scope_depth > 0 {
      return 0;
    }

    self.identifier_constant(self.previous)
  }

  fn declare_variable(&mut self) {
    if self.context().scope_depth == 0 {
      return;
    }

    let name = self.token_value(&self.previous);

    let context = self.context();
    let mut duplicate = false;
    for local in context.locals.iter().rev() {
      if let Some(depth) = local.depth {
        if depth < context.scope_depth {
          break;
        }
      }
      if local.name == name {
        duplicate = true;
        break;
      }
    }

    if duplicate {
      self.error(Error::VariableAlreadyExists);
    } else {
      self.add_local(name);
    }
  }

  fn add_local(&mut self, name: String) {
    if self.context().locals.len() >= MAX_LOCALS {
      self.error(Error::TooManyLocals);
      return;
    }

    self.context_mut().locals.push(Local { name, depth: None });
  }

  fn mark_initialized(&mut self) {
    let context = self.context_mut();
    if context.scope_depth == 0 {
      return;
    }

    let depth = context.scope_depth;
    if let Some(local) = context.locals.last_mut() {
      local.depth = Some(depth);
    }
  }

  fn define_variable(&mut self, global: u8) {
    if self.context().scope_depth > 0 {
      self.mark_initialized();
      return;
    }

    self.emit_opcode(OpCode::DefineGlobal);
    self.emit_byte(global);
  }

  fn resolve_local(&mut self, name: &str) -> Option<u8> {
    let mut uninitialized = false;
    let mut slot = None;

    for (index, local) in self.context().locals.iter().enumerate().rev() {
      if local.name == name {
        if local.depth.is_none() {
          uninitialized = true;
        }
        slot = Some(index as u8);
        break;
      }
    }

    if uninitialized {
      self.error(Error::OwnInitializer);
    }
    slot
  }

  fn named_variable(&mut self, token: Token, can_assign: bool) {
    let name = self.token_value(&token);

    let (get_op, set_op, argument) = match self.resolve_local(&name) {
      Some(slot) => (OpCode::GetLocal, OpCode::SetLocal, slot),
      None => (
        OpCode::GetGlobal,
        OpCode::SetGlobal,
        self.identifier_constant(token),
      ),
    };

    if can_assign && self.matches(TokenType::Equal) {
      self.expression();
      self.emit_opcode(set_op);
    } else {
      self.emit_opcode(get_op);
    }
    self.emit_byte(argument);
  }
}

// Expressions
impl Compiler<'_> {
  fn parse_precedence(&mut self, precedence: Precedence) {
    self.advance();

    let can_assign = precedence <= Precedence::Assignment;
    match get_rule(self.previous.token_type).prefix {
      Some(rule) => self.prefix_rule(rule, can_assign),
      None => {
        self.error(Error::ExpectedExpression);
        return;
      }
    }

    while precedence <= get_rule(self.current.token_type).precedence {
      self.advance();
      if let Some(rule) = get_rule(self.previous.token_type).infix {
        self.infix_rule(rule);
      }
    }

    if can_assign && self.matches(TokenType::Equal) {
      self.error(Error::InvalidAssignmentTarget);
    }
  }

  fn prefix_rule(&mut self, rule: Prefix, can_assign: bool) {
    match rule {
      Prefix::Grouping => self.grouping(),
      Prefix::Unary => self.unary(),
      Prefix::Number => self.number(),
      Prefix::String => self.string(),
      Prefix::Literal => self.literal(),
      Prefix::Variable => self.variable(can_assign),
    }
  }

  fn infix_rule(&mut self, rule: Infix) {
    match rule {
      Infix::Binary => self.binary(),
      Infix::And => self.and(),
      Infix::Or => self.or(),
      Infix::Call => self.call(),
    }
  }

  fn expression(&mut self) {
    self.parse_precedence(Precedence::Assignment);
  }

  fn grouping(&mut self) {
    self.expression();
    self.consume(TokenType::RightParen, Error::ExpectedBracket);
  }

  fn unary(&mut self) {
    let operator = self.previous.token_type;

    self.parse_precedence(Precedence::Unary);

    match operator {
      TokenType::Minus => self.emit_opcode(OpCode::Negate),
      TokenType::Bang => self.emit_opcode(OpCode::Not),
      _ => {}
    }
  }

  fn binary(&mut self) {
    let operator = self.previous.token_type;

    self.parse_precedence(get_rule(operator).precedence.next());

    match operator {
      TokenType::Plus => self.emit_opcode(OpCode::Add),
      TokenType::Minus => self.emit_opcode(OpCode::Subtract),
      TokenType::Star => self.emit_opcode(OpCode::Multiply),
      TokenType::Slash => self.emit_opcode(OpCode::Divide),
      TokenType::EqualEqual => self.emit_opcode(OpCode::Equal),
      TokenType::BangEqual => {
        self.emit_opcode(OpCode::Equal);
        self.emit_opcode(OpCode::Not);
      }
      TokenType::Greater => self.emit_opcode(OpCode::Greater),
      TokenType::GreaterEqual => {
        self.emit_opcode(OpCode::Less);
        self.emit_opcode(OpCode::Not);
      }
      TokenType::Less => self.emit_opcode(OpCode::Less),
      TokenType::LessEqual => {
        self.emit_opcode(OpCode::Greater);
        self.emit_opcode(OpCode::Not);
      }
      _ => {}
    }
  }

  fn number(&mut self) {
    let value: f64 = self.token_value(&self.previous).parse().unwrap_or_default();
    self.emit_constant(Value::Number(value));
  }

  fn string(&mut self) {
    let token = self.previous;
    // Trim the enclosing quotes
    let lexeme: String = self.scanner.chars[(token.start + 1)..(token.end - 1)]
      .iter()
      .collect();

    let string = self.strings.intern(&lexeme);
    self.emit_constant(Value::String(string));
  }

  fn literal(&mut self) {
    match self.previous.token_type {
      TokenType::True => self.emit_opcode(OpCode::True),
      TokenType::False => self.emit_opcode(OpCode::False),
      TokenType::Nil => self.emit_opcode(OpCode::Nil),
      _ => {}
    }
  }

  fn variable(&mut self, can_assign: bool) {
    self.named_variable(self.previous, can_assign);
  }

  fn and(&mut self) {
    let end_jump = self.emit_jump(OpCode::JumpIfFalse);

    self.emit_opcode(OpCode::Pop);
    self.parse_precedence(Precedence::And);

    self.patch_jump(end_jump);
  }

  fn or(&mut self) {
    let else_jump = self.emit_jump(OpCode::JumpIfFalse);
    let end_jump = self.emit_jump(OpCode::Jump);

    self.patch_jump(else_jump);
    self.emit_opcode(OpCode::Pop);

    self.parse_precedence(Precedence::Or);
    self.patch_jump(end_jump);
  }

  fn call(&mut self) {
    let argument_count = self.argument_list();
    self.emit_opcode(OpCode::Call);
    self.emit_byte(argument_count);
  }

  fn argument_list(&mut self) -> u8 {
    let mut count: u32 = 0;

    if !self.check(TokenType::RightParen) {
      loop {
        self.expression();
        if count == 255 {
          self.error(Error::TooManyArguments);
        }
        count += 1;

        if !self.matches(TokenType::Comma) {
          break;
        }
      }
    }

    self.consume(TokenType::RightParen, Error::ExpectedBracket);
    count.min(255) as u8
  }
}

// Statements
impl Compiler<'_> {
  fn declaration(&mut self) {
    if self.matches(TokenType::Var) {
      self.var_declaration();
    } else if self.matches(TokenType::Fun) {
      self.fun_declaration();
    } else {
      self.statement();
    }

    if self.panic_mode {
      self.synchronize();
    }
  }

  fn var_declaration(&mut self) {
    let global = self.parse_variable(Error::MissingVariableName);

    if self.matches(TokenType::Equal) {
      self.expression();
    } else {
      self.emit_opcode(OpCode::Nil);
    }
    self.consume(TokenType::Semicolon, Error::MissingSemicolon);

    self.define_variable(global);
  }

  fn fun_declaration(&mut self) {
    let global = self.parse_variable(Error::MissingFunctionName);
    // The function may refer to itself for recursion
    self.mark_initialized();
    self.function();
    self.define_variable(global);
  }

  fn function(&mut self) {
    let name = self.token_value(&self.previous);
    let name = self.strings.intern(&name);

    self
      .contexts
      .push(FunctionContext::new(Some(name), FunctionKind::Function));
    self.begin_scope();

    self.consume(TokenType::LeftParen, Error::MissingBracketBeforeParameters);
    if !self.check(TokenType::RightParen) {
      loop {
        if self.context().arity == u8::MAX {
          self.error_at_current(Error::TooManyParameters);
        } else {
          self.context_mut().arity += 1;
        }

        let parameter = self.parse_variable(Error::MissingParameterName);
        self.define_variable(parameter);

        if !self.matches(TokenType::Comma) {
          break;
        }
      }
    }
    self.consume(TokenType::RightParen, Error::MissingBracketAfterParameters);

    self.consume(TokenType::LeftBrace, Error::MissingBraceBeforeBody);
    self.block();

    let function = self.finish_context();
    self.emit_constant(Value::from(function));
  }

  fn statement(&mut self) {
    if self.matches(TokenType::Print) {
      self.print_statement();
    } else if self.matches(TokenType::If) {
      self.if_statement();
    } else if self.matches(TokenType::While) {
      self.while_statement();
    } else if self.matches(TokenType::For) {
      self.for_statement();
    } else if self.matches(TokenType::Return) {
      self.return_statement();
    } else if self.matches(TokenType::LeftBrace) {
      self.begin_scope();
      self.block();
      self.end_scope();
    } else {
      self.expression_statement();
    }
  }

  fn block(&mut self) {
    while !self.check(TokenType::RightBrace) && !self.check(TokenType::EndOfFile) {
      self.declaration();
    }
    self.consume(TokenType::RightBrace, Error::MissingBraceAfterBlock);
  }

  fn expression_statement(&mut self) {
    self.expression();
    self.consume(TokenType::Semicolon, Error::MissingSemicolon);
    self.emit_opcode(OpCode::Pop);
  }

  fn print_statement(&mut self) {
    self.expression();
    self.consume(TokenType::Semicolon, Error::MissingSemicolon);
    self.emit_opcode(OpCode::Print);
  }

  fn if_statement(&mut self) {
    self.consume(TokenType::LeftParen, Error::MissingBracketBeforeCondition);
    self.expression();
    self.consume(TokenType::RightParen, Error::MissingBracketAfterCondition);

    let then_jump = self.emit_jump(OpCode::JumpIfFalse);
    self.emit_opcode(OpCode::Pop);
    self.statement();
    let else_jump = self.emit_jump(OpCode::Jump);

    self.patch_jump(then_jump);
    self.emit_opcode(OpCode::Pop);
    if self.matches(TokenType::Else) {
      self.statement();
    }
    self.patch_jump(else_jump);
  }

  fn while_statement(&mut self) {
    let loop_start = self.context().chunk.len();

    self.consume(TokenType::LeftParen, Error::MissingBracketBeforeCondition);
    self.expression();
    self.consume(TokenType::RightParen, Error::MissingBracketAfterCondition);

    let exit_jump = self.emit_jump(OpCode::JumpIfFalse);
    self.emit_opcode(OpCode::Pop);

    self.statement();
    self.emit_loop(loop_start);

    self.patch_jump(exit_jump);
    self.emit_opcode(OpCode::Pop);
  }

  fn for_statement(&mut self) {
    self.begin_scope();
    self.consume(TokenType::LeftParen, Error::MissingBracketBeforeCondition);

    if self.matches(TokenType::Semicolon) {
      // no initializer
    } else if self.matches(TokenType::Var) {
      self.var_declaration();
    } else {
      self.expression_statement();
    }

    let mut loop_start = self.context().chunk.len();

    let mut exit_jump = None;
    if !self.matches(TokenType::Semicolon) {
      self.expression();
      self.consume(TokenType::Semicolon, Error::MissingSemicolon);

      exit_jump = Some(self.emit_jump(OpCode::JumpIfFalse));
      self.emit_opcode(OpCode::Pop);
    }

    if !self.matches(TokenType::RightParen) {
      // Jump over the increment on first entry, loop back to it afterwards
      let body_jump = self.emit_jump(OpCode::Jump);
      let increment_start = self.context().chunk.len();

      self.expression();
      self.emit_opcode(OpCode::Pop);
      self.consume(TokenType::RightParen, Error::MissingBracketAfterCondition);

      self.emit_loop(loop_start);
      loop_start = increment_start;
      self.patch_jump(body_jump);
    }

    self.statement();
    self.emit_loop(loop_start);

    if let Some(exit_jump) = exit_jump {
      self.patch_jump(exit_jump);
      self.emit_opcode(OpCode::Pop);
    }

    self.end_scope();
  }

  fn return_statement(&mut self) {
    if matches!(self.context().kind, FunctionKind::Script) {
      self.error(Error::ReturnOutsideFunction);
    }

    if self.matches(TokenType::Semicolon) {
      self.emit_opcode(OpCode::Nil);
      self.emit_opcode(OpCode::Return);
    } else {
      self.expression();
      self.consume(TokenType::Semicolon, Error::MissingSemicolon);
      self.emit_opcode(OpCode::Return);
    }
  }
}

pub fn compile(source: &str, strings: &mut Interner) -> Result<Function, Vec<CompileError>> {
  let mut compiler = Compiler::new(source, strings);

  compiler.advance();
  while !compiler.matches(TokenType::EndOfFile) {
    compiler.declaration();
  }

  let function = compiler.finish_context();

  #[cfg(feature = "debug-bytecode")]
  if compiler.errors.is_empty() {
    crate::print::chunk(&function.chunk, "<script>");
  }

  if compiler.errors.is_empty() {
    Ok(function)
  } else {
    Err(compiler.errors)
  }
}
