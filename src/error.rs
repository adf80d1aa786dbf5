use std::fmt;

use crate::token::{LineNumber, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
  UnknownCharacter,
  UnterminatedString,
  ExpectedExpression,
  ExpectedBracket,
  MissingVariableName,
  MissingFunctionName,
  MissingParameterName,
  MissingSemicolon,
  MissingBracketBeforeCondition,
  MissingBracketAfterCondition,
  MissingBracketBeforeParameters,
  MissingBracketAfterParameters,
  MissingBraceBeforeBody,
  MissingBraceAfterBlock,
  InvalidAssignmentTarget,
  VariableAlreadyExists,
  OwnInitializer,
  ReturnOutsideFunction,
  TooManyLocals,
  TooManyParameters,
  TooManyArguments,
  TooManyConstants,
  TooBigJump,
}

pub struct Diagnostic {
  pub message: String,
  pub label: String,
  pub note: Option<String>,
}

pub fn get_message(chars: &[char], error: &Error, token: &Token) -> Diagnostic {
  match error {
    Error::UnknownCharacter => Diagnostic {
      message: "Unknown Character".to_string(),
      label: format!("Unknown character '{}'", token.get_value(chars)),
      note: Some("Try deleting the character".to_string()),
    },
    Error::UnterminatedString => Diagnostic {
      message: "Unterminated String".to_string(),
      label: "Missing closing quote \"".to_string(),
      note: Some("Add \" to close the string".to_string()),
    },
    Error::ExpectedExpression => Diagnostic {
      message: "Expected Expression".to_string(),
      label: "Expected expression here".to_string(),
      note: None,
    },
    Error::ExpectedBracket => Diagnostic {
      message: "Expected Closing Bracket".to_string(),
      label: "Expected ')' after expression".to_string(),
      note: Some("Add a ) to close the expression".to_string()),
    },
    Error::MissingVariableName => Diagnostic {
      message: "Expected Variable Name".to_string(),
      label: "Variable not given a name".to_string(),
      note: Some("Add the name for your variable".to_string()),
    },
    Error::MissingFunctionName => Diagnostic {
      message: "Expected Function Name".to_string(),
      label: "Function not given a name".to_string(),
      note: Some("Add the name for your function".to_string()),
    },
    Error::MissingParameterName => Diagnostic {
      message: "Expected Parameter Name".to_string(),
      label: "Parameter not given a name".to_string(),
      note: None,
    },
    Error::MissingSemicolon => Diagnostic {
      message: "Expected Semicolon".to_string(),
      label: "Expected ';' after statement".to_string(),
      note: Some("Add a ; to end the statement".to_string()),
    },
    Error::MissingBracketBeforeCondition => Diagnostic {
      message: "Expected Bracket Before Condition".to_string(),
      label: "Expected '(' before condition".to_string(),
      note: Some("Add a ( before the condition".to_string()),
    },
    Error::MissingBracketAfterCondition => Diagnostic {
      message: "Expected Bracket After Condition".to_string(),
      label: "Expected ')' after condition".to_string(),
      note: Some("Add a ) after the condition".to_string()),
    },
    Error::MissingBracketBeforeParameters => Diagnostic {
      message: "Expected Bracket Before Parameters".to_string(),
      label: "Expected '(' before parameters".to_string(),
      note: None,
    },
    Error::MissingBracketAfterParameters => Diagnostic {
      message: "Expected Bracket After Parameters".to_string(),
      label: "Expected ')' after parameters".to_string(),
      note: None,
    },
    Error::MissingBraceBeforeBody => Diagnostic {
      message: "Expected Brace Before Body".to_string(),
      label: "Expected '{' before function body".to_string(),
      note: None,
    },
    Error::MissingBraceAfterBlock => Diagnostic {
      message: "Expected End of Block".to_string(),
      label: "Expected '}' after block".to_string(),
      note: Some("Add a } to close the block".to_string()),
    },
    Error::InvalidAssignmentTarget => Diagnostic {
      message: "Invalid Assignment Target".to_string(),
      label: "Assignment target is not a variable".to_string(),
      note: Some("Assign to a variable rather than an expression".to_string()),
    },
    Error::VariableAlreadyExists => Diagnostic {
      message: "Redefining Existing Variable".to_string(),
      label: format!("Variable '{}' already exists in this scope", token.get_value(chars)),
      note: Some("You could try a new name for your variable".to_string()),
    },
    Error::OwnInitializer => Diagnostic {
      message: "Variable Read in Own Initializer".to_string(),
      label: format!(
        "'{}' is not initialized until after this expression",
        token.get_value(chars)
      ),
      note: None,
    },
    Error::ReturnOutsideFunction => Diagnostic {
      message: "Return Outside Function".to_string(),
      label: "Can't return from top-level code".to_string(),
      note: None,
    },
    Error::TooManyLocals => Diagnostic {
      message: "Too Many Local Variables".to_string(),
      label: "There is a limit of 256 local variables in a function".to_string(),
      note: None,
    },
    Error::TooManyParameters => Diagnostic {
      message: "Too Many Parameters".to_string(),
      label: "There is a limit of 255 parameters for a function".to_string(),
      note: None,
    },
    Error::TooManyArguments => Diagnostic {
      message: "Too Many Arguments".to_string(),
      label: "There is a limit of 255 arguments for a call".to_string(),
      note: None,
    },
    Error::TooManyConstants => Diagnostic {
      message: "Too Many Constants".to_string(),
      label: "Couldn't add constant, as already too many in chunk".to_string(),
      note: Some("This is likely to be an issue with the compiler".to_string()),
    },
    Error::TooBigJump => Diagnostic {
      message: "Jump Too Large".to_string(),
      label: "Couldn't construct bytecode, as block too large".to_string(),
      note: Some("This is likely to be an issue with the compiler".to_string()),
    },
  }
}

#[derive(Debug, Clone, Copy)]
pub struct CompileError {
  pub error: Error,
  pub token: Token,
}

impl CompileError {
  pub fn line(&self) -> LineNumber {
    self.token.line
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceFrame {
  pub line: LineNumber,
  pub function: String,
}

#[derive(Debug, Clone)]
pub struct RuntimeError {
  pub message: String,
  pub trace: Vec<TraceFrame>,
}

impl fmt::Display for RuntimeError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.message)?;
    for frame in &self.trace {
      write!(f, "\n[line {}] in {}", frame.line, frame.function)?;
    }
    Ok(())
  }
}

#[derive(Debug)]
pub enum InterpretError {
  Compile(Vec<CompileError>),
  Runtime(RuntimeError),
}
