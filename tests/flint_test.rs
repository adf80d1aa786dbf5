pub use flint::{InterpretError, Value, VM};

#[derive(Debug, PartialEq)]
pub enum RunResult {
  Success,
  RuntimeError,
  CompileError,
}

pub fn run(source: &str) -> (RunResult, VM) {
  let mut vm = VM::new();

  let result = match vm.interpret(source) {
    Ok(()) => RunResult::Success,
    Err(InterpretError::Runtime(_)) => RunResult::RuntimeError,
    Err(InterpretError::Compile(_)) => RunResult::CompileError,
  };

  (result, vm)
}

#[macro_export]
macro_rules! flint_test {
  ($name:ident $code:literal $( $var:ident == $expected:literal)*) => {
    #[test]
    fn $name(){
      let (result, vm) = run($code);
      assert_eq!(result, RunResult::Success);

      $(
        {
          let variable = vm.get_global(stringify!($var)).unwrap();
          let expected = Value::from($expected);
          assert!(
            variable.equals(&expected),
            "Expected variable {} to equal {} but received {}",
            stringify!($var),
            expected,
            variable
          );
        };
      )*
    }
  };

  ($name:ident $code:literal RuntimeError) => {
    #[test]
    fn $name(){
      let (result, _vm) = run($code);
      assert_eq!(result, RunResult::RuntimeError);
    }
  };

  ($name:ident $code:literal CompileError) => {
    #[test]
    fn $name(){
      let (result, _vm) = run($code);
      assert_eq!(result, RunResult::CompileError);
    }
  };
}
