mod flint_test;
use flint_test::*;

flint_test!(define_and_read
"
var a = 1;
var b = a + 1;
"
  a == 1.0
  b == 2.0
);

flint_test!(declaration_without_initializer_is_nil
"
var a;
var isNil = a == nil;
"
  isNil == true
);

flint_test!(assignment_overwrites
"
var a = 1;
a = 2;
"
  a == 2.0
);

flint_test!(assignment_is_an_expression
"
var a = 1;
var b = a = 42;
"
  a == 42.0
  b == 42.0
);

flint_test!(redefinition_is_allowed_for_globals
"
var a = 1;
var a = 2;
"
  a == 2.0
);

flint_test!(globals_are_late_bound_in_functions
"
fun get() { return lateDefined; }
var lateDefined = 21;
var result = get();
"
  result == 21.0
);

flint_test!(undefined_global_read_errors
"var a = missing;"
  RuntimeError
);

flint_test!(undefined_global_assignment_errors
"missing = 1;"
  RuntimeError
);

flint_test!(defined_globals_dont_leak_to_other_names
"
var defined = 1;
var a = undefined;
"
  RuntimeError
);

#[test]
fn failed_assignment_rolls_back_the_insert() {
  let mut vm = VM::new();
  assert!(vm.interpret("missing = 1;").is_err());

  // The failed assignment must not have defined the name
  assert!(vm.interpret("var a = missing;").is_err());
}

#[test]
fn globals_persist_across_interpret_calls() {
  let mut vm = VM::new();
  assert!(vm.interpret("var a = 1;").is_ok());
  assert!(vm.interpret("a = a + 1;").is_ok());

  let a = vm.get_global("a").unwrap();
  assert!(a.equals(&Value::from(2.0)));
}

flint_test!(assignment_to_expression_is_an_error
"
var a = 1;
var b = 2;
a + b = 3;
"
  CompileError
);
