mod flint_test;
use flint_test::*;

flint_test!(function_round_trip
"
fun add(a, b) { return a + b; }
var result = add(2, 3);
"
  result == 5.0
);

flint_test!(too_few_arguments_is_an_error
"
fun add(a, b) { return a + b; }
add(1);
"
  RuntimeError
);

flint_test!(too_many_arguments_is_an_error
"
fun add(a, b) { return a + b; }
add(1, 2, 3);
"
  RuntimeError
);

flint_test!(function_without_return_returns_nil
"
fun noisy() { var a = 4 + 5; }
var isNil = noisy() == nil;
"
  isNil == true
);

flint_test!(bare_return_returns_nil
"
fun bail() { return; }
var isNil = bail() == nil;
"
  isNil == true
);

flint_test!(nothing_runs_after_return
"
var after = 0;
fun early() {
  return 9;
  after = 1;
}
var result = early();
"
  after == 0.0
  result == 9.0
);

flint_test!(parameters_shadow_globals
"
var a = 1;
fun shadow(a) { return a * 2; }
var result = shadow(21);
"
  a == 1.0
  result == 42.0
);

flint_test!(iterative_fibonacci
"
fun fib(n) {
  var x = 0;
  var y = 1;
  for (var i = 0; i < n; i = i + 1) {
    var z = x + y;
    x = y;
    y = z;
  }
  return x;
}
var result = fib(20);
"
  result == 6765.0
);

flint_test!(recursive_fibonacci
"
fun fib(n) {
  if (n < 2) return n;
  return fib(n - 1) + fib(n - 2);
}
var result = fib(15);
"
  result == 610.0
);

flint_test!(nested_function_declarations
"
fun outer() {
  fun inner(x) { return x + 1; }
  return inner(41);
}
var result = outer();
"
  result == 42.0
);

flint_test!(functions_are_values
"
fun double(x) { return x * 2; }
fun apply(f, value) { return f(value); }
var result = apply(double, 21);
"
  result == 42.0
);

flint_test!(calls_nest_in_expressions
"
fun square(x) { return x * x; }
var result = square(square(2)) + square(3);
"
  result == 25.0
);

flint_test!(cant_call_number
"1();"
  RuntimeError
);

flint_test!(cant_call_string
"\"hello\"();"
  RuntimeError
);

flint_test!(cant_call_nil
"nil();"
  RuntimeError
);

flint_test!(cant_call_boolean
"true();"
  RuntimeError
);

flint_test!(return_outside_function_is_an_error
"return 1;"
  CompileError
);

flint_test!(unbounded_recursion_overflows
"
fun forever() { forever(); }
forever();
"
  RuntimeError
);

flint_test!(clock_native_returns_a_number
"
var before = clock();
var isNumber = before >= 0;
"
  isNumber == true
);

flint_test!(clock_checks_its_arity
"clock(1);"
  RuntimeError
);

flint_test!(natives_compare_by_identity
"
var tick = clock;
var sameKind = tick == clock;
"
  sameKind == true
);
