//! Snippet tests for the whole pipeline: compile a source string,
//! run it on a captured sink, and compare the exact bytes printed.

use vmlua::common::source::Source;
use vmlua::compile;
use vmlua::vm::vm::Vm;

fn run(source: &str) -> String {
    let source = Source::source(source);
    let prog = compile(&source).expect("compile error");

    let mut vm = Vm::with_output(Vec::new());
    vm.eval(&prog).expect("runtime error");

    String::from_utf8(vm.into_output()).expect("guest output is not utf-8")
}

#[test]
fn hello_constant() {
    assert_eq!(run("print(42);"), "42 \n");
}

#[test]
fn local_and_arithmetic() {
    let source = "\
local a = 2;
local b = 3;
print(a + b);
";
    assert_eq!(run(source), "5 \n");
}

#[test]
fn function_call_with_argument() {
    let source = "\
function inc(x)
  return x + 1;
end
print(inc(41));
";
    assert_eq!(run(source), "42 \n");
}

#[test]
fn if_takes_the_then_branch() {
    let source = "\
local n = 3;
if n < 5 then
  print(1);
else
  print(0);
end
";
    assert_eq!(run(source), "1 \n");
}

#[test]
fn if_takes_the_else_branch() {
    let source = "\
local n = 7;
if n < 5 then
  print(1);
else
  print(0);
end
";
    assert_eq!(run(source), "0 \n");
}

#[test]
fn recursive_fib() {
    let source = "\
function fib(n)
  if n < 2 then
    return n;
  end
  local a = n - 1;
  local b = n - 2;
  local x = fib(a);
  local y = fib(b);
  return x + y;
end
print(fib(5));
";
    assert_eq!(run(source), "5 \n");
}

#[test]
fn deeper_recursion() {
    let source = "\
function fib(n)
  if n < 2 then
    return n;
  end
  local a = n - 1;
  local b = n - 2;
  local x = fib(a);
  local y = fib(b);
  return x + y;
end
print(fib(10));
";
    assert_eq!(run(source), "55 \n");
}

#[test]
fn arguments_print_top_of_stack_first() {
    assert_eq!(run("print(1, 2, 3);"), "3 2 1 \n");
}

#[test]
fn argument_commas_are_optional() {
    assert_eq!(run("print(1 2 3);"), "3 2 1 \n");
}

#[test]
fn print_each_statement() {
    let source = "\
print(1);
print(2, 3);
";
    assert_eq!(run(source), "1 \n3 2 \n");
}

#[test]
fn word_conditions() {
    // keyword `and`/`or` never reach expression position (the keyword
    // sub-lexer wins), but the symbolic comparisons compose with if
    let source = "\
local yes = 1 <= 1;
local no = 2 == 3;
if yes > no then
  print(yes);
else
  print(no);
end
";
    assert_eq!(run(source), "1 \n");
}

#[test]
fn lex_error_is_fatal() {
    let source = Source::source("print(@);");
    let error = compile(&source).unwrap_err();
    assert!(error.to_string().contains("unexpected character '@'"));
}

#[test]
fn parse_error_names_the_offender() {
    let source = Source::source("local x = ,;");
    let error = compile(&source).unwrap_err();
    assert!(error.to_string().contains("','"));
}

#[test]
fn emit_error_on_unlowered_operator() {
    let source = Source::source("print(6 * 7);");
    let error = compile(&source).unwrap_err();
    assert!(error.to_string().contains("unknown operator '*'"));
}

#[test]
fn runtime_error_on_unknown_function() {
    let source = Source::source("print(frobnicate(1));");
    let prog = compile(&source).expect("compiles fine");

    let mut vm: Vm<Vec<u8>> = Vm::with_output(Vec::new());
    let error = vm.eval(&prog).unwrap_err();
    assert!(error.to_string().contains("unknown function 'frobnicate'"));
}
