use flint::{print, Interner, InterpretError, VM};

use rustyline::error::ReadlineError;
use rustyline::Editor;
use std::{env, fs, process};

fn report(file: &str, source: &str, error: &InterpretError) -> i32 {
  match error {
    InterpretError::Compile(errors) => {
      for error in errors {
        print::compile_error(file, source, error);
      }
      65
    }
    InterpretError::Runtime(error) => {
      print::runtime_error(file, source, error);
      70
    }
  }
}

fn read_file(filename: &str) -> String {
  match fs::read_to_string(filename) {
    Ok(source) => source,
    Err(_) => {
      eprintln!("Problem reading file '{}'", filename);
      process::exit(74);
    }
  }
}

fn run_file(filename: &str) {
  let source = read_file(filename);
  let mut vm = VM::new();

  if let Err(error) = vm.interpret(&source) {
    process::exit(report(filename, &source, &error));
  }
}

fn show_bytecode(filename: &str) {
  let source = read_file(filename);
  let mut strings = Interner::new();

  match flint::compile(&source, &mut strings) {
    Ok(function) => print::chunk(&function.chunk, "<script>"),
    Err(errors) => {
      for error in &errors {
        print::compile_error(filename, &source, error);
      }
      process::exit(65);
    }
  }
}

fn repl() {
  let mut editor = Editor::<()>::new();
  let mut vm = VM::new();

  loop {
    match editor.readline("> ") {
      Ok(line) => {
        editor.add_history_entry(&line);

        if let Err(error) = vm.interpret(&line) {
          report("repl", &line, &error);
        }
      }
      Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
      Err(error) => {
        eprintln!("Error: {:?}", error);
        break;
      }
    }
  }
}

fn main() {
  let arguments: Vec<String> = env::args().collect();

  match arguments.len() {
    1 => repl(),
    2 => run_file(&arguments[1]),
    3 if arguments[1] == "--bytecode" => show_bytecode(&arguments[2]),
    _ => {
      eprintln!("Usage: flint [--bytecode] [file]");
      process::exit(64);
    }
  }
}
