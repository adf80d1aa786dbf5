use crate::error::{get_message, CompileError, RuntimeError};

use ariadne::{Label, Report, ReportKind, Source};

fn red(string: &str) -> String {
  format!("\x1b[0;31m{}\x1b[0m", string)
}

fn code_frame(file: &str, source: &str, line_number: usize) {
  if line_number == 0 {
    return;
  }

  eprintln!("    ╭─[{}]", file);
  if line_number > 2 {
    eprintln!("    ·");
  } else {
    eprintln!("    │");
  }

  let start = line_number.saturating_sub(2).max(1);
  for i in start..=line_number {
    if let Some(line) = source.lines().nth(i - 1) {
      eprintln!("{:>3} │ {}", i, line);
    }
  }
  if line_number < source.lines().count() {
    eprintln!("    ·");
  }
  eprintln!("────╯");
}

pub fn compile_error(file: &str, source: &str, error: &CompileError) {
  let chars: Vec<char> = source.chars().collect();
  let diagnostic = get_message(&chars, &error.error, &error.token);

  // Clamp the span, the offending token may sit at the end of the file
  let end = error.token.end.max(error.token.start + 1).min(chars.len().max(1));
  let start = error.token.start.min(end - 1);

  let report = Report::build(ReportKind::Error, file, start)
    .with_message(diagnostic.message)
    .with_label(Label::new((file, start..end)).with_message(diagnostic.label));

  let report = match diagnostic.note {
    Some(note) => report.with_note(note),
    None => report,
  };

  report.finish().eprint((file, Source::from(source))).ok();
}

pub fn runtime_error(file: &str, source: &str, error: &RuntimeError) {
  eprintln!("{} {}", red("Runtime Error:"), error.message);

  for frame in &error.trace {
    eprintln!("[line {}] in {}", frame.line, frame.function);
  }

  if let Some(frame) = error.trace.first() {
    code_frame(file, source, frame.line as usize);
  }
}
