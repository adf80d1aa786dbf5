mod chunk;
mod compiler;
mod error;
pub mod print;
mod scanner;
mod table;
mod token;
mod value;
mod vm;

pub use chunk::{Chunk, OpCode};
pub use compiler::compile;
pub use error::{CompileError, Diagnostic, Error, InterpretError, RuntimeError, TraceFrame};
pub use value::{Function, Interner, NativeError, NativeFn, NativeFunction, ObjString, Value};
pub use vm::VM;
