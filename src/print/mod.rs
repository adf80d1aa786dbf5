mod chunk;
mod errors;

pub use chunk::disassemble as chunk;
pub use errors::{compile_error, runtime_error};
