pub mod lox;

pub use lox::{print, render_program};
