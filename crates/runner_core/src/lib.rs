pub mod input;
pub mod shell;
pub mod time;
