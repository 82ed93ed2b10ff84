pub mod assembler;
pub mod constructor;
pub mod templates;
