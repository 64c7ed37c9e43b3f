pub use crate::lir_def::*;

mod lir_def;
