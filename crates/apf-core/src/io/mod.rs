//! IO modules - side effects (filesystem)

pub mod output;
