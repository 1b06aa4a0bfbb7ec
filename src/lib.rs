//! Keeps `<name>.js, Line: <n>` citations in `req.err = ` assignments in
//! sync with the file they live in and the line they sit on.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
