// src/ui/mod.rs

// Terminal output. Nothing here is needed to run a scan; the core only emits
// events and results, this module decides how they look.

pub mod console;
pub mod summary;

pub use console::ConsoleReporter;
