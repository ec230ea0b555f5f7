//! Quality rules: maintainability and hygiene.

mod no_console;
mod weak_name;

pub use no_console::NoConsoleWriteRule;
pub use weak_name::WeakIdentifierRule;
