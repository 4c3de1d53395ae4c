//! Procedural macros for sqlstitch
//!
//! Provides the `sql!` template macro.

use proc_macro::TokenStream;
use syn::parse_macro_input;

mod template;

/// Build a `sqlstitch::Template` from a format string.
///
/// # Example
///
/// ```ignore
/// use sqlstitch::sql;
///
/// let id = 10;
/// let table = "Users";
/// let t = sql!("SELECT * FROM {table:raw} WHERE Id = {id}");
/// ```
///
/// # Placeholders
///
/// - `{expr}` - any expression, converted by value (`{&name}` or
///   `{name.clone()}` keeps ownership)
/// - `{expr:raw}` - inline the value's text instead of binding it
/// - `{}` / `{0}` - positional arguments passed after the format string
/// - `{name}` - a `name = expr` argument, if one is given
/// - `{{` / `}}` - literal braces
///
/// A digit-only placeholder is an argument index when positional arguments
/// are present and an integer literal otherwise, so `sql!("Id = {10}")`
/// binds the value `10`.
///
/// Every argument passed after the format string must be used.
#[proc_macro]
pub fn sql(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as template::SqlInput);
    template::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
