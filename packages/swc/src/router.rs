//! Picks the engine for a file by sniffing its text.
//!
//! The scan is deliberately textual: decorator-like tokens inside string or
//! template literals count as decorators, and a specifier is cut out at the
//! first quote found in the matched clause whatever quote closes it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::comments::strip_comments;

// `\w` is ASCII-only and `.` stops at any line terminator, as in script regexes.
static DECORATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s@(?-u:\w)+").unwrap());
static STATIC_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\sfrom\s+['"]([^\n\r\x{2028}\x{2029}]*)['"]"#).unwrap()
});
static DYNAMIC_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\s(?:import|require)\s*\(['"]([^\n\r\x{2028}\x{2029}]*)['"]\)"#).unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Decorator-aware transpile driven by project compiler options.
    Strict,
    /// Single-file syntax transform driven by per-call options.
    Fast,
}

pub fn route(source: &str, emit_decorator_metadata: bool, modules: Option<&Value>) -> Route {
    if emit_decorator_metadata && uses_decorators(source) {
        log::trace!("decorator found, routing to transpiler");
        return Route::Strict;
    }

    if let Some(modules) = modules.and_then(listed_modules) {
        if imports_listed_module(source, &modules) {
            log::trace!("listed module imported, routing to transpiler");
            return Route::Strict;
        }
    }

    Route::Fast
}

/// Decorator check on comment-free text.
pub fn uses_decorators(source: &str) -> bool {
    DECORATOR.is_match(&strip_comments(source))
}

/// The string entries of a non-empty list. Anything else disables the scan.
pub fn listed_modules(modules: &Value) -> Option<Vec<&str>> {
    match modules {
        Value::Array(items) if !items.is_empty() => {
            Some(items.iter().filter_map(Value::as_str).collect())
        }
        _ => None,
    }
}

/// Scans static imports first, then dynamic `import()` / `require()` calls.
/// Comments are not stripped here.
pub fn imports_listed_module(source: &str, modules: &[&str]) -> bool {
    STATIC_IMPORT
        .find_iter(source)
        .chain(DYNAMIC_IMPORT.find_iter(source))
        .filter_map(|m| specifier(m.as_str()))
        .any(|specifier| modules.contains(&specifier))
}

fn specifier(clause: &str) -> Option<&str> {
    let quote = clause.find(['\'', '"'])?;
    let quote = &clause[quote..quote + 1];
    clause.split(quote).nth(1)
}
