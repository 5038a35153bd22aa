//! Command: print version information.

/// The version baked in at build time (`PUNKT_VERSION`), or the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("PUNKT_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the punkt version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("punkt {}", version());
}
