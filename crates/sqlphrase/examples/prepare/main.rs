//! Template formatting with type-aware escaping.
//!
//! Run with: cargo run --example prepare

use sqlphrase::{prepare, try_prepare};

fn main() {
    // Strings are escaped and quoted; numbers embed raw; %i backticks
    // identifiers.
    println!("{}", prepare("SELECT * FROM %i WHERE name = %s", ("users", "o'brien")));
    println!("{}", prepare("LIMIT %d OFFSET %d", (10, 20)));

    // Positional placeholders can reuse an argument.
    println!("{}", prepare("%1$s = %1$s", "x"));

    // Stray percents in templates and argument data are neutralized.
    println!("{}", prepare("discount = %s", "50% off"));

    // The fragment API degrades silently; try_prepare tells you why.
    match try_prepare("a = %s AND b = %s", ["only one"]) {
        Ok(sql) => println!("{sql}"),
        Err(err) => println!("rejected: {err}"),
    }
}
