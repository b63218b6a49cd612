//! Chained WHERE-clause assembly.
//!
//! Run with: cargo run --example where_builder

use sqlphrase::prelude::*;

fn main() {
    // One phrase per field; fields join with AND.
    let mut qb = WhereBuilder::new();
    qb.r#where("status").equals("active");
    qb.r#where("age").at_least(18);
    println!("{}", qb.render());

    // or() amends the previous phrase instead of appending a new one.
    qb.r#where("role").equals("admin");
    qb.or().equals("editor");
    qb.r#where("deleted_at").not_exists();
    println!("{}", qb.render());

    // Range and membership operators.
    qb.r#where("created_at")
        .between(vec!["2024-01-01 00:00", "2024-06-30 23:59"]);
    qb.r#where("id").not_in(vec![3, 5, 8]);
    qb.r#where("name").like("o'brien");
    println!("{}", qb.render());

    // Untrusted input stays inert.
    qb.r#where("name").equals("'; DROP TABLE users; --");
    println!("{}", qb.render());
}
