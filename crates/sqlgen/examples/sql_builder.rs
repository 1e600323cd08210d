//! Build a filtered listing query and its COUNT(*) companion.
//!
//! Run with:
//!   cargo run --example sql_builder -p sqlgen
//!
//! Optional (pick the placeholder dialect):
//!   SQLGEN_PLACEHOLDER=colon cargo run --example sql_builder -p sqlgen

use std::env;

use sqlgen::{Expr, PlaceholderStyle, SelectBuilder, SqlResult, Statement, StatementBuilder};

#[derive(Debug)]
struct Filters {
    status: Option<String>,
    roles_any_of: Vec<String>,
    include_deleted: bool,
    page: u64,
    per_page: u64,
}

fn list_users(pg: &StatementBuilder, filters: &Filters) -> SelectBuilder {
    let mut qb = pg
        .select(["id", "name", "status", "role", "created_at"])
        .from(["users"]);

    if let Some(status) = &filters.status {
        qb = qb.eq("status", status.as_str());
    }
    if !filters.roles_any_of.is_empty() {
        qb = qb.where_clause(Expr::or(
            filters
                .roles_any_of
                .iter()
                .map(|role| Expr::eq("role", role.as_str()))
                .collect(),
        ));
    }
    if !filters.include_deleted {
        qb = qb.eq("deleted_at", None::<i64>);
    }

    qb.order_by(["created_at DESC", "id"])
        .limit(filters.per_page)
        .offset(filters.page.saturating_sub(1) * filters.per_page)
}

fn main() -> SqlResult<()> {
    let style = match env::var("SQLGEN_PLACEHOLDER") {
        Ok(v) => v.parse::<PlaceholderStyle>()?,
        Err(_) => PlaceholderStyle::Dollar,
    };
    let pg = StatementBuilder::with_style(style);

    let filters = Filters {
        status: Some("active".to_string()),
        roles_any_of: vec!["admin".to_string(), "owner".to_string()],
        include_deleted: false,
        page: 2,
        per_page: 10,
    };

    let qb = list_users(&pg, &filters);
    let page = qb.build()?;
    println!("page sql:\n{}\n", page.sql);
    println!("args = {:?}\n", page.args);

    let total = qb.count().build()?;
    println!("count sql:\n{}", total.sql);

    let stale = pg
        .delete("sessions")
        .where_raw("expires_at < now() - ?::interval", sqlgen::args!["30 days"])
        .build()?;
    println!("\ncleanup sql:\n{}", stale.sql);

    Ok(())
}
