use sea_orm::sea_query::{Expr, Func, IntoColumnRef, SimpleExpr};

/// `LOWER(col) LIKE '%needle%'` with `needle` lowercased and LIKE
/// metacharacters escaped.
pub fn contains_ignore_case<C>(col: C, needle: &str) -> SimpleExpr
where
    C: IntoColumnRef,
{
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(col))).like(pattern)
}

fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
