use serde_json::{json, Value};
use sqlx::postgres::PgArguments;

use crate::config::ApiConfig;

/// Generated SQL fragment plus its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}

/// Raw query-string parameters of `GET /inspections`
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct InspectionListParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub year: Option<String>,
    pub ogrn: Option<String>,
}

/// Validated list request. Bad or non-positive numbers fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct InspectionListQuery {
    pub page: i64,
    pub page_size: i64,
    pub year: Option<i32>,
    pub ogrn: Option<String>,
}

impl InspectionListQuery {
    pub fn from_params(params: &InspectionListParams, api: &ApiConfig) -> Self {
        let page_size = parse_positive(params.page_size.as_deref())
            .unwrap_or(api.default_page_size)
            .min(api.max_page_size)
            .max(1);
        // Keeps (page - 1) * page_size within i64
        let page = parse_positive(params.page.as_deref())
            .unwrap_or(1)
            .min(i64::MAX / page_size);
        let year = parse_positive(params.year.as_deref()).and_then(|y| i32::try_from(y).ok());
        let ogrn = params
            .ogrn
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Self { page, page_size, year, ogrn }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    /// WHERE clause over the `act` / `org` / `insp` aliases, numbered from `$1`.
    pub fn where_clause(&self) -> SqlResult {
        let mut clauses = vec!["1=1".to_string()];
        let mut params = Vec::new();

        if let Some(ogrn) = &self.ogrn {
            params.push(json!(format!("%{}%", escape_like(ogrn))));
            clauses.push(format!("org.organization_ogrn LIKE ${}", params.len()));
        }

        if let Some(year) = self.year {
            params.push(json!(year));
            let n = params.len();
            clauses.push(format!(
                "(EXTRACT(YEAR FROM insp.date_start)::int = ${n} \
                 OR EXTRACT(YEAR FROM insp.date_end)::int = ${n} \
                 OR EXTRACT(YEAR FROM act.created_at)::int = ${n})"
            ));
        }

        SqlResult {
            query: clauses.join(" AND "),
            params,
        }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok()).filter(|v| *v > 0)
}

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                // Int4 keeps comparisons against `::int` expressions exact
                match i32::try_from(i) {
                    Ok(small) => q.bind(small),
                    Err(_) => q.bind(i),
                }
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()), // JSONB
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn params(page: &str, page_size: &str, year: &str, ogrn: &str) -> InspectionListParams {
        let some = |s: &str| if s.is_empty() { None } else { Some(s.to_string()) };
        InspectionListParams {
            page: some(page),
            page_size: some(page_size),
            year: some(year),
            ogrn: some(ogrn),
        }
    }

    #[test]
    fn invalid_paging_falls_back_to_defaults() {
        let api = AppConfig::development().api;
        let q = InspectionListQuery::from_params(&params("0", "-5", "abc", "  "), &api);
        assert_eq!(q.page, 1);
        assert_eq!(q.page_size, 10);
        assert_eq!(q.year, None);
        assert_eq!(q.ogrn, None);
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn page_size_is_capped() {
        let api = AppConfig::development().api;
        let q = InspectionListQuery::from_params(&params("3", "100000", "", ""), &api);
        assert_eq!(q.page_size, 500);
        assert_eq!(q.offset(), 1000);
    }

    #[test]
    fn huge_page_is_clamped_so_offset_fits() {
        let api = AppConfig::development().api;
        let q = InspectionListQuery::from_params(&params("9223372036854775807", "10", "", ""), &api);
        assert_eq!(q.page, i64::MAX / 10);
        assert!(q.offset() > 0);
        assert_eq!(q.offset(), (i64::MAX / 10 - 1) * 10);

        let q = InspectionListQuery::from_params(&params("9223372036854775807", "", "", ""), &api);
        assert!(q.offset() > 0);
    }

    #[test]
    fn where_clause_numbers_parameters() {
        let api = AppConfig::development().api;
        let q = InspectionListQuery::from_params(&params("", "", "2024", "10277"), &api);
        let sql = q.where_clause();

        assert!(sql.query.starts_with("1=1 AND org.organization_ogrn LIKE $1"));
        assert!(sql.query.contains("EXTRACT(YEAR FROM insp.date_start)::int = $2"));
        assert!(sql.query.contains("EXTRACT(YEAR FROM act.created_at)::int = $2"));
        assert_eq!(sql.params, vec![json!("%10277%"), json!(2024)]);
    }

    #[test]
    fn no_filters_yield_tautology() {
        let api = AppConfig::development().api;
        let sql = InspectionListQuery::from_params(&InspectionListParams::default(), &api).where_clause();
        assert_eq!(sql.query, "1=1");
        assert!(sql.params.is_empty());
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("10%_2"), "10\\%\\_2");
    }
}
