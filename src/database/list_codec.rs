//! Storage representations for the repeated string columns of `act_inspection`.
//!
//! The record mapper only ever sees `Vec<String>`. Which physical form the
//! columns use (native `TEXT[]` or JSON text) is decided here, once, from
//! configuration.
use std::sync::Arc;

use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{Postgres, Row};

use super::manager::DatabaseError;
use crate::config::ListEncoding;

pub type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

pub trait ListCodec: Send + Sync + std::fmt::Debug {
    /// Binds `values` as the next positional parameter.
    fn bind<'q>(&self, query: PgQuery<'q>, values: &[String]) -> Result<PgQuery<'q>, DatabaseError>;

    /// Reads `column` back into the ordered list that was bound.
    fn decode(&self, row: &PgRow, column: &str) -> Result<Vec<String>, DatabaseError>;
}

pub fn codec_for(encoding: ListEncoding) -> Arc<dyn ListCodec> {
    match encoding {
        ListEncoding::NativeArray => Arc::new(NativeArrayCodec),
        ListEncoding::JsonText => Arc::new(JsonTextCodec),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NativeArrayCodec;

impl ListCodec for NativeArrayCodec {
    fn bind<'q>(&self, query: PgQuery<'q>, values: &[String]) -> Result<PgQuery<'q>, DatabaseError> {
        Ok(query.bind(values.to_vec()))
    }

    fn decode(&self, row: &PgRow, column: &str) -> Result<Vec<String>, DatabaseError> {
        let values: Option<Vec<String>> = row.try_get(column).map_err(|e| corrupt(column, e))?;
        Ok(values.unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTextCodec;

impl JsonTextCodec {
    pub fn encode_text(values: &[String]) -> Result<String, DatabaseError> {
        serde_json::to_string(values).map_err(|e| DatabaseError::QueryError(e.to_string()))
    }

    /// NULL and empty text read as an empty list; anything else must be a JSON array of strings.
    pub fn decode_text(column: &str, raw: Option<&str>) -> Result<Vec<String>, DatabaseError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Vec::new()),
            Some(text) => serde_json::from_str::<Option<Vec<String>>>(text)
                .map(Option::unwrap_or_default)
                .map_err(|e| corrupt(column, e)),
        }
    }
}

impl ListCodec for JsonTextCodec {
    fn bind<'q>(&self, query: PgQuery<'q>, values: &[String]) -> Result<PgQuery<'q>, DatabaseError> {
        Ok(query.bind(Self::encode_text(values)?))
    }

    fn decode(&self, row: &PgRow, column: &str) -> Result<Vec<String>, DatabaseError> {
        let raw: Option<String> = row.try_get(column).map_err(|e| corrupt(column, e))?;
        Self::decode_text(column, raw.as_deref())
    }
}

fn corrupt(column: &str, err: impl std::fmt::Display) -> DatabaseError {
    DatabaseError::Corrupt {
        column: column.to_string(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_text_preserves_order() {
        let values = vec!["b".to_string(), "a".to_string(), "c, d".to_string()];
        let text = JsonTextCodec::encode_text(&values).unwrap();
        assert_eq!(text, r#"["b","a","c, d"]"#);
        assert_eq!(JsonTextCodec::decode_text("addresses", Some(&text)).unwrap(), values);
    }

    #[test]
    fn json_text_empty_forms_decode_to_empty_list() {
        assert_eq!(JsonTextCodec::encode_text(&[]).unwrap(), "[]");
        assert!(JsonTextCodec::decode_text("addresses", None).unwrap().is_empty());
        assert!(JsonTextCodec::decode_text("addresses", Some("")).unwrap().is_empty());
        assert!(JsonTextCodec::decode_text("addresses", Some("null")).unwrap().is_empty());
        assert!(JsonTextCodec::decode_text("addresses", Some("[]")).unwrap().is_empty());
    }

    #[test]
    fn json_text_corruption_is_a_hard_failure() {
        let err = JsonTextCodec::decode_text("signatories", Some("{not json")).unwrap_err();
        match err {
            DatabaseError::Corrupt { column, .. } => assert_eq!(column, "signatories"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn codec_selection_follows_config() {
        assert_eq!(format!("{:?}", codec_for(ListEncoding::NativeArray)), "NativeArrayCodec");
        assert_eq!(format!("{:?}", codec_for(ListEncoding::JsonText)), "JsonTextCodec");
    }
}
