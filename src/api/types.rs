// Wire shapes of the inspection act API.
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Request body of `POST /inspections` and `PUT /inspections/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActPayload {
    pub created_by: String,
    pub organization: OrganizationDto,
    pub head: HeadDto,
    pub inspection: InspectionDto,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrganizationDto {
    pub ogrn: String,
    pub name: String,
    pub short_name: String,
    pub address: AddressDto,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddressDto {
    pub legal_address: String,
    pub postal_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeadDto {
    pub role: String,
    pub name_patronymic: String,
    pub last_name: String,
    pub last_name_to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InspectionDto {
    pub form_type: String,
    pub mz_order: OrderDto,
    pub number: String,
    pub period: PeriodDto,
    pub letter: LetterDto,
    #[serde(deserialize_with = "string_list")]
    pub address_no_index: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub representative: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub inspectors: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub signatures: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderDto {
    pub number: String,
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PeriodDto {
    pub start_date: String,
    pub end_date: String,
    #[serde(deserialize_with = "string_or_number")]
    pub days: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LetterDto {
    pub number_left: String,
    pub number_right: String,
    pub date: String,
    /// Combined `left/right` form accepted from older clients; never emitted.
    #[serde(skip_serializing)]
    pub number: Option<String>,
}

/// A fully materialized act as returned by the read endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionResponse {
    pub id: i32,
    pub created_at: String,
    pub updated_at: String,
    pub created_by: String,
    pub updated_by: String,
    pub organization: OrganizationDto,
    pub head: HeadDto,
    pub inspection: InspectionDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectionListResponse {
    pub items: Vec<InspectionResponse>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

/// Accepts an array of strings, `null`, or a single comma-separated string.
/// Elements are trimmed and blanks dropped.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Single(String),
    }

    let raw = Option::<Raw>::deserialize(deserializer)?;
    let items = match raw {
        None => Vec::new(),
        Some(Raw::List(items)) => items,
        Some(Raw::Single(joined)) => joined.split(',').map(str::to_string).collect(),
    };
    Ok(normalize_list(items))
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

/// Trims every element and drops the empty ones, keeping order.
pub fn normalize_list<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| v.as_ref().trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
