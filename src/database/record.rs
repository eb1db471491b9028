//! Mapping between the act wire document and the rows of its four tables.
//!
//! Encoding never fails: an unparsable date or duration is stored as NULL.
//! Decoding reverses every transformation, including the legacy fallback
//! from the single `representative_document` column.
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use crate::api::types::normalize_list;
use crate::api::{
    ActPayload, AddressDto, HeadDto, InspectionDto, InspectionResponse, LetterDto, OrderDto,
    OrganizationDto, PeriodDto,
};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// `act_organization`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrganizationRow {
    pub full_name: String,
    pub short_name: String,
    pub ogrn: String,
    pub legal_address: String,
    pub postal_address: String,
}

/// `act_head`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadRow {
    pub position: String,
    pub last_name: String,
    pub first_name: String,
    pub middle_name: String,
}

/// `act_inspection`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InspectionDetailRow {
    pub inspection_type: String,
    pub order_number: String,
    pub order_date: Option<NaiveDate>,
    pub inspection_number: String,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    pub duration_work_days: Option<i32>,
    pub letter_number: String,
    pub letter_date: Option<NaiveDate>,
    pub representative_document: String,
    pub addresses: Vec<String>,
    pub authorized_persons: Vec<String>,
    pub signatories: Vec<String>,
    pub representatives: Vec<String>,
}

/// The three sub-table rows written for one act.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InspectionRows {
    pub organization: OrganizationRow,
    pub head: HeadRow,
    pub detail: InspectionDetailRow,
}

/// Server-assigned columns of the root `act` row.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRow {
    pub id: i32,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredInspection {
    pub audit: AuditRow,
    pub rows: InspectionRows,
}

impl InspectionRows {
    pub fn from_payload(payload: &ActPayload) -> Self {
        let org = &payload.organization;
        let head = &payload.head;
        let insp = &payload.inspection;

        let representatives = normalize_list(&insp.representative);
        let representative_document = representatives.first().cloned().unwrap_or_default();

        Self {
            organization: OrganizationRow {
                full_name: org.name.trim().to_string(),
                short_name: org.short_name.trim().to_string(),
                ogrn: org.ogrn.trim().to_string(),
                legal_address: org.address.legal_address.trim().to_string(),
                postal_address: org.address.postal_address.trim().to_string(),
            },
            head: HeadRow {
                position: head.role.trim().to_string(),
                last_name: head.last_name.trim().to_string(),
                first_name: head.name_patronymic.trim().to_string(),
                middle_name: head.last_name_to.trim().to_string(),
            },
            detail: InspectionDetailRow {
                inspection_type: insp.form_type.trim().to_string(),
                order_number: insp.mz_order.number.trim().to_string(),
                order_date: parse_date(&insp.mz_order.date),
                inspection_number: insp.number.trim().to_string(),
                date_start: parse_date(&insp.period.start_date),
                date_end: parse_date(&insp.period.end_date),
                duration_work_days: parse_days(&insp.period.days),
                letter_number: letter_number_from_wire(&insp.letter),
                letter_date: parse_date(&insp.letter.date),
                representative_document,
                addresses: normalize_list(&insp.address_no_index),
                authorized_persons: normalize_list(&insp.inspectors),
                signatories: normalize_list(&insp.signatures),
                representatives,
            },
        }
    }
}

impl StoredInspection {
    pub fn into_response(self) -> InspectionResponse {
        let StoredInspection { audit, rows } = self;
        let InspectionRows { organization, head, detail } = rows;

        let (number_left, number_right) = split_letter_number(&detail.letter_number);
        let representative = if detail.representatives.is_empty() && !detail.representative_document.is_empty() {
            vec![detail.representative_document]
        } else {
            detail.representatives
        };

        InspectionResponse {
            id: audit.id,
            created_at: format_timestamp(&audit.created_at),
            updated_at: format_timestamp(&audit.updated_at),
            created_by: audit.created_by,
            updated_by: audit.updated_by,
            organization: OrganizationDto {
                ogrn: organization.ogrn,
                name: organization.full_name,
                short_name: organization.short_name,
                address: AddressDto {
                    legal_address: organization.legal_address,
                    postal_address: organization.postal_address,
                },
            },
            head: HeadDto {
                role: head.position,
                name_patronymic: head.first_name,
                last_name: head.last_name,
                last_name_to: head.middle_name,
            },
            inspection: InspectionDto {
                form_type: detail.inspection_type,
                mz_order: OrderDto {
                    number: detail.order_number,
                    date: format_date(detail.order_date),
                },
                number: detail.inspection_number,
                period: PeriodDto {
                    start_date: format_date(detail.date_start),
                    end_date: format_date(detail.date_end),
                    days: format_days(detail.duration_work_days),
                },
                letter: LetterDto {
                    number_left,
                    number_right,
                    date: format_date(detail.letter_date),
                    number: None,
                },
                address_no_index: detail.addresses,
                representative,
                inspectors: detail.authorized_persons,
                signatures: detail.signatories,
            },
        }
    }
}

/// Prefers the split parts; falls back to a combined `number` when both parts are blank.
fn letter_number_from_wire(letter: &LetterDto) -> String {
    let split_is_blank = letter.number_left.trim().is_empty() && letter.number_right.trim().is_empty();
    match letter.number.as_deref() {
        Some(combined) if split_is_blank => {
            let (left, right) = split_letter_number(combined);
            build_letter_number(&left, &right)
        }
        _ => build_letter_number(&letter.number_left, &letter.number_right),
    }
}

/// Joins the two halves with `/`, or returns whichever half is present.
pub fn build_letter_number(left: &str, right: &str) -> String {
    let left = left.trim();
    let right = right.trim();
    match (left.is_empty(), right.is_empty()) {
        (false, false) => format!("{}/{}", left, right),
        _ => format!("{}{}", left, right),
    }
}

/// Splits on the first `/`. A value without a separator is all left part.
pub fn split_letter_number(value: &str) -> (String, String) {
    match value.trim().split_once('/') {
        Some((left, right)) => (left.trim().to_string(), right.trim().to_string()),
        None => (value.trim().to_string(), String::new()),
    }
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

pub fn format_date(value: Option<NaiveDate>) -> String {
    value.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default()
}

pub fn parse_days(value: &str) -> Option<i32> {
    value.trim().parse().ok()
}

pub fn format_days(value: Option<i32>) -> String {
    value.map(|d| d.to_string()).unwrap_or_default()
}

pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}
