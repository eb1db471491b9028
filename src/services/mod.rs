pub mod dadata_service;
pub mod docx_export;

pub use dadata_service::{DadataClient, LookupError, OrganizationInfo, OrganizationLookup};
pub use docx_export::{build_inspection_docx, ExportError, DOCX_CONTENT_TYPE};
