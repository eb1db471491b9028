pub mod types;

pub use types::{
    ActPayload, AddressDto, HeadDto, InspectionDto, InspectionListResponse, InspectionResponse,
    LetterDto, OrderDto, OrganizationDto, PeriodDto,
};
