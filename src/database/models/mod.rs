pub mod employee;
pub mod user;
pub mod verification_area;

pub use employee::Employee;
pub use user::{User, UserView};
pub use verification_area::{normalize_areas, VerificationArea, VerificationAreasDocument};
