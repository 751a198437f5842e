pub mod ids;
pub mod phone;
pub mod record;

pub use ids::PhoneId;
pub use phone::{is_canonical, normalize_phone};
pub use record::PhoneRecord;
