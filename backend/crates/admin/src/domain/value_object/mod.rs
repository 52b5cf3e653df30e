pub mod property_status;

pub use property_status::PropertyStatus;
