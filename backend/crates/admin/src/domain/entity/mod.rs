pub mod property;
pub mod transaction;

pub use property::Property;
pub use transaction::Transaction;
