//! Application Layer

pub mod dashboard;
pub mod properties;
pub mod staff;
pub mod users;

pub use dashboard::AdminReports;
pub use properties::PropertyModeration;
pub use staff::{CreateStaffInput, CreateStaffOutput, CreateStaffUseCase};
pub use users::{AdminContext, UpdateUserInput, UserAdministration};
