pub mod appointment;
pub mod enums;
pub mod patient;
pub mod payment;
pub mod tenant;
pub mod year_month;

pub use appointment::*;
pub use enums::*;
pub use patient::*;
pub use payment::*;
pub use tenant::*;
pub use year_month::*;
