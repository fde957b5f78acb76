pub mod dates;
pub mod fetch;
