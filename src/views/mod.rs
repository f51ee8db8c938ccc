pub mod layout;
pub mod report;

pub use layout::page;
