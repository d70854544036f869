pub mod findings;
pub mod inventory;
pub mod report;
pub mod table;
