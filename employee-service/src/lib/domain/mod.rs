pub mod account;
pub mod employee;
pub mod pagination;
pub mod validation;
