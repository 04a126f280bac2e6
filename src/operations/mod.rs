pub mod build;
pub mod jump;
pub mod route;
