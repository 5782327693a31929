pub mod models;
pub mod transformer;
pub mod validator;
