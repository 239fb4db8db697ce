pub mod handlers;
pub mod service;
pub mod transition;
pub mod validation;
