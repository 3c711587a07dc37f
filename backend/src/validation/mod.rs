pub mod rules;

pub use rules::{is_valid_email, is_valid_identifier, is_valid_reg_number};
