pub mod cookies;
pub mod email;
pub mod password;
pub mod security;
