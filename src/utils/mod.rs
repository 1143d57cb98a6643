pub mod extract;
pub mod text;
pub mod validation;
