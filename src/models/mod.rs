pub mod question;
pub mod recommendation;
pub mod report;
