pub mod candidate;
pub mod ticket;
