pub mod membership;
pub mod room;
