pub mod classify;
pub mod compose;
pub mod deliver;
pub mod gate;
