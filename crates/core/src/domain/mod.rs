pub mod interaction;
pub mod item;
