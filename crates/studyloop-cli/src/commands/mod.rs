pub mod check;
pub mod config;
pub mod modes;
pub mod play;
pub mod xp;
