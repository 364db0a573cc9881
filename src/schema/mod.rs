pub mod event;
pub mod game;
pub mod narrative;
pub mod psyche;
