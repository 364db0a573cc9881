pub mod arc;
pub mod archetype;
pub mod catalog;
pub mod config;
pub mod enhance;
pub mod faction;
pub mod filter;
pub mod pipeline;
pub mod psyche;
pub mod resolution;
pub mod template;
pub mod weights;
