pub mod ask;
pub mod health;
pub mod root;
pub mod stats;
