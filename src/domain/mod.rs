pub mod item;
pub mod repository;
