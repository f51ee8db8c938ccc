pub mod admin;
pub mod assistant;
pub mod blocks;
pub mod catalog;
pub mod practice;
pub mod progress;
pub mod schedule;
pub mod users;
