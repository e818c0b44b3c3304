pub mod admin;
pub mod cases;
pub mod containers;
pub mod files;
