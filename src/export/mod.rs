pub mod capture;
pub mod clipboard;
