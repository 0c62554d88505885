pub mod component;
pub mod models;

pub use component::AppLinks;
