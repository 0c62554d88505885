pub mod component;
pub mod models;

pub use component::LinkListPopover;
pub use models::{LinkListInit, LinkListMsg};
