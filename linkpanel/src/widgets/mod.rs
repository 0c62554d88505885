// Widget modules
pub mod app_links;

// Dropdown component module
pub mod link_list;

// Re-exports
pub use app_links::AppLinks;
