use relm4::gtk;

use applinks_http::Link;

/// Initialization data for LinkListPopover
#[derive(Clone)]
pub struct LinkListInit {
    pub parent: Option<gtk::Widget>,
    pub width: Option<i32>,
}

/// Messages for LinkListPopover
#[derive(Debug, Clone)]
pub enum LinkListMsg {
    /// Replace the rows with this category's links
    SetLinks(Vec<Link>),
    /// Open beneath the parent cell
    Show,
    /// Close
    Hide,
}
