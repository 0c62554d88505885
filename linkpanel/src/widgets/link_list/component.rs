use gtk::prelude::*;
use relm4::{gtk::Widget, prelude::*};

use applinks_http::Link;

use super::models::{LinkListInit, LinkListMsg};

/// Hover dropdown listing one category's links, floating over sibling cells
pub struct LinkListPopover {
    links: Vec<Link>,
    content_box: gtk::Box,
    root: gtk::Popover,
}

#[relm4::component(pub)]
impl SimpleComponent for LinkListPopover {
    type Init = LinkListInit;
    type Input = LinkListMsg;
    type Output = ();

    view! {
        #[root]
        gtk::Popover {
            set_css_classes: &["link-list"],
            set_position: gtk::PositionType::Bottom,
            set_has_arrow: false,
            // Hover-driven: pointer focus must stay with the cells below
            set_autohide: false,
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        _sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let content_box = gtk::Box::builder()
            .orientation(gtk::Orientation::Vertical)
            .spacing(0)
            .css_classes(vec!["link-list-rows"])
            .build();

        if let Some(width) = init.width {
            content_box.set_width_request(width);
        }

        root.set_child(Some(&content_box));

        let model = LinkListPopover {
            links: Vec::new(),
            content_box: content_box.clone(),
            root: root.clone(),
        };

        let widgets = view_output!();

        // Set parent widget for popover (if provided)
        if let Some(parent) = &init.parent {
            root.set_parent(parent);
        }

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            LinkListMsg::SetLinks(links) => {
                self.links = links;
                self.render_rows();
            }
            LinkListMsg::Show => self.root.popup(),
            LinkListMsg::Hide => self.root.popdown(),
        }
    }
}

impl LinkListPopover {
    /// Render all link rows into the content box
    fn render_rows(&self) {
        // Clear existing content
        while let Some(child) = self.content_box.first_child() {
            self.content_box.remove(&child);
        }

        let last = self.links.len().saturating_sub(1);
        for (index, link) in self.links.iter().enumerate() {
            let row = Self::create_link_row(link);
            if index < last {
                row.add_css_class("link-row-divided");
            }
            self.content_box.append(&row);
        }
    }

    /// Create a single ellipsized link row
    fn create_link_row(link: &Link) -> gtk::LinkButton {
        let label = gtk::Label::builder()
            .label(link.label.as_deref().unwrap_or(&link.url))
            .css_classes(vec!["link-row-label"])
            .halign(gtk::Align::Start)
            .ellipsize(gtk::pango::EllipsizeMode::End)
            .max_width_chars(32)
            .build();

        let row = gtk::LinkButton::builder()
            .uri(&link.url)
            .css_classes(vec!["link-row"])
            .build();
        row.set_child(Some(&label));
        row
    }

    pub fn set_parent(&self, parent: &impl IsA<Widget>) {
        self.root.set_parent(parent);
    }

    /// Make the dropdown part of its cell's hover region, so moving the
    /// pointer onto a link does not count as leaving the cell
    pub fn add_motion_controller(&self, controller: gtk::EventControllerMotion) {
        self.root.add_controller(controller);
    }

    /// Detach from the cell before the cell itself is dropped
    pub fn unparent(&self) {
        self.root.popdown();
        self.root.unparent();
    }
}
