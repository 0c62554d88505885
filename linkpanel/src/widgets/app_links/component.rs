use gtk::prelude::*;
use relm4::prelude::*;
use tracing::{debug, warn};

use applinks_http::{Category, Identity, LinksClient};

use super::models::{
    cell_kind, grid_position, relative_age, resolve_phase, CellKind, FetchCycle, FetchOutcome,
    HoverChange, HoverSlot, PanelPhase,
};
use crate::config::{AppEntry, Config};
use crate::widgets::link_list::{LinkListInit, LinkListMsg, LinkListPopover};

const PANEL_GLYPH: &str = "󰌷";
const INDICATOR_CLOSED: &str = "▾";
const INDICATOR_OPEN: &str = "▴";

/// Widget handles for one on-screen category cell
struct CategoryCell {
    indicator: Option<gtk::Label>,
    dropdown: Option<Controller<LinkListPopover>>,
}

pub struct AppLinks {
    client: Option<LinksClient>,
    apps: Vec<AppEntry>,
    selected: usize,
    identity: Option<Identity>,
    cycle: FetchCycle,
    outcome: Option<FetchOutcome>,
    phase: PanelPhase,
    hover: HoverSlot,
    cells: Vec<CategoryCell>,
    content_box: gtk::Box,
    meta_label: gtk::Label,
}

#[derive(Debug)]
pub enum AppLinksMsg {
    /// Show links for the application at this index in the configured list
    Select(usize),
    /// Advance to the next configured application
    NextApp,
    /// A fetch finished; only applied while `generation` is still current
    Fetched { generation: u64, outcome: FetchOutcome },
    /// Pointer entered the category cell at this index
    HoverEnter(usize),
    /// Pointer left the category cell at this index
    HoverLeave(usize),
}

#[relm4::component(pub)]
impl SimpleComponent for AppLinks {
    type Init = Config;
    type Input = AppLinksMsg;
    type Output = ();

    view! {
        gtk::Box {
            set_orientation: gtk::Orientation::Vertical,
            set_css_classes: &["app-links-widget", "widget"],

            // Header: glyph, title, version/freshness meta, app switcher
            gtk::Box {
                set_orientation: gtk::Orientation::Horizontal,
                set_spacing: 6,
                set_css_classes: &["panel-header"],

                gtk::Label {
                    set_label: PANEL_GLYPH,
                    set_css_classes: &["panel-glyph"],
                },

                #[name(title_label)]
                gtk::Label {
                    set_css_classes: &["panel-title"],
                    set_halign: gtk::Align::Start,
                    set_hexpand: true,
                    set_ellipsize: gtk::pango::EllipsizeMode::End,
                },

                #[name(meta_label)]
                gtk::Label {
                    set_css_classes: &["panel-meta"],
                    set_halign: gtk::Align::End,
                },

                #[name(switch_button)]
                gtk::Button {
                    set_label: "⇆",
                    set_css_classes: &["panel-switch"],
                    set_visible: false,
                    set_tooltip_text: Some("Next application"),
                    connect_clicked => AppLinksMsg::NextApp,
                },
            },

            #[name(content_box)]
            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,
                set_css_classes: &["panel-content"],
            },
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let widgets = view_output!();

        widgets.title_label.set_label(&init.title);
        widgets.switch_button.set_visible(init.applications.len() > 1);

        let client = match LinksClient::builder()
            .base_url(init.endpoint.clone())
            .legacy_query(init.legacy_query)
            .build()
        {
            Ok(client) => Some(client),
            Err(e) => {
                warn!(endpoint = %init.endpoint, error = %e, "links client unavailable");
                None
            }
        };

        let model = AppLinks {
            client,
            apps: init.applications,
            selected: 0,
            identity: None,
            cycle: FetchCycle::default(),
            outcome: None,
            phase: PanelPhase::Loading,
            hover: HoverSlot::default(),
            cells: Vec::new(),
            content_box: widgets.content_box.clone(),
            meta_label: widgets.meta_label.clone(),
        };

        // Kick off the first cycle for the first configured application
        sender.input(AppLinksMsg::Select(0));

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppLinksMsg::Select(index) => {
                self.selected = index;
                self.identity = self.apps.get(index).map(AppEntry::identity);
                self.start_cycle(&sender);
            }
            AppLinksMsg::NextApp => {
                if !self.apps.is_empty() {
                    sender.input(AppLinksMsg::Select((self.selected + 1) % self.apps.len()));
                }
            }
            AppLinksMsg::Fetched { generation, outcome } => {
                if !self.cycle.accept(generation) {
                    debug!(generation, "discarding stale fetch result");
                    return;
                }
                if let Err(e) = &outcome {
                    warn!(error = %e, "links fetch failed");
                }
                self.outcome = Some(outcome);
                self.refresh(&sender);
            }
            AppLinksMsg::HoverEnter(index) => {
                let change = self.hover.enter(index);
                self.apply_hover(change);
            }
            AppLinksMsg::HoverLeave(index) => {
                let change = self.hover.leave(index);
                self.apply_hover(change);
            }
        }
    }
}

impl AppLinks {
    /// Discard whatever the previous identity produced and start a fresh
    /// fetch, unless the current identity cannot be fetched at all.
    fn start_cycle(&mut self, sender: &ComponentSender<Self>) {
        self.outcome = None;

        match (&self.identity, &self.client) {
            (Some(identity), Some(client)) if identity.has_name() => {
                let generation = self.cycle.begin();
                let client = client.clone();
                let identity = identity.clone();
                let sender = sender.clone();
                let handle = relm4::spawn(async move {
                    let outcome = client.fetch_links(&identity).await;
                    sender.input(AppLinksMsg::Fetched { generation, outcome });
                });
                self.cycle.attach(handle);
            }
            _ => self.cycle.cancel(),
        }

        self.refresh(sender);
    }

    fn refresh(&mut self, sender: &ComponentSender<Self>) {
        let named = self.identity.as_ref().is_some_and(Identity::has_name);
        self.phase = if named && self.client.is_none() {
            // No usable endpoint: same rendering as a failed fetch
            PanelPhase::Unavailable
        } else {
            resolve_phase(named, self.cycle.in_flight(), self.outcome.as_ref())
        };

        self.update_meta();
        self.render_content(sender);
    }

    fn update_meta(&self) {
        let mut meta = format!("v{}", env!("CARGO_PKG_VERSION"));
        if let Some(Ok(set)) = &self.outcome {
            if let Some(updated) = set.last_updated {
                meta.push_str(" · ");
                meta.push_str(&relative_age(updated, chrono::Utc::now()));
            }
        }
        self.meta_label.set_label(&meta);
    }

    /// Rebuild the content area for the current phase
    fn render_content(&mut self, sender: &ComponentSender<Self>) {
        self.clear_content();
        self.content_box.set_css_classes(&["panel-content", self.phase.css_class()]);

        if let Some(text) = self.phase.placeholder() {
            let placeholder = gtk::Label::builder()
                .label(text)
                .css_classes(vec!["panel-placeholder"])
                .halign(gtk::Align::Center)
                .hexpand(true)
                .build();
            self.content_box.append(&placeholder);
            return;
        }

        // Populated: column-major grid of category cells
        let Some(Ok(set)) = &self.outcome else { return };
        let grid = gtk::Grid::builder()
            .row_spacing(4)
            .column_spacing(4)
            .css_classes(vec!["category-grid"])
            .build();

        let mut cells = Vec::with_capacity(set.categories.len());
        for (index, category) in set.categories.iter().enumerate() {
            let (widget, handles) = Self::build_cell(index, category, sender);
            let (column, row) = grid_position(index, set.max_rows);
            grid.attach(&widget, column, row, 1, 1);
            cells.push(handles);
        }

        self.cells = cells;
        self.content_box.append(&grid);
    }

    /// Unparent per-cell popovers and drop the previous content
    fn clear_content(&mut self) {
        let _ = self.hover.clear();
        for cell in self.cells.drain(..) {
            if let Some(dropdown) = &cell.dropdown {
                dropdown.model().unparent();
            }
        }
        while let Some(child) = self.content_box.first_child() {
            self.content_box.remove(&child);
        }
    }

    fn build_cell(
        index: usize,
        category: &Category,
        sender: &ComponentSender<Self>,
    ) -> (gtk::Widget, CategoryCell) {
        let (widget, handles) = match cell_kind(category) {
            CellKind::Notice { message } => {
                let cell = gtk::Box::builder()
                    .orientation(gtk::Orientation::Vertical)
                    .css_classes(vec!["category-cell", "cell-notice"])
                    .build();
                cell.append(&Self::cell_title(&category.icon, &category.label));

                let note = gtk::Label::builder()
                    .label(message)
                    .css_classes(vec!["cell-message"])
                    .halign(gtk::Align::Start)
                    .ellipsize(gtk::pango::EllipsizeMode::End)
                    .max_width_chars(28)
                    .build();
                cell.append(&note);

                (cell.upcast::<gtk::Widget>(), CategoryCell { indicator: None, dropdown: None })
            }
            CellKind::Direct { url, label } => {
                let row = gtk::Box::builder()
                    .orientation(gtk::Orientation::Horizontal)
                    .spacing(4)
                    .build();
                row.append(&Self::cell_title(&category.icon, label));

                let arrow = gtk::Label::builder()
                    .label("→")
                    .css_classes(vec!["cell-arrow"])
                    .build();
                row.append(&arrow);

                let cell = gtk::LinkButton::builder()
                    .uri(url)
                    .css_classes(vec!["category-cell", "cell-direct"])
                    .tooltip_text(url)
                    .build();
                cell.set_child(Some(&row));

                (cell.upcast::<gtk::Widget>(), CategoryCell { indicator: None, dropdown: None })
            }
            CellKind::Disclosure { links } => {
                let cell = gtk::Box::builder()
                    .orientation(gtk::Orientation::Horizontal)
                    .spacing(4)
                    .css_classes(vec!["category-cell", "cell-disclosure"])
                    .build();
                cell.append(&Self::cell_title(&category.icon, &category.label));

                let indicator = gtk::Label::builder()
                    .label(INDICATOR_CLOSED)
                    .css_classes(vec!["cell-indicator"])
                    .build();
                cell.append(&indicator);

                let dropdown = LinkListPopover::builder()
                    .launch(LinkListInit { parent: None, width: Some(180) })
                    .detach();
                dropdown.model().set_parent(&cell);
                dropdown.emit(LinkListMsg::SetLinks(links.to_vec()));
                dropdown.model().add_motion_controller(Self::hover_controller(index, sender));

                (
                    cell.upcast::<gtk::Widget>(),
                    CategoryCell { indicator: Some(indicator), dropdown: Some(dropdown) },
                )
            }
        };

        widget.add_controller(Self::hover_controller(index, sender));

        (widget, handles)
    }

    fn hover_controller(index: usize, sender: &ComponentSender<Self>) -> gtk::EventControllerMotion {
        let motion = gtk::EventControllerMotion::new();
        {
            let sender = sender.clone();
            motion.connect_enter(move |_, _, _| sender.input(AppLinksMsg::HoverEnter(index)));
        }
        {
            let sender = sender.clone();
            motion.connect_leave(move |_| sender.input(AppLinksMsg::HoverLeave(index)));
        }
        motion
    }

    /// Icon plus ellipsized label, shared by every cell form
    fn cell_title(icon: &str, label: &str) -> gtk::Box {
        let title = gtk::Box::builder()
            .orientation(gtk::Orientation::Horizontal)
            .spacing(4)
            .css_classes(vec!["cell-title"])
            .build();

        let icon_label = gtk::Label::builder()
            .label(icon)
            .css_classes(vec!["cell-icon"])
            .build();

        let text_label = gtk::Label::builder()
            .label(label)
            .css_classes(vec!["cell-label"])
            .halign(gtk::Align::Start)
            .hexpand(true)
            .ellipsize(gtk::pango::EllipsizeMode::End)
            .max_width_chars(24)
            .build();

        title.append(&icon_label);
        title.append(&text_label);
        title
    }

    fn apply_hover(&self, change: HoverChange) {
        if let Some(index) = change.collapse {
            self.set_expanded(index, false);
        }
        if let Some(index) = change.expand {
            self.set_expanded(index, true);
        }
    }

    fn set_expanded(&self, index: usize, expanded: bool) {
        let Some(cell) = self.cells.get(index) else { return };
        if let Some(indicator) = &cell.indicator {
            indicator.set_label(if expanded { INDICATOR_OPEN } else { INDICATOR_CLOSED });
        }
        if let Some(dropdown) = &cell.dropdown {
            dropdown.emit(if expanded { LinkListMsg::Show } else { LinkListMsg::Hide });
        }
    }
}
