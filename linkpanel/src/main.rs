use std::error::Error;

use gtk::prelude::*;
use gtk4_layer_shell::{Edge, Layer, LayerShell};
use relm4::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod widgets;

use config::Config;
use widgets::AppLinks;

const APP_ID: &str = "com.github.linkpanel";

struct LinkPanel {
    links: Controller<AppLinks>,
}

#[derive(Debug)]
enum LinkPanelMsg {}

#[relm4::component]
impl SimpleComponent for LinkPanel {
    type Init = Config;
    type Input = LinkPanelMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_css_classes: &["linkpanel-window"],
            set_default_width: 340,

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,
                set_spacing: 0,
                set_css_classes: &["linkpanel-container"],

                #[local_ref]
                links_widget -> gtk::Box {},
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        _sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        // Initialize layer shell BEFORE window is realized
        root.init_layer_shell();

        // Configure layer shell properties
        root.set_layer(Layer::Overlay);
        root.set_namespace(Some("linkpanel"));

        // Float in the top-right corner of the output
        root.set_anchor(Edge::Top, true);
        root.set_anchor(Edge::Right, true);
        root.set_anchor(Edge::Left, false);
        root.set_anchor(Edge::Bottom, false);

        root.set_margin(Edge::Top, 8);
        root.set_margin(Edge::Right, 8);

        // Initialize widgets
        let links = AppLinks::builder().launch(init).detach();

        let model = LinkPanel { links };

        let links_widget = model.links.widget();
        let widgets = view_output!();

        ComponentParts { model, widgets }
    }

    fn update(&mut self, _msg: Self::Input, _sender: ComponentSender<Self>) {}
}

/// Compile SCSS to CSS at runtime
fn compile_scss() -> Result<String, String> {
    let scss_path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("theme")
        .join("style.scss");

    grass::from_path(&scss_path, &grass::Options::default())
        .map_err(|e| format!("Failed to compile SCSS:\n{}", e))
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    gtk::init()?;

    // Compile SCSS to CSS at runtime
    let css = match compile_scss() {
        Ok(css) => css,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    #[cfg(debug_assertions)]
    std::fs::write("./final.css", &css)?;

    // Load compiled CSS
    let css_provider = gtk::CssProvider::new();
    css_provider.load_from_data(&css);

    gtk::style_context_add_provider_for_display(
        &gtk::gdk::Display::default().expect("Could not connect to display"),
        &css_provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );

    let config = Config::load();
    info!(
        endpoint = %config.endpoint,
        applications = config.applications.len(),
        "starting link panel"
    );

    let app = RelmApp::new(APP_ID);
    app.run::<LinkPanel>(config);

    Ok(())
}
