use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use applinks_http::{Category, CategoryStatus, FetchError, Link, LinkSet, NO_DATA_MESSAGE};

/// Outcome of one fetch as posted back to the widget.
pub type FetchOutcome = Result<LinkSet, FetchError>;

/// Which of the five mutually exclusive panel renderings is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelPhase {
    MissingIdentity,
    Loading,
    Unavailable,
    Empty,
    Populated,
}

impl PanelPhase {
    /// CSS class attached to the panel content for this phase.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::MissingIdentity => "state-missing",
            Self::Loading => "state-loading",
            Self::Unavailable => "state-unavailable",
            Self::Empty => "state-empty",
            Self::Populated => "state-populated",
        }
    }

    /// Placeholder text for the non-populated phases.
    pub fn placeholder(self) -> Option<&'static str> {
        match self {
            Self::MissingIdentity => Some("Application name not found"),
            Self::Loading => Some("Loading…"),
            Self::Unavailable => Some("Service unavailable"),
            Self::Empty => Some("No links available"),
            Self::Populated => None,
        }
    }
}

/// Resolve the phase from the widget's inputs, in precedence order: a
/// nameless identity beats everything, an in-flight fetch beats whatever
/// result is still lying around, and only then does the outcome decide.
pub fn resolve_phase(named: bool, in_flight: bool, outcome: Option<&FetchOutcome>) -> PanelPhase {
    if !named {
        return PanelPhase::MissingIdentity;
    }
    if in_flight {
        return PanelPhase::Loading;
    }
    match outcome {
        None => PanelPhase::Loading,
        Some(Err(_)) => PanelPhase::Unavailable,
        Some(Ok(set)) if set.categories.is_empty() => PanelPhase::Empty,
        Some(Ok(_)) => PanelPhase::Populated,
    }
}

/// Visual form of one category cell.
#[derive(Debug, PartialEq)]
pub enum CellKind<'a> {
    /// Empty or errored category: never interactive.
    Notice { message: &'a str },
    /// Exactly one healthy link: the whole cell is that hyperlink.
    Direct { url: &'a str, label: &'a str },
    /// Several healthy links: a disclosure cell with a hover dropdown.
    Disclosure { links: &'a [Link] },
}

pub fn cell_kind(category: &Category) -> CellKind<'_> {
    if category.status != CategoryStatus::Ok || category.links.is_empty() {
        return CellKind::Notice {
            message: category.message.as_deref().unwrap_or(NO_DATA_MESSAGE),
        };
    }
    if let [link] = category.links.as_slice() {
        return CellKind::Direct {
            url: &link.url,
            label: link.label.as_deref().unwrap_or(&category.label),
        };
    }
    CellKind::Disclosure {
        links: &category.links,
    }
}

/// Widget work a hover transition requires.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct HoverChange {
    pub collapse: Option<usize>,
    pub expand: Option<usize>,
}

/// The single expandable slot: at most one dropdown is ever open.
#[derive(Debug, Default)]
pub struct HoverSlot {
    current: Option<usize>,
}

impl HoverSlot {
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Pointer entered cell `index`.
    pub fn enter(&mut self, index: usize) -> HoverChange {
        if self.current == Some(index) {
            return HoverChange::default();
        }
        HoverChange {
            collapse: self.current.replace(index),
            expand: Some(index),
        }
    }

    /// Pointer left cell `index`. Leaves for a cell that is no longer the
    /// open one are stale and ignored.
    pub fn leave(&mut self, index: usize) -> HoverChange {
        if self.current != Some(index) {
            return HoverChange::default();
        }
        HoverChange {
            collapse: self.current.take(),
            expand: None,
        }
    }

    /// Drop hover state entirely, as when the category list is replaced.
    pub fn clear(&mut self) -> HoverChange {
        HoverChange {
            collapse: self.current.take(),
            expand: None,
        }
    }
}

/// One widget's fetch lifecycle: generation numbering plus cancellation.
///
/// A result is only applied when its generation matches the cycle that is
/// still current, so a superseded fetch can never overwrite a newer
/// identity's state no matter when it lands.
#[derive(Debug, Default)]
pub struct FetchCycle {
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
}

impl FetchCycle {
    /// Start a new cycle, aborting whatever is still running, and return
    /// the generation to stamp the new fetch with.
    pub fn begin(&mut self) -> u64 {
        self.cancel();
        self.generation += 1;
        self.generation
    }

    /// Register the task driving the current cycle.
    pub fn attach(&mut self, handle: JoinHandle<()>) {
        self.in_flight = Some(handle);
    }

    /// Whether a result stamped `generation` may be applied. The cycle
    /// stops being in flight once its own result lands.
    pub fn accept(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.in_flight = None;
        true
    }

    /// Abort the in-flight task, releasing its connection.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight.is_some()
    }
}

/// Coarse relative age for the header meta line.
pub fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = now.signed_duration_since(then).num_seconds();
    if seconds < 60 {
        return "just now".to_owned();
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{} minute{} ago", minutes, plural(minutes));
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{} hour{} ago", hours, plural(hours));
    }
    let days = hours / 24;
    format!("{} day{} ago", days, plural(days))
}

fn plural(n: i64) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Column-major placement: `max_rows` cells fill a column before the next
/// column starts. Returns `(column, row)`.
pub fn grid_position(index: usize, max_rows: usize) -> (i32, i32) {
    let rows = max_rows.max(1);
    ((index / rows) as i32, (index % rows) as i32)
}
