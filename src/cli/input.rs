use crate::api::{Region, RegionFilter};
use crate::core::Action;

/// One line typed during `atlas browse`.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseEvent {
    /// A plain line replaces the search field. Empty clears it.
    Query(String),
    Region(RegionFilter),
    Show(String),
    Back,
    Help,
    Quit,
    /// A `:` command that could not be understood.
    Invalid(String),
}

impl BrowseEvent {
    /// The core action for this event, if it has one.
    pub fn into_action(self) -> Option<Action> {
        match self {
            BrowseEvent::Query(q) => Some(Action::QueryChanged(q)),
            BrowseEvent::Region(filter) => Some(Action::RegionSelected(filter)),
            BrowseEvent::Show(code) => Some(Action::OpenDetail(code)),
            BrowseEvent::Back => Some(Action::CloseDetail),
            BrowseEvent::Quit => Some(Action::Quit),
            BrowseEvent::Help | BrowseEvent::Invalid(_) => None,
        }
    }
}

pub const HELP: &str = "\
Type to search by name, capital or code. An empty line lists every country.
  :region <africa|americas|asia|europe|oceania|none>
  :show <code>      open a country (e.g. :show DEU)
  :back             return to the list
  :help
  :quit";

pub fn parse_line(line: &str) -> BrowseEvent {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.trim_start().strip_prefix(':') else {
        return BrowseEvent::Query(line.to_string());
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default().to_ascii_lowercase();
    let arg = parts.next();

    match (name.as_str(), arg) {
        ("q" | "quit", _) => BrowseEvent::Quit,
        ("b" | "back", _) => BrowseEvent::Back,
        ("h" | "help", _) => BrowseEvent::Help,
        ("s" | "show", Some(code)) => BrowseEvent::Show(code.to_string()),
        ("r" | "region", Some(value)) if value.eq_ignore_ascii_case("none") => {
            BrowseEvent::Region(None)
        }
        ("r" | "region", Some(value)) => match value.parse::<Region>() {
            Ok(region) => BrowseEvent::Region(Some(region)),
            Err(e) => BrowseEvent::Invalid(e),
        },
        ("r" | "region", None) => BrowseEvent::Region(None),
        ("s" | "show", None) => BrowseEvent::Invalid("usage: :show <code>".to_string()),
        _ => BrowseEvent::Invalid(format!("unknown command ':{name}'")),
    }
}
