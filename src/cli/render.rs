//! Plain-text rendering of the list and detail views.
//!
//! Column widths are measured in terminal cells, so names like "Côte d'Ivoire"
//! or "日本" line up with ASCII rows.

use unicode_width::UnicodeWidthStr;

use crate::api::Country;
use crate::core::detail::{BorderLink, border_links};
use crate::core::state::{App, LoadState};

const HEADERS: [&str; 5] = ["CODE", "NAME", "REGION", "CAPITAL", "POPULATION"];

/// 83240000 -> "83,240,000"
pub fn format_population(population: u64) -> String {
    let digits = population.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

fn pad_left(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{text}", " ".repeat(fill))
}

pub fn country_table<'a>(countries: impl IntoIterator<Item = &'a Country>) -> String {
    let rows: Vec<[String; 5]> = countries
        .into_iter()
        .map(|c| {
            [
                c.code.clone(),
                c.name.common.clone(),
                c.region.clone(),
                c.capital_list(),
                format_population(c.population),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.width());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let line = |cells: [&str; 5]| {
        let mut out = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                out.push_str("  ");
            }
            // Population is right-aligned, the last column is never padded.
            if i == 4 {
                out.push_str(&pad_left(cell, widths[i]));
            } else {
                out.push_str(&pad(cell, widths[i]));
            }
        }
        out.push('\n');
        out
    };

    let mut out = line(HEADERS);
    for row in &rows {
        out.push_str(&line([&row[0], &row[1], &row[2], &row[3], &row[4]]));
    }
    out
}

/// The list screen: status line, notice, then the filtered projection.
pub fn list_screen(app: &App) -> String {
    let mut out = String::new();
    let filter = match app.store.active_filter() {
        Some(region) => region.to_string(),
        None => String::from("All"),
    };
    out.push_str(&format!(
        "Search: {:?}   Region: {}\n",
        app.search.query(),
        filter
    ));

    match app.store.list_state() {
        LoadState::Idle => {}
        LoadState::Loading if app.store.raw().is_empty() => out.push_str("Loading...\n"),
        LoadState::Error => out.push_str(&format!("Error: {}\n", app.status_message)),
        LoadState::Loading | LoadState::Ready => {
            if let Some(notice) = app.search.notice() {
                out.push_str(&format!("{notice}\n"));
            }
            if app.store.visible_len() == 0 {
                out.push_str("No countries to show\n");
            } else {
                out.push_str(&country_table(app.store.countries()));
            }
        }
    }
    out
}

fn field(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!("{} {}\n", pad(&format!("{label}:"), 21), value));
}

/// Detail text for one country.
pub fn country_detail(country: &Country, borders: &[BorderLink]) -> String {
    let mut out = format!("{}\n", country.name.common);
    out.push_str(&format!("{}\n\n", "=".repeat(country.name.common.width())));

    field(&mut out, "Official Name", &country.name.official);
    field(&mut out, "Native Name", country.native_name());
    field(&mut out, "Population", &format_population(country.population));
    field(&mut out, "Region", &country.region);
    if let Some(sub) = &country.subregion {
        field(&mut out, "Sub Region", sub);
    }
    field(&mut out, "Capital", &country.capital_list());
    field(&mut out, "Top Level Domain", &country.top_level_domains.join(", "));
    if let Some(currencies) = country.currency_names() {
        field(&mut out, "Currencies", &currencies);
    }
    if let Some(languages) = country.language_names() {
        field(&mut out, "Languages", &languages);
    }
    field(&mut out, "Flag", &country.flags.png_url);
    if let Some(alt) = &country.flags.alt_text {
        field(&mut out, "Flag Description", alt);
    }

    if borders.is_empty() {
        field(&mut out, "Border Countries", "none");
    } else {
        let labels: Vec<String> = borders
            .iter()
            .map(|b| {
                if b.label == b.code {
                    b.code.clone()
                } else {
                    format!("{} ({})", b.label, b.code)
                }
            })
            .collect();
        field(&mut out, "Border Countries", &labels.join(", "));
    }
    out
}

/// The detail screen, with borders labelled from the loaded list.
pub fn detail_screen(app: &App) -> String {
    let code = app.detail.code().unwrap_or_default();
    match app.detail.state() {
        LoadState::Loading | LoadState::Idle => format!("Loading {code}...\n"),
        LoadState::Error => match app.detail.error() {
            Some(e) if e.is_not_found() => format!("Country {code} not found\n"),
            Some(e) => format!("Could not load {code}: {e}\n"),
            None => format!("Could not load {code}\n"),
        },
        LoadState::Ready => match app.detail.country() {
            Some(country) => country_detail(country, &border_links(country, &app.store)),
            None => format!("Loading {code}...\n"),
        },
    }
}

/// Whatever the user is looking at right now.
pub fn screen(app: &App) -> String {
    if app.detail.is_open() {
        detail_screen(app)
    } else {
        list_screen(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Region, SourceError};
    use crate::core::controller::NO_RESULTS_NOTICE;
    use crate::core::search::SearchError;
    use crate::test_support::country;

    #[test]
    fn test_format_population() {
        assert_eq!(format_population(0), "0");
        assert_eq!(format_population(999), "999");
        assert_eq!(format_population(1000), "1,000");
        assert_eq!(format_population(83_240_000), "83,240,000");
    }

    #[test]
    fn test_table_aligns_by_display_width() {
        let mut jpn = country("JPN", "日本", "Asia");
        jpn.population = 125_700_000;
        let deu = country("DEU", "Germany", "Europe");
        let table = country_table([&jpn, &deu]);

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        // Every row has the same display width.
        let widths: Vec<usize> = lines.iter().map(|l| l.width()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]), "{widths:?}");
        assert!(lines[1].ends_with("125,700,000"));
    }

    #[test]
    fn test_list_screen_shows_projection_and_notice() {
        let mut app = App::new();
        app.store.replace_list(vec![
            country("DEU", "Germany", "Europe"),
            country("JPN", "Japan", "Asia"),
        ]);
        app.store.set_filter(Some(Region::Asia));
        let t = app.search.on_input("zz");
        app.search
            .on_settled(&mut app.store, t.generation, Err(SearchError::NotFound));

        let text = list_screen(&app);
        assert!(text.contains("Region: Asia"));
        assert!(text.contains(NO_RESULTS_NOTICE));
        assert!(text.contains("Japan"));
        assert!(!text.contains("Germany"));
    }

    #[test]
    fn test_list_screen_loading_and_error() {
        let mut app = App::new();
        app.store.begin_load();
        assert!(list_screen(&app).contains("Loading..."));

        app.status_message = "Failed to load countries: offline".into();
        app.store.report_error();
        assert!(list_screen(&app).contains("Error: Failed to load countries: offline"));
    }

    #[test]
    fn test_detail_labels_borders() {
        let mut deu = country("DEU", "Germany", "Europe");
        deu.border_codes = vec!["FRA".into(), "POL".into()];
        let borders = vec![
            BorderLink {
                code: "FRA".into(),
                label: "France".into(),
            },
            BorderLink {
                code: "POL".into(),
                label: "POL".into(),
            },
        ];
        let text = country_detail(&deu, &borders);
        assert!(text.starts_with("Germany\n=======\n"));
        assert!(text.contains("France (FRA), POL"));
    }

    #[test]
    fn test_detail_screen_not_found() {
        let mut app = App::new();
        let req = app.detail.open("XXX");
        app.detail.settle(req, Err(SourceError::NotFound));
        assert_eq!(screen(&app), "Country XXX not found\n");
    }
}
