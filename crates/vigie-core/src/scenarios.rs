//! The three built-in check runs against the tiles frontend.
//!
//! Each scenario is a fixed, linear sequence: selectors, waits, and
//! screenshot names are deliberately hardcoded to the pages they verify.

use crate::scenario::Scenario;

/// Default wait window for a selector, matching the browser driver default.
pub const DEFAULT_SELECTOR_TIMEOUT_MS: u64 = 30_000;

/// Home page and admin login: map container, admin link, locate-me control.
pub fn frontend() -> Scenario {
    Scenario::new("frontend")
        .goto("/")
        .wait_for_selector(".leaflet-container", 10_000)
        .wait_for_selector("a[title='Administration']", DEFAULT_SELECTOR_TIMEOUT_MS)
        .wait_for_selector(
            ".leaflet-control.leaflet-bar button[title='Me localiser']",
            DEFAULT_SELECTOR_TIMEOUT_MS,
        )
        .screenshot("home.png")
        .goto("/admin")
        .wait_for_selector("input[type='password']", DEFAULT_SELECTOR_TIMEOUT_MS)
        .screenshot("admin_login.png")
}

/// Visual pass over recent UI changes: header, tour button, admin, 404 page.
///
/// Uses fixed delays rather than selector waits; the home page shows an
/// intro animation for roughly 2.2 s before the map becomes visible.
pub fn changes() -> Scenario {
    Scenario::new("changes")
        .goto("/")
        .pause(3_000)
        .screenshot("home_page.png")
        .probe("Tour button", "button[title='Démarrer la visite guidée']")
        .goto("/admin")
        .pause(1_000)
        .screenshot("admin_login.png")
        .goto("/non-existent-page")
        .pause(1_000)
        .screenshot("404_page.png")
}

/// Tile grid layout: full-page grid capture, then the detail modal opened
/// by clicking a tile located by its visible text.
pub fn tiles() -> Scenario {
    Scenario::new("tiles")
        .goto("/")
        .wait_for_network_idle()
        .read_title()
        .screenshot_full_page("grid_view.png")
        .click_text("Lumières de Paris")
        .pause(2_000)
        .screenshot("modal_view.png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Step;

    #[test]
    fn frontend_covers_home_and_admin() {
        let scenario = frontend();
        assert_eq!(scenario.name, "frontend");
        assert_eq!(scenario.screenshot_files(), vec!["home.png", "admin_login.png"]);

        // The map container wait carries the short 10 s window.
        assert!(scenario.steps.contains(&Step::WaitForSelector {
            selector: ".leaflet-container".into(),
            timeout_ms: 10_000,
        }));
        assert!(scenario.steps.contains(&Step::WaitForSelector {
            selector: "input[type='password']".into(),
            timeout_ms: DEFAULT_SELECTOR_TIMEOUT_MS,
        }));
        assert!(scenario.steps.contains(&Step::Goto("/admin".into())));
    }

    #[test]
    fn changes_visits_the_404_route() {
        let scenario = changes();
        assert_eq!(
            scenario.screenshot_files(),
            vec!["home_page.png", "admin_login.png", "404_page.png"]
        );
        assert!(scenario.steps.contains(&Step::Goto("/non-existent-page".into())));
        assert!(scenario.steps.contains(&Step::Probe {
            label: "Tour button".into(),
            selector: "button[title='Démarrer la visite guidée']".into(),
        }));
    }

    #[test]
    fn tiles_clicks_the_first_tile_then_captures_the_modal() {
        let scenario = tiles();
        assert_eq!(scenario.screenshot_files(), vec!["grid_view.png", "modal_view.png"]);
        assert!(scenario.steps.contains(&Step::Screenshot {
            file: "grid_view.png".into(),
            full_page: true,
        }));

        // The click happens after the grid capture and before the modal one.
        let click = scenario
            .steps
            .iter()
            .position(|s| matches!(s, Step::ClickText { text } if text == "Lumières de Paris"))
            .expect("tile click step present");
        let modal = scenario
            .steps
            .iter()
            .position(|s| matches!(s, Step::Screenshot { file, .. } if file == "modal_view.png"))
            .unwrap();
        assert!(click < modal);
    }
}
