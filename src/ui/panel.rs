//! Viewer panels
//!
//! Draws the [`ViewerShell`] state and reports what the user clicked as a
//! [`PanelAction`]. The panel never mutates the shell itself; the app
//! applies the action after the frame.

use imgui::{Condition, WindowFlags};

use crate::viewer::{FilterState, ShellPhase, ViewerShell};

pub const TITLE: &str = "Based on the user profiles provided in the data, here are some example products";
pub const FOOTER: &str = "*example data is based on what we've received, the data will most likely \
change based on users' shopping habits";
pub const LOADING_PRODUCTS: &str = "Loading products...";
pub const CATALOG_EMPTY: &str = "No products found in the API response";
pub const FILTER_EMPTY: &str = "No products available for the selected filter";

/// Height of the top bar holding the title and the filter selector
const HEADER_HEIGHT: f32 = 90.0;
/// Height of the bottom bar holding navigation and the footer
const NAV_HEIGHT: f32 = 110.0;

/// Something the user asked for this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    SetFilter(FilterState),
    Previous,
    Next,
}

/// Text shown for screens that replace the whole viewer
pub fn status_message(shell: &ViewerShell) -> Option<String> {
    match shell.phase() {
        ShellPhase::FetchingCatalog => Some(LOADING_PRODUCTS.to_string()),
        ShellPhase::Failed(e) => Some(format!("Error: {}", e)),
        ShellPhase::CatalogEmpty => Some(CATALOG_EMPTY.to_string()),
        ShellPhase::Browsing => None,
    }
}

/// Overlay text while the current model loads, e.g. `Loading... 42%`
pub fn loading_label(shell: &ViewerShell) -> Option<String> {
    shell
        .loading_percent()
        .map(|percent| format!("Loading... {}%", percent))
}

/// `(i/n)` counter for the current product
pub fn counter_label(shell: &ViewerShell) -> Option<String> {
    shell
        .pagination()
        .position()
        .map(|(position, count)| format!("({}/{})", position, count))
}

/// Draws the whole viewer UI for one frame
pub fn viewer_panel(ui: &imgui::Ui, shell: &ViewerShell, source_label: &str) -> Option<PanelAction> {
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return None;
    }

    if let Some(message) = status_message(shell) {
        centered_screen(ui, display_size, &message);
        return None;
    }

    let mut action = header(ui, display_size, shell, source_label);

    if shell.pagination().is_empty() {
        centered_screen(ui, display_size, FILTER_EMPTY);
        return action;
    }

    if let Some(label) = loading_label(shell) {
        centered_overlay(ui, display_size, &label);
    }

    if let Some(nav) = navigation(ui, display_size, shell) {
        action = Some(nav);
    }
    action
}

fn fixed_window_flags() -> WindowFlags {
    WindowFlags::NO_TITLE_BAR
        | WindowFlags::NO_RESIZE
        | WindowFlags::NO_MOVE
        | WindowFlags::NO_COLLAPSE
        | WindowFlags::NO_SAVED_SETTINGS
}

fn header(
    ui: &imgui::Ui,
    display_size: [f32; 2],
    shell: &ViewerShell,
    source_label: &str,
) -> Option<PanelAction> {
    let mut action = None;

    ui.window("##header")
        .position([0.0, 0.0], Condition::Always)
        .size([display_size[0], HEADER_HEIGHT], Condition::Always)
        .flags(fixed_window_flags())
        .build(|| {
            ui.text_disabled(format!("Data: {}", source_label));
            ui.text_wrapped(TITLE);

            ui.text("Filter:");
            ui.same_line();
            ui.set_next_item_width(160.0);

            let mut selected = shell.filter().position();
            let labels = FilterState::ALL.map(|f| f.label());
            if ui.combo_simple_string("##filter", &mut selected, &labels) {
                if let Some(filter) = FilterState::ALL.get(selected) {
                    action = Some(PanelAction::SetFilter(*filter));
                }
            }
        });

    action
}

fn navigation(ui: &imgui::Ui, display_size: [f32; 2], shell: &ViewerShell) -> Option<PanelAction> {
    let mut action = None;

    ui.window("##navigation")
        .position([0.0, display_size[1] - NAV_HEIGHT], Condition::Always)
        .size([display_size[0], NAV_HEIGHT], Condition::Always)
        .flags(fixed_window_flags())
        .build(|| {
            if ui.button("Previous") {
                action = Some(PanelAction::Previous);
            }
            ui.same_line();

            if let Some(product) = shell.current_product() {
                ui.text(&product.name);
                ui.same_line();
            }
            if let Some(counter) = counter_label(shell) {
                ui.text_disabled(counter);
                ui.same_line();
            }

            if ui.button("Next") {
                action = Some(PanelAction::Next);
            }

            ui.separator();
            ui.text_wrapped(FOOTER);
        });

    action
}

fn centered_screen(ui: &imgui::Ui, display_size: [f32; 2], message: &str) {
    ui.window("##status")
        .position([display_size[0] * 0.5, display_size[1] * 0.5], Condition::Always)
        .position_pivot([0.5, 0.5])
        .flags(fixed_window_flags() | WindowFlags::ALWAYS_AUTO_RESIZE)
        .build(|| ui.text(message));
}

fn centered_overlay(ui: &imgui::Ui, display_size: [f32; 2], label: &str) {
    ui.window("##loading")
        .position([display_size[0] * 0.5, display_size[1] * 0.5], Condition::Always)
        .position_pivot([0.5, 0.5])
        .bg_alpha(0.6)
        .flags(fixed_window_flags() | WindowFlags::ALWAYS_AUTO_RESIZE | WindowFlags::NO_INPUTS)
        .build(|| ui.text(label));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::Product, error::ViewerError};

    #[test]
    fn test_status_messages() {
        let mut shell = ViewerShell::new();
        assert_eq!(status_message(&shell).as_deref(), Some("Loading products..."));

        shell.on_catalog(Err(ViewerError::Status {
            url: "https://api/models".into(),
            status: 500,
        }));
        assert_eq!(
            status_message(&shell).as_deref(),
            Some("Error: server returned HTTP 500 for https://api/models")
        );

        let mut shell = ViewerShell::new();
        shell.on_catalog(Err(ViewerError::EmptyCatalog));
        assert_eq!(status_message(&shell).as_deref(), Some(CATALOG_EMPTY));
    }

    #[test]
    fn test_browsing_labels() {
        let mut shell = ViewerShell::new();
        shell.on_catalog(Ok(vec![
            Product::new("Nike Air", Some("https://cdn/a.glb")),
            Product::new("Plain Shirt", None),
        ]));
        assert!(status_message(&shell).is_none());
        assert_eq!(counter_label(&shell).as_deref(), Some("(1/2)"));

        let request = shell.pending_load().unwrap();
        shell.on_model_progress(request.ticket, 0.426);
        assert_eq!(loading_label(&shell).as_deref(), Some("Loading... 43%"));

        shell.next_product();
        assert_eq!(counter_label(&shell).as_deref(), Some("(2/2)"));
        assert!(loading_label(&shell).is_none());
    }

    #[test]
    fn test_empty_filter_has_no_counter() {
        let mut shell = ViewerShell::new();
        shell.on_catalog(Ok(vec![Product::new("Plain Shirt", None)]));
        shell.set_filter(FilterState::Street);

        assert!(status_message(&shell).is_none());
        assert!(counter_label(&shell).is_none());
    }
}
