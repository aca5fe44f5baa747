/// Widths at or below this many units count as a narrow viewport.
pub const DEFAULT_NARROW_WIDTH: u32 = 768;

/// Width units per terminal column.
pub const UNITS_PER_COLUMN: u32 = 8;

/// Convert a terminal width in columns into viewport width units.
pub fn columns_to_units(columns: u16) -> u32 {
    u32::from(columns) * UNITS_PER_COLUMN
}

/// Sections reachable from the navigation links.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Products,
    About,
    Contact,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Products, Section::About, Section::Contact];

    pub fn label(self) -> &'static str {
        match self {
            Section::Products => "Products",
            Section::About => "About",
            Section::Contact => "Contact",
        }
    }
}

/// Responsive show/hide state of the navigation links.
#[derive(Debug, Clone)]
pub struct NavigationController {
    expanded: bool,
    narrow_width: u32,
}

impl NavigationController {
    /// Start from the layout matching `width`.
    pub fn new(narrow_width: u32, width: u32) -> Self {
        let mut nav = Self {
            expanded: false,
            narrow_width,
        };
        nav.on_viewport_resize(width);
        nav
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_narrow(&self, width: u32) -> bool {
        width <= self.narrow_width
    }

    /// Menu button.
    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }

    /// Collapse after a link is used, on narrow viewports only.
    pub fn on_link_activated(&mut self, width: u32) {
        if self.is_narrow(width) {
            self.expanded = false;
        }
    }

    /// Wide viewports always show the links; narrow ones hide them until the
    /// menu is toggled.
    pub fn on_viewport_resize(&mut self, width: u32) {
        self.expanded = !self.is_narrow(width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_follows_width() {
        assert!(NavigationController::new(DEFAULT_NARROW_WIDTH, 1024).is_expanded());
        assert!(!NavigationController::new(DEFAULT_NARROW_WIDTH, 500).is_expanded());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let nav = NavigationController::new(DEFAULT_NARROW_WIDTH, 1024);
        assert!(nav.is_narrow(768));
        assert!(!nav.is_narrow(769));
    }

    #[test]
    fn test_resize_wide_to_narrow_collapses() {
        let mut nav = NavigationController::new(DEFAULT_NARROW_WIDTH, 1024);
        assert!(nav.is_expanded());
        nav.on_viewport_resize(500);
        assert!(!nav.is_expanded());
        nav.on_viewport_resize(1024);
        assert!(nav.is_expanded());
    }

    #[test]
    fn test_toggle_flips() {
        let mut nav = NavigationController::new(DEFAULT_NARROW_WIDTH, 500);
        nav.toggle();
        assert!(nav.is_expanded());
        nav.toggle();
        assert!(!nav.is_expanded());
    }

    #[test]
    fn test_link_activation_collapses_only_when_narrow() {
        let mut nav = NavigationController::new(DEFAULT_NARROW_WIDTH, 500);
        nav.toggle();
        nav.on_link_activated(500);
        assert!(!nav.is_expanded());

        let mut wide = NavigationController::new(DEFAULT_NARROW_WIDTH, 1024);
        wide.on_link_activated(1024);
        assert!(wide.is_expanded());
    }

    #[test]
    fn test_columns_to_units() {
        assert_eq!(columns_to_units(96), 768);
        assert_eq!(columns_to_units(120), 960);
    }
}
