use serde::{Deserialize, Serialize};

use crate::MOBILE_BREAKPOINT_PX;

pub const SIDEBAR_WIDTH_EXPANDED_PX: u32 = 240;
pub const SIDEBAR_WIDTH_COLLAPSED_PX: u32 = 72;
pub const SIDEBAR_WIDTH_DRAWER_PX: u32 = 256;

/// Named screen regions the shell reports pointer presses against.
///
/// The core never sees coordinates or DOM nodes; the shell translates a
/// press into "inside one of these regions, or not" and dismissal logic
/// works entirely on that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionId {
    Sidebar,
    MainContent,
    ChatPanel,
    ChatLauncher,
    NewPaymentMenu,
    RowActionMenu,
}

/// Responsive chrome state: which mode we are in and what is open.
///
/// Mobile means `viewport_width < MOBILE_BREAKPOINT_PX`. The two modes keep
/// separate open/closed state: desktop has a collapsible rail, mobile has an
/// overlay drawer. Mode flips reset to that mode's default; resizes within a
/// mode leave the user's choice alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutState {
    pub viewport_width: u32,
    pub mobile: bool,
    pub sidebar_open: bool,
    pub mobile_menu_open: bool,
}

impl LayoutState {
    #[must_use]
    pub const fn at_width(viewport_width: u32) -> Self {
        let mobile = viewport_width < MOBILE_BREAKPOINT_PX;
        Self {
            viewport_width,
            mobile,
            sidebar_open: !mobile,
            mobile_menu_open: false,
        }
    }

    /// Apply a viewport resize. Returns whether the mode flipped.
    pub fn resize(&mut self, viewport_width: u32) -> bool {
        self.viewport_width = viewport_width;
        let mobile = viewport_width < MOBILE_BREAKPOINT_PX;
        if mobile == self.mobile {
            return false;
        }
        self.mobile = mobile;
        self.sidebar_open = !mobile;
        self.mobile_menu_open = false;
        true
    }

    /// Route changes to the profile page collapse all chrome; everything
    /// else leaves the layout as the user had it.
    pub fn route_changed(&mut self, route: &str) {
        if route == crate::data::PROFILE_ROUTE {
            self.sidebar_open = false;
            self.mobile_menu_open = false;
        }
    }

    /// The hamburger control: toggles whichever surface the mode owns.
    pub fn toggle(&mut self) {
        if self.mobile {
            self.mobile_menu_open = !self.mobile_menu_open;
        } else {
            self.sidebar_open = !self.sidebar_open;
        }
    }

    /// Explicit close control (backdrop tap, drawer X, nav selection).
    pub fn close(&mut self) {
        if self.mobile {
            self.mobile_menu_open = false;
        } else {
            self.sidebar_open = false;
        }
    }

    /// Dismissal on pointer press. Presses inside the sidebar never dismiss
    /// anything. On mobile, any press outside it closes the drawer. On
    /// desktop, a press on the main content closes an open sidebar.
    pub fn pointer_pressed(&mut self, region: Option<RegionId>) {
        if region == Some(RegionId::Sidebar) {
            return;
        }
        if self.mobile {
            if self.mobile_menu_open {
                self.mobile_menu_open = false;
            }
        } else if region == Some(RegionId::MainContent) && self.sidebar_open {
            self.sidebar_open = false;
        }
    }

    /// Rendered width of the navigation surface, in CSS pixels. Zero means
    /// the mobile drawer is fully hidden.
    #[must_use]
    pub const fn sidebar_width_px(&self) -> u32 {
        if self.mobile {
            if self.mobile_menu_open {
                SIDEBAR_WIDTH_DRAWER_PX
            } else {
                0
            }
        } else if self.sidebar_open {
            SIDEBAR_WIDTH_EXPANDED_PX
        } else {
            SIDEBAR_WIDTH_COLLAPSED_PX
        }
    }
}

impl Default for LayoutState {
    fn default() -> Self {
        Self::at_width(1280)
    }
}
