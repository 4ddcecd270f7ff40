//! Carrying the selected element from the table view to the detail view.

use crate::config::SelectionMode;

pub const DETAIL_PATH: &str = "/element";
pub const QUERY_PARAM: &str = "element";
/// Page-local storage slot used in storage mode.
pub const STORAGE_SLOT: &str = "selectedElement";

/// What activating a tile does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileAction {
    /// Navigate straight to a detail URL that names the element.
    Link { href: String },
    /// Write `key` into the storage slot, then navigate to the bare detail URL.
    Store { key: String },
}

#[derive(Debug, Clone, Copy)]
pub struct Selection {
    mode: SelectionMode,
}

impl Selection {
    pub fn new(mode: SelectionMode) -> Self {
        Selection { mode }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn action_for(&self, key: &str) -> TileAction {
        match self.mode {
            SelectionMode::Query => TileAction::Link {
                href: detail_href(key),
            },
            SelectionMode::Storage => TileAction::Store {
                key: key.to_string(),
            },
        }
    }

    /// The identity the server can see for a detail request. Storage mode
    /// never reads the query string; the page resolves its slot client-side.
    pub fn identity_from_query<'q>(&self, element: Option<&'q str>) -> Option<&'q str> {
        match self.mode {
            SelectionMode::Query => element.map(str::trim).filter(|v| !v.is_empty()),
            SelectionMode::Storage => None,
        }
    }
}

/// `/element?element=<key>`, with the key form-encoded.
pub fn detail_href(key: &str) -> String {
    match serde_urlencoded::to_string([(QUERY_PARAM, key)]) {
        Ok(query) => format!("{DETAIL_PATH}?{query}"),
        Err(err) => {
            log::warn!("cannot encode detail link for {key:?}: {err}");
            DETAIL_PATH.to_string()
        }
    }
}
