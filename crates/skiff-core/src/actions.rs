//! Page menu entries

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageAction {
    Bookmark,
    FindInPage,
    Share,
    Summarize,
}

impl PageAction {
    pub fn title(&self) -> &'static str {
        match self {
            PageAction::Bookmark => "Bookmark Page",
            PageAction::FindInPage => "Find in Page...",
            PageAction::Share => "Share",
            PageAction::Summarize => "Summarize",
        }
    }
}

/// Actions offered for the current page.
pub(crate) fn available_actions(summary_enabled: bool, page_visible: bool) -> Vec<PageAction> {
    let mut actions = vec![PageAction::Bookmark, PageAction::FindInPage, PageAction::Share];
    if summary_enabled && page_visible {
        actions.push(PageAction::Summarize);
    }
    actions
}
