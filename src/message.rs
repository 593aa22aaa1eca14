use tasklight::core::item::ItemId;
use tasklight::core::theme::Theme;
use tasklight::store::Snapshot;

#[derive(Debug, Clone)]
pub enum Message {
    // Store results
    Loaded(Snapshot),
    Synced(Snapshot),
    Added(Snapshot, bool),
    Deleted(Snapshot, Option<String>),
    ThemeChanged(Snapshot, Theme),

    // Add input
    InputChanged(String),
    Submit,

    // Item actions
    ToggleDone(ItemId),
    Delete(ItemId),

    SearchChanged(String),
    ToggleTheme,
    DismissNotice,
}
