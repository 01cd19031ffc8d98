use grouptop::system::query::SortKey;

#[derive(Debug, Clone, PartialEq)]
pub enum Direction {
    Up,
    Down,
    PageUp,
    PageDown,
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Navigate(Direction),
    KillSelected,
    ShowInstances,
    CloseInstances,
    EnterFilterMode,
    ExitFilterMode,
    ClearFilter,
    UpdateFilter(String),
    CycleSortMode,
    ReverseSort,
    SortBy(SortKey, bool),
    CycleTheme,
    ToggleHelp,
    Refresh,
    None,
}
