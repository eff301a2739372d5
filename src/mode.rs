//! Overlay and host-engine mode definitions

/// Which prompt an overlay session stands in for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayMode {
    /// Ex command line, entered with `:`
    Command,
    /// Forward search, entered with `/`
    SearchForward,
    /// Backward search, entered with `?`
    SearchBackward,
    /// Expression register prompt, entered with Ctrl-R `=` in insert mode
    Expression,
}

impl OverlayMode {
    /// Prompt character replayed ahead of the committed text
    #[must_use]
    pub fn prefix(self) -> char {
        match self {
            OverlayMode::Command => ':',
            OverlayMode::SearchForward => '/',
            OverlayMode::SearchBackward => '?',
            OverlayMode::Expression => '=',
        }
    }

    /// Title shown in the overlay header
    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            OverlayMode::Command => "CmdLine",
            OverlayMode::SearchForward | OverlayMode::SearchBackward => "Search",
            OverlayMode::Expression => "Expression",
        }
    }

    #[must_use]
    pub fn history_bucket(self) -> HistoryBucket {
        match self {
            OverlayMode::Command => HistoryBucket::Command,
            OverlayMode::SearchForward | OverlayMode::SearchBackward => HistoryBucket::Search,
            OverlayMode::Expression => HistoryBucket::Expression,
        }
    }

    #[must_use]
    pub fn is_search(self) -> bool {
        matches!(self, OverlayMode::SearchForward | OverlayMode::SearchBackward)
    }

    /// Search direction implied by the mode (command-mode previews search forward)
    #[must_use]
    pub fn direction(self) -> SearchDirection {
        match self {
            OverlayMode::SearchBackward => SearchDirection::Backward,
            _ => SearchDirection::Forward,
        }
    }
}

/// History partition; both search modes share one bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryBucket {
    Command,
    Search,
    Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchDirection {
    Forward,
    Backward,
}

/// Modal state reported by the host editing engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMode {
    /// Normal mode, including command-pending
    Normal,
    Visual,
    Select,
    Insert,
    Replace,
    /// The host's own command line is open
    CmdLine,
}

impl EngineMode {
    /// Whether an overlay of `mode` may open while the engine is in this state
    #[must_use]
    pub fn allows(self, mode: OverlayMode) -> bool {
        match mode {
            OverlayMode::Expression => matches!(self, EngineMode::Insert | EngineMode::Replace),
            _ => matches!(self, EngineMode::Normal | EngineMode::Visual | EngineMode::Select),
        }
    }

    #[must_use]
    pub fn has_visual_selection(self) -> bool {
        matches!(self, EngineMode::Visual | EngineMode::Select)
    }
}
