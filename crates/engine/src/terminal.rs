//! Per-terminal navigation state
//!
//! Each interactive session keeps its own command log and a recall cursor.
//! The cursor walks a combined address space:
//!
//! ```text
//! position:  0 .. own.len()-1            own.len() .. own.len()+global_id_at_start-1
//!            own commands, newest first   global ids < global_id_at_start, newest first
//! ```
//!
//! ## State Machine
//!
//! ```text
//!            up (space non-empty, stash buffer)
//!   AtEnd ─────────────────────────────────────▶ Recalling(0)
//!     ▲                                              │ up: p+1 if an older item exists
//!     │ down from Recalling(0) (return stash)        │ down: p-1
//!     └──────────────────────────────────────────────┘
//!   goto_end / new command: AtEnd, stash discarded
//! ```
//!
//! A session never recalls a global id created after it started: the global
//! partition is bounded by `global_id_at_start`, fixed at creation.

use recall_core::DocId;
use rustc_hash::FxHashSet;

/// Navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Older entry (arrow up)
    Up,
    /// Newer entry (arrow down)
    Down,
}

/// Recall cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    /// Not recalling; the live buffer is shown
    AtEnd,
    /// Showing the entry at this position of the combined address space
    Recalling(usize),
}

/// What a navigation step resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recall {
    /// A history line to display
    Line(DocId),
    /// Caller-side text: the stashed live buffer, or the unchanged current one
    Buffer(String),
}

/// State of one interactive terminal session
#[derive(Debug, Clone)]
pub struct TerminalSession {
    /// Ids executed by this session, in execution order (repeats kept)
    own_commands: Vec<DocId>,
    /// Set view of `own_commands`
    own_set: FxHashSet<DocId>,
    cursor: Cursor,
    /// Canonical history length when the session was created
    global_id_at_start: DocId,
    /// Live buffer captured when recall started
    stash: Option<String>,
}

impl TerminalSession {
    /// Create a session that may recall global ids below `global_id_at_start`
    pub fn new(global_id_at_start: DocId) -> Self {
        TerminalSession {
            own_commands: Vec::new(),
            own_set: FxHashSet::default(),
            cursor: Cursor::AtEnd,
            global_id_at_start,
            stash: None,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Canonical history length at creation
    pub fn global_id_at_start(&self) -> DocId {
        self.global_id_at_start
    }

    /// Commands executed by this session, oldest first
    pub fn own_commands(&self) -> &[DocId] {
        &self.own_commands
    }

    /// Whether this session executed `doc_id`
    pub fn executed(&self, doc_id: DocId) -> bool {
        self.own_set.contains(&doc_id)
    }

    /// Current cursor
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Buffer stashed when recall started, if any
    pub fn stashed_buffer(&self) -> Option<&str> {
        self.stash.as_deref()
    }

    /// Size of the combined address space
    pub fn recall_len(&self) -> usize {
        self.own_commands.len() + self.global_id_at_start as usize
    }

    /// Entry at `position` of the combined address space
    pub fn item_at(&self, position: usize) -> Option<DocId> {
        let own = self.own_commands.len();
        if position < own {
            return Some(self.own_commands[own - 1 - position]);
        }
        let global = position - own;
        let start = self.global_id_at_start as usize;
        if global < start {
            Some((start - 1 - global) as DocId)
        } else {
            None
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Record a command executed in this session and cancel any recall
    pub fn record(&mut self, doc_id: DocId) {
        self.own_commands.push(doc_id);
        self.own_set.insert(doc_id);
        self.goto_end();
    }

    /// Force `AtEnd`, discarding any stash
    pub fn goto_end(&mut self) {
        self.cursor = Cursor::AtEnd;
        self.stash = None;
    }

    /// Apply one navigation step
    ///
    /// `buffer` is the caller's current input line. It is stashed when recall
    /// starts, and handed back unchanged when the step has nothing to show.
    pub fn navigate(&mut self, direction: Direction, buffer: &str) -> Recall {
        match (direction, self.cursor) {
            (Direction::Up, Cursor::AtEnd) => match self.item_at(0) {
                Some(doc_id) => {
                    if self.stash.is_none() {
                        self.stash = Some(buffer.to_string());
                    }
                    self.cursor = Cursor::Recalling(0);
                    Recall::Line(doc_id)
                }
                None => Recall::Buffer(buffer.to_string()),
            },
            (Direction::Up, Cursor::Recalling(p)) => {
                if let Some(doc_id) = self.item_at(p + 1) {
                    self.cursor = Cursor::Recalling(p + 1);
                    return Recall::Line(doc_id);
                }
                // Oldest entry: stay put
                self.current_or_end(p, buffer)
            }
            (Direction::Down, Cursor::AtEnd) => Recall::Buffer(buffer.to_string()),
            (Direction::Down, Cursor::Recalling(0)) => {
                self.cursor = Cursor::AtEnd;
                Recall::Buffer(self.stash.take().unwrap_or_default())
            }
            (Direction::Down, Cursor::Recalling(p)) => {
                self.cursor = Cursor::Recalling(p - 1);
                self.current_or_end(p - 1, buffer)
            }
        }
    }

    fn current_or_end(&mut self, position: usize, buffer: &str) -> Recall {
        match self.item_at(position) {
            Some(doc_id) => Recall::Line(doc_id),
            None => {
                self.goto_end();
                Recall::Buffer(buffer.to_string())
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn session_with(global: DocId, own: &[DocId]) -> TerminalSession {
        let mut s = TerminalSession::new(global);
        for &id in own {
            s.record(id);
        }
        s
    }

    #[test]
    fn test_new_session_at_end() {
        let s = TerminalSession::new(3);
        assert_eq!(s.cursor(), Cursor::AtEnd);
        assert_eq!(s.global_id_at_start(), 3);
        assert!(s.own_commands().is_empty());
        assert!(s.stashed_buffer().is_none());
    }

    #[test]
    fn test_item_at_own_then_global() {
        let s = session_with(3, &[7, 9]);
        assert_eq!(s.recall_len(), 5);
        assert_eq!(s.item_at(0), Some(9));
        assert_eq!(s.item_at(1), Some(7));
        assert_eq!(s.item_at(2), Some(2));
        assert_eq!(s.item_at(3), Some(1));
        assert_eq!(s.item_at(4), Some(0));
        assert_eq!(s.item_at(5), None);
    }

    #[test]
    fn test_up_on_empty_space_is_noop() {
        let mut s = TerminalSession::new(0);
        assert_eq!(s.navigate(Direction::Up, "typed"), Recall::Buffer("typed".into()));
        assert_eq!(s.cursor(), Cursor::AtEnd);
        assert!(s.stashed_buffer().is_none());
    }

    #[test]
    fn test_up_stashes_buffer_and_recalls_newest() {
        let mut s = session_with(0, &[0, 1]);
        assert_eq!(s.navigate(Direction::Up, "half typed"), Recall::Line(1));
        assert_eq!(s.cursor(), Cursor::Recalling(0));
        assert_eq!(s.stashed_buffer(), Some("half typed"));

        // Buffer passed while recalling is not stashed again
        assert_eq!(s.navigate(Direction::Up, "recalled text"), Recall::Line(0));
        assert_eq!(s.stashed_buffer(), Some("half typed"));
    }

    #[test]
    fn test_up_at_oldest_does_not_wrap() {
        let mut s = session_with(0, &[4]);
        assert_eq!(s.navigate(Direction::Up, ""), Recall::Line(4));
        assert_eq!(s.navigate(Direction::Up, ""), Recall::Line(4));
        assert_eq!(s.cursor(), Cursor::Recalling(0));
    }

    #[test]
    fn test_down_returns_to_stash() {
        let mut s = session_with(0, &[0, 1, 2]);
        assert_eq!(s.navigate(Direction::Up, "live"), Recall::Line(2));
        assert_eq!(s.navigate(Direction::Up, ""), Recall::Line(1));
        assert_eq!(s.navigate(Direction::Down, ""), Recall::Line(2));
        assert_eq!(s.navigate(Direction::Down, ""), Recall::Buffer("live".into()));
        assert_eq!(s.cursor(), Cursor::AtEnd);
        assert!(s.stashed_buffer().is_none());
    }

    #[test]
    fn test_down_at_end_returns_current_buffer() {
        let mut s = session_with(0, &[0]);
        assert_eq!(s.navigate(Direction::Down, "now"), Recall::Buffer("now".into()));
        assert_eq!(s.cursor(), Cursor::AtEnd);
    }

    #[test]
    fn test_restash_after_returning_to_end() {
        let mut s = session_with(0, &[0]);
        s.navigate(Direction::Up, "first");
        s.navigate(Direction::Down, "");
        s.navigate(Direction::Up, "second");
        assert_eq!(s.stashed_buffer(), Some("second"));
    }

    #[test]
    fn test_goto_end_discards_stash() {
        let mut s = session_with(0, &[0]);
        s.navigate(Direction::Up, "live");
        s.goto_end();
        assert_eq!(s.cursor(), Cursor::AtEnd);
        assert!(s.stashed_buffer().is_none());
    }

    #[test]
    fn test_record_cancels_recall() {
        let mut s = session_with(2, &[]);
        s.navigate(Direction::Up, "live");
        assert_eq!(s.cursor(), Cursor::Recalling(0));

        s.record(5);
        assert_eq!(s.cursor(), Cursor::AtEnd);
        assert!(s.stashed_buffer().is_none());
        assert!(s.executed(5));
        assert!(!s.executed(0));
    }

    #[test]
    fn test_own_repeats_are_kept() {
        let s = session_with(0, &[3, 3]);
        assert_eq!(s.own_commands(), &[3, 3]);
        assert_eq!(s.item_at(0), Some(3));
        assert_eq!(s.item_at(1), Some(3));
    }

    #[test]
    fn test_walk_crosses_into_global_partition() {
        let mut s = session_with(2, &[5]);
        let seen: Vec<_> = (0..4).map(|_| s.navigate(Direction::Up, "")).collect();
        assert_eq!(
            seen,
            vec![Recall::Line(5), Recall::Line(1), Recall::Line(0), Recall::Line(0)]
        );
    }

    #[derive(Debug, Clone)]
    enum Step {
        Record(DocId),
        Up,
        Down,
        GotoEnd,
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            (0u32..20).prop_map(Step::Record),
            Just(Step::Up),
            Just(Step::Down),
            Just(Step::GotoEnd),
        ]
    }

    proptest! {
        #[test]
        fn test_cursor_stays_in_range(
            global in 0u32..5,
            steps in proptest::collection::vec(step(), 0..60),
        ) {
            let mut s = TerminalSession::new(global);
            for (i, step) in steps.into_iter().enumerate() {
                let buffer = format!("buf{}", i);
                let recall = match step {
                    Step::Record(id) => {
                        s.record(id);
                        prop_assert_eq!(s.cursor(), Cursor::AtEnd);
                        continue;
                    }
                    Step::GotoEnd => {
                        s.goto_end();
                        prop_assert!(s.stashed_buffer().is_none());
                        continue;
                    }
                    Step::Up => s.navigate(Direction::Up, &buffer),
                    Step::Down => s.navigate(Direction::Down, &buffer),
                };

                match s.cursor() {
                    Cursor::Recalling(p) => {
                        prop_assert!(p < s.recall_len());
                        prop_assert_eq!(recall, Recall::Line(s.item_at(p).unwrap()));
                        prop_assert!(s.stashed_buffer().is_some());
                    }
                    Cursor::AtEnd => {
                        prop_assert!(matches!(recall, Recall::Buffer(_)));
                        prop_assert!(s.stashed_buffer().is_none());
                    }
                }
            }
        }

        #[test]
        fn test_up_then_down_restores_buffer(
            global in 0u32..5,
            own in proptest::collection::vec(0u32..20, 0..8),
            ups in 1usize..15,
        ) {
            let mut s = TerminalSession::new(global);
            for &id in &own {
                s.record(id);
            }
            prop_assume!(s.recall_len() > 0);

            for _ in 0..ups {
                s.navigate(Direction::Up, "live");
            }
            let depth = ups.min(s.recall_len());
            prop_assert_eq!(s.cursor(), Cursor::Recalling(depth - 1));

            for _ in 1..depth {
                prop_assert!(matches!(s.navigate(Direction::Down, ""), Recall::Line(_)));
            }
            prop_assert_eq!(s.navigate(Direction::Down, ""), Recall::Buffer("live".into()));
            prop_assert_eq!(s.cursor(), Cursor::AtEnd);
        }
    }
}
