/// The single navigable pointer into the step sequence.
///
/// Navigation never fails: `next`/`prev` saturate at the edges and `jump_to`
/// clamps, because a user scrubbing past an edge is expected, not
/// exceptional. On an empty trace the cursor is disabled and every operation
/// is a no-op.
///
/// Each operation reports whether the position changed; callers drop any
/// derived state when it did. The owning session recomputes all views on
/// read, so nothing derived can outlive a move.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimelineCursor {
    position: usize,
    step_count: usize,
}

impl TimelineCursor {
    /// Cursor at step 0 of a trace with `step_count` steps.
    pub fn new(step_count: usize) -> Self {
        Self {
            position: 0,
            step_count,
        }
    }

    /// Cursor at `start`, clamped into range.
    pub fn with_position(step_count: usize, start: usize) -> Self {
        let mut cursor = Self::new(step_count);
        cursor.jump_to(start);
        cursor
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Current position; `None` iff the trace is empty (the disabled state).
    pub fn position(&self) -> Option<usize> {
        (self.step_count > 0).then_some(self.position)
    }

    pub fn is_disabled(&self) -> bool {
        self.step_count == 0
    }

    /// Advance one step, saturating at the end.
    pub fn next(&mut self) -> bool {
        if self.step_count > 0 && self.position < self.step_count - 1 {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Retreat one step, saturating at the start.
    pub fn prev(&mut self) -> bool {
        if self.step_count > 0 && self.position > 0 {
            self.position -= 1;
            true
        } else {
            false
        }
    }

    /// Move to `target`, clamped into `[0, step_count)`.
    pub fn jump_to(&mut self, target: usize) -> bool {
        if self.step_count == 0 {
            return false;
        }
        let clamped = target.min(self.step_count - 1);
        if clamped == self.position {
            false
        } else {
            self.position = clamped;
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_saturates_at_the_end() {
        let mut cursor = TimelineCursor::new(3);
        assert!(cursor.next());
        assert!(cursor.next());
        assert_eq!(cursor.position(), Some(2));

        // Repeated calls never move past the last step
        for _ in 0..10 {
            assert!(!cursor.next());
        }
        assert_eq!(cursor.position(), Some(2));
    }

    #[test]
    fn prev_saturates_at_the_start() {
        let mut cursor = TimelineCursor::with_position(3, 1);
        assert!(cursor.prev());
        for _ in 0..10 {
            assert!(!cursor.prev());
        }
        assert_eq!(cursor.position(), Some(0));
    }

    #[test]
    fn jump_clamps_into_range() {
        let mut cursor = TimelineCursor::new(5);
        assert!(cursor.jump_to(100));
        assert_eq!(cursor.position(), Some(4));

        assert!(cursor.jump_to(0));
        assert_eq!(cursor.position(), Some(0));
    }

    #[test]
    fn jump_is_idempotent() {
        let mut cursor = TimelineCursor::new(5);
        assert!(cursor.jump_to(3));
        assert_eq!(cursor.position(), Some(3));

        // Second jump to the same step changes nothing observable
        assert!(!cursor.jump_to(3));
        assert_eq!(cursor.position(), Some(3));
    }

    #[test]
    fn empty_trace_disables_all_navigation() {
        let mut cursor = TimelineCursor::new(0);
        assert!(cursor.is_disabled());
        assert_eq!(cursor.position(), None);

        assert!(!cursor.next());
        assert!(!cursor.prev());
        assert!(!cursor.jump_to(5));
        assert_eq!(cursor.position(), None);
    }

    #[test]
    fn starting_position_is_clamped() {
        let cursor = TimelineCursor::with_position(4, 99);
        assert_eq!(cursor.position(), Some(3));
    }
}
