use std::collections::BTreeSet;

/// Which side of the selection currently holds members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Unselected,
    PassengersChosen,
    SegmentsChosen,
}

/// Mutually exclusive passenger/segment selection.
///
/// Invariant: the passenger set and the segment set are never both
/// non-empty. A toggle on the disabled side is a recorded no-op; the caller
/// is expected to render the disabled side as non-interactive via
/// [`passengers_enabled`](Self::passengers_enabled) /
/// [`segments_enabled`](Self::segments_enabled).
#[derive(Debug, Clone, Default)]
pub struct SelectionGate {
    passengers: BTreeSet<u32>,
    segments: BTreeSet<u32>,
}

impl SelectionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SelectionMode {
        if !self.passengers.is_empty() {
            SelectionMode::PassengersChosen
        } else if !self.segments.is_empty() {
            SelectionMode::SegmentsChosen
        } else {
            SelectionMode::Unselected
        }
    }

    /// Passenger controls are interactive only while no segment is chosen.
    pub fn passengers_enabled(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment controls are interactive only while no passenger is chosen.
    pub fn segments_enabled(&self) -> bool {
        self.passengers.is_empty()
    }

    /// Flip membership of a passenger id. Returns whether the toggle applied.
    pub fn toggle_passenger(&mut self, id: u32) -> bool {
        if !self.passengers_enabled() {
            return false;
        }
        if !self.passengers.remove(&id) {
            self.passengers.insert(id);
        }
        true
    }

    /// Flip membership of a segment number. Returns whether the toggle applied.
    pub fn toggle_segment(&mut self, number: u32) -> bool {
        if !self.segments_enabled() {
            return false;
        }
        if !self.segments.remove(&number) {
            self.segments.insert(number);
        }
        true
    }

    /// Clear both sets.
    pub fn reset(&mut self) {
        self.passengers.clear();
        self.segments.clear();
    }

    pub fn passenger_ids(&self) -> Vec<u32> {
        self.passengers.iter().copied().collect()
    }

    pub fn segment_numbers(&self) -> Vec<u32> {
        self.segments.iter().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.passengers.is_empty() && self.segments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invariant(gate: &SelectionGate) {
        assert!(
            gate.passenger_ids().is_empty() || gate.segment_numbers().is_empty(),
            "both selection sets are non-empty"
        );
    }

    #[test]
    fn test_starts_unselected() {
        let gate = SelectionGate::new();
        assert_eq!(gate.mode(), SelectionMode::Unselected);
        assert!(gate.passengers_enabled());
        assert!(gate.segments_enabled());
        assert!(gate.is_empty());
    }

    #[test]
    fn test_toggle_passenger_flips_membership() {
        let mut gate = SelectionGate::new();

        assert!(gate.toggle_passenger(5));
        assert_eq!(gate.passenger_ids(), vec![5]);
        assert_eq!(gate.mode(), SelectionMode::PassengersChosen);

        assert!(gate.toggle_passenger(5));
        assert!(gate.passenger_ids().is_empty());
        assert_eq!(gate.mode(), SelectionMode::Unselected);
    }

    #[test]
    fn test_passenger_choice_disables_segments() {
        let mut gate = SelectionGate::new();
        gate.toggle_passenger(1);

        assert!(!gate.segments_enabled());
        assert!(!gate.toggle_segment(2));
        assert!(gate.segment_numbers().is_empty());
        assert_invariant(&gate);
    }

    #[test]
    fn test_segment_choice_disables_passengers() {
        let mut gate = SelectionGate::new();
        gate.toggle_segment(2);

        assert!(!gate.passengers_enabled());
        assert!(!gate.toggle_passenger(5));
        assert!(gate.passenger_ids().is_empty());
        assert_eq!(gate.mode(), SelectionMode::SegmentsChosen);
        assert_invariant(&gate);
    }

    #[test]
    fn test_deselecting_reenables_other_side() {
        let mut gate = SelectionGate::new();
        gate.toggle_segment(2);
        gate.toggle_segment(2);

        assert!(gate.passengers_enabled());
        assert!(gate.toggle_passenger(5));
        assert_eq!(gate.passenger_ids(), vec![5]);
        assert_invariant(&gate);
    }

    #[test]
    fn test_multiple_selections_same_side() {
        let mut gate = SelectionGate::new();
        gate.toggle_passenger(3);
        gate.toggle_passenger(1);
        gate.toggle_passenger(2);

        assert_eq!(gate.passenger_ids(), vec![1, 2, 3]);
        assert_invariant(&gate);
    }

    #[test]
    fn test_reset_clears_both_sides() {
        let mut gate = SelectionGate::new();
        gate.toggle_passenger(1);
        gate.reset();

        assert!(gate.is_empty());
        assert_eq!(gate.mode(), SelectionMode::Unselected);
        assert!(gate.segments_enabled());
    }
}
