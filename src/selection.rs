use crate::types::TimeSlot;

/// The provisional slots of one in-progress booking form.
///
/// Snapshots are immutable: `toggle` and `clear` return the next state and
/// leave the receiver untouched, so the session can swap snapshots without
/// shared mutation. Membership is keyed by exact start time only; the end
/// time of an already selected slot is never compared. Nothing here is
/// persisted, the set dies with the form session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotSelection {
    slots: Vec<TimeSlot>,
}

impl SlotSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deselects on a start-time match, otherwise appends. Re-clicking a
    /// calendar cell that is already selected takes it back out.
    pub fn toggle(&self, slot: TimeSlot) -> Self {
        let mut slots = self.slots.clone();
        match slots.iter().position(|selected| selected.start == slot.start) {
            Some(index) => {
                slots.remove(index);
            }
            None => slots.push(slot),
        }
        Self { slots }
    }

    pub fn clear(&self) -> Self {
        Self::default()
    }

    pub fn contains_start(&self, slot: &TimeSlot) -> bool {
        self.slots.iter().any(|selected| selected.start == slot.start)
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
