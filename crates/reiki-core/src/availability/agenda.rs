use chrono::{DateTime, FixedOffset, Utc};
use reiki_types::{Appointment, BusySlot};
use serde::Serialize;

use super::{is_occupied, BufferPolicy, DayWindow};

/// Who is looking at the grid; decides which cells can be picked.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Viewer {
    /// Anonymous visitor booking through the public page
    Public,
    /// Therapist looking at their own agenda
    Owner,
    /// Therapist looking at a colleague's agenda
    Colleague,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", content = "appointment", rename_all = "snake_case")]
pub enum SlotState {
    Free,
    Occupied,
    /// Occupied by one of the owner's appointments starting at this slot
    Booked(Box<Appointment>),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SlotView {
    pub start: DateTime<FixedOffset>,
    #[serde(flatten)]
    pub state: SlotState,
}

impl SlotView {
    /// `HH:MM` in the window's offset.
    pub fn label(&self) -> String {
        self.start.format("%H:%M").to_string()
    }

    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start.with_timezone(&Utc)
    }

    pub const fn is_free(&self) -> bool {
        matches!(self.state, SlotState::Free)
    }

    /// Public: free cells book. Owner: free cells open the create dialog and
    /// booked cells show details. Colleague: read-only.
    pub const fn is_selectable(&self, viewer: Viewer) -> bool {
        match (viewer, &self.state) {
            (Viewer::Public | Viewer::Owner, SlotState::Free) => true,
            (Viewer::Owner, SlotState::Booked(_)) => true,
            _ => false,
        }
    }
}

/// One day of slots with their occupancy resolved.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DayAgenda {
    #[serde(skip)]
    pub window: DayWindow,
    pub viewer: Viewer,
    pub slots: Vec<SlotView>,
}

impl DayAgenda {
    /// `own` is only consulted for [`Viewer::Owner`]; an appointment is attached
    /// to an occupied slot when its start equals the slot start.
    pub fn build(
        window: DayWindow,
        busy: &[BusySlot],
        own: &[Appointment],
        policy: Option<BufferPolicy>,
        viewer: Viewer,
    ) -> Self {
        let slots = window
            .slots()
            .into_iter()
            .map(|start| {
                let t = start.with_timezone(&Utc);
                let state = if !is_occupied(t, busy, policy) {
                    SlotState::Free
                } else if viewer == Viewer::Owner {
                    own.iter()
                        .find(|a| a.start_at == t)
                        .map_or(SlotState::Occupied, |a| SlotState::Booked(Box::new(a.clone())))
                } else {
                    SlotState::Occupied
                };
                SlotView { start, state }
            })
            .collect();
        Self { window, viewer, slots }
    }

    pub fn free_slots(&self) -> impl Iterator<Item = &SlotView> {
        self.slots.iter().filter(|s| s.is_free())
    }

    pub fn slot_at(&self, t: DateTime<Utc>) -> Option<&SlotView> {
        self.slots.iter().find(|s| s.start == t)
    }
}
