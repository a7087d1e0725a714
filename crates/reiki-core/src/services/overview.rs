use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use reiki_types::BusySlot;

use crate::backend::AgendaBackend;
use crate::error::AppResult;

/// Busy intervals of one therapist on the overview day.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TherapistDay {
    pub therapist_id: Option<Uuid>,
    pub busy: Vec<BusySlot>,
}

/// Every therapist's busy intervals for `day`, grouped by therapist and sorted by start.
pub async fn day_overview(
    backend: &dyn AgendaBackend,
    day: NaiveDate,
) -> AppResult<Vec<TherapistDay>> {
    let mut grouped: BTreeMap<Option<Uuid>, Vec<BusySlot>> = BTreeMap::new();
    for slot in backend.get_all_busy_slots(day).await? {
        grouped.entry(slot.therapist_id).or_default().push(slot);
    }
    Ok(grouped
        .into_iter()
        .map(|(therapist_id, mut busy)| {
            busy.sort_by_key(|b| b.start_at);
            TherapistDay { therapist_id, busy }
        })
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_helpers::MemoryBackend;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_groups_by_therapist() {
        let backend = MemoryBackend::default();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let at = |h| Utc.with_ymd_and_hms(2024, 5, 2, h, 0, 0).unwrap();
        backend.state().busy.extend([
            BusySlot { therapist_id: Some(a), ..BusySlot::scheduled(at(15), 30) },
            BusySlot { therapist_id: Some(b), ..BusySlot::scheduled(at(12), 30) },
            BusySlot { therapist_id: Some(a), ..BusySlot::scheduled(at(13), 30) },
        ]);

        let day = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let overview = day_overview(&backend, day).await.unwrap();

        assert_eq!(overview.len(), 2);
        let of_a = overview.iter().find(|d| d.therapist_id == Some(a)).unwrap();
        assert_eq!(of_a.busy.len(), 2);
        assert!(of_a.busy[0].start_at < of_a.busy[1].start_at);
    }
}
