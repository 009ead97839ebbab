use crate::api::BoxCount;

/// Review interval in days for boxes 1..=6. The server owns scheduling;
/// this table only labels the board.
pub const BOX_INTERVAL_DAYS: [u32; 6] = [0, 1, 3, 7, 14, 30];

pub fn interval_days(box_no: u8) -> Option<u32> {
    let idx = usize::from(box_no).checked_sub(1)?;
    BOX_INTERVAL_DAYS.get(idx).copied()
}

#[derive(Clone, Debug, Default)]
pub struct BoxSummary {
    boxes: Vec<BoxCount>,
}

impl BoxSummary {
    /// Replace all counts wholesale. `due` is clamped to `total`.
    pub fn replace(&mut self, counts: Vec<BoxCount>) {
        let mut boxes: Vec<BoxCount> = counts
            .into_iter()
            .map(|mut count| {
                if count.due > count.total {
                    log::warn!(
                        "box {} reports {} due of {} total; clamping",
                        count.id,
                        count.due,
                        count.total
                    );
                    count.due = count.total;
                }
                count
            })
            .collect();
        boxes.sort_by_key(|b| b.id);
        boxes.dedup_by_key(|b| b.id);
        self.boxes = boxes;
    }

    pub fn boxes(&self) -> &[BoxCount] {
        &self.boxes
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn due_total(&self) -> u32 {
        self.boxes.iter().map(|b| b.due).sum()
    }

    pub fn card_total(&self) -> u32 {
        self.boxes.iter().map(|b| b.total).sum()
    }

    pub fn count_for(&self, box_no: u8) -> BoxCount {
        self.boxes
            .iter()
            .find(|b| b.id == box_no)
            .copied()
            .unwrap_or(BoxCount {
                id: box_no,
                due: 0,
                total: 0,
            })
    }

    /// Every box of the standard board, plus any extra box the server reports.
    pub fn rows(&self) -> Vec<BoxCount> {
        let highest = self
            .boxes
            .iter()
            .map(|b| b.id)
            .max()
            .unwrap_or(0)
            .max(BOX_INTERVAL_DAYS.len() as u8);
        (1..=highest).map(|id| self.count_for(id)).collect()
    }
}

pub fn due_percent(count: &BoxCount) -> u32 {
    if count.total == 0 {
        return 0;
    }
    (count.due as f64 / count.total as f64 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(id: u8, due: u32, total: u32) -> BoxCount {
        BoxCount { id, due, total }
    }

    #[test]
    fn replace_clamps_and_sorts() {
        let mut summary = BoxSummary::default();
        summary.replace(vec![count(3, 9, 4), count(1, 2, 5)]);
        assert_eq!(summary.boxes(), &[count(1, 2, 5), count(3, 4, 4)]);
        assert_eq!(summary.due_total(), 6);
        assert_eq!(summary.card_total(), 9);
    }

    #[test]
    fn rows_fill_the_standard_board() {
        let mut summary = BoxSummary::default();
        summary.replace(vec![count(2, 1, 3)]);
        let rows = summary.rows();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0], count(1, 0, 0));
        assert_eq!(rows[1], count(2, 1, 3));

        summary.replace(vec![count(8, 0, 1)]);
        assert_eq!(summary.rows().len(), 8);
    }

    #[test]
    fn due_percent_handles_empty_boxes() {
        assert_eq!(due_percent(&count(1, 0, 0)), 0);
        assert_eq!(due_percent(&count(1, 1, 3)), 33);
        assert_eq!(due_percent(&count(1, 2, 2)), 100);
    }

    #[test]
    fn interval_table_lookup() {
        assert_eq!(interval_days(1), Some(0));
        assert_eq!(interval_days(6), Some(30));
        assert_eq!(interval_days(0), None);
        assert_eq!(interval_days(7), None);
    }
}
