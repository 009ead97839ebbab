use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // ≥100 cols: card + sidebar with box board and session stats
    Medium, // 60-99 cols: card + box board below, stats in header
    Narrow, // <60 cols: card only, stats in header
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= 100 {
            LayoutTier::Wide
        } else if area.width >= 60 {
            LayoutTier::Medium
        } else {
            LayoutTier::Narrow
        }
    }

    pub fn show_sidebar(&self) -> bool {
        *self == LayoutTier::Wide
    }

    pub fn show_board_below(&self, height: u16) -> bool {
        *self == LayoutTier::Medium && height >= 24
    }
}

pub struct StudyLayout {
    pub header: Rect,
    pub card: Rect,
    pub board: Option<Rect>,
    pub stats: Option<Rect>,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl StudyLayout {
    pub fn new(area: Rect, footer_lines: u16) -> Self {
        let tier = LayoutTier::from_area(area);

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(6),
                Constraint::Length(footer_lines.max(1)),
            ])
            .split(area);

        if tier.show_sidebar() {
            let horizontal = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
                .split(vertical[1]);
            let sidebar = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(10), Constraint::Length(9)])
                .split(horizontal[1]);

            Self {
                header: vertical[0],
                card: horizontal[0],
                board: Some(sidebar[0]),
                stats: Some(sidebar[1]),
                footer: vertical[2],
                tier,
            }
        } else if tier.show_board_below(area.height) {
            let split = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(6), Constraint::Length(10)])
                .split(vertical[1]);
            Self {
                header: vertical[0],
                card: split[0],
                board: Some(split[1]),
                stats: None,
                footer: vertical[2],
                tier,
            }
        } else {
            Self {
                header: vertical[0],
                card: vertical[1],
                board: None,
                stats: None,
                footer: vertical[2],
                tier,
            }
        }
    }
}

pub fn pack_hint_lines(hints: &[String], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = " ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints.iter().filter(|h| !h.is_empty()) {
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width || !has_hint {
            current = candidate;
            has_hint = true;
        } else {
            out.push(current);
            current = format!("{prefix}{hint}");
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 40;
    const MIN_POPUP_HEIGHT: u16 = 7;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hints(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn wide_layout_has_sidebar() {
        let layout = StudyLayout::new(Rect::new(0, 0, 120, 40), 1);
        assert_eq!(layout.tier, LayoutTier::Wide);
        assert!(layout.board.is_some());
        assert!(layout.stats.is_some());
        assert!(layout.card.width < 120);
    }

    #[test]
    fn narrow_layout_is_card_only() {
        let layout = StudyLayout::new(Rect::new(0, 0, 50, 30), 2);
        assert_eq!(layout.tier, LayoutTier::Narrow);
        assert!(layout.board.is_none());
        assert_eq!(layout.card.width, 50);
        assert_eq!(layout.footer.height, 2);
    }

    #[test]
    fn medium_layout_shows_board_only_when_tall() {
        assert!(StudyLayout::new(Rect::new(0, 0, 80, 30), 1).board.is_some());
        assert!(StudyLayout::new(Rect::new(0, 0, 80, 20), 1).board.is_none());
    }

    #[test]
    fn hints_wrap_at_width() {
        let lines = pack_hint_lines(&hints(&["[c] Correcta", "[x] Incorrecta", "[q] Salir"]), 30);
        assert_eq!(lines, vec![" [c] Correcta  [x] Incorrecta", " [q] Salir"]);
    }

    #[test]
    fn overlong_hint_still_gets_a_line() {
        let lines = pack_hint_lines(&hints(&["[ctrl+s] Sincronizar"]), 5);
        assert_eq!(lines, vec![" [ctrl+s] Sincronizar"]);
    }

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 30, 5);
        let popup = centered_rect(50, 50, area);
        assert!(popup.width <= 30 && popup.height <= 5);
    }
}
