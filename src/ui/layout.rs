use tui::layout::{Constraint, Layout, Rect, Size};
pub const TAB_BAR_HEIGHT: u16 = 3;
pub const STATUS_BAR_HEIGHT: u16 = 1;
pub const LOG_PANE_HEIGHT: u16 = 8;

/// Pre-computed layout areas for the main draw loop.
pub struct LayoutAreas {
    pub tab_bar: [Rect; 2],
    pub main: Rect,
    pub logs: Rect,
    pub status_bar: Rect,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        let logs_height = if show_logs { LOG_PANE_HEIGHT } else { 0 };
        let tab_height = if full_screen { 0 } else { TAB_BAR_HEIGHT };

        let [tab, main, logs, status_bar] = Layout::vertical([
            Constraint::Length(tab_height),
            Constraint::Fill(1),
            Constraint::Length(logs_height),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .areas(area);

        LayoutAreas {
            tab_bar: if full_screen { [Rect::ZERO, Rect::ZERO] } else { Self::split_tab_bar(tab) },
            main,
            logs,
            status_bar,
        }
    }

    fn split_tab_bar(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(85), Constraint::Percentage(15)]).areas(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_screen_drops_the_tab_bar() {
        let mut layout = LayoutAreas::new(Size::new(80, 24));
        assert_eq!(layout.tab_bar[0].height, TAB_BAR_HEIGHT);

        layout.update(Rect::new(0, 0, 80, 24), true, false);
        assert_eq!(layout.tab_bar, [Rect::ZERO, Rect::ZERO]);
        assert_eq!(layout.main.height, 24 - STATUS_BAR_HEIGHT);
    }

    #[test]
    fn log_pane_takes_space_from_main() {
        let mut layout = LayoutAreas::new(Size::new(80, 24));
        let without = layout.main.height;
        layout.update(Rect::new(0, 0, 80, 24), false, true);
        assert_eq!(layout.logs.height, LOG_PANE_HEIGHT);
        assert_eq!(layout.main.height, without - LOG_PANE_HEIGHT);
    }
}
