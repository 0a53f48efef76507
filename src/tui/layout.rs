//! Picker layout
//!
//! [`LayoutConfig`] holds the dimensions chosen at startup and
//! [`PickerLayout::calculate`] turns them into concrete areas for one frame.

use ratatui::prelude::*;

/// Configuration for picker layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Header height (title line plus bottom border)
    pub header_height: u16,
    /// Footer height (help line)
    pub footer_height: u16,
    /// Input box height (text plus borders)
    pub input_height: u16,
    /// Widest the picker grows; wider terminals center it
    pub max_width: u16,
    /// Share of the body given to the window preview, in percent
    pub preview_percent: u16,
    /// Narrowest body that still gets a preview panel
    pub min_width_for_preview: u16,
    /// Whether the window preview is shown at all
    pub show_preview: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            header_height: 2,
            footer_height: 1,
            input_height: 3,
            max_width: 120,
            preview_percent: 40,
            min_width_for_preview: 80,
            show_preview: true,
        }
    }
}

/// Pre-calculated layout areas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerLayout {
    pub header: Rect,
    /// Message banner row, when a message is shown
    pub banner: Option<Rect>,
    pub list: Rect,
    /// Window preview, when requested and there is room
    pub preview: Option<Rect>,
    /// Text input box, in the text-entry modes
    pub input: Option<Rect>,
    pub footer: Rect,
}

impl PickerLayout {
    pub fn calculate(
        terminal_size: Rect,
        config: &LayoutConfig,
        with_banner: bool,
        with_input: bool,
        with_preview: bool,
    ) -> Self {
        let width = terminal_size.width.min(config.max_width);
        let mut rows = Rows {
            x: terminal_size.x + (terminal_size.width - width) / 2,
            y: terminal_size.y,
            width,
            remaining: terminal_size.height,
        };

        let header = rows.take(config.header_height);
        let banner = with_banner.then(|| rows.take(1));

        let input_height = if with_input { config.input_height } else { 0 };
        let body_height = rows
            .remaining
            .saturating_sub(input_height)
            .saturating_sub(config.footer_height);
        let body = rows.take(body_height);
        let input = with_input.then(|| rows.take(input_height));
        let footer = rows.take(config.footer_height);

        let (list, preview) = if with_preview
            && config.show_preview
            && body.width >= config.min_width_for_preview
        {
            let preview_width = body.width * config.preview_percent.min(90) / 100;
            let list_width = body.width - preview_width;
            (
                Rect::new(body.x, body.y, list_width, body.height),
                Some(Rect::new(
                    body.x + list_width,
                    body.y,
                    preview_width,
                    body.height,
                )),
            )
        } else {
            (body, None)
        };

        Self {
            header,
            banner,
            list,
            preview,
            input,
            footer,
        }
    }
}

/// Hands out full-width rows from the top of an area
struct Rows {
    x: u16,
    y: u16,
    width: u16,
    remaining: u16,
}

impl Rows {
    fn take(&mut self, height: u16) -> Rect {
        let height = height.min(self.remaining);
        let rect = Rect::new(self.x, self.y, self.width, height);
        self.y += height;
        self.remaining -= height;
        rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_layout() {
        let layout =
            PickerLayout::calculate(Rect::new(0, 0, 80, 24), &LayoutConfig::default(), false, false, false);

        assert_eq!(layout.header, Rect::new(0, 0, 80, 2));
        assert_eq!(layout.banner, None);
        assert_eq!(layout.list, Rect::new(0, 2, 80, 21));
        assert_eq!(layout.input, None);
        assert_eq!(layout.footer, Rect::new(0, 23, 80, 1));
    }

    #[test]
    fn test_banner_input_and_preview() {
        let layout =
            PickerLayout::calculate(Rect::new(0, 0, 100, 30), &LayoutConfig::default(), true, true, true);

        assert_eq!(layout.banner, Some(Rect::new(0, 2, 100, 1)));
        assert_eq!(layout.list, Rect::new(0, 3, 60, 23));
        assert_eq!(layout.preview, Some(Rect::new(60, 3, 40, 23)));
        assert_eq!(layout.input, Some(Rect::new(0, 26, 100, 3)));
        assert_eq!(layout.footer, Rect::new(0, 29, 100, 1));
    }

    #[test]
    fn test_narrow_terminal_drops_preview() {
        let layout =
            PickerLayout::calculate(Rect::new(0, 0, 60, 20), &LayoutConfig::default(), false, false, true);
        assert_eq!(layout.preview, None);
        assert_eq!(layout.list.width, 60);
    }

    #[test]
    fn test_wide_terminal_is_centered() {
        let layout =
            PickerLayout::calculate(Rect::new(0, 0, 200, 20), &LayoutConfig::default(), false, false, false);
        assert_eq!(layout.header.x, 40);
        assert_eq!(layout.header.width, 120);
    }

    #[test]
    fn test_tiny_terminal_does_not_underflow() {
        let layout =
            PickerLayout::calculate(Rect::new(0, 0, 10, 2), &LayoutConfig::default(), true, true, false);
        assert_eq!(layout.header.height, 2);
        assert_eq!(layout.list.height, 0);
        assert_eq!(layout.footer.height, 0);
    }
}
