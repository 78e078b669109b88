use crate::layout::Rect;

/// Vertical scroll state of the page (or of any scroll container).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewportState {
    pub y: u32,
    pub viewport_h: u32,
    pub content_h: u32,
}

impl ViewportState {
    pub fn new(viewport_h: u32) -> Self {
        Self {
            viewport_h,
            ..Self::default()
        }
    }

    pub fn set_viewport(&mut self, h: u32) {
        self.viewport_h = h;
        self.clamp();
    }

    pub fn set_content(&mut self, h: u32) {
        self.content_h = h;
        self.clamp();
    }

    pub fn clamp(&mut self) {
        self.y = self.y.min(self.max_y());
    }

    pub fn scroll_to(&mut self, y: u32) {
        self.y = y.min(self.max_y());
    }

    pub fn to_top(&mut self) {
        self.y = 0;
    }

    /// The visible slice of the content.
    pub fn visible(&self) -> Rect {
        Rect::new(self.y, self.viewport_h)
    }

    /// The visible slice shrunk by a percentage of the viewport height at each edge
    /// (a negative `rootMargin`).
    pub fn inset(&self, top_percent: u32, bottom_percent: u32) -> Rect {
        let h = self.viewport_h as u64;
        let top_cut = (h * top_percent.min(100) as u64 / 100) as u32;
        let bottom_cut = (h * bottom_percent.min(100) as u64 / 100) as u32;
        let height = self.viewport_h.saturating_sub(top_cut).saturating_sub(bottom_cut);
        Rect::new(self.y.saturating_add(top_cut), height)
    }

    fn max_y(&self) -> u32 {
        self.content_h.saturating_sub(self.viewport_h)
    }
}
