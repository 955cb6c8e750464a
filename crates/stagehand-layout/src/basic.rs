#![forbid(unsafe_code)]

//! Ready-made window with a title and free-text content.

use serde::{Deserialize, Serialize};
use stagehand_core::geometry::{Point, Size};

use crate::id::PaneId;
use crate::pane::{PANE_DEFAULT_SIZE, Pane, PaneContext, PaneOptions, PaneOptionsError};
use crate::zone::ZoneLink;

/// Offset from the zone's last window position used by
/// [`InitialPosition::Auto`].
pub const AUTO_PLACEMENT_OFFSET: f64 = 20.0;

/// Where a new window appears.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialPosition {
    At(Point),
    /// Cascade from the most recently placed window.
    #[default]
    Auto,
}

impl InitialPosition {
    #[must_use]
    pub fn resolve(self, zone: &dyn ZoneLink) -> Point {
        match self {
            Self::At(point) => point,
            Self::Auto => zone.last_window_position().offset(AUTO_PLACEMENT_OFFSET),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicWindowOptions {
    pub title: String,
    pub content: String,
    pub initial_size: Size,
    pub initial_position: InitialPosition,
}

impl Default for BasicWindowOptions {
    fn default() -> Self {
        Self {
            title: "Window".to_string(),
            content: String::new(),
            initial_size: PANE_DEFAULT_SIZE,
            initial_position: InitialPosition::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum BasicWindowEvent {
    TitleChanged { title: String },
    ContentChanged { content: String },
    CloseRequested,
}

/// A [`Pane`] with a title and editable text body.
#[derive(Debug, Clone)]
pub struct BasicWindow {
    pane: Pane,
    title: String,
    content: String,
    editing: bool,
    events: Vec<BasicWindowEvent>,
}

impl BasicWindow {
    /// Build the window, resolving its placement against `zone`.
    ///
    /// `base` supplies every pane option the preset does not set itself.
    pub fn new(
        id: PaneId,
        options: BasicWindowOptions,
        base: PaneOptions,
        zone: &dyn ZoneLink,
    ) -> Result<Self, PaneOptionsError> {
        let pane = Pane::new(
            id,
            PaneOptions {
                size: options.initial_size,
                position: options.initial_position.resolve(zone),
                ..base
            },
        )?;
        Ok(Self {
            pane,
            title: options.title,
            content: options.content,
            editing: false,
            events: Vec::new(),
        })
    }

    #[must_use]
    pub const fn pane(&self) -> &Pane {
        &self.pane
    }

    pub fn pane_mut(&mut self) -> &mut Pane {
        &mut self.pane
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        if title == self.title {
            return;
        }
        self.title.clone_from(&title);
        self.events.push(BasicWindowEvent::TitleChanged { title });
    }

    pub fn begin_editing(&mut self) {
        self.editing = true;
    }

    pub fn end_editing(&mut self) {
        self.editing = false;
    }

    /// User edit of the body.
    pub fn edit_content(&mut self, content: impl Into<String>) {
        let content = content.into();
        if content == self.content {
            return;
        }
        self.content.clone_from(&content);
        self.events
            .push(BasicWindowEvent::ContentChanged { content });
    }

    /// External content update. Ignored while the user is editing.
    pub fn sync_content(&mut self, content: impl Into<String>) -> bool {
        if self.editing {
            return false;
        }
        let content = content.into();
        if content == self.content {
            return false;
        }
        self.content = content;
        true
    }

    pub fn request_close(&mut self) {
        self.events.push(BasicWindowEvent::CloseRequested);
    }

    /// Stage button.
    pub fn toggle_staged(&mut self, cx: &mut PaneContext<'_>) -> bool {
        let staged = !self.pane.is_staged();
        self.pane.set_staged(cx, staged)
    }

    pub fn drain_events(&mut self) -> Vec<BasicWindowEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ZoneId;
    use crate::zone::{Zone, ZoneConfig};
    use stagehand_core::scale::StageFrame;

    fn window(zone: &Zone, options: BasicWindowOptions) -> BasicWindow {
        BasicWindow::new(PaneId::MIN, options, PaneOptions::default(), zone).unwrap()
    }

    #[test]
    fn auto_position_cascades() {
        let mut zone = Zone::new(ZoneId::new(1), ZoneConfig::default());
        zone.note_window_position(Point::new(100.0, 80.0));
        let w = window(&zone, BasicWindowOptions::default());
        assert_eq!(w.pane().position(), Point::new(120.0, 100.0));
        assert_eq!(w.pane().size(), Size::new(500.0, 400.0));
        assert_eq!(w.title(), "Window");
        assert!(w.is_empty());

        let fixed = window(
            &zone,
            BasicWindowOptions {
                initial_position: InitialPosition::At(Point::new(5.0, 6.0)),
                ..BasicWindowOptions::default()
            },
        );
        assert_eq!(fixed.pane().position(), Point::new(5.0, 6.0));
    }

    #[test]
    fn edits_emit_events_and_sync_waits_for_editing() {
        let zone = Zone::new(ZoneId::new(1), ZoneConfig::default());
        let mut w = window(&zone, BasicWindowOptions::default());
        w.set_title("Notes");
        w.set_title("Notes");
        w.begin_editing();
        w.edit_content("draft");
        assert!(!w.sync_content("remote"));
        w.end_editing();
        assert!(w.sync_content("remote"));
        assert_eq!(w.content(), "remote");
        w.request_close();
        assert_eq!(
            w.drain_events(),
            vec![
                BasicWindowEvent::TitleChanged {
                    title: "Notes".into()
                },
                BasicWindowEvent::ContentChanged {
                    content: "draft".into()
                },
                BasicWindowEvent::CloseRequested,
            ]
        );
    }

    #[test]
    fn toggle_staged_flips_dock() {
        let mut zone = Zone::new(ZoneId::new(1), ZoneConfig::default());
        let frame = StageFrame::unscaled(Size::new(1200.0, 800.0));
        let mut w = window(&zone, BasicWindowOptions::default());
        w.pane_mut().mount(&mut PaneContext::new(&frame, &mut zone));
        assert!(w.toggle_staged(&mut PaneContext::new(&frame, &mut zone)));
        assert!(w.pane().is_staged());
        assert!(w.toggle_staged(&mut PaneContext::new(&frame, &mut zone)));
        assert!(!w.pane().is_staged());
    }

    #[test]
    fn options_json_shape() {
        let opts: BasicWindowOptions =
            serde_json::from_str(r#"{"title":"Todo","initial_position":{"at":{"x":1,"y":2}}}"#)
                .unwrap();
        assert_eq!(opts.title, "Todo");
        assert_eq!(opts.initial_position, InitialPosition::At(Point::new(1.0, 2.0)));
    }
}
