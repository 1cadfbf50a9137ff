use crate::coords::Vec2;
use crate::paint::Color;
use crate::render::Rasterizer;
use crate::text::FontId;

use super::DrawEngine;

/// One step of a retained drawing script.
///
/// Setters update the draw state or the command cursor (origin, size, text);
/// draw commands read them back. Useful for replaying drawing from data.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetFillColor(Color),
    SetStrokeColor(Color),
    SetStrokeWidth(f32),
    SetFont(FontId),
    SetOrigin(Vec2),
    SetSize(Vec2),
    SetText(String),
    /// Filled rectangle at the cursor origin and size.
    DrawRect,
    /// Outlined rectangle at the cursor origin and size.
    StrokeRect,
    /// Cursor text at the cursor origin with the active font.
    DrawText,
}

impl<R: Rasterizer> DrawEngine<R> {
    /// Applies one command. Returns the advanced width for
    /// [`Command::DrawText`] and `0.0` for everything else.
    pub fn execute(&mut self, command: Command) -> f32 {
        match command {
            Command::SetFillColor(c) => self.set_color(c),
            Command::SetStrokeColor(c) => self.set_stroke_color(c),
            Command::SetStrokeWidth(w) => self.set_stroke_width(w),
            Command::SetFont(f) => self.set_font(f),
            Command::SetOrigin(p) => self.cursor.origin = p,
            Command::SetSize(s) => self.cursor.size = s,
            Command::SetText(t) => self.cursor.text = t,
            Command::DrawRect => {
                let (o, s) = (self.cursor.origin, self.cursor.size);
                self.draw_rect(o.x, o.y, s.x, s.y);
            }
            Command::StrokeRect => {
                let (o, s) = (self.cursor.origin, self.cursor.size);
                self.stroke_rect(o.x, o.y, s.x, s.y);
            }
            Command::DrawText => return self.draw_cursor_text(),
        }
        0.0
    }

    /// Applies every command in order.
    pub fn execute_all<I>(&mut self, commands: I)
    where
        I: IntoIterator<Item = Command>,
    {
        for command in commands {
            self.execute(command);
        }
    }

    fn draw_cursor_text(&mut self) -> f32 {
        let Some(font) = self.state.font else { return 0.0 };
        if self.cursor.text.is_empty() {
            return 0.0;
        }
        // Taken out for the call so the engine can be borrowed mutably.
        let text = std::mem::take(&mut self.cursor.text);
        let origin = self.cursor.origin;
        let width = self.draw_text(font, &text, origin.x, origin.y);
        self.cursor.text = text;
        width
    }
}
