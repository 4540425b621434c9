use super::geometry::{CellParams, RadialParams, Rect};
use super::item::{IconRef, MenuItem};
use super::panel::{Panel, PanelKind};
use super::surface::CompositeSurface;
use super::{BORDER_WIDTH, CELL_CORNER_RADIUS, FONT_FAMILY, RADIAL_TEXT_SIZE, TITLE_MAX_LINES};
use crate::gui::theme::ThemeColors;
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use handyctl::icon::{self, IconName};
use handyctl::wm::Point;
use palette::Srgba;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

pub fn draw(cr: &Context, surface: &CompositeSurface, colors: &ThemeColors) -> Result<(), cairo::Error> {
    for panel in surface.panels() {
        panel.render(cr, surface, colors)?;
    }
    Ok(())
}

impl Panel {
    /// Paints the panel onto a y-down device context covering the whole
    /// viewport of `surface`.
    pub fn render(
        &self,
        cr: &Context,
        surface: &CompositeSurface,
        colors: &ThemeColors,
    ) -> Result<(), cairo::Error> {
        if self.items().is_empty() {
            return Ok(());
        }
        let renderer = PanelRenderer {
            panel: self,
            surface,
            colors,
        };
        match self.kind() {
            PanelKind::Radial(params) => renderer.draw_radial(cr, params),
            PanelKind::VerticalStrip(params) => renderer.draw_cells(cr, &params.cell),
            PanelKind::Grid(params) => renderer.draw_cells(cr, &params.cell),
        }
    }
}

struct PanelRenderer<'a> {
    panel: &'a Panel,
    surface: &'a CompositeSurface,
    colors: &'a ThemeColors,
}

impl PanelRenderer<'_> {
    fn to_device(&self, local: Point) -> Point {
        let b = self.panel.bounds();
        self.surface.to_screen(Point::new(b.x + local.x, b.y + local.y))
    }

    fn fill_color(&self, index: usize) -> Srgba<f64> {
        if self.panel.hover_index() == Some(index) {
            self.colors.hovered
        } else {
            self.colors.idle
        }
    }

    fn draw_radial(&self, cr: &Context, params: &RadialParams) -> Result<(), cairo::Error> {
        let c = self.to_device(Rect::from_size(self.panel.bounds().size()).center());
        let label_radius = params.outer_radius * params.label_ratio;

        for (i, (sector, item)) in self.panel.sectors().iter().zip(self.panel.items()).enumerate() {
            let (start, end) = sector.screen_angles();
            cr.new_path();
            cr.arc(c.x, c.y, params.outer_radius, start, end);
            cr.arc_negative(c.x, c.y, params.inner_radius, end, start);
            cr.close_path();

            set_color(cr, self.fill_color(i));
            cr.fill_preserve()?;
            set_color(cr, self.colors.border);
            cr.set_line_width(BORDER_WIDTH);
            cr.stroke()?;

            // bearings grow clockwise from 12 o'clock; device y points down
            let mid = sector.mid();
            let at = Point::new(
                c.x + label_radius * mid.sin(),
                c.y - label_radius * mid.cos(),
            );
            let max_width = label_radius * (end - start).min(PI);
            self.draw_content(cr, item, at, params.icon_size, max_width, RADIAL_TEXT_SIZE)?;
        }

        set_color(cr, self.colors.center);
        cr.new_path();
        cr.arc(c.x, c.y, params.inner_radius, 0.0, TAU);
        cr.fill()
    }

    fn draw_cells(&self, cr: &Context, cell: &CellParams) -> Result<(), cairo::Error> {
        for (i, (rect, item)) in self.panel.cells().iter().zip(self.panel.items()).enumerate() {
            let top_left = self.to_device(Point::new(rect.x, rect.max_y()));

            rounded_rect(cr, top_left.x, top_left.y, rect.width, rect.height, CELL_CORNER_RADIUS);
            set_color(cr, self.fill_color(i));
            cr.fill_preserve()?;
            set_color(cr, self.colors.border);
            cr.set_line_width(BORDER_WIDTH);
            cr.stroke()?;

            let center = Point::new(top_left.x + rect.width / 2.0, top_left.y + rect.height / 2.0);
            let max_width = rect.width - 2.0 * cell.padding;
            self.draw_content(cr, item, center, cell.icon_size, max_width, cell.text_height)?;
        }
        Ok(())
    }

    /// Icon above the title, the pair centred on `at`. Without an icon the
    /// title alone is centred.
    fn draw_content(
        &self,
        cr: &Context,
        item: &MenuItem,
        at: Point,
        icon_size: f64,
        max_width: f64,
        text_size: f64,
    ) -> Result<(), cairo::Error> {
        let pixbuf = item
            .icon
            .as_ref()
            .and_then(|icon| self.panel.icons().get_or_load(icon, |r| load_icon(r, icon_size)));

        cr.select_font_face(FONT_FAMILY, cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(text_size);
        let lines = wrap_title(&item.title, max_width, TITLE_MAX_LINES, |s| {
            cr.text_extents(s).map(|e| e.x_advance()).unwrap_or(0.0)
        });
        let text_height = lines.len() as f64 * text_size;

        match pixbuf {
            Some(pixbuf) => {
                let gap = text_size / 3.0;
                let top = at.y - (icon_size + gap + text_height) / 2.0;
                draw_icon(cr, &pixbuf, Point::new(at.x - icon_size / 2.0, top), icon_size)?;
                self.draw_lines(cr, &lines, at.x, top + icon_size + gap, text_size)
            }
            None => self.draw_lines(cr, &lines, at.x, at.y - text_height / 2.0, text_size),
        }
    }

    fn draw_lines(
        &self,
        cr: &Context,
        lines: &[String],
        center_x: f64,
        top: f64,
        line_height: f64,
    ) -> Result<(), cairo::Error> {
        set_color(cr, self.colors.text);
        for (i, line) in lines.iter().enumerate() {
            let ext = cr.text_extents(line)?;
            cr.move_to(
                center_x - ext.x_advance() / 2.0,
                top + (i + 1) as f64 * line_height - line_height * 0.2,
            );
            cr.show_text(line)?;
        }
        Ok(())
    }
}

fn load_icon(icon: &IconRef, size: f64) -> Option<Pixbuf> {
    let px = size.round().max(1.0) as u16;
    let path = icon::find_icon_path_sized(&IconName::new(icon.as_str()), px)?;
    Pixbuf::from_file_at_scale(&path, px as i32, px as i32, true)
        .inspect_err(|e| log::warn!("Failed to load icon {}: {}", path.display(), e))
        .ok()
}

fn draw_icon(cr: &Context, pixbuf: &Pixbuf, top_left: Point, size: f64) -> Result<(), cairo::Error> {
    let scale = size / pixbuf.width().max(pixbuf.height()).max(1) as f64;
    cr.save()?;
    cr.translate(top_left.x, top_left.y);
    cr.scale(scale, scale);
    cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
    cr.paint()?;
    cr.restore()
}

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn rounded_rect(cr: &Context, x: f64, y: f64, w: f64, h: f64, radius: f64) {
    let r = radius.min(w / 2.0).min(h / 2.0);
    cr.new_sub_path();
    cr.arc(x + w - r, y + r, r, -FRAC_PI_2, 0.0);
    cr.arc(x + w - r, y + h - r, r, 0.0, FRAC_PI_2);
    cr.arc(x + r, y + h - r, r, FRAC_PI_2, PI);
    cr.arc(x + r, y + r, r, PI, 3.0 * FRAC_PI_2);
    cr.close_path();
}

/// Greedy word wrap. A word wider than `max_width` gets a line of its own;
/// lines past `max_lines` are dropped and the last kept one ends in '…'.
fn wrap_title(
    text: &str,
    max_width: f64,
    max_lines: usize,
    measure: impl Fn(&str) -> f64,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            last.push('…');
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> f64 {
        s.chars().count() as f64 * 10.0
    }

    #[test]
    fn short_titles_stay_on_one_line() {
        assert_eq!(wrap_title("Copy", 100.0, 2, chars), vec!["Copy"]);
        assert!(wrap_title("   ", 100.0, 2, chars).is_empty());
    }

    #[test]
    fn wraps_at_word_boundaries() {
        assert_eq!(
            wrap_title("Paste Plain Text", 120.0, 2, chars),
            vec!["Paste Plain", "Text"]
        );
    }

    #[test]
    fn overflow_is_elided() {
        assert_eq!(
            wrap_title("one two three four", 40.0, 2, chars),
            vec!["one", "two…"]
        );
    }

    #[test]
    fn long_words_are_not_split() {
        assert_eq!(
            wrap_title("Screenshot now", 50.0, 2, chars),
            vec!["Screenshot", "now"]
        );
    }
}
