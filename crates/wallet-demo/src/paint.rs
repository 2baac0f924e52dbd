#![forbid(unsafe_code)]

//! Paints a [`WalletApp`] into a cell [`Canvas`].
//!
//! # Draw order
//!
//! 1. Card slots in flow order (placeholders as dashed outlines).
//! 2. Shred strips.
//! 3. The floating card being dragged, with a drop shadow.
//! 4. Header and status line.
//! 5. The details panel, over a dimmed backdrop.
//!
//! Everything is clipped to the canvas; cards scrolled under the header are
//! simply overdrawn.

use crossterm::style::Color;
use unicode_width::UnicodeWidthChar;
use wallet_core::geometry::{Point, Rect};
use wallet_core::text::{display_width, fit_width};
use wallet_engine::card::CardFace;
use wallet_engine::code_image::{CodeImage, GRID};
use wallet_engine::details::DetailsView;
use wallet_engine::view::{CardNode, EntrancePhase, Tilt, ViewNode};
use wallet_engine::{ViewMode, WalletApp};

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

/// One terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// `'\0'` marks the trailing half of a wide character.
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::Reset,
            bg: Color::Reset,
            bold: false,
        }
    }
}

/// Style applied to painted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pen {
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
}

impl Pen {
    #[must_use]
    pub const fn new(fg: Color, bg: Color) -> Self {
        Self { fg, bg, bold: false }
    }

    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// A grid of cells, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); usize::from(width) * usize::from(height)],
        }
    }

    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[must_use]
    pub fn area(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Resize and clear.
    pub fn resize(&mut self, width: u16, height: u16) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let (w, h) = (i32::from(self.width), i32::from(self.height));
        (x >= 0 && y >= 0 && x < w && y < h).then(|| (y * w + x) as usize)
    }

    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// Rows of cells, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(usize::from(self.width.max(1)))
    }

    /// The text of row `y`, skipping wide-character continuations.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.rows()
            .nth(usize::from(y))
            .map(|row| row.iter().map(|c| c.ch).filter(|c| *c != '\0').collect())
            .unwrap_or_default()
    }

    pub fn put(&mut self, x: i32, y: i32, ch: char, pen: Pen) {
        if let Some(cell) = self.get_mut(x, y) {
            *cell = Cell {
                ch,
                fg: pen.fg,
                bg: pen.bg,
                bold: pen.bold,
            };
        }
    }

    /// Print `text` from `(x, y)`; returns the column after the last cell.
    pub fn print(&mut self, x: i32, y: i32, text: &str, pen: Pen) -> i32 {
        let mut col = x;
        for ch in text.chars() {
            let width = ch.width().unwrap_or(0) as i32;
            if width == 0 {
                continue;
            }
            self.put(col, y, ch, pen);
            if width == 2 {
                self.put(col + 1, y, '\0', pen);
            }
            col += width;
        }
        col
    }

    pub fn fill(&mut self, rect: Rect, ch: char, pen: Pen) {
        for y in rect.top()..rect.bottom() {
            for x in rect.left()..rect.right() {
                self.put(x, y, ch, pen);
            }
        }
    }

    /// Recolor the background of `rect`, keeping glyphs.
    pub fn tint(&mut self, rect: Rect, bg: Color) {
        for y in rect.top()..rect.bottom() {
            for x in rect.left()..rect.right() {
                if let Some(cell) = self.get_mut(x, y) {
                    cell.bg = bg;
                }
            }
        }
    }

    /// Rounded box border around `rect`.
    pub fn frame(&mut self, rect: Rect, pen: Pen, dashed: bool) {
        if rect.width < 2 || rect.height < 2 {
            return;
        }
        let (h, v) = if dashed { ('┄', '┆') } else { ('─', '│') };
        let (l, t, r, b) = (rect.left(), rect.top(), rect.right() - 1, rect.bottom() - 1);
        for x in l + 1..r {
            self.put(x, t, h, pen);
            self.put(x, b, h, pen);
        }
        for y in t + 1..b {
            self.put(l, y, v, pen);
            self.put(r, y, v, pen);
        }
        self.put(l, t, '╭', pen);
        self.put(r, t, '╮', pen);
        self.put(l, b, '╰', pen);
        self.put(r, b, '╯', pen);
    }
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

const INK: Color = Color::Rgb { r: 0xf9, g: 0xfa, b: 0xfb };
const MUTED: Color = Color::Rgb { r: 0x94, g: 0xa3, b: 0xb8 };
const SHADOW: Color = Color::Rgb { r: 0x02, g: 0x06, b: 0x17 };
const BACKDROP: Color = Color::Rgb { r: 0x0f, g: 0x17, b: 0x2a };
const PANEL: Color = Color::Rgb { r: 0x1e, g: 0x29, b: 0x3b };
const DANGER: Color = Color::Rgb { r: 0xf8, g: 0x71, b: 0x71 };
const PAPER: Color = Color::Rgb { r: 0xe2, g: 0xe8, b: 0xf0 };

/// Card background per kind slug.
#[must_use]
pub fn kind_color(slug: &str) -> (u8, u8, u8) {
    match slug {
        "transit" => (0x1d, 0x4e, 0xd8),
        "rail" => (0x04, 0x78, 0x57),
        "flight" => (0x6d, 0x28, 0xd9),
        "loyalty" => (0xc2, 0x41, 0x0c),
        _ => (0x33, 0x41, 0x55),
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb { r, g, b }
}

fn scale((r, g, b): (u8, u8, u8), k: f32) -> (u8, u8, u8) {
    let f = |c: u8| (f32::from(c) * k).clamp(0.0, 255.0) as u8;
    (f(r), f(g), f(b))
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

/// Draw a card face at `rect`. `delete` adds the ✕ affordance.
pub fn paint_face(canvas: &mut Canvas, rect: Rect, face: &CardFace, tint: f32, delete: bool) {
    let base = scale(kind_color(face.kind_slug), tint);
    let bg = rgb(base);
    let pen = Pen::new(INK, bg);
    let muted = Pen::new(MUTED, bg);

    canvas.fill(rect, ' ', pen);
    canvas.frame(rect, Pen::new(rgb(scale(base, 1.6)), bg), false);
    if delete {
        let x = rect.right() - 4;
        canvas.print(x, rect.top(), " ✕ ", Pen::new(DANGER, bg).bold());
    }

    let inner = usize::from(rect.width.saturating_sub(4));
    let x = rect.left() + 2;
    let line = |row: i32| rect.top() + row;
    let date_width = display_width(&face.date);
    let label_width = inner.saturating_sub(date_width + 1);

    let rows: [(String, Pen); 6] = [
        (fit_width(&face.title, inner), pen.bold()),
        (fit_width(&face.subtitle, inner), muted),
        (fit_width(&face.main_value, inner), pen.bold()),
        (fit_width(&face.secondary, inner), pen),
        (
            format!(
                "{}{}",
                fit_width(&face.serial, inner.saturating_sub(display_width(&face.holder))),
                face.holder
            ),
            muted,
        ),
        (fit_width(face.footer, inner), muted),
    ];

    if rect.height >= 3 {
        canvas.print(x, line(1), &fit_width(face.kind_label, label_width), muted.bold());
        canvas.print(x + label_width as i32 + 1, line(1), &face.date, muted);
    }
    for (i, (text, pen)) in rows.iter().enumerate() {
        let row = i as i32 + 2;
        if row >= i32::from(rect.height) - 1 {
            break;
        }
        canvas.print(x, line(row), &fit_width(text, inner), *pen);
    }
}

fn paint_tilt(canvas: &mut Canvas, rect: Rect, tilt: Tilt, base: (u8, u8, u8)) {
    let gx = rect.left() + (tilt.glare_x * f32::from(rect.width)) as i32;
    let gy = rect.top() + (tilt.glare_y * f32::from(rect.height)) as i32;
    for y in rect.top() + 1..rect.bottom() - 1 {
        for x in rect.left() + 1..rect.right() - 1 {
            let (dx, dy) = ((x - gx) as f32 / 2.0, (y - gy) as f32);
            let glow = 1.0 - ((dx * dx + dy * dy).sqrt() / 4.0);
            if glow > 0.0 {
                canvas.tint(Rect::new(x, y, 1, 1), rgb(scale(base, 1.0 + 0.5 * glow)));
            }
        }
    }
}

fn paint_card(canvas: &mut Canvas, rect: Rect, node: &CardNode, floating: bool) {
    let style = &node.style;
    if style.hidden {
        return;
    }
    let tint = match style.entrance {
        EntrancePhase::Pending => return,
        EntrancePhase::Entering => 0.6,
        EntrancePhase::Settled => 1.0,
    };
    if floating || style.elevated {
        canvas.tint(rect.translate(1, 1), SHADOW);
    }
    paint_face(canvas, rect, &node.face, tint, !floating);
    if let Some(tilt) = style.tilt {
        paint_tilt(canvas, rect, tilt, kind_color(node.face.kind_slug));
    }
}

fn paint_shreds(canvas: &mut Canvas, app: &WalletApp) {
    for piece in app.removal_pieces() {
        let ch = match piece.opacity {
            o if o > 0.66 => '▓',
            o if o > 0.33 => '▒',
            _ => '░',
        };
        let lean = (piece.tilt_deg / 30.0).round() as i32;
        for (row, y) in (piece.rect.top()..piece.rect.bottom()).enumerate() {
            let shift = lean * row as i32 / i32::from(piece.rect.height.max(1));
            for x in piece.rect.left()..piece.rect.right() {
                canvas.put(x + shift, y, ch, Pen::new(PAPER, Color::Reset));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Chrome
// ---------------------------------------------------------------------------

fn paint_header(canvas: &mut Canvas, app: &WalletApp) {
    let width = canvas.width();
    let pen = Pen::new(INK, PANEL);
    canvas.fill(Rect::new(0, 0, width, 1), ' ', pen);
    let state = app.state();
    let count = match state.filter.visible() {
        Some(visible) => format!("{}/{} cartes", visible.len(), state.store.len()),
        None => format!("{} cartes", state.store.len()),
    };
    let x = canvas.print(1, 0, "Wallet", pen.bold());
    let x = canvas.print(x + 2, 0, &count, Pen::new(MUTED, PANEL));
    let mode = match state.view_mode {
        ViewMode::Grid => "▦ Grille",
        ViewMode::Stack => "▤ Pile",
    };
    let x = canvas.print(x + 2, 0, mode, Pen::new(MUTED, PANEL));

    let search = format!("⌕ {}▏", app.query());
    let room = usize::from(width).saturating_sub(x as usize + 3);
    let field = fit_width(&search, room.min(40));
    let at = i32::from(width) - field.chars().count() as i32 - 1;
    canvas.print(at.max(x + 2), 0, &field, pen);
}

fn paint_status(canvas: &mut Canvas, app: &WalletApp) {
    let y = i32::from(canvas.height()) - 1;
    let width = usize::from(canvas.width());
    let hint = if app.drag().is_active() {
        "Relâcher pour déposer"
    } else if app.state().details.is_some() {
        "Échap ou clic à l'extérieur pour fermer"
    } else {
        "Glisser pour trier · ✕ déchiqueter · Tab grille/pile · Ctrl+C quitter"
    };
    canvas.print(0, y, &fit_width(hint, width), Pen::new(MUTED, BACKDROP));
}

/// Paint the code image with half blocks: one text row per two module rows.
pub fn paint_code(canvas: &mut Canvas, x: i32, y: i32, code: &CodeImage) {
    let color = |on: bool| if on { INK } else { SHADOW };
    let rows: Vec<&[bool; GRID]> = code.rows().collect();
    for (pair, chunk) in rows.chunks(2).enumerate() {
        for col in 0..GRID {
            let top = chunk[0][col];
            let bottom = chunk.get(1).is_some_and(|row| row[col]);
            canvas.put(
                x + col as i32,
                y + pair as i32,
                '▀',
                Pen::new(color(top), color(bottom)),
            );
        }
    }
}

fn paint_details(canvas: &mut Canvas, details: &DetailsView) {
    let area = canvas.area();
    canvas.tint(area, BACKDROP);
    let panel = DetailsView::panel_rect(area);
    let pen = Pen::new(INK, PANEL);
    canvas.fill(panel, ' ', pen);
    canvas.frame(panel, Pen::new(MUTED, PANEL), false);

    let inner = usize::from(panel.width.saturating_sub(4));
    canvas.print(panel.left() + 2, panel.top() + 1, &fit_width(&details.title, inner), pen.bold());
    canvas.print(
        panel.left() + 2,
        panel.top() + 2,
        &fit_width(&details.subtitle, inner),
        Pen::new(MUTED, PANEL),
    );

    let preview = Rect::new(panel.left() + 2, panel.top() + 4, 30, 9).intersection(&panel);
    paint_face(canvas, preview, &details.face, 1.0, false);

    let code_x = panel.left() + 35;
    if code_x + GRID as i32 <= panel.right() - 1 {
        paint_code(canvas, code_x, panel.top() + 4, &details.code);
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Repaint the whole wallet.
pub fn paint(canvas: &mut Canvas, app: &WalletApp) {
    canvas.clear();
    let view = &app.state().view;

    for (index, slot) in view.slots().iter().enumerate() {
        match slot {
            ViewNode::Card(node) => {
                let (x, y) = view.visual_origin(node, Some(index));
                let rect = view
                    .slot_rect(index)
                    .with_origin(Point::new(x.round() as i32, y.round() as i32));
                paint_card(canvas, rect, node, false);
            }
            ViewNode::Placeholder(_) => {
                canvas.frame(view.slot_rect(index), Pen::new(MUTED, Color::Reset), true);
            }
        }
    }

    paint_shreds(canvas, app);

    if let Some(node) = view.floating()
        && let Some(rect) = view.visual_rect(node.id)
    {
        paint_card(canvas, rect, node, true);
    }

    paint_header(canvas, app);
    paint_status(canvas, app);

    if let Some(details) = &app.state().details {
        paint_details(canvas, details);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_core::event::PointerEvent;
    use wallet_engine::WalletConfig;
    use wallet_engine::generator::CardGenerator;

    fn app() -> WalletApp {
        WalletApp::new(WalletConfig::default().card_count(4), Rect::from_size(80, 40))
    }

    #[test]
    fn print_handles_wide_chars_and_clips() {
        let mut canvas = Canvas::new(6, 1);
        let pen = Pen::new(INK, SHADOW);
        let end = canvas.print(0, 0, "a日b", pen);
        assert_eq!(end, 4);
        assert_eq!(canvas.get(2, 0).map(|c| c.ch), Some('\0'));
        assert_eq!(canvas.row_text(0), "a日b  ");
        canvas.print(4, 0, "xyz", pen);
        assert_eq!(canvas.row_text(0), "a日bxy");
    }

    #[test]
    fn frame_draws_rounded_corners() {
        let mut canvas = Canvas::new(4, 3);
        canvas.frame(canvas.area(), Pen::new(INK, SHADOW), false);
        assert_eq!(canvas.row_text(0), "╭──╮");
        assert_eq!(canvas.row_text(1), "│  │");
        assert_eq!(canvas.row_text(2), "╰──╯");
    }

    #[test]
    fn face_shows_title_and_delete_affordance() {
        let record = CardGenerator::new(1).card(2);
        let face = record.face();
        let mut canvas = Canvas::new(30, 9);
        let area = canvas.area();
        paint_face(&mut canvas, area, &face, 1.0, true);
        assert!(canvas.row_text(0).contains('✕'));
        let title: String = face.title.chars().take(10).collect();
        assert!(canvas.row_text(2).contains(&title));
    }

    #[test]
    fn paints_header_cards_and_status() {
        let app = app();
        let mut canvas = Canvas::new(80, 40);
        paint(&mut canvas, &app);
        assert!(canvas.row_text(0).contains("4 cartes"));
        assert!(canvas.row_text(39).contains("Glisser"));
        // First card's top border on the first grid row.
        assert!(canvas.row_text(2).contains('╭'));
    }

    #[test]
    fn dragging_draws_placeholder_outline() {
        let mut app = app();
        let origin = app.state().view.slot_rect(0);
        let (x, y) = (origin.x + 2, origin.y + 3);
        app.handle_pointer(&PointerEvent::down(x, y));
        // Below both card rows: the placeholder stays in slot 0, uncovered.
        app.handle_pointer(&PointerEvent::moved(x, y + 22));
        assert!(app.drag().is_active());
        let mut canvas = Canvas::new(80, 40);
        paint(&mut canvas, &app);
        assert_eq!(canvas.get(origin.x + 1, origin.y).map(|c| c.ch), Some('┄'));
        assert!(canvas.row_text(39).contains("Relâcher"));
    }

    #[test]
    fn details_panel_shows_code() {
        let mut app = app();
        assert!(app.open_details(wallet_engine::CardId(1)));
        let mut canvas = Canvas::new(80, 24);
        paint(&mut canvas, &app);
        let panel = DetailsView::panel_rect(canvas.area());
        assert!(canvas.rows().flatten().any(|c| c.ch == '▀'));
        assert_eq!(canvas.get(panel.left(), panel.top()).map(|c| c.ch), Some('╭'));
    }
}
