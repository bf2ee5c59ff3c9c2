use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Position, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Gauge, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::game::Game;
use crate::rounds::{Piece, Round};
use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

/// Display width of an empty blank; occupants are centered inside it.
pub const BLANK_WIDTH: u16 = 14;

const QUIT_LABEL: &str = "[ Quit ]";
const SUBMIT_LABEL: &str = "[ Submit ]";
const START_LABEL: &str = "[ Start ]";
const BACK_LABEL: &str = "[ Back ]";
const DASHBOARD_LABEL: &str = "[ Go to Dashboard ]";

/// A positioned sentence fragment: literal text or the n-th blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentenceItem {
    Text(String),
    Blank(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedItem {
    pub item: SentenceItem,
    pub area: Rect,
}

/// Geometry of the playing screen. The renderer draws from these rects and
/// the pointer path hit-tests against the same ones, so what you click is
/// what you see.
#[derive(Debug, Clone)]
pub struct PlayingLayout {
    pub timer: Rect,
    pub quit: Rect,
    pub progress: Rect,
    pub instruction: Rect,
    pub sentence: Vec<PlacedItem>,
    pub tokens: Vec<(String, Rect)>,
    pub submit: Rect,
}

impl PlayingLayout {
    pub fn compute(game: &Game, round: &Round, area: Rect) -> Self {
        let left = area.x + HORIZONTAL_MARGIN;
        let right = area.right().saturating_sub(HORIZONTAL_MARGIN);
        let content_width = right.saturating_sub(left);

        let header_y = area.y + VERTICAL_MARGIN;
        let timer = Rect::new(left, header_y, 5.min(content_width), 1);
        let quit_w = QUIT_LABEL.width() as u16;
        let quit = Rect::new(right.saturating_sub(quit_w), header_y, quit_w, 1);

        let progress = Rect::new(left, header_y + 2, content_width, 1);
        let instruction = Rect::new(left, header_y + 4, content_width, 1);

        let sentence_top = header_y + 6;
        let sentence = flow_sentence(&round.pieces(), left, sentence_top, content_width);
        let sentence_bottom = sentence
            .iter()
            .map(|p| p.area.bottom())
            .max()
            .unwrap_or(sentence_top);

        let tokens = flow_tokens(game, left, sentence_bottom + 2, content_width);

        let submit_w = SUBMIT_LABEL.width() as u16;
        let submit = Rect::new(
            right.saturating_sub(submit_w),
            area.bottom().saturating_sub(2),
            submit_w,
            1,
        );

        Self {
            timer,
            quit,
            progress,
            instruction,
            sentence,
            tokens,
            submit,
        }
    }

    /// Blank rects keyed by slot index, in slot order.
    pub fn blanks(&self) -> Vec<(usize, Rect)> {
        self.sentence
            .iter()
            .filter_map(|p| match p.item {
                SentenceItem::Blank(i) => Some((i, p.area)),
                SentenceItem::Text(_) => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct StartLayout {
    pub back: Rect,
    pub start: Rect,
}

impl StartLayout {
    pub fn compute(area: Rect) -> Self {
        let back_w = BACK_LABEL.width() as u16;
        let start_w = START_LABEL.width() as u16;
        let gap = 4;
        let total = back_w + gap + start_w;
        let x = area.x + area.width.saturating_sub(total) / 2;
        let y = area.y + area.height.saturating_sub(area.height / 4).saturating_sub(1);

        Self {
            back: Rect::new(x, y, back_w, 1),
            start: Rect::new(x + back_w + gap, y, start_w, 1),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResultsLayout {
    pub gauge: Rect,
    pub back: Rect,
}

impl ResultsLayout {
    pub fn compute(area: Rect) -> Self {
        let gauge_w = (area.width / 2).clamp(10, 40).min(area.width);
        let gauge = Rect::new(
            area.x + area.width.saturating_sub(gauge_w) / 2,
            area.y + area.height / 3,
            gauge_w,
            1,
        );

        let back_w = DASHBOARD_LABEL.width() as u16;
        let back = Rect::new(
            area.x + area.width.saturating_sub(back_w) / 2,
            area.bottom().saturating_sub(4),
            back_w,
            1,
        );

        Self { gauge, back }
    }
}

/// Wrap the sentence pieces into centered lines. Text pieces break at word
/// boundaries; blanks are atomic and `BLANK_WIDTH` wide.
fn flow_sentence(pieces: &[Piece], left: u16, top: u16, max_width: u16) -> Vec<PlacedItem> {
    let mut atoms: Vec<(SentenceItem, u16)> = Vec::new();
    for piece in pieces {
        match piece {
            Piece::Text(text) => {
                for word in text.split_whitespace() {
                    atoms.push((SentenceItem::Text(word.to_string()), word.width() as u16));
                }
            }
            Piece::Blank(i) => atoms.push((SentenceItem::Blank(*i), BLANK_WIDTH)),
        }
    }

    flow_centered(atoms, left, top, max_width, 1)
}

fn flow_tokens(game: &Game, left: u16, top: u16, max_width: u16) -> Vec<(String, Rect)> {
    let atoms: Vec<(SentenceItem, u16)> = game
        .pool
        .iter()
        .map(|w| (SentenceItem::Text(w.id.clone()), w.text.width() as u16 + 2))
        .collect();

    flow_centered(atoms, left, top, max_width, 2)
        .into_iter()
        .filter_map(|p| match p.item {
            SentenceItem::Text(id) => Some((id, p.area)),
            SentenceItem::Blank(_) => None,
        })
        .collect()
}

/// Greedy line filling with `gap` columns between atoms, each finished line
/// centered within `max_width`. Lines are double-spaced.
fn flow_centered(
    atoms: Vec<(SentenceItem, u16)>,
    left: u16,
    top: u16,
    max_width: u16,
    gap: u16,
) -> Vec<PlacedItem> {
    let max_width = max_width.max(BLANK_WIDTH + 1);
    let mut placed = Vec::new();
    let mut line: Vec<(SentenceItem, u16)> = Vec::new();
    let mut line_width: u16 = 0;
    let mut y = top;

    fn commit(
        placed: &mut Vec<PlacedItem>,
        line: &mut Vec<(SentenceItem, u16)>,
        line_width: u16,
        left: u16,
        max_width: u16,
        gap: u16,
        y: u16,
    ) {
        let mut x = left + max_width.saturating_sub(line_width) / 2;
        for (item, width) in line.drain(..) {
            placed.push(PlacedItem {
                item,
                area: Rect::new(x, y, width, 1),
            });
            x += width + gap;
        }
    }

    for (item, width) in atoms {
        let needed = if line.is_empty() {
            width
        } else {
            line_width + gap + width
        };
        if !line.is_empty() && needed > max_width {
            commit(&mut placed, &mut line, line_width, left, max_width, gap, y);
            y += 2;
            line_width = width;
        } else {
            line_width = needed;
        }
        line.push((item, width));
    }
    if !line.is_empty() {
        commit(&mut placed, &mut line, line_width, left, max_width, gap, y);
    }

    placed
}

/// Bounds-checked cell write; layout rects can fall off a tiny terminal.
fn put(buf: &mut Buffer, area: Rect, x: u16, y: u16, text: &str, style: Style) {
    if y >= area.bottom() || x >= area.right() {
        return;
    }
    let max = (area.right() - x) as usize;
    buf.set_stringn(x, y, text, max, style);
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Start => render_start(self, area, buf),
            AppState::Playing => render_playing(self, area, buf),
            AppState::Results => render_results(self, area, buf),
        }
    }
}

fn render_start(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    let title_y = area.y + area.height / 4;
    let title = Paragraph::new(Span::styled("Sentence Construction", bold_style))
        .alignment(Alignment::Center);
    title.render(Rect::new(area.x, title_y, area.width, 1), buf);

    let blurb = Paragraph::new(
        "Select the correct words to complete the sentence by arranging the provided options in the right order.",
    )
    .alignment(Alignment::Center)
    .style(dim_style)
    .wrap(Wrap { trim: true });
    blurb.render(
        Rect::new(
            area.x + HORIZONTAL_MARGIN,
            title_y + 2,
            area.width.saturating_sub(HORIZONTAL_MARGIN * 2),
            2,
        ),
        buf,
    );

    let facts = format!(
        "{}   |   Time Per Question: {} sec   |   Blanks: {}   |   Words: {}",
        app.round.title,
        app.game.session_config.total_secs,
        app.game.answer_key.len(),
        app.round.words.len(),
    );
    let facts = Paragraph::new(facts).alignment(Alignment::Center);
    facts.render(Rect::new(area.x, title_y + 5, area.width, 1), buf);

    let layout = StartLayout::compute(area);
    put(buf, area, layout.back.x, layout.back.y, BACK_LABEL, dim_style);
    put(
        buf,
        area,
        layout.start.x,
        layout.start.y,
        START_LABEL,
        bold_style.fg(Color::Green),
    );

    let hint = Paragraph::new("(enter) start  (esc) quit")
        .alignment(Alignment::Center)
        .style(dim_style.add_modifier(Modifier::ITALIC));
    hint.render(
        Rect::new(area.x, area.bottom().saturating_sub(2), area.width, 1),
        buf,
    );
}

fn render_playing(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let dim_bold_style = bold_style.add_modifier(Modifier::DIM);

    let layout = PlayingLayout::compute(&app.game, &app.round, area);

    put(
        buf,
        area,
        layout.timer.x,
        layout.timer.y,
        &format!("{:>2}", app.game.seconds_remaining),
        dim_bold_style,
    );
    put(buf, area, layout.quit.x, layout.quit.y, QUIT_LABEL, dim_style);

    render_progress(app, &layout.progress, area, buf);

    let instruction = Paragraph::new("Select the missing words in the correct order")
        .alignment(Alignment::Center)
        .style(dim_style);
    instruction.render(layout.instruction, buf);

    for placed in &layout.sentence {
        match &placed.item {
            SentenceItem::Text(text) => {
                put(
                    buf,
                    area,
                    placed.area.x,
                    placed.area.y,
                    text,
                    Style::default(),
                );
            }
            SentenceItem::Blank(i) => render_blank(app, *i, placed.area, area, buf),
        }
    }

    for (id, rect) in &layout.tokens {
        if app.surface.active_id() == Some(id.as_str()) {
            // The picked-up token renders at the pointer instead.
            continue;
        }
        if let Some(word) = app.game.pool.iter().find(|w| &w.id == id) {
            put(
                buf,
                area,
                rect.x,
                rect.y,
                &format!(" {} ", word.text),
                bold_style.bg(Color::DarkGray),
            );
        }
    }

    let submit_style = if app.game.can_submit() {
        bold_style.fg(Color::Green)
    } else {
        dim_style
    };
    put(
        buf,
        area,
        layout.submit.x,
        layout.submit.y,
        SUBMIT_LABEL,
        submit_style,
    );

    render_drag_ghost(app, area, buf);
}

fn render_progress(app: &App, progress: &Rect, area: Rect, buf: &mut Buffer) {
    let segments = app.game.session_config.segments;
    if segments == 0 || progress.width == 0 {
        return;
    }
    // One column of gap between segments, remainder split evenly.
    let cell = (progress.width.saturating_sub(segments as u16 - 1) / segments as u16).max(1);

    for i in 0..segments {
        let x = progress.x + i as u16 * (cell + 1);
        let style = if app.game.segment_elapsed(i) {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        put(buf, area, x, progress.y, &"━".repeat(cell as usize), style);
    }
}

fn render_blank(app: &App, slot: usize, rect: Rect, area: Rect, buf: &mut Buffer) {
    let hovered = app.surface.is_over(&slot.to_string());
    let base = if hovered {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::UNDERLINED)
    };

    match app.game.blanks.get(slot).and_then(|b| b.as_ref()) {
        Some(word) => {
            let text = word.text.as_str();
            let pad = rect.width.saturating_sub(text.width() as u16) / 2;
            put(
                buf,
                area,
                rect.x,
                rect.y,
                &" ".repeat(rect.width as usize),
                base,
            );
            put(
                buf,
                area,
                rect.x + pad,
                rect.y,
                text,
                base.add_modifier(Modifier::BOLD),
            );
        }
        None => {
            put(
                buf,
                area,
                rect.x,
                rect.y,
                &"_".repeat(rect.width as usize),
                base.add_modifier(Modifier::DIM),
            );
        }
    }
}

fn render_drag_ghost(app: &App, area: Rect, buf: &mut Buffer) {
    let (Some(id), Some(pos)) = (app.surface.active_id(), app.surface.drag_position()) else {
        return;
    };
    let Some(word) = app
        .game
        .pool
        .iter()
        .chain(app.game.blanks.iter().flatten())
        .find(|w| w.id == id)
    else {
        return;
    };

    let text = format!(" {} ", word.text);
    let x = pos.x.min(area.right().saturating_sub(text.width() as u16));
    put(
        buf,
        area,
        x,
        pos.y,
        &text,
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    );
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    let layout = ResultsLayout::compute(area);
    let score = app.game.score.unwrap_or(0.0);

    let gauge = Gauge::default()
        .ratio((score / 100.0).clamp(0.0, 1.0))
        .label(Span::styled(format!("{:.0}%", score), bold_style))
        .gauge_style(Style::default().fg(Color::Green).bg(Color::DarkGray));
    gauge.render(layout.gauge, buf);

    let feedback = if score >= 100.0 {
        "Every word found its place. Nicely done."
    } else if score >= 50.0 {
        "You formed most of the sentence correctly, but a couple of placements need attention."
    } else {
        "Pay close attention to sentence structure and word placement to ensure clarity and correctness."
    };
    let feedback = Paragraph::new(feedback)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    feedback.render(
        Rect::new(
            area.x + HORIZONTAL_MARGIN,
            layout.gauge.y + 3,
            area.width.saturating_sub(HORIZONTAL_MARGIN * 2),
            3,
        ),
        buf,
    );

    put(
        buf,
        area,
        layout.back.x,
        layout.back.y,
        DASHBOARD_LABEL,
        bold_style.fg(Color::Green),
    );

    let hint = Paragraph::new("(esc) back")
        .alignment(Alignment::Center)
        .style(dim_style.add_modifier(Modifier::ITALIC));
    hint.render(
        Rect::new(area.x, area.bottom().saturating_sub(2), area.width, 1),
        buf,
    );
}

/// True when the pointer position falls inside the rect.
pub fn hit(rect: Rect, column: u16, row: u16) -> bool {
    rect.contains(Position::new(column, row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rounds::Round;
    use crate::session::SessionConfig;

    fn sample() -> (Game, Round) {
        let round = Round::builtin("project_discussion");
        let game = Game::new(
            round.words.clone(),
            round.answer_key.clone(),
            SessionConfig::default(),
        );
        (game, round)
    }

    #[test]
    fn playing_layout_places_every_blank_and_token() {
        let (game, round) = sample();
        let area = Rect::new(0, 0, 100, 30);

        let layout = PlayingLayout::compute(&game, &round, area);

        let blanks = layout.blanks();
        assert_eq!(blanks.len(), 4);
        for (i, (slot, rect)) in blanks.iter().enumerate() {
            assert_eq!(*slot, i);
            assert_eq!(rect.width, BLANK_WIDTH);
            assert!(rect.right() <= area.right());
        }

        assert_eq!(layout.tokens.len(), 4);
        for (id, rect) in &layout.tokens {
            assert!(game.pool.iter().any(|w| &w.id == id));
            assert!(rect.bottom() <= area.bottom());
        }
    }

    #[test]
    fn playing_layout_regions_do_not_overlap() {
        let (game, round) = sample();
        let area = Rect::new(0, 0, 100, 30);
        let layout = PlayingLayout::compute(&game, &round, area);

        let mut rects: Vec<Rect> = layout.blanks().into_iter().map(|(_, r)| r).collect();
        rects.extend(layout.tokens.iter().map(|(_, r)| *r));
        rects.push(layout.quit);
        rects.push(layout.submit);

        for (i, a) in rects.iter().enumerate() {
            for b in rects.iter().skip(i + 1) {
                assert!(a.intersection(*b).is_empty(), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn narrow_area_wraps_to_more_lines() {
        let (game, round) = sample();
        let wide = PlayingLayout::compute(&game, &round, Rect::new(0, 0, 120, 40));
        let narrow = PlayingLayout::compute(&game, &round, Rect::new(0, 0, 50, 40));

        let lines = |layout: &PlayingLayout| {
            let mut ys: Vec<u16> = layout.sentence.iter().map(|p| p.area.y).collect();
            ys.sort_unstable();
            ys.dedup();
            ys.len()
        };

        assert!(lines(&narrow) > lines(&wide));
    }

    #[test]
    fn flow_centered_keeps_atoms_in_order() {
        let atoms = vec![
            (SentenceItem::Text("one".into()), 3),
            (SentenceItem::Blank(0), BLANK_WIDTH),
            (SentenceItem::Text("two".into()), 3),
        ];

        let placed = flow_centered(atoms, 0, 0, 80, 1);

        assert_eq!(placed.len(), 3);
        assert_eq!(placed[0].item, SentenceItem::Text("one".into()));
        assert_eq!(placed[1].item, SentenceItem::Blank(0));
        assert!(placed[0].area.x < placed[1].area.x);
        assert!(placed[1].area.x < placed[2].area.x);
    }

    #[test]
    fn start_layout_buttons_sit_side_by_side() {
        let layout = StartLayout::compute(Rect::new(0, 0, 80, 24));

        assert_eq!(layout.back.y, layout.start.y);
        assert!(layout.back.right() < layout.start.x);
    }

    #[test]
    fn results_layout_fits_small_areas() {
        let area = Rect::new(0, 0, 20, 8);
        let layout = ResultsLayout::compute(area);

        assert!(layout.gauge.right() <= area.right());
        assert!(layout.back.y < area.bottom());
    }

    #[test]
    fn hit_matches_rect_bounds() {
        let rect = Rect::new(10, 5, 8, 1);

        assert!(hit(rect, 10, 5));
        assert!(hit(rect, 17, 5));
        assert!(!hit(rect, 18, 5));
        assert!(!hit(rect, 10, 6));
    }
}
