use crate::input::Scene;
use crate::model::{GameState, Phase};
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};
use std::time::Duration;

const HOLE_W: u16 = 9;
const HOLE_H: u16 = 4;
const HOLE_GAP: u16 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
    pub(crate) bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
            bold: false,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub(crate) fn clear(&mut self, bg: Color) {
        for c in &mut self.cells {
            *c = Cell { bg, ..Cell::default() };
        }
    }
}

/// Colours used for the board. Collapses to plain white-on-black when colour is off.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Palette {
    pub(crate) text: Color,
    pub(crate) accent: Color,
    pub(crate) frog: Color,
    pub(crate) dirt: Color,
    pub(crate) warn: Color,
    pub(crate) bg: Color,
}

impl Palette {
    pub(crate) fn new(enable_color: bool) -> Self {
        if !enable_color {
            return Self {
                text: Color::White,
                accent: Color::White,
                frog: Color::White,
                dirt: Color::White,
                warn: Color::White,
                bg: Color::Black,
            };
        }
        Self {
            text: Color::Rgb {
                r: 220,
                g: 230,
                b: 220,
            },
            accent: Color::Rgb {
                r: 160,
                g: 255,
                b: 210,
            },
            frog: Color::Rgb {
                r: 120,
                g: 230,
                b: 90,
            },
            dirt: Color::Rgb {
                r: 150,
                g: 105,
                b: 60,
            },
            warn: Color::Rgb {
                r: 255,
                g: 120,
                b: 90,
            },
            bg: Color::Black,
        }
    }
}

/// Where each hole sits on screen for a given terminal size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BoardLayout {
    pub(crate) holes: Vec<(u16, u16)>,
    pub(crate) top: u16,
}

impl BoardLayout {
    pub(crate) fn fit(cols: u16, rows: u16, hole_count: usize) -> Self {
        let n = hole_count as u16;
        let total_w = n * HOLE_W + n.saturating_sub(1) * HOLE_GAP;
        let x0 = cols.saturating_sub(total_w) / 2;
        let top = (rows / 2).saturating_sub(HOLE_H / 2);
        let holes = (0..n).map(|i| (x0 + i * (HOLE_W + HOLE_GAP), top)).collect();
        Self { holes, top }
    }

    pub(crate) fn hole_at(&self, col: u16, row: u16) -> Option<usize> {
        self.holes.iter().position(|&(x, y)| {
            col >= x && col < x + HOLE_W && row >= y && row < y + HOLE_H
        })
    }
}

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w {
            break;
        }
        buf.set(
            xx,
            y,
            Cell {
                ch,
                fg,
                bg,
                bold: false,
            },
        );
    }
}

fn draw_centered(buf: &mut CellBuffer, y: u16, s: &str, fg: Color, bg: Color) {
    let len = s.chars().count() as u16;
    let x = buf.w.saturating_sub(len) / 2;
    draw_text(buf, x, y, s, fg, bg);
}

fn draw_hole(buf: &mut CellBuffer, x: u16, y: u16, number: usize, up: bool, pal: &Palette) {
    if up {
        draw_text(buf, x + 2, y, "@...@", pal.frog, pal.bg);
        draw_text(buf, x + 1, y + 1, "( >-< )", pal.frog, pal.bg);
    }
    draw_text(buf, x, y + 2, "\\_______/", pal.dirt, pal.bg);
    draw_text(buf, x + 3, y + 3, &format!("[{}]", number), pal.text, pal.bg);
}

pub(crate) fn draw_board(
    buf: &mut CellBuffer,
    layout: &BoardLayout,
    st: &GameState,
    time_left: Option<Duration>,
    pal: &Palette,
) {
    draw_centered(buf, 0, "WHACK-A-FROG", pal.accent, pal.bg);
    for x in 0..buf.w {
        let i = buf.idx(x, 0);
        if let Some(c) = buf.cells.get_mut(i) {
            c.bold = c.ch != ' ';
        }
    }

    let status_y = layout.top.saturating_sub(3);
    let status = match st.phase {
        Phase::NotStarted => "Press S to start".to_string(),
        Phase::InProgress => format!(
            "Whack a frog!   {}s left",
            time_left.map(|d| d.as_secs() + u64::from(d.subsec_nanos() > 0)).unwrap_or(0)
        ),
        Phase::Over => "GAME OVER   press S to play again".to_string(),
    };
    let status_fg = if st.phase == Phase::Over { pal.warn } else { pal.text };
    draw_centered(buf, status_y, &status, status_fg, pal.bg);

    for (i, &(x, y)) in layout.holes.iter().enumerate() {
        draw_hole(buf, x, y, i + 1, st.is_active(i), pal);
    }

    let score_y = layout.top + HOLE_H + 1;
    draw_centered(buf, score_y, &format!("Score: {}", st.score), pal.accent, pal.bg);

    let footer = format!(
        "S start | 1-{} or click whack | H about | Q quit",
        layout.holes.len()
    );
    draw_centered(buf, buf.h.saturating_sub(1), &footer, pal.text, pal.bg);
}

pub(crate) fn draw_center_box(buf: &mut CellBuffer, title: &str, body: &str, pal: &Palette) {
    let w = buf.w;
    let h = buf.h;

    let bw = 60u16.min(w.saturating_sub(4));
    let bh = 12u16.min(h.saturating_sub(4));
    if bw < 3 || bh < 3 {
        return;
    }
    let x0 = (w - bw) / 2;
    let y0 = (h - bh) / 2;

    let edge = |ch| Cell {
        ch,
        fg: pal.text,
        bg: pal.bg,
        bold: false,
    };
    for y in y0..y0 + bh {
        for x in x0..x0 + bw {
            buf.set(x, y, edge(' '));
        }
    }
    for x in x0..x0 + bw {
        buf.set(x, y0, edge('─'));
        buf.set(x, y0 + bh - 1, edge('─'));
    }
    for y in y0..y0 + bh {
        buf.set(x0, y, edge('│'));
        buf.set(x0 + bw - 1, y, edge('│'));
    }
    buf.set(x0, y0, edge('┌'));
    buf.set(x0 + bw - 1, y0, edge('┐'));
    buf.set(x0, y0 + bh - 1, edge('└'));
    buf.set(x0 + bw - 1, y0 + bh - 1, edge('┘'));

    draw_text(buf, x0 + 2, y0 + 1, title, pal.accent, pal.bg);

    let mut yy = y0 + 3;
    for line in body.lines() {
        if yy >= y0 + bh - 1 {
            break;
        }
        let max = (bw - 4) as usize;
        let clipped: String = line.chars().take(max).collect();
        draw_text(buf, x0 + 2, yy, &clipped, pal.text, pal.bg);
        yy += 1;
    }
}

pub(crate) fn draw_frame(
    buf: &mut CellBuffer,
    layout: &BoardLayout,
    st: &GameState,
    scene: Scene,
    time_left: Option<Duration>,
    pal: &Palette,
) {
    buf.clear(pal.bg);
    draw_board(buf, layout, st, time_left, pal);

    if scene == Scene::About {
        draw_center_box(
            buf,
            "About",
            "Frogs pop up out of the holes. Whack as many as you\n\
             can before the round runs out.\n\n\
             Each whacked frog scores a point and another one\n\
             pops up somewhere else shortly after.\n\n\
             Esc or H to close.",
            pal,
        );
    }
}

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        let setup = execute!(
            out,
            EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )
        .and_then(|_| terminal::size());
        let (cols, rows) = match setup {
            Ok(size) => size,
            Err(e) => {
                // no Terminal exists yet, so end() will never run for us
                let _ = execute!(
                    out,
                    DisableMouseCapture,
                    cursor::Show,
                    EnableLineWrap,
                    LeaveAlternateScreen
                );
                let _ = terminal::disable_raw_mode();
                return Err(e.into());
            }
        };

        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            DisableMouseCapture,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        queue!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    pub(crate) fn present(&mut self, diff_only: bool) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;
        let mut last_bold = false;

        for i in cells_to_paint(&self.prev, &self.cur, diff_only) {
            let c = self.cur.cells[i];
            let x = (i % self.cur.w as usize) as u16;
            let y = (i / self.cur.w as usize) as u16;

            queue!(self.out, cursor::MoveTo(x, y))?;

            if last_fg != Some(c.fg) {
                queue!(self.out, SetForegroundColor(c.fg))?;
                last_fg = Some(c.fg);
            }
            if last_bg != Some(c.bg) {
                queue!(self.out, SetBackgroundColor(c.bg))?;
                last_bg = Some(c.bg);
            }
            if last_bold != c.bold {
                let attr = if c.bold {
                    Attribute::Bold
                } else {
                    Attribute::NormalIntensity
                };
                queue!(self.out, SetAttribute(attr))?;
                last_bold = c.bold;
            }

            queue!(self.out, Print(c.ch))?;
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/// Indices of the cells `present` has to emit: all of them on a full repaint,
/// otherwise only the ones that changed since the last frame.
fn cells_to_paint(prev: &CellBuffer, cur: &CellBuffer, diff_only: bool) -> Vec<usize> {
    (0..cur.cells.len())
        .filter(|&i| !diff_only || prev.cells.get(i) != Some(&cur.cells[i]))
        .collect()
}
