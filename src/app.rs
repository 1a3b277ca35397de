use crate::actions::Game;
use crate::config::{load_settings, persist_settings, Paths, Settings, SettingsOrigin};
use crate::input::{collect_input_nonblocking, map_event_to_intent, Intent, Scene};
use crate::random::RandomScheduler;
use crate::render::{draw_frame, BoardLayout, Palette, Terminal};
use crate::store::SubscriptionId;
use log::{debug, info};
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

pub(crate) struct App {
    settings: Settings,
    settings_origin: SettingsOrigin,
    paths: Paths,
    game: Game<RandomScheduler>,
    term: Terminal,
    layout: BoardLayout,
    palette: Palette,
    scene: Scene,
    epoch: Instant,
    dirty: Rc<Cell<bool>>,
    repaint_all: bool,
    redraw_sub: SubscriptionId,
    shown_secs: Option<u64>,
    should_quit: bool,
}

impl App {
    fn init(paths: Paths) -> anyhow::Result<Self> {
        let (settings, settings_origin) = load_settings(&paths.settings_path);
        let picker = match settings.seed {
            Some(seed) => RandomScheduler::seeded(seed),
            None => RandomScheduler::from_entropy(),
        };
        let mut game = Game::new(settings.rules(), picker);

        // store changes mark the frame for redraw
        let dirty = Rc::new(Cell::new(true));
        let flag = Rc::clone(&dirty);
        let redraw_sub = game.store_mut().subscribe(move |_| flag.set(true));

        let term = Terminal::begin()?;
        let layout = BoardLayout::fit(term.cols, term.rows, game.hole_count());
        info!(
            "started with {} holes, {}s rounds, seed {:?}",
            settings.hole_count, settings.round_secs, settings.seed
        );

        Ok(Self {
            palette: Palette::new(settings.enable_color),
            settings,
            settings_origin,
            paths,
            game,
            term,
            layout,
            scene: Scene::Board,
            epoch: Instant::now(),
            dirty,
            repaint_all: true,
            redraw_sub,
            shown_secs: None,
            should_quit: false,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let frame_dt = Duration::from_secs_f32(1.0 / self.settings.fps_cap as f32);

        while !self.should_quit {
            let frame_start = Instant::now();

            if self.term.resize_if_needed()? {
                self.layout = BoardLayout::fit(self.term.cols, self.term.rows, self.game.hole_count());
                // the screen was cleared, so unchanged cells must be sent again
                self.repaint_all = true;
                self.dirty.set(true);
            }

            // input
            for ev in collect_input_nonblocking(frame_dt)? {
                if let Some(intent) = map_event_to_intent(self.scene, ev) {
                    self.handle(intent);
                }
                if self.should_quit {
                    break;
                }
            }

            // timers
            self.game.advance(self.epoch.elapsed());

            // render
            let time_left = self.game.time_left(self.epoch.elapsed());
            let secs = time_left.map(|d| d.as_secs());
            if self.dirty.get() || secs != self.shown_secs {
                draw_frame(
                    &mut self.term.cur,
                    &self.layout,
                    &self.game.state(),
                    self.scene,
                    time_left,
                    &self.palette,
                );
                self.term.present(!self.repaint_all)?;
                self.repaint_all = false;
                self.dirty.set(false);
                self.shown_secs = secs;
            }

            // frame cap
            spin_sleep(frame_dt, frame_start);
        }

        Ok(())
    }

    fn handle(&mut self, intent: Intent) {
        let now = self.epoch.elapsed();
        match intent {
            Intent::Start => self.game.request_start(now),
            Intent::Whack(hole) => self.whack(hole, now),
            Intent::ClickAt { col, row } => {
                if let Some(hole) = self.layout.hole_at(col, row) {
                    self.whack(hole, now);
                }
            }
            Intent::AboutToggle => {
                self.scene = match self.scene {
                    Scene::About => Scene::Board,
                    Scene::Board => Scene::About,
                };
                self.dirty.set(true);
            }
            Intent::Back => {
                self.scene = Scene::Board;
                self.dirty.set(true);
            }
            Intent::Quit => self.should_quit = true,
        }
    }

    /// Only a visible frog can be whacked; a miss on an empty hole is ignored.
    fn whack(&mut self, hole: usize, now: Duration) {
        let st = self.game.state();
        if hole < st.hole_count() && !st.is_active(hole) {
            return;
        }
        if let Err(e) = self.game.request_frog_click(hole, now) {
            debug!("ignored whack: {}", e);
        }
    }

    fn shutdown(&mut self) -> anyhow::Result<()> {
        debug!("cancelling {} pending timers", self.game.pending_timers());
        self.game.shutdown();
        self.game.store_mut().unsubscribe(self.redraw_sub);
        let ended = self.term.end();
        // settings are saved even if the terminal could not be restored
        let saved = persist_settings(&self.paths.settings_path, &self.settings, self.settings_origin);
        info!("shut down, final score {}", self.game.state().score);
        ended.and(saved.map(|_| ()))
    }
}

pub(crate) fn run(paths: Paths) -> anyhow::Result<()> {
    let mut app = App::init(paths)?;
    let result = app.run();
    // restore the terminal even when the loop failed
    let closed = app.shutdown();
    result.and(closed)
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, start: Instant) {
    let end = start + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
