use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Scene {
    Board,
    About,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum InputEvent {
    Key { key: KeyCode, mods: KeyModifiers },
    Click { col: u16, row: u16 },
}

/// What the player asked for, before the app resolves it against the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Intent {
    Start,
    Whack(usize),
    ClickAt { col: u16, row: u16 },
    AboutToggle,
    Back,
    Quit,
}

pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        match event::read()? {
            Event::Key(k) if k.kind == KeyEventKind::Press => {
                out.push(InputEvent::Key {
                    key: k.code,
                    mods: k.modifiers,
                });
            }
            Event::Mouse(m) if m.kind == MouseEventKind::Down(MouseButton::Left) => {
                out.push(InputEvent::Click {
                    col: m.column,
                    row: m.row,
                });
            }
            _ => {}
        }
        if out.len() >= 32 {
            break;
        }
    }
    Ok(out)
}

pub(crate) fn map_event_to_intent(scene: Scene, ev: InputEvent) -> Option<Intent> {
    let (key, mods) = match ev {
        InputEvent::Click { col, row } => {
            return match scene {
                Scene::Board => Some(Intent::ClickAt { col, row }),
                Scene::About => Some(Intent::Back),
            };
        }
        InputEvent::Key { key, mods } => (key, mods),
    };

    // Global
    if key == KeyCode::Char('c') && mods.contains(KeyModifiers::CONTROL) {
        return Some(Intent::Quit);
    }
    match key {
        KeyCode::Char('q') | KeyCode::Char('Q') => return Some(Intent::Quit),
        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
            return Some(Intent::AboutToggle)
        }
        _ => {}
    }

    match scene {
        Scene::About => match key {
            KeyCode::Esc | KeyCode::Enter => Some(Intent::Back),
            _ => None,
        },
        Scene::Board => match key {
            KeyCode::Esc => Some(Intent::Quit),
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Enter | KeyCode::Char(' ') => {
                Some(Intent::Start)
            }
            // holes are numbered from 1 on screen
            KeyCode::Char(ch @ '1'..='9') => ch
                .to_digit(10)
                .map(|d| Intent::Whack(d as usize - 1)),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key {
            key: code,
            mods: KeyModifiers::NONE,
        }
    }

    #[test]
    fn digits_whack_zero_based_holes() {
        assert_eq!(
            map_event_to_intent(Scene::Board, key(KeyCode::Char('1'))),
            Some(Intent::Whack(0))
        );
        assert_eq!(
            map_event_to_intent(Scene::Board, key(KeyCode::Char('9'))),
            Some(Intent::Whack(8))
        );
        assert_eq!(map_event_to_intent(Scene::Board, key(KeyCode::Char('0'))), None);
    }

    #[test]
    fn start_keys() {
        for code in [KeyCode::Char('s'), KeyCode::Enter, KeyCode::Char(' ')] {
            assert_eq!(map_event_to_intent(Scene::Board, key(code)), Some(Intent::Start));
        }
    }

    #[test]
    fn esc_closes_about_before_quitting() {
        assert_eq!(map_event_to_intent(Scene::About, key(KeyCode::Esc)), Some(Intent::Back));
        assert_eq!(map_event_to_intent(Scene::Board, key(KeyCode::Esc)), Some(Intent::Quit));
    }

    #[test]
    fn about_swallows_game_keys() {
        assert_eq!(map_event_to_intent(Scene::About, key(KeyCode::Char('3'))), None);
        assert_eq!(map_event_to_intent(Scene::About, key(KeyCode::Char('s'))), None);
    }

    #[test]
    fn ctrl_c_quits_anywhere() {
        let ev = InputEvent::Key {
            key: KeyCode::Char('c'),
            mods: KeyModifiers::CONTROL,
        };
        assert_eq!(map_event_to_intent(Scene::About, ev), Some(Intent::Quit));
    }

    #[test]
    fn clicks_pass_through_on_board() {
        let ev = InputEvent::Click { col: 12, row: 7 };
        assert_eq!(
            map_event_to_intent(Scene::Board, ev.clone()),
            Some(Intent::ClickAt { col: 12, row: 7 })
        );
        assert_eq!(map_event_to_intent(Scene::About, ev), Some(Intent::Back));
    }
}
