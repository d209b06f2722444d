use crate::config::Config;
use crate::gfx::canvas::Canvas;
use crate::gfx::math::{Color, Vec2};
use crate::style;
use crate::widgets::goal_bar::{GoalIndicatorBar, VisualConfig};
use crate::widgets::saved_state::Parcel;
use crate::widgets::{MeasureSpec, Size, Widget};
use log::{debug, info, warn};
use rand::Rng;

pub const BTN_LEFT: u32 = 0x110;
pub const BTN_RIGHT: u32 = 0x111;

/// Goal change per scroll step.
const GOAL_STEP: i32 = 5;

#[derive(Debug, Clone)]
pub enum UiEvent {
    PointerDown { pos: Vec2, button: u32 },
    Scroll { delta: f32 },
}

/// Host screen: one goal bar whose progress is re-rolled on click.
pub struct App<R: Rng> {
    pub config: Config,
    pub bar: GoalIndicatorBar,
    pub background: Color,
    /// Frame clock in seconds since start.
    pub time: f64,
    /// Size offered by the compositor; zero means "pick your own".
    pub offered_size: [u32; 2],
    size: Size,
    rng: R,
}

impl<R: Rng> App<R> {
    pub fn new(config: Config, rng: R) -> Self {
        let visual = style::with_attributes("goal_bar", &config.goal_bar, VisualConfig::from_attributes)
            .unwrap_or_else(|e| {
                warn!("Invalid goal_bar style, using defaults: {:#}", e);
                VisualConfig::default()
            });
        let background = Color::parse(&config.window.background).unwrap_or_else(|e| {
            warn!("Invalid background color, using transparent: {:#}", e);
            Color::TRANSPARENT
        });

        Self {
            bar: GoalIndicatorBar::new(visual),
            background,
            time: 0.0,
            offered_size: [0, 0],
            size: Size::default(),
            config,
            rng,
        }
    }

    /// Restores the previous session, or starts a fresh one at the configured goal.
    pub fn start(&mut self, saved: Option<Parcel>) {
        match saved {
            Some(parcel) => {
                self.bar.restore_state(parcel);
                info!(
                    "Restored session: progress={} goal={}",
                    self.bar.progress(),
                    self.bar.goal()
                );
            }
            None => {
                self.bar.set_goal(self.config.initial_goal);
                self.reset_progress();
            }
        }
    }

    /// Rolls a new random progress value in `0..100`.
    pub fn reset_progress(&mut self) {
        let progress = self.rng.gen_range(0..100);
        info!("New progress: {}", progress);
        self.bar
            .set_progress_animated(progress, self.config.animations_enabled);
    }

    pub fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::PointerDown { pos, button } => match button {
                BTN_LEFT => {
                    debug!("Click at ({}, {})", pos.x, pos.y);
                    self.reset_progress();
                }
                BTN_RIGHT => {
                    let next = self.bar.config().indicator_type.next();
                    info!("Indicator type: {:?}", next);
                    self.bar.set_indicator_type(next);
                }
                _ => {}
            },
            UiEvent::Scroll { delta } => {
                let goal = if delta > 0.0 {
                    self.bar.goal() + GOAL_STEP
                } else if delta < 0.0 {
                    self.bar.goal() - GOAL_STEP
                } else {
                    return;
                };
                info!("Goal: {}", goal);
                self.bar.set_goal(goal);
            }
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.time += f64::from(dt);
        self.bar.tick(self.time);
    }

    /// Measures the bar against the compositor offer and returns the size to apply
    /// to the surface. The bar may measure itself to zero; the surface never does.
    pub fn layout(&mut self) -> Size {
        let [offered_w, offered_h] = self.offered_size;
        let width = if offered_w > 0 {
            MeasureSpec::Exactly(offered_w)
        } else {
            MeasureSpec::Exactly(self.config.window.width)
        };
        let height = if offered_h > 0 {
            MeasureSpec::Exactly(offered_h)
        } else {
            MeasureSpec::AtMost(self.config.window.height)
        };

        let measured = self.bar.measure(width, height);
        let size = Size::new(measured.width.max(1), measured.height.max(1));
        if size != self.size {
            info!(
                "Measured {} at {}x{}, surface {}x{}",
                self.bar.name(),
                measured.width,
                measured.height,
                size.width,
                size.height
            );
            self.size = size;
        }
        size
    }

    pub fn needs_redraw(&mut self) -> bool {
        self.bar.take_redraw_request()
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        self.bar.render(canvas, self.size);
    }

    pub fn capture_state(&self) -> Parcel {
        self.bar.capture_state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::canvas::DrawList;
    use crate::widgets::goal_bar::IndicatorType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn app(config: Config) -> App<StdRng> {
        App::new(config, StdRng::seed_from_u64(7))
    }

    fn click(button: u32) -> UiEvent {
        UiEvent::PointerDown {
            pos: Vec2::new(1.0, 1.0),
            button,
        }
    }

    #[test]
    fn fresh_start_uses_initial_goal_and_animates() {
        let mut app = app(Config::default());
        app.start(None);
        assert_eq!(app.bar.goal(), 50);
        assert_eq!(app.bar.progress(), 0);
        assert!(app.bar.is_animating());
    }

    #[test]
    fn clicks_follow_the_injected_rng() {
        let mut expected = StdRng::seed_from_u64(7);
        let mut app = app(Config {
            animations_enabled: false,
            ..Config::default()
        });
        app.start(None);
        assert_eq!(app.bar.progress(), expected.gen_range(0..100));

        for _ in 0..5 {
            app.handle_event(click(BTN_LEFT));
            let value = app.bar.progress();
            assert_eq!(value, expected.gen_range(0..100));
            assert!((0..100).contains(&value));
        }
    }

    #[test]
    fn animation_settles_after_updates() {
        let mut app = app(Config::default());
        app.start(None);
        assert_eq!(app.bar.progress(), 0);
        for _ in 0..60 {
            app.update(1.0 / 60.0);
        }
        app.update(0.5);
        assert!(!app.bar.is_animating());
        assert!(app.bar.progress() < 100);
    }

    #[test]
    fn right_click_cycles_indicator_and_scroll_moves_goal() {
        let mut app = app(Config::default());
        app.start(None);
        app.handle_event(click(BTN_RIGHT));
        assert_eq!(app.bar.config().indicator_type, IndicatorType::Circle);
        app.handle_event(click(BTN_RIGHT));
        app.handle_event(click(BTN_RIGHT));
        assert_eq!(app.bar.config().indicator_type, IndicatorType::Line);

        app.handle_event(UiEvent::Scroll { delta: 1.0 });
        app.handle_event(UiEvent::Scroll { delta: 1.0 });
        app.handle_event(UiEvent::Scroll { delta: -1.0 });
        assert_eq!(app.bar.goal(), 55);
    }

    #[test]
    fn layout_negotiates_with_the_compositor() {
        let mut app = app(Config::default());
        assert_eq!(app.layout(), Size::new(320, 10));

        app.offered_size = [500, 0];
        assert_eq!(app.layout(), Size::new(500, 10));

        app.offered_size = [500, 32];
        assert_eq!(app.layout(), Size::new(500, 32));
        assert_eq!(app.bar.measured_size(), Size::new(500, 32));
    }

    #[test]
    fn zero_height_bar_still_gets_a_surface() {
        let mut config = Config::default();
        config
            .goal_bar
            .insert("goal_indicator_height".into(), toml::Value::Integer(0));
        let mut app = app(config);
        assert_eq!(app.layout(), Size::new(320, 1));
        assert_eq!(app.bar.measured_size(), Size::new(320, 0));

        app.config.window.width = 0;
        app.config.window.height = 0;
        assert_eq!(app.layout(), Size::new(1, 1));
    }

    #[test]
    fn animation_completes_after_a_long_uptime() {
        let mut app = app(Config::default());
        app.time = 524_288.0;
        app.bar.set_progress(80);
        for _ in 0..600 {
            app.update(1.0 / 60.0);
        }
        assert_eq!(app.bar.progress(), 80);
        assert!(!app.bar.is_animating());
    }

    #[test]
    fn bad_style_falls_back_to_defaults() {
        let mut config = Config::default();
        config
            .goal_bar
            .insert("goal_reached_color".into(), toml::Value::String("nope".into()));
        config.window.background = "#zz".into();
        let app = app(config);
        assert_eq!(*app.bar.config(), VisualConfig::default());
        assert_eq!(app.background, Color::TRANSPARENT);
    }

    #[test]
    fn session_state_carries_over() {
        let mut first = app(Config {
            animations_enabled: false,
            ..Config::default()
        });
        first.start(None);
        first.handle_event(UiEvent::Scroll { delta: -1.0 });
        let parcel = first.capture_state();

        let mut second = app(Config::default());
        second.start(Some(parcel));
        assert_eq!(second.bar.progress(), first.bar.progress());
        assert_eq!(second.bar.goal(), 45);
        assert!(!second.bar.is_animating());
    }

    #[test]
    fn renders_three_ops_after_layout() {
        let mut app = app(Config::default());
        app.start(None);
        app.layout();
        assert!(app.needs_redraw());
        assert!(!app.needs_redraw());

        let mut list = DrawList::new();
        app.render(&mut list);
        assert_eq!(list.ops.len(), 3);
    }
}
