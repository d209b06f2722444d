use super::animator::ProgressAnimation;
use super::saved_state::{BarSnapshot, BaseView, Parcel, ViewPersistence};
use super::{MeasureSpec, Size, Widget};
use crate::gfx::canvas::{Canvas, Paint};
use crate::gfx::math::{Color, Rect, Vec2};
use crate::style::StyledAttributes;
use anyhow::{anyhow, Result};
use log::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorType {
    #[default]
    Line,
    Circle,
    Square,
}

impl IndicatorType {
    pub const ALL: [IndicatorType; 3] = [IndicatorType::Line, IndicatorType::Circle, IndicatorType::Square];

    pub fn from_index(index: i64) -> Result<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or_else(|| anyhow!("Indicator type index out of range: {}", index))
    }

    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "line" => Ok(IndicatorType::Line),
            "circle" => Ok(IndicatorType::Circle),
            "square" => Ok(IndicatorType::Square),
            _ => Err(anyhow!("Unknown indicator type: {}", name)),
        }
    }

    pub fn next(self) -> Self {
        match self {
            IndicatorType::Line => IndicatorType::Circle,
            IndicatorType::Circle => IndicatorType::Square,
            IndicatorType::Square => IndicatorType::Line,
        }
    }
}

/// Appearance of a [`GoalIndicatorBar`].
#[derive(Debug, Clone, PartialEq)]
pub struct VisualConfig {
    pub goal_indicator_height: f32,
    pub goal_indicator_thickness: f32,
    pub goal_reached_color: Color,
    pub goal_not_reached_color: Color,
    pub unfilled_section_color: Color,
    pub bar_thickness: i32,
    pub indicator_type: IndicatorType,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            goal_indicator_height: 10.0,
            goal_indicator_thickness: 5.0,
            goal_reached_color: Color::BLUE,
            goal_not_reached_color: Color::BLACK,
            unfilled_section_color: Color::RED,
            bar_thickness: 4,
            indicator_type: IndicatorType::Line,
        }
    }
}

impl VisualConfig {
    /// Reads every bar option from a styled attribute set, defaulting the missing ones.
    pub fn from_attributes(attrs: &StyledAttributes<'_>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            goal_indicator_height: attrs
                .dimension("goal_indicator_height", defaults.goal_indicator_height)?,
            goal_indicator_thickness: attrs
                .dimension("goal_indicator_thickness", defaults.goal_indicator_thickness)?,
            goal_reached_color: attrs.color("goal_reached_color", defaults.goal_reached_color)?,
            goal_not_reached_color: attrs
                .color("goal_not_reached_color", defaults.goal_not_reached_color)?,
            unfilled_section_color: attrs
                .color("unfilled_section_color", defaults.unfilled_section_color)?,
            bar_thickness: attrs.dimension_offset("bar_thickness", defaults.bar_thickness)?,
            indicator_type: attrs.indicator_type("indicator_type", defaults.indicator_type)?,
        })
    }
}

/// Horizontal progress bar with a marker at the goal position.
///
/// Progress and goal are percentages of the drawable width and are never
/// clamped; values outside `0..=100` simply draw past the bar ends.
pub struct GoalIndicatorBar<P: ViewPersistence = BaseView> {
    progress: i32,
    goal: i32,
    config: VisualConfig,
    animation: ProgressAnimation,
    measured: Size,
    needs_redraw: bool,
    view: P,
}

impl GoalIndicatorBar<BaseView> {
    pub fn new(config: VisualConfig) -> Self {
        Self::with_view(config, BaseView::default())
    }
}

impl<P: ViewPersistence> GoalIndicatorBar<P> {
    pub fn with_view(config: VisualConfig, view: P) -> Self {
        Self {
            progress: 0,
            goal: 0,
            config,
            animation: ProgressAnimation::new(),
            measured: Size::default(),
            needs_redraw: true,
            view,
        }
    }

    pub fn progress(&self) -> i32 {
        self.progress
    }

    pub fn goal(&self) -> i32 {
        self.goal
    }

    pub fn config(&self) -> &VisualConfig {
        &self.config
    }

    pub fn view(&self) -> &P {
        &self.view
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_active()
    }

    pub fn measured_size(&self) -> Size {
        self.measured
    }

    fn invalidate(&mut self) {
        self.needs_redraw = true;
    }

    /// Replaces the whole appearance at once.
    pub fn configure(&mut self, config: VisualConfig) {
        self.config = config;
        self.invalidate();
    }

    /// Animates from zero to `progress`.
    pub fn set_progress(&mut self, progress: i32) {
        self.set_progress_animated(progress, true);
    }

    pub fn set_progress_animated(&mut self, progress: i32, animate: bool) {
        if animate {
            self.set_progress_animated(0, false);
            self.animation.arm(progress);
        } else {
            self.progress = progress;
            self.invalidate();
        }
    }

    pub fn set_goal(&mut self, goal: i32) {
        self.goal = goal;
        self.invalidate();
    }

    pub fn set_goal_indicator_height(&mut self, height: f32) {
        self.config.goal_indicator_height = height;
        self.invalidate();
    }

    pub fn set_goal_indicator_thickness(&mut self, thickness: f32) {
        self.config.goal_indicator_thickness = thickness;
        self.invalidate();
    }

    pub fn set_goal_reached_color(&mut self, color: Color) {
        self.config.goal_reached_color = color;
        self.invalidate();
    }

    pub fn set_goal_not_reached_color(&mut self, color: Color) {
        self.config.goal_not_reached_color = color;
        self.invalidate();
    }

    pub fn set_unfilled_section_color(&mut self, color: Color) {
        self.config.unfilled_section_color = color;
        self.invalidate();
    }

    pub fn set_bar_thickness(&mut self, thickness: i32) {
        self.config.bar_thickness = thickness;
        self.invalidate();
    }

    pub fn set_indicator_type(&mut self, indicator_type: IndicatorType) {
        self.config.indicator_type = indicator_type;
        self.invalidate();
    }

    pub fn capture_state(&self) -> Parcel {
        BarSnapshot {
            progress: self.progress,
            goal: self.goal,
            super_state: self.view.save_state(),
        }
        .into_parcel()
    }

    pub fn restore_state(&mut self, parcel: Parcel) {
        match BarSnapshot::from_parcel(parcel) {
            Ok(snapshot) => {
                debug!(
                    "Restoring progress={} goal={}",
                    snapshot.progress, snapshot.goal
                );
                self.set_progress_animated(snapshot.progress, false);
                self.set_goal(snapshot.goal);
                self.view.restore_state(snapshot.super_state);
            }
            Err(parcel) => self.view.restore_state(parcel),
        }
    }
}

impl<P: ViewPersistence> Widget for GoalIndicatorBar<P> {
    fn name(&self) -> &'static str {
        "goal_bar"
    }

    fn measure(&mut self, width: MeasureSpec, height: MeasureSpec) -> Size {
        let height = match height {
            MeasureSpec::Exactly(h) => h,
            MeasureSpec::AtMost(h) => self.config.goal_indicator_height.min(h as f32) as u32,
            MeasureSpec::Unspecified(h) => h,
        };
        self.measured = Size::new(width.size(), height);
        self.measured
    }

    fn tick(&mut self, now: f64) {
        if let Some(value) = self.animation.tick(now) {
            self.set_progress_animated(value, false);
            if !self.animation.is_active() {
                info!("Progress settled at {}", value);
            }
        }
    }

    fn render(&self, canvas: &mut dyn Canvas, size: Size) {
        let width = size.width as f32;
        let half_height = (size.height / 2) as f32;
        let progress_end_x = (width * self.progress as f32 / 100.0) as i32 as f32;

        let bar_width = self.config.bar_thickness as f32;
        let filled_color = if self.progress >= self.goal {
            self.config.goal_reached_color
        } else {
            self.config.goal_not_reached_color
        };

        canvas.draw_line(
            Vec2::new(0.0, half_height),
            Vec2::new(progress_end_x, half_height),
            &Paint::new(filled_color, bar_width),
        );
        canvas.draw_line(
            Vec2::new(progress_end_x, half_height),
            Vec2::new(width, half_height),
            &Paint::new(self.config.unfilled_section_color, bar_width),
        );

        // marker always uses the reached color
        let goal_x = (width * self.goal as f32 / 100.0) as i32 as f32;
        let paint = Paint::new(
            self.config.goal_reached_color,
            self.config.goal_indicator_thickness,
        );
        let h = self.config.goal_indicator_height;
        match self.config.indicator_type {
            IndicatorType::Line => canvas.draw_line(
                Vec2::new(goal_x, half_height - h / 2.0),
                Vec2::new(goal_x, half_height + h / 2.0),
                &paint,
            ),
            IndicatorType::Square => canvas.draw_rect(
                Rect::from_ltrb(goal_x - h / 2.0, 0.0, goal_x + h / 2.0, h),
                &paint,
            ),
            IndicatorType::Circle => {
                canvas.draw_circle(Vec2::new(goal_x, half_height), half_height, &paint)
            }
        }
    }

    fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }
}
