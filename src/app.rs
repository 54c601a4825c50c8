use chrono::{DateTime, Local, TimeZone};
use eframe::egui;
use eframe::egui::{
    Align2, Color32, CursorIcon, Id, RichText, Sense, TextureHandle, TextureOptions,
    ViewportCommand,
};
use tokio::{task, time};

use crate::config::Config;
use crate::font;
use crate::tick::{self, SecondTicker};

const ICON_EDGE: f32 = 24.0;

/// Visibility countdown for the close button.
///
/// Decay is coupled to the once-per-second refresh cycle instead of a
/// dedicated timer, so the control lingers for up to three cycles after the
/// last hover.
struct ExitControl {
    ticks_left: Option<u8>,
}

impl ExitControl {
    const VISIBLE_TICKS: u8 = 3;

    fn new() -> Self {
        Self { ticks_left: None }
    }

    /// (Re)start the countdown. Re-hovering resets it, never accumulates.
    fn arm(&mut self) {
        self.ticks_left = Some(Self::VISIBLE_TICKS);
    }

    fn decay(&mut self) {
        if let Some(ticks) = self.ticks_left {
            self.ticks_left = ticks.checked_sub(1).filter(|left| *left > 0);
        }
    }

    fn visible(&self) -> bool {
        self.ticks_left.is_some()
    }
}

/// Format `now` with a strftime-style pattern.
///
/// chrono reports invalid directives as `Display` errors, which `to_string`
/// would turn into a panic; render the literal pattern in that case so a bad
/// `CLOCK_*_FORMAT` garbles the label instead of crashing the clock.
fn format_instant<Tz: TimeZone>(now: &DateTime<Tz>, pattern: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    use std::fmt::Write as _;
    let mut out = String::new();
    if write!(out, "{}", now.format(pattern)).is_ok() {
        out
    } else {
        pattern.to_owned()
    }
}

/// Footprint of the two labels at the configured sizes, with margin for the
/// close button and for weekdays longer than today's.
pub fn initial_window_size(config: &Config) -> egui::Vec2 {
    let now = Local::now();
    let time_chars = format_instant(&now, &config.time_format).chars().count() as f32;
    let date_chars = format_instant(&now, &config.date_format).chars().count() as f32;
    let width = (time_chars * config.time_text_size)
        .max(date_chars * config.date_text_size)
        * 0.62
        + 64.0;
    let height = (config.time_text_size + config.date_text_size) * 1.4 + 24.0;
    egui::vec2(width, height)
}

pub struct ClockApp {
    config: Config,
    exit_icon: TextureHandle,
    ticker: SecondTicker,
    exit_control: ExitControl,
    time_text: String,
    date_text: String,
    placed: bool,
}

impl ClockApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config, icon: egui::ColorImage) -> Self {
        let family = font::install(&cc.egui_ctx, font::register(&config.font_path));

        let mut style = (*cc.egui_ctx.style()).clone();
        style.wrap = Some(false);
        style.text_styles = [
            (
                egui::TextStyle::Body,
                egui::FontId::new(config.time_text_size, family.clone()),
            ),
            (
                egui::TextStyle::Small,
                egui::FontId::new(config.date_text_size, family),
            ),
        ]
        .into();
        cc.egui_ctx.set_style(style);

        // Repaint task. Realigned to the wall-clock second each cycle so the
        // displayed time flips on the boundary instead of drifting; each
        // iteration computes its own successor delay.
        let ctx = cc.egui_ctx.clone();
        task::spawn(async move {
            loop {
                time::sleep(tick::until_next_second(&Local::now())).await;
                ctx.request_repaint();
            }
        });

        let exit_icon = cc
            .egui_ctx
            .load_texture("exit-icon", icon, TextureOptions::LINEAR);

        let now = Local::now();
        Self {
            time_text: format_instant(&now, &config.time_format),
            date_text: format_instant(&now, &config.date_format),
            config,
            exit_icon,
            ticker: SecondTicker::default(),
            exit_control: ExitControl::new(),
            placed: false,
        }
    }

    /// Center horizontally at the top of the screen, once, as soon as the
    /// backend reports monitor metrics.
    fn place_at_top_center(&mut self, ctx: &egui::Context) {
        if self.placed {
            return;
        }
        let (monitor, outer) = ctx.input(|i| (i.viewport().monitor_size, i.viewport().outer_rect));
        if let (Some(monitor), Some(outer)) = (monitor, outer) {
            let x = ((monitor.x - outer.width()) / 2.0).max(0.0);
            ctx.send_viewport_cmd(ViewportCommand::OuterPosition(egui::pos2(x, 0.0)));
            self.placed = true;
        }
    }
}

impl eframe::App for ClockApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Local::now();
        self.time_text = format_instant(&now, &self.config.time_format);
        self.date_text = format_instant(&now, &self.config.date_format);

        // The UI also repaints on input, so refresh-cycle state only moves
        // when the wall clock has entered a new second.
        if self.ticker.advance(&now) {
            self.exit_control.decay();
        }

        self.place_at_top_center(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let app_rect = ui.max_rect();
                let response = ui
                    .interact(app_rect, Id::new("clock"), Sense::drag())
                    .on_hover_cursor(CursorIcon::Move);
                if response.drag_started() {
                    ui.ctx().send_viewport_cmd(ViewportCommand::StartDrag);
                }
                if response.hovered() {
                    self.exit_control.arm();
                }

                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(self.time_text.as_str()).color(self.config.color));
                    ui.label(
                        RichText::new(self.date_text.as_str())
                            .color(self.config.color)
                            .small(),
                    );
                });
            });

        if self.exit_control.visible() {
            egui::Area::new(Id::new("exit-control"))
                .order(egui::Order::Foreground)
                .anchor(Align2::RIGHT_TOP, egui::vec2(-4.0, 4.0))
                .show(ctx, |ui| {
                    let icon = egui::load::SizedTexture::new(
                        self.exit_icon.id(),
                        egui::vec2(ICON_EDGE, ICON_EDGE),
                    );
                    if ui.add(egui::ImageButton::new(icon).frame(false)).clicked() {
                        ctx.send_viewport_cmd(ViewportCommand::Close);
                    }
                });
        }
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        // Fully transparent background: only the text and the icon float.
        Color32::TRANSPARENT.to_normalized_gamma_f32()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 30).unwrap()
    }

    #[test]
    fn formatting_matches_chrono_golden_output() {
        assert_eq!(format_instant(&instant(), "%H:%M"), "09:05");
        assert_eq!(format_instant(&instant(), "%Y-%m-%d"), "2024-03-01");
        assert_eq!(format_instant(&instant(), "%H:%M:%S"), "09:05:30");
        assert_eq!(format_instant(&instant(), "%A %Y-%m-%d"), "Friday 2024-03-01");
    }

    #[test]
    fn invalid_patterns_garble_instead_of_crashing() {
        assert_eq!(format_instant(&instant(), "%Q"), "%Q");
    }

    #[test]
    fn exit_control_hides_after_exactly_three_cycles() {
        let mut control = ExitControl::new();
        assert!(!control.visible());

        control.arm();
        assert!(control.visible());
        control.decay();
        control.decay();
        assert!(control.visible());
        control.decay();
        assert!(!control.visible());
    }

    #[test]
    fn rearming_resets_the_countdown_without_accumulating() {
        let mut control = ExitControl::new();
        control.arm();
        control.decay();
        control.decay();

        control.arm();
        control.decay();
        control.decay();
        assert!(control.visible());
        control.decay();
        assert!(!control.visible());
    }

    #[test]
    fn decay_without_arming_is_a_no_op() {
        let mut control = ExitControl::new();
        control.decay();
        assert!(!control.visible());
    }

    #[test]
    fn window_grows_with_the_configured_text_sizes() {
        let small = Config {
            color: Color32::WHITE,
            font_path: "/opt/clock/assets/DynaPuff.ttf".into(),
            time_text_size: 20.0,
            date_text_size: 14.0,
            time_format: "%H:%M:%S".into(),
            date_format: "%A %Y-%m-%d".into(),
        };
        let mut large = small.clone();
        large.time_text_size = 60.0;
        large.date_text_size = 40.0;

        let small = initial_window_size(&small);
        let large = initial_window_size(&large);
        assert!(large.x > small.x);
        assert!(large.y > small.y);
    }
}
