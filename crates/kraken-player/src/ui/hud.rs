//! Track title, status line and transient notifications.

use kraken_fx::{EffectKind, EffectSettings, RepeatMode, VisualizerMode};
use nannou::prelude::*;

/// ~3 seconds at 60fps
const NOTIFICATION_FRAMES: u32 = 180;

/// Everything the status line reports
pub struct Status {
    pub effect: EffectKind,
    pub settings: EffectSettings,
    pub visualizer: VisualizerMode,
    pub playing: bool,
    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub volume: u32,
}

impl Status {
    pub fn line(&self) -> String {
        let transport = if self.playing { "playing" } else { "paused" };
        let effect = if self.effect == EffectKind::None {
            self.effect.label().to_string()
        } else {
            format!(
                "{} (qty {} size {} speed {})",
                self.effect.label(),
                self.settings.quantity,
                self.settings.size,
                self.settings.speed
            )
        };
        format!(
            "{} | {} | viz {} | shuffle {} | repeat {} | vol {}%",
            transport,
            effect,
            self.visualizer.label(),
            if self.shuffle { "on" } else { "off" },
            self.repeat.label(),
            self.volume
        )
    }
}

#[derive(Default)]
pub struct Hud {
    notification_text: Option<String>,
    notification_frames: u32,
}

impl Hud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows a notification message for 3 seconds
    pub fn show_notification(&mut self, text: impl Into<String>) {
        self.notification_text = Some(text.into());
        self.notification_frames = NOTIFICATION_FRAMES;
    }

    pub fn notification(&self) -> Option<&str> {
        self.notification_text.as_deref()
    }

    /// Once per frame
    pub fn update(&mut self) {
        if self.notification_frames > 0 {
            self.notification_frames -= 1;
            if self.notification_frames == 0 {
                self.notification_text = None;
            }
        }
    }

    pub fn draw(&self, draw: &Draw, bounds: Rect, title: Option<&str>, status: &Status) {
        let width = bounds.w() - 40.0;

        draw.text(title.unwrap_or("No track loaded"))
            .x_y(0.0, bounds.bottom() + 50.0)
            .w_h(width, 30.0)
            .color(rgba(1.0, 1.0, 1.0, 0.9))
            .font_size(22);

        draw.text(&status.line())
            .x_y(0.0, bounds.bottom() + 22.0)
            .w_h(width, 24.0)
            .color(rgba(0.6, 0.8, 0.9, 0.7))
            .font_size(14);

        if let Some(ref text) = self.notification_text {
            let alpha = (self.notification_frames as f32 / NOTIFICATION_FRAMES as f32).min(1.0);
            draw.text(text)
                .x_y(0.0, bounds.top() - 30.0)
                .w_h(width, 30.0)
                .color(rgba(1.0, 1.0, 1.0, alpha))
                .font_size(24);
        }
    }
}
