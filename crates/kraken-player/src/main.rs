mod audio;
mod canvas;
mod playlist;
mod ui;
mod utils;

use audio::{follow_transport, Analyser, SourcePipe};
use canvas::CanvasLayers;
use kraken_fx::{AnalysisSource, Engine, PlayerSettings};
use nannou::prelude::*;
use playlist::Playlist;
use rand::rngs::ThreadRng;
use std::env;
use std::path::PathBuf;
use ui::bindings::{parse_key, Action};
use ui::help_overlay::HelpOverlay;
use ui::hud::{Hud, Status};

/// Window settings
struct Resolution {
    width: u32,
    height: u32,
    fullscreen: bool,
}

impl Resolution {
    fn current(windowed: bool) -> Self {
        if windowed || cfg!(debug_assertions) {
            Self {
                width: 1280,
                height: 720,
                fullscreen: false,
            }
        } else {
            Self {
                width: 1920,
                height: 1080,
                fullscreen: true,
            }
        }
    }
}

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    windowed: bool,
    list_devices: bool,
    paths: Vec<PathBuf>,
    unknown: Vec<String>,
}

impl CliArgs {
    fn parse(args: impl IntoIterator<Item = String>) -> Self {
        let mut cli = Self::default();
        for arg in args {
            match arg.as_str() {
                "--windowed" | "-w" => cli.windowed = true,
                "--list-devices" => cli.list_devices = true,
                flag if flag.starts_with('-') => cli.unknown.push(flag.to_string()),
                _ => cli.paths.push(PathBuf::from(arg)),
            }
        }
        cli
    }
}

fn main() {
    utils::init_logger();

    let cli = CliArgs::parse(env::args().skip(1));
    for flag in &cli.unknown {
        log::warn!("Unknown option: {}", flag);
    }
    if cli.list_devices {
        SourcePipe::list_devices();
        return;
    }

    nannou::app(model).update(update).run();
}

struct Model {
    engine: Engine<ThreadRng>,
    canvas: CanvasLayers,
    analyser: Option<Analyser>,
    playlist: Playlist,
    settings: PlayerSettings,
    hud: Hud,
    help_overlay: HelpOverlay,
    playing: bool,
}

impl Model {
    fn status(&self) -> Status {
        Status {
            effect: self.engine.effect(),
            settings: self.engine.settings(),
            visualizer: self.engine.visualizer_mode(),
            playing: self.playing,
            shuffle: self.playlist.shuffle(),
            repeat: self.playlist.repeat(),
            volume: self.settings.volume(),
        }
    }

    /// Copy live state into the settings record and write it out
    fn persist(&mut self) {
        self.settings.effect = Some(self.engine.effect());
        self.settings.visualizer = Some(self.engine.visualizer_mode());
        self.settings.shuffle = Some(self.playlist.shuffle());
        self.settings.repeat = Some(self.playlist.repeat());
        self.settings.set_effect_table(self.engine.table());
        self.settings.save();
    }

    /// A new track is current: burst and announce it
    fn track_changed(&mut self) {
        let Some(title) = self.playlist.title() else {
            return;
        };
        log::info!("Now playing: {}", title);
        self.engine.track_changed();
        self.hud.show_notification(title);
        if !self.playing {
            self.set_playing(true);
        }
    }

    fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
        if let Some(analyser) = self.analyser.as_mut() {
            follow_transport(analyser, playing);
        }
    }
}

fn model(app: &App) -> Model {
    // nannou takes a plain fn here, so the arguments are read again; `main` already warned
    let cli = CliArgs::parse(env::args().skip(1));
    let resolution = Resolution::current(cli.windowed);
    app.set_exit_on_escape(false);

    let mut win = app
        .new_window()
        .title("kraken-player")
        .view(view)
        .key_pressed(key_pressed)
        .resized(resized)
        .size(resolution.width, resolution.height)
        .min_size(400, 300);

    if resolution.fullscreen {
        win = win.fullscreen();
    }

    if let Err(e) = win.build() {
        log::error!("Could not open window: {:?}", e);
        std::process::exit(1);
    }

    let bounds = app.window_rect();
    let (width, height) = (bounds.w(), bounds.h());
    log::info!("Window size: {}x{}", width, height);

    let settings = PlayerSettings::load();
    let engine = Engine::new(
        rand::rng(),
        settings.effect_table(),
        settings.effect(),
        settings.visualizer(),
        (width, height),
    );

    let mut playlist = Playlist::from_paths(&cli.paths);
    playlist.set_shuffle(settings.shuffle());
    playlist.set_repeat(settings.repeat());

    let analyser = Analyser::open();
    if let Some(name) = analyser.as_ref().and_then(|a| a.device_name()) {
        log::info!("Analysing audio from {}", name);
    }

    let mut model = Model {
        engine,
        canvas: CanvasLayers::new(width, height),
        analyser,
        playlist,
        settings,
        hud: Hud::new(),
        help_overlay: HelpOverlay::new(),
        playing: true,
    };

    if model.playlist.start(&mut rand::rng()).is_some() {
        model.track_changed();
    } else {
        model.hud.show_notification("No tracks. Pass audio files or folders on the command line.");
    }

    model
}

fn update(_app: &App, model: &mut Model, update: Update) {
    model.hud.update();

    let source = model.analyser.as_mut().map(|a| a as &mut dyn AnalysisSource);
    let mut layers = model.canvas.layers();
    model.engine.tick(update.since_start.as_secs_f64(), &mut layers, source);
}

fn view(app: &App, model: &Model, frame: Frame) {
    frame.clear(BLACK);
    model.canvas.to_frame(app, &frame);

    let bounds = app.window_rect();
    let draw = app.draw();
    model
        .hud
        .draw(&draw, bounds, model.playlist.title().as_deref(), &model.status());
    model.help_overlay.draw(&draw);

    if let Err(e) = draw.to_frame(app, &frame) {
        log::warn!("Failed to render overlay: {:?}", e);
    }
}

fn resized(_app: &App, model: &mut Model, size: Vec2) {
    model.canvas.resize(size.x, size.y);
    model.engine.resize(size.x, size.y);
}

fn key_pressed(app: &App, model: &mut Model, key: Key) {
    let Some(action) = parse_key(key, app.keys.mods.shift()) else {
        return;
    };
    let mut rng = rand::rng();

    match action {
        Action::Quit => app.quit(),
        Action::ShowHelp => model.help_overlay.toggle(),

        Action::TogglePlay => {
            let playing = !model.playing;
            model.set_playing(playing);
            model
                .hud
                .show_notification(if playing { "Playing" } else { "Paused" });
        }
        Action::NextTrack => {
            if model.playlist.next(&mut rng).is_some() {
                model.track_changed();
            }
        }
        Action::PreviousTrack => {
            if model.playlist.previous(&mut rng).is_some() {
                model.track_changed();
            }
        }
        Action::ToggleShuffle => {
            let on = model.playlist.toggle_shuffle();
            model
                .hud
                .show_notification(format!("Shuffle: {}", if on { "on" } else { "off" }));
            model.persist();
        }
        Action::CycleRepeat => {
            let repeat = model.playlist.cycle_repeat();
            model
                .hud
                .show_notification(format!("Repeat: {}", repeat.label()));
            model.persist();
        }
        Action::AdjustVolume(delta) => {
            let volume = model.settings.volume().saturating_add_signed(delta).min(100);
            model.settings.volume = Some(volume);
            model.hud.show_notification(format!("Volume: {}%", volume));
            model.persist();
        }

        Action::NextEffect | Action::PreviousEffect | Action::SelectEffect(_) => {
            let current = model.engine.effect();
            let effect = match action {
                Action::NextEffect => current.next(),
                Action::PreviousEffect => current.previous(),
                Action::SelectEffect(kind) => kind,
                _ => current,
            };
            model.engine.set_effect(effect);
            model.hud.show_notification(format!("Effect: {}", effect.label()));
            model.persist();
        }
        Action::NextVisualizer | Action::PreviousVisualizer => {
            let current = model.engine.visualizer_mode();
            let mode = if action == Action::NextVisualizer {
                current.next()
            } else {
                current.previous()
            };
            model.engine.set_visualizer(mode);
            let note = if model.analyser.is_none() && mode != kraken_fx::VisualizerMode::None {
                format!("Visualizer: {} (no audio input)", mode.label())
            } else {
                format!("Visualizer: {}", mode.label())
            };
            model.hud.show_notification(note);
            model.persist();
        }
        Action::AdjustQuantity(delta) => {
            let value = model.engine.settings().quantity.saturating_add_signed(delta);
            model.engine.set_quantity(value);
            show_settings(model);
        }
        Action::AdjustSize(delta) => {
            let value = model.engine.settings().size.saturating_add_signed(delta);
            model.engine.set_size(value);
            show_settings(model);
        }
        Action::AdjustSpeed(delta) => {
            let value = model.engine.settings().speed.saturating_add_signed(delta);
            model.engine.set_speed(value);
            show_settings(model);
        }
    }
}

fn show_settings(model: &mut Model) {
    let s = model.engine.settings();
    model.hud.show_notification(format!(
        "{}: qty {} size {} speed {}",
        model.engine.effect().label(),
        s.quantity,
        s.size,
        s.speed
    ));
    model.persist();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> CliArgs {
        CliArgs::parse(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_cli_flags_and_paths() {
        let cli = args(&["-w", "music", "song.mp3", "--list-devices"]);
        assert!(cli.windowed);
        assert!(cli.list_devices);
        assert_eq!(cli.paths, vec![PathBuf::from("music"), PathBuf::from("song.mp3")]);
    }

    #[test]
    fn test_unknown_flags_are_ignored() {
        let cli = args(&["--bogus", "--windowed"]);
        assert_eq!(
            cli,
            CliArgs {
                windowed: true,
                unknown: vec!["--bogus".to_string()],
                ..CliArgs::default()
            }
        );
    }
}
