//! Visual effects engine for kraken-player
//!
//! Ambient particle effects, the track-change burst and the frequency
//! visualizer, all drawn through the [`Surface`] trait so the engine never
//! depends on a particular window or GPU stack.

pub mod analysis;
pub mod burst;
pub mod color;
pub mod engine;
pub mod particles;
pub mod settings;
pub mod surface;
pub mod visualizer;

pub use analysis::{AnalysisSource, AnalysisWindow, ByteAnalyser, SourceState, FFT_SIZE};
pub use burst::{BurstEmitter, BurstParticle, BURST_COUNT};
pub use color::Rgba;
pub use engine::{Engine, MAX_FRAME_DT};
pub use particles::{AmbientField, FrameTime, Liveness, Particle};
pub use settings::{
    EffectKind, EffectSettings, EffectTable, PlayerSettings, RepeatMode, VisualizerMode,
};
pub use surface::{sample_gradient, GradientStop, Layers, Surface};
