use kraken_fx::{AnalysisSource, AnalysisWindow, ByteAnalyser, SourceState};

use super::SourcePipe;

/// Captured system audio exposed as an analysis source
pub struct Analyser {
    pipe: SourcePipe,
    fft: ByteAnalyser,
}

impl Analyser {
    /// `None` when no capture device could be opened
    pub fn open() -> Option<Self> {
        let pipe = SourcePipe::new();
        if !pipe.is_capturing() {
            log::warn!("No audio capture available, visualizer disabled");
            return None;
        }
        Some(Self {
            pipe,
            fft: ByteAnalyser::new(),
        })
    }

    pub fn device_name(&self) -> Option<&str> {
        self.pipe.device_name()
    }
}

/// Match a source to the transport: resume it on play if it is suspended,
/// suspend it on pause
pub fn follow_transport(source: &mut dyn AnalysisSource, playing: bool) {
    match (playing, source.state()) {
        (true, SourceState::Suspended) => source.resume(),
        (false, SourceState::Running) => source.suspend(),
        _ => {}
    }
}

impl AnalysisSource for Analyser {
    fn bin_count(&self) -> usize {
        self.fft.bin_count()
    }

    fn state(&self) -> SourceState {
        if self.pipe.is_capturing() {
            SourceState::Running
        } else {
            SourceState::Suspended
        }
    }

    fn resume(&mut self) {
        self.pipe.play();
    }

    fn suspend(&mut self) {
        self.pipe.pause();
    }

    fn sample(&mut self, window: &mut AnalysisWindow) {
        let samples = self.pipe.stream();
        self.fft.process(&samples, window);
    }
}
