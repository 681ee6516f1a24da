//! Audio output through rodio.
//!
//! [`RodioOutput`] owns the output stream and must stay alive on the thread
//! that created it. Assets only keep the stream handle, so they can live on
//! the stack from any thread.

use crate::asset::{MixerGroup, MusicAsset, MusicId, MusicPlayer};
use crate::error::{MusicStackError, Result};
use crate::loop_timing::{LoopTiming, MusicData};
use ::rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default system output device.
pub struct RodioOutput {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl RodioOutput {
    pub fn try_default() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| MusicStackError::audio(format!("failed to open output: {}", e)))?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }

    pub fn handle(&self) -> &OutputStreamHandle {
        &self.handle
    }

    /// Looping clip from encoded audio (wav, ogg, flac, mp3).
    pub fn clip(&self, id: MusicId, data: impl Into<Arc<[u8]>>) -> Result<ClipAsset> {
        ClipAsset::new(self.handle.clone(), id, data)
    }

    /// Clip that plays its intro once and then loops from the end of the intro.
    pub fn intro_loop(
        &self,
        id: MusicId,
        data: impl Into<Arc<[u8]>>,
        music: MusicData,
    ) -> Result<IntroLoopAsset> {
        IntroLoopAsset::new(self.handle.clone(), id, data, music)
    }
}

fn decode(data: &Arc<[u8]>) -> Result<Decoder<Cursor<Arc<[u8]>>>> {
    Decoder::new(Cursor::new(Arc::clone(data)))
        .map_err(|e| MusicStackError::audio(format!("failed to decode music: {}", e)))
}

#[derive(Clone)]
enum Program {
    Clip(Arc<[u8]>),
    IntroLoop(Arc<[u8]>, LoopTiming),
}

impl Program {
    fn queue(&self, sink: &Sink) -> Result<()> {
        match self {
            Program::Clip(data) => {
                let looped = Decoder::new_looped(Cursor::new(Arc::clone(data)))
                    .map_err(|e| MusicStackError::audio(format!("failed to decode music: {}", e)))?;
                sink.append(looped);
            }
            Program::IntroLoop(data, timing) => {
                sink.append(decode(data)?);
                let loop_section = decode(data)?
                    .skip_duration(Duration::from_secs_f32(timing.intro_time()))
                    .repeat_infinite();
                sink.append(loop_section);
            }
        }
        Ok(())
    }
}

/// Player backed by a rodio [`Sink`].
///
/// Stopping drops the sink; the next `play` queues the music again from the
/// start on a fresh sink.
pub struct RodioPlayer {
    handle: OutputStreamHandle,
    program: Program,
    sink: Option<Sink>,
    volume: f32,
    output: Option<MixerGroup>,
    start_failed: bool,
}

impl RodioPlayer {
    fn new(handle: OutputStreamHandle, program: Program, volume: f32) -> Self {
        Self {
            handle,
            program,
            sink: None,
            volume,
            output: None,
            start_failed: false,
        }
    }

    fn start_sink(&mut self) -> Result<()> {
        let sink = Sink::try_new(&self.handle)
            .map_err(|e| MusicStackError::audio(format!("failed to open sink: {}", e)))?;
        sink.set_volume(self.volume);
        self.program.queue(&sink)?;
        self.sink = Some(sink);
        Ok(())
    }

    /// Mixer group requested by the stack.
    pub fn output(&self) -> Option<&MixerGroup> {
        self.output.as_ref()
    }
}

impl MusicPlayer for RodioPlayer {
    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }

    fn is_playing(&self) -> bool {
        self.sink
            .as_ref()
            .is_some_and(|sink| !sink.is_paused() && !sink.empty())
    }

    fn set_output(&mut self, output: Option<&MixerGroup>) {
        // rodio mixes everything into one stream; the group is kept for callers.
        if let Some(group) = output {
            debug!("rodio player routed to '{}'", group);
        }
        self.output = output.cloned();
    }

    fn play(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
            return;
        }
        // A broken sink is retried only after an explicit stop.
        if self.start_failed {
            return;
        }
        if let Err(err) = self.start_sink() {
            warn!("Music playback failed to start: {}", err);
            self.start_failed = true;
        }
    }

    fn stop(&mut self) {
        self.start_failed = false;
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn release(&mut self) {
        self.stop();
    }
}

/// Encoded clip that loops from its first sample.
pub struct ClipAsset {
    id: MusicId,
    handle: OutputStreamHandle,
    data: Arc<[u8]>,
    volume: f32,
}

impl ClipAsset {
    /// Validates that `data` decodes before accepting it.
    pub fn new(handle: OutputStreamHandle, id: MusicId, data: impl Into<Arc<[u8]>>) -> Result<Self> {
        let data = data.into();
        decode(&data)?;
        Ok(Self {
            id,
            handle,
            data,
            volume: 1.0,
        })
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }
}

impl MusicAsset for ClipAsset {
    fn music_id(&self) -> MusicId {
        self.id
    }

    fn create_player(&self) -> Result<Box<dyn MusicPlayer>> {
        Ok(Box::new(RodioPlayer::new(
            self.handle.clone(),
            Program::Clip(Arc::clone(&self.data)),
            self.volume,
        )))
    }
}

/// Encoded clip with an intro that plays once before the loop section repeats.
pub struct IntroLoopAsset {
    id: MusicId,
    handle: OutputStreamHandle,
    data: Arc<[u8]>,
    timing: LoopTiming,
    volume: f32,
}

impl IntroLoopAsset {
    pub fn new(
        handle: OutputStreamHandle,
        id: MusicId,
        data: impl Into<Arc<[u8]>>,
        music: MusicData,
    ) -> Result<Self> {
        let data = data.into();
        decode(&data)?;
        Ok(Self {
            id,
            handle,
            data,
            timing: music.timing()?,
            volume: 1.0,
        })
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    pub fn timing(&self) -> &LoopTiming {
        &self.timing
    }
}

impl MusicAsset for IntroLoopAsset {
    fn music_id(&self) -> MusicId {
        self.id
    }

    fn create_player(&self) -> Result<Box<dyn MusicPlayer>> {
        Ok(Box::new(RodioPlayer::new(
            self.handle.clone(),
            Program::IntroLoop(Arc::clone(&self.data), self.timing),
            self.volume,
        )))
    }
}
