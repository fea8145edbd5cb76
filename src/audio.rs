//! Hit and miss sound cues, played fire-and-forget through fyrox-sound.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use fyrox_sound::{
    buffer::{DataSource, SoundBufferResource, SoundBufferResourceExtension},
    context::SoundContext,
    engine::SoundEngine,
    source::SoundSourceBuilder,
};

use crate::settings::Settings;

const HIT_GAIN: f32 = 0.25;
const MISS_GAIN: f32 = 0.35;

pub struct SoundBank {
    /// Keeps the output device alive for as long as cues can play.
    _engine: SoundEngine,
    context: SoundContext,
    hit: SoundBufferResource,
    miss: SoundBufferResource,
    volume: f32,
}

impl SoundBank {
    /// Loads both cues from the configured assets directory. A missing or
    /// unreadable cue is a startup-time fatal condition.
    pub fn load(settings: &Settings) -> Result<Self> {
        let engine = SoundEngine::new()
            .map_err(|err| anyhow!("failed to open audio output: {err:?}"))?;
        let context = SoundContext::new();
        engine.state().add_context(context.clone());

        let hit = load_buffer(&settings.hit_sound_path())?;
        let miss = load_buffer(&settings.miss_sound_path())?;

        Ok(Self {
            _engine: engine,
            context,
            hit,
            miss,
            volume: settings.master_volume.clamp(0.0, 1.0),
        })
    }

    pub fn play_hit(&self) {
        self.play(self.hit.clone(), HIT_GAIN);
    }

    pub fn play_miss(&self) {
        self.play(self.miss.clone(), MISS_GAIN);
    }

    fn play(&self, buffer: SoundBufferResource, gain: f32) {
        let source = SoundSourceBuilder::new()
            .with_buffer(buffer)
            .with_status(fyrox_sound::source::Status::Playing)
            .with_play_once(true)
            .with_gain(gain * self.volume)
            .build();
        match source {
            Ok(source) => {
                self.context.state().add_source(source);
            }
            Err(err) => log::warn!("failed to queue sound cue: {err:?}"),
        }
    }
}

fn load_buffer(path: &Path) -> Result<SoundBufferResource> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("missing audio asset {}", path.display()))?;
    SoundBufferResource::new_generic(DataSource::from_memory(bytes))
        .map_err(|_| anyhow!("unsupported audio data in {}", path.display()))
}
