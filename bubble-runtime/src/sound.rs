//! # Sound 模块
//!
//! 逐字音效：每个气泡一个声道，新音效打断旧音效，音调随机抖动。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::surface::CharacterVoice;

/// 音效参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundSettings {
    /// 音量 (0.0 - 1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,
    /// 音调随机范围，实际音调为 `1 ± pitch_range`
    #[serde(default = "default_pitch_range")]
    pub pitch_range: f32,
}

fn default_volume() -> f32 {
    0.5
}

fn default_pitch_range() -> f32 {
    0.1
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            pitch_range: default_pitch_range(),
        }
    }
}

/// 气泡的逐字音效
pub struct CharacterSound {
    voice: Box<dyn CharacterVoice>,
    settings: SoundSettings,
    rng: StdRng,
}

impl std::fmt::Debug for CharacterSound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CharacterSound")
            .field("settings", &self.settings)
            .field("playing", &self.voice.is_playing())
            .finish()
    }
}

impl CharacterSound {
    /// 创建音效，随机种子取自系统熵
    pub fn new(voice: Box<dyn CharacterVoice>, settings: SoundSettings) -> Self {
        Self {
            voice,
            settings,
            rng: StdRng::from_entropy(),
        }
    }

    /// 使用固定随机种子（测试用，结果可复现）
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// 当前参数
    pub fn settings(&self) -> SoundSettings {
        self.settings
    }

    /// 播放一次字符音效，正在播放的音效会被打断
    pub fn play(&mut self) {
        let pitch = self.next_pitch();
        if self.voice.is_playing() {
            self.voice.stop();
        }
        self.voice.play_one_shot(pitch, self.settings.volume);
    }

    /// 停止播放
    pub fn stop(&mut self) {
        self.voice.stop();
    }

    /// 是否正在播放
    pub fn is_playing(&self) -> bool {
        self.voice.is_playing()
    }

    fn next_pitch(&mut self) -> f32 {
        let range = self.settings.pitch_range.abs();
        if range == 0.0 {
            return 1.0;
        }
        1.0 + self.rng.gen_range(-range..=range)
    }
}
