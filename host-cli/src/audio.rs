//! # Audio 模块
//!
//! 逐字音效的播放后端。
//!
//! 启用 `audio` 特性时使用 rodio：每个气泡一个声道，每次播放新建一个 Sink，
//! 音调通过播放速度实现。未启用特性、关闭音效或没有音频设备时静音。

use bubble_runtime::{CharacterVoice, NullVoice};
use tracing::warn;

use crate::config::AudioConfig;

/// 为两个气泡创建音效播放器
pub fn make_voices(config: &AudioConfig) -> (Box<dyn CharacterVoice>, Box<dyn CharacterVoice>) {
    if !config.enabled {
        return (Box::new(NullVoice), Box::new(NullVoice));
    }

    #[cfg(feature = "audio")]
    {
        match rodio_backend::AudioOutput::open(&config.clip_path) {
            Ok(output) => return (Box::new(output.voice()), Box::new(output.voice())),
            Err(e) => warn!(error = %e, "音频初始化失败，逐字音效被禁用"),
        }
    }

    #[cfg(not(feature = "audio"))]
    warn!("未启用 audio 特性，逐字音效被禁用");

    (Box::new(NullVoice), Box::new(NullVoice))
}

#[cfg(feature = "audio")]
pub use rodio_backend::{AudioError, AudioOutput, RodioVoice};

#[cfg(feature = "audio")]
mod rodio_backend {
    use std::io::{BufReader, Cursor};
    use std::path::Path;
    use std::rc::Rc;
    use std::sync::Arc;

    use bubble_runtime::CharacterVoice;
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
    use thiserror::Error;
    use tracing::{debug, warn};

    /// 音频初始化错误
    #[derive(Error, Debug)]
    pub enum AudioError {
        /// 音效文件读取失败
        #[error("无法读取音效文件 '{path}': {message}")]
        Io { path: String, message: String },
        /// 没有可用的输出设备
        #[error("无法打开音频设备: {0}")]
        Device(String),
        /// 音效文件无法解码
        #[error("无法解码音效文件: {0}")]
        Decode(String),
    }

    /// 音频输出设备和已加载的音效
    pub struct AudioOutput {
        stream: Rc<OutputStream>,
        handle: OutputStreamHandle,
        clip: Arc<[u8]>,
    }

    impl AudioOutput {
        /// 打开默认输出设备并加载音效
        pub fn open(clip_path: &Path) -> Result<Self, AudioError> {
            let bytes = std::fs::read(clip_path).map_err(|e| AudioError::Io {
                path: clip_path.display().to_string(),
                message: e.to_string(),
            })?;
            let clip: Arc<[u8]> = bytes.into();

            // 提前解码一次，确认格式受支持
            Decoder::new(BufReader::new(Cursor::new(clip.clone())))
                .map_err(|e| AudioError::Decode(e.to_string()))?;

            let (stream, handle) =
                OutputStream::try_default().map_err(|e| AudioError::Device(e.to_string()))?;
            debug!(path = %clip_path.display(), "音效已加载");

            Ok(Self {
                stream: Rc::new(stream),
                handle,
                clip,
            })
        }

        /// 创建一个独立声道
        pub fn voice(&self) -> RodioVoice {
            RodioVoice {
                _stream: self.stream.clone(),
                handle: self.handle.clone(),
                clip: self.clip.clone(),
                sink: None,
            }
        }
    }

    /// 基于 rodio 的逐字音效声道
    pub struct RodioVoice {
        _stream: Rc<OutputStream>,
        handle: OutputStreamHandle,
        clip: Arc<[u8]>,
        sink: Option<Sink>,
    }

    impl CharacterVoice for RodioVoice {
        fn play_one_shot(&mut self, pitch: f32, volume: f32) {
            let source = match Decoder::new(BufReader::new(Cursor::new(self.clip.clone()))) {
                Ok(source) => source,
                Err(e) => {
                    warn!(error = %e, "音效解码失败");
                    return;
                }
            };

            let sink = match Sink::try_new(&self.handle) {
                Ok(sink) => sink,
                Err(e) => {
                    warn!(error = %e, "创建音频 Sink 失败");
                    return;
                }
            };
            sink.set_volume(volume);
            sink.append(source.speed(pitch));
            self.sink = Some(sink);
        }

        fn is_playing(&self) -> bool {
            self.sink.as_ref().is_some_and(|sink| !sink.empty())
        }

        fn stop(&mut self) {
            if let Some(sink) = self.sink.take() {
                sink.stop();
            }
        }
    }
}
