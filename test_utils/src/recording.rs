//! Recording doubles for audio, UI and inventory.

use dread::{AudioChannel, AudioMixer, ChannelName, ClipId, Inventory, Ui};
use hashbrown::HashMap;

/// A single call made on an audio channel.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCall {
    SetVolume(f32),
    SetPitch(f32),
    OneShot { clip: String, volume: f32 },
    Looping(String),
    Stop,
    FadeOut(f32),
}

#[derive(Debug, Clone, Default)]
pub struct RecordingChannel {
    pub calls: Vec<AudioCall>,
}

impl AudioChannel for RecordingChannel {
    fn set_volume(&mut self, volume: f32) {
        self.calls.push(AudioCall::SetVolume(volume));
    }

    fn set_pitch(&mut self, pitch: f32) {
        self.calls.push(AudioCall::SetPitch(pitch));
    }

    fn play_one_shot(&mut self, clip: &ClipId, volume: f32) {
        self.calls.push(AudioCall::OneShot {
            clip: clip.as_str().to_owned(),
            volume,
        });
    }

    fn play_looping(&mut self, clip: &ClipId) {
        self.calls.push(AudioCall::Looping(clip.as_str().to_owned()));
    }

    fn stop(&mut self) {
        self.calls.push(AudioCall::Stop);
    }

    fn fade_out(&mut self, seconds: f32) {
        self.calls.push(AudioCall::FadeOut(seconds));
    }
}

/// Mixer that records calls per channel. All channels exist unless removed.
#[derive(Debug, Clone)]
pub struct RecordingMixer {
    channels: HashMap<ChannelName, RecordingChannel>,
}

impl Default for RecordingMixer {
    fn default() -> Self {
        let channels = [
            ChannelName::Ambient,
            ChannelName::Scare,
            ChannelName::Heartbeat,
            ChannelName::Player,
        ]
        .into_iter()
        .map(|name| (name, RecordingChannel::default()))
        .collect();
        Self { channels }
    }
}

impl RecordingMixer {
    /// Mixer lacking `name`, for degraded-collaborator tests.
    #[must_use]
    pub fn without(mut self, name: ChannelName) -> Self {
        self.channels.remove(&name);
        self
    }

    /// Calls recorded on `name`, empty when the channel is absent.
    #[must_use]
    pub fn calls(&self, name: ChannelName) -> &[AudioCall] {
        self.channels
            .get(&name)
            .map(|channel| channel.calls.as_slice())
            .unwrap_or_default()
    }

    /// One-shot clip names played on `name`.
    #[must_use]
    pub fn one_shots(&self, name: ChannelName) -> Vec<&str> {
        self.calls(name)
            .iter()
            .filter_map(|call| match call {
                AudioCall::OneShot { clip, .. } => Some(clip.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        for channel in self.channels.values_mut() {
            channel.calls.clear();
        }
    }
}

impl AudioMixer for RecordingMixer {
    fn channel(&mut self, name: ChannelName) -> Option<&mut dyn AudioChannel> {
        match self.channels.get_mut(&name) {
            Some(channel) => Some(channel),
            None => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiCall {
    ShowPrompt(String),
    HidePrompt,
    Message { text: String, seconds: f32 },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingUi {
    pub calls: Vec<UiCall>,
}

impl RecordingUi {
    /// Transient message texts in order.
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                UiCall::Message { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Ui for RecordingUi {
    fn show_prompt(&mut self, text: &str) {
        self.calls.push(UiCall::ShowPrompt(text.to_owned()));
    }

    fn hide_prompt(&mut self) {
        self.calls.push(UiCall::HidePrompt);
    }

    fn show_transient_message(&mut self, text: &str, seconds: f32) {
        self.calls.push(UiCall::Message {
            text: text.to_owned(),
            seconds,
        });
    }
}

/// Unbounded inventory unless a capacity is set.
#[derive(Debug, Clone, Default)]
pub struct VecInventory {
    pub items: Vec<(String, u32)>,
    pub capacity: Option<usize>,
}

impl VecInventory {
    #[must_use]
    pub fn holding(items: &[&str]) -> Self {
        Self {
            items: items.iter().map(|name| ((*name).to_owned(), 1)).collect(),
            capacity: None,
        }
    }
}

impl Inventory for VecInventory {
    fn add_item(&mut self, name: &str, quantity: u32) -> bool {
        if self.capacity.is_some_and(|cap| self.items.len() >= cap) {
            return false;
        }
        self.items.push((name.to_owned(), quantity));
        true
    }

    fn has_item(&self, name: &str) -> bool {
        self.items.iter().any(|(item, _)| item == name)
    }
}
