//! Mix bus for live synthesizers.
//!
//! Every bound voice owns one synthesizer and attaches it to the bus. The
//! audio callback renders the bus, which renders and sums each attached
//! source. Detaching one source leaves the others untouched.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Something that fills stereo buffers.
pub trait Render: Send {
    /// Overwrite `left` and `right` with the next block.
    fn render(&mut self, left: &mut [f32], right: &mut [f32]);
}

/// Handle to an attached source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BusSlot(u64);

type Source = Arc<Mutex<dyn Render>>;

pub struct SynthBus {
    sources: Mutex<Vec<(BusSlot, Source)>>,
    scratch: Mutex<(Vec<f32>, Vec<f32>)>,
    /// Stereo mix for interleaved rendering. Only ever grows.
    mixdown: Mutex<(Vec<f32>, Vec<f32>)>,
    next_slot: AtomicU64,
    gain: f32,
}

impl Default for SynthBus {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl SynthBus {
    pub fn new(gain: f32) -> Self {
        Self {
            sources: Mutex::new(Vec::new()),
            scratch: Mutex::new((Vec::new(), Vec::new())),
            mixdown: Mutex::new((Vec::new(), Vec::new())),
            next_slot: AtomicU64::new(0),
            gain,
        }
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn attach(&self, source: Source) -> BusSlot {
        let slot = BusSlot(self.next_slot.fetch_add(1, Ordering::Relaxed));
        let mut sources = self.sources.lock();
        sources.push((slot, source));
        debug!("Attached synth {:?} ({} live)", slot, sources.len());
        slot
    }

    /// Returns false if the slot was not attached.
    pub fn detach(&self, slot: BusSlot) -> bool {
        let mut sources = self.sources.lock();
        let before = sources.len();
        sources.retain(|(s, _)| *s != slot);
        let removed = sources.len() != before;
        if removed {
            debug!("Detached synth {:?} ({} live)", slot, sources.len());
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sources.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.lock().is_empty()
    }

    /// Mix every attached source into `left`/`right`, overwriting them.
    pub fn render(&self, left: &mut [f32], right: &mut [f32]) {
        let frames = left.len().min(right.len());
        left.fill(0.0);
        right.fill(0.0);

        let sources = self.sources.lock();
        if sources.is_empty() {
            return;
        }

        let mut scratch = self.scratch.lock();
        let (scratch_l, scratch_r) = &mut *scratch;
        scratch_l.resize(frames, 0.0);
        scratch_r.resize(frames, 0.0);

        for (_, source) in sources.iter() {
            source
                .lock()
                .render(&mut scratch_l[..frames], &mut scratch_r[..frames]);

            for i in 0..frames {
                left[i] += scratch_l[i] * self.gain;
                right[i] += scratch_r[i] * self.gain;
            }
        }
    }

    /// Render into an interleaved buffer with `channels` channels. Channels
    /// beyond the second are silent.
    pub fn render_interleaved(&self, output: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        let frames = output.len() / channels;

        let mut mixdown = self.mixdown.lock();
        let (left, right) = &mut *mixdown;
        if left.len() < frames {
            left.resize(frames, 0.0);
            right.resize(frames, 0.0);
        }
        let (left, right) = (&mut left[..frames], &mut right[..frames]);
        self.render(left, right);

        for (frame, samples) in output.chunks_exact_mut(channels).enumerate() {
            for (channel, sample) in samples.iter_mut().enumerate() {
                *sample = match channel {
                    0 if channels == 1 => (left[frame] + right[frame]) * 0.5,
                    0 => left[frame],
                    1 => right[frame],
                    _ => 0.0,
                };
            }
        }
    }
}
