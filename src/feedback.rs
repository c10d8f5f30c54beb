use std::sync::Arc;
use std::time::Duration;

use crate::capability::{ToneEmitter, Waveform};
use crate::models::NotificationKind;
use crate::scheduler::Scheduler;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneCue {
    pub frequency_hz: f32,
    pub duration_sec: f32,
    pub waveform: Waveform,
    pub delay_ms: u64,
}

const fn cue(frequency_hz: f32, duration_sec: f32, waveform: Waveform, delay_ms: u64) -> ToneCue {
    ToneCue {
        frequency_hz,
        duration_sec,
        waveform,
        delay_ms,
    }
}

// C5, E5, G5.
const SUCCESS: [ToneCue; 3] = [
    cue(523.0, 0.15, Waveform::Sine, 0),
    cue(659.0, 0.15, Waveform::Sine, 100),
    cue(784.0, 0.2, Waveform::Sine, 200),
];

const ERROR: [ToneCue; 2] = [
    cue(220.0, 0.3, Waveform::Square, 0),
    cue(196.0, 0.3, Waveform::Square, 150),
];

const INFO: [ToneCue; 2] = [
    cue(440.0, 0.15, Waveform::Sine, 0),
    cue(554.0, 0.15, Waveform::Sine, 100),
];

const FALLBACK: [ToneCue; 1] = [cue(440.0, 0.1, Waveform::Sine, 0)];

pub fn tone_sequence(kind: NotificationKind) -> &'static [ToneCue] {
    match kind {
        NotificationKind::Success => &SUCCESS,
        NotificationKind::Error => &ERROR,
        NotificationKind::Info => &INFO,
    }
}

/// Lookup by free-form label; unknown labels get a single short tone.
pub fn tone_sequence_for_label(label: &str) -> &'static [ToneCue] {
    match label.parse::<NotificationKind>() {
        Ok(kind) => tone_sequence(kind),
        Err(_) => &FALLBACK,
    }
}

/// Plays tone sequences through the emitter. Later cues are staggered on the
/// scheduler and are never cancelled once queued.
#[derive(Clone)]
pub struct FeedbackSignaler {
    tones: Arc<dyn ToneEmitter>,
    scheduler: Arc<dyn Scheduler>,
}

impl FeedbackSignaler {
    pub fn new(tones: Arc<dyn ToneEmitter>, scheduler: Arc<dyn Scheduler>) -> Self {
        Self { tones, scheduler }
    }

    pub fn signal(&self, kind: NotificationKind) {
        self.play_sequence(tone_sequence(kind));
    }

    pub fn play_sequence(&self, cues: &[ToneCue]) {
        for cue in cues.iter().copied() {
            if cue.delay_ms == 0 {
                play_cue(self.tones.as_ref(), cue);
                continue;
            }
            let tones = Arc::clone(&self.tones);
            self.scheduler.schedule(
                Duration::from_millis(cue.delay_ms),
                Box::new(move || play_cue(tones.as_ref(), cue)),
            );
        }
    }
}

fn play_cue(tones: &dyn ToneEmitter, cue: ToneCue) {
    if let Err(error) = tones.play(cue.frequency_hz, cue.duration_sec, cue.waveform) {
        log::warn!("audio feedback failed: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CapabilityError;
    use crate::scheduler::ManualScheduler;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTones {
        played: Mutex<Vec<(f32, Waveform)>>,
    }

    impl ToneEmitter for RecordingTones {
        fn play(
            &self,
            frequency_hz: f32,
            _duration_sec: f32,
            waveform: Waveform,
        ) -> Result<(), CapabilityError> {
            self.played.lock().unwrap().push((frequency_hz, waveform));
            Ok(())
        }
    }

    struct BrokenTones;

    impl ToneEmitter for BrokenTones {
        fn play(&self, _: f32, _: f32, _: Waveform) -> Result<(), CapabilityError> {
            Err(CapabilityError::Unavailable("audio context"))
        }
    }

    #[test]
    fn success_is_an_ascending_chime() {
        let cues = tone_sequence(NotificationKind::Success);
        let freqs: Vec<f32> = cues.iter().map(|c| c.frequency_hz).collect();
        let delays: Vec<u64> = cues.iter().map(|c| c.delay_ms).collect();
        assert_eq!(freqs, vec![523.0, 659.0, 784.0]);
        assert_eq!(delays, vec![0, 100, 200]);
        assert_eq!(cues[2].duration_sec, 0.2);
        assert!(cues.iter().all(|c| c.waveform == Waveform::Sine));
    }

    #[test]
    fn error_is_two_descending_square_beeps() {
        let cues = tone_sequence(NotificationKind::Error);
        assert_eq!(cues.len(), 2);
        assert_eq!((cues[0].frequency_hz, cues[0].delay_ms), (220.0, 0));
        assert_eq!((cues[1].frequency_hz, cues[1].delay_ms), (196.0, 150));
        assert!(cues.iter().all(|c| c.waveform == Waveform::Square && c.duration_sec == 0.3));
    }

    #[test]
    fn info_and_unknown_labels() {
        let info = tone_sequence_for_label("info");
        assert_eq!(info.iter().map(|c| c.frequency_hz).collect::<Vec<_>>(), vec![440.0, 554.0]);

        let unknown = tone_sequence_for_label("celebrate");
        assert_eq!(unknown, &[cue(440.0, 0.1, Waveform::Sine, 0)]);
    }

    #[test]
    fn signal_plays_first_tone_now_and_staggers_the_rest() {
        let tones = Arc::new(RecordingTones::default());
        let scheduler = Arc::new(ManualScheduler::new());
        let signaler = FeedbackSignaler::new(tones.clone(), scheduler.clone());

        signaler.signal(NotificationKind::Success);
        assert_eq!(tones.played.lock().unwrap().len(), 1);
        assert_eq!(scheduler.pending(), 2);

        scheduler.advance(Duration::from_millis(100));
        assert_eq!(tones.played.lock().unwrap().len(), 2);
        scheduler.advance(Duration::from_millis(100));
        let played: Vec<f32> = tones.played.lock().unwrap().iter().map(|(f, _)| *f).collect();
        assert_eq!(played, vec![523.0, 659.0, 784.0]);
    }

    #[test]
    fn emitter_failures_are_swallowed() {
        let scheduler = Arc::new(ManualScheduler::new());
        let signaler = FeedbackSignaler::new(Arc::new(BrokenTones), scheduler.clone());
        signaler.signal(NotificationKind::Error);
        assert_eq!(scheduler.advance(Duration::from_secs(1)), 1);
    }
}
