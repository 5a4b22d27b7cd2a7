/// Decoded mono audio ready for loudness analysis
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSignal {
    /// Mono samples, nominally in [-1.0, 1.0]
    pub samples: Vec<f32>,

    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioSignal {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self { samples, sample_rate }
    }

    /// Duration in seconds, zero when the sample rate is unset
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Frame geometry helpers
///
/// A frame is `frame_length` consecutive samples starting at
/// `index * hop_length`. Only full frames exist: a trailing remainder shorter
/// than `frame_length` is never scored.
pub struct Frame;

impl Frame {
    /// Number of full frames that fit in `len` samples
    pub fn count(len: usize, frame_length: usize, hop_length: usize) -> usize {
        if frame_length == 0 || hop_length == 0 || len < frame_length {
            return 0;
        }
        (len - frame_length) / hop_length + 1
    }

    /// Start time of a frame in seconds
    ///
    /// Frames are unpadded, so this is where the frame begins, not its centre.
    pub fn time(index: usize, hop_length: usize, sample_rate: u32) -> f64 {
        (index * hop_length) as f64 / sample_rate as f64
    }
}

/// RMS score of one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameEnergy {
    /// Frame index
    pub index: usize,

    /// Frame timestamp in seconds
    pub time: f64,

    /// Root-mean-square amplitude
    pub rms: f64,
}

/// One of the loudest frames, as selected by the peak detector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Timestamp in seconds
    pub time: f64,

    /// RMS energy of the frame this peak came from
    pub rms: f64,

    /// Index of that frame
    pub frame_index: usize,
}

impl From<FrameEnergy> for Peak {
    fn from(energy: FrameEnergy) -> Self {
        Self {
            time: energy.time,
            rms: energy.rms,
            frame_index: energy.index,
        }
    }
}

/// Parameters for peak detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakParams {
    /// How many peaks to keep
    pub topk: usize,

    /// Samples per frame
    pub frame_length: usize,

    /// Samples between frame starts
    pub hop_length: usize,
}

impl Default for PeakParams {
    fn default() -> Self {
        Self {
            topk: 20,
            frame_length: 4096,
            hop_length: 2048,
        }
    }
}
