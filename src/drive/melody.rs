//! Greeting tune played on one axis.
//!
//! A stepper sings at its step clock, so each note is a burst of steps at the
//! note's frequency. Bursts alternate direction and the axis is returned to
//! where it started at the end.

use embedded_hal::delay::DelayNs;

use crate::config::units::{Hertz, Steps};
use crate::device::StepperDevice;
use crate::error::Result;

/// Gap added after every beat in milliseconds.
pub const BEAT_GAP_MS: u32 = 50;

/// Notes used by the greeting. `High` variants are one octave up.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Note {
    C,
    D,
    E,
    F,
    G,
    GSharp,
    A,
    ASharp,
    B,
    CHigh,
    CSharpHigh,
    DHigh,
    DSharpHigh,
    EHigh,
    FHigh,
    FSharpHigh,
    GHigh,
    GSharpHigh,
    AHigh,
}

impl Note {
    /// Pitch in whole hertz.
    pub const fn hz(self) -> u32 {
        match self {
            Note::C => 261,
            Note::D => 294,
            Note::E => 329,
            Note::F => 349,
            Note::G => 391,
            Note::GSharp => 415,
            Note::A => 440,
            Note::ASharp => 455,
            Note::B => 466,
            Note::CHigh => 523,
            Note::CSharpHigh => 554,
            Note::DHigh => 587,
            Note::DSharpHigh => 622,
            Note::EHigh => 659,
            Note::FHigh => 698,
            Note::FSharpHigh => 740,
            Note::GHigh => 784,
            Note::GSharpHigh => 830,
            Note::AHigh => 880,
        }
    }

    /// Pitch as a step clock.
    pub fn frequency(self) -> Hertz {
        Hertz(self.hz() as f32)
    }
}

/// One entry of a tune: a note (or a rest) and its length in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Beat {
    /// `None` for a rest.
    pub note: Option<Note>,
    /// Length in milliseconds.
    pub duration_ms: u32,
}

impl Beat {
    const fn note(note: Note, duration_ms: u32) -> Self {
        Self {
            note: Some(note),
            duration_ms,
        }
    }

    const fn rest(duration_ms: u32) -> Self {
        Self {
            note: None,
            duration_ms,
        }
    }

    /// Unsigned step count for this beat, `trunc(hz * duration / 1000)`.
    pub const fn steps(&self) -> u32 {
        match self.note {
            Some(note) => note.hz() * self.duration_ms / 1000,
            None => 0,
        }
    }
}

mod sections {
    use super::Beat;
    use super::Note::*;

    const OPENING: &[Beat] = &[
        Beat::note(A, 500),
        Beat::note(A, 500),
        Beat::note(A, 500),
        Beat::note(F, 350),
        Beat::note(CHigh, 150),
        Beat::note(A, 500),
        Beat::note(F, 350),
        Beat::note(CHigh, 150),
        Beat::note(A, 650),
        Beat::rest(500),
        Beat::note(EHigh, 500),
        Beat::note(EHigh, 500),
        Beat::note(EHigh, 500),
        Beat::note(FHigh, 350),
        Beat::note(CHigh, 150),
        Beat::note(GSharp, 500),
        Beat::note(F, 350),
        Beat::note(CHigh, 150),
        Beat::note(A, 650),
        Beat::rest(500),
    ];

    const BRIDGE: &[Beat] = &[
        Beat::note(AHigh, 500),
        Beat::note(A, 300),
        Beat::note(A, 150),
        Beat::note(AHigh, 500),
        Beat::note(GSharpHigh, 325),
        Beat::note(FSharpHigh, 125),
        Beat::note(FHigh, 125),
        Beat::note(FSharpHigh, 250),
        Beat::rest(325),
        Beat::note(ASharp, 250),
        Beat::note(DSharpHigh, 500),
        Beat::note(DHigh, 325),
        Beat::note(CSharpHigh, 175),
        Beat::note(CHigh, 125),
        Beat::note(B, 125),
        Beat::note(CHigh, 250),
        Beat::rest(350),
    ];

    const TURN: &[Beat] = &[
        Beat::note(F, 250),
        Beat::note(GSharp, 500),
        Beat::note(F, 350),
        Beat::note(A, 125),
        Beat::note(CHigh, 500),
        Beat::note(A, 375),
        Beat::note(CHigh, 125),
        Beat::note(EHigh, 650),
        Beat::rest(500),
    ];

    const CLOSING: &[Beat] = &[
        Beat::note(F, 250),
        Beat::note(GSharp, 500),
        Beat::note(F, 375),
        Beat::note(CHigh, 125),
        Beat::note(A, 500),
        Beat::note(F, 375),
        Beat::note(CHigh, 125),
        Beat::note(A, 650),
        Beat::rest(650),
    ];

    pub(super) const GREETING: [&[Beat]; 5] = [OPENING, BRIDGE, TURN, BRIDGE, CLOSING];
}

/// The greeting tune, beat by beat.
pub fn greeting() -> impl Iterator<Item = Beat> {
    sections::GREETING.into_iter().flat_map(|section| section.iter().copied())
}

/// Play a tune on `axis` and return to the starting position.
///
/// The direction flips after every beat, rests included. Returns the net
/// offset that was undone by the final move.
///
/// # Errors
///
/// Stops at the first device error; the axis is then left off origin.
pub fn play<D, W, I>(device: &mut D, axis: &str, tune: I, delay: &mut W) -> Result<Steps>
where
    D: StepperDevice + ?Sized,
    W: DelayNs,
    I: IntoIterator<Item = Beat>,
{
    let mut net = Steps::ZERO;
    let mut up = true;

    for beat in tune {
        if let Some(note) = beat.note {
            let magnitude = Steps(i64::from(beat.steps()));
            let steps = if up { magnitude } else { -magnitude };
            device.set_frequency(axis, note.frequency())?;
            net = net + steps;
            device.move_steps(axis, steps)?;
        }
        delay.delay_ms(beat.duration_ms + BEAT_GAP_MS);
        up = !up;
    }

    device.move_steps(axis, -net)?;
    Ok(net)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::units::Volts;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use Note::*;

    #[derive(Default)]
    struct Log {
        frequencies: std::vec::Vec<f32>,
        moves: std::vec::Vec<i64>,
    }

    impl StepperDevice for Log {
        fn set_frequency(&mut self, _axis: &str, frequency: Hertz) -> Result<()> {
            self.frequencies.push(frequency.0);
            Ok(())
        }

        fn set_voltage(&mut self, _axis: &str, _voltage: Volts) -> Result<()> {
            Ok(())
        }

        fn move_steps(&mut self, _axis: &str, steps: Steps) -> Result<()> {
            self.moves.push(steps.0);
            Ok(())
        }

        fn stop_all(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_beat_steps_truncate() {
        // 349 * 350 / 1000 = 122.15
        assert_eq!(Beat::note(F, 350).steps(), 122);
        assert_eq!(Beat::note(A, 500).steps(), 220);
        assert_eq!(Beat::rest(500).steps(), 0);
    }

    #[test]
    fn test_greeting_shape() {
        assert_eq!(greeting().count(), 20 + 17 + 9 + 17 + 9);
        // two in the opening, two per bridge, one each in the turn and close
        assert_eq!(greeting().filter(|b| b.note.is_none()).count(), 8);
        assert_eq!(greeting().next(), Some(Beat::note(A, 500)));
    }

    #[test]
    fn test_rests_flip_direction() {
        let tune = [
            Beat::note(A, 500),
            Beat::rest(100),
            Beat::note(A, 500),
            Beat::note(C, 1000),
        ];
        let mut device = Log::default();

        let net = play(&mut device, "x", tune, &mut NoopDelay::new()).unwrap();

        // up, (rest flips to down), up again, then down
        assert_eq!(device.moves, [220, 220, -261, -179]);
        assert_eq!(net, Steps(179));
        assert_eq!(device.frequencies, [440.0, 440.0, 261.0]);
    }

    #[test]
    fn test_greeting_returns_to_origin() {
        let mut device = Log::default();
        play(&mut device, "x", greeting(), &mut NoopDelay::new()).unwrap();
        assert_eq!(device.moves.iter().sum::<i64>(), 0);
    }
}
