/// Elapsed-time floor applied before any WPM division. A first-keystroke
/// completion would otherwise divide by a near-zero interval and blow up
/// to an absurd (or infinite) speed.
pub const MIN_ELAPSED_SECS: f64 = 0.6;

/// Words-per-minute over an elapsed interval, one word = five characters,
/// rounded to the nearest whole number.
pub fn wpm(chars: usize, elapsed_secs: f64) -> u32 {
    let secs = elapsed_secs.max(MIN_ELAPSED_SECS);
    ((chars as f64 / 5.0) / (secs / 60.0)).round() as u32
}

/// Final speed figures for a finished session.
///
/// Normal WPM counts every typed character, errors included; net WPM counts
/// only the correct ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpeedFigures {
    pub normal_wpm: u32,
    pub net_wpm: u32,
}

pub fn speed_figures(typed_chars: usize, correct_chars: usize, elapsed_secs: f64) -> SpeedFigures {
    SpeedFigures {
        normal_wpm: wpm(typed_chars, elapsed_secs),
        net_wpm: wpm(correct_chars, elapsed_secs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wpm_basic() {
        // 300 chars = 60 words in one minute
        assert_eq!(wpm(300, 60.0), 60);
        // 100 chars = 20 words in 30 seconds => 40 WPM
        assert_eq!(wpm(100, 30.0), 40);
    }

    #[test]
    fn test_wpm_rounds_to_nearest() {
        // 7 chars in 60s = 1.4 words/min -> 1
        assert_eq!(wpm(7, 60.0), 1);
        // 8 chars in 60s = 1.6 words/min -> 2
        assert_eq!(wpm(8, 60.0), 2);
    }

    #[test]
    fn test_wpm_floors_degenerate_elapsed() {
        // Zero and negative elapsed must not produce infinity or NaN
        let at_floor = wpm(5, MIN_ELAPSED_SECS);
        assert_eq!(wpm(5, 0.0), at_floor);
        assert_eq!(wpm(5, -1.0), at_floor);
        assert_eq!(wpm(5, 0.0001), at_floor);
        // 5 chars / 0.6s = 1 word per 0.01 min = 100 WPM
        assert_eq!(at_floor, 100);
    }

    #[test]
    fn test_wpm_monotonic_in_chars() {
        let elapsed = 42.0;
        let mut prev = 0;
        for chars in 0..500 {
            let current = wpm(chars, elapsed);
            assert!(current >= prev, "wpm regressed at {chars} chars");
            prev = current;
        }
    }

    #[test]
    fn test_wpm_zero_chars() {
        assert_eq!(wpm(0, 60.0), 0);
        assert_eq!(wpm(0, 0.0), 0);
    }

    #[test]
    fn test_speed_figures_net_at_most_normal() {
        let figures = speed_figures(200, 150, 60.0);
        assert!(figures.net_wpm <= figures.normal_wpm);
        assert_eq!(figures.normal_wpm, 40);
        assert_eq!(figures.net_wpm, 30);
    }

    #[test]
    fn test_speed_figures_equal_when_error_free() {
        let figures = speed_figures(120, 120, 45.0);
        assert_eq!(figures.normal_wpm, figures.net_wpm);
    }
}
