use crate::error::{Error, Result};

/// Checks that a numerical value is in the provided interval `[a,b]`, returning an
/// [`Error::OutOfInterval`] naming the offending expression if not
///
/// ### Example
/// ```ignore
/// let alpha = 2.0;
/// check_interval!(alpha, 0.0, 1.0)?;
/// ```
/// This fails with the message "invalid value for \`alpha\`: 2 is not in the interval \[0, 1\]".
#[macro_export]
macro_rules! check_interval {
    ($var:expr, $a:expr, $b:expr) => {
        $crate::util::interval(stringify!($var), $var, $a, $b)
    };
}

#[doc(hidden)]
pub fn interval(name: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    (value >= min && value <= max)
        .then_some(())
        .ok_or(Error::OutOfInterval {
            name,
            value,
            min,
            max,
        })
}

/// Index of the largest value, keeping the first one on ties (unlike `Iterator::max_by`)
pub(crate) fn argmax(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(best_ix, best), (ix, &v)| {
            if v > best {
                (ix, v)
            } else {
                (best_ix, best)
            }
        })
        .0
}
