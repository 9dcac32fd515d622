use crate::{
    check_interval,
    error::{Error, Result},
};

/// An implementation of a time-decaying value
pub trait Decay {
    /// Calculate value at time `t`
    fn evaluate(&self, t: f32) -> f32;
}

fn validate(vi: f32, vf: f32) -> Result<()> {
    check_interval!(vi, 0.0, 1.0)?;
    check_interval!(vf, 0.0, 1.0)?;
    (vi >= vf)
        .then_some(())
        .ok_or_else(|| Error::InvalidDecay(format!("start {vi} is below end {vf}")))
}

/// A constant value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constant {
    value: f32,
}

impl Constant {
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl Decay for Constant {
    fn evaluate(&self, _t: f32) -> f32 {
        self.value
    }
}

/// v(t) = max(v<sub>i</sub> - t(v<sub>i</sub> - v<sub>f</sub>) / n, v<sub>f</sub>)
///
/// Drops by an equal amount each unit of time and lands on exactly v<sub>f</sub> at
/// `t = n`, never overshooting it.
#[derive(Debug, Clone, PartialEq)]
pub struct Linear {
    vi: f32,
    vf: f32,
    steps: f32,
}

impl Linear {
    /// Anneal from `vi` to `vf` over `steps` units of time
    pub fn new(vi: f32, vf: f32, steps: u32) -> Result<Self> {
        validate(vi, vf)?;
        if steps == 0 {
            return Err(Error::InvalidDecay(String::from(
                "a linear schedule needs at least one step",
            )));
        }
        Ok(Self {
            vi,
            vf,
            steps: steps as f32,
        })
    }
}

impl Decay for Linear {
    fn evaluate(&self, t: f32) -> f32 {
        let &Self { vi, vf, steps } = self;
        if t >= steps {
            return vf;
        }
        (vi - (vi - vf) * t / steps).max(vf)
    }
}
