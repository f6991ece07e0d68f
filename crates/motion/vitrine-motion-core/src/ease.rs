//! Easing curves addressed by the identifiers page scripts use
//! (`"power3.out"`, `"back.out(1.7)"`, `"none"`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::MotionError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Dir {
    In,
    Out,
    InOut,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Ease {
    Linear,
    /// Polynomial ease of degree `power + 1` (power1 = quad ... power4 = quint).
    Power(u8, Dir),
    /// Overshooting ease-out with the given overshoot strength.
    BackOut(f32),
    /// CSS-style cubic bezier (x1, y1, x2, y2).
    Bezier([f32; 4]),
}

impl Default for Ease {
    fn default() -> Self {
        Ease::Power(1, Dir::Out)
    }
}

impl Ease {
    pub const DEFAULT_BACK: f32 = 1.70158;

    /// Map linear progress to eased progress. `apply(0) == 0`, `apply(1) == 1`.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power(p, dir) => {
                let n = i32::from(p) + 1;
                match dir {
                    Dir::In => t.powi(n),
                    Dir::Out => 1.0 - (1.0 - t).powi(n),
                    Dir::InOut => {
                        if t < 0.5 {
                            (2.0 * t).powi(n) / 2.0
                        } else {
                            1.0 - (2.0 * (1.0 - t)).powi(n) / 2.0
                        }
                    }
                }
            }
            Ease::BackOut(s) => {
                if t >= 1.0 {
                    return 1.0;
                }
                let u = t - 1.0;
                u * u * ((s + 1.0) * u + s) + 1.0
            }
            Ease::Bezier([x1, y1, x2, y2]) => bezier_ease_t(t, x1, y1, x2, y2),
        }
    }

    pub fn identifier(self) -> String {
        match self {
            Ease::Linear => "none".to_string(),
            Ease::Power(p, dir) => {
                let d = match dir {
                    Dir::In => "in",
                    Dir::Out => "out",
                    Dir::InOut => "inOut",
                };
                format!("power{p}.{d}")
            }
            Ease::BackOut(s) => format!("back.out({s})"),
            Ease::Bezier([a, b, c, d]) => format!("cubic-bezier({a},{b},{c},{d})"),
        }
    }
}

#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Invert the x curve by bisection, then evaluate y.
fn bezier_ease_t(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if x1 == 0.0 && y1 == 0.0 && x2 == 1.0 && y2 == 1.0 {
        return t;
    }
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut mid = t;
    for _ in 0..24 {
        let x = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(0.0, y1, y2, 1.0, mid)
}

fn parse_args(s: &str, full: &str) -> Result<Vec<f32>, MotionError> {
    s.split(',')
        .map(|p| {
            p.trim()
                .parse::<f32>()
                .map_err(|_| MotionError::UnknownEase(full.to_string()))
        })
        .collect()
}

impl FromStr for Ease {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let unknown = || MotionError::UnknownEase(raw.to_string());

        if raw.is_empty() || raw == "none" || raw == "linear" {
            return Ok(Ease::Linear);
        }
        if let Some(args) = raw
            .strip_prefix("cubic-bezier(")
            .and_then(|r| r.strip_suffix(')'))
        {
            let v = parse_args(args, raw)?;
            return match v.as_slice() {
                [a, b, c, d] => Ok(Ease::Bezier([*a, *b, *c, *d])),
                _ => Err(unknown()),
            };
        }

        let (family, variant) = raw.split_once('.').unwrap_or((raw, "out"));
        if family == "back" {
            let strength = match variant.strip_prefix("out") {
                Some("") => Ease::DEFAULT_BACK,
                Some(rest) => {
                    let inner = rest
                        .strip_prefix('(')
                        .and_then(|r| r.strip_suffix(')'))
                        .ok_or_else(unknown)?;
                    match parse_args(inner, raw)?.as_slice() {
                        [s] => *s,
                        _ => return Err(unknown()),
                    }
                }
                None => return Err(unknown()),
            };
            return Ok(Ease::BackOut(strength));
        }

        let power = match family {
            "power1" | "quad" => 1,
            "power2" | "cubic" => 2,
            "power3" | "quart" => 3,
            "power4" | "quint" | "strong" => 4,
            _ => return Err(unknown()),
        };
        let dir = match variant {
            "in" => Dir::In,
            "out" => Dir::Out,
            "inOut" => Dir::InOut,
            _ => return Err(unknown()),
        };
        Ok(Ease::Power(power, dir))
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier())
    }
}

impl Serialize for Ease {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.identifier())
    }
}

impl<'de> Deserialize<'de> for Ease {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
