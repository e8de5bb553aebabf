// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! RGBA color type used as a scale output and as a fill attribute.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// RGBA color with 8-bit components.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

/// Error returned when a color string cannot be parsed.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("unrecognized color `{0}`")]
pub struct ParseColorError(pub String);

impl Color {
    /// Create a color with explicit RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// CSS `blue`.
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    /// CSS `steelblue`.
    pub const STEELBLUE: Self = Self::rgb(70, 130, 180);
    /// CSS `lightgray`.
    pub const LIGHTGRAY: Self = Self::rgb(211, 211, 211);

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa` or one of a few CSS names.
    pub fn parse(s: &str) -> Result<Self, ParseColorError> {
        let err = || ParseColorError(s.to_string());
        let t = s.trim();
        if let Some(hex) = t.strip_prefix('#') {
            let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).map_err(|_| err());
            let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
            if !hex.is_ascii() {
                return Err(err());
            }
            return match hex.len() {
                3 => Ok(Self::rgb(
                    nibble(0)? * 17,
                    nibble(1)? * 17,
                    nibble(2)? * 17,
                )),
                6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
                8 => Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
                _ => Err(err()),
            };
        }
        match t.to_ascii_lowercase().as_str() {
            "steelblue" => Ok(Self::STEELBLUE),
            "blue" => Ok(Self::BLUE),
            "black" => Ok(Self::BLACK),
            "white" => Ok(Self::WHITE),
            "lightgray" | "lightgrey" => Ok(Self::LIGHTGRAY),
            "none" | "transparent" => Ok(Self::TRANSPARENT),
            _ => Err(err()),
        }
    }

    /// `#rrggbb` (or `#rrggbbaa` when not opaque).
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Component-wise RGB interpolation; `t` is clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| {
            let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                reason = "Value is rounded and clamped to the u8 range."
            )]
            let out = v.round().clamp(0.0, 255.0) as u8;
            out
        };
        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
