// This file is part of OpenGen.
//
// OpenGen is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// OpenGen is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with OpenGen.  If not, see <http://www.gnu.org/licenses/>.

// Sun and accent lighting for the four times of day. Early versions carry
// separate light sets for terrain, objects and infantry; version 10 collapsed
// them down to the terrain set.

use crate::context::{ParsingContext, WritingContext};
use crate::stream::Vec3;
use anyhow::{bail, ensure, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeOfDay {
    Morning = 1,
    Afternoon = 2,
    Evening = 3,
    Night = 4,
}

impl TimeOfDay {
    pub const ALL: [Self; 4] = [Self::Morning, Self::Afternoon, Self::Evening, Self::Night];

    pub fn from_u32(v: u32) -> Result<Self> {
        Ok(match v {
            1 => Self::Morning,
            2 => Self::Afternoon,
            3 => Self::Evening,
            4 => Self::Night,
            _ => bail!("invalid time of day: {}", v),
        })
    }
}

/// 32-bit ARGB colour, unpacked for callers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColorArgb {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorArgb {
    fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        let value = ctx.stream.read_u32()?;
        Ok(Self {
            a: (value >> 24) as u8,
            r: (value >> 16) as u8,
            g: (value >> 8) as u8,
            b: value as u8,
        })
    }

    fn write(&self, ctx: &mut WritingContext) {
        let value = ((self.a as u32) << 24)
            | ((self.r as u32) << 16)
            | ((self.g as u32) << 8)
            | self.b as u32;
        ctx.stream.write_u32(value);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GlobalLight {
    pub ambient: Vec3,
    pub color: Vec3,
    pub direction: Vec3,
}

impl GlobalLight {
    fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        Ok(Self {
            ambient: ctx.stream.read_vec3()?,
            color: ctx.stream.read_vec3()?,
            direction: ctx.stream.read_vec3()?,
        })
    }

    fn write(&self, ctx: &mut WritingContext) {
        ctx.stream.write_vec3(self.ambient);
        ctx.stream.write_vec3(self.color);
        ctx.stream.write_vec3(self.direction);
    }
}

/// Sun plus two accent lights, each with object and infantry variants in the
/// versions that carry them (objects below 10, infantry from 7 below 10).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlobalLightingConfiguration {
    pub terrain_sun: GlobalLight,
    pub object_sun: Option<GlobalLight>,
    pub infantry_sun: Option<GlobalLight>,
    pub terrain_accent1: GlobalLight,
    pub object_accent1: Option<GlobalLight>,
    pub infantry_accent1: Option<GlobalLight>,
    pub terrain_accent2: GlobalLight,
    pub object_accent2: Option<GlobalLight>,
    pub infantry_accent2: Option<GlobalLight>,
}

/// One terrain light plus its version-dependent object/infantry variants.
fn parse_light_slot(
    ctx: &mut ParsingContext,
    version: u16,
) -> Result<(GlobalLight, Option<GlobalLight>, Option<GlobalLight>)> {
    let terrain = GlobalLight::parse(ctx)?;
    let mut object = None;
    let mut infantry = None;
    if version < 10 {
        object = Some(GlobalLight::parse(ctx)?);
        if version >= 7 {
            infantry = Some(GlobalLight::parse(ctx)?);
        }
    }
    Ok((terrain, object, infantry))
}

fn write_light_slot(
    ctx: &mut WritingContext,
    version: u16,
    terrain: &GlobalLight,
    object: &Option<GlobalLight>,
    infantry: &Option<GlobalLight>,
) -> Result<()> {
    terrain.write(ctx);
    if version < 10 {
        let Some(object) = object else {
            bail!("lighting version {} requires object lights", version);
        };
        object.write(ctx);
        if version >= 7 {
            let Some(infantry) = infantry else {
                bail!("lighting version {} requires infantry lights", version);
            };
            infantry.write(ctx);
        }
    }
    Ok(())
}

impl GlobalLightingConfiguration {
    fn parse(ctx: &mut ParsingContext, version: u16) -> Result<Self> {
        let (terrain_sun, object_sun, infantry_sun) = parse_light_slot(ctx, version)?;
        let (terrain_accent1, object_accent1, infantry_accent1) = parse_light_slot(ctx, version)?;
        let (terrain_accent2, object_accent2, infantry_accent2) = parse_light_slot(ctx, version)?;
        Ok(Self {
            terrain_sun,
            object_sun,
            infantry_sun,
            terrain_accent1,
            object_accent1,
            infantry_accent1,
            terrain_accent2,
            object_accent2,
            infantry_accent2,
        })
    }

    fn write(&self, ctx: &mut WritingContext, version: u16) -> Result<()> {
        write_light_slot(ctx, version, &self.terrain_sun, &self.object_sun, &self.infantry_sun)?;
        write_light_slot(
            ctx,
            version,
            &self.terrain_accent1,
            &self.object_accent1,
            &self.infantry_accent1,
        )?;
        write_light_slot(
            ctx,
            version,
            &self.terrain_accent2,
            &self.object_accent2,
            &self.infantry_accent2,
        )?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GlobalLighting {
    pub version: u16,
    pub time_of_day: TimeOfDay,
    /// One configuration per time of day, in Morning..Night order.
    pub configurations: [GlobalLightingConfiguration; 4],
    pub shadow_color: ColorArgb,
    /// Versions 7..11: an undeciphered block, 44 bytes below 9 and 4 from 9.
    pub unknown: Option<Vec<u8>>,
    /// Version >= 12.
    pub unknown2: Option<Vec3>,
    pub unknown3: Option<ColorArgb>,
    /// Version >= 8.
    pub no_cloud_factor: Option<Vec3>,
}

impl GlobalLighting {
    pub const ASSET_NAME: &'static str = "GlobalLighting";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let time_of_day = TimeOfDay::from_u32(ctx.stream.read_u32()?)?;

            let mut configurations: [GlobalLightingConfiguration; 4] = Default::default();
            for config in configurations.iter_mut() {
                *config = GlobalLightingConfiguration::parse(ctx, header.version)?;
            }

            let shadow_color = ColorArgb::parse(ctx)?;

            let unknown = if (7..11).contains(&header.version) {
                let len = if header.version >= 9 { 4 } else { 44 };
                Some(ctx.stream.read_bytes(len)?.to_vec())
            } else {
                None
            };

            let (mut unknown2, mut unknown3) = (None, None);
            if header.version >= 12 {
                unknown2 = Some(ctx.stream.read_vec3()?);
                unknown3 = Some(ColorArgb::parse(ctx)?);
            }

            let no_cloud_factor = if header.version >= 8 {
                Some(ctx.stream.read_vec3()?)
            } else {
                None
            };

            Ok(Self {
                version: header.version,
                time_of_day,
                configurations,
                shadow_color,
                unknown,
                unknown2,
                unknown3,
                no_cloud_factor,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            ctx.stream.write_u32(self.time_of_day as u32);

            for config in &self.configurations {
                config.write(ctx, self.version)?;
            }

            self.shadow_color.write(ctx);

            if (7..11).contains(&self.version) {
                let Some(unknown) = &self.unknown else {
                    bail!("lighting version {} requires its extra block", self.version);
                };
                let expected = if self.version >= 9 { 4 } else { 44 };
                ensure!(
                    unknown.len() == expected,
                    "lighting extra block must be {} bytes, have {}",
                    expected,
                    unknown.len()
                );
                ctx.stream.write_bytes(unknown);
            }

            if self.version >= 12 {
                let (Some(unknown2), Some(unknown3)) = (self.unknown2, self.unknown3) else {
                    bail!("lighting version {} requires the v12 tail fields", self.version);
                };
                ctx.stream.write_vec3(unknown2);
                unknown3.write(ctx);
            }

            if self.version >= 8 {
                let Some(no_cloud_factor) = self.no_cloud_factor else {
                    bail!("lighting version {} requires a no-cloud factor", self.version);
                };
                ctx.stream.write_vec3(no_cloud_factor);
            }
            Ok(())
        })
    }
}
