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

use crate::context::{ParsingContext, WritingContext};
use crate::stream::Vec3;
use anyhow::Result;

#[derive(Clone, Debug, PartialEq)]
pub struct EnvironmentData {
    pub version: u16,
    /// Version >= 3.
    pub water_max_alpha_depth: Option<f32>,
    pub deep_water_alpha: Option<f32>,
    /// Version < 5.
    pub is_macro_texture_stretched: Option<bool>,
    pub macro_texture: String,
    pub cloud_texture: String,
    /// Version >= 4.
    pub unknown_texture: Option<String>,
    /// Version >= 6, and only when bytes remain in the asset.
    pub unknown_texture2: Option<String>,
}

impl EnvironmentData {
    pub const ASSET_NAME: &'static str = "EnvironmentData";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let (mut water_max_alpha_depth, mut deep_water_alpha) = (None, None);
            if header.version >= 3 {
                water_max_alpha_depth = Some(ctx.stream.read_f32()?);
                deep_water_alpha = Some(ctx.stream.read_f32()?);
            }

            let is_macro_texture_stretched = if header.version < 5 {
                Some(ctx.stream.read_bool()?)
            } else {
                None
            };

            let macro_texture = ctx.stream.read_ascii_string()?;
            let cloud_texture = ctx.stream.read_ascii_string()?;

            let unknown_texture = if header.version >= 4 {
                Some(ctx.stream.read_ascii_string()?)
            } else {
                None
            };

            let unknown_texture2 =
                if header.version >= 6 && ctx.stream.position() < header.end {
                    Some(ctx.stream.read_ascii_string()?)
                } else {
                    None
                };

            Ok(Self {
                version: header.version,
                water_max_alpha_depth,
                deep_water_alpha,
                is_macro_texture_stretched,
                macro_texture,
                cloud_texture,
                unknown_texture,
                unknown_texture2,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            if self.version >= 3 {
                ctx.stream.write_f32(self.water_max_alpha_depth.unwrap_or(0.0));
                ctx.stream.write_f32(self.deep_water_alpha.unwrap_or(0.0));
            }
            if self.version < 5 {
                ctx.stream
                    .write_bool(self.is_macro_texture_stretched.unwrap_or(false));
            }
            ctx.stream.write_ascii_string(&self.macro_texture)?;
            ctx.stream.write_ascii_string(&self.cloud_texture)?;
            if self.version >= 4 {
                ctx.stream
                    .write_ascii_string(self.unknown_texture.as_deref().unwrap_or(""))?;
            }
            if self.version >= 6 {
                if let Some(texture) = &self.unknown_texture2 {
                    ctx.stream.write_ascii_string(texture)?;
                }
            }
            Ok(())
        })
    }
}

/// A single undeciphered word; present in BfME II maps.
#[derive(Clone, Debug, PartialEq)]
pub struct FogSettings {
    pub version: u16,
    pub unknown: u32,
}

impl FogSettings {
    pub const ASSET_NAME: &'static str = "FogSettings";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            Ok(Self {
                version: header.version,
                unknown: ctx.stream.read_u32()?,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            ctx.stream.write_u32(self.unknown);
            Ok(())
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SkyboxSettings {
    pub version: u16,
    pub position: Vec3,
    pub scale: f32,
    pub rotation: f32,
    pub texture_scheme: String,
}

impl SkyboxSettings {
    pub const ASSET_NAME: &'static str = "SkyboxSettings";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            Ok(Self {
                version: header.version,
                position: ctx.stream.read_vec3()?,
                scale: ctx.stream.read_f32()?,
                rotation: ctx.stream.read_f32()?,
                texture_scheme: ctx.stream.read_ascii_string()?,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            ctx.stream.write_vec3(self.position);
            ctx.stream.write_f32(self.scale);
            ctx.stream.write_f32(self.rotation);
            ctx.stream.write_ascii_string(&self.texture_scheme)
        })
    }
}
