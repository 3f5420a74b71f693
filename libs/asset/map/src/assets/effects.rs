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

// Screen-space post effects. Version 2 moved from a fixed
// blend-factor/lookup-image pair per effect to named, typed parameter lists.

use crate::context::{ParsingContext, WritingContext};
use anyhow::{bail, Result};

#[derive(Clone, Debug, PartialEq)]
pub enum PostEffectValue {
    Float(f32),
    Float4([f32; 4]),
    Int(i32),
    Texture(String),
}

impl PostEffectValue {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Float(_) => "Float",
            Self::Float4(_) => "Float4",
            Self::Int(_) => "Int",
            Self::Texture(_) => "Texture",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PostEffectParameter {
    pub name: String,
    pub value: PostEffectValue,
}

impl PostEffectParameter {
    fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        let name = ctx.stream.read_ascii_string()?;
        let type_name = ctx.stream.read_ascii_string()?;
        let value = match type_name.as_str() {
            "Float" => PostEffectValue::Float(ctx.stream.read_f32()?),
            "Float4" => PostEffectValue::Float4([
                ctx.stream.read_f32()?,
                ctx.stream.read_f32()?,
                ctx.stream.read_f32()?,
                ctx.stream.read_f32()?,
            ]),
            "Int" => PostEffectValue::Int(ctx.stream.read_i32()?),
            "Texture" => PostEffectValue::Texture(ctx.stream.read_ascii_string()?),
            _ => bail!(
                "unknown effect parameter type {:?} for parameter {:?}",
                type_name,
                name
            ),
        };
        Ok(Self { name, value })
    }

    fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.stream.write_ascii_string(&self.name)?;
        ctx.stream.write_ascii_string(self.value.type_name())?;
        match &self.value {
            PostEffectValue::Float(v) => ctx.stream.write_f32(*v),
            PostEffectValue::Float4(v) => {
                for component in v {
                    ctx.stream.write_f32(*component);
                }
            }
            PostEffectValue::Int(v) => ctx.stream.write_i32(*v),
            PostEffectValue::Texture(v) => ctx.stream.write_ascii_string(v)?,
        }
        Ok(())
    }
}

/// Per-effect payload; which form is on the wire follows the chunk version.
#[derive(Clone, Debug, PartialEq)]
pub enum PostEffectBody {
    Parameters(Vec<PostEffectParameter>),
    Legacy {
        blend_factor: f32,
        lookup_image: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct PostEffect {
    pub name: String,
    pub body: PostEffectBody,
}

impl PostEffect {
    fn parse(ctx: &mut ParsingContext, version: u16) -> Result<Self> {
        let name = ctx.stream.read_ascii_string()?;
        let body = if version >= 2 {
            let count = ctx.stream.read_u32()?;
            let mut parameters = Vec::with_capacity(count as usize);
            for _ in 0..count {
                parameters.push(PostEffectParameter::parse(ctx)?);
            }
            PostEffectBody::Parameters(parameters)
        } else {
            PostEffectBody::Legacy {
                blend_factor: ctx.stream.read_f32()?,
                lookup_image: ctx.stream.read_ascii_string()?,
            }
        };
        Ok(Self { name, body })
    }

    fn write(&self, ctx: &mut WritingContext, version: u16) -> Result<()> {
        ctx.stream.write_ascii_string(&self.name)?;
        match (&self.body, version >= 2) {
            (PostEffectBody::Parameters(parameters), true) => {
                ctx.stream.write_u32(parameters.len() as u32);
                for parameter in parameters {
                    parameter.write(ctx)?;
                }
            }
            (PostEffectBody::Legacy { blend_factor, lookup_image }, false) => {
                ctx.stream.write_f32(*blend_factor);
                ctx.stream.write_ascii_string(lookup_image)?;
            }
            _ => bail!(
                "post effect {:?} has the wrong payload for chunk version {}",
                self.name,
                version
            ),
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PostEffectsChunk {
    pub version: u16,
    pub effects: Vec<PostEffect>,
}

impl PostEffectsChunk {
    pub const ASSET_NAME: &'static str = "PostEffectsChunk";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let count = if header.version >= 2 {
                ctx.stream.read_u32()?
            } else {
                ctx.stream.read_u8()? as u32
            };
            let mut effects = Vec::with_capacity(count as usize);
            for _ in 0..count {
                effects.push(PostEffect::parse(ctx, header.version)?);
            }
            Ok(Self {
                version: header.version,
                effects,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            if self.version >= 2 {
                ctx.stream.write_u32(self.effects.len() as u32);
            } else {
                ctx.stream.write_u8(self.effects.len() as u8);
            }
            for effect in &self.effects {
                effect.write(ctx, self.version)?;
            }
            Ok(())
        })
    }
}
