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

// BfME castle build-outs: template placements plus an optional wall
// perimeter whose point encoding changed from int triples to float pairs at
// version 3.

use crate::context::{ParsingContext, PropertyKey, WritingContext};
use crate::stream::Vec3;
use anyhow::{bail, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct CastleTemplate {
    pub name: String,
    pub template_name: String,
    pub offset: Vec3,
    pub angle: f32,
    /// Version >= 4.
    pub priority: Option<u32>,
    pub phase: Option<u32>,
}

impl CastleTemplate {
    fn parse(ctx: &mut ParsingContext, version: u16) -> Result<Self> {
        let name = ctx.stream.read_ascii_string()?;
        let template_name = ctx.stream.read_ascii_string()?;
        let offset = ctx.stream.read_vec3()?;
        let angle = ctx.stream.read_f32()?;

        let (mut priority, mut phase) = (None, None);
        if version >= 4 {
            priority = Some(ctx.stream.read_u32()?);
            phase = Some(ctx.stream.read_u32()?);
        }
        Ok(Self {
            name,
            template_name,
            offset,
            angle,
            priority,
            phase,
        })
    }

    fn write(&self, ctx: &mut WritingContext, version: u16) -> Result<()> {
        ctx.stream.write_ascii_string(&self.name)?;
        ctx.stream.write_ascii_string(&self.template_name)?;
        ctx.stream.write_vec3(self.offset);
        ctx.stream.write_f32(self.angle);
        if version >= 4 {
            let (Some(priority), Some(phase)) = (self.priority, self.phase) else {
                bail!("castle template {:?} is missing its v4 priority/phase", self.name);
            };
            ctx.stream.write_u32(priority);
            ctx.stream.write_u32(phase);
        }
        Ok(())
    }
}

/// Perimeter point; int triple below version 3, float pair (z = 0) after.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerimeterPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl PerimeterPoint {
    fn parse(ctx: &mut ParsingContext, version: u16) -> Result<Self> {
        if version >= 3 {
            Ok(Self {
                x: ctx.stream.read_f32()?,
                y: ctx.stream.read_f32()?,
                z: 0.0,
            })
        } else {
            Ok(Self {
                x: ctx.stream.read_i32()? as f32,
                y: ctx.stream.read_i32()? as f32,
                z: ctx.stream.read_i32()? as f32,
            })
        }
    }

    fn write(&self, ctx: &mut WritingContext, version: u16) {
        if version >= 3 {
            ctx.stream.write_f32(self.x);
            ctx.stream.write_f32(self.y);
        } else {
            ctx.stream.write_i32(self.x as i32);
            ctx.stream.write_i32(self.y as i32);
            ctx.stream.write_i32(self.z as i32);
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CastlePerimeter {
    pub has_perimeter: bool,
    pub name: Option<String>,
    pub points: Vec<PerimeterPoint>,
}

impl CastlePerimeter {
    fn parse(ctx: &mut ParsingContext, version: u16) -> Result<Self> {
        let has_perimeter = ctx.stream.read_bool_u32_checked()?;
        let mut name = None;
        let mut points = Vec::new();
        if has_perimeter {
            name = Some(ctx.stream.read_ascii_string()?);
            let count = ctx.stream.read_u32()?;
            for _ in 0..count {
                points.push(PerimeterPoint::parse(ctx, version)?);
            }
        }
        Ok(Self {
            has_perimeter,
            name,
            points,
        })
    }

    fn write(&self, ctx: &mut WritingContext, version: u16) -> Result<()> {
        ctx.stream.write_bool_u32(self.has_perimeter);
        if self.has_perimeter {
            ctx.stream
                .write_ascii_string(self.name.as_deref().unwrap_or(""))?;
            ctx.stream.write_u32(self.points.len() as u32);
            for point in &self.points {
                point.write(ctx, version);
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CastleTemplates {
    pub version: u16,
    /// The faction this castle belongs to, as a name-table reference.
    pub property_key: PropertyKey,
    pub templates: Vec<CastleTemplate>,
    /// Version >= 2.
    pub perimeter: Option<CastlePerimeter>,
}

impl CastleTemplates {
    pub const ASSET_NAME: &'static str = "CastleTemplates";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let property_key = ctx.parse_property_key()?;
            let count = ctx.stream.read_u32()?;
            let mut templates = Vec::with_capacity(count as usize);
            for _ in 0..count {
                templates.push(CastleTemplate::parse(ctx, header.version)?);
            }
            let perimeter = if header.version >= 2 {
                Some(CastlePerimeter::parse(ctx, header.version)?)
            } else {
                None
            };
            Ok(Self {
                version: header.version,
                property_key,
                templates,
                perimeter,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            ctx.write_property_key(&self.property_key)?;
            ctx.stream.write_u32(self.templates.len() as u32);
            for template in &self.templates {
                template.write(ctx, self.version)?;
            }
            if self.version >= 2 {
                let Some(perimeter) = &self.perimeter else {
                    bail!("castle templates v{} require a perimeter record", self.version);
                };
                perimeter.write(ctx, self.version)?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{NameTable, PropertyKind};
    use crate::stream::BinaryReader;

    fn key(names: &mut NameTable) -> PropertyKey {
        let index = names.intern("MenFortress");
        PropertyKey {
            kind: PropertyKind::AsciiString,
            name_index: index,
            name: Some("MenFortress".to_owned()),
        }
    }

    fn template(version: u16) -> CastleTemplate {
        CastleTemplate {
            name: "keep".to_owned(),
            template_name: "GondorKeep".to_owned(),
            offset: Vec3 { x: 10.0, y: -4.0, z: 0.0 },
            angle: 1.25,
            priority: (version >= 4).then_some(1),
            phase: (version >= 4).then_some(0),
        }
    }

    #[test]
    fn perimeter_points_change_encoding_at_version_3() -> Result<()> {
        for version in [2u16, 3, 4] {
            let mut names = NameTable::new();
            let templates = CastleTemplates {
                version,
                property_key: key(&mut names),
                templates: vec![template(version)],
                perimeter: Some(CastlePerimeter {
                    has_perimeter: true,
                    name: Some("wall".to_owned()),
                    points: vec![
                        PerimeterPoint { x: 1.0, y: 2.0, z: 0.0 },
                        PerimeterPoint { x: -3.0, y: 4.0, z: 0.0 },
                    ],
                }),
            };
            let mut out = WritingContext::new(names);
            templates.write(&mut out)?;
            let bytes = out.stream.into_bytes();
            let mut ctx = ParsingContext::new(BinaryReader::new(&bytes), out.names.clone());
            assert_eq!(CastleTemplates::parse(&mut ctx)?, templates, "version {version}");
        }
        Ok(())
    }

    #[test]
    fn absent_perimeter_is_a_single_flag() -> Result<()> {
        let mut names = NameTable::new();
        let templates = CastleTemplates {
            version: 2,
            property_key: key(&mut names),
            templates: Vec::new(),
            perimeter: Some(CastlePerimeter {
                has_perimeter: false,
                name: None,
                points: Vec::new(),
            }),
        };
        let mut out = WritingContext::new(names);
        templates.write(&mut out)?;
        let bytes = out.stream.into_bytes();
        let mut ctx = ParsingContext::new(BinaryReader::new(&bytes), out.names.clone());
        assert_eq!(CastleTemplates::parse(&mut ctx)?, templates);
        Ok(())
    }
}
