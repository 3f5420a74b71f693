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

use crate::context::{ParsingContext, Property, WritingContext};
use crate::stream::Vec3;
use anyhow::{ensure, Result};

/// A placed map entity: a unit, structure, road segment or waypoint.
#[derive(Clone, Debug, PartialEq)]
pub struct MapObject {
    pub version: u16,
    pub position: Vec3,
    pub angle: f32,
    pub road_type: u32,
    pub type_name: String,
    pub properties: Vec<Property>,
}

impl MapObject {
    pub const ASSET_NAME: &'static str = "Object";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            Ok(Self {
                version: header.version,
                position: ctx.stream.read_vec3()?,
                angle: ctx.stream.read_f32()?,
                road_type: ctx.stream.read_u32()?,
                type_name: ctx.stream.read_ascii_string()?,
                properties: ctx.parse_properties()?,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            ctx.stream.write_vec3(self.position);
            ctx.stream.write_f32(self.angle);
            ctx.stream.write_u32(self.road_type);
            ctx.stream.write_ascii_string(&self.type_name)?;
            ctx.write_properties(&self.properties)
        })
    }
}

/// Back-to-back `Object` children, bounded only by the list's datasize.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectsList {
    pub version: u16,
    pub objects: Vec<MapObject>,
}

impl ObjectsList {
    pub const ASSET_NAME: &'static str = "ObjectsList";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let mut objects = Vec::new();
            while ctx.stream.position() < header.end {
                let name = ctx.parse_asset_name()?;
                ensure!(
                    name == MapObject::ASSET_NAME,
                    "expected {} asset in ObjectsList, got {}",
                    MapObject::ASSET_NAME,
                    name
                );
                objects.push(MapObject::parse(ctx)?);
            }
            Ok(Self {
                version: header.version,
                objects,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            for object in &self.objects {
                ctx.write_asset_name(MapObject::ASSET_NAME)?;
                object.write(ctx)?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{NameTable, PropertyValue};
    use crate::stream::BinaryReader;

    #[test]
    fn objects_round_trip_with_their_properties() -> Result<()> {
        let list = ObjectsList {
            version: 3,
            objects: vec![
                MapObject {
                    version: 3,
                    position: Vec3 { x: 10.0, y: 20.0, z: 0.0 },
                    angle: 1.5,
                    road_type: 0,
                    type_name: "AmericaTankCrusader".to_owned(),
                    properties: vec![Property {
                        name: "objectInitialHealth".to_owned(),
                        value: PropertyValue::Integer(100),
                    }],
                },
                MapObject {
                    version: 3,
                    position: Vec3 { x: -5.0, y: 0.5, z: 2.0 },
                    angle: 0.0,
                    road_type: 2,
                    type_name: "TwoLaneDarkDotted".to_owned(),
                    properties: Vec::new(),
                },
            ],
        };

        let mut names = NameTable::new();
        names.intern(MapObject::ASSET_NAME);
        let mut out = WritingContext::new(names);
        list.write(&mut out)?;

        let bytes = out.stream.into_bytes();
        let mut ctx = ParsingContext::new(BinaryReader::new(&bytes), out.names.clone());
        let back = ObjectsList::parse(&mut ctx)?;
        assert_eq!(back, list);
        Ok(())
    }
}
