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
use anyhow::Result;
use log::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssetListItem {
    pub type_id: u32,
    pub instance_id: u32,
}

/// Referenced game asset ids. Its mere presence in a map switches SidesList
/// and BuildLists into their BfME wire form.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetList {
    pub version: u16,
    pub items: Vec<AssetListItem>,
}

impl AssetList {
    pub const ASSET_NAME: &'static str = "AssetList";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let count = ctx.stream.read_u32()?;
            let mut items = Vec::with_capacity(count as usize);
            for _ in 0..count {
                items.push(AssetListItem {
                    type_id: ctx.stream.read_u32()?,
                    instance_id: ctx.stream.read_u32()?,
                });
            }
            Ok(Self {
                version: header.version,
                items,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            ctx.stream.write_u32(self.items.len() as u32);
            for item in &self.items {
                ctx.stream.write_u32(item.type_id);
                ctx.stream.write_u32(item.instance_id);
            }
            Ok(())
        })
    }
}

/// Carries nothing; the version in its header is the payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlobalVersion {
    pub version: u16,
}

impl GlobalVersion {
    pub const ASSET_NAME: &'static str = "GlobalVersion";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|_, header| {
            Ok(Self {
                version: header.version,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |_| Ok(()))
    }
}

/// Map-wide key/value metadata (name, weather, camera bounds, ...).
#[derive(Clone, Debug, PartialEq)]
pub struct WorldInfo {
    pub version: u16,
    pub properties: Vec<Property>,
}

impl WorldInfo {
    pub const ASSET_NAME: &'static str = "WorldInfo";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            Ok(Self {
                version: header.version,
                properties: ctx.parse_properties()?,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            ctx.write_properties(&self.properties)
        })
    }
}

/// Waypoint graph edges as (start id, end id) pairs; the waypoints
/// themselves are Objects.
#[derive(Clone, Debug, PartialEq)]
pub struct WaypointsList {
    pub version: u16,
    pub paths: Vec<(u32, u32)>,
}

impl WaypointsList {
    pub const ASSET_NAME: &'static str = "WaypointsList";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let count = ctx.stream.read_u32()?;
            let mut paths = Vec::with_capacity(count as usize);
            for _ in 0..count {
                paths.push((ctx.stream.read_u32()?, ctx.stream.read_u32()?));
            }
            Ok(Self {
                version: header.version,
                paths,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            ctx.stream.write_u32(self.paths.len() as u32);
            for (start, end) in &self.paths {
                ctx.stream.write_u32(*start);
                ctx.stream.write_u32(*end);
            }
            Ok(())
        })
    }
}

/// A top-level asset the lenient parser did not recognise, kept as raw
/// bytes so nothing is lost.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedAsset {
    pub name: String,
    pub version: u16,
    pub data: Vec<u8>,
}

impl SkippedAsset {
    pub fn parse(ctx: &mut ParsingContext, name: &str) -> Result<Self> {
        let version = ctx.stream.read_u16()?;
        let datasize = ctx.stream.read_u32()?;
        let data = ctx.stream.read_bytes(datasize as usize)?.to_vec();
        debug!("skipped asset {} v{} ({} bytes)", name, version, datasize);
        Ok(Self {
            name: name.to_owned(),
            version,
            data,
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(&self.name, self.version, |ctx| {
            ctx.stream.write_bytes(&self.data);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{NameTable, PropertyValue};
    use crate::stream::{BinaryReader, BinaryWriter};

    #[test]
    fn empty_world_info_is_two_bytes_of_body() -> Result<()> {
        // Version 1, datasize 2, zero properties.
        let mut w = BinaryWriter::new();
        w.write_u16(1);
        w.write_u32(2);
        w.write_u16(0);
        let bytes = w.into_bytes();

        let mut names = NameTable::new();
        names.intern(WorldInfo::ASSET_NAME);
        let mut ctx = ParsingContext::new(BinaryReader::new(&bytes), names.clone());
        let info = WorldInfo::parse(&mut ctx)?;
        assert!(info.properties.is_empty());

        let mut out = WritingContext::new(names);
        info.write(&mut out)?;
        assert_eq!(out.stream.into_bytes(), bytes);
        Ok(())
    }

    #[test]
    fn one_property_world_info_round_trips_its_fixture() -> Result<()> {
        // AsciiString property "mapName" = "Alpha", name index 2.
        let mut w = BinaryWriter::new();
        w.write_u16(1);
        w.write_u32(13);
        w.write_u16(1); // property count
        w.write_u8(3); // AsciiString tag
        w.write_u24(2)?; // name index
        w.write_ascii_string("Alpha")?;
        let bytes = w.into_bytes();

        let mut names = NameTable::new();
        names.intern(WorldInfo::ASSET_NAME);
        names.intern("mapName");
        let mut ctx = ParsingContext::new(BinaryReader::new(&bytes), names.clone());
        let info = WorldInfo::parse(&mut ctx)?;
        assert_eq!(info.properties.len(), 1);
        assert_eq!(info.properties[0].name, "mapName");
        assert_eq!(
            info.properties[0].value,
            PropertyValue::AsciiString("Alpha".to_owned())
        );

        let mut out = WritingContext::new(names);
        info.write(&mut out)?;
        assert_eq!(out.stream.into_bytes(), bytes);
        Ok(())
    }

    #[test]
    fn global_version_has_an_empty_body() -> Result<()> {
        let version = GlobalVersion { version: 12 };
        let mut out = WritingContext::new(NameTable::new());
        version.write(&mut out)?;
        let bytes = out.stream.into_bytes();
        assert_eq!(bytes.len(), 6);
        let mut ctx = ParsingContext::new(BinaryReader::new(&bytes), NameTable::new());
        assert_eq!(GlobalVersion::parse(&mut ctx)?, version);
        Ok(())
    }

    #[test]
    fn asset_list_and_waypoints_round_trip() -> Result<()> {
        let assets = AssetList {
            version: 1,
            items: vec![AssetListItem { type_id: 7, instance_id: 900 }],
        };
        let mut out = WritingContext::new(NameTable::new());
        assets.write(&mut out)?;
        let bytes = out.stream.into_bytes();
        let mut ctx = ParsingContext::new(BinaryReader::new(&bytes), NameTable::new());
        assert_eq!(AssetList::parse(&mut ctx)?, assets);

        let waypoints = WaypointsList {
            version: 1,
            paths: vec![(1, 2), (2, 3)],
        };
        let mut out = WritingContext::new(NameTable::new());
        waypoints.write(&mut out)?;
        let bytes = out.stream.into_bytes();
        let mut ctx = ParsingContext::new(BinaryReader::new(&bytes), NameTable::new());
        assert_eq!(WaypointsList::parse(&mut ctx)?, waypoints);
        Ok(())
    }

    #[test]
    fn skipped_assets_keep_their_raw_bytes() -> Result<()> {
        let skipped = SkippedAsset {
            name: "FutureAsset".to_owned(),
            version: 9,
            data: vec![1, 2, 3, 4, 5],
        };
        let mut out = WritingContext::new(NameTable::new());
        skipped.write(&mut out)?;
        let bytes = out.stream.into_bytes();
        let mut ctx = ParsingContext::new(BinaryReader::new(&bytes), NameTable::new());
        let back = SkippedAsset::parse(&mut ctx, "FutureAsset")?;
        assert_eq!(back, skipped);
        Ok(())
    }
}
