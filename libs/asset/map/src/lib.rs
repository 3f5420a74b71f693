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

// SAGE .map containers (C&C Generals, Battle for Middle-earth). The file is,
// outermost first:
//
//   - optionally an 8-byte "EAR\0" + u32 uncompressed-size prefix,
//   - a RefPack frame (every shipping map is compressed; loose development
//     files are accepted raw),
//   - a FourCC compression marker such as "CMP2",
//   - a u32 asset count and the asset name table, listed from the highest
//     index down to 1,
//   - back-to-back assets: u32 name index, u16 version, u32 datasize, then
//     exactly datasize bytes of body.
//
// Parsing is byte-exact in reverse: Map::to_bytes reproduces the input
// stream bit for bit, including unexplained magic values, off-by-one counts
// and padding bits. Tests treat any divergence as a bug.

pub mod assets;
mod context;
mod stream;

pub use crate::{
    context::{
        AssetHeader, NameTable, ParsingContext, Property, PropertyKey, PropertyKind,
        PropertyValue, WritingContext,
    },
    stream::{BinaryReader, BinaryWriter, Grid, Vec2, Vec3, Vec4},
};

use crate::assets::{
    AssetList, BlendTileData, BuildLists, CameraAnimationList, CastleTemplates, EnvironmentData,
    FogSettings, GlobalLighting, GlobalVersion, HeightMapData, LibraryMapLists, MPPositionList,
    MissionHotSpots, MissionObjectives, NamedCameras, ObjectsList, PlayerScriptsList,
    PolygonTriggers, PostEffectsChunk, RiverAreas, SidesList, SkippedAsset, SkyboxSettings,
    StandingWaterAreas, StandingWaveAreas, Teams, TriggerAreas, WaterSettings, WaypointsList,
    WorldInfo,
};
use anyhow::{bail, Context, Result};
use log::{debug, warn};

const EAR_PREFIX: &[u8] = b"EAR";
const EAR_MAGIC: &[u8; 4] = b"EAR\0";

/// A parsed map container. Field order below mirrors the canonical asset
/// order in the file; `to_bytes` emits present assets in exactly this order.
#[derive(Clone, Debug, Default)]
pub struct Map {
    /// The container FourCC, typically "CMP2"; preserved verbatim.
    pub compression_marker: String,
    /// Whether the source file carried the "EAR\0" size prefix.
    pub has_ear_header: bool,

    pub asset_list: Option<AssetList>,
    pub global_version: Option<GlobalVersion>,
    pub height_map_data: Option<HeightMapData>,
    pub blend_tile_data: Option<BlendTileData>,
    pub world_info: Option<WorldInfo>,
    pub mp_position_list: Option<MPPositionList>,
    pub sides_list: Option<SidesList>,
    pub library_map_lists: Option<LibraryMapLists>,
    pub teams: Option<Teams>,
    pub player_scripts_list: Option<PlayerScriptsList>,
    pub build_lists: Option<BuildLists>,
    pub objects_list: Option<ObjectsList>,
    pub polygon_triggers: Option<PolygonTriggers>,
    pub trigger_areas: Option<TriggerAreas>,
    pub water_settings: Option<WaterSettings>,
    pub fog_settings: Option<FogSettings>,
    pub mission_hotspots: Option<MissionHotSpots>,
    pub mission_objectives: Option<MissionObjectives>,
    pub standing_water_areas: Option<StandingWaterAreas>,
    pub river_areas: Option<RiverAreas>,
    pub standing_wave_areas: Option<StandingWaveAreas>,
    pub global_lighting: Option<GlobalLighting>,
    pub post_effects_chunk: Option<PostEffectsChunk>,
    pub environment_data: Option<EnvironmentData>,
    pub named_cameras: Option<NamedCameras>,
    pub camera_animation_list: Option<CameraAnimationList>,
    pub castle_templates: Option<CastleTemplates>,
    pub waypoints_list: Option<WaypointsList>,
    pub skybox_settings: Option<SkyboxSettings>,

    /// Unrecognised top-level assets, lenient mode only; re-emitted after
    /// the known assets in parse order.
    pub skipped_assets: Vec<SkippedAsset>,

    names: NameTable,
}

impl Map {
    /// Parse a map. Unknown top-level asset names are an error.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::parse(data, false)
    }

    /// Parse a map, collecting unknown top-level assets into
    /// `skipped_assets` instead of failing.
    pub fn from_bytes_lenient(data: &[u8]) -> Result<Self> {
        Self::parse(data, true)
    }

    /// The shared asset name table, as read from the file. `to_bytes` seeds
    /// its output table from this so unedited maps round-trip byte-exactly.
    pub fn name_table(&self) -> &NameTable {
        &self.names
    }

    fn parse(data: &[u8], lenient: bool) -> Result<Self> {
        let (has_ear_header, payload) =
            if data.len() >= 8 && data.starts_with(EAR_PREFIX) {
                (true, &data[8..])
            } else {
                (false, data)
            };

        // Every shipping map is RefPack-compressed; raw containers only
        // show up in development, so a failed decompress falls through.
        let unpacked;
        let container = match refpack::explode(payload, None) {
            Ok(bytes) => {
                unpacked = bytes;
                &unpacked[..]
            }
            Err(err) => {
                warn!("not a RefPack payload ({err:#}); assuming uncompressed");
                payload
            }
        };

        Self::parse_container(container, has_ear_header, lenient)
    }

    fn parse_container(data: &[u8], has_ear_header: bool, lenient: bool) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        let compression_marker = reader.read_four_cc()?;
        let names = NameTable::parse(&mut reader)?;
        let mut ctx = ParsingContext::new(reader, names);

        let mut map = Map {
            compression_marker,
            has_ear_header,
            ..Default::default()
        };

        while ctx.stream.remaining() > 0 {
            let offset = ctx.stream.position();
            let name = ctx.parse_asset_name()?;
            debug!("asset {} at offset 0x{:X}", name, offset);
            map.parse_asset(&name, &mut ctx, lenient)
                .with_context(|| format!("in asset {} at offset 0x{:X}", name, offset))?;
        }

        map.names = ctx.names;
        Ok(map)
    }

    fn parse_asset(&mut self, name: &str, ctx: &mut ParsingContext, lenient: bool) -> Result<()> {
        match name {
            AssetList::ASSET_NAME => self.asset_list = Some(AssetList::parse(ctx)?),
            GlobalVersion::ASSET_NAME => self.global_version = Some(GlobalVersion::parse(ctx)?),
            HeightMapData::ASSET_NAME => self.height_map_data = Some(HeightMapData::parse(ctx)?),
            BlendTileData::ASSET_NAME => {
                let Some(height_map) = &self.height_map_data else {
                    bail!("BlendTileData requires a HeightMapData asset earlier in the file");
                };
                self.blend_tile_data = Some(BlendTileData::parse(ctx, height_map)?);
            }
            WorldInfo::ASSET_NAME => self.world_info = Some(WorldInfo::parse(ctx)?),
            MPPositionList::ASSET_NAME => {
                self.mp_position_list = Some(MPPositionList::parse(ctx)?)
            }
            SidesList::ASSET_NAME => {
                let has_asset_list = self.asset_list.is_some();
                self.sides_list = Some(SidesList::parse(ctx, has_asset_list)?);
            }
            LibraryMapLists::ASSET_NAME => {
                self.library_map_lists = Some(LibraryMapLists::parse(ctx)?)
            }
            Teams::ASSET_NAME => self.teams = Some(Teams::parse(ctx)?),
            PlayerScriptsList::ASSET_NAME => {
                self.player_scripts_list = Some(PlayerScriptsList::parse(ctx)?)
            }
            BuildLists::ASSET_NAME => {
                let has_asset_list = self.asset_list.is_some();
                self.build_lists = Some(BuildLists::parse(ctx, has_asset_list)?);
            }
            ObjectsList::ASSET_NAME => self.objects_list = Some(ObjectsList::parse(ctx)?),
            PolygonTriggers::ASSET_NAME => {
                self.polygon_triggers = Some(PolygonTriggers::parse(ctx)?)
            }
            TriggerAreas::ASSET_NAME => self.trigger_areas = Some(TriggerAreas::parse(ctx)?),
            WaterSettings::ASSET_NAME => self.water_settings = Some(WaterSettings::parse(ctx)?),
            FogSettings::ASSET_NAME => self.fog_settings = Some(FogSettings::parse(ctx)?),
            MissionHotSpots::ASSET_NAME => {
                self.mission_hotspots = Some(MissionHotSpots::parse(ctx)?)
            }
            MissionObjectives::ASSET_NAME => {
                self.mission_objectives = Some(MissionObjectives::parse(ctx)?)
            }
            StandingWaterAreas::ASSET_NAME => {
                self.standing_water_areas = Some(StandingWaterAreas::parse(ctx)?)
            }
            RiverAreas::ASSET_NAME => self.river_areas = Some(RiverAreas::parse(ctx)?),
            StandingWaveAreas::ASSET_NAME => {
                self.standing_wave_areas = Some(StandingWaveAreas::parse(ctx)?)
            }
            GlobalLighting::ASSET_NAME => {
                self.global_lighting = Some(GlobalLighting::parse(ctx)?)
            }
            PostEffectsChunk::ASSET_NAME => {
                self.post_effects_chunk = Some(PostEffectsChunk::parse(ctx)?)
            }
            EnvironmentData::ASSET_NAME => {
                self.environment_data = Some(EnvironmentData::parse(ctx)?)
            }
            NamedCameras::ASSET_NAME => self.named_cameras = Some(NamedCameras::parse(ctx)?),
            CameraAnimationList::ASSET_NAME => {
                self.camera_animation_list = Some(CameraAnimationList::parse(ctx)?)
            }
            CastleTemplates::ASSET_NAME => {
                self.castle_templates = Some(CastleTemplates::parse(ctx)?)
            }
            WaypointsList::ASSET_NAME => self.waypoints_list = Some(WaypointsList::parse(ctx)?),
            SkyboxSettings::ASSET_NAME => {
                self.skybox_settings = Some(SkyboxSettings::parse(ctx)?)
            }
            _ if lenient => self.skipped_assets.push(SkippedAsset::parse(ctx, name)?),
            _ => bail!("unknown asset name: {}", name),
        }
        Ok(())
    }

    /// Serialise the map. With `compress`, the container is RefPack-framed
    /// and, when the source carried one, re-prefixed with the "EAR\0"
    /// header and the new uncompressed size.
    pub fn to_bytes(&self, compress: bool) -> Result<Vec<u8>> {
        let mut ctx = WritingContext::new(self.names.clone());
        self.write_assets(&mut ctx)?;
        let WritingContext { stream, names } = ctx;
        let body = stream.into_bytes();

        let mut header = BinaryWriter::new();
        header.write_four_cc(&self.compression_marker)?;
        names.write(&mut header)?;
        let mut container = header.into_bytes();
        container.extend_from_slice(&body);

        if !compress {
            return Ok(container);
        }

        let packed = refpack::implode(&container)?;
        if self.has_ear_header {
            let mut framed = Vec::with_capacity(packed.len() + 8);
            framed.extend_from_slice(EAR_MAGIC);
            framed.extend_from_slice(&(container.len() as u32).to_le_bytes());
            framed.extend_from_slice(&packed);
            Ok(framed)
        } else {
            Ok(packed)
        }
    }

    fn write_assets(&self, ctx: &mut WritingContext) -> Result<()> {
        let has_asset_list = self.asset_list.is_some();

        if let Some(asset) = &self.asset_list {
            ctx.write_asset_name(AssetList::ASSET_NAME)?;
            asset.write(ctx)?;
        }
        if let Some(asset) = &self.global_version {
            ctx.write_asset_name(GlobalVersion::ASSET_NAME)?;
            asset.write(ctx)?;
        }
        if let Some(asset) = &self.height_map_data {
            ctx.write_asset_name(HeightMapData::ASSET_NAME)?;
            asset.write(ctx)?;
        }
        if let Some(asset) = &self.blend_tile_data {
            ctx.write_asset_name(BlendTileData::ASSET_NAME)?;
            asset.write(ctx)?;
        }
        if let Some(asset) = &self.world_info {
            ctx.write_asset_name(WorldInfo::ASSET_NAME)?;
            asset.write(ctx)?;
        }
        if let Some(asset) = &self.mp_position_list {
            ctx.write_asset_name(MPPositionList::ASSET_NAME)?;
            asset.write(ctx)?;
        }
        if let Some(asset) = &self.sides_list {
            ctx.write_asset_name(SidesList::ASSET_NAME)?;
            asset.write(ctx, has_asset_list)?;
        }
        if let Some(asset) = &self.library_map_lists {
            ctx.write_asset_name(LibraryMapLists::ASSET_NAME)?;
            asset.write(ctx)?;
        }
        if let Some(asset) = &self.teams {
            ctx.write_asset_name(Teams::ASSET_NAME)?;
            asset.write(ctx)?;
        }
        if let Some(asset) = &self.player_scripts_list {
            ctx.write_asset_name(PlayerScriptsList::ASSET_NAME)?;
            asset.write(ctx)?;
        }
        if let Some(asset) = &self.build_lists {
            ctx.write_asset_name(BuildLists::ASSET_NAME)?;
            asset.write(ctx, has_asset_list)?;
        }
        if let Some(asset) = &self.objects_list {
            ctx.write_asset_name(ObjectsList::ASSET_NAME)?;
            asset.write(ctx)?;
        }
        if let Some(asset) = &self.polygon_triggers {
            ctx.write_asset_name(PolygonTriggers::ASSET_NAME)?;
            asset.write(ctx)?;
        }
        if let Some(asset) = &self.trigger_areas {
            ctx.write_asset_name(TriggerAreas::ASSET_NAME)?;
            asset.write(ctx)?;
        }
        if let Some(asset) = &self.water_settings {
            ctx.write_asset_name(WaterSettings::ASSET_NAME)?;
            asset.write(ctx)?;
        }
        if let Some(asset) = &self.fog_settings {
            ctx.write_asset_name(FogSettings::ASSET_NAME)?;
            asset.write(ctx)?;
        }
        if let Some(asset) = &self.mission_hotspots {
            ctx.write_asset_name(MissionHotSpots::ASSET_NAME)?;
            asset.write(ctx)?;
        }
        if let Some(asset) = &self.mission_objectives {
            ctx.write_asset_name(MissionObjectives::ASSET_NAME)?;
            asset.write(ctx)?;
        }
        if let Some(asset) = &self.standing_water_areas {
            ctx.write_asset_name(StandingWaterAreas::ASSET_NAME)?;
            asset.write(ctx)?;
        }
        if let Some(asset) = &self.river_areas {
            ctx.write_asset_name(RiverAreas::ASSET_NAME)?;
            asset.write(ctx)?;
        }
        if let Some(asset) = &self.standing_wave_areas {
            ctx.write_asset_name(StandingWaveAreas::ASSET_NAME)?;
            asset.write(ctx)?;
        }
        if let Some(asset) = &self.global_lighting {
            ctx.write_asset_name(GlobalLighting::ASSET_NAME)?;
            asset.write(ctx)?;
        }
        if let Some(asset) = &self.post_effects_chunk {
            ctx.write_asset_name(PostEffectsChunk::ASSET_NAME)?;
            asset.write(ctx)?;
        }
        if let Some(asset) = &self.environment_data {
            ctx.write_asset_name(EnvironmentData::ASSET_NAME)?;
            asset.write(ctx)?;
        }
        if let Some(asset) = &self.named_cameras {
            ctx.write_asset_name(NamedCameras::ASSET_NAME)?;
            asset.write(ctx)?;
        }
        if let Some(asset) = &self.camera_animation_list {
            ctx.write_asset_name(CameraAnimationList::ASSET_NAME)?;
            asset.write(ctx)?;
        }
        if let Some(asset) = &self.castle_templates {
            ctx.write_asset_name(CastleTemplates::ASSET_NAME)?;
            asset.write(ctx)?;
        }
        if let Some(asset) = &self.waypoints_list {
            ctx.write_asset_name(WaypointsList::ASSET_NAME)?;
            asset.write(ctx)?;
        }
        if let Some(asset) = &self.skybox_settings {
            ctx.write_asset_name(SkyboxSettings::ASSET_NAME)?;
            asset.write(ctx)?;
        }

        for skipped in &self.skipped_assets {
            ctx.write_asset_name(&skipped.name)?;
            skipped.write(ctx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetListItem, HeightMapBorder};
    use crate::context::PropertyValue;

    /// Hand-assemble a minimal container: marker, name table, assets.
    fn container(names: &[&str], assets: impl FnOnce(&mut BinaryWriter)) -> Vec<u8> {
        let mut w = BinaryWriter::new();
        w.write_four_cc("CMP2").unwrap();
        w.write_u32(names.len() as u32);
        for (i, name) in names.iter().enumerate().rev() {
            w.write_string(name).unwrap();
            w.write_u32(i as u32 + 1);
        }
        assets(&mut w);
        w.into_bytes()
    }

    #[test]
    fn empty_world_info_container_round_trips() -> Result<()> {
        let bytes = container(&["WorldInfo"], |w| {
            w.write_u32(1); // asset index
            w.write_u16(1); // version
            w.write_u32(2); // datasize
            w.write_u16(0); // no properties
        });

        let map = Map::from_bytes(&bytes)?;
        let info = map.world_info.as_ref().unwrap();
        assert!(info.properties.is_empty());
        assert_eq!(map.compression_marker, "CMP2");

        assert_eq!(map.to_bytes(false)?, bytes);
        Ok(())
    }

    #[test]
    fn two_property_world_info_round_trips() -> Result<()> {
        let bytes = container(&["WorldInfo", "mapName"], |w| {
            w.write_u32(1);
            w.write_u16(1);
            w.write_u32(13);
            w.write_u16(1); // one property
            w.write_u8(3); // AsciiString
            w.write_u24(2).unwrap(); // name index of "mapName"
            w.write_ascii_string("Alpha").unwrap();
        });

        let map = Map::from_bytes(&bytes)?;
        let info = map.world_info.as_ref().unwrap();
        assert_eq!(info.properties[0].name, "mapName");
        assert_eq!(
            info.properties[0].value,
            PropertyValue::AsciiString("Alpha".to_owned())
        );
        assert_eq!(map.to_bytes(false)?, bytes);
        Ok(())
    }

    #[test]
    fn blend_tile_data_requires_a_prior_height_map() {
        let bytes = container(&["BlendTileData"], |w| {
            w.write_u32(1);
            w.write_u16(8);
            w.write_u32(0);
        });
        let err = Map::from_bytes(&bytes).unwrap_err();
        assert!(format!("{err:#}").contains("HeightMapData"));
    }

    #[test]
    fn unknown_assets_fail_strict_and_survive_lenient() -> Result<()> {
        let bytes = container(&["WorldInfo", "FutureAsset"], |w| {
            w.write_u32(1);
            w.write_u16(1);
            w.write_u32(2);
            w.write_u16(0);
            w.write_u32(2); // FutureAsset
            w.write_u16(4);
            w.write_u32(3);
            w.write_bytes(&[9, 9, 9]);
        });

        assert!(Map::from_bytes(&bytes).is_err());

        let map = Map::from_bytes_lenient(&bytes)?;
        assert_eq!(map.skipped_assets.len(), 1);
        assert_eq!(map.skipped_assets[0].name, "FutureAsset");
        assert_eq!(map.skipped_assets[0].data, vec![9, 9, 9]);
        assert_eq!(map.to_bytes(false)?, bytes);
        Ok(())
    }

    fn sample_map() -> Map {
        let mut elevations = Grid::new(3, 2);
        for y in 0..2 {
            for x in 0..3 {
                elevations.set(x, y, (10 + x * y) as u16);
            }
        }
        let height_map = HeightMapData {
            version: 5,
            width: 3,
            height: 2,
            border_width: 0,
            borders: vec![HeightMapBorder {
                corner1_x: 0,
                corner1_y: 0,
                x: 2,
                y: 1,
            }],
            area: 6,
            min_height: 10,
            max_height: 12,
            elevations,
        };

        let mut tiles = Grid::new(3, 2);
        tiles.set(0, 0, 5);
        tiles.set(2, 1, 7);
        let mut impassability = Grid::new(3, 2);
        impassability.set(1, 0, true);
        let blend_tile = BlendTileData {
            version: 8,
            tiles,
            blends: Grid::new(3, 2),
            three_way_blends: Grid::new(3, 2),
            cliff_textures: Grid::new(3, 2),
            impassability: Some(impassability),
            impassability_to_players: None,
            passage_widths: None,
            taintability: None,
            extra_passability: None,
            flammability: None,
            visibility: None,
            buildability: None,
            impassability_to_air_units: None,
            tiberium_growability: None,
            dynamic_shrubbery_density: None,
            texture_cell_count: 4,
            raw_blend_count: 1,
            raw_cliff_mapping_count: 1,
            textures: vec![assets::BlendTileTexture {
                cell_start: 0,
                cell_count: 4,
                cell_size: 2,
                name: "TGrass01".to_owned(),
            }],
            magic_value1: 0xFFFF_FFFF,
            blend_descriptions: Vec::new(),
            cliff_texture_mappings: Vec::new(),
        };

        Map {
            compression_marker: "CMP2".to_owned(),
            has_ear_header: true,
            asset_list: Some(AssetList {
                version: 1,
                items: vec![AssetListItem { type_id: 1, instance_id: 2 }],
            }),
            height_map_data: Some(height_map),
            blend_tile_data: Some(blend_tile),
            world_info: Some(WorldInfo {
                version: 1,
                properties: vec![Property {
                    name: "mapName".to_owned(),
                    value: PropertyValue::AsciiString("Round Trip".to_owned()),
                }],
            }),
            waypoints_list: Some(WaypointsList {
                version: 1,
                paths: vec![(4, 5)],
            }),
            ..Default::default()
        }
    }

    #[test]
    fn constructed_maps_cycle_through_bytes() -> Result<()> {
        let mut map = sample_map();
        map.names.intern("AssetList");
        map.names.intern("HeightMapData");
        map.names.intern("BlendTileData");
        map.names.intern("WorldInfo");
        map.names.intern("mapName");
        map.names.intern("WaypointsList");

        let bytes = map.to_bytes(false)?;
        let back = Map::from_bytes(&bytes)?;
        assert_eq!(back.to_bytes(false)?, bytes);

        let info = back.world_info.as_ref().unwrap();
        assert_eq!(info.properties[0].name, "mapName");
        assert_eq!(back.height_map_data.as_ref().unwrap().max_height, 12);
        Ok(())
    }

    #[test]
    fn compressed_output_decompresses_to_the_raw_form() -> Result<()> {
        let mut map = sample_map();
        map.names.intern("AssetList");
        map.names.intern("HeightMapData");
        map.names.intern("BlendTileData");
        map.names.intern("WorldInfo");
        map.names.intern("mapName");
        map.names.intern("WaypointsList");

        let raw = map.to_bytes(false)?;
        let packed = map.to_bytes(true)?;

        // has_ear_header: expect the EAR prefix and the uncompressed size.
        assert_eq!(&packed[..4], EAR_MAGIC);
        assert_eq!(packed[4..8], (raw.len() as u32).to_le_bytes());
        assert_eq!(refpack::explode(&packed[8..], None)?, raw);

        // And the whole file parses back identically.
        let back = Map::from_bytes(&packed)?;
        assert!(back.has_ear_header);
        assert_eq!(back.to_bytes(false)?, raw);
        Ok(())
    }

    #[test]
    fn new_property_names_append_to_the_table() -> Result<()> {
        let bytes = container(&["WorldInfo"], |w| {
            w.write_u32(1);
            w.write_u16(1);
            w.write_u32(2);
            w.write_u16(0);
        });
        let mut map = Map::from_bytes(&bytes)?;
        map.world_info.as_mut().unwrap().properties.push(Property {
            name: "weather".to_owned(),
            value: PropertyValue::Integer(2),
        });

        let out = map.to_bytes(false)?;
        let back = Map::from_bytes(&out)?;
        assert_eq!(back.name_table().index("weather"), Some(2));
        assert_eq!(
            back.world_info.as_ref().unwrap().properties[0].value,
            PropertyValue::Integer(2)
        );
        Ok(())
    }
}
