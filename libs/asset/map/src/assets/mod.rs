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

// One codec per asset kind. Each is a pure function over the stream and
// context layers: `parse` consumes exactly the asset's datasize, `write`
// reproduces the parsed bytes.

mod blend_tile;
mod cameras;
mod castle;
mod effects;
mod environment;
mod height_map;
mod library;
mod lighting;
mod misc;
mod missions;
mod objects;
mod scripts;
mod sides;
mod triggers;
mod water;

pub use blend_tile::{
    BlendDescription, BlendTileData, BlendTileTexture, CliffTextureMapping, TileFlammability,
};
pub use cameras::{
    CameraAnimation, CameraAnimationList, CameraFrames, FreeCameraFrame, InterpolationType,
    LookAtCameraFrame, LookAtFrame, NamedCamera, NamedCameras,
};
pub use castle::{CastlePerimeter, CastleTemplate, CastleTemplates, PerimeterPoint};
pub use effects::{
    PostEffect, PostEffectBody, PostEffectParameter, PostEffectValue, PostEffectsChunk,
};
pub use environment::{EnvironmentData, FogSettings, SkyboxSettings};
pub use height_map::{HeightMapBorder, HeightMapData};
pub use library::{LibraryMapLists, LibraryMaps};
pub use lighting::{
    ColorArgb, GlobalLight, GlobalLighting, GlobalLightingConfiguration, TimeOfDay,
};
pub use misc::{AssetList, AssetListItem, GlobalVersion, SkippedAsset, WaypointsList, WorldInfo};
pub use missions::{
    MissionHotSpot, MissionHotSpots, MissionObjective, MissionObjectiveType, MissionObjectives,
    MPPosition, MPPositionList,
};
pub use objects::{MapObject, ObjectsList};
pub use scripts::{
    argument_type, OrCondition, PlayerScriptsList, Script, ScriptArgument, ScriptArgumentValue,
    ScriptEntry, ScriptEntryLayout, ScriptGroup, ScriptItem, ScriptList,
};
pub use sides::{BuildList, BuildListInfo, BuildLists, FactionName, Player, SidesList, Team, Teams};
pub use triggers::{PolygonRiverData, PolygonTrigger, PolygonTriggers, TriggerArea, TriggerAreas};
pub use water::{
    RiverArea, RiverAreas, StandingWaterArea, StandingWaterAreas, StandingWaveArea,
    StandingWaveAreas, WaterSettings, WaveShapeData,
};
