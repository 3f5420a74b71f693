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
use anyhow::Result;
use map::Map;
use std::{fs, path::PathBuf};
use structopt::StructOpt;

/// Print contents of SAGE .map files, with various options.
#[derive(Debug, StructOpt)]
struct Opt {
    /// Keep unknown assets instead of failing on them.
    #[structopt(long)]
    lenient: bool,

    /// Also list every placed object.
    #[structopt(long)]
    objects: bool,

    /// One or more .map files to process
    #[structopt(parse(from_os_str))]
    inputs: Vec<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let opt = Opt::from_args();
    for input in &opt.inputs {
        println!("{}:", input.display());
        let data = fs::read(input)?;
        let map = if opt.lenient {
            Map::from_bytes_lenient(&data)?
        } else {
            Map::from_bytes(&data)?
        };
        show_map(&map, opt.objects);
        println!();
    }
    Ok(())
}

fn show_map(map: &Map, show_objects: bool) {
    println!("marker:      {}", map.compression_marker);
    println!("ear header:  {}", map.has_ear_header);
    println!("name table:  {} entries", map.name_table().len());

    if let Some(hm) = &map.height_map_data {
        println!(
            "height map:  {}x{} v{}, elevation {}..{}, {} borders",
            hm.width,
            hm.height,
            hm.version,
            hm.min_height,
            hm.max_height,
            hm.borders.len()
        );
    }
    if let Some(bt) = &map.blend_tile_data {
        println!(
            "blend tiles: v{}, {} textures, {} blends, {} cliff mappings",
            bt.version,
            bt.textures.len(),
            bt.blend_descriptions.len(),
            bt.cliff_texture_mappings.len()
        );
        for texture in &bt.textures {
            println!(
                "             {:24} cells {}..+{}",
                texture.name, texture.cell_start, texture.cell_count
            );
        }
    }
    if let Some(info) = &map.world_info {
        println!("world info:  {} properties", info.properties.len());
        for property in &info.properties {
            println!("             {:24} {:?}", property.name, property.value);
        }
    }
    if let Some(sides) = &map.sides_list {
        println!("sides:       {} players", sides.players.len());
    }
    if let Some(scripts) = &map.player_scripts_list {
        println!("scripts:     {} script lists", scripts.script_lists.len());
    }
    if let Some(objects) = &map.objects_list {
        println!("objects:     {}", objects.objects.len());
        if show_objects {
            for object in &objects.objects {
                println!(
                    "             {:32} at ({:.1}, {:.1}, {:.1})",
                    object.type_name, object.position.x, object.position.y, object.position.z
                );
            }
        }
    }
    if let Some(waypoints) = &map.waypoints_list {
        println!("waypoints:   {} path edges", waypoints.paths.len());
    }
    for skipped in &map.skipped_assets {
        println!(
            "skipped:     {} v{} ({} bytes)",
            skipped.name,
            skipped.version,
            skipped.data.len()
        );
    }
}
