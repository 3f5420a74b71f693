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
use anyhow::{ensure, Result};
use map::Map;
use std::{fs, path::PathBuf};
use structopt::StructOpt;

/// Re-encode a SAGE .map file, optionally recompressing it.
#[derive(Debug, StructOpt)]
#[structopt(name = "pack-map")]
struct Opt {
    /// Emit the raw container instead of a RefPack frame
    #[structopt(long)]
    raw: bool,

    /// Only verify that re-encoding reproduces the input, writing nothing
    #[structopt(long)]
    verify: bool,

    /// The .map file to read
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Where to write the re-encoded map
    #[structopt(short = "-o", long = "--output", parse(from_os_str))]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let data = fs::read(&opt.input)?;
    let map = Map::from_bytes(&data)?;

    if opt.verify {
        // The raw container must match the decompressed input exactly; the
        // compressed form only matches when our packer made the original.
        let raw = map.to_bytes(false)?;
        let original = uncompressed_form(&data)?;
        ensure!(
            raw == original,
            "{}: re-encoded container differs from the original",
            opt.input.display()
        );
        println!("{}: byte-exact ({} bytes)", opt.input.display(), raw.len());
        return Ok(());
    }

    let out = map.to_bytes(!opt.raw)?;
    let output = opt
        .output
        .unwrap_or_else(|| opt.input.with_extension("repacked.map"));
    fs::write(&output, &out)?;
    println!(
        "{} -> {} ({} bytes)",
        opt.input.display(),
        output.display(),
        out.len()
    );
    Ok(())
}

fn uncompressed_form(data: &[u8]) -> Result<Vec<u8>> {
    let payload = if data.len() >= 8 && data.starts_with(b"EAR") {
        &data[8..]
    } else {
        data
    };
    Ok(match refpack::explode(payload, None) {
        Ok(bytes) => bytes,
        Err(_) => payload.to_vec(),
    })
}
