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

// The primitive layer of the map container. Everything multi-byte is
// little-endian. Strings are Latin-1 (one byte per char) or UTF-16-LE;
// FourCC tags are four raw bytes, some of which are stored in reverse of
// their logical spelling. Grids are two-dimensional, indexed [x][y], and
// serialised y-outer, x-inner.

use anyhow::{bail, ensure, Result};
use byteorder::{ByteOrder, LittleEndian};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

/// A dense 2D array indexed `[x][y]`, stored x-major in memory.
///
/// The wire form iterates y in the outer loop and x in the inner loop; the
/// grid read/write methods below all follow that order.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Copy + Default> Grid<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![T::default(); width * height],
        }
    }
}

impl<T: Copy> Grid<T> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> T {
        self.cells[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        self.cells[y * self.width + x] = value;
    }

    pub fn cells(&self) -> &[T] {
        &self.cells
    }
}

fn from_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn to_latin1(s: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(s.len());
    for c in s.chars() {
        let v = c as u32;
        ensure!(v <= 0xFF, "character {:?} does not fit in Latin-1", c);
        out.push(v as u8);
    }
    Ok(out)
}

/// Little-endian cursor over an in-memory byte buffer.
pub struct BinaryReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> BinaryReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        ensure!(
            self.offset + count <= self.data.len(),
            "short read: {} bytes wanted at offset 0x{:X}, {} available",
            count,
            self.offset,
            self.remaining()
        );
        let out = &self.data[self.offset..self.offset + count];
        self.offset += count;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.read_bytes(2)?))
    }

    pub fn read_u24(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u24(self.read_bytes(3)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.read_bytes(4)?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.read_bytes(8)?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(LittleEndian::read_i64(self.read_bytes(8)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.read_bytes(4)?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(LittleEndian::read_f64(self.read_bytes(8)?))
    }

    /// One byte; any nonzero value is true.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// One byte; must be exactly 0 or 1.
    pub fn read_bool_checked(&mut self) -> Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            v => bail!("invalid boolean byte {} at offset 0x{:X}", v, self.offset - 1),
        }
    }

    /// A bool padded out to four bytes; the three padding bytes must be zero.
    pub fn read_bool_u32(&mut self) -> Result<bool> {
        let value = self.read_bool()?;
        let padding = self.read_u24()?;
        ensure!(
            padding == 0,
            "expected zero padding after bool, got {:06X}",
            padding
        );
        Ok(value)
    }

    pub fn read_bool_u32_checked(&mut self) -> Result<bool> {
        let value = self.read_bool_checked()?;
        let padding = self.read_u24()?;
        ensure!(
            padding == 0,
            "expected zero padding after bool, got {:06X}",
            padding
        );
        Ok(value)
    }

    /// One-byte-length-prefixed Latin-1 string.
    pub fn read_string(&mut self) -> Result<String> {
        let length = self.read_u8()? as usize;
        Ok(from_latin1(self.read_bytes(length)?))
    }

    /// u16-length-prefixed Latin-1 string.
    pub fn read_ascii_string(&mut self) -> Result<String> {
        let length = self.read_u16()? as usize;
        Ok(from_latin1(self.read_bytes(length)?))
    }

    /// u16-code-unit-count-prefixed UTF-16-LE string.
    pub fn read_unicode_string(&mut self) -> Result<String> {
        let count = self.read_u16()? as usize;
        let bytes = self.read_bytes(count * 2)?;
        let units = bytes
            .chunks_exact(2)
            .map(LittleEndian::read_u16)
            .collect::<Vec<u16>>();
        String::from_utf16(&units).map_err(|_| {
            anyhow::anyhow!("invalid UTF-16 at offset 0x{:X}", self.offset - count * 2)
        })
    }

    /// Four raw bytes as a Latin-1 tag.
    pub fn read_four_cc(&mut self) -> Result<String> {
        Ok(from_latin1(self.read_bytes(4)?))
    }

    /// A FourCC whose stored order is the reverse of its logical spelling.
    pub fn read_four_cc_reversed(&mut self) -> Result<String> {
        let bytes = self.read_bytes(4)?;
        Ok(bytes.iter().rev().map(|&b| b as char).collect())
    }

    pub fn read_vec2(&mut self) -> Result<Vec2> {
        Ok(Vec2 {
            x: self.read_f32()?,
            y: self.read_f32()?,
        })
    }

    pub fn read_vec3(&mut self) -> Result<Vec3> {
        Ok(Vec3 {
            x: self.read_f32()?,
            y: self.read_f32()?,
            z: self.read_f32()?,
        })
    }

    pub fn read_vec4(&mut self) -> Result<Vec4> {
        Ok(Vec4 {
            x: self.read_f32()?,
            y: self.read_f32()?,
            z: self.read_f32()?,
            w: self.read_f32()?,
        })
    }

    pub fn read_u16_grid(&mut self, width: usize, height: usize) -> Result<Grid<u16>> {
        let mut grid = Grid::new(width, height);
        for y in 0..height {
            for x in 0..width {
                grid.set(x, y, self.read_u16()?);
            }
        }
        Ok(grid)
    }

    /// Grid of unsigned ints whose element width is 16 or 32 bits.
    pub fn read_uint_grid(&mut self, width: usize, height: usize, bits: u32) -> Result<Grid<u32>> {
        let mut grid = Grid::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let value = match bits {
                    16 => self.read_u16()? as u32,
                    32 => self.read_u32()?,
                    _ => bail!("unsupported grid element width: {} bits", bits),
                };
                grid.set(x, y, value);
            }
        }
        Ok(grid)
    }

    pub fn read_byte_grid(&mut self, width: usize, height: usize) -> Result<Grid<u8>> {
        let mut grid = Grid::new(width, height);
        for y in 0..height {
            for x in 0..width {
                grid.set(x, y, self.read_u8()?);
            }
        }
        Ok(grid)
    }

    /// Single-bit boolean grid, 8 bits per byte LSB-first, each row starting
    /// on a fresh byte. Padding bits in the last byte of a row are dropped.
    pub fn read_bit_grid(&mut self, width: usize, height: usize) -> Result<Grid<bool>> {
        let mut grid = Grid::new(width, height);
        for y in 0..height {
            let mut byte = 0;
            for x in 0..width {
                if x % 8 == 0 {
                    byte = self.read_u8()?;
                }
                grid.set(x, y, byte & (1 << (x % 8)) != 0);
            }
        }
        Ok(grid)
    }
}

/// Growable little-endian output buffer with position back-patching.
#[derive(Default)]
pub struct BinaryWriter {
    data: Vec<u8>,
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> usize {
        self.data.len()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.data.push(value);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.data.push(value as u8);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i16(&mut self, value: i16) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u24(&mut self, value: u32) -> Result<()> {
        ensure!(value <= 0xFF_FFFF, "value {} out of range for u24", value);
        self.data.extend_from_slice(&value.to_le_bytes()[..3]);
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_f64(&mut self, value: f64) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.data.push(value as u8);
    }

    pub fn write_bool_u32(&mut self, value: bool) {
        self.write_bool(value);
        self.data.extend_from_slice(&[0, 0, 0]);
    }

    /// Patch a previously written u32 in place.
    pub fn patch_u32(&mut self, at: usize, value: u32) -> Result<()> {
        ensure!(
            at + 4 <= self.data.len(),
            "patch position 0x{:X} out of bounds",
            at
        );
        self.data[at..at + 4].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    pub fn write_string(&mut self, value: &str) -> Result<()> {
        let bytes = to_latin1(value)?;
        ensure!(bytes.len() <= 0xFF, "string of {} bytes too long for a one-byte length", bytes.len());
        self.write_u8(bytes.len() as u8);
        self.write_bytes(&bytes);
        Ok(())
    }

    pub fn write_ascii_string(&mut self, value: &str) -> Result<()> {
        let bytes = to_latin1(value)?;
        ensure!(
            bytes.len() <= 0xFFFF,
            "string of {} bytes too long for a u16 length",
            bytes.len()
        );
        self.write_u16(bytes.len() as u16);
        self.write_bytes(&bytes);
        Ok(())
    }

    pub fn write_unicode_string(&mut self, value: &str) -> Result<()> {
        let units = value.encode_utf16().collect::<Vec<u16>>();
        ensure!(
            units.len() <= 0xFFFF,
            "string of {} code units too long for a u16 count",
            units.len()
        );
        self.write_u16(units.len() as u16);
        for unit in units {
            self.write_u16(unit);
        }
        Ok(())
    }

    pub fn write_four_cc(&mut self, tag: &str) -> Result<()> {
        let bytes = to_latin1(tag)?;
        ensure!(bytes.len() == 4, "FourCC {:?} is not exactly 4 bytes", tag);
        self.write_bytes(&bytes);
        Ok(())
    }

    pub fn write_four_cc_reversed(&mut self, tag: &str) -> Result<()> {
        let mut bytes = to_latin1(tag)?;
        ensure!(bytes.len() == 4, "FourCC {:?} is not exactly 4 bytes", tag);
        bytes.reverse();
        self.write_bytes(&bytes);
        Ok(())
    }

    pub fn write_vec2(&mut self, v: Vec2) {
        self.write_f32(v.x);
        self.write_f32(v.y);
    }

    pub fn write_vec3(&mut self, v: Vec3) {
        self.write_f32(v.x);
        self.write_f32(v.y);
        self.write_f32(v.z);
    }

    pub fn write_vec4(&mut self, v: Vec4) {
        self.write_f32(v.x);
        self.write_f32(v.y);
        self.write_f32(v.z);
        self.write_f32(v.w);
    }

    pub fn write_u16_grid(&mut self, grid: &Grid<u16>) {
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                self.write_u16(grid.get(x, y));
            }
        }
    }

    pub fn write_uint_grid(&mut self, grid: &Grid<u32>, bits: u32) -> Result<()> {
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                match bits {
                    16 => self.write_u16(grid.get(x, y) as u16),
                    32 => self.write_u32(grid.get(x, y)),
                    _ => bail!("unsupported grid element width: {} bits", bits),
                }
            }
        }
        Ok(())
    }

    pub fn write_byte_grid(&mut self, grid: &Grid<u8>) {
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                self.write_u8(grid.get(x, y));
            }
        }
    }

    /// Mirror of [`BinaryReader::read_bit_grid`]. `pad` supplies the value of
    /// the unused high bits in the final byte of each row (visibility grids
    /// store 0xFF there).
    pub fn write_bit_grid(&mut self, grid: &Grid<bool>, pad: u8) {
        let (width, height) = (grid.width(), grid.height());
        if width == 0 {
            return;
        }
        for y in 0..height {
            let mut byte = if width < 8 { pad } else { 0 };
            for x in 0..width {
                if x > 0 && x % 8 == 0 {
                    self.write_u8(byte);
                    byte = if x > width - 8 { pad } else { 0 };
                }
                if grid.get(x, y) {
                    byte |= 1 << (x % 8);
                } else {
                    byte &= !(1 << (x % 8));
                }
            }
            self.write_u8(byte);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_round_trips_primitives() -> Result<()> {
        let mut w = BinaryWriter::new();
        w.write_u8(0xAB);
        w.write_u16(0x1234);
        w.write_u24(0xABCDEF)?;
        w.write_u32(0xDEAD_BEEF);
        w.write_i32(-7);
        w.write_f32(1.5);
        w.write_bool(true);
        w.write_bool_u32(false);
        w.write_string("Alpha")?;
        w.write_ascii_string("GDI Barracks")?;
        w.write_unicode_string("zażółć")?;
        w.write_four_cc("CMP2")?;
        w.write_four_cc_reversed("free")?;

        let bytes = w.into_bytes();
        let mut r = BinaryReader::new(&bytes);
        assert_eq!(r.read_u8()?, 0xAB);
        assert_eq!(r.read_u16()?, 0x1234);
        assert_eq!(r.read_u24()?, 0xABCDEF);
        assert_eq!(r.read_u32()?, 0xDEAD_BEEF);
        assert_eq!(r.read_i32()?, -7);
        assert_eq!(r.read_f32()?, 1.5);
        assert!(r.read_bool_checked()?);
        assert!(!r.read_bool_u32()?);
        assert_eq!(r.read_string()?, "Alpha");
        assert_eq!(r.read_ascii_string()?, "GDI Barracks");
        assert_eq!(r.read_unicode_string()?, "zażółć");
        assert_eq!(r.read_four_cc()?, "CMP2");
        assert_eq!(r.read_four_cc_reversed()?, "free");
        assert_eq!(r.remaining(), 0);
        Ok(())
    }

    #[test]
    fn it_rejects_bad_bools_and_padding() {
        let mut r = BinaryReader::new(&[2]);
        assert!(r.read_bool_checked().is_err());
        let mut r = BinaryReader::new(&[1, 0, 1, 0]);
        assert!(r.read_bool_u32().is_err());
    }

    #[test]
    fn fourcc_reversal_is_stored_backwards() -> Result<()> {
        let mut w = BinaryWriter::new();
        w.write_four_cc_reversed("look")?;
        assert_eq!(w.as_bytes(), b"kool");
        Ok(())
    }

    #[test]
    fn bit_grid_length_is_row_aligned() {
        for (width, height) in [(1, 1), (7, 3), (8, 2), (9, 4), (13, 1), (16, 2)] {
            let mut grid = Grid::new(width, height);
            for y in 0..height {
                for x in 0..width {
                    grid.set(x, y, (x * 31 + y * 17) % 3 == 0);
                }
            }
            let mut w = BinaryWriter::new();
            w.write_bit_grid(&grid, 0);
            assert_eq!(w.position(), height * ((width + 7) / 8));

            let bytes = w.into_bytes();
            let mut r = BinaryReader::new(&bytes);
            let back = r.read_bit_grid(width, height).unwrap();
            assert_eq!(back, grid);
        }
    }

    #[test]
    fn bit_grid_pad_byte_fills_unused_bits() {
        // Width 5 leaves three pad bits per row; with pad 0xFF they must be
        // set, while the five data bits stay authoritative.
        let mut grid = Grid::new(5, 1);
        grid.set(0, 0, true);
        grid.set(3, 0, true);
        let mut w = BinaryWriter::new();
        w.write_bit_grid(&grid, 0xFF);
        assert_eq!(w.as_bytes(), &[0b1110_1001]);
    }

    #[test]
    fn grids_serialise_y_outer_x_inner() {
        let mut grid = Grid::new(2, 2);
        grid.set(0, 0, 1u16);
        grid.set(1, 0, 2);
        grid.set(0, 1, 3);
        grid.set(1, 1, 4);
        let mut w = BinaryWriter::new();
        w.write_u16_grid(&grid);
        assert_eq!(w.as_bytes(), &[1, 0, 2, 0, 3, 0, 4, 0]);
    }
}
