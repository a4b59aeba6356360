// Copyright the TDX Hydro contributors. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository, or online at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Minimal WKB geometry codec (SPEC_FULL.md §6).
//!
//! Handles exactly the three geometry kinds this pipeline ever stores —
//! `Point`, `Polygon`, `MultiPolygon` — rather than pulling in a general
//! WKB crate, grounded on the `openmander-core` manifest's precedent for
//! a hand-rolled minimal codec over polygon data.

use geo_types::{Coord, LineString, MultiPolygon, Point, Polygon};

use tdxh_repr::{Error, Result};

const LITTLE_ENDIAN: u8 = 1;
const WKB_POINT: u32 = 1;
const WKB_POLYGON: u32 = 3;
const WKB_MULTI_POLYGON: u32 = 6;

pub fn encode_point(point: &Point<f64>) -> Vec<u8> {
    let mut buf = Vec::with_capacity(21);
    buf.push(LITTLE_ENDIAN);
    buf.extend_from_slice(&WKB_POINT.to_le_bytes());
    buf.extend_from_slice(&point.x().to_le_bytes());
    buf.extend_from_slice(&point.y().to_le_bytes());
    buf
}

pub fn decode_point(bytes: &[u8]) -> Result<Point<f64>> {
    let mut cursor = Cursor::new(bytes);
    cursor.expect_header(WKB_POINT)?;
    let x = cursor.read_f64()?;
    let y = cursor.read_f64()?;
    Ok(Point::new(x, y))
}

pub fn encode_polygon(polygon: &Polygon<f64>) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.push(LITTLE_ENDIAN);
    buf.extend_from_slice(&WKB_POLYGON.to_le_bytes());
    write_polygon_body(&mut buf, polygon);
    buf
}

pub fn decode_polygon(bytes: &[u8]) -> Result<Polygon<f64>> {
    let mut cursor = Cursor::new(bytes);
    cursor.expect_header(WKB_POLYGON)?;
    cursor.read_polygon_body()
}

pub fn encode_multi_polygon(multi: &MultiPolygon<f64>) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.push(LITTLE_ENDIAN);
    buf.extend_from_slice(&WKB_MULTI_POLYGON.to_le_bytes());
    buf.extend_from_slice(&(multi.0.len() as u32).to_le_bytes());
    for polygon in &multi.0 {
        buf.push(LITTLE_ENDIAN);
        buf.extend_from_slice(&WKB_POLYGON.to_le_bytes());
        write_polygon_body(&mut buf, polygon);
    }
    buf
}

pub fn decode_multi_polygon(bytes: &[u8]) -> Result<MultiPolygon<f64>> {
    let mut cursor = Cursor::new(bytes);
    cursor.expect_header(WKB_MULTI_POLYGON)?;
    let count = cursor.read_u32()?;
    let mut polygons = Vec::with_capacity(count as usize);
    for _ in 0..count {
        cursor.expect_header(WKB_POLYGON)?;
        polygons.push(cursor.read_polygon_body()?);
    }
    Ok(MultiPolygon::new(polygons))
}

fn write_polygon_body(buf: &mut Vec<u8>, polygon: &Polygon<f64>) {
    let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors());
    let ring_count = 1 + polygon.interiors().len();
    buf.extend_from_slice(&(ring_count as u32).to_le_bytes());
    for ring in rings {
        buf.extend_from_slice(&(ring.0.len() as u32).to_le_bytes());
        for coord in &ring.0 {
            buf.extend_from_slice(&coord.x.to_le_bytes());
            buf.extend_from_slice(&coord.y.to_le_bytes());
        }
    }
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Cursor { bytes, pos: 0 }
    }

    fn expect_header(&mut self, expected_type: u32) -> Result<()> {
        let order = self.read_u8()?;
        if order != LITTLE_ENDIAN {
            return Err(Error::SchemaMismatch(format!("unsupported WKB byte order {order}")));
        }
        let geometry_type = self.read_u32()?;
        if geometry_type != expected_type {
            return Err(Error::SchemaMismatch(format!(
                "expected WKB type {expected_type}, got {geometry_type}"
            )));
        }
        Ok(())
    }

    fn read_u8(&mut self) -> Result<u8> {
        let byte = *self.bytes.get(self.pos).ok_or_else(|| truncated())?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_u32(&mut self) -> Result<u32> {
        let slice = self.take(4)?;
        Ok(u32::from_le_bytes(slice.try_into().unwrap()))
    }

    fn read_f64(&mut self) -> Result<f64> {
        let slice = self.take(8)?;
        Ok(f64::from_le_bytes(slice.try_into().unwrap()))
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos + n;
        let slice = self.bytes.get(self.pos..end).ok_or_else(truncated)?;
        self.pos = end;
        Ok(slice)
    }

    fn read_polygon_body(&mut self) -> Result<Polygon<f64>> {
        let ring_count = self.read_u32()?;
        if ring_count == 0 {
            return Err(Error::SchemaMismatch("polygon with no exterior ring".into()));
        }
        let mut rings = Vec::with_capacity(ring_count as usize);
        for _ in 0..ring_count {
            let point_count = self.read_u32()?;
            let mut coords = Vec::with_capacity(point_count as usize);
            for _ in 0..point_count {
                let x = self.read_f64()?;
                let y = self.read_f64()?;
                coords.push(Coord { x, y });
            }
            rings.push(LineString::new(coords));
        }
        let exterior = rings.remove(0);
        Ok(Polygon::new(exterior, rings))
    }
}

fn truncated() -> Error {
    Error::SchemaMismatch("truncated WKB buffer".into())
}
