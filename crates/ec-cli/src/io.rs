use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use edgecloud::{Aabb3f, EdgeGraph, Point3f};
use serde::{Deserialize, Serialize};

/// Reads whitespace-separated `x y z` rows.
///
/// Blank lines and lines starting with `#` are skipped; columns past the
/// third are ignored so XYZ exports with normals or colours load as-is.
pub fn read_points(path: &Path) -> Result<Vec<Point3f>> {
    let file = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_points(BufReader::new(file)).with_context(|| format!("parsing {}", path.display()))
}

pub fn parse_points(reader: impl BufRead) -> Result<Vec<Point3f>> {
    let mut out = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut cols = line.split_whitespace();
        let mut xyz = [0.0_f32; 3];
        for (axis, slot) in xyz.iter_mut().enumerate() {
            let Some(tok) = cols.next() else {
                bail!("line {}: expected 3 coordinates, got {axis}", lineno + 1);
            };
            *slot = tok
                .parse()
                .with_context(|| format!("line {}: bad coordinate '{tok}'", lineno + 1))?;
        }
        out.push(Point3f::from(xyz));
    }
    Ok(out)
}

/// Reads one label per line: `1`/`0` or `true`/`false`.
pub fn read_labels(path: &Path) -> Result<Vec<bool>> {
    let file = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_labels(BufReader::new(file)).with_context(|| format!("parsing {}", path.display()))
}

pub fn parse_labels(reader: impl BufRead) -> Result<Vec<bool>> {
    let mut out = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let label = match line.trim() {
            "" => continue,
            t if t.starts_with('#') => continue,
            "1" | "true" => true,
            "0" | "false" => false,
            other => bail!("line {}: bad label '{other}'", lineno + 1),
        };
        out.push(label);
    }
    Ok(out)
}

pub fn write_points(path: &Path, points: &[Point3f]) -> Result<()> {
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut w = BufWriter::new(file);
    for p in points {
        writeln!(w, "{} {} {}", p.x, p.y, p.z).context("writing point row")?;
    }
    w.flush().context("flushing point file")
}

pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(path, bytes).with_context(|| format!("writing json {}", path.display()))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDto {
    pub num_points: usize,
    pub max_dist: Option<f32>,
    pub points: Vec<[f32; 3]>,
    pub edges: Vec<[usize; 2]>,
}

impl GraphDto {
    pub fn new(points: &[Point3f], graph: &EdgeGraph) -> Self {
        Self {
            num_points: graph.num_points(),
            max_dist: graph.max_dist().filter(|d| d.is_finite()),
            points: points.iter().map(|p| p.to_array()).collect(),
            edges: graph.iter().map(|e| [e.a(), e.b()]).collect(),
        }
    }
}

/// Axis-aligned extent of a written point set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsDto {
    pub min: [f32; 3],
    pub max: [f32; 3],
    pub extent: [f32; 3],
}

impl BoundsDto {
    /// `None` for an empty set.
    pub fn of(points: &[Point3f]) -> Option<Self> {
        let bb = Aabb3f::from_points(points)?;
        let e = bb.extent();
        Some(Self {
            min: bb.min.to_array(),
            max: bb.max.to_array(),
            extent: [e.x, e.y, e.z],
        })
    }
}
