use anyhow::{Context, Result};
use chaosgame::api::{ChaosGameSettings, Polygon, Vec2};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Points file written by `run` and `sample`.
///
/// `points` holds every generated point after the initial one, so
/// `points.len() == iteration`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsDoc {
    pub settings: ChaosGameSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<u32>,
    pub polygon: Vec<[f64; 2]>,
    pub initial_point: [f64; 2],
    pub iteration: usize,
    pub points: Vec<[f64; 2]>,
}

impl PointsDoc {
    pub fn new(
        settings: ChaosGameSettings,
        rate: Option<u32>,
        polygon: &Polygon,
        initial_point: Vec2,
        points: &[Vec2],
    ) -> Self {
        Self {
            settings,
            rate,
            polygon: polygon.vertices().iter().copied().map(xy).collect(),
            initial_point: xy(initial_point),
            iteration: points.len(),
            points: points.iter().copied().map(xy).collect(),
        }
    }
}

#[inline]
fn xy(p: Vec2) -> [f64; 2] {
    [p.x, p.y]
}

/// Write `doc` as compact JSON, creating parent directories.
pub fn write_points(path: &Path, doc: &PointsDoc) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, doc)
        .with_context(|| format!("serializing points to {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
