//! Downloads a Geofabrik extract and prepares it for `osrm-routed --algorithm mld`.
//!
//! Preparation runs the OSRM tools through Docker and is skipped for any step
//! whose output files already exist under the data root.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

const OSRM_IMAGE: &str = "osrm/osrm-backend";

/// A prepared OSRM dataset on disk.
#[derive(Debug, Clone)]
pub struct PreparedRegion {
    /// Directory mounted as `/data` in the OSRM container.
    pub data_dir: PathBuf,
    /// File name of the `.osrm` base inside `data_dir`.
    pub osrm_file: String,
}

impl PreparedRegion {
    /// Ensure `region` (a Geofabrik path such as `north-america/us/oklahoma`)
    /// is downloaded and preprocessed below `data_root`.
    pub fn ensure(region: &str, data_root: impl AsRef<Path>) -> io::Result<Self> {
        let name = region.rsplit('/').next().unwrap_or(region);
        let data_dir = std::env::current_dir()?.join(data_root).join(name);
        fs::create_dir_all(&data_dir)?;

        let pbf_file = format!("{name}-latest.osm.pbf");
        let osrm_file = format!("{name}-latest.osrm");

        let pbf_path = data_dir.join(&pbf_file);
        if !pbf_path.exists() {
            download(&format!("https://download.geofabrik.de/{region}-latest.osm.pbf"), &pbf_path)?;
        }

        if !data_dir.join(&osrm_file).exists() {
            osrm_tool(&data_dir, &["osrm-extract", "-p", "/opt/car.lua", &format!("/data/{pbf_file}")])?;
        }

        let partitioned = ["partition", "mldgr", "cells"]
            .iter()
            .all(|ext| data_dir.join(format!("{osrm_file}.{ext}")).exists());
        if !partitioned {
            osrm_tool(&data_dir, &["osrm-partition", &format!("/data/{osrm_file}")])?;
            osrm_tool(&data_dir, &["osrm-customize", &format!("/data/{osrm_file}")])?;
        }

        Ok(Self { data_dir, osrm_file })
    }
}

fn download(url: &str, dest: &Path) -> io::Result<()> {
    let bytes = reqwest::blocking::get(url)
        .and_then(|resp| resp.error_for_status())
        .and_then(|resp| resp.bytes())
        .map_err(io::Error::other)?;

    let partial = dest.with_extension("partial");
    let mut file = fs::File::create(&partial)?;
    file.write_all(&bytes)?;
    file.sync_all()?;
    fs::rename(partial, dest)
}

fn osrm_tool(data_dir: &Path, args: &[&str]) -> io::Result<()> {
    let status = Command::new("docker")
        .args(["run", "--rm", "-t", "-v"])
        .arg(format!("{}:/data", data_dir.display()))
        .arg(OSRM_IMAGE)
        .args(args)
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!("{} exited with {status}", args[0])))
    }
}
