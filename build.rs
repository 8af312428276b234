// build.rs

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

const VECTOR_WIDTH_VAR: &str = "COLUMN_PACK_VECTOR_WIDTH";
const MIN_GROUPS_VAR: &str = "COLUMN_PACK_MIN_GROUPS_PER_TEAM";
const MAX_GROUPS_VAR: &str = "COLUMN_PACK_MAX_GROUPS_PER_TEAM";
const PHYSICAL_LEV_VAR: &str = "COLUMN_PACK_NUM_PHYSICAL_LEV";
const MPI_ON_DEVICE_VAR: &str = "COLUMN_PACK_MPI_ON_DEVICE";

const DEFAULT_NUM_PHYSICAL_LEV: usize = 72;

fn feature(name: &str) -> bool {
    env::var_os(format!("CARGO_FEATURE_{}", name)).is_some()
}

/// Whether the features resolve to the accelerator, either enabled
/// explicitly or as the runtime default when no host strategy is requested.
fn accelerator_selected() -> bool {
    if !feature("RUNTIME_ACCELERATOR") {
        return false;
    }
    feature("ACCELERATOR")
        || !(feature("SPACE_PARALLEL") || feature("SPACE_THREADS") || feature("SPACE_SERIAL"))
}

fn main() {
    for var in [
        VECTOR_WIDTH_VAR,
        MIN_GROUPS_VAR,
        MAX_GROUPS_VAR,
        PHYSICAL_LEV_VAR,
        MPI_ON_DEVICE_VAR,
    ] {
        println!("cargo:rerun-if-env-changed={}", var);
    }
    println!("cargo:rerun-if-changed=build.rs");

    // Detect the SIMD ISA of the build host, the same way the lane count of
    // the host backends is picked for f64 packs. An explicit width wins.
    let (isa, detected_width) = detect_native_simd();
    let native_width = match positive_var::<usize>(VECTOR_WIDTH_VAR) {
        Some(width) => width,
        None => detected_width,
    };

    let min_groups = positive_var::<u32>(MIN_GROUPS_VAR);
    let max_groups = positive_var::<u32>(MAX_GROUPS_VAR);
    if let (Some(min), Some(max)) = (min_groups, max_groups) {
        if min > max {
            panic!(
                "{}={} exceeds {}={}: min groups per team must not exceed max",
                MIN_GROUPS_VAR, min, MAX_GROUPS_VAR, max
            );
        }
    }
    if (min_groups.is_some() || max_groups.is_some()) && !accelerator_selected() {
        println!(
            "cargo:warning=team size overrides are ignored: this build does not resolve to the accelerator backend"
        );
    }

    let num_physical_lev =
        positive_var::<usize>(PHYSICAL_LEV_VAR).unwrap_or(DEFAULT_NUM_PHYSICAL_LEV);
    let mpi_on_device = bool_var(MPI_ON_DEVICE_VAR).unwrap_or(true);

    let mut out = String::new();
    writeln!(out, "// Generated by build.rs. Do not edit.").unwrap();
    writeln!(out, "pub const NATIVE_SIMD_ISA: &str = {:?};", isa).unwrap();
    writeln!(out, "pub const NATIVE_VECTOR_WIDTH: usize = {};", native_width).unwrap();
    writeln!(
        out,
        "pub const MIN_GROUPS_PER_TEAM: Option<u32> = {:?};",
        min_groups
    )
    .unwrap();
    writeln!(
        out,
        "pub const MAX_GROUPS_PER_TEAM: Option<u32> = {:?};",
        max_groups
    )
    .unwrap();
    writeln!(out, "pub const NUM_PHYSICAL_LEV: usize = {};", num_physical_lev).unwrap();
    writeln!(out, "pub const MPI_ON_DEVICE: bool = {};", mpi_on_device).unwrap();

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("cargo always sets OUT_DIR"));
    fs::write(out_dir.join("build_env.rs"), out).expect("failed to write build_env.rs");
}

/// Returns the ISA name and the number of f64 lanes it packs.
fn detect_native_simd() -> (&'static str, usize) {
    #[cfg(target_arch = "x86_64")]
    let detected = if is_x86_feature_detected!("avx512f") {
        ("avx512f", 8)
    } else if is_x86_feature_detected!("avx2") {
        ("avx2", 4)
    } else {
        ("none", 1)
    };

    // ARM always has NEON on aarch64
    #[cfg(target_arch = "aarch64")]
    let detected = ("neon", 2);

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    let detected = ("none", 1);

    detected
}

fn positive_var<T>(name: &str) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Default + std::fmt::Display,
{
    let raw = env::var(name).ok()?;
    let value: T = raw
        .trim()
        .parse()
        .unwrap_or_else(|_| panic!("{}={:?} is not a valid positive integer", name, raw));
    if value <= T::default() {
        panic!("{}={} must be at least 1", name, value);
    }
    Some(value)
}

fn bool_var(name: &str) -> Option<bool> {
    let raw = env::var(name).ok()?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => panic!("{}={:?} is not a boolean", name, raw),
    }
}
