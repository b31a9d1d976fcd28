use anyhow::{anyhow, bail, Context, Result};
use imxform::fft::{
    fft1d as fft1d_baseline, fft2d as fft2d_baseline, ifft1d as ifft1d_baseline,
    ifft2d as ifft2d_baseline, Fft1DConfig, Fft1DKernel, Fft2DConfig, Fft2DKernel, Ifft1DConfig,
    Ifft1DKernel, Ifft2DConfig, Ifft2DKernel,
};
use imxform::filter::{
    highpass as highpass_baseline, lowpass as lowpass_baseline, SpectralFilterConfig,
    SpectralFilterKernel,
};
use imxform::kernel::KernelLifecycle;
use imxform::pointwise::{
    histogram as histogram_baseline, threshold as threshold_baseline, Histogram2D,
    HistogramConfig, HistogramKernel, Threshold2D, ThresholdConfig, ThresholdKernel,
};
use imxform::traits::{ForwardFft1D, ForwardFft2D, InverseFft1D, InverseFft2D, SpectralFilter2D};
use ndarray::Array2;
use num_complex::Complex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

const DEFAULT_PYTHON_BIN: &str = "python";

/// NumPy references. Complex outputs are flattened as interleaved `re, im` pairs, integer outputs
/// are rounded half away from zero to match the Rust inverse transforms.
const PY_NUMPY_SCRIPT: &str = r#"
import json
import sys
import time
import numpy as np

env = json.loads(sys.stdin.read())
op = env["op"]
iters = int(env["iters"])
p = env["payload"]

def _matrix(key):
    return np.asarray(p[key], dtype=float)

def _complex_matrix(key):
    pairs = np.asarray(p[key], dtype=float)
    return pairs[..., 0] + 1j * pairs[..., 1]

def _round(v):
    return np.sign(v) * np.floor(np.abs(v) + 0.5)

def _interleave(c):
    c = np.asarray(c).reshape(-1)
    return np.stack([c.real, c.imag], axis=-1).reshape(-1)

def _mask(shape, cutoff, keep_near):
    rows, cols = shape
    i, j = np.indices(shape)
    d = np.sqrt((i - rows // 2) ** 2 + (j - cols // 2) ** 2)
    return d <= cutoff if keep_near else d > cutoff

def _compute():
    if op == "fft1d":
        return _interleave(np.fft.fft(_matrix("input").reshape(-1), norm="ortho"))
    if op == "ifft1d":
        return _round(np.fft.ifft(_complex_matrix("input").reshape(-1), norm="ortho").real)
    if op == "fft2d":
        return _interleave(np.fft.fft2(_matrix("input"), norm="ortho"))
    if op == "ifft2d":
        return _round(np.fft.ifft2(_complex_matrix("input"), norm="ortho").real)
    if op in ("lowpass", "highpass"):
        x = _matrix("input")
        spectrum = np.fft.fft2(x, norm="ortho")
        spectrum = spectrum * _mask(x.shape, float(p["cutoff"]), op == "lowpass")
        return _round(np.fft.ifft2(spectrum, norm="ortho").real)
    if op == "threshold":
        return np.clip(_matrix("input"), int(p["min"]), int(p["max"]))
    if op == "histogram":
        x = np.asarray(p["input"], dtype=np.int64).reshape(-1)
        return np.bincount(x - x.min()) / x.size
    raise ValueError(f"unsupported op: {op}")

y = np.asarray(_compute(), dtype=float).reshape(-1)

t0 = time.perf_counter_ns()
for _ in range(iters):
    _compute()
t1 = time.perf_counter_ns()

print(json.dumps({
    "output": y.tolist(),
    "avg_ns": (t1 - t0) / max(iters, 1),
    "python_version": sys.version.split()[0],
    "numpy_version": np.__version__
}))
"#;

#[derive(Debug, Serialize, Deserialize, Clone)]
struct PythonEval {
    output: Vec<f64>,
    avg_ns: f64,
    python_version: String,
    numpy_version: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct ContractRow {
    case_id: String,
    pearson_r: f64,
    mae: f64,
    rmse: f64,
    max_abs: f64,
    rust_candidate_ns: f64,
    rust_baseline_ns: f64,
    python_ns: f64,
    speedup_vs_baseline: f64,
    speedup_vs_python: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContractBundle {
    generated_epoch_seconds: u64,
    python_executable: String,
    python_version: String,
    numpy_version: String,
    rows: Vec<ContractRow>,
}

/// Timings measured for one case.
struct Timings {
    candidate_ns: f64,
    baseline_ns: f64,
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("contracts") => run_contracts(),
        _ => {
            eprintln!("Usage:");
            eprintln!("  cargo run -p xtask -- contracts");
            Ok(())
        }
    }
}

fn run_contracts() -> Result<()> {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let out_dir = PathBuf::from(format!("target/contracts/{ts}"));
    fs::create_dir_all(&out_dir).context("creating contract output directory")?;

    let python_bin = detect_python_bin();
    let mut rows = Vec::new();

    // Deterministic 8-bit test image with low- and high-frequency content.
    let image = synthetic_image(64, 128);
    let image_json = matrix_json(&image);

    // 1D forward FFT over the flattened image.
    {
        let case_id = "fft1d_f64";
        let kernel = Fft1DKernel::<f64>::try_new(Fft1DConfig::default())?;
        let candidate = kernel
            .run_alloc(&image)
            .map_err(|e| anyhow!("fft1d candidate execution failed: {e}"))?;
        let baseline = fft1d_baseline::<f64, _>(&image, 1)?;
        let py = python_numpy_eval(&python_bin, "fft1d", json!({ "input": image_json }), 50)?;
        let timings = Timings {
            candidate_ns: benchmark_avg_ns(50, || {
                kernel
                    .run_alloc(&image)
                    .map(|_| ())
                    .map_err(|e| anyhow!("fft1d candidate benchmark failed: {e}"))
            })?,
            baseline_ns: benchmark_avg_ns(50, || {
                fft1d_baseline::<f64, _>(&image, 1)?;
                Ok(())
            })?,
        };
        ensure_same_output(
            case_id,
            &interleave(&candidate.frequency),
            &interleave(&baseline.frequency),
        )?;
        record_case(
            &mut rows,
            case_id,
            interleave(&candidate.frequency),
            py,
            timings,
        )?;
    }

    // 1D inverse FFT of the NumPy-compatible spectrum.
    {
        let case_id = "ifft1d_f64";
        let spectrum = fft1d_baseline::<f64, _>(&image, 1)?;
        let kernel = Ifft1DKernel::<f64>::try_new(Ifft1DConfig)?;
        let candidate = kernel
            .run_alloc(&spectrum.frequency)
            .map_err(|e| anyhow!("ifft1d candidate execution failed: {e}"))?;
        let py = python_numpy_eval(
            &python_bin,
            "ifft1d",
            json!({ "input": complex_matrix_json(&spectrum.frequency) }),
            50,
        )?;
        let timings = Timings {
            candidate_ns: benchmark_avg_ns(50, || {
                kernel
                    .run_alloc(&spectrum.frequency)
                    .map(|_| ())
                    .map_err(|e| anyhow!("ifft1d candidate benchmark failed: {e}"))
            })?,
            baseline_ns: benchmark_avg_ns(50, || {
                ifft1d_baseline(&spectrum.frequency)?;
                Ok(())
            })?,
        };
        record_case(&mut rows, case_id, to_f64(&candidate), py, timings)?;
    }

    // 2D forward FFT, double and single precision.
    {
        let case_id = "fft2d_f64";
        let kernel = Fft2DKernel::<f64>::try_new(Fft2DConfig::default())?;
        let candidate = kernel
            .run_alloc(&image)
            .map_err(|e| anyhow!("fft2d candidate execution failed: {e}"))?;
        let py = python_numpy_eval(&python_bin, "fft2d", json!({ "input": image_json }), 50)?;
        let timings = Timings {
            candidate_ns: benchmark_avg_ns(50, || {
                kernel
                    .run_alloc(&image)
                    .map(|_| ())
                    .map_err(|e| anyhow!("fft2d candidate benchmark failed: {e}"))
            })?,
            baseline_ns: benchmark_avg_ns(50, || {
                fft2d_baseline::<f64, _>(&image, 1)?;
                Ok(())
            })?,
        };
        record_case(
            &mut rows,
            case_id,
            interleave(&candidate.frequency),
            py,
            timings,
        )?;
    }
    {
        let case_id = "fft2d_f32";
        let kernel = Fft2DKernel::<f32>::try_new(Fft2DConfig::default())?;
        let candidate = kernel
            .run_alloc(&image)
            .map_err(|e| anyhow!("fft2d f32 candidate execution failed: {e}"))?;
        let py = python_numpy_eval(&python_bin, "fft2d", json!({ "input": image_json }), 50)?;
        let timings = Timings {
            candidate_ns: benchmark_avg_ns(50, || {
                kernel
                    .run_alloc(&image)
                    .map(|_| ())
                    .map_err(|e| anyhow!("fft2d f32 candidate benchmark failed: {e}"))
            })?,
            baseline_ns: benchmark_avg_ns(50, || {
                fft2d_baseline::<f32, _>(&image, 1)?;
                Ok(())
            })?,
        };
        let frequency = candidate
            .frequency
            .mapv(|c| Complex::new(f64::from(c.re), f64::from(c.im)));
        record_case(&mut rows, case_id, interleave(&frequency), py, timings)?;
    }

    // 2D inverse FFT.
    {
        let case_id = "ifft2d_f64";
        let spectrum = fft2d_baseline::<f64, _>(&image, 1)?;
        let kernel = Ifft2DKernel::<f64>::try_new(Ifft2DConfig)?;
        let candidate = kernel
            .run_alloc(&spectrum.frequency)
            .map_err(|e| anyhow!("ifft2d candidate execution failed: {e}"))?;
        if candidate != image {
            bail!("case {case_id} did not reproduce the input image");
        }
        let py = python_numpy_eval(
            &python_bin,
            "ifft2d",
            json!({ "input": complex_matrix_json(&spectrum.frequency) }),
            50,
        )?;
        let timings = Timings {
            candidate_ns: benchmark_avg_ns(50, || {
                kernel
                    .run_alloc(&spectrum.frequency)
                    .map(|_| ())
                    .map_err(|e| anyhow!("ifft2d candidate benchmark failed: {e}"))
            })?,
            baseline_ns: benchmark_avg_ns(50, || {
                ifft2d_baseline(&spectrum.frequency)?;
                Ok(())
            })?,
        };
        record_case(&mut rows, case_id, to_f64(&candidate), py, timings)?;
    }

    // Spectral filters at a few radii.
    for (op, cutoff) in [
        ("lowpass", 4.0),
        ("lowpass", 24.0),
        ("highpass", 4.0),
        ("highpass", 24.0),
    ] {
        let case_id = format!("{op}_r{cutoff}_f64");
        let config = if op == "lowpass" {
            SpectralFilterConfig::lowpass(cutoff)
        } else {
            SpectralFilterConfig::highpass(cutoff)
        };
        let kernel = SpectralFilterKernel::<f64>::try_new(config)?;
        let candidate = kernel
            .run_alloc(&image)
            .map_err(|e| anyhow!("{op} candidate execution failed: {e}"))?;
        let py = python_numpy_eval(
            &python_bin,
            op,
            json!({ "input": image_json, "cutoff": cutoff }),
            20,
        )?;
        let timings = Timings {
            candidate_ns: benchmark_avg_ns(20, || {
                kernel
                    .run_alloc(&image)
                    .map(|_| ())
                    .map_err(|e| anyhow!("{op} candidate benchmark failed: {e}"))
            })?,
            baseline_ns: benchmark_avg_ns(20, || {
                if op == "lowpass" {
                    lowpass_baseline::<f64, _>(&image, cutoff, 1)?;
                } else {
                    highpass_baseline::<f64, _>(&image, cutoff, 1)?;
                }
                Ok(())
            })?,
        };
        record_case(&mut rows, &case_id, to_f64(&candidate), py, timings)?;
    }

    // Thresholding.
    {
        let case_id = "threshold_i32";
        let (min, max) = (40, 200);
        let kernel = ThresholdKernel::try_new(ThresholdConfig { min, max })?;
        let candidate = kernel
            .run_alloc(&image)
            .map_err(|e| anyhow!("threshold candidate execution failed: {e}"))?;
        let py = python_numpy_eval(
            &python_bin,
            "threshold",
            json!({ "input": image_json, "min": min, "max": max }),
            200,
        )?;
        let timings = Timings {
            candidate_ns: benchmark_avg_ns(200, || {
                kernel
                    .run_alloc(&image)
                    .map(|_| ())
                    .map_err(|e| anyhow!("threshold candidate benchmark failed: {e}"))
            })?,
            baseline_ns: benchmark_avg_ns(200, || {
                threshold_baseline(&image, min, max)?;
                Ok(())
            })?,
        };
        record_case(&mut rows, case_id, to_f64(&candidate), py, timings)?;
    }

    // Histogram.
    {
        let case_id = "histogram_i32";
        let kernel = HistogramKernel::try_new(HistogramConfig)?;
        let candidate = kernel
            .run_alloc(&image)
            .map_err(|e| anyhow!("histogram candidate execution failed: {e}"))?;
        let py = python_numpy_eval(
            &python_bin,
            "histogram",
            json!({ "input": image_json }),
            200,
        )?;
        let timings = Timings {
            candidate_ns: benchmark_avg_ns(200, || {
                kernel
                    .run_alloc(&image)
                    .map(|_| ())
                    .map_err(|e| anyhow!("histogram candidate benchmark failed: {e}"))
            })?,
            baseline_ns: benchmark_avg_ns(200, || {
                histogram_baseline(&image)?;
                Ok(())
            })?,
        };
        record_case(
            &mut rows,
            case_id,
            candidate.iter().copied().collect(),
            py,
            timings,
        )?;
    }

    let version_probe = python_versions(&python_bin)?;
    let bundle = ContractBundle {
        generated_epoch_seconds: ts,
        python_executable: python_bin.to_string_lossy().into_owned(),
        python_version: version_probe.python_version,
        numpy_version: version_probe.numpy_version,
        rows,
    };

    write_summary_csv(&out_dir.join("summary.csv"), &bundle.rows)?;
    fs::write(
        out_dir.join("summary.json"),
        serde_json::to_vec_pretty(&bundle).context("serializing summary bundle")?,
    )
    .context("writing summary.json")?;

    println!("Contract artifacts generated in: {}", out_dir.display());
    println!("  - {}", out_dir.join("summary.csv").display());
    println!("  - {}", out_dir.join("summary.json").display());
    println!("  - cases: {}", bundle.rows.len());
    for row in &bundle.rows {
        println!(
            "  {:<20} r={:.9} max_abs={:.3e} speedup_vs_numpy={:.2}",
            row.case_id, row.pearson_r, row.max_abs, row.speedup_vs_python
        );
    }

    Ok(())
}

fn synthetic_image(rows: usize, cols: usize) -> Array2<i32> {
    Array2::from_shape_fn((rows, cols), |(i, j)| {
        let (y, x) = (i as f64 / rows as f64, j as f64 / cols as f64);
        let smooth = 0.5 + 0.35 * (6.0 * x).sin() * (4.0 * y).cos();
        let texture = 0.15 * ((i * 7 + j * 13) % 11) as f64 / 10.0;
        ((smooth + texture) * 255.0 / 1.15).round() as i32
    })
}

fn detect_python_bin() -> PathBuf {
    PathBuf::from(DEFAULT_PYTHON_BIN)
}

fn python_versions(python_bin: &Path) -> Result<PythonEval> {
    run_python_eval(
        python_bin,
        r#"
import json, sys
import numpy
payload = json.loads(sys.stdin.read())
print(json.dumps({
    "output": [],
    "avg_ns": 0.0,
    "python_version": sys.version.split()[0],
    "numpy_version": numpy.__version__
}))
"#,
        json!({}),
    )
}

fn python_numpy_eval(
    python_bin: &Path,
    op: &str,
    payload: serde_json::Value,
    iters: usize,
) -> Result<PythonEval> {
    run_python_eval(
        python_bin,
        PY_NUMPY_SCRIPT,
        json!({
            "op": op,
            "iters": iters,
            "payload": payload
        }),
    )
}

fn run_python_eval(
    python_bin: &Path,
    script: &str,
    payload: serde_json::Value,
) -> Result<PythonEval> {
    let mut child = Command::new(python_bin)
        .arg("-c")
        .arg(script)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawning python interpreter at {}", python_bin.display()))?;

    {
        let stdin = child.stdin.as_mut().context("opening python stdin")?;
        let payload_bytes = serde_json::to_vec(&payload).context("serializing python payload")?;
        stdin
            .write_all(&payload_bytes)
            .context("writing payload to python stdin")?;
    }

    let output = child
        .wait_with_output()
        .context("waiting for python process")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("python execution failed: {stderr}");
    }
    let stdout = String::from_utf8(output.stdout).context("parsing python stdout utf8")?;
    serde_json::from_str(stdout.trim()).context("parsing python json")
}

fn record_case(
    rows: &mut Vec<ContractRow>,
    case_id: &str,
    candidate: Vec<f64>,
    py: PythonEval,
    timings: Timings,
) -> Result<()> {
    if candidate.len() != py.output.len() {
        bail!(
            "case {case_id} has mismatched output lengths: rust={}, numpy={}",
            candidate.len(),
            py.output.len()
        );
    }
    rows.push(ContractRow {
        case_id: case_id.to_string(),
        pearson_r: pearson(&candidate, &py.output),
        mae: mean_abs_error(&candidate, &py.output),
        rmse: root_mean_squared_error(&candidate, &py.output),
        max_abs: max_abs_error(&candidate, &py.output),
        rust_candidate_ns: timings.candidate_ns,
        rust_baseline_ns: timings.baseline_ns,
        python_ns: py.avg_ns,
        speedup_vs_baseline: timings.baseline_ns / timings.candidate_ns,
        speedup_vs_python: py.avg_ns / timings.candidate_ns,
    });
    Ok(())
}

fn ensure_same_output(case_id: &str, a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() || max_abs_error(a, b) > 0.0 {
        bail!("case {case_id}: kernel and free-function outputs differ");
    }
    Ok(())
}

fn matrix_json(matrix: &Array2<i32>) -> serde_json::Value {
    json!(matrix
        .rows()
        .into_iter()
        .map(|row| row.to_vec())
        .collect::<Vec<_>>())
}

fn complex_matrix_json(matrix: &Array2<Complex<f64>>) -> serde_json::Value {
    json!(matrix
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|c| [c.re, c.im]).collect::<Vec<_>>())
        .collect::<Vec<_>>())
}

fn interleave(matrix: &Array2<Complex<f64>>) -> Vec<f64> {
    matrix.iter().flat_map(|c| [c.re, c.im]).collect()
}

fn to_f64(matrix: &Array2<i32>) -> Vec<f64> {
    matrix.iter().map(|&v| f64::from(v)).collect()
}

fn benchmark_avg_ns<F>(iters: usize, mut f: F) -> Result<f64>
where
    F: FnMut() -> Result<()>,
{
    let start = Instant::now();
    for _ in 0..iters {
        f()?;
    }
    Ok(start.elapsed().as_nanos() as f64 / iters as f64)
}

fn mean_abs_error(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .sum::<f64>()
        / a.len() as f64
}

fn root_mean_squared_error(a: &[f64], b: &[f64]) -> f64 {
    (a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f64>()
        / a.len() as f64)
        .sqrt()
}

fn max_abs_error(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        let da = *x - mean_a;
        let db = *y - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    if var_a == 0.0 || var_b == 0.0 {
        if a == b {
            1.0
        } else {
            0.0
        }
    } else {
        cov / (var_a.sqrt() * var_b.sqrt())
    }
}

fn write_summary_csv(path: &Path, rows: &[ContractRow]) -> Result<()> {
    let mut out = String::new();
    out.push_str("case_id,pearson_r,mae,rmse,max_abs,rust_candidate_ns,rust_baseline_ns,python_ns,speedup_vs_baseline,speedup_vs_python\n");
    for row in rows {
        out.push_str(&format!(
            "{},{:.12},{:.12},{:.12},{:.12},{:.3},{:.3},{:.3},{:.6},{:.6}\n",
            row.case_id,
            row.pearson_r,
            row.mae,
            row.rmse,
            row.max_abs,
            row.rust_candidate_ns,
            row.rust_baseline_ns,
            row.python_ns,
            row.speedup_vs_baseline,
            row.speedup_vs_python,
        ));
    }
    fs::write(path, out).with_context(|| format!("writing {}", path.display()))
}
