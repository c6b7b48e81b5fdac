#![allow(clippy::all)] // Clippy will attempt to remove black_box() internals

use criterion::*;
use tabular_cbf::{
    Dynamics, Grid, GridField, RegularGrid, TabularCbf, TimeInput, TimeTableSource,
    TimeVaryingTabularCbf,
};

/// x' = u with |u_i| <= 1
#[derive(PartialEq)]
struct Integrator {
    dim: usize,
}

impl Dynamics<f64> for Integrator {
    fn state_dim(&self) -> usize {
        self.dim
    }

    fn hamiltonian(&self, _x: &[f64], _r: f64, _v: f64, dv: &[f64]) -> f64 {
        dv.iter().map(|g| g.abs()).sum()
    }
}

/// Grid over [-1, 1]^ndims and a smooth table sum(sin(3 x_j)) on it
fn gen_table(ndims: usize, gridsize: usize) -> (RegularGrid<f64>, Vec<f64>) {
    let grid = RegularGrid::new(&vec![-1.0; ndims], &vec![1.0; ndims], &vec![gridsize; ndims])
        .unwrap();
    let values = (0..grid.size())
        .map(|k| (0..ndims).map(|j| (3.0_f64 * grid.states()[j][k]).sin()).sum::<f64>())
        .collect();
    (grid, values)
}

/// Observation points on a diagonal sweep through (and past) the domain
fn gen_obs(ndims: usize, n: usize) -> Vec<Vec<f64>> {
    (0..ndims)
        .map(|j| {
            (0..n)
                .map(|i| -1.2 + 2.4 * ((i * (j + 3)) % n) as f64 / n as f64)
                .collect()
        })
        .collect()
}

fn bench_static(c: &mut Criterion) {
    let mut group = c.benchmark_group("Static");
    for ndims in [2, 3, 4] {
        let gridsize = 21;
        let (grid, values) = gen_table(ndims, gridsize);
        let mut cbf = TabularCbf::new(Integrator { dim: ndims }, grid).unwrap();

        group.bench_with_input(
            BenchmarkId::new("set_value_table", format!("{gridsize}x{ndims}D")),
            &values,
            |b, values| b.iter(|| black_box(cbf.set_value_table(values.clone()).unwrap())),
        );

        let n = 1000;
        let obs = gen_obs(ndims, n);
        let obs: Vec<&[f64]> = obs.iter().map(|x| &x[..]).collect();
        let mut out = vec![0.0; n];
        let mut gout = vec![0.0; n * ndims];

        group.throughput(Throughput::Elements(n as u64));
        let id = format!("{gridsize}x{ndims}D");
        let t0 = TimeInput::Scalar(0.0);
        group.bench_function(BenchmarkId::new("evaluate_batch", &id), |b| {
            b.iter(|| black_box(cbf.evaluate_batch(&obs, t0, &mut out).unwrap()))
        });
        group.bench_function(BenchmarkId::new("gradient_batch", &id), |b| {
            b.iter(|| black_box(cbf.gradient_batch(&obs, t0, &mut gout).unwrap()))
        });
        group.bench_function(
            BenchmarkId::new("certificate_condition", format!("{gridsize}x{ndims}D")),
            |b| b.iter(|| black_box(cbf.certificate_condition(0.5).unwrap())),
        );
    }
    group.finish();
}

fn bench_time_varying(c: &mut Criterion) {
    let mut group = c.benchmark_group("TimeVarying");
    let ndims = 3;
    let gridsize = 21;
    let nt = 11;
    let (grid, values) = gen_table(ndims, gridsize);
    let tables: Vec<Vec<f64>> = (0..nt)
        .map(|i| values.iter().map(|v| v * (1.0 + i as f64 / nt as f64)).collect())
        .collect();
    let times: Vec<f64> = (0..nt).map(|i| i as f64).collect();

    let mut cbf = TimeVaryingTabularCbf::new(Integrator { dim: ndims }, grid).unwrap();
    group.bench_function("set_time_indexed_table", |b| {
        b.iter(|| {
            black_box(
                cbf.set_time_indexed_table(&times, TimeTableSource::Samples(tables.clone()))
                    .unwrap(),
            )
        })
    });

    let n = 1000;
    let obs = gen_obs(ndims, n);
    let obs: Vec<&[f64]> = obs.iter().map(|x| &x[..]).collect();
    let ts: Vec<f64> = (0..n).map(|i| (nt - 1) as f64 * i as f64 / n as f64).collect();
    let mut out = vec![0.0; n];

    group.throughput(Throughput::Elements(n as u64));
    group.bench_function("evaluate_batch", |b| {
        b.iter(|| black_box(cbf.evaluate_batch(&obs, TimeInput::PerState(&ts), &mut out).unwrap()))
    });
    group.finish();
}

criterion_group!(benches, bench_static, bench_time_varying);
criterion_main!(benches);
